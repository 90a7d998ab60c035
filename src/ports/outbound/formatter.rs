use crate::snapshot::domain::AppSnapshot;
use crate::shared::Result;

/// SnapshotFormatter port for rendering a snapshot
///
/// This port abstracts the output representation (JSON document, Markdown
/// summary, etc.) of a resolved snapshot.
pub trait SnapshotFormatter {
    /// Renders the snapshot as a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, snapshot: &AppSnapshot) -> Result<String>;
}
