use crate::ports::outbound::SnapshotFormatter;
use crate::shared::Result;
use crate::snapshot::domain::AppSnapshot;

/// JsonFormatter adapter for the full snapshot document
///
/// Emits pretty-printed JSON. Field names are snake_case; health values are
/// upper-case and the app status lower-case.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFormatter for JsonFormatter {
    fn format(&self, snapshot: &AppSnapshot) -> Result<String> {
        serde_json::to_string_pretty(snapshot).map_err(Into::into)
    }
}
