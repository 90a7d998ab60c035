use crate::snapshot::domain::ApplicationDefinition;
use crate::shared::Result;

/// DefinitionRepository port for loading application definitions
///
/// This port abstracts the definition store (a directory of files, a
/// configuration service, etc.) that supplies the static identity of an
/// application and its environments.
pub trait DefinitionRepository: Send + Sync {
    /// Loads the definition of an application by name
    ///
    /// # Returns
    /// `Ok(None)` when no definition exists for `app_name`.
    ///
    /// # Errors
    /// Returns an error if a definition exists but cannot be read, parsed,
    /// or fails validation.
    fn load_application(&self, app_name: &str) -> Result<Option<ApplicationDefinition>>;
}
