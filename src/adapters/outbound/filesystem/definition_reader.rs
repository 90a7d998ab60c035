use crate::ports::outbound::DefinitionRepository;
use crate::shared::error::SnapshotError;
use crate::shared::security::{validate_definition_file, validate_resource_name, MAX_DEFINITION_FILE_SIZE};
use crate::shared::Result;
use crate::snapshot::domain::ApplicationDefinition;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions tried for `app_<name>`, in order.
const DEFINITION_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// FileSystemDefinitionRepository adapter for reading application definitions
///
/// Implements the DefinitionRepository port over a directory holding one
/// `app_<name>.json`, `app_<name>.yaml` or `app_<name>.yml` file per
/// application. The first existing file wins.
pub struct FileSystemDefinitionRepository {
    directory: PathBuf,
}

impl FileSystemDefinitionRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn locate(&self, app_name: &str) -> Option<PathBuf> {
        DEFINITION_EXTENSIONS
            .iter()
            .map(|ext| self.directory.join(format!("app_{}.{}", app_name, ext)))
            .find(|path| fs::symlink_metadata(path).is_ok())
    }

    /// Reads a definition file with security checks
    fn read(path: &Path) -> Result<String> {
        validate_definition_file(path, MAX_DEFINITION_FILE_SIZE).map_err(|e| {
            SnapshotError::DefinitionReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        fs::read_to_string(path).map_err(|e| {
            SnapshotError::DefinitionReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }

    fn parse(path: &Path, content: &str) -> Result<ApplicationDefinition> {
        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        let parsed = if is_json {
            serde_json::from_str::<ApplicationDefinition>(content).map_err(|e| e.to_string())
        } else {
            serde_yaml_ng::from_str::<ApplicationDefinition>(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|details| {
            SnapshotError::InvalidDefinition {
                path: path.to_path_buf(),
                details,
            }
            .into()
        })
    }
}

impl DefinitionRepository for FileSystemDefinitionRepository {
    fn load_application(&self, app_name: &str) -> Result<Option<ApplicationDefinition>> {
        // The name becomes part of a file name.
        validate_resource_name(app_name, "Application name").map_err(|e| {
            SnapshotError::Validation {
                message: e.to_string(),
            }
        })?;

        let Some(path) = self.locate(app_name) else {
            tracing::debug!(app = app_name, dir = %self.directory.display(), "no definition file");
            return Ok(None);
        };

        tracing::debug!(path = %path.display(), "loading application definition");
        let content = Self::read(&path)?;
        let definition = Self::parse(&path, &content)?;

        let invalid = |details: String| SnapshotError::InvalidDefinition {
            path: path.clone(),
            details,
        };
        definition.validate().map_err(|e| invalid(e.to_string()))?;
        if definition.name() != app_name {
            return Err(invalid(format!(
                "File declares application '{}' but is named for '{}'",
                definition.name(),
                app_name
            ))
            .into());
        }

        Ok(Some(definition))
    }
}
