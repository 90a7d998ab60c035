use crate::shared::error::SnapshotError;
use crate::shared::security::validate_resource_name;
use crate::shared::Result;
use crate::snapshot::domain::Section;
use std::collections::BTreeSet;

/// SnapshotRequest - Request DTO for the snapshot resolution use case
///
/// The environment is kept as the caller's raw string so that an unknown
/// environment is reported against the application's definition rather than
/// as an argument error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    app_name: String,
    environment: String,
    sections: BTreeSet<Section>,
}

impl SnapshotRequest {
    /// Builds a validated request. An empty section set requests every section.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Validation`] when the application or
    /// environment name contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(
        app_name: impl Into<String>,
        environment: impl Into<String>,
        sections: impl IntoIterator<Item = Section>,
    ) -> Result<Self> {
        let app_name = app_name.into().trim().to_string();
        let environment = environment.into().trim().to_ascii_lowercase();

        for (value, kind) in [(&app_name, "Application name"), (&environment, "Environment")] {
            validate_resource_name(value, kind).map_err(|e| SnapshotError::Validation {
                message: e.to_string(),
            })?;
        }

        let mut sections: BTreeSet<Section> = sections.into_iter().collect();
        if sections.is_empty() {
            sections.extend(Section::ALL);
        }

        Ok(Self {
            app_name,
            environment,
            sections,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn sections(&self) -> &BTreeSet<Section> {
        &self.sections
    }
}
