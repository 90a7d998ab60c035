use infra_snapshot::prelude::*;
use infra_snapshot::snapshot::domain::{EnvironmentDefinition, SourceRepository};

/// Mock DefinitionRepository for testing
pub struct MockDefinitionRepository {
    pub applications: Vec<ApplicationDefinition>,
    pub should_fail: bool,
}

impl MockDefinitionRepository {
    pub fn new() -> Self {
        Self {
            applications: Vec::new(),
            should_fail: false,
        }
    }

    /// Repository holding "billing" with dev and prod environments
    pub fn billing() -> Self {
        Self::new().with_application(
            ApplicationDefinition::new(
                "billing",
                SourceRepository::new("billing", "git@example.com:org/billing.git"),
                "us-east-1",
                vec![
                    EnvironmentDefinition::new(EnvironmentName::Dev, "billing-dev-pipeline", "111"),
                    EnvironmentDefinition::new(
                        EnvironmentName::Prod,
                        "billing-prod-pipeline",
                        "222",
                    ),
                ],
            )
            .with_description("Invoicing service"),
        )
    }

    pub fn with_application(mut self, application: ApplicationDefinition) -> Self {
        self.applications.push(application);
        self
    }

    pub fn with_failure() -> Self {
        Self {
            applications: Vec::new(),
            should_fail: true,
        }
    }
}

impl Default for MockDefinitionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionRepository for MockDefinitionRepository {
    fn load_application(&self, app_name: &str) -> Result<Option<ApplicationDefinition>> {
        if self.should_fail {
            anyhow::bail!("Mock definition repository failure");
        }

        Ok(self
            .applications
            .iter()
            .find(|app| app.name() == app_name)
            .cloned())
    }
}
