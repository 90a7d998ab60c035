/// Mock implementations for testing
mod mock_clock;
mod mock_definition_repository;
mod mock_infrastructure_gateway;
mod mock_progress_reporter;

pub use mock_clock::MockClock;
pub use mock_definition_repository::MockDefinitionRepository;
pub use mock_infrastructure_gateway::{listener, MockInfrastructureGateway};
pub use mock_progress_reporter::MockProgressReporter;
