/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (gateway, file system, console, clock).
pub mod clock;
pub mod definition_repository;
pub mod formatter;
pub mod gateway_models;
pub mod infrastructure_gateway;
pub mod output_presenter;
pub mod progress_reporter;

pub use clock::Clock;
pub use definition_repository::DefinitionRepository;
pub use formatter::SnapshotFormatter;
pub use infrastructure_gateway::InfrastructureGateway;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
