//! infra-snapshot - topology snapshots of deployed applications
//!
//! This library resolves a point-in-time "snapshot" of an application's cloud
//! infrastructure (pipeline, compute service, load balancer, certificate,
//! database, storage, logs, cost, tickets and security findings) by walking
//! from the deploy pipeline through its deploy configuration to the concrete
//! resources it provisions. Every lookup may fail independently; failures
//! degrade only the section they feed. Snapshots are cached per
//! (application, environment) with section-level freshness.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`snapshot`): snapshot model, freshness and health policies, assembler
//! - **Application Layer** (`application`): resolvers, cache, use case and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use infra_snapshot::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! let settings = ResolutionSettings::default();
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//! let cache = Arc::new(SnapshotCache::new(settings.cache_ttl, Arc::clone(&clock)));
//!
//! let use_case = ResolveSnapshotUseCase::new(
//!     Arc::new(HttpInfrastructureGateway::new("http://gateway.local", Duration::from_secs(10))?),
//!     FileSystemDefinitionRepository::new("./definitions"),
//!     StderrProgressReporter::new(),
//!     cache,
//!     clock,
//!     settings,
//! );
//!
//! let request = SnapshotRequest::new("billing", "prod", [Section::Ecs, Section::Alb])?;
//! let snapshot = use_case.execute(request).await?;
//! println!("{}", JsonFormatter::new().format(&snapshot)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod shared;
pub mod snapshot;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::clock::SystemClock;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemDefinitionRepository, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::network::HttpInfrastructureGateway;
    pub use crate::application::cache::SnapshotCache;
    pub use crate::application::dto::{OutputFormat, ResolutionSettings, SnapshotRequest};
    pub use crate::application::use_cases::ResolveSnapshotUseCase;
    pub use crate::ports::inbound::SnapshotResolutionPort;
    pub use crate::ports::outbound::{
        Clock, DefinitionRepository, InfrastructureGateway, OutputPresenter, ProgressReporter,
        SnapshotFormatter,
    };
    pub use crate::shared::error::{ExitCode, SnapshotError};
    pub use crate::shared::Result;
    pub use crate::snapshot::domain::{
        AppSnapshot, AppStatus, ApplicationDefinition, EnvironmentName, Health, Section,
    };
}
