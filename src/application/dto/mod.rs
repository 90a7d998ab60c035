/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod output_format;
mod resolution_settings;
mod snapshot_request;

pub use output_format::OutputFormat;
pub use resolution_settings::{
    ResolutionSettings, DEFAULT_CACHE_TTL, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_REQUEST_DEADLINE,
};
pub use snapshot_request::SnapshotRequest;
