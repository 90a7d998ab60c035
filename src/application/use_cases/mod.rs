/// Use cases module containing application business logic orchestration
mod resolve_snapshot;

pub use resolve_snapshot::ResolveSnapshotUseCase;
