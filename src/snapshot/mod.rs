/// Snapshot domain layer
///
/// Pure types and rules for topology snapshots: the data model, the freshness
/// and health policies, and the assembler that merges resolved sections.
/// Nothing in this module performs I/O.
pub mod domain;
pub mod policies;
pub mod services;
