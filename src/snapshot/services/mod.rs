mod naming;
mod snapshot_assembler;

pub use naming::ResourceNaming;
pub use snapshot_assembler::{ResolvedSections, SnapshotAssembler, NOT_AVAILABLE};
