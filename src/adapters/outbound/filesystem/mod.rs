/// Filesystem adapters for definition loading and output
mod definition_reader;
mod file_writer;

pub use definition_reader::FileSystemDefinitionRepository;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
