/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod clock;
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
