// Adapters layer: concrete implementations of the ledger store port.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
