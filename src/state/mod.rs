// Process-local state

pub mod memory_store;
