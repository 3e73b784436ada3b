mod local_store;
mod memory_store;

pub use local_store::LocalMediaStore;
pub use memory_store::InMemoryMediaStore;
