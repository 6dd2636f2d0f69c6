mod filter;
mod memory;

pub use memory::{Dataset, MemoryEngine};
