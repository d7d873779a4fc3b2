//! Key/value persistence for attribution state

mod backend;
mod cookie;
mod file;
mod memory;
mod paths;
mod tiered;

pub use backend::{StorageBackend, StorageError};
pub use cookie::CookieJar;
pub use file::{atomic_write, FileStore};
pub use memory::MemoryStore;
pub use paths::{Paths, HOME_ENV};
pub use tiered::TieredStorage;
