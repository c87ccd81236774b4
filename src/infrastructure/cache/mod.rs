//! Cache infrastructure - response cache backends

mod factory;
mod in_memory;
mod json_file;

pub use factory::{CacheConfig, CacheFactory, CacheType, DEFAULT_CACHE_FILE};
pub use in_memory::InMemoryCacheStore;
pub use json_file::JsonFileCacheStore;
