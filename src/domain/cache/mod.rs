//! Response cache domain - query text to rendered itinerary

mod store;

pub use store::CacheStore;

#[cfg(test)]
pub use store::MockCacheStore;
