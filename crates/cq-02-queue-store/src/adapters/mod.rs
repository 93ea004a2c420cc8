//! Backend adapters implementing [`SortedSetStore`](crate::ports::SortedSetStore).

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::InMemorySortedSetStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisSortedSetStore;
