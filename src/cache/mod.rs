//! Cache module for time-boxed API responses
//!
//! This module provides a cache that persists API responses into a
//! [`KeyValueStore`](crate::store::KeyValueStore) together with their write
//! timestamp. Entries older than the TTL (one hour by default) read as absent,
//! as does anything that cannot be decoded.

mod clock;
mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{TimedCache, CACHE_TTL};
