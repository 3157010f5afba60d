//! Indexable spaces of GPU thread-tile assignments.
//!
//! A [space::ConfigSpace] holds every legal assignment of tile sizes to the dimensions of a
//! loop nest under a thread budget, and maps each to a dense index and back without
//! enumerating the space.

pub mod common;
pub mod counts;
pub mod point;
pub mod pprint;
pub mod quotients;
pub mod space;
pub mod task;
pub mod utils;

pub use point::ConfigPoint;
pub use space::{ConfigSpace, DomainError, RangeError};
