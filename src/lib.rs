//! # dynhash
//!
//! Four dynamically growing hash sets of `u64` keys, side by side:
//!
//! - [`LinearSet`]: open addressing with linear probing, doubled when full
//! - [`CuckooSet`]: two tables with cuckoo displacement and full rehashing
//! - [`ExtendibleSet`]: a directory of multi-key buckets split on overflow
//! - [`HybridSet`]: two extendible directories of single-key buckets linked
//!   by cuckoo displacement, splitting only the contended bucket
//!
//! All four implement [`KeySet`] and report the same [`Stats`], so they can
//! be driven and compared through one interface.
//!
//! ## Example
//!
//! ```rust
//! use dynhash::ExtendibleSet;
//!
//! let mut set = ExtendibleSet::new();
//! assert!(set.insert(7));
//! assert!(!set.insert(7));
//! assert!(set.contains(7));
//! assert_eq!(set.len(), 1);
//! ```

pub mod bucket;
pub mod config;
pub mod cuckoo;
mod directory;
pub mod error;
pub mod extendible;
pub mod hash;
pub mod hybrid;
pub mod iter;
pub mod linear;
pub mod set;
pub mod stats;

#[cfg(test)]
mod proptests;

pub use config::{CuckooConfig, ExtendibleConfig, HybridConfig, LinearConfig};
pub use cuckoo::CuckooSet;
pub use error::{Error, Result};
pub use extendible::ExtendibleSet;
pub use hash::{KeyHasher, MixHasher, Side};
pub use hybrid::HybridSet;
pub use linear::LinearSet;
pub use set::KeySet;
pub use stats::{Counters, Stats};
