//! A concurrent in-memory map where entries expire after a period of inactivity.
//!
//! Every read of a live entry extends its life by the full ttl, so hot keys stay cached
//! while idle keys are reclaimed by a background reaper thread.
//!
//! # Quick Start
//! ```rust
//! use ttl_map::TtlMap;
//! use std::time::Duration;
//!
//! let sessions = TtlMap::new(Duration::from_secs(60)).unwrap();
//!
//! sessions.insert("alice", 42);
//! assert_eq!(sessions.get("alice"), Some(42));
//! assert_eq!(sessions.get("bob"), None);
//!
//! sessions.close();
//! ```

mod entry;
mod reaper;

/// The map itself and its builder
pub mod map;
#[doc(inline)]
pub use map::builder::TtlMapBuilder;
#[doc(inline)]
pub use map::{ReadMode, TtlMap};

pub mod error;
#[doc(inline)]
pub use error::Error;

#[doc(hidden)]
pub mod constants_for_benchmarking;
