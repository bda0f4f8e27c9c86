//! Unversioned handlers.

mod system;

pub use system::*;
