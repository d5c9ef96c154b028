//! Tessel Core
//!
//! Shared value types used across the IR, the compiler passes, and the
//! incremental package-part lookup.

pub mod names;
pub mod values;

pub use names::{FqName, InternalName, Name, NameError};
pub use values::{ConstKind, ConstValue};
