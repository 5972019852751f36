//! SI (International System of Units) catalogue
//!
//! Provides the SI prefix table and the default quantities and units a
//! standard [`Registry`](crate::Registry) is preloaded with.

pub mod defaults;
pub mod prefixes;

pub use defaults::register_defaults;
pub use prefixes::{PREFIXES, SiPrefix};
