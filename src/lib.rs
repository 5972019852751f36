//! Units of Measure Core
//!
//! Runtime dimensional analysis for scientific computing: numbers tagged
//! with physical units, automatic conversion between units of the same
//! dimension, and arithmetic that derives result units from dimensions.
//!
//! # Key Features
//!
//! - **Dimension vectors**: exponents over the 7 SI base dimensions plus
//!   plane and solid angle, parsed from signatures like `kg.m^2/s^3`
//! - **Scales**: identity, linear, offset-linear (temperatures) and grade
//!   (slope to angle) conversions to SI
//! - **Registry**: quantities and units by name, id, abbreviation or
//!   dimension; anonymous SI units synthesised on demand
//! - **Indexed storage**: dense/sparse, copy-on-write vectors and matrices
//!
//! # Example
//!
//! ```
//! use sounio_units::prelude::*;
//!
//! let registry = Registry::new();
//! let km = registry.unit_by_abbreviation("km").unwrap();
//! let h = registry.unit_by_abbreviation("h").unwrap();
//!
//! let speed = divide(&registry, &Scalar::new(120.0, &km), &Scalar::new(1.5, &h)).unwrap();
//! assert_eq!(speed.unit().id(), "m/s");
//!
//! // cannot add different dimensions
//! assert!(Scalar::new(1.0, &km).add(&Scalar::new(1.0, &h)).is_err());
//! ```

pub mod dimension;
pub mod error;
pub mod quantity;
pub mod registry;
pub mod scale;
pub mod si;
pub mod storage;
pub mod unit;
pub mod value;

// Re-exports
pub use dimension::{BaseDimension, DimensionOp, DimensionVector};
pub use error::{Result, UnitError};
pub use quantity::Quantity;
pub use registry::{Registered, Registry, RegistryConfig};
pub use scale::Scale;
pub use storage::{IndexedStorage, StorageLayout};
pub use unit::{SiPrefixes, Unit, UnitBuilder, UnitSystem};
pub use value::{
    ArithmeticOp, IndexedValue, Matrix, Scalar, Vector, divide, divide_elementwise, multiply,
    multiply_elementwise, power,
};

/// Prelude for common imports
pub mod prelude {
    pub use super::dimension::{BaseDimension, DimensionVector};
    pub use super::error::UnitError;
    pub use super::quantity::Quantity;
    pub use super::registry::{Registry, RegistryConfig};
    pub use super::scale::Scale;
    pub use super::storage::{IndexedStorage, StorageLayout};
    pub use super::unit::{SiPrefixes, Unit, UnitSystem};
    pub use super::value::{
        IndexedValue, Matrix, Scalar, Vector, divide, divide_elementwise, multiply,
        multiply_elementwise, power,
    };
}
