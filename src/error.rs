//! Error types for the units core
//!
//! Every failure is raised at the call that caused it. Lookup misses are
//! not errors: registry and quantity lookups return `Option`.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, UnitError>;

/// Errors raised by dimension parsing, scales, the registry and storage
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum UnitError {
    /// Malformed dimension signature
    #[error("Invalid dimension signature `{signature}`: {reason}")]
    #[diagnostic(
        code(units::parse),
        help("Signatures combine kg, m, s, A, K, mol, cd, rad and sr with optional exponents, e.g. `kg.m^2/s^3`; at most one `/` is allowed")
    )]
    Parse {
        reason: String,
        #[source_code]
        signature: String,
        #[label("{reason}")]
        span: SourceSpan,
    },

    /// Operands of an add/subtract/compare/convert have different dimensions
    #[error("Dimension mismatch in {operation}: [{left}] vs [{right}]")]
    #[diagnostic(code(units::dimension_mismatch))]
    DimensionMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// A multiply, divide or power produced an exponent outside `i8`
    #[error("Exponent overflow in {operation}: [{left}] and {right}")]
    #[diagnostic(
        code(units::exponent_overflow),
        help("Dimension exponents must stay within -128..=127")
    )]
    ExponentOverflow {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// Zero or non-finite scale parameter
    #[error("Invalid scale parameter {parameter} = {value}")]
    #[diagnostic(
        code(units::invalid_scale),
        help("Scale factors must be finite and non-zero; offsets must be finite")
    )]
    InvalidScaleParameter { parameter: &'static str, value: f64 },

    /// Write attempted on immutable storage
    #[error("Attempt to modify an immutable value")]
    #[diagnostic(
        code(units::immutable),
        help("Call `mutable()` to obtain a mutable copy before writing")
    )]
    ImmutableMutation,

    /// Id or abbreviation already taken
    #[error("`{key}` is already registered in quantity {quantity}")]
    #[diagnostic(code(units::registration_conflict))]
    RegistrationConflict { key: String, quantity: String },

    /// Quantity name already used for other dimensions
    #[error("Quantity name `{name}` is already used for [{dimensions}]")]
    #[diagnostic(code(units::quantity_name_taken))]
    QuantityNameTaken { name: String, dimensions: String },

    /// Empty name or id
    #[error("{what} must not be empty")]
    #[diagnostic(code(units::empty_name))]
    EmptyName { what: &'static str },

    /// The quantity a unit is being attached to is no longer registered
    #[error("Quantity {name} is not registered")]
    #[diagnostic(code(units::unregistered_quantity))]
    UnregisteredQuantity { name: String },

    /// Storage index out of range
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} storage")]
    #[diagnostic(code(units::index_out_of_bounds))]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Element-wise operation on storages of different shapes
    #[error("Shape mismatch: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    #[diagnostic(code(units::shape_mismatch))]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

impl UnitError {
    pub(crate) fn parse(signature: &str, reason: impl Into<String>, offset: usize, len: usize) -> Self {
        Self::Parse {
            reason: reason.into(),
            signature: signature.to_string(),
            span: (offset, len).into(),
        }
    }

    pub(crate) fn mismatch(
        operation: &'static str,
        left: &crate::DimensionVector,
        right: &crate::DimensionVector,
    ) -> Self {
        Self::DimensionMismatch {
            operation,
            left: left.to_canonical_string(),
            right: right.to_canonical_string(),
        }
    }

    /// Check if this error is a signature parse failure
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
