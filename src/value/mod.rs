//! Unit-tagged values
//!
//! [`Scalar`], [`Vector`] and [`Matrix`] hold SI numbers together with the
//! [`Unit`] they are displayed in. Addition and subtraction require equal
//! dimensions; multiplication, division and powers derive the result unit
//! from the operands' dimensions through a [`Registry`].

pub mod matrix;
pub mod scalar;
pub mod vector;

pub use matrix::Matrix;
pub use scalar::Scalar;
pub use vector::Vector;

use std::sync::Arc;

use num_traits::Float;

use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::registry::Registry;
use crate::storage::IndexedStorage;
use crate::unit::Unit;

/// Arithmetic operations for dimension checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "subtract",
            Self::Mul => "multiply",
            Self::Div => "divide",
        }
    }
}

/// Dimensions of `left op right`
///
/// Addition and subtraction require equal dimensions.
pub fn check_operation_compatibility(
    left: DimensionVector,
    right: DimensionVector,
    op: ArithmeticOp,
) -> Result<DimensionVector> {
    match op {
        ArithmeticOp::Add | ArithmeticOp::Sub => {
            if left == right {
                Ok(left)
            } else {
                Err(UnitError::mismatch(op.name(), &left, &right))
            }
        }
        ArithmeticOp::Mul => left.mul(&right).ok_or_else(|| overflow(op, &left, &right)),
        ArithmeticOp::Div => left.div(&right).ok_or_else(|| overflow(op, &left, &right)),
    }
}

/// Vector and matrix values: an SI storage plus a display unit
pub trait IndexedValue<T: Float>: Sized {
    fn storage(&self) -> &IndexedStorage<T>;

    fn unit(&self) -> &Arc<Unit>;

    /// Reassemble from an SI storage and a unit of matching dimensions
    fn from_parts(storage: IndexedStorage<T>, unit: Arc<Unit>) -> Self;
}

/// `a · b`, in the standard unit of the product's dimensions
pub fn multiply<T: Float>(registry: &Registry, a: &Scalar<T>, b: &Scalar<T>) -> Result<Scalar<T>> {
    let dimensions =
        check_operation_compatibility(a.dimensions(), b.dimensions(), ArithmeticOp::Mul)?;
    let unit = registry.lookup_or_create_unit_with_dimensions(dimensions);
    Ok(Scalar::from_si(a.si() * b.si(), &unit))
}

/// `a / b`, in the standard unit of the quotient's dimensions
pub fn divide<T: Float>(registry: &Registry, a: &Scalar<T>, b: &Scalar<T>) -> Result<Scalar<T>> {
    let dimensions =
        check_operation_compatibility(a.dimensions(), b.dimensions(), ArithmeticOp::Div)?;
    let unit = registry.lookup_or_create_unit_with_dimensions(dimensions);
    Ok(Scalar::from_si(a.si() / b.si(), &unit))
}

/// `a^n`, in the standard unit of the resulting dimensions
pub fn power<T: Float>(registry: &Registry, a: &Scalar<T>, n: i8) -> Result<Scalar<T>> {
    let dimensions = a.dimensions().power(n).ok_or_else(|| UnitError::ExponentOverflow {
        operation: "power",
        left: a.dimensions().to_canonical_string(),
        right: n.to_string(),
    })?;
    let unit = registry.lookup_or_create_unit_with_dimensions(dimensions);
    Ok(Scalar::from_si(a.si().powi(i32::from(n)), &unit))
}

/// Element-wise `a · b` of two vectors or matrices of equal shape
pub fn multiply_elementwise<T: Float, V: IndexedValue<T>>(
    registry: &Registry,
    a: &V,
    b: &V,
) -> Result<V> {
    let dimensions = check_operation_compatibility(
        a.unit().dimensions(),
        b.unit().dimensions(),
        ArithmeticOp::Mul,
    )?;
    let storage = a.storage().zip_with(b.storage(), |x, y| x * y)?;
    let unit = registry.lookup_or_create_unit_with_dimensions(dimensions);
    Ok(V::from_parts(storage, unit))
}

/// Element-wise `a / b` of two vectors or matrices of equal shape
pub fn divide_elementwise<T: Float, V: IndexedValue<T>>(
    registry: &Registry,
    a: &V,
    b: &V,
) -> Result<V> {
    let dimensions = check_operation_compatibility(
        a.unit().dimensions(),
        b.unit().dimensions(),
        ArithmeticOp::Div,
    )?;
    let storage = a.storage().zip_with(b.storage(), |x, y| x / y)?;
    let unit = registry.lookup_or_create_unit_with_dimensions(dimensions);
    Ok(V::from_parts(storage, unit))
}

fn overflow(op: ArithmeticOp, left: &DimensionVector, right: &DimensionVector) -> UnitError {
    UnitError::ExponentOverflow {
        operation: op.name(),
        left: left.to_canonical_string(),
        right: format!("[{}]", right.to_canonical_string()),
    }
}

/// Value in `unit` to SI
pub(crate) fn to_si<T: Float>(unit: &Unit, value: T) -> T {
    if unit.is_standard() {
        return value;
    }
    cast(unit.to_standard(value.to_f64().unwrap_or(f64::NAN)))
}

/// SI value to `unit`
pub(crate) fn from_si<T: Float>(unit: &Unit, si: T) -> T {
    if unit.is_standard() {
        return si;
    }
    cast(unit.from_standard(si.to_f64().unwrap_or(f64::NAN)))
}

fn cast<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(|| {
        if value.is_sign_negative() {
            T::neg_infinity()
        } else {
            T::infinity()
        }
    })
}
