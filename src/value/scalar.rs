//! Unit-tagged scalar

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::sync::Arc;

use num_traits::Float;

use super::{ArithmeticOp, check_operation_compatibility, from_si, to_si};
use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::unit::Unit;

/// A number with a unit
///
/// The value is kept in SI; [`value`](Scalar::value) converts it to the
/// display unit on the way out.
#[derive(Debug, Clone)]
pub struct Scalar<T> {
    si: T,
    unit: Arc<Unit>,
}

impl<T: Float> Scalar<T> {
    /// `value` expressed in `unit`
    pub fn new(value: T, unit: &Arc<Unit>) -> Self {
        Self {
            si: to_si(unit, value),
            unit: Arc::clone(unit),
        }
    }

    /// SI value, displayed in `unit`
    pub fn from_si(si: T, unit: &Arc<Unit>) -> Self {
        Self {
            si,
            unit: Arc::clone(unit),
        }
    }

    /// Value in the display unit
    pub fn value(&self) -> T {
        from_si(&self.unit, self.si)
    }

    /// Value in the standard unit of the dimension
    pub fn si(&self) -> T {
        self.si
    }

    pub fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    pub fn dimensions(&self) -> DimensionVector {
        self.unit.dimensions()
    }

    /// Value expressed in `unit`
    pub fn in_unit(&self, unit: &Unit) -> Result<T> {
        if self.dimensions() != unit.dimensions() {
            return Err(UnitError::mismatch("convert", &self.dimensions(), &unit.dimensions()));
        }
        Ok(from_si(unit, self.si))
    }

    /// Same value displayed in `unit`
    pub fn to_unit(&self, unit: &Arc<Unit>) -> Result<Self> {
        self.in_unit(unit)?;
        Ok(Self::from_si(self.si, unit))
    }

    /// Sum, displayed in this value's unit
    pub fn add(&self, other: &Self) -> Result<Self> {
        check_operation_compatibility(self.dimensions(), other.dimensions(), ArithmeticOp::Add)?;
        Ok(Self::from_si(self.si + other.si, &self.unit))
    }

    /// Difference, displayed in this value's unit
    pub fn sub(&self, other: &Self) -> Result<Self> {
        check_operation_compatibility(self.dimensions(), other.dimensions(), ArithmeticOp::Sub)?;
        Ok(Self::from_si(self.si - other.si, &self.unit))
    }

    /// Order by SI value; NaN sorts after every number
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        if self.dimensions() != other.dimensions() {
            return Err(UnitError::mismatch(
                "compare",
                &self.dimensions(),
                &other.dimensions(),
            ));
        }
        Ok(self
            .si
            .partial_cmp(&other.si)
            .unwrap_or_else(|| self.si.is_nan().cmp(&other.si.is_nan())))
    }

    /// Multiply by a pure number
    pub fn scale_by(&self, factor: T) -> Self {
        Self::from_si(self.si * factor, &self.unit)
    }

    pub fn abs(&self) -> Self {
        Self::from_si(self.si.abs(), &self.unit)
    }

    pub fn is_zero(&self) -> bool {
        self.si.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.si.is_finite()
    }
}

impl<T: Float> Neg for Scalar<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            si: -self.si,
            unit: self.unit,
        }
    }
}

impl<T: Float> PartialEq for Scalar<T> {
    /// Equal dimensions and SI values, whatever the display units
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.si == other.si
    }
}

impl<T: Float + fmt::Display> fmt::Display for Scalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)
    }
}
