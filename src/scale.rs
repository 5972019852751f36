//! Conversion scales between a unit's displayed value and SI
//!
//! A [`Scale`] maps a value expressed in some unit to the value in the
//! standard (SI) unit of the same quantity, and back:
//!
//! | variant        | to standard           | from standard          |
//! |----------------|-----------------------|------------------------|
//! | `Identity`     | `x`                   | `x`                    |
//! | `Linear`       | `x · f`               | `x / f`                |
//! | `OffsetLinear` | `x · f + o`           | `(x − o) / f`          |
//! | `Grade`        | `atan(x · f + o)`     | `(tan(x) − o) / f`     |
//!
//! Grade converts a slope (rise over run, e.g. percent) to an angle.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, UnitError};

/// Conversion strategy of a unit
#[derive(Debug, Clone, Copy, Default)]
pub enum Scale {
    /// The unit is the standard unit
    #[default]
    Identity,
    /// Multiplicative factor to the standard unit
    Linear { factor: f64 },
    /// Factor followed by an offset (temperature scales)
    OffsetLinear { factor: f64, offset: f64 },
    /// Slope to angle: `atan(x · factor + offset)`
    Grade { factor: f64, offset: f64 },
}

impl Scale {
    /// Linear scale; rejects zero and non-finite factors
    pub fn linear(factor: f64) -> Result<Self> {
        check_factor(factor)?;
        Ok(Self::Linear { factor })
    }

    /// Offset-linear scale, `to(x) = x · factor + offset`
    pub fn offset_linear(factor: f64, offset: f64) -> Result<Self> {
        check_factor(factor)?;
        check_offset(offset)?;
        Ok(Self::OffsetLinear { factor, offset })
    }

    /// Grade scale, `to(x) = atan(x · factor + offset)`
    ///
    /// A percent slope has factor `0.01` and offset `0`: 10 % maps to about
    /// 5.71°.
    pub fn grade(factor: f64, offset: f64) -> Result<Self> {
        check_factor(factor)?;
        check_offset(offset)?;
        Ok(Self::Grade { factor, offset })
    }

    /// Convert a value in this unit to the standard unit
    #[inline]
    pub fn to_standard_unit(&self, value: f64) -> f64 {
        match *self {
            Self::Identity => value,
            Self::Linear { factor } => value * factor,
            Self::OffsetLinear { factor, offset } => value * factor + offset,
            Self::Grade { factor, offset } => (value * factor + offset).atan(),
        }
    }

    /// Convert a value in the standard unit to this unit
    #[inline]
    pub fn from_standard_unit(&self, value: f64) -> f64 {
        match *self {
            Self::Identity => value,
            Self::Linear { factor } => value / factor,
            Self::OffsetLinear { factor, offset } => (value - offset) / factor,
            Self::Grade { factor, offset } => (value.tan() - offset) / factor,
        }
    }

    /// Scale `s` with `s.to(x) == self.to(x · factor)`
    ///
    /// Used to derive a unit from an existing one: `factor` expresses one
    /// new unit in the existing unit.
    pub fn compose_linear(&self, factor: f64) -> Result<Self> {
        check_factor(factor)?;
        let composed = match *self {
            Self::Identity => Self::Linear { factor },
            Self::Linear { factor: f } => Self::Linear { factor: f * factor },
            Self::OffsetLinear { factor: f, offset } => Self::OffsetLinear {
                factor: f * factor,
                offset,
            },
            Self::Grade { factor: f, offset } => Self::Grade {
                factor: f * factor,
                offset,
            },
        };
        composed.validated()
    }

    /// Scale `s` with `s.to(x) == self.to(x · factor + offset)`
    pub fn compose_offset_linear(&self, factor: f64, offset: f64) -> Result<Self> {
        check_factor(factor)?;
        check_offset(offset)?;
        let composed = match *self {
            Self::Identity => Self::OffsetLinear { factor, offset },
            Self::Linear { factor: f } => Self::OffsetLinear {
                factor: f * factor,
                offset: f * offset,
            },
            Self::OffsetLinear { factor: f, offset: o } => Self::OffsetLinear {
                factor: f * factor,
                offset: f * offset + o,
            },
            Self::Grade { factor: f, offset: o } => Self::Grade {
                factor: f * factor,
                offset: f * offset + o,
            },
        };
        composed.validated()
    }

    /// Whether converting with this scale is a no-op
    pub fn is_base(&self) -> bool {
        match *self {
            Self::Identity => true,
            Self::Linear { factor } => factor == 1.0,
            _ => false,
        }
    }

    /// Whether the conversion is a pure multiplication
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Identity | Self::Linear { .. })
    }

    pub(crate) fn validated(self) -> Result<Self> {
        match self {
            Self::Identity => Ok(self),
            Self::Linear { factor } => {
                check_factor(factor)?;
                Ok(self)
            }
            Self::OffsetLinear { factor, offset } | Self::Grade { factor, offset } => {
                check_factor(factor)?;
                check_offset(offset)?;
                Ok(self)
            }
        }
    }

    fn parameter_bits(&self) -> (u8, u64, u64) {
        match *self {
            Self::Identity => (0, 0, 0),
            Self::Linear { factor } => (1, canonical_bits(factor), 0),
            Self::OffsetLinear { factor, offset } => {
                (2, canonical_bits(factor), canonical_bits(offset))
            }
            Self::Grade { factor, offset } => (3, canonical_bits(factor), canonical_bits(offset)),
        }
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if !factor.is_finite() || factor == 0.0 {
        return Err(UnitError::InvalidScaleParameter {
            parameter: "factor",
            value: factor,
        });
    }
    Ok(())
}

fn check_offset(offset: f64) -> Result<()> {
    if !offset.is_finite() {
        return Err(UnitError::InvalidScaleParameter {
            parameter: "offset",
            value: offset,
        });
    }
    Ok(())
}

/// Bit pattern with -0.0 folded into 0.0
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.parameter_bits() == other.parameter_bits()
    }
}

// Equality compares parameter bits, which is reflexive even for NaN
impl Eq for Scale {}

impl Hash for Scale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parameter_bits().hash(state);
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "IdentityScale"),
            Self::Linear { factor } => write!(f, "LinearScale [factor={}]", factor),
            Self::OffsetLinear { factor, offset } => {
                write!(f, "OffsetLinearScale [factor={}, offset={}]", factor, offset)
            }
            Self::Grade { factor, offset } => {
                write!(f, "GradeScale [factor={}, offset={}]", factor, offset)
            }
        }
    }
}
