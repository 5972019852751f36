//! SI dimension vectors
//!
//! Every physical quantity has dimensions in the 7 SI base quantities,
//! plus two extension slots for plane and solid angle so that radians and
//! steradians stay distinguishable from pure numbers.
//!
//! Dimensions are written as signatures such as `kg.m^2/s^3` or the
//! compact `kgm2/s3`; see [`DimensionVector::parse`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, UnitError};

/// One slot of a [`DimensionVector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseDimension {
    /// Mass [M] - kilogram
    Mass,
    /// Length [L] - meter
    Length,
    /// Time [T] - second
    Time,
    /// Electric current [I] - ampere
    Current,
    /// Thermodynamic temperature [Θ] - kelvin
    Temperature,
    /// Amount of substance [N] - mole
    Amount,
    /// Luminous intensity [J] - candela
    Luminosity,
    /// Plane angle - radian
    Angle,
    /// Solid angle - steradian
    SolidAngle,
}

impl BaseDimension {
    /// Number of slots in a dimension vector
    pub const COUNT: usize = 9;

    /// All slots in canonical order
    pub const ALL: [BaseDimension; Self::COUNT] = [
        Self::Mass,
        Self::Length,
        Self::Time,
        Self::Current,
        Self::Temperature,
        Self::Amount,
        Self::Luminosity,
        Self::Angle,
        Self::SolidAngle,
    ];

    /// Position of this slot in the exponent array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Signature symbol (`kg`, `m`, `s`, ...)
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Length => "m",
            Self::Time => "s",
            Self::Current => "A",
            Self::Temperature => "K",
            Self::Amount => "mol",
            Self::Luminosity => "cd",
            Self::Angle => "rad",
            Self::SolidAngle => "sr",
        }
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Length => "length",
            Self::Time => "time",
            Self::Current => "electric current",
            Self::Temperature => "temperature",
            Self::Amount => "amount of substance",
            Self::Luminosity => "luminous intensity",
            Self::Angle => "plane angle",
            Self::SolidAngle => "solid angle",
        }
    }

    /// Match a base symbol at the start of `text`
    ///
    /// The longest symbol wins unless what follows it cannot start another
    /// term, so `srad` reads as `s·rad` while `sr2` stays `sr²`.
    fn match_prefix(text: &str) -> Option<(BaseDimension, usize)> {
        // `mol` must win over `m`, `sr` over `s`
        const BY_LENGTH: [BaseDimension; BaseDimension::COUNT] = [
            BaseDimension::Amount,
            BaseDimension::Angle,
            BaseDimension::Mass,
            BaseDimension::Luminosity,
            BaseDimension::SolidAngle,
            BaseDimension::Length,
            BaseDimension::Time,
            BaseDimension::Current,
            BaseDimension::Temperature,
        ];
        let mut candidates = BY_LENGTH
            .iter()
            .filter(|base| text.starts_with(base.symbol()))
            .map(|base| (*base, base.symbol().len()));
        let longest = candidates.next()?;
        let continues = |len: usize| {
            let rest = &text[len..];
            !rest.starts_with(char::is_alphabetic)
                || BY_LENGTH.iter().any(|base| rest.starts_with(base.symbol()))
        };
        if continues(longest.1) {
            return Some(longest);
        }
        Some(candidates.find(|&(_, len)| continues(len)).unwrap_or(longest))
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How two dimension vectors are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionOp {
    /// Add exponents
    Multiply,
    /// Subtract exponents
    Divide,
}

/// Exponents of the base dimensions
///
/// Derived dimensions are expressed as products of powers:
/// - Velocity = m s⁻¹
/// - Force = kg m s⁻²
/// - Resistance = kg m² s⁻³ A⁻²
///
/// Two vectors are equal iff all exponents are equal; values of unequal
/// dimensions can never be added, subtracted or compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DimensionVector {
    exponents: [i8; BaseDimension::COUNT],
}

impl DimensionVector {
    // ==========================================================================
    // Base Dimensions
    // ==========================================================================

    /// Dimensionless (pure number)
    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0, 0, 0, 0);

    /// Mass - kilogram
    pub const MASS: Self = Self::new(1, 0, 0, 0, 0, 0, 0);

    /// Length - meter
    pub const LENGTH: Self = Self::new(0, 1, 0, 0, 0, 0, 0);

    /// Time - second
    pub const TIME: Self = Self::new(0, 0, 1, 0, 0, 0, 0);

    /// Electric current - ampere
    pub const CURRENT: Self = Self::new(0, 0, 0, 1, 0, 0, 0);

    /// Temperature - kelvin
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 0, 1, 0, 0);

    /// Amount of substance - mole
    pub const AMOUNT: Self = Self::new(0, 0, 0, 0, 0, 1, 0);

    /// Luminous intensity - candela
    pub const LUMINOSITY: Self = Self::new(0, 0, 0, 0, 0, 0, 1);

    /// Plane angle - radian
    pub const ANGLE: Self = Self::from_exponents([0, 0, 0, 0, 0, 0, 0, 1, 0]);

    /// Solid angle - steradian
    pub const SOLID_ANGLE: Self = Self::from_exponents([0, 0, 0, 0, 0, 0, 0, 0, 1]);

    // ==========================================================================
    // Common Derived Dimensions
    // ==========================================================================

    /// Area [m²]
    pub const AREA: Self = Self::new(0, 2, 0, 0, 0, 0, 0);

    /// Volume [m³]
    pub const VOLUME: Self = Self::new(0, 3, 0, 0, 0, 0, 0);

    /// Velocity [m s⁻¹]
    pub const VELOCITY: Self = Self::new(0, 1, -1, 0, 0, 0, 0);

    /// Acceleration [m s⁻²]
    pub const ACCELERATION: Self = Self::new(0, 1, -2, 0, 0, 0, 0);

    /// Frequency [s⁻¹] - hertz
    pub const FREQUENCY: Self = Self::new(0, 0, -1, 0, 0, 0, 0);

    /// Angular velocity [rad s⁻¹]
    pub const ANGULAR_VELOCITY: Self = Self::from_exponents([0, 0, -1, 0, 0, 0, 0, 1, 0]);

    /// Force [kg m s⁻²] - newton
    pub const FORCE: Self = Self::new(1, 1, -2, 0, 0, 0, 0);

    /// Energy [kg m² s⁻²] - joule
    pub const ENERGY: Self = Self::new(1, 2, -2, 0, 0, 0, 0);

    /// Power [kg m² s⁻³] - watt
    pub const POWER: Self = Self::new(1, 2, -3, 0, 0, 0, 0);

    /// Pressure [kg m⁻¹ s⁻²] - pascal
    pub const PRESSURE: Self = Self::new(1, -1, -2, 0, 0, 0, 0);

    /// Mass density [kg m⁻³]
    pub const DENSITY: Self = Self::new(1, -3, 0, 0, 0, 0, 0);

    /// Electric charge [s A] - coulomb
    pub const CHARGE: Self = Self::new(0, 0, 1, 1, 0, 0, 0);

    /// Voltage [kg m² s⁻³ A⁻¹] - volt
    pub const VOLTAGE: Self = Self::new(1, 2, -3, -1, 0, 0, 0);

    /// Resistance [kg m² s⁻³ A⁻²] - ohm
    pub const RESISTANCE: Self = Self::new(1, 2, -3, -2, 0, 0, 0);

    /// Capacitance [kg⁻¹ m⁻² s⁴ A²] - farad
    pub const CAPACITANCE: Self = Self::new(-1, -2, 4, 2, 0, 0, 0);

    // ==========================================================================
    // Constructors
    // ==========================================================================

    /// Create a dimension from the 7 SI exponents (angle slots zero)
    pub const fn new(
        mass: i8,
        length: i8,
        time: i8,
        current: i8,
        temperature: i8,
        amount: i8,
        luminosity: i8,
    ) -> Self {
        Self {
            exponents: [mass, length, time, current, temperature, amount, luminosity, 0, 0],
        }
    }

    /// Create a dimension from all exponents in [`BaseDimension::ALL`] order
    pub const fn from_exponents(exponents: [i8; BaseDimension::COUNT]) -> Self {
        Self { exponents }
    }

    /// Parse a dimension signature
    ///
    /// Terms are base symbols followed by an optional exponent, optionally
    /// introduced by `^` and optionally negative. Terms are joined by `.`
    /// (or `*`, `·`, whitespace) or written back to back. A single `/`
    /// separates numerator from denominator; the numerator may be `1`.
    ///
    /// `"kgm4/s5A3"`, `"kg.m^4/s^5.A^3"` and `"m4kg/A3s5"` all parse to the
    /// same vector. `"m/m/m"` is rejected.
    pub fn parse(signature: &str) -> Result<Self> {
        if signature.trim().is_empty() {
            return Err(UnitError::parse(signature, "empty signature", 0, signature.len()));
        }

        let slashes: Vec<usize> = signature.match_indices('/').map(|(i, _)| i).collect();
        if slashes.len() > 1 {
            return Err(UnitError::parse(signature, "more than one `/`", slashes[1], 1));
        }

        let mut acc = [0i32; BaseDimension::COUNT];
        match slashes.first() {
            None => parse_side(signature, 0, signature.len(), 1, "signature", &mut acc)?,
            Some(&slash) => {
                parse_side(signature, 0, slash, 1, "numerator", &mut acc)?;
                parse_side(signature, slash + 1, signature.len(), -1, "denominator", &mut acc)?;
            }
        }

        let mut exponents = [0i8; BaseDimension::COUNT];
        for (slot, value) in exponents.iter_mut().zip(acc) {
            *slot = i8::try_from(value).map_err(|_| {
                UnitError::parse(signature, "exponent out of range", 0, signature.len())
            })?;
        }
        Ok(Self { exponents })
    }

    // ==========================================================================
    // Operations
    // ==========================================================================

    /// Combine with another vector: add exponents for multiplication,
    /// subtract them for division
    ///
    /// Returns None if a resulting exponent does not fit in `i8`.
    pub const fn combine(&self, other: &DimensionVector, op: DimensionOp) -> Option<DimensionVector> {
        match op {
            DimensionOp::Multiply => self.mul(other),
            DimensionOp::Divide => self.div(other),
        }
    }

    /// Multiply dimensions (add exponents)
    ///
    /// Returns None on exponent overflow
    pub const fn mul(&self, other: &DimensionVector) -> Option<DimensionVector> {
        let mut exponents = self.exponents;
        let mut i = 0;
        while i < BaseDimension::COUNT {
            exponents[i] = match exponents[i].checked_add(other.exponents[i]) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(DimensionVector { exponents })
    }

    /// Divide dimensions (subtract exponents)
    ///
    /// Returns None on exponent overflow
    pub const fn div(&self, other: &DimensionVector) -> Option<DimensionVector> {
        let mut exponents = self.exponents;
        let mut i = 0;
        while i < BaseDimension::COUNT {
            exponents[i] = match exponents[i].checked_sub(other.exponents[i]) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(DimensionVector { exponents })
    }

    /// Reciprocal (negate all exponents)
    pub const fn invert(&self) -> Option<DimensionVector> {
        self.power(-1)
    }

    /// Raise to integer power (multiply all exponents)
    ///
    /// Returns None on exponent overflow
    pub const fn power(&self, n: i8) -> Option<DimensionVector> {
        let mut exponents = self.exponents;
        let mut i = 0;
        while i < BaseDimension::COUNT {
            exponents[i] = match exponents[i].checked_mul(n) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(DimensionVector { exponents })
    }

    /// n-th root (divide exponents by n)
    ///
    /// Returns None if any exponent is not divisible by n
    pub const fn root(&self, n: i8) -> Option<DimensionVector> {
        if n == 0 {
            return None;
        }
        let mut exponents = self.exponents;
        let mut i = 0;
        while i < BaseDimension::COUNT {
            match (exponents[i].checked_rem(n), exponents[i].checked_div(n)) {
                (Some(0), Some(e)) => exponents[i] = e,
                _ => return None,
            }
            i += 1;
        }
        Some(DimensionVector { exponents })
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Exponent of one base dimension
    pub const fn exponent(&self, base: BaseDimension) -> i8 {
        self.exponents[base.index()]
    }

    /// All exponents in [`BaseDimension::ALL`] order
    pub const fn exponents(&self) -> [i8; BaseDimension::COUNT] {
        self.exponents
    }

    /// Check if dimensionless
    pub const fn is_dimensionless(&self) -> bool {
        let mut i = 0;
        while i < BaseDimension::COUNT {
            if self.exponents[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Deterministic signature, e.g. `kg.m2/s3.A`
    ///
    /// Zero exponents never appear; the dimensionless vector renders as `1`
    /// and a vector with only negative exponents as `1/...`. The result
    /// parses back to an equal vector.
    pub fn to_canonical_string(&self) -> String {
        if self.is_dimensionless() {
            return "1".to_string();
        }

        let mut num: Vec<String> = Vec::new();
        let mut den: Vec<String> = Vec::new();

        for base in BaseDimension::ALL {
            let exp = self.exponent(base);
            let parts = if exp > 0 { &mut num } else { &mut den };
            match exp.unsigned_abs() {
                0 => {}
                1 => parts.push(base.symbol().to_string()),
                n => parts.push(format!("{}{}", base.symbol(), n)),
            }
        }

        let num_str = if num.is_empty() { "1".to_string() } else { num.join(".") };
        if den.is_empty() {
            num_str
        } else {
            format!("{}/{}", num_str, den.join("."))
        }
    }
}

/// Accumulate the terms of one side of a signature into `acc`
fn parse_side(
    signature: &str,
    start: usize,
    end: usize,
    sign: i32,
    side_name: &str,
    acc: &mut [i32; BaseDimension::COUNT],
) -> Result<()> {
    let raw = &signature[start..end];
    let leading = raw.len() - raw.trim_start().len();
    let side = raw.trim();
    let base_offset = start + leading;

    if side.is_empty() {
        return Err(UnitError::parse(
            signature,
            format!("empty {side_name}"),
            start,
            end - start,
        ));
    }
    if side == "1" {
        return Ok(());
    }

    let mut pos = 0;
    let mut terms = 0;
    let mut pending_separator: Option<usize> = None;

    while pos < side.len() {
        let rest = &side[pos..];
        let offset = base_offset + pos;
        let Some(c) = rest.chars().next() else { break };

        if is_separator(c) {
            if terms == 0 || pending_separator.is_some() {
                return Err(UnitError::parse(signature, "unexpected separator", offset, c.len_utf8()));
            }
            pending_separator = Some(offset);
            pos += c.len_utf8();
            continue;
        }

        let Some((base, len)) = BaseDimension::match_prefix(rest) else {
            let bad_len = rest
                .char_indices()
                .find(|(_, ch)| !ch.is_alphabetic())
                .map_or(rest.len(), |(i, _)| i)
                .max(c.len_utf8());
            return Err(UnitError::parse(
                signature,
                format!("unknown dimension symbol `{}`", &rest[..bad_len]),
                offset,
                bad_len,
            ));
        };
        pos += len;

        let caret = side[pos..].starts_with('^');
        if caret {
            pos += 1;
        }
        let exp_start = pos;
        if side[pos..].starts_with('-') {
            pos += 1;
        }
        let digits = side[pos..].bytes().take_while(u8::is_ascii_digit).count();
        pos += digits;

        let exponent = if digits == 0 {
            if pos > exp_start || caret {
                return Err(UnitError::parse(
                    signature,
                    "missing exponent",
                    base_offset + exp_start,
                    (pos - exp_start).max(1),
                ));
            }
            1
        } else {
            side[exp_start..pos].parse::<i32>().map_err(|_| {
                UnitError::parse(
                    signature,
                    "exponent out of range",
                    base_offset + exp_start,
                    pos - exp_start,
                )
            })?
        };

        acc[base.index()] = sign
            .checked_mul(exponent)
            .and_then(|e| acc[base.index()].checked_add(e))
            .ok_or_else(|| {
                let term_len = pos - (offset - base_offset);
                UnitError::parse(signature, "exponent out of range", offset, term_len)
            })?;
        terms += 1;
        pending_separator = None;
    }

    if let Some(offset) = pending_separator {
        return Err(UnitError::parse(signature, "dangling separator", offset, 1));
    }
    Ok(())
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '*' | '·') || c.is_whitespace()
}

impl FromStr for DimensionVector {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mul() {
        // Force = Mass × Acceleration
        let force = DimensionVector::MASS.mul(&DimensionVector::ACCELERATION).unwrap();
        assert_eq!(force, DimensionVector::FORCE);
    }

    #[test]
    fn test_dimension_div() {
        let velocity = DimensionVector::LENGTH
            .combine(&DimensionVector::TIME, DimensionOp::Divide)
            .unwrap();
        assert_eq!(velocity, DimensionVector::VELOCITY);
    }

    #[test]
    fn test_power_and_root() {
        let volume = DimensionVector::LENGTH.power(3).unwrap();
        assert_eq!(volume, DimensionVector::VOLUME);
        assert_eq!(volume.root(3), Some(DimensionVector::LENGTH));
        assert!(DimensionVector::VOLUME.root(2).is_none());
        assert!(DimensionVector::AREA.root(0).is_none());
    }

    #[test]
    fn test_invert() {
        assert_eq!(DimensionVector::TIME.invert(), Some(DimensionVector::FREQUENCY));
        let conductance = DimensionVector::RESISTANCE.invert().unwrap();
        assert!(DimensionVector::RESISTANCE.mul(&conductance).unwrap().is_dimensionless());
    }

    #[test]
    fn test_exponent_overflow_is_reported() {
        let m100 = DimensionVector::LENGTH.power(100).unwrap();
        assert_eq!(m100.exponent(BaseDimension::Length), 100);
        assert!(m100.mul(&m100).is_none());
        assert!(m100.invert().unwrap().div(&m100).is_none());
        assert!(DimensionVector::AREA.power(64).is_none());
        assert_eq!(
            DimensionVector::AREA.power(63).map(|d| d.exponent(BaseDimension::Length)),
            Some(126)
        );

        let floor = DimensionVector::from_exponents([0, -128, 0, 0, 0, 0, 0, 0, 0]);
        assert!(floor.invert().is_none());
        assert!(floor.root(-1).is_none());
        assert_eq!(
            floor.div(&DimensionVector::LENGTH.power(-1).unwrap()).map(|d| d.to_string()),
            Some("1/m127".to_string())
        );
    }

    #[test]
    fn test_parse_notations_agree() {
        let a = DimensionVector::parse("kgm4/s5A3").unwrap();
        let b = DimensionVector::parse("kg.m^4/s^5.A^3").unwrap();
        let c = DimensionVector::parse("m4kg/A3s5").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.exponent(BaseDimension::Mass), 1);
        assert_eq!(a.exponent(BaseDimension::Length), 4);
        assert_eq!(a.exponent(BaseDimension::Time), -5);
        assert_eq!(a.exponent(BaseDimension::Current), -3);
    }

    #[test]
    fn test_parse_longest_symbol_wins() {
        let d = DimensionVector::parse("molm").unwrap();
        assert_eq!(d.exponent(BaseDimension::Amount), 1);
        assert_eq!(d.exponent(BaseDimension::Length), 1);

        let d = DimensionVector::parse("kgK").unwrap();
        assert_eq!(d.exponent(BaseDimension::Mass), 1);
        assert_eq!(d.exponent(BaseDimension::Temperature), 1);

        let d = DimensionVector::parse("s.sr").unwrap();
        assert_eq!(d.exponent(BaseDimension::Time), 1);
        assert_eq!(d.exponent(BaseDimension::SolidAngle), 1);
    }

    #[test]
    fn test_parse_negative_and_repeated() {
        let a = DimensionVector::parse("m.s^-2").unwrap();
        assert_eq!(a, DimensionVector::ACCELERATION);
        let b = DimensionVector::parse("m.m.m").unwrap();
        assert_eq!(b, DimensionVector::VOLUME);
        let c = DimensionVector::parse("1/s").unwrap();
        assert_eq!(c, DimensionVector::FREQUENCY);
        assert!(DimensionVector::parse("1").unwrap().is_dimensionless());
        assert!(DimensionVector::parse("m/m").unwrap().is_dimensionless());
    }

    #[test]
    fn test_parse_errors() {
        assert!(DimensionVector::parse("").unwrap_err().is_parse());
        assert!(DimensionVector::parse("   ").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m/m/m/m").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m/").unwrap_err().is_parse());
        assert!(DimensionVector::parse("/s").unwrap_err().is_parse());
        assert!(DimensionVector::parse("kg.xyz").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m^").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m..s").unwrap_err().is_parse());
        assert!(DimensionVector::parse(".m").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m.").unwrap_err().is_parse());
        assert!(DimensionVector::parse("m200").unwrap_err().is_parse());
        assert!(DimensionVector::parse("2m").unwrap_err().is_parse());
    }

    #[test]
    fn test_unknown_symbol_span() {
        match DimensionVector::parse("kg.xyz/s").unwrap_err() {
            UnitError::Parse { reason, span, .. } => {
                assert!(reason.contains("xyz"));
                assert_eq!(span.offset(), 3);
                assert_eq!(span.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(DimensionVector::DIMENSIONLESS.to_canonical_string(), "1");
        assert_eq!(DimensionVector::VELOCITY.to_canonical_string(), "m/s");
        assert_eq!(DimensionVector::FORCE.to_canonical_string(), "kg.m/s2");
        assert_eq!(DimensionVector::FREQUENCY.to_canonical_string(), "1/s");
        assert_eq!(DimensionVector::CAPACITANCE.to_canonical_string(), "s4.A2/kg.m2");
        assert_eq!(DimensionVector::ANGULAR_VELOCITY.to_string(), "rad/s");
    }

    #[test]
    fn test_parse_falls_back_to_shorter_symbol() {
        // s then rad, written together
        let d = DimensionVector::parse("srad").unwrap();
        assert_eq!(d.exponent(BaseDimension::Time), 1);
        assert_eq!(d.exponent(BaseDimension::Angle), 1);
        assert_eq!(d, DimensionVector::parse("s.rad").unwrap());

        let d = DimensionVector::parse("kg/s2rad").unwrap();
        assert_eq!(d.exponent(BaseDimension::Time), -2);
        assert_eq!(d.exponent(BaseDimension::Angle), -1);

        // steradian keeps priority when the rest is a valid term
        let d = DimensionVector::parse("srm").unwrap();
        assert_eq!(d.exponent(BaseDimension::SolidAngle), 1);
        assert_eq!(d.exponent(BaseDimension::Length), 1);
        assert_eq!(DimensionVector::parse("sr2").unwrap().exponent(BaseDimension::SolidAngle), 2);

        assert!(DimensionVector::parse("srx").unwrap_err().is_parse());
    }

    #[test]
    fn test_canonical_round_trip() {
        for d in [
            DimensionVector::CAPACITANCE,
            DimensionVector::PRESSURE,
            DimensionVector::SOLID_ANGLE.mul(&DimensionVector::TIME).unwrap(),
            DimensionVector::DIMENSIONLESS,
            DimensionVector::FREQUENCY,
        ] {
            let text = d.to_canonical_string();
            assert_eq!(DimensionVector::parse(&text).unwrap(), d, "round trip of {text}");
        }
    }

    #[test]
    fn test_from_str() {
        let d = DimensionVector::MASS
            .mul(&DimensionVector::LENGTH)
            .and_then(|d| d.div(&DimensionVector::TIME))
            .unwrap();
        assert_eq!(d, DimensionVector::parse("kgm/s").unwrap());
        let parsed: DimensionVector = "kg/m3".parse().unwrap();
        assert_eq!(parsed, DimensionVector::DENSITY);
    }
}
