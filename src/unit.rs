//! Units of measure
//!
//! Every unit has:
//! - An id, unique within its quantity, and one or more abbreviations
//! - A scale relative to the SI standard unit of its quantity
//! - A dimension, copied from the quantity it belongs to
//! - An SI-prefix policy and the unit system it comes from
//!
//! Units are created through [`UnitBuilder`] and live in a
//! [`Registry`](crate::Registry); they are shared as `Arc<Unit>`.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::quantity::Quantity;
use crate::registry::Registry;
use crate::scale::Scale;

/// System a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitSystem {
    /// SI base unit (m, kg, s, A, K, mol, cd)
    SiBase,
    /// Coherent SI derived unit (N, J, Pa, ...)
    SiDerived,
    /// Non-SI unit accepted for use with SI (min, h, L, t, ...)
    SiAccepted,
    /// Centimeter-gram-second system
    Cgs,
    /// British imperial units
    Imperial,
    /// United States customary units
    UsCustomary,
    /// Meter-tonne-second system
    Mts,
    /// Anything else
    #[default]
    Other,
}

impl UnitSystem {
    /// Short tag
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::SiBase => "SI",
            Self::SiDerived => "SI derived",
            Self::SiAccepted => "SI accepted",
            Self::Cgs => "CGS",
            Self::Imperial => "Imperial",
            Self::UsCustomary => "US customary",
            Self::Mts => "MTS",
            Self::Other => "Other",
        }
    }

    /// Whether units of this system are SI or accepted for use with SI
    pub const fn is_si(self) -> bool {
        matches!(self, Self::SiBase | Self::SiDerived | Self::SiAccepted)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Which SI prefixes are generated for a unit when it is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiPrefixes {
    /// No prefixed units
    #[default]
    None,
    /// Every prefix from quecto to quetta
    All,
    /// Only prefixes below one (milli, micro, ...)
    NegativeOnly,
    /// Prefixes whose power of ten is at least the given value
    AtLeast(i8),
    /// The unit is itself kilo-prefixed (kg); prefixes apply to its stem (g)
    Kilo,
}

impl SiPrefixes {
    /// Whether a prefix with the given power of ten is generated
    pub const fn admits(self, power: i8) -> bool {
        match self {
            Self::None => false,
            Self::All | Self::Kilo => true,
            Self::NegativeOnly => power < 0,
            Self::AtLeast(min) => power >= min,
        }
    }
}

/// A named, scaled member of a [`Quantity`]
pub struct Unit {
    id: String,
    name: String,
    abbreviations: Vec<String>,
    scale: Scale,
    dimensions: DimensionVector,
    quantity_name: String,
    quantity: Weak<Quantity>,
    si_prefixes: SiPrefixes,
    unit_system: UnitSystem,
    generated: bool,
}

impl Unit {
    /// Start building a unit of `quantity`
    pub fn builder(
        quantity: &Arc<Quantity>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> UnitBuilder {
        UnitBuilder {
            quantity: Arc::clone(quantity),
            id: id.into(),
            name: name.into(),
            abbreviations: Vec::new(),
            scale: Scale::Identity,
            si_prefixes: SiPrefixes::None,
            unit_system: UnitSystem::default(),
            generated: false,
        }
    }

    /// Standard unit synthesised for a dimension without one
    pub(crate) fn anonymous(quantity: &Arc<Quantity>, id: String) -> Self {
        Self {
            name: id.clone(),
            abbreviations: vec![id.clone()],
            id,
            scale: Scale::Identity,
            dimensions: quantity.dimensions(),
            quantity_name: quantity.name().to_string(),
            quantity: Arc::downgrade(quantity),
            si_prefixes: SiPrefixes::None,
            unit_system: UnitSystem::SiDerived,
            generated: true,
        }
    }

    /// Id, unique within the quantity
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (e.g. "kilometer")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abbreviation used for display
    pub fn default_abbreviation(&self) -> &str {
        &self.abbreviations[0]
    }

    /// All abbreviations; the first is the default, the id is always included
    pub fn abbreviations(&self) -> &[String] {
        &self.abbreviations
    }

    /// Conversion scale to the standard unit
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Dimension of the owning quantity
    pub fn dimensions(&self) -> DimensionVector {
        self.dimensions
    }

    /// Owning quantity, if it is still alive
    pub fn quantity(&self) -> Option<Arc<Quantity>> {
        self.quantity.upgrade()
    }

    /// Name of the owning quantity
    pub fn quantity_name(&self) -> &str {
        &self.quantity_name
    }

    /// Prefix policy this unit was registered with
    pub fn si_prefixes(&self) -> SiPrefixes {
        self.si_prefixes
    }

    /// Unit system tag
    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Whether this unit was generated (SI prefix expansion or synthesis)
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether values in this unit are already SI values
    pub fn is_standard(&self) -> bool {
        self.scale.is_base()
    }

    /// Convert a value in this unit to the standard unit
    #[inline]
    pub fn to_standard(&self, value: f64) -> f64 {
        self.scale.to_standard_unit(value)
    }

    /// Convert a value in the standard unit to this unit
    #[inline]
    pub fn from_standard(&self, value: f64) -> f64 {
        self.scale.from_standard_unit(value)
    }

    /// Two units are convertible iff their dimensions are equal
    pub fn is_convertible_to(&self, other: &Unit) -> bool {
        self.dimensions == other.dimensions
    }

    /// Convert `value` from this unit to `target`
    pub fn convert(&self, value: f64, target: &Unit) -> Result<f64> {
        if !self.is_convertible_to(target) {
            return Err(UnitError::mismatch("convert", &self.dimensions, &target.dimensions));
        }
        Ok(target.from_standard(self.to_standard(value)))
    }

    /// Builder for a unit of the same quantity where one new unit equals
    /// `factor` of this unit
    ///
    /// The new scale is this unit's scale composed with `factor`, so the new
    /// unit converts to SI correctly through both hops. The unit system is
    /// inherited and can be overridden on the builder.
    pub fn derive_linear(
        &self,
        factor: f64,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<UnitBuilder> {
        let scale = self.scale.compose_linear(factor)?;
        self.derive(scale, id.into(), name.into())
    }

    /// Like [`derive_linear`](Self::derive_linear), with an offset:
    /// `x` in the new unit is `x · factor + offset` in this unit
    pub fn derive_offset_linear(
        &self,
        factor: f64,
        offset: f64,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<UnitBuilder> {
        let scale = self.scale.compose_offset_linear(factor, offset)?;
        self.derive(scale, id.into(), name.into())
    }

    fn derive(&self, scale: Scale, id: String, name: String) -> Result<UnitBuilder> {
        let quantity = self.quantity().ok_or_else(|| UnitError::UnregisteredQuantity {
            name: self.quantity_name.clone(),
        })?;
        Ok(Unit::builder(&quantity, id, name)
            .scale(scale)
            .unit_system(self.unit_system))
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.dimensions == other.dimensions
            && self.quantity_name == other.quantity_name
            && self.scale == other.scale
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_abbreviation())
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("quantity", &self.quantity_name)
            .field("dimensions", &self.dimensions.to_canonical_string())
            .field("scale", &self.scale)
            .field("unit_system", &self.unit_system)
            .finish()
    }
}

/// Builder for a [`Unit`]; finish with [`build`](UnitBuilder::build)
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    quantity: Arc<Quantity>,
    id: String,
    name: String,
    abbreviations: Vec<String>,
    scale: Scale,
    si_prefixes: SiPrefixes,
    unit_system: UnitSystem,
    generated: bool,
}

impl UnitBuilder {
    /// Add an abbreviation; the first one added becomes the default
    /// display abbreviation in place of the id
    pub fn abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviations.push(abbreviation.into());
        self
    }

    /// Conversion scale to the standard unit (default identity)
    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// SI prefix policy (default none)
    pub fn si_prefixes(mut self, si_prefixes: SiPrefixes) -> Self {
        self.si_prefixes = si_prefixes;
        self
    }

    /// Unit system tag
    pub fn unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }

    pub(crate) fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// The quantity the unit will belong to
    pub fn quantity(&self) -> &Arc<Quantity> {
        &self.quantity
    }

    /// Validate, create and register the unit
    pub fn build(self, registry: &Registry) -> Result<Arc<Unit>> {
        registry.register_unit(self)
    }

    pub(crate) fn into_unit(self) -> Result<Unit> {
        if self.id.trim().is_empty() {
            return Err(UnitError::EmptyName { what: "unit id" });
        }
        if self.name.trim().is_empty() {
            return Err(UnitError::EmptyName { what: "unit name" });
        }
        if self.abbreviations.iter().any(|a| a.trim().is_empty()) {
            return Err(UnitError::EmptyName { what: "unit abbreviation" });
        }
        let scale = self.scale.validated()?;

        let mut abbreviations = self.abbreviations;
        if !abbreviations.contains(&self.id) {
            let position = if abbreviations.is_empty() { 0 } else { 1 };
            abbreviations.insert(position, self.id.clone());
        }
        let mut seen = Vec::with_capacity(abbreviations.len());
        abbreviations.retain(|a| {
            let fresh = !seen.contains(a);
            seen.push(a.clone());
            fresh
        });

        Ok(Unit {
            id: self.id,
            name: self.name,
            abbreviations,
            scale,
            dimensions: self.quantity.dimensions(),
            quantity_name: self.quantity.name().to_string(),
            quantity: Arc::downgrade(&self.quantity),
            si_prefixes: self.si_prefixes,
            unit_system: self.unit_system,
            generated: self.generated,
        })
    }
}
