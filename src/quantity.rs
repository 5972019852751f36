//! Quantities: all units sharing one dimension
//!
//! A [`Quantity`] owns a name, a [`DimensionVector`] and the table of units
//! registered under it. The first identity-scaled unit registered becomes
//! its standard unit.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;

use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::registry::Registry;
use crate::unit::Unit;

/// A physical quantity (Length, Force, ...) and its units
pub struct Quantity {
    name: String,
    dimensions: DimensionVector,
    anonymous: bool,
    units: RwLock<UnitTable>,
}

#[derive(Default)]
struct UnitTable {
    units: Vec<Arc<Unit>>,
    by_id: FxHashMap<String, Arc<Unit>>,
    by_abbreviation: FxHashMap<String, Arc<Unit>>,
    standard: Option<Arc<Unit>>,
}

impl Quantity {
    /// Register a quantity, or return the named quantity that already owns
    /// `dimensions` (whatever its name)
    ///
    /// Fails with [`UnitError::QuantityNameTaken`]
    /// when `name` is already used for other dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use sounio_units::{DimensionVector, Quantity, Registry};
    ///
    /// let registry = Registry::empty();
    /// let jerk = Quantity::of(&registry, "Jerk", "m/s3".parse().unwrap()).unwrap();
    /// assert_eq!(jerk.dimensions(), DimensionVector::parse("m.s^-3").unwrap());
    /// ```
    pub fn of(registry: &Registry, name: &str, dimensions: DimensionVector) -> Result<Arc<Quantity>> {
        registry.register_quantity(name, dimensions)
    }

    pub(crate) fn new(name: impl Into<String>, dimensions: DimensionVector, anonymous: bool) -> Self {
        Self {
            name: name.into(),
            dimensions,
            anonymous,
            units: RwLock::new(UnitTable::default()),
        }
    }

    /// Quantity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension shared by all units of this quantity
    pub fn dimensions(&self) -> DimensionVector {
        self.dimensions
    }

    /// Whether this quantity was synthesised for an unnamed dimension
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// The SI unit of this quantity, if one is registered
    pub fn standard_unit(&self) -> Option<Arc<Unit>> {
        self.read().standard.clone()
    }

    /// Units in registration order
    pub fn units(&self) -> Vec<Arc<Unit>> {
        self.read().units.clone()
    }

    /// Number of registered units
    pub fn unit_count(&self) -> usize {
        self.read().units.len()
    }

    /// Exact, case-sensitive lookup among this quantity's unit ids
    pub fn unit_by_id(&self, id: &str) -> Option<Arc<Unit>> {
        self.read().by_id.get(id).cloned()
    }

    /// Exact, case-sensitive lookup among this quantity's abbreviations
    pub fn unit_by_abbreviation(&self, abbreviation: &str) -> Option<Arc<Unit>> {
        self.read().by_abbreviation.get(abbreviation).cloned()
    }

    /// Whether `id` or `abbreviation` is free in this quantity
    pub(crate) fn is_free(&self, key: &str) -> bool {
        let table = self.read();
        !table.by_id.contains_key(key) && !table.by_abbreviation.contains_key(key)
    }

    pub(crate) fn insert_unit(&self, unit: Arc<Unit>) -> Result<()> {
        let mut table = self.write();

        let taken = std::iter::once(unit.id())
            .map(|id| table.by_id.contains_key(id).then_some(id))
            .chain(
                unit.abbreviations()
                    .iter()
                    .map(|a| table.by_abbreviation.contains_key(a).then_some(a.as_str())),
            )
            .flatten()
            .next();
        if let Some(key) = taken {
            return Err(UnitError::RegistrationConflict {
                key: key.to_string(),
                quantity: self.name.clone(),
            });
        }

        table.by_id.insert(unit.id().to_string(), Arc::clone(&unit));
        for abbreviation in unit.abbreviations() {
            table.by_abbreviation.insert(abbreviation.clone(), Arc::clone(&unit));
        }
        if table.standard.is_none() && unit.is_standard() {
            table.standard = Some(Arc::clone(&unit));
        }
        table.units.push(unit);
        Ok(())
    }

    pub(crate) fn remove_unit(&self, unit: &Arc<Unit>) -> bool {
        let mut table = self.write();
        let Some(position) = table.units.iter().position(|u| Arc::ptr_eq(u, unit)) else {
            return false;
        };
        table.units.remove(position);
        table.by_id.remove(unit.id());
        for abbreviation in unit.abbreviations() {
            table.by_abbreviation.remove(abbreviation);
        }
        if table.standard.as_ref().is_some_and(|s| Arc::ptr_eq(s, unit)) {
            table.standard = table.units.iter().find(|u| u.is_standard()).cloned();
        }
        true
    }

    pub(crate) fn drain_units(&self) -> Vec<Arc<Unit>> {
        let mut table = self.write();
        let units = std::mem::take(&mut table.units);
        *table = UnitTable::default();
        units
    }

    fn read(&self) -> RwLockReadGuard<'_, UnitTable> {
        self.units.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, UnitTable> {
        self.units.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions.to_canonical_string())
            .field("anonymous", &self.anonymous)
            .field("units", &self.unit_count())
            .finish()
    }
}
