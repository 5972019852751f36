//! The quantity and unit registry
//!
//! Maps quantity names and dimensions to [`Quantity`], and unit ids and
//! abbreviations to [`Unit`]. At most one quantity is registered per
//! dimension; asking for a unit of an unregistered dimension synthesises an
//! anonymous quantity with an SI standard unit.
//!
//! Registries are independent objects, so tests can build isolated ones;
//! [`Registry::global`] is the process-wide registry preloaded with the SI
//! catalogue.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;

use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::quantity::Quantity;
use crate::si;
use crate::unit::{SiPrefixes, Unit, UnitBuilder};

/// Registry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Register the SI catalogue (Length, Mass, ..., Pressure) on creation
    pub preload_si: bool,

    /// Generate prefixed units (km, mg, μs, ...) for units registered with
    /// an SI prefix policy
    pub expand_si_prefixes: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            preload_si: true,
            expand_si_prefixes: true,
        }
    }
}

/// Table of quantities and units
pub struct Registry {
    config: RegistryConfig,
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    /// Named quantities; anonymous ones are reachable by dimension only
    by_name: FxHashMap<String, Arc<Quantity>>,
    by_dimensions: FxHashMap<DimensionVector, Arc<Quantity>>,
    units_by_id: FxHashMap<String, Vec<Arc<Unit>>>,
    units_by_abbreviation: FxHashMap<String, Vec<Arc<Unit>>>,
}

impl Tables {
    fn is_registered(&self, quantity: &Arc<Quantity>) -> bool {
        self.by_dimensions
            .get(&quantity.dimensions())
            .is_some_and(|q| Arc::ptr_eq(q, quantity))
    }

    fn index_unit(&mut self, unit: &Arc<Unit>) {
        self.units_by_id
            .entry(unit.id().to_string())
            .or_default()
            .push(Arc::clone(unit));
        for abbreviation in unit.abbreviations() {
            self.units_by_abbreviation
                .entry(abbreviation.clone())
                .or_default()
                .push(Arc::clone(unit));
        }
    }

    fn deindex_unit(&mut self, unit: &Arc<Unit>) {
        remove_from(&mut self.units_by_id, unit.id(), unit);
        for abbreviation in unit.abbreviations() {
            remove_from(&mut self.units_by_abbreviation, abbreviation, unit);
        }
    }

    fn remove_quantity(&mut self, quantity: &Arc<Quantity>) {
        self.by_dimensions.remove(&quantity.dimensions());
        if self
            .by_name
            .get(quantity.name())
            .is_some_and(|q| Arc::ptr_eq(q, quantity))
        {
            self.by_name.remove(quantity.name());
        }
        for unit in quantity.drain_units() {
            self.deindex_unit(&unit);
        }
    }
}

fn remove_from(map: &mut FxHashMap<String, Vec<Arc<Unit>>>, key: &str, unit: &Arc<Unit>) {
    if let Some(units) = map.get_mut(key) {
        units.retain(|u| !Arc::ptr_eq(u, unit));
        if units.is_empty() {
            map.remove(key);
        }
    }
}

/// Something that can be removed from a [`Registry`]
pub trait Registered {
    /// Remove `self` from `registry`; returns whether anything was removed
    fn unregister_from(&self, registry: &Registry) -> bool;
}

impl Registered for Arc<Unit> {
    fn unregister_from(&self, registry: &Registry) -> bool {
        registry.unregister_unit(self)
    }
}

impl Registered for Arc<Quantity> {
    fn unregister_from(&self, registry: &Registry) -> bool {
        registry.unregister_quantity(self)
    }
}

impl Registry {
    /// Registry with the default configuration (SI catalogue preloaded)
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Registry without any quantities; prefix expansion stays enabled
    pub fn empty() -> Self {
        Self::with_config(RegistryConfig {
            preload_si: false,
            ..RegistryConfig::default()
        })
    }

    /// Create with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        let registry = Self {
            config,
            tables: RwLock::new(Tables::default()),
        };
        if config.preload_si {
            si::register_defaults(&registry);
        }
        registry
    }

    /// Process-wide registry, created with the default configuration on
    /// first use
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Configuration this registry was created with
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    // ==========================================================================
    // Quantities
    // ==========================================================================

    /// Register the quantity for `dimensions`, or return the one that
    /// already owns them
    ///
    /// A named quantity owning `dimensions` is returned whatever `name` is
    /// asked for. An anonymous one is replaced. Fails on an empty name and
    /// on a name already taken by a quantity of other dimensions.
    pub fn register_quantity(&self, name: &str, dimensions: DimensionVector) -> Result<Arc<Quantity>> {
        if name.trim().is_empty() {
            return Err(UnitError::EmptyName { what: "quantity name" });
        }

        let mut tables = self.write();
        if let Some(existing) = tables.by_name.get(name) {
            if existing.dimensions() == dimensions {
                return Ok(Arc::clone(existing));
            }
            return Err(UnitError::QuantityNameTaken {
                name: name.to_string(),
                dimensions: existing.dimensions().to_canonical_string(),
            });
        }

        if let Some(existing) = tables.by_dimensions.get(&dimensions).cloned() {
            if !existing.is_anonymous() {
                tracing::debug!(
                    requested = name,
                    existing = existing.name(),
                    "dimensions already owned, returning existing quantity"
                );
                return Ok(existing);
            }
            tracing::debug!(
                quantity = name,
                replaces = existing.name(),
                "named quantity replaces anonymous quantity"
            );
            tables.remove_quantity(&existing);
        }

        let quantity = Arc::new(Quantity::new(name, dimensions, false));
        tables.by_name.insert(name.to_string(), Arc::clone(&quantity));
        tables.by_dimensions.insert(dimensions, Arc::clone(&quantity));
        tracing::debug!(quantity = name, dimensions = %dimensions, "registered quantity");
        Ok(quantity)
    }

    /// Named quantity lookup
    pub fn quantity_by_name(&self, name: &str) -> Option<Arc<Quantity>> {
        self.read().by_name.get(name).cloned()
    }

    /// Quantity owning `dimensions`, named or anonymous
    pub fn quantity_for(&self, dimensions: &DimensionVector) -> Option<Arc<Quantity>> {
        self.read().by_dimensions.get(dimensions).cloned()
    }

    /// All registered quantities, sorted by name
    pub fn quantities(&self) -> Vec<Arc<Quantity>> {
        let mut quantities: Vec<_> = self.read().by_dimensions.values().cloned().collect();
        quantities.sort_by(|a, b| a.name().cmp(b.name()));
        quantities
    }

    /// Number of registered quantities
    pub fn len(&self) -> usize {
        self.read().by_dimensions.len()
    }

    /// Whether no quantity is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==========================================================================
    // Units
    // ==========================================================================

    /// Register a unit built with [`Unit::builder`]; usually called through
    /// [`UnitBuilder::build`]
    pub fn register_unit(&self, builder: UnitBuilder) -> Result<Arc<Unit>> {
        let quantity = Arc::clone(builder.quantity());
        let mut tables = self.write();
        if !tables.is_registered(&quantity) {
            return Err(UnitError::UnregisteredQuantity {
                name: quantity.name().to_string(),
            });
        }

        // everything fallible happens before the first insert
        let unit = Arc::new(builder.into_unit()?);
        let prefixed = if self.config.expand_si_prefixes && unit.si_prefixes() != SiPrefixes::None
        {
            si::prefixes::expand(&unit)
                .into_iter()
                .filter_map(|builder| match builder.into_unit() {
                    Ok(prefixed) => Some(Arc::new(prefixed)),
                    Err(err) => {
                        tracing::trace!(unit = unit.id(), %err, "skipped prefixed unit");
                        None
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        quantity.insert_unit(Arc::clone(&unit))?;
        tables.index_unit(&unit);
        tracing::debug!(
            unit = unit.id(),
            quantity = quantity.name(),
            scale = %unit.scale(),
            "registered unit"
        );

        for prefixed in prefixed {
            match quantity.insert_unit(Arc::clone(&prefixed)) {
                Ok(()) => tables.index_unit(&prefixed),
                Err(err) => {
                    tracing::trace!(unit = prefixed.id(), %err, "skipped prefixed unit");
                }
            }
        }
        Ok(unit)
    }

    /// First unit registered under `abbreviation`, in any quantity
    pub fn unit_by_abbreviation(&self, abbreviation: &str) -> Option<Arc<Unit>> {
        self.read()
            .units_by_abbreviation
            .get(abbreviation)
            .and_then(|units| units.first().cloned())
    }

    /// All units registered under `abbreviation`, across quantities
    pub fn units_by_abbreviation(&self, abbreviation: &str) -> Vec<Arc<Unit>> {
        self.read()
            .units_by_abbreviation
            .get(abbreviation)
            .cloned()
            .unwrap_or_default()
    }

    /// First unit registered with `id`, in any quantity
    pub fn unit_by_id(&self, id: &str) -> Option<Arc<Unit>> {
        self.read()
            .units_by_id
            .get(id)
            .and_then(|units| units.first().cloned())
    }

    /// Standard unit for `dimensions`, synthesising an anonymous quantity
    /// and SI unit when none is registered
    ///
    /// Idempotent: dimensionally equal vectors always yield the same
    /// `Arc<Unit>`, however they were written.
    pub fn lookup_or_create_unit_with_dimensions(&self, dimensions: DimensionVector) -> Arc<Unit> {
        if let Some(quantity) = self.read().by_dimensions.get(&dimensions)
            && let Some(unit) = quantity.standard_unit()
        {
            return unit;
        }

        let mut tables = self.write();
        let quantity = match tables.by_dimensions.get(&dimensions) {
            Some(quantity) => Arc::clone(quantity),
            None => {
                let name = format!("[{}]", dimensions.to_canonical_string());
                let quantity = Arc::new(Quantity::new(name, dimensions, true));
                tables.by_dimensions.insert(dimensions, Arc::clone(&quantity));
                tracing::debug!(dimensions = %dimensions, "synthesised anonymous quantity");
                quantity
            }
        };
        if let Some(unit) = quantity.standard_unit() {
            return unit;
        }

        let canonical = dimensions.to_canonical_string();
        let id = std::iter::once(canonical.clone())
            .chain((1..).map(|n| format!("[{canonical}]{}", "'".repeat(n - 1))))
            .find(|candidate| quantity.is_free(candidate))
            .unwrap_or_else(|| canonical.clone());
        let unit = Arc::new(Unit::anonymous(&quantity, id));
        match quantity.insert_unit(Arc::clone(&unit)) {
            Ok(()) => tables.index_unit(&unit),
            Err(err) => tracing::warn!(%err, "could not register synthesised unit"),
        }
        tracing::debug!(unit = unit.id(), quantity = quantity.name(), "synthesised standard unit");
        unit
    }

    /// Resolve a unit by abbreviation, falling back to a dimension signature
    ///
    /// `"km"` resolves to kilometer; `"kg.m2/s3.A"` to the standard unit of
    /// that dimension (volt, when the SI catalogue is loaded).
    pub fn resolve(&self, text: &str) -> Result<Arc<Unit>> {
        if let Some(unit) = self.unit_by_abbreviation(text) {
            return Ok(unit);
        }
        let dimensions = DimensionVector::parse(text)?;
        Ok(self.lookup_or_create_unit_with_dimensions(dimensions))
    }

    // ==========================================================================
    // Unregistration
    // ==========================================================================

    /// Remove a unit or a quantity (with all of its units) from every table
    pub fn unregister<T: Registered + ?Sized>(&self, item: &T) -> bool {
        item.unregister_from(self)
    }

    /// Remove one unit from its quantity and the global tables
    pub fn unregister_unit(&self, unit: &Arc<Unit>) -> bool {
        let mut tables = self.write();
        let Some(quantity) = unit.quantity() else {
            return false;
        };
        if !quantity.remove_unit(unit) {
            return false;
        }
        tables.deindex_unit(unit);
        tracing::debug!(unit = unit.id(), quantity = quantity.name(), "unregistered unit");
        true
    }

    /// Remove a quantity and all of its units
    pub fn unregister_quantity(&self, quantity: &Arc<Quantity>) -> bool {
        let mut tables = self.write();
        if !tables.is_registered(quantity) {
            return false;
        }
        tables.remove_quantity(quantity);
        tracing::debug!(quantity = quantity.name(), "unregistered quantity");
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.read();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("quantities", &tables.by_dimensions.len())
            .field("unit_ids", &tables.units_by_id.len())
            .finish()
    }
}
