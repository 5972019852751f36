//! Default quantities and units
//!
//! The SI base quantities, the common derived quantities and the usual
//! non-SI units accepted alongside them. Every factor converts one unit
//! into the standard unit of its quantity.

use crate::dimension::DimensionVector;
use crate::quantity::Quantity;
use crate::registry::Registry;
use crate::scale::Scale;
use crate::unit::{SiPrefixes, Unit, UnitSystem};

use SiPrefixes::{All, AtLeast, Kilo, NegativeOnly};
use UnitSystem::{Cgs, Imperial, Other, SiAccepted, SiBase, SiDerived, UsCustomary};

/// A catalogue unit
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    pub id: &'static str,
    pub name: &'static str,
    /// Extra abbreviations; the first one, if any, becomes the default
    pub abbreviations: &'static [&'static str],
    pub scale: Scale,
    pub prefixes: SiPrefixes,
    pub system: UnitSystem,
}

/// A catalogue quantity with its units, standard unit first
#[derive(Debug, Clone, Copy)]
pub struct QuantityDef {
    pub name: &'static str,
    pub dimensions: DimensionVector,
    pub units: &'static [UnitDef],
}

const fn si(
    id: &'static str,
    name: &'static str,
    prefixes: SiPrefixes,
    system: UnitSystem,
) -> UnitDef {
    UnitDef {
        id,
        name,
        abbreviations: &[],
        scale: Scale::Identity,
        prefixes,
        system,
    }
}

const fn linear(
    id: &'static str,
    name: &'static str,
    factor: f64,
    system: UnitSystem,
) -> UnitDef {
    UnitDef {
        id,
        name,
        abbreviations: &[],
        scale: Scale::Linear { factor },
        prefixes: SiPrefixes::None,
        system,
    }
}

const fn with_abbreviations(def: UnitDef, abbreviations: &'static [&'static str]) -> UnitDef {
    UnitDef { abbreviations, ..def }
}

const fn with_prefixes(def: UnitDef, prefixes: SiPrefixes) -> UnitDef {
    UnitDef { prefixes, ..def }
}

const INCH: f64 = 0.0254;
const FOOT: f64 = 0.3048;
const MILE: f64 = 1609.344;
const POUND: f64 = 0.453_592_37;
const STANDARD_GRAVITY: f64 = 9.806_65;

// =============================================================================
// Base quantities
// =============================================================================

const DIMENSIONLESS: &[UnitDef] = &[si("1", "one", SiPrefixes::None, SiDerived)];

const LENGTH: &[UnitDef] = &[
    si("m", "meter", All, SiBase),
    linear("in", "inch", INCH, Imperial),
    linear("ft", "foot", FOOT, Imperial),
    linear("yd", "yard", 0.9144, Imperial),
    linear("mi", "mile", MILE, Imperial),
    linear("nmi", "nautical mile", 1852.0, SiAccepted),
    linear("au", "astronomical unit", 1.495_978_707e11, SiAccepted),
    linear("ly", "light year", 9.460_730_472_580_8e15, Other),
    linear("pc", "parsec", 3.085_677_581_491_367e16, Other),
    with_abbreviations(linear("Å", "angstrom", 1e-10, Other), &["Å", "angstrom"]),
];

const MASS: &[UnitDef] = &[
    si("kg", "kilogram", Kilo, SiBase),
    linear("t", "tonne", 1e3, SiAccepted),
    linear("lb", "pound", POUND, Imperial),
    linear("oz", "ounce", POUND / 16.0, Imperial),
    with_abbreviations(linear("Da", "dalton", 1.660_539_066_60e-27, SiAccepted), &["Da", "u"]),
];

const DURATION: &[UnitDef] = &[
    si("s", "second", NegativeOnly, SiBase),
    linear("min", "minute", 60.0, SiAccepted),
    linear("h", "hour", 3600.0, SiAccepted),
    with_abbreviations(linear("day", "day", 86_400.0, SiAccepted), &["d", "day"]),
    linear("wk", "week", 604_800.0, Other),
];

const CURRENT: &[UnitDef] = &[si("A", "ampere", All, SiBase)];

const TEMPERATURE: &[UnitDef] = &[
    si("K", "kelvin", NegativeOnly, SiBase),
    UnitDef {
        id: "°C",
        name: "degree Celsius",
        abbreviations: &["°C", "degC"],
        scale: Scale::OffsetLinear {
            factor: 1.0,
            offset: 273.15,
        },
        prefixes: SiPrefixes::None,
        system: SiDerived,
    },
    UnitDef {
        id: "°F",
        name: "degree Fahrenheit",
        abbreviations: &["°F", "degF"],
        scale: Scale::OffsetLinear {
            factor: 5.0 / 9.0,
            offset: 459.67 * 5.0 / 9.0,
        },
        prefixes: SiPrefixes::None,
        system: UsCustomary,
    },
    with_abbreviations(linear("°R", "degree Rankine", 5.0 / 9.0, Imperial), &["°R", "degR"]),
];

const AMOUNT: &[UnitDef] = &[si("mol", "mole", All, SiBase)];

const LUMINOSITY: &[UnitDef] = &[si("cd", "candela", SiPrefixes::None, SiBase)];

const ANGLE: &[UnitDef] = &[
    si("rad", "radian", NegativeOnly, SiDerived),
    with_abbreviations(
        linear("deg", "degree", std::f64::consts::PI / 180.0, SiAccepted),
        &["°", "deg"],
    ),
    linear("arcmin", "arcminute", std::f64::consts::PI / 10_800.0, SiAccepted),
    linear("arcsec", "arcsecond", std::f64::consts::PI / 648_000.0, SiAccepted),
    linear("grad", "gradian", std::f64::consts::PI / 200.0, Other),
    linear("rev", "revolution", std::f64::consts::TAU, Other),
    UnitDef {
        id: "%",
        name: "percent grade",
        abbreviations: &[],
        scale: Scale::Grade {
            factor: 0.01,
            offset: 0.0,
        },
        prefixes: SiPrefixes::None,
        system: Other,
    },
];

const SOLID_ANGLE: &[UnitDef] = &[si("sr", "steradian", SiPrefixes::None, SiDerived)];

// =============================================================================
// Derived quantities
// =============================================================================

const AREA: &[UnitDef] = &[
    si("m2", "square meter", SiPrefixes::None, SiDerived),
    linear("km2", "square kilometer", 1e6, SiDerived),
    linear("cm2", "square centimeter", 1e-4, SiDerived),
    linear("a", "are", 1e2, Other),
    linear("ha", "hectare", 1e4, SiAccepted),
    linear("ft2", "square foot", FOOT * FOOT, Imperial),
    linear("ac", "acre", 4046.856_422_4, Imperial),
];

const VOLUME: &[UnitDef] = &[
    si("m3", "cubic meter", SiPrefixes::None, SiDerived),
    with_prefixes(
        with_abbreviations(linear("L", "liter", 1e-3, SiAccepted), &["L", "l"]),
        All,
    ),
    linear("cm3", "cubic centimeter", 1e-6, SiDerived),
    linear("gal", "gallon", 3.785_411_784e-3, UsCustomary),
];

const SPEED: &[UnitDef] = &[
    si("m/s", "meter per second", SiPrefixes::None, SiDerived),
    linear("km/h", "kilometer per hour", 1e3 / 3600.0, SiAccepted),
    with_abbreviations(linear("mi/h", "mile per hour", MILE / 3600.0, Imperial), &["mph", "mi/h"]),
    linear("ft/s", "foot per second", FOOT, Imperial),
    linear("kt", "knot", 1852.0 / 3600.0, SiAccepted),
];

const ACCELERATION: &[UnitDef] = &[
    si("m/s2", "meter per second squared", SiPrefixes::None, SiDerived),
    linear("g0", "standard gravity", STANDARD_GRAVITY, Other),
    linear("Gal", "gal", 1e-2, Cgs),
    linear("ft/s2", "foot per second squared", FOOT, Imperial),
];

const FREQUENCY: &[UnitDef] = &[si("Hz", "hertz", All, SiDerived)];

const ANGULAR_VELOCITY: &[UnitDef] = &[
    si("rad/s", "radian per second", SiPrefixes::None, SiDerived),
    linear("rpm", "revolution per minute", std::f64::consts::TAU / 60.0, Other),
    linear("deg/s", "degree per second", std::f64::consts::PI / 180.0, SiAccepted),
];

const FORCE: &[UnitDef] = &[
    si("N", "newton", All, SiDerived),
    linear("dyn", "dyne", 1e-5, Cgs),
    linear("lbf", "pound-force", POUND * STANDARD_GRAVITY, Imperial),
    linear("kgf", "kilogram-force", STANDARD_GRAVITY, Other),
];

const ENERGY: &[UnitDef] = &[
    si("J", "joule", All, SiDerived),
    with_prefixes(linear("eV", "electronvolt", 1.602_176_634e-19, SiAccepted), All),
    linear("erg", "erg", 1e-7, Cgs),
    linear("cal", "calorie", 4.184, Other),
    linear("kcal", "kilocalorie", 4184.0, Other),
    with_prefixes(linear("Wh", "watt hour", 3600.0, SiAccepted), AtLeast(3)),
    linear("BTU", "British thermal unit", 1055.055_852_62, Imperial),
];

const POWER: &[UnitDef] = &[
    si("W", "watt", All, SiDerived),
    linear("hp", "horsepower", 745.699_871_582_270_2, Imperial),
];

const PRESSURE: &[UnitDef] = &[
    si("Pa", "pascal", All, SiDerived),
    with_prefixes(linear("bar", "bar", 1e5, SiAccepted), NegativeOnly),
    linear("atm", "standard atmosphere", 101_325.0, Other),
    linear("psi", "pound per square inch", POUND * STANDARD_GRAVITY / (INCH * INCH), Imperial),
    linear("mmHg", "millimeter of mercury", 133.322_387_415, Other),
    linear("Torr", "torr", 101_325.0 / 760.0, Other),
];

const DENSITY: &[UnitDef] = &[
    si("kg/m3", "kilogram per cubic meter", SiPrefixes::None, SiDerived),
    linear("g/cm3", "gram per cubic centimeter", 1e3, SiDerived),
    with_abbreviations(linear("g/L", "gram per liter", 1.0, SiAccepted), &["g/L", "g/l"]),
];

const CHARGE: &[UnitDef] = &[
    si("C", "coulomb", All, SiDerived),
    with_prefixes(linear("Ah", "ampere hour", 3600.0, SiAccepted), NegativeOnly),
];

const POTENTIAL: &[UnitDef] = &[si("V", "volt", All, SiDerived)];

const RESISTANCE: &[UnitDef] = &[with_abbreviations(
    si("Ω", "ohm", All, SiDerived),
    &["Ω", "ohm"],
)];

const CAPACITANCE: &[UnitDef] = &[si("F", "farad", All, SiDerived)];

/// The default catalogue, in registration order
pub const CATALOGUE: &[QuantityDef] = &[
    QuantityDef { name: "Dimensionless", dimensions: DimensionVector::DIMENSIONLESS, units: DIMENSIONLESS },
    QuantityDef { name: "Length", dimensions: DimensionVector::LENGTH, units: LENGTH },
    QuantityDef { name: "Mass", dimensions: DimensionVector::MASS, units: MASS },
    QuantityDef { name: "Duration", dimensions: DimensionVector::TIME, units: DURATION },
    QuantityDef { name: "ElectricalCurrent", dimensions: DimensionVector::CURRENT, units: CURRENT },
    QuantityDef { name: "AbsoluteTemperature", dimensions: DimensionVector::TEMPERATURE, units: TEMPERATURE },
    QuantityDef { name: "AmountOfSubstance", dimensions: DimensionVector::AMOUNT, units: AMOUNT },
    QuantityDef { name: "LuminousIntensity", dimensions: DimensionVector::LUMINOSITY, units: LUMINOSITY },
    QuantityDef { name: "Angle", dimensions: DimensionVector::ANGLE, units: ANGLE },
    QuantityDef { name: "SolidAngle", dimensions: DimensionVector::SOLID_ANGLE, units: SOLID_ANGLE },
    QuantityDef { name: "Area", dimensions: DimensionVector::AREA, units: AREA },
    QuantityDef { name: "Volume", dimensions: DimensionVector::VOLUME, units: VOLUME },
    QuantityDef { name: "Speed", dimensions: DimensionVector::VELOCITY, units: SPEED },
    QuantityDef { name: "Acceleration", dimensions: DimensionVector::ACCELERATION, units: ACCELERATION },
    QuantityDef { name: "Frequency", dimensions: DimensionVector::FREQUENCY, units: FREQUENCY },
    QuantityDef { name: "AngularVelocity", dimensions: DimensionVector::ANGULAR_VELOCITY, units: ANGULAR_VELOCITY },
    QuantityDef { name: "Force", dimensions: DimensionVector::FORCE, units: FORCE },
    QuantityDef { name: "Energy", dimensions: DimensionVector::ENERGY, units: ENERGY },
    QuantityDef { name: "Power", dimensions: DimensionVector::POWER, units: POWER },
    QuantityDef { name: "Pressure", dimensions: DimensionVector::PRESSURE, units: PRESSURE },
    QuantityDef { name: "Density", dimensions: DimensionVector::DENSITY, units: DENSITY },
    QuantityDef { name: "ElectricalCharge", dimensions: DimensionVector::CHARGE, units: CHARGE },
    QuantityDef { name: "ElectricalPotential", dimensions: DimensionVector::VOLTAGE, units: POTENTIAL },
    QuantityDef { name: "ElectricalResistance", dimensions: DimensionVector::RESISTANCE, units: RESISTANCE },
    QuantityDef { name: "ElectricalCapacitance", dimensions: DimensionVector::CAPACITANCE, units: CAPACITANCE },
];

/// Register [`CATALOGUE`] into `registry`
///
/// Entries that cannot be registered (for example because the caller
/// already registered a conflicting quantity) are logged and skipped.
pub fn register_defaults(registry: &Registry) {
    for def in CATALOGUE {
        let quantity = match Quantity::of(registry, def.name, def.dimensions) {
            Ok(quantity) => quantity,
            Err(err) => {
                tracing::warn!(quantity = def.name, %err, "skipping default quantity");
                continue;
            }
        };
        for unit in def.units {
            let mut builder = Unit::builder(&quantity, unit.id, unit.name)
                .scale(unit.scale)
                .si_prefixes(unit.prefixes)
                .unit_system(unit.system);
            for abbreviation in unit.abbreviations {
                builder = builder.abbreviation(*abbreviation);
            }
            if let Err(err) = builder.build(registry) {
                tracing::warn!(unit = unit.id, quantity = def.name, %err, "skipping default unit");
            }
        }
    }
    tracing::debug!(quantities = registry.len(), "registered default SI catalogue");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_dimensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for def in CATALOGUE {
            assert!(seen.insert(def.dimensions), "{} shares its dimensions", def.name);
        }
    }

    #[test]
    fn test_catalogue_scales_are_valid() {
        for def in CATALOGUE {
            assert!(def.units[0].scale.is_base(), "{} has no standard unit first", def.name);
            for unit in def.units {
                assert!(unit.scale.validated().is_ok(), "{}", unit.id);
            }
        }
    }

    #[test]
    fn test_defaults_register_cleanly() {
        let registry = Registry::new();
        assert_eq!(registry.len(), CATALOGUE.len());
        for def in CATALOGUE {
            let quantity = registry.quantity_by_name(def.name).unwrap();
            for unit in def.units {
                assert!(quantity.unit_by_id(unit.id).is_some(), "{} missing", unit.id);
            }
            assert_eq!(quantity.standard_unit().unwrap().id(), def.units[0].id);
        }
    }

    #[test]
    fn test_common_conversions() {
        let registry = Registry::new();
        let unit = |a: &str| registry.unit_by_abbreviation(a).unwrap();

        assert!((unit("km").convert(1.0, &unit("m")).unwrap() - 1000.0).abs() < 1e-9);
        assert!((unit("mi").convert(1.0, &unit("km")).unwrap() - 1.609_344).abs() < 1e-12);
        assert!((unit("°C").convert(100.0, &unit("°F")).unwrap() - 212.0).abs() < 1e-9);
        assert!((unit("°F").convert(32.0, &unit("°C")).unwrap()).abs() < 1e-9);
        assert!((unit("g").convert(1.0, &unit("mg")).unwrap() - 1000.0).abs() < 1e-9);
        assert!((unit("h").convert(1.5, &unit("min")).unwrap() - 90.0).abs() < 1e-9);
        assert!((unit("kWh").convert(1.0, &unit("MJ")).unwrap() - 3.6).abs() < 1e-12);
        assert!((unit("atm").convert(1.0, &unit("mbar")).unwrap() - 1013.25).abs() < 1e-9);

        let slope = unit("%").convert(10.0, &unit("°")).unwrap();
        assert!((slope - 5.71).abs() < 0.01);
    }

    #[test]
    fn test_angle_is_not_a_pure_number() {
        let registry = Registry::new();
        let rad = registry.unit_by_abbreviation("rad").unwrap();
        let one = registry.unit_by_abbreviation("1").unwrap();
        assert!(!rad.is_convertible_to(&one));
        let hz = registry.unit_by_abbreviation("Hz").unwrap();
        let rad_s = registry.unit_by_abbreviation("rad/s").unwrap();
        assert!(!hz.is_convertible_to(&rad_s));
    }
}
