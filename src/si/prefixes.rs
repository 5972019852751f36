//! SI Prefixes
//!
//! The 24 decimal prefixes from quecto (10⁻³⁰) to quetta (10³⁰), and the
//! expansion of a unit into its prefixed family according to its
//! [`SiPrefixes`] policy.

use crate::unit::{SiPrefixes, Unit, UnitBuilder};

/// A decimal SI prefix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiPrefix {
    /// Full name (e.g. "kilo")
    pub name: &'static str,
    /// Symbol (e.g. "k")
    pub symbol: &'static str,
    /// ASCII stand-in for non-ASCII symbols ("u" for "μ")
    pub ascii: Option<&'static str>,
    /// Power of ten
    pub power: i8,
    /// `10^power`
    pub factor: f64,
}

const fn prefix(name: &'static str, symbol: &'static str, power: i8, factor: f64) -> SiPrefix {
    SiPrefix {
        name,
        symbol,
        ascii: None,
        power,
        factor,
    }
}

/// All SI prefixes, smallest first
pub const PREFIXES: [SiPrefix; 24] = [
    prefix("quecto", "q", -30, 1e-30),
    prefix("ronto", "r", -27, 1e-27),
    prefix("yocto", "y", -24, 1e-24),
    prefix("zepto", "z", -21, 1e-21),
    prefix("atto", "a", -18, 1e-18),
    prefix("femto", "f", -15, 1e-15),
    prefix("pico", "p", -12, 1e-12),
    prefix("nano", "n", -9, 1e-9),
    SiPrefix {
        name: "micro",
        symbol: "μ",
        ascii: Some("u"),
        power: -6,
        factor: 1e-6,
    },
    prefix("milli", "m", -3, 1e-3),
    prefix("centi", "c", -2, 1e-2),
    prefix("deci", "d", -1, 1e-1),
    prefix("deca", "da", 1, 1e1),
    prefix("hecto", "h", 2, 1e2),
    prefix("kilo", "k", 3, 1e3),
    prefix("mega", "M", 6, 1e6),
    prefix("giga", "G", 9, 1e9),
    prefix("tera", "T", 12, 1e12),
    prefix("peta", "P", 15, 1e15),
    prefix("exa", "E", 18, 1e18),
    prefix("zetta", "Z", 21, 1e21),
    prefix("yotta", "Y", 24, 1e24),
    prefix("ronna", "R", 27, 1e27),
    prefix("quetta", "Q", 30, 1e30),
];

/// Prefix by symbol, ASCII stand-in included
pub fn by_symbol(symbol: &str) -> Option<&'static SiPrefix> {
    PREFIXES
        .iter()
        .find(|p| p.symbol == symbol || p.ascii == Some(symbol))
}

/// Builders for the prefixed units of `base`
///
/// With [`SiPrefixes::Kilo`] the base is a kilo-prefixed unit (kg): its
/// stem (g) is generated along with every admitted prefix except kilo.
/// Prefixes whose composed scale is not representable are skipped.
pub(crate) fn expand(base: &Unit) -> Vec<UnitBuilder> {
    let policy = base.si_prefixes();
    let mut builders = Vec::new();

    let (stem_ids, stem_name, stem_factor) = match policy {
        SiPrefixes::None => return builders,
        SiPrefixes::Kilo => {
            let stems = base
                .abbreviations()
                .iter()
                .filter_map(|a| a.strip_prefix('k'))
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>();
            let Some(stem) = stems.first().cloned() else {
                tracing::trace!(unit = base.id(), "kilo unit without a k-prefixed abbreviation");
                return builders;
            };
            let name = base
                .name()
                .strip_prefix("kilo")
                .unwrap_or(base.name())
                .to_string();
            if let Some(builder) = derive(base, 1e-3, stem, name.clone()) {
                builders.push(with_abbreviations(builder, &stems, "").generated());
            }
            (stems, name, 1e-3)
        }
        _ => (base.abbreviations().to_vec(), base.name().to_string(), 1.0),
    };

    for prefix in PREFIXES.iter().filter(|p| policy.admits(p.power)) {
        if policy == SiPrefixes::Kilo && prefix.power == 3 {
            continue;
        }
        let id = format!("{}{}", prefix.symbol, stem_ids[0]);
        let name = format!("{}{}", prefix.name, stem_name);
        let Some(builder) = derive(base, prefix.factor * stem_factor, id, name) else {
            continue;
        };
        let mut builder = with_abbreviations(builder, &stem_ids, prefix.symbol);
        if let Some(ascii) = prefix.ascii {
            builder = with_abbreviations(builder, &stem_ids, ascii);
        }
        builders.push(builder.generated());
    }
    builders
}

fn derive(base: &Unit, factor: f64, id: String, name: String) -> Option<UnitBuilder> {
    match base.derive_linear(factor, id.as_str(), name) {
        Ok(builder) => Some(builder),
        Err(err) => {
            tracing::trace!(unit = %id, %err, "skipped prefixed unit");
            None
        }
    }
}

fn with_abbreviations(mut builder: UnitBuilder, stems: &[String], symbol: &str) -> UnitBuilder {
    for stem in stems {
        builder = builder.abbreviation(format!("{symbol}{stem}"));
    }
    builder
}
