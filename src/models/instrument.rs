//! Static instrument registry and pricing kinds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Standard pip size for the majors.
pub const STANDARD_PIP_SIZE: Decimal = dec!(0.0001);

/// How an instrument's price distance and margin are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PricingKind {
    /// Spot FX quoted in USD, 100,000-unit standard lot
    Fx { pip_size: Decimal },
    /// Spot gold, 100 troy oz per lot
    Gold,
    /// Index CFD settled in a non-USD quote currency
    IndexCfd,
}

impl PricingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingKind::Fx { .. } => "fx",
            PricingKind::Gold => "gold",
            PricingKind::IndexCfd => "index-cfd",
        }
    }
}

/// A tradable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    /// Unique symbol (e.g., "EURUSD")
    pub id: &'static str,

    /// Display label
    pub label: &'static str,

    /// Pricing kind and its parameters
    #[serde(flatten)]
    pub kind: PricingKind,
}

impl Instrument {
    /// Pip size for FX instruments, `None` otherwise.
    pub fn pip_size(&self) -> Option<Decimal> {
        match self.kind {
            PricingKind::Fx { pip_size } => Some(pip_size),
            PricingKind::Gold | PricingKind::IndexCfd => None,
        }
    }
}

static INSTRUMENTS: [Instrument; 4] = [
    Instrument {
        id: "EURUSD",
        label: "EURUSD (FX)",
        kind: PricingKind::Fx { pip_size: STANDARD_PIP_SIZE },
    },
    Instrument {
        id: "GBPUSD",
        label: "GBPUSD (FX)",
        kind: PricingKind::Fx { pip_size: STANDARD_PIP_SIZE },
    },
    Instrument {
        id: "XAUUSD",
        label: "XAUUSD (Gold)",
        kind: PricingKind::Gold,
    },
    Instrument {
        id: "GER40",
        label: "GER40 (DAX)",
        kind: PricingKind::IndexCfd,
    },
];

/// Every known instrument, in display order.
pub fn all() -> &'static [Instrument] {
    &INSTRUMENTS
}

/// Look up an instrument by exact id.
pub fn resolve(instrument_id: &str) -> Option<&'static Instrument> {
    INSTRUMENTS.iter().find(|i| i.id == instrument_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_ids() {
        assert_eq!(resolve("EURUSD").map(|i| i.kind.as_str()), Some("fx"));
        assert_eq!(resolve("XAUUSD").map(|i| i.kind), Some(PricingKind::Gold));
        assert_eq!(resolve("GER40").map(|i| i.kind), Some(PricingKind::IndexCfd));
        assert_eq!(resolve("GBPUSD").and_then(Instrument::pip_size), Some(dec!(0.0001)));
    }

    #[test]
    fn test_resolve_is_exact_match() {
        assert!(resolve("eurusd").is_none());
        assert!(resolve("EURUSD ").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_ids_are_unique_and_fx_pips_positive() {
        let ids: std::collections::HashSet<_> = all().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), all().len());

        for instrument in all() {
            if let Some(pip) = instrument.pip_size() {
                assert!(pip > Decimal::ZERO, "{} pip size", instrument.id);
            }
        }
    }

    #[test]
    fn test_serializes_kind_tag() {
        let json = serde_json::to_value(resolve("EURUSD").unwrap()).unwrap();
        assert_eq!(json["id"], "EURUSD");
        assert_eq!(json["kind"], "fx");
        assert_eq!(json["pip_size"], "0.0001");

        let json = serde_json::to_value(resolve("GER40").unwrap()).unwrap();
        assert_eq!(json["kind"], "index-cfd");
    }
}
