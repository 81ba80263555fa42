//! Field-level warnings that explain why a result came out as zero.
//!
//! Diagnostics run beside the engine and never change its numbers.

use std::fmt;

use rust_decimal::Decimal;

use crate::models::{instrument, PricingKind, TradeRequest};
use super::{LeverageConfig, SettingKey};

/// One reason a calculation may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    UnknownInstrument(String),
    EntryNotNumeric,
    StopLossNotNumeric,
    RiskNotNumeric,
    NonPositiveEntry,
    NegativeRisk,
    ZeroDistance,
    NonPositiveSetting(SettingKey),
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::UnknownInstrument(id) => write!(f, "unknown instrument '{}'", id),
            InputWarning::EntryNotNumeric => f.write_str("entry price is not a number"),
            InputWarning::StopLossNotNumeric => f.write_str("stop loss is not a number"),
            InputWarning::RiskNotNumeric => f.write_str("risk amount is not a number"),
            InputWarning::NonPositiveEntry => f.write_str("entry price must be above zero"),
            InputWarning::NegativeRisk => f.write_str("risk amount is negative"),
            InputWarning::ZeroDistance => f.write_str("entry and stop loss are equal"),
            InputWarning::NonPositiveSetting(key) => {
                write!(f, "setting '{}' must be above zero", key.label())
            }
        }
    }
}

/// Collect warnings for a request, in field order.
pub fn diagnose(request: &TradeRequest, config: &LeverageConfig) -> Vec<InputWarning> {
    let mut warnings = Vec::new();

    let instrument = instrument::resolve(&request.instrument_id);
    if instrument.is_none() {
        warnings.push(InputWarning::UnknownInstrument(request.instrument_id.clone()));
    }

    let entry = request.entry_price.parse();
    let stop_loss = request.stop_loss_price.parse();
    let risk = request.risk_amount_usd.parse();

    match entry {
        None => warnings.push(InputWarning::EntryNotNumeric),
        Some(a) if a <= Decimal::ZERO => warnings.push(InputWarning::NonPositiveEntry),
        Some(_) => {}
    }
    if stop_loss.is_none() {
        warnings.push(InputWarning::StopLossNotNumeric);
    }
    match risk {
        None => warnings.push(InputWarning::RiskNotNumeric),
        Some(c) if c < Decimal::ZERO => warnings.push(InputWarning::NegativeRisk),
        Some(_) => {}
    }
    if let (Some(a), Some(b)) = (entry, stop_loss) {
        if a == b {
            warnings.push(InputWarning::ZeroDistance);
        }
    }

    if let Some(instrument) = instrument {
        for key in settings_used_by(instrument.kind) {
            if config.get(*key) <= Decimal::ZERO {
                warnings.push(InputWarning::NonPositiveSetting(*key));
            }
        }
    }

    warnings
}

fn settings_used_by(kind: PricingKind) -> &'static [SettingKey] {
    match kind {
        PricingKind::Fx { .. } => &[SettingKey::FxLeverage],
        PricingKind::Gold => &[SettingKey::GoldLeverage],
        PricingKind::IndexCfd => &[
            SettingKey::IndexLeverage,
            SettingKey::IndexPointValue,
            SettingKey::QuoteRate,
        ],
    }
}
