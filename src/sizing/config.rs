//! Leverage and conversion settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::numeric::lenient_decimal;

/// User-adjustable leverage and rate settings shared by every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeverageConfig {
    /// Leverage for FX pairs (EURUSD/GBPUSD)
    #[serde(deserialize_with = "lenient_decimal")]
    pub fx_leverage: Decimal,

    /// Leverage for gold (XAUUSD)
    #[serde(deserialize_with = "lenient_decimal")]
    pub gold_leverage: Decimal,

    /// Leverage for index CFDs (GER40)
    #[serde(deserialize_with = "lenient_decimal", alias = "ger40Leverage")]
    pub index_leverage: Decimal,

    /// Value of one index point per lot, in the index's quote currency
    #[serde(deserialize_with = "lenient_decimal", alias = "ger40PointValueEUR")]
    pub index_point_value_base: Decimal,

    /// Index quote currency to USD (EURUSD for GER40)
    #[serde(deserialize_with = "lenient_decimal", alias = "eurusdRate")]
    pub quote_conversion_rate: Decimal,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            fx_leverage: dec!(30),
            gold_leverage: dec!(9),
            index_leverage: dec!(15),
            index_point_value_base: dec!(1),
            quote_conversion_rate: dec!(1.1),
        }
    }
}

/// Names of the individual settings, for editing one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingKey {
    FxLeverage,
    GoldLeverage,
    IndexLeverage,
    IndexPointValue,
    QuoteRate,
}

impl SettingKey {
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::FxLeverage => "FX Leverage (EURUSD/GBPUSD)",
            SettingKey::GoldLeverage => "Gold Leverage (XAUUSD)",
            SettingKey::IndexLeverage => "GER40 Leverage",
            SettingKey::IndexPointValue => "GER40 point value (EUR/pt/lot)",
            SettingKey::QuoteRate => "EURUSD rate (for GER40 conversion)",
        }
    }

    pub fn all() -> [SettingKey; 5] {
        [
            SettingKey::FxLeverage,
            SettingKey::GoldLeverage,
            SettingKey::IndexLeverage,
            SettingKey::IndexPointValue,
            SettingKey::QuoteRate,
        ]
    }
}

impl LeverageConfig {
    pub fn get(&self, key: SettingKey) -> Decimal {
        match key {
            SettingKey::FxLeverage => self.fx_leverage,
            SettingKey::GoldLeverage => self.gold_leverage,
            SettingKey::IndexLeverage => self.index_leverage,
            SettingKey::IndexPointValue => self.index_point_value_base,
            SettingKey::QuoteRate => self.quote_conversion_rate,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: Decimal) {
        let slot = match key {
            SettingKey::FxLeverage => &mut self.fx_leverage,
            SettingKey::GoldLeverage => &mut self.gold_leverage,
            SettingKey::IndexLeverage => &mut self.index_leverage,
            SettingKey::IndexPointValue => &mut self.index_point_value_base,
            SettingKey::QuoteRate => &mut self.quote_conversion_rate,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LeverageConfig::default();
        assert_eq!(config.fx_leverage, dec!(30));
        assert_eq!(config.gold_leverage, dec!(9));
        assert_eq!(config.index_leverage, dec!(15));
        assert_eq!(config.index_point_value_base, dec!(1));
        assert_eq!(config.quote_conversion_rate, dec!(1.1));
    }

    #[test]
    fn test_reads_legacy_keys_and_text_values() {
        let json = r#"{
            "fxLeverage": "50",
            "goldLeverage": 20,
            "eurusdRate": "1,08",
            "ger40PointValueEUR": 25,
            "ger40Leverage": "oops"
        }"#;
        let config: LeverageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fx_leverage, dec!(50));
        assert_eq!(config.gold_leverage, dec!(20));
        assert_eq!(config.quote_conversion_rate, dec!(1.08));
        assert_eq!(config.index_point_value_base, dec!(25));
        assert_eq!(config.index_leverage, Decimal::ZERO);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: LeverageConfig = serde_json::from_str(r#"{"fxLeverage": 100}"#).unwrap();
        assert_eq!(config.fx_leverage, dec!(100));
        assert_eq!(config.gold_leverage, dec!(9));
    }

    #[test]
    fn test_get_set_by_key() {
        let mut config = LeverageConfig::default();
        for key in SettingKey::all() {
            config.set(key, dec!(7));
            assert_eq!(config.get(key), dec!(7));
        }
    }
}
