//! Trade request and direction types.

use serde::{Deserialize, Serialize};

use crate::sizing::NumericInput;

/// Resolved direction of a trade. `Auto` does not exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

/// What the trader asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DirectionPreference {
    /// Long when entry is above the stop, short otherwise
    #[default]
    Auto,
    Long,
    Short,
}

impl DirectionPreference {
    /// Resolve against the entry/stop ordering. Equal prices resolve to short.
    pub fn resolve<T: PartialOrd>(self, entry: T, stop_loss: T) -> Direction {
        match self {
            DirectionPreference::Long => Direction::Long,
            DirectionPreference::Short => Direction::Short,
            DirectionPreference::Auto if entry > stop_loss => Direction::Long,
            DirectionPreference::Auto => Direction::Short,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionPreference::Auto => "auto",
            DirectionPreference::Long => "long",
            DirectionPreference::Short => "short",
        }
    }
}

/// Unrecognized stored values fall back to `Auto`.
impl From<String> for DirectionPreference {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "long" => Self::Long,
            "short" => Self::Short,
            _ => Self::Auto,
        }
    }
}

/// One sizing request, as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRequest {
    #[serde(alias = "instrument")]
    pub instrument_id: String,

    #[serde(alias = "entry")]
    pub entry_price: NumericInput,

    #[serde(alias = "stopLoss")]
    pub stop_loss_price: NumericInput,

    /// Dollar amount at risk if the stop is hit
    #[serde(rename = "riskAmountUSD", alias = "riskUSD")]
    pub risk_amount_usd: NumericInput,

    #[serde(alias = "direction")]
    pub direction_preference: DirectionPreference,
}

impl TradeRequest {
    pub fn new(
        instrument_id: impl Into<String>,
        entry_price: impl Into<NumericInput>,
        stop_loss_price: impl Into<NumericInput>,
        risk_amount_usd: impl Into<NumericInput>,
        direction_preference: DirectionPreference,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            entry_price: entry_price.into(),
            stop_loss_price: stop_loss_price.into(),
            risk_amount_usd: risk_amount_usd.into(),
            direction_preference,
        }
    }
}

impl Default for TradeRequest {
    fn default() -> Self {
        Self::new("EURUSD", "1.585", "1.58", "500", DirectionPreference::Auto)
    }
}
