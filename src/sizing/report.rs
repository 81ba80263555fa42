//! Human-readable rendering of a sizing result.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use super::SizingResult;

/// Decimals shown for money and distance fields.
pub const MONEY_DP: u32 = 2;

/// Decimals shown for lot size and prices.
pub const PRICE_DP: u32 = 3;

/// A result paired with the instrument it was computed for.
pub struct SizingReport<'a> {
    pub instrument_label: &'a str,
    pub result: &'a SizingResult,
}

impl<'a> SizingReport<'a> {
    pub fn new(instrument_label: &'a str, result: &'a SizingResult) -> Self {
        Self {
            instrument_label,
            result,
        }
    }
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value, MONEY_DP))
}

fn price(value: Decimal) -> String {
    format!("{:.3}", round_half_up(value, PRICE_DP))
}

impl fmt::Display for SizingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f, "\n{:=^48}", " POSITION SIZE ")?;
        writeln!(f, "Instrument:            {}", self.instrument_label)?;
        writeln!(
            f,
            "Computed direction:    {}",
            r.resolved_direction.as_str().to_uppercase()
        )?;
        writeln!(f)?;
        writeln!(f, "Distance (pips/$/pts): {}", money(r.normalized_distance))?;
        writeln!(f, "Position Size (lots):  {}", price(r.lot_size))?;
        writeln!(f, "Margin per 1 lot ($):  {}", money(r.margin_per_lot))?;
        writeln!(f)?;
        writeln!(f, "Required Margin ($):   {}", money(r.required_margin))?;
        writeln!(f, "Reward ($):            {}", money(r.reward_usd))?;
        writeln!(f, "TP price (R/R 1:2):    {}", price(r.take_profit_price))?;
        writeln!(f, "{:=^48}", "")?;
        Ok(())
    }
}
