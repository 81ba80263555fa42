//! Lot size, margin and take-profit calculation.
//!
//! The engine is a pure function of a [`TradeRequest`] and a
//! [`LeverageConfig`]. Bad input never fails: every quantity whose inputs
//! are unreadable or degenerate comes out as zero.
//!
//! Per-kind formulas (A = entry, C = risk, d = |entry - stop|):
//!
//! | kind      | distance   | lots                    | margin per lot            |
//! |-----------|------------|-------------------------|---------------------------|
//! | fx        | d / pip    | C / (pips * 10)         | A * 100000 / fx_leverage  |
//! | gold      | d          | C / (d * 100)           | A * 100 / gold_leverage   |
//! | index-cfd | d          | C / (d * rate * point)  | A / index_leverage * rate |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::{instrument, Direction, PricingKind, TradeRequest};
use super::LeverageConfig;

/// Units of base currency in one standard FX lot.
pub const FX_CONTRACT_UNITS: Decimal = dec!(100000);

/// USD value of one pip on one standard lot.
pub const FX_PIP_VALUE_PER_LOT: Decimal = dec!(10);

/// Troy ounces in one gold lot.
pub const GOLD_OUNCES_PER_LOT: Decimal = dec!(100);

/// Reward target as a multiple of risk (1:2).
pub const REWARD_MULTIPLE: Decimal = dec!(2);

/// Output of one sizing calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    /// |entry - stop loss| in price units
    pub price_distance: Decimal,

    /// Distance in the instrument's risk unit (pips for FX, points otherwise)
    pub normalized_distance: Decimal,

    pub resolved_direction: Direction,

    /// Position size in lots
    pub lot_size: Decimal,

    /// USD needed to hold one lot at entry
    pub margin_per_lot: Decimal,

    /// `lot_size * margin_per_lot`
    pub required_margin: Decimal,

    #[serde(rename = "rewardUSD")]
    pub reward_usd: Decimal,

    pub take_profit_price: Decimal,
}

/// The kind-dependent part of a result.
#[derive(Debug, Default)]
struct KindSizing {
    normalized_distance: Decimal,
    lot_size: Decimal,
    margin_per_lot: Decimal,
}

/// Compute sizing for one request.
pub fn compute_sizing(request: &TradeRequest, config: &LeverageConfig) -> SizingResult {
    let entry = request.entry_price.value();
    let stop_loss = request.stop_loss_price.value();
    let risk = request.risk_amount_usd.value();

    let resolved_direction = request.direction_preference.resolve(entry, stop_loss);
    let reward_usd = mul(REWARD_MULTIPLE, risk);

    let Some((price_distance, take_profit_price)) =
        price_target(entry, stop_loss, resolved_direction)
    else {
        // Prices too far apart to represent: nothing else is derivable either.
        return SizingResult {
            price_distance: Decimal::ZERO,
            normalized_distance: Decimal::ZERO,
            resolved_direction,
            lot_size: Decimal::ZERO,
            margin_per_lot: Decimal::ZERO,
            required_margin: Decimal::ZERO,
            reward_usd,
            take_profit_price: entry,
        };
    };

    let sized = instrument::resolve(&request.instrument_id)
        .map(|i| size_for_kind(i.kind, entry, price_distance, risk, config))
        .unwrap_or_default();

    SizingResult {
        price_distance,
        normalized_distance: sized.normalized_distance,
        resolved_direction,
        lot_size: sized.lot_size,
        margin_per_lot: sized.margin_per_lot,
        required_margin: mul(sized.lot_size, sized.margin_per_lot),
        reward_usd,
        take_profit_price,
    }
}

/// `|entry - stop|` and the take-profit `2 * distance` away, `None` on overflow.
fn price_target(
    entry: Decimal,
    stop_loss: Decimal,
    direction: Direction,
) -> Option<(Decimal, Decimal)> {
    let distance = entry.checked_sub(stop_loss)?.abs();
    let offset = REWARD_MULTIPLE.checked_mul(distance)?;
    let take_profit = match direction {
        Direction::Long => entry.checked_add(offset)?,
        Direction::Short => entry.checked_sub(offset)?,
    };
    Some((distance, take_profit))
}

fn size_for_kind(
    kind: PricingKind,
    entry: Decimal,
    price_distance: Decimal,
    risk: Decimal,
    config: &LeverageConfig,
) -> KindSizing {
    match kind {
        PricingKind::Fx { pip_size } => {
            let pips = div(price_distance, pip_size);
            KindSizing {
                normalized_distance: pips,
                lot_size: lots_for_risk(risk, pips, FX_PIP_VALUE_PER_LOT),
                margin_per_lot: when_positive(entry, |a| {
                    div(mul(a, FX_CONTRACT_UNITS), config.fx_leverage)
                }),
            }
        }
        PricingKind::Gold => KindSizing {
            normalized_distance: price_distance,
            lot_size: lots_for_risk(risk, price_distance, GOLD_OUNCES_PER_LOT),
            margin_per_lot: when_positive(entry, |a| {
                div(mul(a, GOLD_OUNCES_PER_LOT), config.gold_leverage)
            }),
        },
        PricingKind::IndexCfd => {
            let rate = config.quote_conversion_rate;
            let margin_in_quote = when_positive(entry, |a| div(a, config.index_leverage));
            KindSizing {
                normalized_distance: price_distance,
                lot_size: lots_for_risk(
                    risk,
                    price_distance,
                    mul(rate, config.index_point_value_base),
                ),
                margin_per_lot: mul(margin_in_quote, rate),
            }
        }
    }
}

/// Lots such that `distance * value_per_unit * lots == risk`.
fn lots_for_risk(risk: Decimal, distance: Decimal, value_per_unit: Decimal) -> Decimal {
    when_positive(distance, |d| div(risk, mul(d, value_per_unit)))
}

fn when_positive(value: Decimal, f: impl FnOnce(Decimal) -> Decimal) -> Decimal {
    if value > Decimal::ZERO {
        f(value)
    } else {
        Decimal::ZERO
    }
}

// Overflow and division by zero both collapse to zero.

fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}

fn div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(Decimal::ZERO)
}
