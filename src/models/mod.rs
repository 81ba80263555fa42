//! Data models for instruments and trade requests.

pub mod instrument;
mod trade;

pub use instrument::PricingKind;
pub use trade::{Direction, DirectionPreference, TradeRequest};
