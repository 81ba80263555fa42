//! Sizing engine: per-kind lot size and margin formulas, input coercion,
//! diagnostics and display.

mod config;
mod engine;
mod numeric;
mod report;
mod validation;

pub use config::{LeverageConfig, SettingKey};
pub use engine::{compute_sizing, SizingResult};
pub use numeric::{number_or_zero, parse_decimal, NumericInput};
pub use report::SizingReport;
pub use validation::{diagnose, InputWarning};
