//! Position Size Calculator
//!
//! Sizes FX, gold and index CFD trades from entry, stop loss and dollar
//! risk, targeting a fixed 1:2 risk/reward.

mod models;
mod sizing;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::models::{instrument, DirectionPreference, TradeRequest};
use crate::sizing::{
    compute_sizing, diagnose, number_or_zero, parse_decimal, InputWarning, LeverageConfig,
    SettingKey, SizingReport, SizingResult,
};
use crate::state::{PersistedState, StateStore};

/// Position size calculator CLI.
#[derive(Parser)]
#[command(name = "psc")]
#[command(about = "Position size calculator with a fixed 1:2 risk/reward target", long_about = None)]
struct Cli {
    /// State file path
    #[arg(short, long, env = "PSC_STATE_PATH", default_value = "psc_state.json")]
    state: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a position; omitted inputs come from the last run
    Calc {
        #[command(flatten)]
        overrides: CalcOverrides,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Don't remember these inputs
        #[arg(long)]
        no_save: bool,
    },

    /// List supported instruments
    Instruments,

    /// Show or change leverage and rate settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

/// Trade inputs given on the command line.
#[derive(Args, Debug, Default)]
struct CalcOverrides {
    /// Instrument id (see `psc instruments`)
    #[arg(short, long)]
    instrument: Option<String>,

    /// Entry price
    #[arg(short, long, allow_hyphen_values = true)]
    entry: Option<String>,

    /// Stop-loss price
    #[arg(long, allow_hyphen_values = true)]
    stop_loss: Option<String>,

    /// Risk in USD
    #[arg(short, long, allow_hyphen_values = true)]
    risk: Option<String>,

    /// Trade direction
    #[arg(short, long, value_enum)]
    direction: Option<DirectionPreference>,
}

impl CalcOverrides {
    /// Replace only the fields that were given.
    fn apply(self, inputs: &mut TradeRequest) {
        if let Some(id) = self.instrument {
            inputs.instrument_id = id;
        }
        if let Some(entry) = self.entry {
            inputs.entry_price = entry.into();
        }
        if let Some(stop_loss) = self.stop_loss {
            inputs.stop_loss_price = stop_loss.into();
        }
        if let Some(risk) = self.risk {
            inputs.risk_amount_usd = risk.into();
        }
        if let Some(direction) = self.direction {
            inputs.direction_preference = direction;
        }
    }
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,

    /// Change one setting
    Set {
        #[arg(value_enum)]
        key: SettingKey,

        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Restore default settings
    Reset,

    /// Show settings after every calculation
    Panel {
        #[arg(value_enum)]
        state: PanelState,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelState {
    On,
    Off,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = StateStore::new(cli.state);
    let mut state = store.load();

    match cli.command {
        Commands::Calc {
            overrides,
            json,
            no_save,
        } => {
            let (result, warnings) = run_calc(&store, &mut state, overrides, !no_save)?;
            let request = &state.last_inputs;

            if json {
                let output = serde_json::json!({
                    "request": request,
                    "result": result,
                    "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let label = instrument::resolve(&request.instrument_id)
                    .map(|i| i.label)
                    .unwrap_or(request.instrument_id.as_str());
                print!("{}", SizingReport::new(label, &result));

                if !warnings.is_empty() {
                    println!("\nIncomplete input:");
                    for w in &warnings {
                        println!("  - {}", w);
                    }
                }
                if state.show_settings_panel {
                    print_settings(&state.settings);
                }
            }
        }

        Commands::Instruments => {
            println!("\n{:<10} {:<16} {:<10} {:>8}", "ID", "LABEL", "KIND", "PIP");
            println!("{}", "-".repeat(47));
            for i in instrument::all() {
                let pip = i.pip_size().map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{:<10} {:<16} {:<10} {:>8}", i.id, i.label, i.kind.as_str(), pip);
            }
        }

        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => print_settings(&state.settings),

            SettingsAction::Set { key, value } => {
                if parse_decimal(&value).is_none() {
                    warn!(key = key.label(), value = %value, "Not a number, stored as 0");
                }
                state.settings.set(key, number_or_zero(&value));
                store.save(&state)?;
                info!(key = key.label(), path = %store.path().display(), "Setting updated");
                print_settings(&state.settings);
            }

            SettingsAction::Reset => {
                state.settings = LeverageConfig::default();
                store.save(&state)?;
                println!("Settings reset to defaults.");
                print_settings(&state.settings);
            }

            SettingsAction::Panel { state: panel } => {
                state.show_settings_panel = matches!(panel, PanelState::On);
                store.save(&state)?;
                println!(
                    "Settings panel: {}",
                    if state.show_settings_panel { "on" } else { "off" }
                );
            }
        },
    }

    Ok(())
}

/// Merge overrides into the stored inputs and size them, saving the merged
/// inputs when `persist` is set.
fn run_calc(
    store: &StateStore,
    state: &mut PersistedState,
    overrides: CalcOverrides,
    persist: bool,
) -> Result<(SizingResult, Vec<InputWarning>)> {
    overrides.apply(&mut state.last_inputs);

    let request = &state.last_inputs;
    info!(
        instrument = %request.instrument_id,
        entry = %request.entry_price,
        stop_loss = %request.stop_loss_price,
        risk = %request.risk_amount_usd,
        direction = request.direction_preference.as_str(),
        "Computing position size"
    );

    let result = compute_sizing(request, &state.settings);
    let warnings = diagnose(request, &state.settings);
    for w in &warnings {
        warn!(warning = %w, "Incomplete input");
    }

    if persist {
        store.save(state)?;
    }
    Ok((result, warnings))
}

/// Print the settings block.
fn print_settings(settings: &LeverageConfig) {
    println!("\n=== Global Settings ===\n");
    for key in SettingKey::all() {
        println!("  {:<36} {}", key.label(), settings.get(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::tempdir;

    fn stored_state() -> PersistedState {
        PersistedState {
            last_inputs: TradeRequest::new("XAUUSD", "1900", "1890", "200", DirectionPreference::Long),
            ..PersistedState::default()
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calc_args() {
        let cli = Cli::try_parse_from([
            "psc", "calc", "-i", "XAUUSD", "-e", "1900", "--stop-loss", "1890", "-r", "200", "-d",
            "short",
        ])
        .unwrap();

        match cli.command {
            Commands::Calc { overrides, json, .. } => {
                assert_eq!(overrides.instrument.as_deref(), Some("XAUUSD"));
                assert_eq!(overrides.stop_loss.as_deref(), Some("1890"));
                assert_eq!(overrides.direction, Some(DirectionPreference::Short));
                assert!(!json);
            }
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn test_short_l_is_log_level_only() {
        let cli = Cli::try_parse_from(["psc", "-l", "debug", "calc", "--stop-loss", "-1.19"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Calc { overrides, .. } => {
                assert_eq!(overrides.stop_loss.as_deref(), Some("-1.19"));
            }
            _ => panic!("expected calc"),
        }

        assert!(Cli::try_parse_from(["psc", "calc", "-l", "1890"]).is_err());
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::try_parse_from(["psc", "settings", "set", "quote-rate", "1,08"]).unwrap();
        match cli.command {
            Commands::Settings {
                action: Some(SettingsAction::Set { key, value }),
            } => {
                assert_eq!(key, SettingKey::QuoteRate);
                assert_eq!(value, "1,08");
            }
            _ => panic!("expected settings set"),
        }
    }

    #[test]
    fn test_partial_overrides_keep_stored_fields() {
        let mut inputs = stored_state().last_inputs;
        CalcOverrides {
            entry: Some("1910".to_string()),
            direction: Some(DirectionPreference::Auto),
            ..CalcOverrides::default()
        }
        .apply(&mut inputs);

        assert_eq!(inputs.instrument_id, "XAUUSD");
        assert_eq!(inputs.entry_price.value(), dec!(1910));
        assert_eq!(inputs.stop_loss_price.value(), dec!(1890));
        assert_eq!(inputs.risk_amount_usd.value(), dec!(200));
        assert_eq!(inputs.direction_preference, DirectionPreference::Auto);
    }

    #[test]
    fn test_no_save_leaves_state_file_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = StateStore::new(&path);
        store.save(&stored_state()).unwrap();
        let before = fs::read(&path).unwrap();

        let mut state = store.load();
        let overrides = CalcOverrides {
            risk: Some("400".to_string()),
            ..CalcOverrides::default()
        };
        let (result, warnings) = run_calc(&store, &mut state, overrides, false).unwrap();

        // 10 points of gold, $400 risk
        assert_eq!(result.lot_size, dec!(0.4));
        assert!(warnings.is_empty());
        assert_eq!(state.last_inputs.risk_amount_usd.value(), dec!(400));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_calc_saves_merged_inputs() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&stored_state()).unwrap();

        let mut state = store.load();
        let overrides = CalcOverrides {
            stop_loss: Some("1880".to_string()),
            ..CalcOverrides::default()
        };
        run_calc(&store, &mut state, overrides, true).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.last_inputs.instrument_id, "XAUUSD");
        assert_eq!(reloaded.last_inputs.entry_price.value(), dec!(1900));
        assert_eq!(reloaded.last_inputs.stop_loss_price.value(), dec!(1880));
        assert_eq!(reloaded.last_inputs.risk_amount_usd.value(), dec!(200));
    }

    #[test]
    fn test_persisted_state_default_is_usable() {
        let state = PersistedState::default();
        let result = compute_sizing(&state.last_inputs, &state.settings);
        // EURUSD 1.585 / 1.58, $500 risk: 50 pips, 1 lot
        assert_eq!(result.lot_size, dec!(1));
    }
}
