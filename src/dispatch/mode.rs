//! Operating-mode configuration and its serialization to the target's CLI

use crate::error::DispatchError;
use chrono::NaiveTime;

/// Raw snapshot of the dispatch environment surface
///
/// Every field is optional here; [`ModeConfig::from_settings`] decides which
/// ones the selected mode requires and rejects any field that belongs
/// exclusively to a different mode, so cross-mode leakage dies before a
/// process is spawned.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    pub mode: Option<String>,
    pub strategy_id: Option<i64>,
    pub per_position_notional: Option<f64>,
    pub threshold: Option<f64>,
    pub poll_interval_seconds: Option<u64>,
    pub session_start: Option<String>,
    pub session_end: Option<String>,
    pub risk_reward: Option<f64>,
    pub volume_multiplier: Option<f64>,
    pub volume_lookback: Option<u32>,
    pub confirm_on_close: Option<bool>,
    pub use_atr_buffer: Option<bool>,
    pub use_volume_filter: Option<bool>,
    pub capital: Option<f64>,
    pub leverage: Option<f64>,
    pub close_deviation_points: Option<u32>,
    pub force_close: Option<bool>,
}

impl DispatchSettings {
    /// Names of mode-specific fields that are populated
    ///
    /// `mode` and `strategy_id` are common to every mode and excluded.
    fn populated_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.per_position_notional.is_some() {
            fields.push("per_position_notional");
        }
        if self.threshold.is_some() {
            fields.push("threshold");
        }
        if self.poll_interval_seconds.is_some() {
            fields.push("poll_interval_seconds");
        }
        if self.session_start.is_some() {
            fields.push("session_start");
        }
        if self.session_end.is_some() {
            fields.push("session_end");
        }
        if self.risk_reward.is_some() {
            fields.push("risk_reward");
        }
        if self.volume_multiplier.is_some() {
            fields.push("volume_multiplier");
        }
        if self.volume_lookback.is_some() {
            fields.push("volume_lookback");
        }
        if self.confirm_on_close.is_some() {
            fields.push("confirm_on_close");
        }
        if self.use_atr_buffer.is_some() {
            fields.push("use_atr_buffer");
        }
        if self.use_volume_filter.is_some() {
            fields.push("use_volume_filter");
        }
        if self.capital.is_some() {
            fields.push("capital");
        }
        if self.leverage.is_some() {
            fields.push("leverage");
        }
        if self.close_deviation_points.is_some() {
            fields.push("close_deviation_points");
        }
        if self.force_close.is_some() {
            fields.push("force_close");
        }
        fields
    }
}

/// Validated, mode-tagged configuration for one dispatch
///
/// Constructing a variant through [`ModeConfig::from_settings`] guarantees
/// that every numeric field passed type and range validation and that no
/// foreign-mode field was populated.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeConfig {
    /// Long-running poll against a threshold-style signal
    WatchThreshold {
        strategy_id: i64,
        per_position_notional: f64,
        threshold: f64,
        poll_interval_seconds: u64,
    },
    /// Long-running poll against a breakout signal inside a session window
    WatchBreakout {
        strategy_id: i64,
        per_position_notional: f64,
        poll_interval_seconds: u64,
        session_start: NaiveTime,
        session_end: NaiveTime,
        risk_reward: f64,
        volume_multiplier: f64,
        volume_lookback: u32,
        confirm_on_close: bool,
        use_atr_buffer: bool,
        use_volume_filter: bool,
    },
    /// One-shot immediate open sized from capital x leverage
    OpenNow {
        strategy_id: i64,
        capital: f64,
        leverage: f64,
    },
    /// One-shot close of the strategy's open positions
    CloseOnly {
        strategy_id: i64,
        close_deviation_points: u32,
        force_close: bool,
    },
}

const WATCH_THRESHOLD_FIELDS: &[&str] =
    &["per_position_notional", "threshold", "poll_interval_seconds"];
const WATCH_BREAKOUT_FIELDS: &[&str] = &[
    "per_position_notional",
    "poll_interval_seconds",
    "session_start",
    "session_end",
    "risk_reward",
    "volume_multiplier",
    "volume_lookback",
    "confirm_on_close",
    "use_atr_buffer",
    "use_volume_filter",
];
const OPEN_NOW_FIELDS: &[&str] = &["capital", "leverage"];
const CLOSE_ONLY_FIELDS: &[&str] = &["close_deviation_points", "force_close"];

impl ModeConfig {
    /// Validate a settings snapshot into a mode-tagged configuration
    pub fn from_settings(settings: &DispatchSettings) -> Result<ModeConfig, DispatchError> {
        let mode = settings
            .mode
            .as_deref()
            .ok_or_else(|| DispatchError::Configuration("mode is not set".to_string()))?;

        let populated = settings.populated_fields();
        let reject_foreign = |allowed: &[&str]| -> Result<(), DispatchError> {
            let foreign: Vec<&str> = populated
                .iter()
                .copied()
                .filter(|field| !allowed.contains(field))
                .collect();
            if foreign.is_empty() {
                Ok(())
            } else {
                Err(DispatchError::Configuration(format!(
                    "mode '{}' does not accept: {}",
                    mode,
                    foreign.join(", ")
                )))
            }
        };

        let strategy_id = require(settings.strategy_id, "strategy_id")?;
        if strategy_id < 0 {
            return Err(DispatchError::Configuration(format!(
                "strategy_id must be >= 0, got {}",
                strategy_id
            )));
        }

        match mode {
            "watch-threshold" => {
                reject_foreign(WATCH_THRESHOLD_FIELDS)?;
                Ok(ModeConfig::WatchThreshold {
                    strategy_id,
                    per_position_notional: require_positive_finite(
                        settings.per_position_notional,
                        "per_position_notional",
                    )?,
                    threshold: require_positive_finite(settings.threshold, "threshold")?,
                    poll_interval_seconds: require(
                        settings.poll_interval_seconds,
                        "poll_interval_seconds",
                    )?,
                })
            }
            "watch-breakout" => {
                reject_foreign(WATCH_BREAKOUT_FIELDS)?;
                let session_start = require_session(&settings.session_start, "session_start")?;
                let session_end = require_session(&settings.session_end, "session_end")?;
                if session_start >= session_end {
                    return Err(DispatchError::Configuration(format!(
                        "session_start {} must precede session_end {}",
                        session_start.format("%H:%M"),
                        session_end.format("%H:%M")
                    )));
                }
                Ok(ModeConfig::WatchBreakout {
                    strategy_id,
                    per_position_notional: require_positive_finite(
                        settings.per_position_notional,
                        "per_position_notional",
                    )?,
                    poll_interval_seconds: require(
                        settings.poll_interval_seconds,
                        "poll_interval_seconds",
                    )?,
                    session_start,
                    session_end,
                    risk_reward: require_positive_finite(settings.risk_reward, "risk_reward")?,
                    volume_multiplier: require_positive_finite(
                        settings.volume_multiplier,
                        "volume_multiplier",
                    )?,
                    volume_lookback: require(settings.volume_lookback, "volume_lookback")?,
                    // Flag-shaped booleans: absent means target default.
                    confirm_on_close: settings.confirm_on_close.unwrap_or(false),
                    use_atr_buffer: settings.use_atr_buffer.unwrap_or(true),
                    use_volume_filter: settings.use_volume_filter.unwrap_or(true),
                })
            }
            "open-now" => {
                reject_foreign(OPEN_NOW_FIELDS)?;
                Ok(ModeConfig::OpenNow {
                    strategy_id,
                    capital: require_positive_finite(settings.capital, "capital")?,
                    leverage: require_positive_finite(settings.leverage, "leverage")?,
                })
            }
            "close-only" => {
                reject_foreign(CLOSE_ONLY_FIELDS)?;
                Ok(ModeConfig::CloseOnly {
                    strategy_id,
                    close_deviation_points: require(
                        settings.close_deviation_points,
                        "close_deviation_points",
                    )?,
                    force_close: settings.force_close.unwrap_or(false),
                })
            }
            other => Err(DispatchError::Configuration(format!(
                "unknown mode '{}'",
                other
            ))),
        }
    }

    /// Stable label used for transcript naming and logging
    pub fn mode_label(&self) -> &'static str {
        match self {
            ModeConfig::WatchThreshold { .. } => "watch-threshold",
            ModeConfig::WatchBreakout { .. } => "watch-breakout",
            ModeConfig::OpenNow { .. } => "open-now",
            ModeConfig::CloseOnly { .. } => "close-only",
        }
    }

    pub fn strategy_id(&self) -> i64 {
        match *self {
            ModeConfig::WatchThreshold { strategy_id, .. }
            | ModeConfig::WatchBreakout { strategy_id, .. }
            | ModeConfig::OpenNow { strategy_id, .. }
            | ModeConfig::CloseOnly { strategy_id, .. } => strategy_id,
        }
    }

    /// Serialize to the target's argument vector
    ///
    /// The vocabulary is fixed: positional strategy id first, then the
    /// mode's flags in declaration order. Boolean flags follow the target's
    /// defaults: `--confirm-close` appears when confirmation is on, the
    /// `--no-*` flags appear when a default-on filter is turned off.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            ModeConfig::WatchThreshold {
                strategy_id,
                per_position_notional,
                threshold,
                poll_interval_seconds,
            } => vec![
                strategy_id.to_string(),
                "--watch-threshold".to_string(),
                "--per-pos-eur".to_string(),
                per_position_notional.to_string(),
                "--threshold".to_string(),
                threshold.to_string(),
                "--poll".to_string(),
                poll_interval_seconds.to_string(),
            ],
            ModeConfig::WatchBreakout {
                strategy_id,
                per_position_notional,
                poll_interval_seconds,
                session_start,
                session_end,
                risk_reward,
                volume_multiplier,
                volume_lookback,
                confirm_on_close,
                use_atr_buffer,
                use_volume_filter,
            } => {
                let mut args = vec![
                    strategy_id.to_string(),
                    "--watch-breakout".to_string(),
                    "--per-pos-eur".to_string(),
                    per_position_notional.to_string(),
                    "--poll".to_string(),
                    poll_interval_seconds.to_string(),
                    "--session-start".to_string(),
                    session_start.format("%H:%M").to_string(),
                    "--session-end".to_string(),
                    session_end.format("%H:%M").to_string(),
                    "--rr".to_string(),
                    risk_reward.to_string(),
                    "--vol-mult".to_string(),
                    volume_multiplier.to_string(),
                    "--vol-lookback".to_string(),
                    volume_lookback.to_string(),
                ];
                if *confirm_on_close {
                    args.push("--confirm-close".to_string());
                }
                if !use_atr_buffer {
                    args.push("--no-atr-buffer".to_string());
                }
                if !use_volume_filter {
                    args.push("--no-volume-filter".to_string());
                }
                args
            }
            ModeConfig::OpenNow {
                strategy_id,
                capital,
                leverage,
            } => vec![
                strategy_id.to_string(),
                "--capital".to_string(),
                capital.to_string(),
                "--leverage".to_string(),
                leverage.to_string(),
            ],
            ModeConfig::CloseOnly {
                strategy_id,
                close_deviation_points,
                force_close,
            } => {
                let mut args = vec![
                    strategy_id.to_string(),
                    "--close-only".to_string(),
                    "--close-deviation".to_string(),
                    close_deviation_points.to_string(),
                ];
                if *force_close {
                    args.push("--force-close".to_string());
                }
                args
            }
        }
    }
}

fn require<T: Copy>(value: Option<T>, name: &str) -> Result<T, DispatchError> {
    value.ok_or_else(|| DispatchError::Configuration(format!("{} is required", name)))
}

fn require_positive_finite(value: Option<f64>, name: &str) -> Result<f64, DispatchError> {
    let v = require(value, name)?;
    if !v.is_finite() || v <= 0.0 {
        return Err(DispatchError::Configuration(format!(
            "{} must be a positive finite number, got {}",
            name, v
        )));
    }
    Ok(v)
}

fn require_session(value: &Option<String>, name: &str) -> Result<NaiveTime, DispatchError> {
    let raw = value
        .as_deref()
        .ok_or_else(|| DispatchError::Configuration(format!("{} is required", name)))?;
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
        DispatchError::Configuration(format!("{} must be HH:MM, got '{}'", name, raw))
    })
}
