//! Match settings loaded from TOML at startup.
//! Everything is optional; unset fields fall back to standard 501 rules.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::engine::board::BoardCalibration;
use crate::engine::match_state::{MatchConfig, PlayerId};

/// The `[match]` table.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MatchSettings {
    pub starting_score: Option<u16>,
    pub legs_per_set: Option<u8>,
    pub sets_to_win: Option<u8>,
    pub double_out: Option<bool>,
    /// 1 or 2.
    pub starting_player: Option<u8>,
}

/// A `[boards.<id>]` table: calibration preloaded for a known board.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardSettings {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_px: f64,
    #[serde(default)]
    pub rotation_deg: f64,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsFile {
    #[serde(rename = "match", default)]
    pub match_settings: MatchSettings,
    #[serde(default)]
    pub boards: HashMap<String, BoardSettings>,
}

impl SettingsFile {
    /// Convert to a MatchConfig, using standard rules for any unset field.
    pub fn match_config(&self) -> MatchConfig {
        let d = MatchConfig::default();
        let s = &self.match_settings;
        MatchConfig {
            starting_score: s.starting_score.unwrap_or(d.starting_score),
            legs_per_set: s.legs_per_set.unwrap_or(d.legs_per_set),
            sets_to_win: s.sets_to_win.unwrap_or(d.sets_to_win),
            double_out: s.double_out.unwrap_or(d.double_out),
            starting_player: match s.starting_player {
                Some(2) => PlayerId::Two,
                _ => d.starting_player,
            },
        }
    }

    /// Validated calibrations for every preloaded board. Invalid entries
    /// are skipped with a warning rather than failing startup.
    pub fn board_calibrations(&self) -> HashMap<String, BoardCalibration> {
        let mut out = HashMap::new();
        for (id, b) in &self.boards {
            match BoardCalibration::new(b.center_x, b.center_y, b.radius_px, b.rotation_deg) {
                Ok(calib) => {
                    out.insert(id.clone(), calib);
                }
                Err(e) => {
                    tracing::warn!(board = %id, error = %e, "skipping invalid board calibration");
                }
            }
        }
        out
    }
}

/// Load settings from a TOML file at the given path.
pub fn load_settings(path: &Path) -> Result<SettingsFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Try well-known paths, returning defaults if none is found.
pub fn load_default_settings() -> SettingsFile {
    let candidates = [
        "match_settings.toml",
        "../match_settings.toml",
        "/etc/logan/match_settings.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_settings(p) {
                Ok(settings) => {
                    tracing::info!(path = %p.display(), "loaded match settings");
                    return settings;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load match settings");
                }
            }
        }
    }
    tracing::info!("no match_settings.toml found, using standard 501 rules");
    SettingsFile::default()
}
