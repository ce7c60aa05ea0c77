use crate::models::PatternParams;
use crate::utils::{duration_from_secs, interval_from_minutes};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INTERVAL_MINS: f64 = 3.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub interval_mins: f64,
    pub fail_safe: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timeout: Option<String>,
    pub pattern: PatternParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_mins: DEFAULT_INTERVAL_MINS,
            fail_safe: true,
            start_time: None,
            end_time: None,
            timeout: None,
            pattern: PatternParams::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.interval_mins)?;
        let p = &self.pattern;
        if p.shaft_length == 0 {
            bail!("pattern.shaft_length must be positive");
        }
        for (name, value) in [
            ("pattern.head_radius", p.head_radius),
            ("pattern.ball_radius", p.ball_radius),
            ("pattern.ball_offset", p.ball_offset),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        for (name, value) in [
            ("pattern.ball_rise", p.ball_rise),
            ("pattern.step_secs", p.step_secs),
            ("pattern.approach_secs", p.approach_secs),
            ("pattern.settle_secs", p.settle_secs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{} must not be negative, got {}", name, value);
            }
        }
        for (name, value) in [
            ("pattern.step_secs", p.step_secs),
            ("pattern.approach_secs", p.approach_secs),
            ("pattern.settle_secs", p.settle_secs),
        ] {
            duration_from_secs(name, value)?;
        }
        Ok(())
    }
}

pub fn validate_interval(minutes: f64) -> Result<()> {
    if !(minutes.is_finite() && minutes > 0.0) {
        bail!("Interval must be a positive number of minutes, got {}", minutes);
    }
    interval_from_minutes(minutes)?;
    Ok(())
}

pub fn base_dir() -> Result<PathBuf> {
    let mut path =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    path.push(".nudge");
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&base_dir()?.join("config.json"))
}

/// Reads the config at `path`, writing the defaults there first if it is missing.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        let data = serde_json::to_string_pretty(&config)?;
        fs::write(path, data)?;
        return Ok(config);
    }

    let data = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("Invalid config at {}: {}", path.display(), e))?;
    config.validate()?;
    Ok(config)
}
