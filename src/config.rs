//! Tunables for the layout engine, read from an optional `config.yml`
//! stored next to the dataset.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub zoom: ZoomSettings,
    pub calendar: CalendarSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Days added before the earliest start and after the latest end.
    pub padding_days: i64,
    pub default_days_back: i64,
    pub default_days_forward: i64,
    /// Pixels trimmed from every bar so neighbours don't touch.
    pub gutter: u32,
    /// How many days sit left of today after auto-scrolling.
    pub today_lead_buckets: u32,
    /// Pixels moved by one previous/next step on the Gantt chart.
    pub scroll_step: u32,
}

/// Gantt zoom in pixels per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub initial: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub preview_limit: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            padding_days: 15,
            default_days_back: 15,
            default_days_forward: 75,
            gutter: 4,
            today_lead_buckets: 3,
            scroll_step: 200,
        }
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        ZoomSettings {
            min: 20,
            max: 100,
            step: 10,
            initial: 40,
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings { preview_limit: 3 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.zoom.min == 0 || self.zoom.min > self.zoom.max {
            bail!(
                "zoom bounds must satisfy 0 < min <= max (got {}..{})",
                self.zoom.min,
                self.zoom.max
            );
        }
        if self.layout.padding_days < 0 {
            bail!("padding_days cannot be negative");
        }
        Ok(())
    }
}

/// Settings from `<dir>/config.yml`, or defaults when the file is absent.
pub fn load_settings(dir: &Path) -> Result<Settings> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        debug!("no settings at {:?}, using defaults", path);
        return Ok(Settings::default());
    }
    let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let settings: Settings = serde_yaml::from_str(&data).context("parsing settings file")?;
    settings.validate()?;
    Ok(settings)
}
