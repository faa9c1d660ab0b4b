//! Configuration loading, following the teacher's
//! `infrastructure::config::Settings::new()` pattern: a layered
//! `config::Config` build (defaults file, environment-specific file,
//! environment variables), deserialized into a plain struct and then
//! converted into the engine's own `shared::Settings`.

use std::collections::HashSet;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use shared::ShiftCode;

#[derive(Debug, Deserialize)]
pub struct RunSettings {
    pub year: i32,
    pub month: u32,
    pub seed: u64,
    pub scheduling_rules: SchedulingRulesSettings,
}

#[derive(Debug, Deserialize)]
pub struct SchedulingRulesSettings {
    pub vx_min: u32,
    pub max_generations: u32,
    pub balance_morning_evening: bool,
    pub max_morning_evening_diff: u32,
    pub selected_shifts: Vec<String>,
    /// (day, month) pairs, same shape as `shared::Settings::holidays`.
    pub holidays: Vec<(u32, u32)>,
}

impl RunSettings {
    pub fn load() -> Result<Self> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("scheduling-cli/config/default").required(false))
            .add_source(File::with_name(&format!("scheduling-cli/config/{environment}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()
            .context("building configuration sources")?;

        config.try_deserialize().context("deserializing scheduling settings")
    }

    pub fn engine_settings(&self) -> Result<shared::Settings> {
        let selected_shifts: HashSet<ShiftCode> = self
            .scheduling_rules
            .selected_shifts
            .iter()
            .map(|token| ShiftCode::new(token.clone()))
            .collect::<Option<_>>()
            .context("selected_shifts contains a malformed shift code")?;

        Ok(shared::Settings {
            vx_min: self.scheduling_rules.vx_min,
            max_generations: self.scheduling_rules.max_generations,
            balance_morning_evening: self.scheduling_rules.balance_morning_evening,
            max_morning_evening_diff: self.scheduling_rules.max_morning_evening_diff,
            selected_shifts,
            holidays: self.scheduling_rules.holidays.iter().copied().collect(),
        })
    }
}
