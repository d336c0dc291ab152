use std::collections::HashSet;

use medrec_core::{EncounterType, Location, VisitType, parse_utc_offset};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::properties::GlobalProperty;
use crate::{ConfigError, ConfigResult};

/// Application settings resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub visits: VisitSettings,
    /// Initial global property values
    #[serde(default)]
    pub global_properties: Vec<GlobalProperty>,
    #[serde(default)]
    pub visit_types: Vec<VisitType>,
    #[serde(default)]
    pub encounter_types: Vec<EncounterType>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub roles: Vec<RoleSettings>,
    #[serde(default)]
    pub users: Vec<UserSettings>,
}

impl AppConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.visits.utc_offset()?;

        if self.visits.assignment_handler.trim().is_empty() {
            return Err(ConfigError::validation(
                "visits.assignment_handler must not be empty",
            ));
        }

        let mut seen = HashSet::new();
        for visit_type in &self.visit_types {
            if !seen.insert(visit_type.visit_type_id) {
                return Err(ConfigError::validation(format!(
                    "duplicate visit type id {}",
                    visit_type.visit_type_id
                )));
            }
        }

        let mut seen = HashSet::new();
        for encounter_type in &self.encounter_types {
            if !seen.insert(encounter_type.encounter_type_id) {
                return Err(ConfigError::validation(format!(
                    "duplicate encounter type id {}",
                    encounter_type.encounter_type_id
                )));
            }
        }

        let mut seen = HashSet::new();
        for property in &self.global_properties {
            if property.property.trim().is_empty() {
                return Err(ConfigError::validation("global property name is empty"));
            }
            if !seen.insert(property.property.as_str()) {
                return Err(ConfigError::validation(format!(
                    "duplicate global property {}",
                    property.property
                )));
            }
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::validation(format!(
                    "duplicate username {}",
                    user.username
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitSettings {
    /// UTC offset used for calendar-day boundaries, `+HH:MM`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Handler used when `visits.assignmentHandler` is not set.
    #[serde(default = "default_assignment_handler")]
    pub assignment_handler: String,
}

fn default_time_zone() -> String {
    "+00:00".to_string()
}

fn default_assignment_handler() -> String {
    "existing-or-new".to_string()
}

impl Default for VisitSettings {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            assignment_handler: default_assignment_handler(),
        }
    }
}

impl VisitSettings {
    pub fn utc_offset(&self) -> ConfigResult<UtcOffset> {
        Ok(parse_utc_offset(&self.time_zone)?)
    }
}

/// A role definition seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSettings {
    pub name: String,
    #[serde(default)]
    pub privileges: Vec<String>,
    #[serde(default)]
    pub inherited_roles: Vec<String>,
}

/// A user account seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: i32,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

pub mod loader {
    use super::AppConfig;
    use crate::{ConfigError, ConfigResult};
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Default settings file looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "medrec.toml";

    /// Load settings from `path` (or `medrec.toml` if present) with
    /// `MEDREC__SECTION__KEY` environment overrides, then validate.
    pub fn load_config(path: Option<&Path>) -> ConfigResult<AppConfig> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("config file not found: {}", p.display()),
                    )));
                }
                builder = builder.add_source(File::from(p.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("MEDREC")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
        merged.validate()?;
        Ok(merged)
    }
}
