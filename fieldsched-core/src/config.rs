//! fieldsched configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::compose::TimeConvention;
use crate::date::MonthOverflow;
use crate::error::{ScheduleError, ScheduleResult};

static DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/fieldsched/config.toml, overridable with
/// `FIELDSCHED_*` environment variables (e.g. `FIELDSCHED_API_TOKEN`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Scope appointment creation to this company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default)]
    pub time_convention: TimeConvention,

    #[serde(default)]
    pub month_overflow: MonthOverflow,

    /// Create requests in flight at once. 1 keeps them strictly sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SchedConfig {
    fn default() -> Self {
        SchedConfig {
            api_url: default_api_url(),
            company_id: None,
            api_token: None,
            time_convention: TimeConvention::default(),
            month_overflow: MonthOverflow::default(),
            concurrency: default_concurrency(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl SchedConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("fieldsched");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> ScheduleResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        let config: SchedConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("FIELDSCHED").try_parsing(true))
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))?;

        if config.request_timeout_secs == 0 {
            return Err(ScheduleError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let contents = format!(
            "\
# fieldsched configuration

# Base URL of the appointment API:
# api_url = \"{}\"

# Create appointments under /Company/<id>/Appointment instead of /Appointment:
# company_id = \"\"

# Bearer token sent with every request:
# api_token = \"\"

# How HH:mm times are read: \"utc\", \"local\", or an IANA zone like \"America/Sao_Paulo\":
# time_convention = \"utc\"

# Monthly dates past the end of a shorter month: \"roll\" into the next month or \"clamp\":
# month_overflow = \"roll\"

# Create requests in flight at once (1 = one after another):
# concurrency = 1

# Per-request timeout in seconds:
# request_timeout_secs = {}
",
            DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Appointment creation endpoint, company-scoped when `company_id` is set.
    pub fn appointment_endpoint(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        match self.company_id.as_deref().filter(|id| !id.is_empty()) {
            Some(company) => format!("{}/Company/{}/Appointment", base, company),
            None => format!("{}/Appointment", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SchedConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.time_convention, TimeConvention::Utc);
        assert_eq!(config.month_overflow, MonthOverflow::Roll);
    }

    #[test]
    fn reads_toml_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://api.example.com/v1/\"\n\
             company_id = \"acme\"\n\
             time_convention = \"America/Sao_Paulo\"\n\
             month_overflow = \"clamp\"\n\
             concurrency = 4\n",
        )
        .unwrap();

        let config = SchedConfig::load_from(&path).unwrap();
        assert_eq!(
            config.time_convention,
            TimeConvention::Zone(chrono_tz::America::Sao_Paulo)
        );
        assert_eq!(config.month_overflow, MonthOverflow::Clamp);
        assert_eq!(config.concurrency, 4);
        assert_eq!(
            config.appointment_endpoint(),
            "https://api.example.com/v1/Company/acme/Appointment"
        );
    }

    #[test]
    fn rejects_unknown_convention() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "time_convention = \"moon\"\n").unwrap();
        assert!(matches!(
            SchedConfig::load_from(&path),
            Err(ScheduleError::Config(_))
        ));
    }

    #[test]
    fn default_config_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        SchedConfig::create_default_config(&path).unwrap();
        let config = SchedConfig::load_from(&path).unwrap();
        assert_eq!(config.appointment_endpoint(), "http://localhost:8080/api/Appointment");
    }

    #[test]
    fn rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 0\n").unwrap();

        let err = SchedConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ScheduleError::Config(_)));
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn default_config_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = SchedConfig::create_default_config(&blocker.join("config.toml"));
        assert!(matches!(result, Err(ScheduleError::Io(_))));
    }
}
