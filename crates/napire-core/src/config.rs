//! Orchestrator configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a missing job (HTTP 404 on `/tasks`) is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Every poll error goes through fallback-or-notify; the job fails.
    #[default]
    Strict,
    /// A 404 silently forgets the job (the service may have expired it).
    Lenient,
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(DeploymentMode::Strict),
            "lenient" => Ok(DeploymentMode::Lenient),
            other => Err(format!("unknown deployment mode: {other}")),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Strict => write!(f, "strict"),
            DeploymentMode::Lenient => write!(f, "lenient"),
        }
    }
}

/// Settings attached to every inference request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceSettings {
    pub method: String,
    pub timeout: f64,
    pub plot: bool,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            method: "BayesNets.GibbsSamplingFull".to_string(),
            timeout: 0.1,
            plot: true,
        }
    }
}

/// Configuration for [`crate::Orchestrator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Delay between two status polls of a running job.
    pub poll_interval: Duration,
    /// Delay before a fallback payload is handed out.
    pub fallback_delay: Duration,
    pub mode: DeploymentMode,
    /// Length of the short ranking view.
    pub short_len: usize,
    pub inference: InferenceSettings,
    /// Model selected when the model parameter is absent.
    pub default_model: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            fallback_delay: Duration::from_secs(1),
            mode: std::env::var("NAPIRE_MODE")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or_default(),
            short_len: 5,
            inference: InferenceSettings::default(),
            default_model: "Cause analyzer".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DeploymentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.short_len, 5);
        assert_eq!(config.inference.method, "BayesNets.GibbsSamplingFull");
        assert!(config.inference.plot);
        assert_eq!(config.default_model, "Cause analyzer");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Lenient".parse::<DeploymentMode>(), Ok(DeploymentMode::Lenient));
        assert_eq!("strict".parse::<DeploymentMode>(), Ok(DeploymentMode::Strict));
        assert!("dev".parse::<DeploymentMode>().is_err());
        assert_eq!(DeploymentMode::Lenient.to_string(), "lenient");
    }

    #[test]
    fn test_with_mode_overrides_env() {
        let config = OrchestratorConfig::default().with_mode(DeploymentMode::Lenient);
        assert_eq!(config.mode, DeploymentMode::Lenient);
    }
}
