//! Configuration management for sponsorscout
//!
//! Supports environment variables, config files, and runtime overrides.
//! API keys are only ever read from the environment and never written back.
//!
//! Config file location: ~/.config/sponsorscout/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, ScoutError};

/// Main configuration for sponsorscout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completions API configuration
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    /// Neural search API configuration
    #[serde(default)]
    pub exa: ExaConfig,
    /// Model configuration
    #[serde(default)]
    pub models: ModelConfig,
    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Contact enrichment configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    /// Saved search configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Transactional mail configuration
    #[serde(default)]
    pub mailgun: MailgunConfig,
    /// Spreadsheet backend configuration
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenRouter (OpenAI-compatible) API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// API base URL including the version prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key (OPENROUTER_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

/// Exa search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExaConfig {
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key (EXA_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

/// Model configuration - interchangeable models
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model driving the tool-calling loop
    /// Default: google/gemini-2.0-flash-001
    pub agent: String,
    /// Model judging discovered companies and applying refinements
    pub evaluator: String,
    /// Model that names saved searches
    /// Default: openai/gpt-4o-mini
    pub naming: String,
    /// Model writing personalized email snippets
    pub writer: String,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum model round-trips before the loop stops
    /// Default: 12
    pub max_rounds: usize,
    /// Results requested per discovery call when the model gives no count
    /// Default: 15
    pub num_results: usize,
    /// Token ceiling for evaluation and refinement replies
    pub evaluation_max_tokens: u32,
    /// Whether to show debug output
    pub debug: bool,
}

/// Contact enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Pause between role queries for one company
    pub query_delay_ms: u64,
    /// Pause between companies
    pub company_delay_ms: u64,
    /// People results requested per role query
    pub results_per_query: usize,
    /// Output CSV path
    pub output_path: PathBuf,
}

/// Saved search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding saved search JSON files
    pub dir: PathBuf,
}

/// Mailgun configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailgunConfig {
    /// API base URL
    pub base_url: String,
    /// Sending domain (MAILGUN_DOMAIN)
    pub domain: String,
    /// Display name in the From header
    pub sender_name: String,
    /// Subject line for template messages
    pub subject: String,
    /// Stored template name used when none is given (MAILGUN_TEMPLATE)
    pub template: String,
    /// API key (MAILGUN_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

/// Which spreadsheet backend holds the pipeline tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetBackend {
    /// Google Sheets v4 values API
    Google,
    /// A directory of CSV files, one per tab
    Csv,
}

/// Spreadsheet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Backend selection
    pub backend: SheetBackend,
    /// Sheets API base URL
    pub base_url: String,
    /// Spreadsheet id (SPONSOR_SPREADSHEET_ID)
    pub spreadsheet_id: String,
    /// Directory used by the CSV backend
    pub workbook_dir: PathBuf,
    /// OAuth bearer token (GOOGLE_SHEETS_ACCESS_TOKEN)
    #[serde(skip)]
    pub access_token: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            timeout_secs: 120,
            api_key: env_or("OPENROUTER_API_KEY", ""),
        }
    }
}

impl Default for ExaConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("EXA_BASE_URL", "https://api.exa.ai"),
            timeout_secs: 60,
            api_key: env_or("EXA_API_KEY", ""),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let agent = env_or("SPONSORSCOUT_MODEL", "google/gemini-2.0-flash-001");
        Self {
            evaluator: agent.clone(),
            writer: agent.clone(),
            agent,
            naming: "openai/gpt-4o-mini".to_string(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: 12,
            num_results: 15,
            evaluation_max_tokens: 4000,
            debug: env_flag("SPONSORSCOUT_DEBUG"),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            query_delay_ms: 500,
            company_delay_ms: 1000,
            results_per_query: 3,
            output_path: PathBuf::from("sponsor_contacts.csv"),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("searches"),
        }
    }
}

impl Default for MailgunConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("MAILGUN_BASE_URL", "https://api.mailgun.net"),
            domain: env_or("MAILGUN_DOMAIN", ""),
            sender_name: "Scotty Labs".to_string(),
            subject: "Hello from Scottylabs!".to_string(),
            template: env_or("MAILGUN_TEMPLATE", ""),
            api_key: env_or("MAILGUN_API_KEY", ""),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        let backend = match env::var("SPONSORSCOUT_SHEETS").as_deref() {
            Ok("csv") => SheetBackend::Csv,
            _ => SheetBackend::Google,
        };
        Self {
            backend,
            base_url: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: env_or("SPONSOR_SPREADSHEET_ID", ""),
            workbook_dir: PathBuf::from("pipeline"),
            access_token: env_or("GOOGLE_SHEETS_ACCESS_TOKEN", ""),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env_or("SPONSORSCOUT_LOG", "warn"),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sponsorscout")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_secrets();
        config
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ScoutError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ScoutError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing sections use defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScoutError::config(format!("Failed to parse config: {}", e)))
    }

    /// Re-read API keys from the environment
    fn apply_secrets(&mut self) {
        let read = |key: &str, slot: &mut String| {
            if let Ok(value) = env::var(key) {
                *slot = value;
            }
        };
        read("OPENROUTER_API_KEY", &mut self.openrouter.api_key);
        read("EXA_API_KEY", &mut self.exa.api_key);
        read("MAILGUN_API_KEY", &mut self.mailgun.api_key);
        read("MAILGUN_DOMAIN", &mut self.mailgun.domain);
        read("GOOGLE_SHEETS_ACCESS_TOKEN", &mut self.sheets.access_token);
        read("SPONSOR_SPREADSHEET_ID", &mut self.sheets.spreadsheet_id);
    }

    /// Use one model for the agent, evaluator and writer roles
    pub fn set_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        self.models.evaluator = model.clone();
        self.models.writer = model.clone();
        self.models.agent = model;
    }

}
