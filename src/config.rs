use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Account
    pub initial_balance: f64,

    // Input
    pub ledger_path: String,

    // Presentation
    pub display_tz: String,
    pub output_format: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            initial_balance: env("INITIAL_BALANCE", "0").parse().unwrap_or(0.0),
            ledger_path: env("LEDGER_PATH", "data/ledger.json"),
            display_tz: env("DISPLAY_TZ", "UTC"),
            output_format: env("OUTPUT_FORMAT", "text").to_lowercase(),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    /// Time zone for chart labels; unknown names fall back to UTC.
    pub fn display_tz(&self) -> Tz {
        self.display_tz.parse().unwrap_or(chrono_tz::UTC)
    }

    pub fn json_output(&self) -> bool {
        self.output_format == "json"
    }
}
