use regex::Regex;
use thiserror::Error;

use crate::app_config::AppConfig;
use crate::locale::Lang;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The sheet URL did not contain a `/spreadsheets/d/<id>` segment.
    #[error("invalid sheet URL: {0}")]
    InvalidSheetUrl(String),
}

/// A spreadsheet reference extracted from a full store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub sheet_id: String,
    pub gid: Option<u64>,
}

/// Extracts the sheet id and (optional) gid from a full spreadsheet URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSheetUrl`] when no sheet id is present.
pub fn extract_sheet_info(url: &str) -> Result<SheetRef, ConfigError> {
    let id_re = Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid sheet id regex");
    let gid_re = Regex::new(r"[?#&]gid=(\d+)").expect("valid gid regex");

    let sheet_id = id_re
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or_else(|| ConfigError::InvalidSheetUrl(url.to_owned()))?;
    let gid = gid_re
        .captures(url)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    Ok(SheetRef { sheet_id, gid })
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let script_url = require("KIOSK_SCRIPT_URL")?;
    let sheet_url = require("KIOSK_SHEET_URL")?;
    let sheet_ref = extract_sheet_info(&sheet_url)?;

    let offers_gid = parse_u64("KIOSK_OFFERS_GID", "2099398649")?;
    let registrations_gid = parse_u64("KIOSK_REGISTRATIONS_GID", "1257095471")?;
    // Default gid 0 matches the first tab; the master list lives there unless
    // overridden.
    let master_list_gid = parse_u64("KIOSK_MASTER_LIST_GID", "0")?;

    let read_timeout_secs = parse_u64("KIOSK_READ_TIMEOUT_SECS", "15")?;
    let verify_attempts = parse_u32("KIOSK_VERIFY_ATTEMPTS", "5")?;
    let verify_base_delay_ms = parse_u64("KIOSK_VERIFY_BASE_DELAY_MS", "500")?;
    let log_level = or_default("KIOSK_LOG_LEVEL", "info");
    let lang = parse_lang(&or_default("KIOSK_LANG", "en"));

    Ok(AppConfig {
        script_url,
        sheet_id: sheet_ref.sheet_id,
        offers_gid,
        registrations_gid,
        master_list_gid,
        read_timeout_secs,
        verify_attempts,
        verify_base_delay_ms,
        log_level,
        lang,
    })
}

/// Parse a string into a `Lang` variant. Unrecognized values default to English.
fn parse_lang(s: &str) -> Lang {
    match s {
        "ta" => Lang::Ta,
        _ => Lang::En,
    }
}
