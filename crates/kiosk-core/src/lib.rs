//! Shared foundations for the coupon kiosk: configuration, input
//! validation, offer date windows, message localization, and the
//! scan-decode seam. No network I/O lives in this crate.

pub mod app_config;
pub mod config;
pub mod dates;
pub mod locale;
pub mod scan;
pub mod validate;

pub use app_config::AppConfig;
pub use config::{extract_sheet_info, load_app_config, load_app_config_from_env, ConfigError};
pub use validate::FormatError;
