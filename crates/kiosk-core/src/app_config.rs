use crate::locale::Lang;

/// Resolved application configuration.
///
/// `script_url` is the write-command endpoint; `sheet_id` plus the three
/// gids identify the table regions read by the workflow.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub script_url: String,
    pub sheet_id: String,
    pub offers_gid: u64,
    pub registrations_gid: u64,
    pub master_list_gid: u64,
    pub read_timeout_secs: u64,
    pub verify_attempts: u32,
    pub verify_base_delay_ms: u64,
    pub log_level: String,
    pub lang: Lang,
}
