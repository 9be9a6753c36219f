use std::ffi::OsString;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "symptom-triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable pointing at a directory of rule table overrides.
pub const RULES_DIR_ENV: &str = "SYMPTOM_TRIAGE_RULES_DIR";

/// Log filter used when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "symptom_triage=info"
}

/// Directory holding red_flags.json and symptom_patterns.json, if the
/// bundled tables are overridden.
///
/// `SYMPTOM_TRIAGE_RULES_DIR` wins; otherwise the user rules directory is
/// used when it exists. `None` means the bundled tables.
pub fn rules_dir() -> Option<PathBuf> {
    resolve_rules_dir(std::env::var_os(RULES_DIR_ENV), user_rules_dir())
}

fn resolve_rules_dir(env: Option<OsString>, user_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    user_dir.filter(|d| d.is_dir())
}

/// Per-user data directory, e.g. ~/.local/share/symptom-triage on Linux.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_NAME))
}

/// Conventional location for user-maintained rule tables.
pub fn user_rules_dir() -> Option<PathBuf> {
    data_dir().map(|d| d.join("rules"))
}
