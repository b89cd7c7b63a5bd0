use shared_types::{AccessConfig, AppConfig, PlatformConfig};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml`, apply environment overrides, and store the result in
/// the global `OnceLock`. Safe to call multiple times; only the first call
/// has effect.
///
/// If the file is missing or unparseable, the stock defaults apply.
pub fn load_access_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();
        let mut config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                tracing::info!(error = %e, "{CONFIG_PATH} not found, using defaults");
                AppConfig::default()
            }
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        tracing::debug!(access = ?config.access, "Access config loaded");
        config
    })
}

pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to parse {CONFIG_PATH}, using defaults");
        AppConfig::default()
    })
}

/// Overlay `PLATFORM_URL`, `PLATFORM_ANON_KEY`, `ACCESS_ADMIN_EMAILS` and
/// `ACCESS_CACHE_PATH` onto the file values.
pub fn apply_env_overrides(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    let AppConfig { access, platform } = config;
    override_platform(platform, &var);
    override_access(access, &var);
}

fn override_platform(platform: &mut PlatformConfig, var: &impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("PLATFORM_URL").filter(|v| !v.is_empty()) {
        platform.api_url = url;
    }
    if let Some(key) = var("PLATFORM_ANON_KEY").filter(|v| !v.is_empty()) {
        platform.api_key = key;
    }
    if let Some(path) = var("ACCESS_CACHE_PATH").filter(|v| !v.is_empty()) {
        platform.cache_path = path;
    }
}

fn override_access(access: &mut AccessConfig, var: &impl Fn(&str) -> Option<String>) {
    if let Some(emails) = var("ACCESS_ADMIN_EMAILS") {
        access.admin_emails = emails
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
    }
}
