use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Tenant name; every endpoint path is scoped under it.
    pub company: String,
    /// Auth context attached to every call. Validated (and required) by the
    /// gateway, not here: a missing value must surface as a configuration
    /// error on screen, not as a startup panic.
    pub user_uuid: String,
    pub username: String,
    pub timezone: String,
    pub page_size: u64,
    pub log_file: Option<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            company: String::new(),
            user_uuid: String::new(),
            username: String::new(),
            timezone: "Europe/Rome".to_string(),
            page_size: 20,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "forziere_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override tenant/company name.
    #[arg(long)]
    company: Option<String>,
    /// Override the auth user UUID.
    #[arg(long)]
    user_uuid: Option<String>,
    /// Override the display username.
    #[arg(long)]
    username: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override page size for transfer lists.
    #[arg(long)]
    page_size: Option<u64>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FORZIERE_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(company) = args.company {
        settings.company = company;
    }
    if let Some(user_uuid) = args.user_uuid {
        settings.user_uuid = user_uuid;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size.max(1);
    }

    Ok(settings)
}
