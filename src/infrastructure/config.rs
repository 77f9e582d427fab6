use serde::Deserialize;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_settings_document")]
    pub settings_document: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    "submissions".to_string()
}

fn default_settings_document() -> String {
    "settings/visibility".to_string()
}

/// Load `config/dashboard.*` (optional), overridden by `DASHBOARD__SECTION__KEY` env vars.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
