use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Directory that holds the ROM files. Resolved relative to the CWD.
    pub dir: PathBuf,
    /// Filename suffix a file needs to be listed, compared case-insensitively.
    pub extension: String,
    pub default_per_page: usize,
    pub max_per_page: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub games_per_minute: usize,
    pub roms_per_minute: usize,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub rate_limit: RateLimitConfig,
    pub security: Option<SecurityConfig>,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            dir: PathBuf::from("roms"),
            extension: ".gba".to_string(),
            default_per_page: 24,
            max_per_page: 100,
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: romshelf.toml (in CWD)
        .add_source(::config::File::with_name("romshelf").required(false));

    if let Ok(custom_path) = std::env::var("ROMSHELF_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("ROMSHELF").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Catalog
    if cfg.catalog.extension.trim().is_empty() {
        return Err(anyhow::anyhow!("catalog.extension must not be empty"));
    }
    if cfg.catalog.max_per_page == 0 {
        return Err(anyhow::anyhow!("catalog.max_per_page must be > 0"));
    }
    if cfg.catalog.default_per_page == 0 || cfg.catalog.default_per_page > cfg.catalog.max_per_page {
        return Err(anyhow::anyhow!(
            "catalog.default_per_page must be in 1..={}",
            cfg.catalog.max_per_page
        ));
    }

    // Rate limiting
    if cfg.rate_limit.enabled {
        if cfg.rate_limit.games_per_minute == 0 || cfg.rate_limit.roms_per_minute == 0 {
            return Err(anyhow::anyhow!("rate_limit per-minute limits must be > 0 when enabled"));
        }
        if cfg.rate_limit.cleanup_interval_secs == 0 {
            return Err(anyhow::anyhow!("rate_limit.cleanup_interval_secs must be > 0"));
        }
    }

    Ok(())
}
