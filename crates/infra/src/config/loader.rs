//! Configuration loader
//!
//! Settings come from one of three places, tried in order: environment
//! variables (selected by `OFICINA_DB_PATH` being set), a JSON or TOML
//! config file probed from the working directory outward, and finally the
//! built-in defaults.
//!
//! Recognised environment variables:
//! - `OFICINA_DB_PATH`: database file path (presence selects env loading)
//! - `OFICINA_DB_POOL_SIZE`: connection pool size
//! - `OFICINA_FONTS_DIR`: directory holding the PDF font family
//! - `OFICINA_FONT_FAMILY`: font family name inside the fonts directory
//! - `OFICINA_COMPANY_NAME`: company name printed on documents
//! - `OFICINA_COMPANY_TAGLINE`: line printed under the company name
//! - `OFICINA_VALIDITY_DAYS`: default quote validity window in days
//!
//! Variables other than `OFICINA_DB_PATH` overlay the defaults, so a single
//! exported path is enough to run against a custom database.

use std::path::{Path, PathBuf};

use oficina_domain::{Config, OficinaError, Result};

/// File names probed in each candidate directory.
const CONFIG_BASENAMES: [&str; 4] = ["config.json", "config.toml", "oficina.json", "oficina.toml"];

/// Load configuration with automatic fallback.
///
/// # Errors
/// Returns `OficinaError::Config` if an environment variable or config file
/// is present but invalid. A completely absent configuration is not an
/// error; the defaults apply.
pub fn load() -> Result<Config> {
    if std::env::var_os("OFICINA_DB_PATH").is_some() {
        let config = load_from_env()?;
        tracing::info!("configuration loaded from environment");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("no configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables.
///
/// `OFICINA_DB_PATH` must be present; every other variable overlays the
/// corresponding default.
///
/// # Errors
/// Returns `OficinaError::Config` if `OFICINA_DB_PATH` is missing or a set
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = std::env::var("OFICINA_DB_PATH")
        .map_err(|_| OficinaError::Config("OFICINA_DB_PATH is not set".to_string()))?;
    if let Ok(pool_size) = std::env::var("OFICINA_DB_POOL_SIZE") {
        config.database.pool_size = pool_size
            .parse()
            .map_err(|e| OficinaError::Config(format!("invalid pool size: {e}")))?;
    }

    if let Ok(fonts_dir) = std::env::var("OFICINA_FONTS_DIR") {
        config.render.fonts_dir = fonts_dir;
    }
    if let Ok(font_family) = std::env::var("OFICINA_FONT_FAMILY") {
        config.render.font_family = font_family;
    }
    if let Ok(company_name) = std::env::var("OFICINA_COMPANY_NAME") {
        config.render.company_name = company_name;
    }
    if let Ok(company_tagline) = std::env::var("OFICINA_COMPANY_TAGLINE") {
        config.render.company_tagline = company_tagline;
    }

    if let Ok(validity_days) = std::env::var("OFICINA_VALIDITY_DAYS") {
        config.quoting.validity_days = validity_days
            .parse()
            .map_err(|e| OficinaError::Config(format!("invalid validity days: {e}")))?;
    }

    Ok(config)
}

/// Load configuration from a file, probing the standard locations when no
/// path is given. The format follows the file extension.
///
/// # Errors
/// Returns `OficinaError::Config` when the file is missing, unreadable, or
/// does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(OficinaError::Config(format!("config file not found: {}", p.display())))
        }
        None => probe_config_paths().ok_or_else(|| {
            OficinaError::Config("no config file found in any probed location".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OficinaError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Format detection by extension; a missing extension is treated as JSON.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("json") {
        "json" => serde_json::from_str(contents)
            .map_err(|e| OficinaError::Config(format!("invalid JSON config: {e}"))),
        "toml" => toml::from_str(contents)
            .map_err(|e| OficinaError::Config(format!("invalid TOML config: {e}"))),
        other => Err(OficinaError::Config(format!("unsupported config format: {other}"))),
    }
}

/// First existing config file, searching the working directory, its two
/// nearest ancestors and the executable directory, in that order.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
        dirs.push(cwd.join("../.."));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_BASENAMES.iter().map(|name| dir.join(name)))
        .find(|path| path.exists())
}
