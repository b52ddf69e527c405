//! `rankscape config ...`.
//!
//! The config file is edited as a raw TOML tree ([`ConfigDocument`]) so
//! settings the user never wrote stay absent from it. Every edit is read back
//! as the typed config and checked before the file is replaced.

use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;
use crate::config::{ConfigManager, RankscapeConfig};
use crate::error::{Error, Result};

/// Run a config action against [`RankscapeConfig`].
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = config_file::<RankscapeConfig>(config_path)?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(not created yet; `rankscape config init` writes one)");
            }
        }
        ConfigAction::Get { key } => {
            let value = config_value::<RankscapeConfig>(config_path, &key)?;
            println!("{}", display_value(&value));
        }
        ConfigAction::Set { key, value } => {
            let path = set_config_value::<RankscapeConfig>(config_path, &key, &value)?;
            println!("{key} = {value} ({})", path.display());
        }
        ConfigAction::Init { file, force } => {
            let path = init_config_file::<RankscapeConfig>(file.as_deref().or(config_path), force)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Export { docker_env } => {
            let config = RankscapeConfig::load(config_path)?;
            for line in export_lines(&config, docker_env)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// The config file `explicit` or the platform default points at.
pub fn config_file<C: ConfigManager>(explicit: Option<&str>) -> Result<PathBuf> {
    C::resolve_config_path(explicit)
        .ok_or_else(|| Error::config("no config directory on this platform; pass --config"))
}

/// Effective value of a dotted key, after file, environment and defaults.
pub fn config_value<C: ConfigManager>(explicit: Option<&str>, key: &str) -> Result<toml::Value> {
    let config = C::load(explicit)?;
    ConfigDocument::from_config(&config)?
        .get(key)
        .cloned()
        .ok_or_else(|| Error::config(format!("no setting named '{key}'")))
}

/// Write `raw` at `key` in the config file and return the file's path.
///
/// The file must exist, and is left untouched when the edited document is
/// not a valid config.
pub fn set_config_value<C: ConfigManager>(
    explicit: Option<&str>,
    key: &str,
    raw: &str,
) -> Result<PathBuf> {
    let path = config_file::<C>(explicit)?;
    if !path.exists() {
        return Err(Error::config(format!(
            "{} does not exist; run `{} config init` first",
            path.display(),
            C::project_name()
        )));
    }

    let mut doc = ConfigDocument::read(&path)?;
    doc.set(key, infer_value(raw))?;
    let config: C = doc
        .parse_as()
        .map_err(|e| Error::config(format!("'{raw}' is not a valid value for {key}: {e}")))?;
    config.check()?;
    doc.write(&path)?;

    log::info!("Set {key} in {}", path.display());
    Ok(path)
}

/// Write the default config to `file` (or the platform default).
pub fn init_config_file<C: ConfigManager>(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => config_file::<C>(None)?,
    };
    if path.exists() && !force {
        return Err(Error::config(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;
    }
    std::fs::write(&path, C::default().to_toml_string()?)
        .map_err(|e| Error::io_with_path(e, &path))?;
    Ok(path)
}

/// `KEY=VALUE` lines for `config export`, or `--env KEY=VALUE` for Docker.
pub fn export_lines<C: ConfigManager>(config: &C, docker_env: bool) -> Result<Vec<String>> {
    let prefix = if docker_env { "--env " } else { "" };
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| format!("{prefix}{key}={value}"))
        .collect())
}

/// A config file as an untyped TOML table, addressed by dotted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: toml::Table,
}

impl ConfigDocument {
    /// Parse the file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let root = toml::from_str(&content)
            .map_err(|e| Error::config(format!("{} is not valid TOML: {e}", path.display())))?;
        Ok(Self { root })
    }

    /// The serialized form of `config`.
    pub fn from_config<C: ConfigManager>(config: &C) -> Result<Self> {
        match toml::Value::try_from(config) {
            Ok(toml::Value::Table(root)) => Ok(Self { root }),
            Ok(_) => Err(Error::config("config did not serialize to a table")),
            Err(e) => Err(Error::config(format!("Failed to serialize config: {e}"))),
        }
    }

    /// Value at a dotted key such as `render.layout.margin`.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        let mut parts = key.split('.');
        let first = self.root.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.as_table()?.get(part))
    }

    /// Store `value` at a dotted key, creating missing tables on the way.
    pub fn set(&mut self, key: &str, value: toml::Value) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::config(format!("invalid key '{key}'")));
        }
        let Some((leaf, parents)) = parts.split_last() else {
            return Err(Error::config("empty key"));
        };

        let mut table = &mut self.root;
        for part in parents {
            table = table
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()))
                .as_table_mut()
                .ok_or_else(|| Error::config(format!("'{part}' in '{key}' is not a table")))?;
        }
        table.insert(leaf.to_string(), value);
        Ok(())
    }

    fn parse_as<C: ConfigManager>(&self) -> std::result::Result<C, toml::de::Error> {
        toml::Value::Table(self.root.clone()).try_into()
    }

    fn write(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&self.root)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content).map_err(|e| Error::io_with_path(e, path))
    }
}

/// Interpret a command-line value as a bool, integer, float or string, in
/// that order.
pub fn infer_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    raw.parse::<i64>()
        .map(toml::Value::Integer)
        .or_else(|_| raw.parse::<f64>().map(toml::Value::Float))
        .unwrap_or_else(|_| toml::Value::String(raw.to_string()))
}

/// Strings print bare; tables print as TOML sections.
pub fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
