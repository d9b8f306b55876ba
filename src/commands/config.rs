use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::runtime::Runtime;

use super::paths::default_install_root;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "SIMP_CONFIG";

/// On-disk config, `<config_dir>/simp/env.json` by default.
///
/// Unknown fields are ignored so files written by older tooling still load.
#[derive(Debug, Default, Deserialize)]
struct EnvFile {
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub install_root: PathBuf,
}

impl Config {
    pub fn new(install_root: PathBuf) -> Self {
        Self { install_root }
    }

    /// Resolve the install root: explicit value, then the config file, then
    /// the platform default.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, install_root: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = install_root {
            debug!("Using install root from command line: {:?}", root);
            return Ok(Self::new(root));
        }

        if let Some(root) = root_from_env_file(runtime)? {
            debug!("Using install root from config file: {:?}", root);
            return Ok(Self::new(root));
        }

        Ok(Self::new(default_install_root(runtime)?))
    }

    /// Returns: `<install_root>/packages`
    pub fn packages_root(&self) -> PathBuf {
        self.install_root.join("packages")
    }
}

fn env_file_path<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    match runtime.env_var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => runtime
            .config_dir()
            .map(|dir| dir.join("simp").join("env.json")),
    }
}

fn root_from_env_file<R: Runtime>(runtime: &R) -> Result<Option<PathBuf>> {
    let Some(path) = env_file_path(runtime) else {
        return Ok(None);
    };
    if !runtime.exists(&path) {
        debug!("No config file at {:?}", path);
        return Ok(None);
    }

    let content = runtime.read_to_string(&path)?;
    let env: EnvFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

    // A relative root is taken relative to the config file itself.
    Ok(env.root.map(|root| match path.parent() {
        Some(parent) if root.is_relative() => parent.join(root),
        _ => root,
    }))
}
