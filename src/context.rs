use anyhow::{Context as _, Result};
use std::path::Path;
use tracing::debug;

use crate::{
    abi::EnabledAbis,
    catalog::{default_catalog, Catalog},
    config::{BundleDefaults, Config, OsConfig, PathsConfig},
    hooks::{register_config_hooks, HookRegistry},
    os::{OsDescriptor, OsFamily},
    properties::Properties,
};

/// Everything a generation run reads. Built once, never mutated by the run.
#[derive(Debug)]
pub struct BuildContext {
    pub os: OsDescriptor,
    pub product_version: String,
    pub commit_of_last_version_change: String,
    pub abis: EnabledAbis,
    pub properties: Properties,
    pub paths: PathsConfig,
    pub mono_options: Vec<String>,
    pub defaults: BundleDefaults,
    pub catalog: Catalog,
    pub hooks: HookRegistry,
}

impl BuildContext {
    pub fn new(os: OsDescriptor, product_version: &str, commit_of_last_version_change: &str) -> Self {
        Self {
            os,
            product_version: product_version.to_string(),
            commit_of_last_version_change: commit_of_last_version_change.to_string(),
            abis: EnabledAbis::default(),
            properties: Properties::default(),
            paths: PathsConfig::default(),
            mono_options: Vec::new(),
            defaults: BundleDefaults::default(),
            catalog: default_catalog(),
            hooks: HookRegistry::new(),
        }
    }

    /// Resolve a loaded config. Relative hook paths are taken from `base_dir`
    /// (normally the directory holding the config file).
    pub fn from_config(cfg: Config, base_dir: &Path) -> Result<Self> {
        let os = match cfg.os {
            Some(os) => resolve_os(os),
            None => {
                let os = OsDescriptor::detect();
                debug!(os_type = %os.os_type, arch = %os.architecture, "no [os] table, probed host");
                os
            }
        };

        let catalog = if cfg.platforms.is_empty() {
            default_catalog()
        } else {
            Catalog::new(cfg.platforms).context("invalid [[platforms]] table")?
        };

        let mut hooks = HookRegistry::new();
        register_config_hooks(&mut hooks, &cfg.hooks, base_dir).context("invalid [[hooks]] table")?;

        cfg.abis.warn_unknown();

        Ok(Self {
            os,
            product_version: cfg.build.product_version,
            commit_of_last_version_change: cfg.build.commit_of_last_version_change,
            abis: cfg.abis,
            properties: Properties::new(cfg.properties),
            paths: cfg.paths,
            mono_options: cfg.build.mono_options,
            defaults: cfg.defaults,
            catalog,
            hooks,
        })
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        let cfg = Config::load_from_path(config_path)?;
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_config(cfg, base_dir)
    }
}

fn resolve_os(os: OsConfig) -> OsDescriptor {
    let family = os
        .family
        .or_else(|| OsFamily::from_os_type(&os.os_type))
        .unwrap_or_else(OsFamily::host);

    let mut desc = OsDescriptor::new(&os.os_type, &os.architecture, family);
    desc.translated = os.translated;
    if let Some(ext) = os.zip_extension {
        desc.zip_extension = ext;
    }
    desc.homebrew_prefix = os.homebrew_prefix;
    desc.variables = os.variables;
    desc
}
