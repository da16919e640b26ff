use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{abi::EnabledAbis, catalog::PlatformEntry, os::OsFamily};

pub const CONFIG_ENV_VAR: &str = "RULEGEN_CONFIG";

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("rulegen").join("config.toml");
        }
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("rulegen").join("config.toml");
    }
    PathBuf::from("rulegen/config.toml")
}

/// Config path precedence:
/// 1) CLI --config (must exist)
/// 2) RULEGEN_CONFIG (must exist)
/// 3) default XDG_CONFIG_HOME/rulegen/config.toml
pub fn locate_config(cli_config: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = cli_config {
        if !p.exists() {
            bail!("--config was provided but file does not exist: {}", p.display());
        }
        return Ok(p.to_path_buf());
    }

    if let Some(p) = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
    {
        if !p.exists() {
            bail!("{CONFIG_ENV_VAR} is set but file does not exist: {}", p.display());
        }
        return Ok(p);
    }

    let p = default_config_path();
    if !p.exists() {
        bail!("no config found (looked for {}); pass --config or set {CONFIG_ENV_VAR}", p.display());
    }
    Ok(p)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub rulegen: RulegenMeta,

    /// Omitted: detect the current host.
    #[serde(default)]
    pub os: Option<OsConfig>,

    pub build: BuildConfig,

    #[serde(default)]
    pub abis: EnabledAbis,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub defaults: BundleDefaults,

    /// Omitted: use the built-in catalog.
    #[serde(default)]
    pub platforms: Vec<PlatformEntry>,

    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        Ok(cfg)
    }
}

#[derive(Debug, Deserialize)]
pub struct RulegenMeta {
    pub schema_version: u32,
}

#[derive(Debug, Deserialize)]
pub struct OsConfig {
    #[serde(rename = "type")]
    pub os_type: String,

    pub architecture: String,

    #[serde(default)]
    pub translated: bool,

    /// Derived from `type` when omitted.
    #[serde(default)]
    pub family: Option<OsFamily>,

    #[serde(default)]
    pub zip_extension: Option<String>,

    #[serde(default)]
    pub homebrew_prefix: Option<String>,

    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    pub product_version: String,
    pub commit_of_last_version_change: String,

    /// Written as `MONO_OPTIONS` when non-empty.
    #[serde(default)]
    pub mono_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub mono_source_dir: String,
    pub scripts_dir: String,
    pub frameworks_subdir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            mono_source_dir: "external/mono".to_string(),
            scripts_dir: "build-tools/scripts".to_string(),
            frameworks_subdir: "xbuild-frameworks/MonoAndroid".to_string(),
        }
    }
}

/// Include/exclude lists for the bundle targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleDefaults {
    pub bundle_zips_include: Vec<String>,
    pub bundle_zips_exclude: Vec<String>,
    pub test_results_bundle_include: Vec<String>,
    pub test_results_bundle_exclude: Vec<String>,
    pub build_status_bundle_include: Vec<String>,
    pub build_status_bundle_include_conditional: Vec<String>,
    pub build_status_bundle_exclude: Vec<String>,
}

impl Default for BundleDefaults {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            bundle_zips_include: list(&[
                "$(ZIP_OUTPUT_BASENAME)/THIRD-PARTY-NOTICES.TXT",
                "$(ZIP_OUTPUT_BASENAME)/bin/Debug",
                "$(ZIP_OUTPUT_BASENAME)/bin/Release",
            ]),
            bundle_zips_exclude: list(&["$(ZIP_OUTPUT_BASENAME)/bin/*/bundle-*.zip"]),
            test_results_bundle_include: list(&[
                "$(wildcard TestResult-*.xml)",
                "$(wildcard bin/Test$(CONFIGURATION)/compatibility)",
                "$(wildcard bin/Test$(CONFIGURATION)/logcat*)",
                "$(wildcard bin/Test$(CONFIGURATION)/msbuild*.binlog)",
                "$(wildcard bin/Test$(CONFIGURATION)/temp)",
            ]),
            test_results_bundle_exclude: list(&["bin/Test$(CONFIGURATION)/packages"]),
            build_status_bundle_include: list(&[
                "Configuration.OperatingSystem.props",
                "$(wildcard bin/Build$(CONFIGURATION)/msbuild*.binlog)",
                "$(wildcard bin/Build$(CONFIGURATION)/*.log)",
            ]),
            build_status_bundle_include_conditional: list(&[
                "bin/Build$(CONFIGURATION)/XABuildConfig.cs",
                "bin/$(CONFIGURATION)/lib/xamarin.android/xbuild/Xamarin/Android/Xamarin.Android.Common.props",
            ]),
            build_status_bundle_exclude: Vec::new(),
        }
    }
}

/// A `[[hooks]]` entry. Exactly one of `text`, `template` or `include` is set.
///
/// Disabled entries keep their slot but their sources are not checked.
#[derive(Debug, Clone, Deserialize)]
pub struct HookConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Rule text appended verbatim.
    #[serde(default)]
    pub text: Option<String>,

    /// MiniJinja template file, relative to the config file.
    #[serde(default)]
    pub template: Option<String>,

    /// Glob of files appended in sorted order, relative to the config file.
    #[serde(default)]
    pub include: Option<String>,

    /// Free-form values exposed to templates as `vars`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = Config::from_toml(
            r#"
            [rulegen]
            schema_version = 1

            [build]
            product_version = "13.2.99"
            commit_of_last_version_change = "0123abc"
            "#,
        )
        .unwrap();

        assert!(cfg.os.is_none());
        assert!(cfg.platforms.is_empty());
        assert!(cfg.build.mono_options.is_empty());
        assert_eq!(cfg.paths, PathsConfig::default());
        assert_eq!(cfg.defaults, BundleDefaults::default());
    }

    #[test]
    fn hooks_default_to_enabled() {
        let cfg = Config::from_toml(
            r#"
            [rulegen]
            schema_version = 1

            [build]
            product_version = "1.0"
            commit_of_last_version_change = "abc"

            [[hooks]]
            name = "extra"
            text = "extra:\n\t@true\n"

            [[hooks]]
            name = "off"
            enabled = false
            text = "never"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.hooks.len(), 2);
        assert!(cfg.hooks[0].enabled);
        assert!(!cfg.hooks[1].enabled);
    }
}
