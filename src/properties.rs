use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ConfigError;

/// Property keys the generator reads.
pub mod known {
    pub const ANDROID_TOOLCHAIN_DIRECTORY: &str = "AndroidToolchainDirectory";
    pub const ANDROID_SUPPORTED_TARGET_JIT_ABIS: &str = "AndroidSupportedTargetJitAbis";
    pub const ANDROID_SUPPORTED_HOST_JIT_ABIS: &str = "AndroidSupportedHostJitAbis";
    pub const ANDROID_SUPPORTED_TARGET_AOT_ABIS: &str = "AndroidSupportedTargetAotAbis";
    pub const XA_BIN_RELATIVE_INSTALL_PREFIX: &str = "XABinRelativeInstallPrefix";

    pub const ALL: &[&str] = &[
        ANDROID_TOOLCHAIN_DIRECTORY,
        ANDROID_SUPPORTED_TARGET_JIT_ABIS,
        ANDROID_SUPPORTED_HOST_JIT_ABIS,
        ANDROID_SUPPORTED_TARGET_AOT_ABIS,
        XA_BIN_RELATIVE_INSTALL_PREFIX,
    ];
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Lookup that treats an absent or empty value as a configuration error.
    pub fn required(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
