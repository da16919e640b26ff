use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ALL_JIT_ABIS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86", "x86_64"];

pub const ALL_HOST_ABIS: &[&str] = &["Linux", "Darwin", "mxe-Win32", "mxe-Win64"];

pub const ALL_AOT_ABIS: &[&str] = &[
    "armeabi-v7a",
    "win-armeabi-v7a",
    "arm64",
    "win-arm64",
    "x86",
    "win-x86",
    "x86_64",
    "win-x86_64",
];

/// The three independent ABI families a build can enable.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledAbis {
    #[serde(default)]
    pub target_jit: BTreeSet<String>,

    #[serde(default)]
    pub host_jit: BTreeSet<String>,

    #[serde(default)]
    pub target_aot: BTreeSet<String>,
}

impl EnabledAbis {
    pub fn is_target_jit_enabled(&self, abi: &str) -> bool {
        self.target_jit.contains(abi)
    }

    pub fn is_host_jit_enabled(&self, abi: &str) -> bool {
        self.host_jit.contains(abi)
    }

    pub fn is_target_aot_enabled(&self, abi: &str) -> bool {
        self.target_aot.contains(abi)
    }

    /// Enabled target JIT ABIs in canonical order.
    pub fn target_jit_list(&self) -> Vec<&'static str> {
        ALL_JIT_ABIS
            .iter()
            .copied()
            .filter(|a| self.is_target_jit_enabled(a))
            .collect()
    }

    pub fn host_jit_list(&self) -> Vec<&'static str> {
        ALL_HOST_ABIS
            .iter()
            .copied()
            .filter(|a| self.is_host_jit_enabled(a))
            .collect()
    }

    pub fn target_aot_list(&self) -> Vec<&'static str> {
        ALL_AOT_ABIS
            .iter()
            .copied()
            .filter(|a| self.is_target_aot_enabled(a))
            .collect()
    }

    /// Log enabled names that no family knows about; they are never emitted.
    pub fn warn_unknown(&self) {
        report_unknown("target_jit", &self.target_jit, ALL_JIT_ABIS);
        report_unknown("host_jit", &self.host_jit, ALL_HOST_ABIS);
        report_unknown("target_aot", &self.target_aot, ALL_AOT_ABIS);
    }
}

fn report_unknown(family: &str, enabled: &BTreeSet<String>, known: &[&str]) {
    for abi in enabled {
        if !known.contains(&abi.as_str()) {
            warn!(family, abi = %abi, "ignoring unknown ABI");
        }
    }
}
