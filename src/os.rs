use std::{collections::BTreeMap, fmt, process::Command};

use serde::{Deserialize, Serialize};

use crate::{
    emit::{vars::write_scalar, RulesWriter},
    error::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Darwin,
    Windows,
}

impl OsFamily {
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            OsFamily::Darwin
        } else if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else {
            OsFamily::Linux
        }
    }

    /// Best guess from an OS type string such as `Linux` or `Darwin`.
    pub fn from_os_type(os_type: &str) -> Option<Self> {
        match os_type.trim().to_ascii_lowercase().as_str() {
            "linux" => Some(OsFamily::Linux),
            "darwin" | "macos" | "mac" => Some(OsFamily::Darwin),
            "windows" | "win" => Some(OsFamily::Windows),
            _ => None,
        }
    }

    pub fn default_zip_extension(self) -> &'static str {
        match self {
            OsFamily::Windows => "zip",
            OsFamily::Linux | OsFamily::Darwin => "tar.bz2",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OsFamily::Linux => "Linux",
            OsFamily::Darwin => "Darwin",
            OsFamily::Windows => "Windows",
        };
        f.write_str(s)
    }
}

/// What the generator knows about the machine the build runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsDescriptor {
    pub os_type: String,
    pub architecture: String,
    pub translated: bool,
    pub family: OsFamily,
    pub zip_extension: String,
    pub homebrew_prefix: Option<String>,

    /// Extra `NAME = value` lines appended after the family bindings.
    pub variables: BTreeMap<String, String>,
}

impl OsDescriptor {
    pub fn new(os_type: &str, architecture: &str, family: OsFamily) -> Self {
        Self {
            os_type: os_type.to_string(),
            architecture: architecture.to_string(),
            translated: false,
            family,
            zip_extension: family.default_zip_extension().to_string(),
            homebrew_prefix: None,
            variables: BTreeMap::new(),
        }
    }

    /// Probe the current host. Only used when the configuration has no `[os]` table.
    pub fn detect() -> Self {
        let family = OsFamily::host();
        let architecture = match std::env::consts::ARCH {
            "aarch64" => "arm64",
            other => other,
        };

        let mut os = Self::new(&family.to_string(), architecture, family);
        if family == OsFamily::Darwin {
            os.translated = process_is_translated();
            os.homebrew_prefix = try_cmd("brew", &["--prefix"]);
        }
        os
    }
}

/// Contributes the OS-family specific block of the rules file.
pub trait OsBindings {
    fn contribute(&self, os: &OsDescriptor, out: &mut RulesWriter) -> Result<()>;
}

pub struct LinuxBindings;
pub struct DarwinBindings;
pub struct WindowsBindings;

impl OsBindings for LinuxBindings {
    fn contribute(&self, os: &OsDescriptor, out: &mut RulesWriter) -> Result<()> {
        write_scalar(out, "HOST_OS_FAMILY", "Linux");
        write_scalar(out, "NDK_HOST_TAG", "linux-x86_64");
        write_scalar(out, "SHELL_LIB_PATH_VAR", "LD_LIBRARY_PATH");
        write_extra_variables(os, out);
        Ok(())
    }
}

impl OsBindings for DarwinBindings {
    fn contribute(&self, os: &OsDescriptor, out: &mut RulesWriter) -> Result<()> {
        write_scalar(out, "HOST_OS_FAMILY", "Darwin");
        // The NDK ships x86_64 darwin binaries only.
        write_scalar(out, "NDK_HOST_TAG", "darwin-x86_64");
        write_scalar(out, "SHELL_LIB_PATH_VAR", "DYLD_LIBRARY_PATH");
        if let Some(prefix) = os.homebrew_prefix.as_deref() {
            write_scalar(out, "HOMEBREW_PREFIX", prefix);
        }
        write_extra_variables(os, out);
        Ok(())
    }
}

impl OsBindings for WindowsBindings {
    fn contribute(&self, os: &OsDescriptor, out: &mut RulesWriter) -> Result<()> {
        write_scalar(out, "HOST_OS_FAMILY", "Windows");
        write_scalar(out, "NDK_HOST_TAG", "windows-x86_64");
        write_scalar(out, "EXE_SUFFIX", ".exe");
        write_extra_variables(os, out);
        Ok(())
    }
}

pub fn bindings_for(family: OsFamily) -> &'static dyn OsBindings {
    match family {
        OsFamily::Linux => &LinuxBindings,
        OsFamily::Darwin => &DarwinBindings,
        OsFamily::Windows => &WindowsBindings,
    }
}

fn write_extra_variables(os: &OsDescriptor, out: &mut RulesWriter) {
    for (k, v) in &os.variables {
        write_scalar(out, k, v);
    }
}

fn process_is_translated() -> bool {
    try_cmd("sysctl", &["-n", "sysctl.proc_translated"]).as_deref() == Some("1")
}

fn try_cmd(cmd: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(cmd).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darwin_bindings_include_homebrew_and_extras() {
        let mut os = OsDescriptor::new("Darwin", "arm64", OsFamily::Darwin);
        os.homebrew_prefix = Some("/opt/homebrew".to_string());
        os.variables.insert("JAVA_HOME".to_string(), "/opt/jdk".to_string());

        let mut out = RulesWriter::new();
        bindings_for(os.family).contribute(&os, &mut out).unwrap();

        assert_eq!(
            out.finish(),
            "HOST_OS_FAMILY = Darwin\n\
             NDK_HOST_TAG = darwin-x86_64\n\
             SHELL_LIB_PATH_VAR = DYLD_LIBRARY_PATH\n\
             HOMEBREW_PREFIX = /opt/homebrew\n\
             JAVA_HOME = /opt/jdk\n"
        );
    }

    #[test]
    fn family_parsing_is_case_insensitive() {
        assert_eq!(OsFamily::from_os_type("Darwin"), Some(OsFamily::Darwin));
        assert_eq!(OsFamily::from_os_type("LINUX"), Some(OsFamily::Linux));
        assert_eq!(OsFamily::from_os_type("Plan9"), None);
    }
}
