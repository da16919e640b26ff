//! Deterministic make-rules generator for Android framework builds.
//!
//! Given a resolved [`BuildContext`] (host OS, product version, enabled ABIs,
//! required properties and the platform catalog) the [`Generator`] writes a
//! make-compatible rules file. Values that depend on the checkout (branch,
//! commit, commit count) are left as make expressions so the file stays valid
//! across branch switches.

pub mod abi;
pub mod catalog;
pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod generate;
pub mod hooks;
pub mod os;
pub mod properties;
pub mod report;

pub use catalog::{Catalog, PlatformEntry};
pub use config::Config;
pub use context::BuildContext;
pub use emit::{ListMode, RulesWriter};
pub use error::{ConfigError, Error};
pub use generate::Generator;
pub use hooks::{HookRegistry, RuleGenerator};
pub use os::{OsBindings, OsDescriptor, OsFamily};
