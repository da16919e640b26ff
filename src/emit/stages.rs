use std::path::Path;
use tracing::debug;

use super::builder::RulesWriter;
use crate::{
  catalog::{Catalog, PlatformEntry},
  error::ConfigError,
};

/// Previous-version label of the first framework build.
pub const BASELINE_VERSION: &str = "v1.0";

pub const FRAMEWORK_ASSEMBLIES_TARGET: &str = "framework-assemblies";

/// One framework build, derived while walking the supported platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedStep<'a> {
  pub index: usize,
  pub api_level: u32,
  pub platform_id: &'a str,
  pub current_version: &'a str,
  pub previous_version: &'a str,
}

/// Walks the supported entries, threading each framework label into the
/// next step as its previous version.
pub struct StagedSteps<'a, I> {
  entries: I,
  index: usize,
  previous: &'a str,
}

impl<'a, I> Iterator for StagedSteps<'a, I>
where
  I: Iterator<Item = &'a PlatformEntry>,
{
  type Item = Result<StagedStep<'a>, ConfigError>;

  fn next(&mut self) -> Option<Self::Item> {
    let entry = self.entries.next()?;
    let Some(current) = entry.framework.as_deref().filter(|f| !f.is_empty()) else {
      return Some(Err(ConfigError::MissingFramework { api_level: entry.api_level }));
    };

    let step = StagedStep {
      index: self.index,
      api_level: entry.api_level,
      platform_id: &entry.platform_id,
      current_version: current,
      previous_version: self.previous,
    };

    self.index += 1;
    self.previous = current;
    Some(Ok(step))
  }
}

pub fn staged_steps(catalog: &Catalog) -> StagedSteps<'_, impl Iterator<Item = &PlatformEntry>> {
  StagedSteps {
    entries: catalog.supported(),
    index: 0,
    previous: BASELINE_VERSION,
  }
}

/// `bin/$(CONFIGURATION)/{install_prefix}/{frameworks_subdir}`
///
/// Both parts live under the build output tree, so absolute paths are rejected.
pub fn frameworks_root(install_prefix: &str, frameworks_subdir: &str) -> Result<String, ConfigError> {
  for part in [install_prefix, frameworks_subdir] {
    if part.starts_with('/') || Path::new(part).is_absolute() {
      return Err(ConfigError::AbsoluteInstallPath(part.to_string()));
    }
  }
  Ok(join_make_path(&["bin", "$(CONFIGURATION)", install_prefix, frameworks_subdir]))
}

pub fn redist_list_path(frameworks_root: &str, version: &str) -> String {
  join_make_path(&[frameworks_root, version, "RedistList", "FrameworkList.xml"])
}

/// Emit the `framework-assemblies` target: one build per supported platform,
/// then the auxiliary assemblies.
///
/// All catalog checks happen before the first line is written.
pub fn emit_framework_assemblies(
  out: &mut RulesWriter,
  catalog: &Catalog,
  frameworks_root: &str,
) -> Result<(), ConfigError> {
  let first = catalog.supported().next().ok_or(ConfigError::NoSupportedPlatforms)?;
  let first_framework = first
    .framework
    .as_deref()
    .filter(|f| !f.is_empty())
    .ok_or(ConfigError::MissingFramework { api_level: first.api_level })?;
  let latest_stable = catalog.latest_stable_framework()?;
  let steps = staged_steps(catalog).collect::<Result<Vec<_>, _>>()?;

  out.blank();
  out.push_line(&format!(".PHONY: {FRAMEWORK_ASSEMBLIES_TARGET}"));
  out.push_line(&format!("{FRAMEWORK_ASSEMBLIES_TARGET}:"));

  for step in &steps {
    debug!(
      index = step.index,
      api_level = step.api_level,
      framework = step.current_version,
      previous = step.previous_version,
      "emitting framework stage"
    );
    emit_step(out, step, frameworks_root);
  }

  let first_identity = FirstIdentity {
    api_level: first.api_level,
    platform_id: &first.platform_id,
    framework: first_framework,
  };

  emit_msbuild_call(
    out,
    &first_identity,
    &join_make_path(&[frameworks_root, BASELINE_VERSION, "Xamarin.Android.NUnitLite.dll"]),
    "src/Xamarin.Android.NUnitLite/Xamarin.Android.NUnitLite.csproj",
  );
  emit_msbuild_call(
    out,
    &first_identity,
    &join_make_path(&[frameworks_root, latest_stable, "Mono.Android.Export.*"]),
    "src/Mono.Android.Export/Mono.Android.Export.csproj",
  );
  emit_msbuild_call(
    out,
    &first_identity,
    &join_make_path(&[frameworks_root, latest_stable, "OpenTK-1.0.*"]),
    "build-tools/download-legacy-assemblies/download-legacy-assemblies.csproj",
  );
  out.blank();

  Ok(())
}

fn emit_step(out: &mut RulesWriter, step: &StagedStep<'_>, frameworks_root: &str) {
  let redist = redist_list_path(frameworks_root, step.current_version);

  // The cached redist list is stale unless it already mentions the previous version.
  out.rule_line(&format!("grep -q {} {redist}; \\", step.previous_version));
  out.rule_line("if [ $$? -ne 0 ] ; then \\");
  out.rule_line(&format!("\trm -f {redist}; \\"));
  out.rule_line("fi; \\");
  out.rule_line("$(call MSBUILD_BINLOG,Mono.Android,$(_SLN_BUILD)) src/Mono.Android/Mono.Android.csproj \\");
  out.rule_line("\t/p:Configuration=$(CONFIGURATION) $(_MSBUILD_ARGS) \\");
  out.rule_line(&format!(
    "\t/p:AndroidApiLevel={} /p:AndroidPlatformId={} /p:AndroidFrameworkVersion={} \\",
    step.api_level, step.platform_id, step.current_version
  ));
  out.rule_line(&format!("\t/p:AndroidPreviousFrameworkVersion={} || exit 1;", step.previous_version));
}

struct FirstIdentity<'a> {
  api_level: u32,
  platform_id: &'a str,
  framework: &'a str,
}

fn emit_msbuild_call(out: &mut RulesWriter, first: &FirstIdentity<'_>, file_to_remove: &str, project: &str) {
  out.rule_line(&format!("rm -f {file_to_remove}"));
  out.rule_line(&format!("$(call MSBUILD_BINLOG,NUnitLite,$(_SLN_BUILD)) $(MSBUILD_FLAGS) {project} \\"));
  out.rule_line("\t/p:Configuration=$(CONFIGURATION) $(_MSBUILD_ARGS) \\");
  out.rule_line(&format!(
    "\t/p:AndroidApiLevel={} /p:AndroidPlatformId={} \\",
    first.api_level, first.platform_id
  ));
  out.rule_line(&format!("\t/p:AndroidFrameworkVersion={} || exit 1;", first.framework));
}

fn join_make_path(parts: &[&str]) -> String {
  parts
    .iter()
    .map(|p| p.trim_matches('/'))
    .filter(|p| !p.is_empty())
    .collect::<Vec<_>>()
    .join("/")
}
