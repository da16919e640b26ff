use serde::Serialize;

use crate::{
    abi::EnabledAbis,
    catalog::Catalog,
    config::{BundleDefaults, PathsConfig},
    context::BuildContext,
    os::OsDescriptor,
    properties::Properties,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportMode {
    Off,
    Summary,
    Full,
}

/// Serializable view of a resolved context.
#[derive(Debug, Serialize)]
pub struct ContextView<'a> {
    pub os: &'a OsDescriptor,
    pub product_version: &'a str,
    pub commit_of_last_version_change: &'a str,
    pub abis: &'a EnabledAbis,
    pub properties: &'a Properties,
    pub paths: &'a PathsConfig,
    pub mono_options: &'a [String],
    pub defaults: &'a BundleDefaults,
    pub platforms: &'a Catalog,
    pub hooks: Vec<&'a str>,
}

impl<'a> From<&'a BuildContext> for ContextView<'a> {
    fn from(ctx: &'a BuildContext) -> Self {
        Self {
            os: &ctx.os,
            product_version: &ctx.product_version,
            commit_of_last_version_change: &ctx.commit_of_last_version_change,
            abis: &ctx.abis,
            properties: &ctx.properties,
            paths: &ctx.paths,
            mono_options: &ctx.mono_options,
            defaults: &ctx.defaults,
            platforms: &ctx.catalog,
            hooks: ctx.hooks.names().collect(),
        }
    }
}

pub fn build_report(ctx: &BuildContext, mode: ReportMode) -> anyhow::Result<String> {
    match mode {
        ReportMode::Off => Ok(String::new()),
        ReportMode::Summary => Ok(summary(ctx)),
        ReportMode::Full => dump_context(ctx),
    }
}

pub fn dump_context(ctx: &BuildContext) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(&ContextView::from(ctx))?;
    s.push('\n');
    Ok(s)
}

fn summary(ctx: &BuildContext) -> String {
    let mut out = String::new();

    out.push_str("rulegen report (summary)\n");
    out.push_str("========================\n");
    out.push_str(&format!(
        "os: {} {} (family={}, translated={})\n",
        ctx.os.os_type, ctx.os.architecture, ctx.os.family, ctx.os.translated
    ));
    out.push_str(&format!("product_version: {}\n", ctx.product_version));

    let supported: Vec<_> = ctx.catalog.supported().collect();
    out.push_str(&format!(
        "\nplatforms: total={} supported={}\n",
        ctx.catalog.entries().len(),
        supported.len()
    ));
    for e in &supported {
        out.push_str(&format!(
            "  - {} ({}, framework={}, stable={})\n",
            e.api_level,
            e.platform_id,
            e.framework.as_deref().unwrap_or("-"),
            e.stable
        ));
    }
    match ctx.catalog.latest_stable_framework() {
        Ok(fw) => out.push_str(&format!("  latest stable: {fw}\n")),
        Err(e) => out.push_str(&format!("  latest stable: <{e}>\n")),
    }

    out.push_str("\nabis\n");
    out.push_str(&format!("  target_jit: {}\n", ctx.abis.target_jit_list().join(" ")));
    out.push_str(&format!("  host_jit: {}\n", ctx.abis.host_jit_list().join(" ")));
    out.push_str(&format!("  target_aot: {}\n", ctx.abis.target_aot_list().join(" ")));

    let active: Vec<_> = ctx.hooks.names().collect();
    out.push_str(&format!(
        "\nhooks: registered={} active={}\n",
        ctx.hooks.len(),
        active.len()
    ));
    for name in active {
        out.push_str(&format!("  - {name}\n"));
    }

    out
}
