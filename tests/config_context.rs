use std::path::Path;

use rulegen::{
    catalog::default_catalog,
    config::{locate_config, CONFIG_ENV_VAR},
    report::{build_report, dump_context, ReportMode},
    BuildContext, Config, Generator, OsFamily,
};
use serde_json::Value;
use tempfile::tempdir;

const BASE: &str = r#"
[rulegen]
schema_version = 1

[os]
type = "Darwin"
architecture = "arm64"
translated = true
homebrew_prefix = "/opt/homebrew"

[os.variables]
JAVA_HOME = "/opt/jdk"

[build]
product_version = "34.0.0"
commit_of_last_version_change = "deadbeef"
mono_options = ["--debug"]

[abis]
target_jit = ["arm64-v8a", "x86_64", "mips"]
host_jit = ["Darwin"]

[properties]
AndroidToolchainDirectory = "/tc"
AndroidSupportedTargetJitAbis = "arm64-v8a:x86_64"
AndroidSupportedHostJitAbis = "Darwin"
AndroidSupportedTargetAotAbis = ""
XABinRelativeInstallPrefix = "lib/xamarin.android"
"#;

fn load(toml: &str) -> anyhow::Result<BuildContext> {
    let cfg = Config::from_toml(toml)?;
    BuildContext::from_config(cfg, Path::new("."))
}

#[test]
fn resolves_os_table_and_defaults() {
    let ctx = load(BASE).unwrap();

    assert_eq!(ctx.os.family, OsFamily::Darwin);
    assert!(ctx.os.translated);
    assert_eq!(ctx.os.zip_extension, "tar.bz2");
    assert_eq!(ctx.catalog, default_catalog());
    assert_eq!(ctx.mono_options, vec!["--debug"]);
    assert!(ctx.hooks.is_empty());
}

#[test]
fn unknown_abis_are_not_emitted() {
    let ctx = load(&BASE.replace(
        "AndroidSupportedTargetAotAbis = \"\"",
        "AndroidSupportedTargetAotAbis = \"arm64\"",
    ))
    .unwrap();

    let text = Generator::new(&ctx).render().unwrap();

    assert!(text.contains("ALL_JIT_ABIS = arm64-v8a x86_64\n"));
    assert!(!text.contains("mips"));
    assert!(text.contains("export OS_ARCH_TRANSLATED = true\n"));
    assert!(text.contains("HOMEBREW_PREFIX = /opt/homebrew\nJAVA_HOME = /opt/jdk\n"));
    // Default catalog: 21 is the first supported level, 33 the latest stable.
    assert!(text.contains("/p:AndroidPreviousFrameworkVersion=v1.0 || exit 1;\n"));
    assert!(text.contains("/v13.0/Mono.Android.Export.*\n"));
}

#[test]
fn empty_required_property_from_config_fails() {
    let ctx = load(BASE).unwrap();
    let err = Generator::new(&ctx).render().unwrap_err();
    assert_eq!(err.to_string(), "required property `AndroidSupportedTargetAotAbis` has no value");
}

#[test]
fn rejects_unordered_platforms() {
    let toml = format!(
        r#"{BASE}
[[platforms]]
api_level = 22
platform_id = "22"
framework = "v5.1"

[[platforms]]
api_level = 21
platform_id = "21"
framework = "v5.0"
"#
    );

    let err = load(&toml).unwrap_err();
    assert!(format!("{err:#}").contains("22 followed by 21"));
}

#[test]
fn rejects_hook_without_source() {
    let toml = format!(
        r#"{BASE}
[[hooks]]
name = "nothing"
"#
    );

    let err = load(&toml).unwrap_err();
    assert!(format!("{err:#}").contains("hook `nothing` is invalid"));
}

#[test]
fn load_reads_config_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, BASE).unwrap();

    let ctx = BuildContext::load(&path).unwrap();
    assert_eq!(ctx.product_version, "34.0.0");
}

#[test]
fn context_dump_is_json() {
    let ctx = load(BASE).unwrap();
    let v: Value = serde_json::from_str(&dump_context(&ctx).unwrap()).unwrap();

    assert_eq!(v["product_version"], "34.0.0");
    assert_eq!(v["os"]["family"], "darwin");
    assert_eq!(v["platforms"][20]["framework"], "v5.0");
    assert_eq!(v["properties"]["AndroidToolchainDirectory"], "/tc");
}

#[test]
fn summary_report_lists_supported_platforms() {
    let ctx = load(BASE).unwrap();
    let report = build_report(&ctx, ReportMode::Summary).unwrap();

    assert!(report.contains("platforms: total=34 supported=14\n"));
    assert!(report.contains("  latest stable: v13.0\n"));
    assert!(report.contains("  target_jit: arm64-v8a x86_64\n"));
    assert!(build_report(&ctx, ReportMode::Off).unwrap().is_empty());
}

#[test]
fn locate_config_prefers_flag_then_env() {
    let dir = tempdir().unwrap();
    let flag = dir.path().join("flag.toml");
    let env = dir.path().join("env.toml");
    std::fs::write(&flag, BASE).unwrap();
    std::fs::write(&env, BASE).unwrap();

    let err = locate_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("--config was provided"));

    // Only test in this binary touching the variable.
    std::env::set_var(CONFIG_ENV_VAR, &env);
    assert_eq!(locate_config(Some(&flag)).unwrap(), flag);
    assert_eq!(locate_config(None).unwrap(), env);

    std::env::set_var(CONFIG_ENV_VAR, dir.path().join("gone.toml"));
    let err = locate_config(None).unwrap_err();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert!(err.to_string().contains("RULEGEN_CONFIG is set but file does not exist"));
}
