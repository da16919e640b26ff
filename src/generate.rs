//! Rules file generation.
//!
//! A run writes, in order: header, scalar bindings, catalog and ABI lists,
//! MSBuild arguments, OS bindings, bundle lists, the `framework-assemblies`
//! target and finally whatever the registered hooks append. Nothing is read
//! back once written.

use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use crate::{
    context::BuildContext,
    emit::{
        emit_prelude,
        naming::{artifact_basename, COMMIT_COUNT_VAR},
        stages::{emit_framework_assemblies, frameworks_root},
        vars::{write_list, write_scalar, write_value_list, ListMode},
        RulesWriter,
    },
    error::Result,
    os::{bindings_for, OsBindings},
    properties::known,
};

pub const ZIP_OUTPUT_PREFIX: &str = "xamarin.android-oss";
pub const TEST_RESULTS_PREFIX: &str = "xa-test-results";
pub const BUILD_STATUS_PREFIX: &str = "xa-build-status";

pub struct Generator<'a> {
    ctx: &'a BuildContext,
    os_bindings: &'a dyn OsBindings,
}

impl<'a> Generator<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self {
            ctx,
            os_bindings: bindings_for(ctx.os.family),
        }
    }

    /// Replace the OS collaborator chosen from the context's OS family.
    pub fn with_os_bindings(mut self, os_bindings: &'a dyn OsBindings) -> Self {
        self.os_bindings = os_bindings;
        self
    }

    pub fn context(&self) -> &'a BuildContext {
        self.ctx
    }

    /// Render the whole document in memory.
    pub fn render(&self) -> Result<String> {
        let mut out = RulesWriter::new();
        self.generate(&mut out)?;
        Ok(out.finish())
    }

    /// Render, then write and flush. The destination is only created once the
    /// document rendered successfully.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let text = self.render()?;

        let mut w = BufWriter::new(fs::File::create(path)?);
        w.write_all(text.as_bytes())?;
        w.flush()?;

        info!(path = %path.display(), bytes = text.len(), "wrote rules file");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        let text = self.render()?;
        w.write_all(text.as_bytes())?;
        w.flush()?;
        Ok(())
    }

    pub fn generate(&self, out: &mut RulesWriter) -> Result<()> {
        let ctx = self.ctx;
        let props = &ctx.properties;

        emit_prelude(out);
        self.emit_scalars(out);
        self.emit_value_lists(out);

        write_scalar(out, "ANDROID_TOOLCHAIN_DIR", props.required(known::ANDROID_TOOLCHAIN_DIRECTORY)?);
        if !ctx.mono_options.is_empty() {
            write_value_list(out, "MONO_OPTIONS", &ctx.mono_options);
            out.push_line("export MONO_OPTIONS");
        }

        self.emit_msbuild_args(out)?;

        self.os_bindings.contribute(&ctx.os, out)?;

        self.emit_bundle_lists(out);

        let root = frameworks_root(
            props.required(known::XA_BIN_RELATIVE_INSTALL_PREFIX)?,
            &ctx.paths.frameworks_subdir,
        )?;
        emit_framework_assemblies(out, &ctx.catalog, &root)?;

        ctx.hooks.run(self, out)?;
        Ok(())
    }

    fn emit_scalars(&self, out: &mut RulesWriter) {
        let ctx = self.ctx;

        write_scalar(out, "export OS_NAME", &ctx.os.os_type);
        write_scalar(out, "export OS_ARCH", &ctx.os.architecture);
        write_scalar(out, "export OS_ARCH_TRANSLATED", if ctx.os.translated { "true" } else { "false" });
        write_scalar(out, "PRODUCT_VERSION", &ctx.product_version);
        write_scalar(out, "MONO_SOURCE_FULL_PATH", &ctx.paths.mono_source_dir);

        // Evaluated by make on every run; branches change without regenerating.
        let branch_script = format!("{}/get-git-branch.sh", ctx.paths.scripts_dir.trim_end_matches('/'));
        write_scalar(
            out,
            "GIT_BRANCH",
            &format!("$(shell LANG=C \"{branch_script}\" | tr -d '[[:space:]]' | tr -C a-zA-Z0-9- _)"),
        );
        write_scalar(
            out,
            "GIT_COMMIT",
            "$(shell LANG=C git log --no-color --first-parent -n1 --pretty=format:%h)",
        );
        write_scalar(
            out,
            COMMIT_COUNT_VAR,
            &format!(
                "$(shell LANG=C git log {}..HEAD --oneline 2>/dev/null | wc -l | sed 's/ //g')",
                ctx.commit_of_last_version_change
            ),
        );

        write_scalar(out, "ZIP_EXTENSION", &ctx.os.zip_extension);
        write_scalar(out, "ZIP_OUTPUT_BASENAME", &artifact_basename(ctx, ZIP_OUTPUT_PREFIX));
        write_scalar(out, "_TEST_RESULTS_BASENAME", &artifact_basename(ctx, TEST_RESULTS_PREFIX));
        write_scalar(out, "_BUILD_STATUS_BASENAME", &artifact_basename(ctx, BUILD_STATUS_PREFIX));

        write_scalar(out, "ZIP_OUTPUT", "$(ZIP_OUTPUT_BASENAME).$(ZIP_EXTENSION)");
        write_scalar(out, "_BUILD_STATUS_ZIP_OUTPUT", "$(_BUILD_STATUS_BASENAME).$(ZIP_EXTENSION)");
        write_scalar(out, "_TEST_RESULTS_ZIP_OUTPUT", "$(_TEST_RESULTS_BASENAME).$(ZIP_EXTENSION)");
    }

    fn emit_value_lists(&self, out: &mut RulesWriter) {
        let ctx = self.ctx;
        let lists = ctx.catalog.value_lists();

        write_value_list(out, "ALL_API_LEVELS", &lists.all_api_levels);
        write_value_list(out, "ALL_PLATFORM_IDS", &lists.all_platform_ids);
        write_value_list(out, "ALL_FRAMEWORKS", &lists.all_frameworks);
        write_value_list(out, "API_LEVELS", &lists.api_levels);
        write_value_list(out, "STABLE_API_LEVELS", &lists.stable_api_levels);
        write_value_list(out, "FRAMEWORKS", &lists.frameworks);
        write_value_list(out, "STABLE_FRAMEWORKS", &lists.stable_frameworks);
        write_value_list(out, "ALL_JIT_ABIS", &ctx.abis.target_jit_list());
        write_value_list(out, "ALL_HOST_ABIS", &ctx.abis.host_jit_list());
        write_value_list(out, "ALL_AOT_ABIS", &ctx.abis.target_aot_list());
    }

    fn emit_msbuild_args(&self, out: &mut RulesWriter) -> Result<()> {
        let props = &self.ctx.properties;
        let keys = [
            known::ANDROID_SUPPORTED_TARGET_JIT_ABIS,
            known::ANDROID_SUPPORTED_HOST_JIT_ABIS,
            known::ANDROID_SUPPORTED_TARGET_AOT_ABIS,
        ];

        // Resolve all three first so a missing one leaves no dangling continuation.
        let values = keys
            .iter()
            .map(|k| props.required(k))
            .collect::<Result<Vec<_>, _>>()?;

        out.push_line("_MSBUILD_ARGS = \\");
        for (i, (key, value)) in keys.iter().zip(values).enumerate() {
            let cont = if i + 1 < keys.len() { " \\" } else { "" };
            out.push_line(&format!("\t/p:{key}={value}{cont}"));
        }
        Ok(())
    }

    fn emit_bundle_lists(&self, out: &mut RulesWriter) {
        let d = &self.ctx.defaults;

        write_list(out, "_BUNDLE_ZIPS_INCLUDE", &d.bundle_zips_include, ListMode::Plain);
        write_list(out, "_BUNDLE_ZIPS_EXCLUDE", &d.bundle_zips_exclude, ListMode::Plain);
        write_list(out, "_TEST_RESULTS_BUNDLE_INCLUDE", &d.test_results_bundle_include, ListMode::Plain);
        write_list(out, "_TEST_RESULTS_BUNDLE_EXCLUDE", &d.test_results_bundle_exclude, ListMode::Plain);
        write_list(out, "_BUILD_STATUS_BUNDLE_INCLUDE", &d.build_status_bundle_include, ListMode::Plain);
        write_list(
            out,
            "_BUILD_STATUS_BUNDLE_INCLUDE",
            &d.build_status_bundle_include_conditional,
            ListMode::Conditional,
        );
        write_list(out, "_BUILD_STATUS_BUNDLE_EXCLUDE", &d.build_status_bundle_exclude, ListMode::Plain);
    }
}
