use anyhow::{Context as _, Result};
use minijinja::Environment;
use serde_json::json;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    config::HookConfig,
    emit::RulesWriter,
    error::{ConfigError, Error},
    generate::Generator,
};

/// Appends rule text after the core blocks have been written.
pub trait RuleGenerator {
    fn emit(&self, gen: &Generator<'_>, out: &mut RulesWriter) -> Result<()>;
}

impl<F> RuleGenerator for F
where
    F: Fn(&Generator<'_>, &mut RulesWriter) -> Result<()>,
{
    fn emit(&self, gen: &Generator<'_>, out: &mut RulesWriter) -> Result<()> {
        self(gen, out)
    }
}

pub struct RegisteredHook {
    pub name: String,
    generator: Box<dyn RuleGenerator>,
}

/// Ordered hook list. `None` slots are kept so disabling a hook does not
/// shift the others, and are skipped at run time.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Option<RegisteredHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, generator: impl RuleGenerator + 'static) {
        self.register_optional(name, Some(generator));
    }

    /// Closure form of [`register`](Self::register); the explicit bound lets
    /// closure arguments infer their types.
    pub fn register_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Generator<'_>, &mut RulesWriter) -> Result<()> + 'static,
    {
        self.register(name, f);
    }

    pub fn register_optional<G: RuleGenerator + 'static>(&mut self, name: &str, generator: Option<G>) {
        self.hooks.push(generator.map(|g| RegisteredHook {
            name: name.to_string(),
            generator: Box::new(g),
        }));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Names of active hooks, in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().flatten().map(|h| h.name.as_str())
    }

    pub fn run(&self, gen: &Generator<'_>, out: &mut RulesWriter) -> Result<(), Error> {
        for (idx, slot) in self.hooks.iter().enumerate() {
            let Some(hook) = slot else {
                debug!(idx, "skipping empty hook slot");
                continue;
            };

            debug!(idx, hook = %hook.name, "running rule generator");
            hook.generator.emit(gen, out).map_err(|source| Error::Hook {
                name: hook.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.as_ref().map(|h| h.name.as_str())))
            .finish()
    }
}

// -------------------- config-declared hooks --------------------

pub struct TextHook {
    text: String,
}

pub struct TemplateHook {
    path: PathBuf,
    vars: std::collections::BTreeMap<String, String>,
}

pub struct IncludeHook {
    pattern: String,
}

impl RuleGenerator for TextHook {
    fn emit(&self, _gen: &Generator<'_>, out: &mut RulesWriter) -> Result<()> {
        push_block(out, &self.text);
        Ok(())
    }
}

impl RuleGenerator for TemplateHook {
    fn emit(&self, gen: &Generator<'_>, out: &mut RulesWriter) -> Result<()> {
        let source = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read template file: {}", self.path.display()))?;

        let ctx = gen.context();
        let lists = ctx.catalog.value_lists();
        let ctx_json = json!({
            "os": {
                "type": ctx.os.os_type,
                "architecture": ctx.os.architecture,
                "family": ctx.os.family.to_string(),
            },
            "product_version": ctx.product_version,
            "api_levels": lists.api_levels,
            "frameworks": lists.frameworks,
            "latest_stable_framework": ctx.catalog.latest_stable_framework().ok(),
            "vars": self.vars,
        });

        let rendered = render_minijinja(&source, &ctx_json)
            .with_context(|| format!("render failed ({})", self.path.display()))?;
        push_block(out, &rendered);
        Ok(())
    }
}

impl RuleGenerator for IncludeHook {
    fn emit(&self, _gen: &Generator<'_>, out: &mut RulesWriter) -> Result<()> {
        let mut paths = glob::glob(&self.pattern)
            .with_context(|| format!("invalid include pattern: {}", self.pattern))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to expand include pattern: {}", self.pattern))?;
        paths.sort();

        for p in paths {
            let text = fs::read_to_string(&p)
                .with_context(|| format!("failed to read include file: {}", p.display()))?;
            push_block(out, &text);
        }
        Ok(())
    }
}

/// Register every `[[hooks]]` entry, in declaration order. Disabled hooks
/// take an empty slot.
pub fn register_config_hooks(
    registry: &mut HookRegistry,
    hooks: &[HookConfig],
    base_dir: &Path,
) -> Result<(), ConfigError> {
    for h in hooks {
        if !h.enabled {
            registry.hooks.push(None);
            continue;
        }
        let generator = hook_from_config(h, base_dir)?;
        registry.hooks.push(Some(RegisteredHook {
            name: h.name.clone(),
            generator,
        }));
    }
    Ok(())
}

fn hook_from_config(h: &HookConfig, base_dir: &Path) -> Result<Box<dyn RuleGenerator>, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidHook {
        name: h.name.clone(),
        reason: reason.to_string(),
    };

    match (&h.text, &h.template, &h.include) {
        (Some(text), None, None) => Ok(Box::new(TextHook { text: text.clone() })),
        (None, Some(template), None) => Ok(Box::new(TemplateHook {
            path: base_dir.join(template),
            vars: h.vars.clone(),
        })),
        (None, None, Some(include)) => {
            let pattern = base_dir.join(include);
            let pattern = pattern
                .to_str()
                .ok_or_else(|| invalid("include pattern is not valid UTF-8"))?;
            Ok(Box::new(IncludeHook {
                pattern: pattern.to_string(),
            }))
        }
        (None, None, None) => Err(invalid("one of `text`, `template` or `include` is required")),
        _ => Err(invalid("only one of `text`, `template` or `include` may be set")),
    }
}

fn push_block(out: &mut RulesWriter, text: &str) {
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.blank();
    }
}

fn render_minijinja(source: &str, ctx_json: &serde_json::Value) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("rules", source)?;
    let tpl = env.get_template("rules")?;
    let v = minijinja::value::Value::from_serialize(ctx_json);
    Ok(tpl.render(v)?)
}
