use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config_path = rulegen::config::locate_config(args.config.as_deref())?;
    let ctx = rulegen::BuildContext::load(&config_path)
        .with_context(|| format!("failed to load build context from {}", config_path.display()))?;

    if args.dump_context {
        print!("{}", rulegen::report::dump_context(&ctx)?);
        return Ok(());
    }

    let report = rulegen::report::build_report(&ctx, args.report)?;
    if !report.is_empty() {
        match args.report_out.as_deref() {
            Some(p) => std::fs::write(p, &report)
                .with_context(|| format!("failed to write report to {}", p.display()))?,
            // stdout already carries the rules file when `-o -` is given
            None if args.writes_stdout() => eprint!("{report}"),
            None => print!("{report}"),
        }
    }

    let generator = rulegen::Generator::new(&ctx);
    if args.writes_stdout() {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        generator.write_to(&mut lock)?;
        lock.flush()?;
    } else {
        generator
            .write_to_path(&args.output)
            .with_context(|| format!("failed to generate {}", args.output.display()))?;
    }

    Ok(())
}
