use clap::Parser;
use rulegen::report::ReportMode;

#[derive(Parser, Debug)]
#[command(name = "rulegen", version, about)]
pub struct Args {
    /// Path to config.toml (overrides RULEGEN_CONFIG and XDG default)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Where to write the rules file (`-` for stdout)
    #[arg(short, long, default_value = "rules.mk")]
    pub output: std::path::PathBuf,

    /// Print a report of the resolved build context
    #[arg(long, value_enum, default_value_t = ReportMode::Off)]
    pub report: ReportMode,

    /// Write report to a file instead of stdout
    #[arg(long)]
    pub report_out: Option<std::path::PathBuf>,

    /// Dump the resolved context as JSON and exit without generating
    #[arg(long, default_value_t = false)]
    pub dump_context: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn writes_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}
