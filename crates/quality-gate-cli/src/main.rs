// crates/quality-gate-cli/src/main.rs
// ============================================================================
// Module: Quality Gate CLI Entry Point
// Description: Command dispatcher for the scenario, coverage, and lint gates.
// Purpose: Provide a localized CLI whose exit status blocks merges on failure.
// Dependencies: clap, quality-gate-config, quality-gate-core, quality-gate-providers, thiserror.
// ============================================================================

//! ## Overview
//! `quality-gate` with no subcommand runs the full gate: the scenario catalog
//! checks, then coverage. The process exits zero only when every evaluated
//! phase passed. Reports go to stdout in the selected format; diagnostics and
//! audit events go to stderr. All user-facing strings are routed through the
//! i18n catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use quality_gate_cli::render::RenderError;
use quality_gate_cli::render::ReportFormat;
use quality_gate_cli::render::render_catalog_summary;
use quality_gate_cli::render::render_check_outcomes;
use quality_gate_cli::render::render_gate_report;
use quality_gate_cli::t;
use quality_gate_config::GateConfig;
use quality_gate_core::CoverageProbe;
use quality_gate_core::FileAuditSink;
use quality_gate_core::GateAuditSink;
use quality_gate_core::GateOrchestrator;
use quality_gate_core::NoopAuditSink;
use quality_gate_core::ScenarioCatalog;
use quality_gate_core::StderrAuditSink;
use quality_gate_providers::LlvmCovProbe;
use quality_gate_providers::RegexDefinitionSearch;
use quality_gate_providers::ReportFileCoverageProbe;
use quality_gate_providers::run_checks;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "quality-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to `QUALITY_GATE_CONFIG`, then quality-gate.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Report output format.
    #[arg(
        long,
        value_enum,
        value_name = "FORMAT",
        global = true,
        default_value_t = FormatArg::Text
    )]
    format: FormatArg,
    /// Selected subcommand; the full gate runs when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scenario gate and then the coverage gate.
    Gate,
    /// Run only the scenario gate (counts, duplicate ids, test references).
    Check,
    /// Print the scenario catalog composition.
    Summary,
    /// Run the configured external format and lint checks.
    Lint,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the effective configuration.
    Validate,
    /// Print the effective configuration as TOML.
    Show,
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Plain text.
    Text,
    /// Markdown.
    Markdown,
    /// Canonical JSON.
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Which part of the gate to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GateScope {
    /// Scenario gate followed by coverage.
    Full,
    /// Scenario gate only.
    ScenariosOnly,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let config_path = cli.config.as_deref();
    let format = ReportFormat::from(cli.format);
    match cli.command.unwrap_or(Commands::Gate) {
        Commands::Gate => command_gate(config_path, format, GateScope::Full),
        Commands::Check => command_gate(config_path, format, GateScope::ScenariosOnly),
        Commands::Summary => command_summary(config_path, format),
        Commands::Lint => command_lint(config_path, format),
        Commands::Config {
            command,
        } => command_config(command, config_path),
    }
}

// ============================================================================
// SECTION: Gate Commands
// ============================================================================

/// Runs the gate and prints its report.
fn command_gate(
    config_path: Option<&Path>,
    format: ReportFormat,
    scope: GateScope,
) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let search = RegexDefinitionSearch::new(config.search_config());
    let orchestrator = GateOrchestrator::new(
        config.orchestrator_config(),
        search,
        coverage_probe(&config),
        audit_sink(&config)?,
    );
    let report = match scope {
        GateScope::Full => orchestrator.run(),
        GateScope::ScenariosOnly => orchestrator.run_scenario_gate(),
    };

    let output = render_gate_report(&report, format).map_err(render_error)?;
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if report.passed() {
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(&t!("gate.failed", count = report.failures.len()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::FAILURE)
}

/// Selects the coverage probe: a pre-computed report when configured.
fn coverage_probe(config: &GateConfig) -> Box<dyn CoverageProbe> {
    match &config.coverage.report_path {
        Some(path) => Box::new(ReportFileCoverageProbe::new(path.clone())),
        None => Box::new(LlvmCovProbe::new(config.llvm_cov_config())),
    }
}

/// Selects the audit sink from the `[audit]` settings.
fn audit_sink(config: &GateConfig) -> CliResult<Box<dyn GateAuditSink>> {
    if !config.audit.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    let Some(path) = &config.audit.path else {
        return Ok(Box::new(StderrAuditSink));
    };
    let sink = FileAuditSink::new(path).map_err(|err| {
        CliError::new(t!("audit.open_failed", path = path.display(), error = err))
    })?;
    Ok(Box::new(sink))
}

/// Prints the catalog composition.
fn command_summary(config_path: Option<&Path>, format: ReportFormat) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let catalog = ScenarioCatalog::load(&config.catalog.path, config.catalog.delimiter)
        .map_err(|err| CliError::new(t!("summary.load_failed", error = err)))?;
    let output = render_catalog_summary(&config.catalog.path, &catalog.summary(), format)
        .map_err(render_error)?;
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Runs every configured external check and prints the outcomes.
fn command_lint(config_path: Option<&Path>, format: ReportFormat) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let outcomes = run_checks(&config.checks);
    let output = render_check_outcomes(&outcomes, format).map_err(render_error)?;
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
    if failed == 0 {
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(&t!("lint.failed", count = failed))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::FAILURE)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => command_config_validate(config_path),
        ConfigCommand::Show => command_config_show(config_path),
    }
}

/// Loads and validates the configuration.
fn command_config_validate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    load_config(config_path)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the effective configuration.
fn command_config_show(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let rendered = config
        .to_toml_string()
        .map_err(|err| CliError::new(t!("config.show.failed", error = err)))?;
    write_stdout_bytes(rendered.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration from the flag, environment, or defaults.
fn load_config(config_path: Option<&Path>) -> CliResult<GateConfig> {
    GateConfig::load(config_path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Formats a localized rendering error.
fn render_error(error: RenderError) -> CliError {
    CliError::new(t!("output.render_failed", error = error))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
