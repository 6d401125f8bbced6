use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seqbuild_build::{BuildConfig, BuildContext, BuildOutcome, BuildRunner};
use seqbuild_log::{ErrorExtractor, ErrorRecord};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod watch;

#[derive(Parser)]
#[command(name = "seqbuild")]
#[command(about = "Run seqc and collect its errors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured build once
    Run {
        /// Path to a .seqbuild.json (defaults to searching upwards from the current directory)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Active file substituted for {FILE_ACTIVE}
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Print the build outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract errors from captured build output and emit JSON
    Parse {
        /// File with captured output; reads stdin when omitted or `-`
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
    /// Print the effective build configuration
    Config {
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Rebuild whenever a source file changes
    Watch {
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// File extensions that trigger a rebuild
        #[arg(short, long = "ext", value_name = "EXT", default_values_t = [String::from("seq")])]
        extensions: Vec<String>,
        /// Directory to watch
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

/// Loads the explicit config, or discovers one from `start`.
///
/// Returns the config together with the project directory used for
/// `{PROJECT_PATH}`.
fn resolve_config(explicit: Option<&Path>, start: &Path) -> Result<(BuildConfig, PathBuf)> {
    let (config, path) = match explicit {
        Some(path) => (BuildConfig::load(path)?, Some(path.to_path_buf())),
        None => BuildConfig::discover(start)?,
    };

    let project = path
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf());

    Ok((config, project))
}

fn runner_for(config: BuildConfig, project: PathBuf, file: Option<PathBuf>) -> BuildRunner {
    let mut context = BuildContext::new(project.clone());
    if let Some(file) = file {
        context = context.with_active_file(file);
    }
    BuildRunner::new(config)
        .with_context(context)
        .with_working_dir(project)
}

/// Jump list and summary printed after the captured output.
fn render_summary(outcome: &BuildOutcome) -> String {
    let mut summary = String::new();

    if !outcome.errors.is_empty() {
        summary.push('\n');
        for record in &outcome.errors {
            summary.push_str(&format!("  --> {}\n", location(record)));
        }
    }

    let status = if outcome.success { "succeeded" } else { "failed" };
    summary.push_str(&format!(
        "build {} with {} error(s){}\n",
        status,
        outcome.errors.len(),
        outcome
            .exit_code
            .map(|c| format!(" (exit code {c})"))
            .unwrap_or_default()
    ));
    summary
}

fn print_outcome(outcome: &BuildOutcome) {
    print!("{}", outcome.output);
    if !outcome.output.is_empty() && !outcome.output.ends_with('\n') {
        println!();
    }
    eprint!("{}", render_summary(outcome));
}

fn location(record: &ErrorRecord) -> String {
    match record.position() {
        Some(pos) => format!("{}:{}:{}", record.file, pos.line, pos.column),
        None => record.file.clone(),
    }
}

fn read_records(path: Option<&Path>) -> Result<Vec<ErrorRecord>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(ErrorExtractor::new().parse(&content))
        }
        _ => {
            let mut extractor = ErrorExtractor::new();
            let mut records = Vec::new();
            let mut stdin = io::stdin().lock();
            let mut line = String::new();
            while stdin.read_line(&mut line).context("Failed to read stdin")? > 0 {
                records.extend(extractor.update(&line));
                line.clear();
            }
            records.extend(extractor.finish());
            Ok(records)
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Run { config, file, json } => {
            let (config, project) = resolve_config(config.as_deref(), &cwd)?;
            let outcome = runner_for(config, project, file).execute()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }

            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Parse { path } => {
            let records = read_records(path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Config { config } => {
            let (config, _) = resolve_config(config.as_deref(), &cwd)?;
            println!("{}", config.to_json()?);
        }
        Commands::Watch {
            config,
            extensions,
            dir,
        } => {
            let dir = dir.unwrap_or_else(|| cwd.clone());
            let (config, project) = resolve_config(config.as_deref(), &dir)?;
            watch::run(&dir, &extensions, |file| {
                let outcome = runner_for(config.clone(), project.clone(), Some(file)).execute()?;
                print_outcome(&outcome);
                Ok(())
            })?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
