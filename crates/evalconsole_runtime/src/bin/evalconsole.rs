//! Evalconsole CLI entry point.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use evalconsole_foundation::HostRef;
use evalconsole_runtime::serialize::{self, HistorySnapshot};
use evalconsole_runtime::transcript::format_entries;
use evalconsole_runtime::{Console, ConsoleConfig, Repl};
use evalconsole_sandbox::{EnvironmentObject, Registry, ScriptSandbox};
use futures::executor::block_on;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    transcripts: Vec<PathBuf>,
    scripts: Vec<String>,
    injections: Vec<String>,
    config_file: Option<PathBuf>,
    history_file: Option<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with results; RUST_LOG filters them
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--config" => config.config_file = Some(PathBuf::from(value("--config")?)),
            "--script" => config.scripts.push(value("--script")?),
            "--inject" => config.injections.push(value("--inject")?),
            "--history" => config.history_file = Some(PathBuf::from(value("--history")?)),
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            path => config.transcripts.push(PathBuf::from(path)),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args.clone())?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("evalconsole {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = match &cli.config_file {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    config.initial_scripts.extend(cli.scripts.iter().cloned());
    config.initial_injections.extend(cli.injections.iter().cloned());
    if !cli.transcripts.is_empty() {
        let mut transcript = config.transcript.take().unwrap_or_default();
        for path in &cli.transcripts {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            transcript.push_str(&text);
            transcript.push('\n');
        }
        config.transcript = Some(transcript);
    }

    // Startup waits for every script; refuse to start on one that would never load
    for src in config.src.iter().chain(&config.initial_scripts) {
        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        if !path.is_file() {
            return Err(format!("script not found: {src}").into());
        }
    }

    let registry = host_registry(&args);
    let keywords: Vec<String> = registry.names().into_iter().map(String::from).collect();
    let sandbox = ScriptSandbox::new();
    let loader = sandbox.loader();
    let mut console = block_on(Console::start(config, sandbox, loader, registry))?;

    if let Some(path) = cli.history_file.as_ref().filter(|p| p.exists()) {
        let mut entries = serialize::load_from_file(path)?.into_entries();
        entries.extend(console.history().iter().cloned());
        console.restore_history(entries);
    }

    if cli.batch_mode {
        console.run_until_stalled();
        let entries = console.history();
        print!(
            "{}",
            format_entries(entries.iter().map(|e| {
                (
                    e.command.as_str(),
                    Some(e.result.peek().map_or("(pending)", |r| r.result.as_str())),
                )
            }))
        );
    } else {
        let mut repl = Repl::new(console)?.with_keywords(keywords);
        if !cli.transcripts.is_empty() {
            repl = repl.without_banner();
        }
        repl.run()?;
        console = repl.into_console();
    }

    if let Some(path) = &cli.history_file {
        serialize::save_to_file(&HistorySnapshot::capture(console.history()), path)?;
    }
    Ok(())
}

/// Values the host offers to `:inject`.
fn host_registry(args: &[String]) -> Registry {
    Registry::new()
        .with("env", HostRef::new(EnvironmentObject::capture()))
        .with("args", args.to_vec())
        .with("version", env!("CARGO_PKG_VERSION"))
}

fn print_help() {
    println!(
        "\x1b[1mEvalconsole\x1b[0m - Interactive evaluation console

\x1b[1mUSAGE:\x1b[0m
    evalconsole [OPTIONS] [TRANSCRIPTS...]

\x1b[1mARGUMENTS:\x1b[0m
    [TRANSCRIPTS...]   Files of commands to replay after startup

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -b, --batch        Replay transcripts, print the history and exit
    --config FILE      Read a JSON console configuration
    --script SRC       Load a script at startup (repeatable)
    --inject NAME      Bind a host value at startup (repeatable)
    --history FILE     Restore history from FILE and save it on exit

\x1b[1mINJECTABLE NAMES:\x1b[0m
    env                Process environment variables
    args               Command-line arguments
    version            Evalconsole version

\x1b[1mCONSOLE COMMANDS:\x1b[0m
    :clear             Clear the history
    :help              Show help
    :load SRC          Load a script into the sandbox
    :inject a, b       Bind host values into the sandbox
    Ctrl+D             Exit

Set RUST_LOG=evalconsole_runtime=debug to trace evaluation."
    );
}
