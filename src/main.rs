use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sqlinsertfmt::mode::Mode;
use sqlinsertfmt::report::{FileStatus, Report};
use sqlinsertfmt::Config;

/// sqlinsertfmt - rewrites single-row SQL INSERT statements into canonical form.
#[derive(Parser, Debug)]
#[command(name = "sqlinsertfmt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format a single .sql file in place. Use "-" to read from stdin.
    Fix {
        path: PathBuf,
        #[command(flatten)]
        opts: FixOpts,
    },
    /// Format every .sql file under a directory in place.
    FixDir {
        dir: PathBuf,
        #[command(flatten)]
        opts: FixOpts,
    },
    /// Produce review comments for the change-set in the config file.
    Review {
        /// Path to the JSON (or TOML) config file.
        #[arg(long)]
        config: PathBuf,

        /// Write the comments here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FixOpts {
    /// Path to the JSON (or TOML) config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,
}

impl FixOpts {
    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => sqlinsertfmt::load_config(path)
                .with_context(|| format!("loading {}", path.display())),
            None => Ok(Config::default()),
        }
    }

    fn mode(&self, cli: &Cli) -> Mode {
        Mode {
            check: self.check,
            diff: self.diff,
            verbose: cli.verbose,
            quiet: cli.quiet,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_mode = Mode {
        verbose: cli.verbose,
        quiet: cli.quiet,
        ..Mode::default()
    };
    init_tracing(&log_mode);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(mode: &Mode) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(mode.log_level()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Command::Fix { path, opts } => {
            if path.to_string_lossy() == "-" {
                return fix_stdin();
            }
            let mode = opts.mode(cli);
            let config = opts.load_config()?;
            let result = sqlinsertfmt::fix_file(path, config.ignore_rules(), &mode)?;
            let mut report = Report::new();
            report.add(result);
            Ok(finish(&report, &mode))
        }
        Command::FixDir { dir, opts } => {
            let mode = opts.mode(cli);
            let config = opts.load_config()?;
            let report = sqlinsertfmt::fix_dir(dir, config.ignore_rules(), &mode)
                .with_context(|| format!("formatting {}", dir.display()))?;
            Ok(finish(&report, &mode))
        }
        Command::Review { config, output } => {
            let loaded = sqlinsertfmt::load_config(config)
                .with_context(|| format!("loading {}", config.display()))?;
            let comments = sqlinsertfmt::review(&loaded)?;
            let json = serde_json::to_string_pretty(&comments)?;
            match output {
                Some(path) => std::fs::write(path, json + "\n")
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
            if !cli.quiet {
                eprintln!("{} comment(s) produced", comments.len());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn fix_stdin() -> anyhow::Result<ExitCode> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("reading stdin")?;
    print!("{}", sqlinsertfmt::format_string(&source));
    Ok(ExitCode::SUCCESS)
}

fn finish(report: &Report, mode: &Mode) -> ExitCode {
    if !mode.quiet {
        print_verbose_results(report, mode);
        eprintln!("{}", report.summary());
    }

    if mode.check && report.has_changes() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_verbose_results(report: &Report, mode: &Mode) {
    if !mode.verbose {
        return;
    }
    for result in &report.results {
        match result.status {
            FileStatus::Changed => eprintln!("reformatted {}", result.path.display()),
            FileStatus::Ignored => eprintln!("ignored {}", result.path.display()),
            FileStatus::Unchanged => {}
        }
    }
}
