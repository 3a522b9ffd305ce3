// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use std::fs::File;
use std::io::Write;
use std::ops::Deref;
use std::panic;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crash_classifier::{
    load_processed_crash, load_raw_crash, ClassifierRuleSet, ProcessingContext, RawCrash,
    RawDumps, RuleOutcome, FIREFOX_PRODUCT_NAME,
};
use log::error;
use simplelog::{
    ColorChoice, ConfigBuilder, Level, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

/// Apply the support classification rules to a processed crash and print the result as JSON.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// The raw crash (as submitted) JSON file.
    ///
    /// Provides the ProductName and Version fields. If unspecified, an empty raw crash is used,
    /// which means the out-of-date classifier never applies.
    #[arg(long)]
    raw_crash: Option<PathBuf>,

    /// An uploaded dump, as NAME=PATH. May be repeated.
    #[arg(long = "raw-dump", value_parser = parse_raw_dump)]
    raw_dumps: Vec<(String, PathBuf)>,

    /// The latest Firefox version; crashes from older versions are classified as out of date.
    #[arg(long)]
    firefox_out_of_date_version: Option<String>,

    /// Where to write the output to (if unspecified, stdout is used)
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Where to write logs to (if unspecified, stderr is used)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Set the logging level.
    #[arg(long, value_enum, default_value_t = Verbosity::Error)]
    verbose: Verbosity,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Also print each rule's outcome to the log at info level.
    #[arg(long)]
    summary: bool,

    /// The processed crash JSON file to classify.
    processed_crash: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> LevelFilter {
        match verbosity {
            Verbosity::Off => LevelFilter::Off,
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

fn parse_raw_dump(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got {arg:?}")),
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let verbosity = LevelFilter::from(args.verbose);

    // Init the logger (and make trace logging less noisy)
    if let Some(log_path) = &args.log_file {
        let log_file = File::create(log_path)
            .with_context(|| format!("couldn't create log file {}", log_path.display()))?;
        let _ = WriteLogger::init(
            verbosity,
            ConfigBuilder::new()
                .set_location_level(LevelFilter::Off)
                .set_time_level(LevelFilter::Off)
                .set_thread_level(LevelFilter::Off)
                .set_target_level(LevelFilter::Off)
                .build(),
            log_file,
        );
    } else {
        let _ = TermLogger::init(
            verbosity,
            ConfigBuilder::new()
                .set_location_level(LevelFilter::Off)
                .set_time_level(LevelFilter::Off)
                .set_thread_level(LevelFilter::Off)
                .set_target_level(LevelFilter::Off)
                .set_level_color(Level::Trace, None)
                .build(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }

    // Set a panic hook to redirect to the logger
    panic::set_hook(Box::new(|panic_info| {
        let (filename, line) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line()))
            .unwrap_or(("<unknown>", 0));
        let cause = panic_info
            .payload()
            .downcast_ref::<String>()
            .map(String::deref)
            .unwrap_or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<&str>()
                    .copied()
                    .unwrap_or("<cause unknown>")
            });
        error!(
            "A panic occurred at {}:{}: {}",
            filename, line, cause
        );
    }));

    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut context = ProcessingContext::new();
    if let Some(version) = &args.firefox_out_of_date_version {
        context = context.with_out_of_date_version(FIREFOX_PRODUCT_NAME, version)?;
    }

    let raw_crash = match &args.raw_crash {
        Some(path) => load_raw_crash(path)
            .with_context(|| format!("couldn't load raw crash {}", path.display()))?,
        None => RawCrash::default(),
    };
    let raw_dumps: RawDumps = args.raw_dumps.into_iter().collect();
    let mut processed_crash = load_processed_crash(&args.processed_crash).with_context(|| {
        format!(
            "couldn't load processed crash {}",
            args.processed_crash.display()
        )
    })?;

    let rules = ClassifierRuleSet::default_rules();
    let outcomes = rules.classify(&raw_crash, &raw_dumps, &mut processed_crash, &context);
    if args.summary {
        for (name, outcome) in &outcomes {
            log::info!("{name}: {outcome:?}");
        }
    }
    if !outcomes
        .iter()
        .any(|(_, outcome)| *outcome == RuleOutcome::Classified)
    {
        log::info!("no support classification applies");
    }

    let mut stdout;
    let mut output_f;
    let output: &mut dyn Write = if let Some(output_path) = &args.output_file {
        output_f = File::create(output_path)
            .with_context(|| format!("couldn't create output file {}", output_path.display()))?;
        &mut output_f
    } else {
        stdout = std::io::stdout();
        &mut stdout
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut *output, &processed_crash)?;
    } else {
        serde_json::to_writer(&mut *output, &processed_crash)?;
    }
    writeln!(output)?;
    Ok(())
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::parse();

    if let Err(err) = init_logging(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
