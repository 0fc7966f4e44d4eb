//! cxg CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use cxg_engine::EngineConfig;
use cxg_runtime::{Repl, Session, conllu, format_report, format_results};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    grammars: Vec<PathBuf>,
    snapshot: Option<PathBuf>,
    save_snapshot: Option<PathBuf>,
    conllu: Option<PathBuf>,
    step_budget: Option<usize>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("CXG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
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
            "--grammar" => config.grammars.push(PathBuf::from(value("--grammar")?)),
            "--snapshot" => config.snapshot = Some(PathBuf::from(value("--snapshot")?)),
            "--save-snapshot" => {
                config.save_snapshot = Some(PathBuf::from(value("--save-snapshot")?));
            }
            "--conllu" => config.conllu = Some(PathBuf::from(value("--conllu")?)),
            "--budget" => {
                let raw = value("--budget")?;
                let budget = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("invalid --budget value: {raw}"))?;
                config.step_budget = Some(budget);
            }
            other => return Err(format!("unknown option: {other}").into()),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("cxg {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut engine_config = EngineConfig::default();
    if let Some(budget) = config.step_budget {
        engine_config = engine_config.with_step_budget(budget);
    }
    let mut session = Session::new(engine_config);

    if let Some(path) = &config.snapshot {
        session.load_snapshot(path)?;
    }
    for path in &config.grammars {
        let report = session.import_file(path, true)?;
        eprintln!("{}: {}", path.display(), format_report(&report));
    }
    if let Some(path) = &config.save_snapshot {
        session.save_snapshot(path)?;
    }

    if let Some(path) = &config.conllu {
        for (i, sentence) in conllu::read_file(path)?.iter().enumerate() {
            let results = session.annotate(sentence)?;
            println!("# sentence {}", i + 1);
            println!("{}", format_results(sentence, &results));
        }
        return Ok(());
    }

    if config.batch_mode {
        return Ok(());
    }

    let mut repl = Repl::new()?.with_session(session);
    if !config.grammars.is_empty() || config.snapshot.is_some() {
        repl = repl.without_banner();
    }
    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mcxg\x1b[0m - Construction-grammar pattern engine

\x1b[1mUSAGE:\x1b[0m
    cxg [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    --grammar FILE        Import constructions from a JSON file (repeatable)
    --snapshot FILE       Load a MessagePack grammar snapshot first
    --save-snapshot FILE  Write the loaded grammar as a snapshot
    --conllu FILE         Annotate every sentence of a CoNLL-U file and exit
    --budget N            Step budget per match attempt
    -b, --batch           Load and exit without starting the REPL
    -h, --help            Print help information
    -V, --version         Print version information

\x1b[1mENVIRONMENT:\x1b[0m
    CXG_LOG               Log filter (default: warn), e.g. CXG_LOG=cxg_engine=debug

\x1b[1mEXAMPLES:\x1b[0m
    cxg --grammar pt.json                 Start the REPL with a grammar
    cxg --grammar pt.json --conllu in.conllu
    cxg --grammar pt.json --save-snapshot pt.msgpack -b"
    );
}
