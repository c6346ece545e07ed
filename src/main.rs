mod debug_report;

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;

use anyhow::Context as _;
use hurford::{
    AmbiguityPolicy, Domain, Grammar, Options, derive_verbose_with, load_grammars, read_grammars,
    run_batch, write_constructions_csv,
};

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(config) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hurford=info")))
        .with_writer(io::stderr)
        .init();
}

fn run(config: CliConfig) -> anyhow::Result<()> {
    let options = Options { ambiguity: config.ambiguity };

    if config.demo {
        let out = derive_verbose_with(&Grammar::decimal(), &config.domain, &options)?;
        debug_report::print_derivation(&out, config.color);
        return Ok(());
    }

    let mut records = Vec::new();
    let mut read_failures = 0;
    if config.inputs.is_empty() {
        let (parsed, failures) = read_grammars(io::stdin().lock())?;
        records.extend(parsed);
        read_failures += failures.len();
    } else {
        for path in &config.inputs {
            let (parsed, failures) =
                load_grammars(path).with_context(|| format!("reading {}", path.display()))?;
            records.extend(parsed);
            read_failures += failures.len();
        }
    }
    anyhow::ensure!(!records.is_empty(), "no grammar records found in the input");

    if let Some(language) = &config.report {
        let grammar = records
            .iter()
            .map(|(_, grammar)| grammar)
            .find(|grammar| grammar.language == *language)
            .with_context(|| format!("no grammar named {language:?} in the input"))?;
        let out = derive_verbose_with(grammar, &config.domain, &options)
            .with_context(|| format!("deriving {language:?}"))?;
        debug_report::print_derivation(&out, config.color);
    }

    let batch = run_batch(records, &config.domain, &options);
    anyhow::ensure!(!batch.derivations.is_empty(), "every grammar record failed");
    let rows = batch.rows();

    match &config.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_constructions_csv(BufWriter::new(file), &rows)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => write_constructions_csv(io::stdout().lock(), &rows).context("writing to stdout")?,
    }

    tracing::info!(
        languages = batch.derivations.len(),
        rows = rows.len(),
        failed = read_failures + batch.failures.len(),
        "batch complete"
    );
    Ok(())
}

struct CliConfig {
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    domain: Domain,
    ambiguity: AmbiguityPolicy,
    report: Option<String>,
    demo: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut output: Option<PathBuf> = None;
    let mut first = 1i64;
    let mut last = 99i64;
    let mut ambiguity = AmbiguityPolicy::MarkUnresolved;
    let mut report: Option<String> = None;
    let mut demo = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("hurford {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--pick-min" => ambiguity = AmbiguityPolicy::LexicalMin,
            "--demo" => demo = true,
            "--output" | "-o" => {
                let value = args.next().ok_or_else(|| "error: --output expects a path".to_string())?;
                output = Some(PathBuf::from(value));
            }
            "--first" => {
                let value = args.next().ok_or_else(|| "error: --first expects a number".to_string())?;
                first = parse_bound("--first", &value)?;
            }
            "--last" => {
                let value = args.next().ok_or_else(|| "error: --last expects a number".to_string())?;
                last = parse_bound("--last", &value)?;
            }
            "--report" => {
                let value = args.next().ok_or_else(|| "error: --report expects a language name".to_string())?;
                report = Some(value);
            }
            "--" => {
                inputs.extend(args.map(PathBuf::from));
                break;
            }
            _ if arg.starts_with("--output=") => {
                output = Some(PathBuf::from(arg.trim_start_matches("--output=")));
            }
            _ if arg.starts_with("--first=") => {
                first = parse_bound("--first", arg.trim_start_matches("--first="))?;
            }
            _ if arg.starts_with("--last=") => {
                last = parse_bound("--last", arg.trim_start_matches("--last="))?;
            }
            _ if arg.starts_with("--report=") => {
                report = Some(arg.trim_start_matches("--report=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => inputs.push(PathBuf::from(arg)),
        }
    }

    let domain = Domain::new(first, last).map_err(|err| format!("error: {err}"))?;

    if inputs.is_empty() && !demo && io::stdin().is_terminal() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { inputs, output, domain, ambiguity, report, demo, color })
}

fn parse_bound(flag: &str, value: &str) -> Result<i64, String> {
    value.parse::<i64>().map_err(|_| format!("error: invalid {flag} '{value}' (expected an integer)"))
}

fn help_text() -> String {
    format!(
        "hurford {version}

Numeral construction engine CLI: derives the surface expression every
grammar assigns to each number of the target domain.

Usage:
  hurford [OPTIONS] [--] [grammar-files...]

Grammar files are JSON Lines, one grammar record per line. With no files,
records are read from stdin.

Options:
  -o, --output <path>     Write the construction table (CSV) to <path>.
                          Default: stdout.
  --first <n>             First number of the target domain. Default: 1.
  --last <n>              Last number of the target domain. Default: 99.
  --pick-min              Print the lexicographically smallest candidate for
                          ambiguous numbers instead of the AMBIGUOUS marker.
  --report <language>     Print a derivation report for one language from
                          the batch.
  --demo                  Derive the built-in base-ten grammar and print its
                          report.
  --color                 Force ANSI color output.
  --no-color              Disable ANSI color output.
  -h, --help              Show this help message.
  -V, --version           Print version information.

Exit codes:
  0  Success.
  1  Processing error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
