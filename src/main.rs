use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use wikiseries::config::{self, LogLevel};
use wikiseries::pipeline::SeriesPipeline;
use wikiseries::resolve::{ConsolePrompter, DisambiguationResolver, ResolveError};
use wikiseries::search::WikipediaSearch;
use wikiseries::ui;

const EXIT_CODES_HELP: &str = "Exit codes:
  0   success
  1   log-config file unreadable or not valid JSON
  2   no search results
  3   non-integer selection
  4   selection out of range
  5   selection failed the match re-check
  6   aborted by operator
  7   prompt timeout
  8   search backend failure
  9   fetch/parse/persist failure
  10  terminal I/O failure while prompting";

/// Wikiseries - resolve a television series on Wikipedia and extract its
/// season/episode structure
#[derive(Parser, Debug)]
#[command(name = "wikiseries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve a television series on Wikipedia and extract its episodes", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// The series name you want to search for
    #[arg(long, short = 'n')]
    name: String,

    /// Provide the log level
    #[arg(long, short = 'L', value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// The location of the logging config json file
    #[arg(long, short = 'l')]
    log_config: Option<PathBuf>,

    /// Wikipedia language edition to query
    #[arg(long, default_value = "en")]
    lang: String,

    /// Maximum number of search candidates
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Directory where parsed series records are written
    #[arg(long, short = 'o', default_value = "./series")]
    output_dir: PathBuf,

    /// Abort manual disambiguation after this many seconds
    #[arg(long, value_name = "SECS")]
    prompt_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An unreadable or malformed log config is fatal before anything else runs.
    let log_config = cli.log_config.as_deref().map(|path| {
        config::load_log_config(path).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        })
    });
    config::init_logging(cli.log_level, log_config.as_ref());

    let client = WikipediaSearch::for_language(&cli.lang)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(ResolveError::from(err).exit_code());
        })
        .max_results(cli.max_results);
    let prompter = ConsolePrompter::new(cli.prompt_timeout.map(Duration::from_secs));
    let resolver = DisambiguationResolver::new(client, prompter);

    let matched = resolver.resolve(&cli.name).await.unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(err.exit_code());
    });

    let color = ui::use_color();
    println!("{}", ui::confirmed_line(matched.title(), color));

    let pipeline = SeriesPipeline::new(&cli.output_dir).unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(err.exit_code());
    });
    let path = pipeline.run(&matched).await.unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(err.exit_code());
    });
    println!("{}", ui::persisted_line(&path.display().to_string(), color));

    Ok(())
}
