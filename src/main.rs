use clap::{Parser as ClapParser, Subcommand};
use spider_conformance::cli::{self, CliError, HarnessPaths, RunOptions};
use spider_conformance::report::render_report;
use spider_conformance::run::{RunConfig, DEFAULT_LIMIT};
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

#[derive(ClapParser)]
#[command(name = "spider-conformance")]
#[command(about = "Test a SQL parser against the Spider corpus and classify its failures")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the corpus through the parser
    Run {
        /// Number of queries to test
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Categorize failures
        #[arg(long)]
        categorize: bool,

        /// Show failed queries
        #[arg(short, long)]
        verbose: bool,

        /// Project root holding the corpus and the parser build
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Corpus file (defaults to the Spider training set under the root)
        #[arg(long, env = "SPIDER_CORPUS")]
        corpus: Option<PathBuf>,

        /// Parser binary (defaults to the lake build output under the root)
        #[arg(long, env = "SQL_ORACLE")]
        oracle: Option<PathBuf>,

        /// Give up on a parser process after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Classify one query (reads stdin if not provided)
    Classify {
        /// The SQL query to classify
        query: Option<String>,
    },

    /// List failure categories in evaluation order
    Categories,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::init_logging(&cli.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Run {
            limit,
            categorize,
            verbose,
            root,
            corpus,
            oracle,
            timeout_secs,
        } => {
            let defaults = HarnessPaths::under(&root);
            let options = RunOptions {
                paths: HarnessPaths {
                    corpus: corpus.unwrap_or(defaults.corpus),
                    oracle: oracle.unwrap_or(defaults.oracle),
                },
                config: RunConfig {
                    limit,
                    categorize,
                    verbose,
                },
                timeout: timeout_secs.map(Duration::from_secs),
            };
            run(&options)
        }
        Commands::Classify { query } => run_classify(query),
        Commands::Categories => {
            print!("{}", cli::get_categories_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(options: &RunOptions) -> Result<(), CliError> {
    let summary = cli::execute_run(options, |line| println!("{}", line))?;
    print!("{}", render_report(&summary, &options.config));
    Ok(())
}

fn run_classify(query: Option<String>) -> Result<(), CliError> {
    let query = match query {
        Some(q) => Some(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let category = cli::classify_input(query.as_deref())?;
    println!("{}", category);
    Ok(())
}
