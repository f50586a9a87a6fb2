use ad_risk_audit::commands::{self, analyze::AnalyzeOutputs, users::TableOptions, InputSource};
use ad_risk_audit::report::query::DEFAULT_PAGE_SIZE;
use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ad-risk")]
#[command(about = "Active Directory user risk analysis tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Input shared by every analysis command.
#[derive(Args)]
struct InputArgs {
    /// Directory export CSV (plain, .gz or .zst)
    #[arg(required_unless_present = "sample")]
    file: Option<String>,

    /// Use the built-in demo dataset instead of a file
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// JSON file overriding scoring rules and thresholds
    #[arg(long)]
    rules: Option<String>,
}

impl InputArgs {
    fn source(&self) -> InputSource<'_> {
        InputSource {
            file: self.file.as_deref(),
            sample: self.sample,
            rules: self.rules.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score every account and print the risk overview
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Export the scored report CSV (default name: adhuntx_report_<date>.csv;
        /// give a path as --export=PATH)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
        export: Option<String>,

        /// Write summary and scored users as JSON
        #[arg(long)]
        json: Option<String>,

        /// Cache the first 100 scored users as JSON
        #[arg(long)]
        cache: Option<String>,

        /// Number of highest-risk accounts to list
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Filtered, sorted and paged user table
    Users {
        #[command(flatten)]
        input: InputArgs,

        /// Risk tier to show (critical, high, medium, low, all)
        #[arg(long)]
        risk_level: Option<String>,

        /// Case-insensitive search over name, SAM account name and department
        #[arg(long)]
        search: Option<String>,

        /// Sort column (name, department, score)
        #[arg(long, default_value = "score")]
        sort: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Detailed risk profile for one account
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// User id (user-N) or SamAccountName
        #[arg(long)]
        user: String,
    },

    /// Write a blank CSV template with the recognized input columns
    Template {
        /// Output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print or write the built-in demo export
    Sample {
        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate shell completion scripts
    ///
    /// Output the completion script to stdout. To install:
    ///
    /// Bash (Linux):
    ///   ad-risk generate-completion bash > ~/.local/share/bash-completion/completions/ad-risk
    ///
    /// Zsh:
    ///   ad-risk generate-completion zsh > ~/.zfunc/_ad-risk
    ///
    /// Fish:
    ///   ad-risk generate-completion fish > ~/.config/fish/completions/ad-risk.fish
    #[command(verbatim_doc_comment)]
    GenerateCompletion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Log filter from `RUST_LOG` when set and valid, else `--verbose` picks the level.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(if verbose { "debug" } else { "warn" });
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            export,
            json,
            cache,
            top,
        } => commands::analyze::run(
            &input.source(),
            &AnalyzeOutputs {
                export: export.as_deref(),
                json: json.as_deref(),
                cache: cache.as_deref(),
            },
            top,
        ),
        Commands::Users {
            input,
            risk_level,
            search,
            sort,
            asc,
            page,
            page_size,
        } => commands::users::run(
            &input.source(),
            &TableOptions {
                risk_level: risk_level.as_deref(),
                search: search.as_deref(),
                sort: &sort,
                ascending: asc,
                page,
                page_size,
            },
        ),
        Commands::Show { input, user } => commands::show::run(&input.source(), &user),
        Commands::Template { output } => commands::template::run(output.as_deref()),
        Commands::Sample { output } => commands::sample::run(output.as_deref()),
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ad-risk", &mut std::io::stdout());
            Ok(())
        }
    }
}
