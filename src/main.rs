use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use worksheet_toc::{config, generate, lister, output, rules, toc};

#[derive(Parser)]
#[command(name = "worksheet-toc")]
#[command(about = "Table of contents and page rules for Hebrew A4 worksheets")]
#[command(long_about = "\
Table of contents and page rules for Hebrew A4 worksheets

Every page declares its own place in the worksheet:

  worksheet/
  ├── preview.toml                 # Optional config (run 'gen-config')
  ├── styles/
  │   ├── a4-base.css              # Linked by every page
  │   └── pages/עמוד-1.css         # One stylesheet per page
  ├── עמוד-1.html                  # A4 page: nav-meta \"חוקיות — עמוד 1 / 2\"
  ├── עמוד-2.html
  ├── rules.html                   # Other documents land under \"אחר\"
  └── preview/index.html           # Reader page written by 'generate'

Topic order comes from the longest topic bar (.preview-nav-topics) any page
carries; pages inside a topic are ordered by their declared index.

Set RUST_LOG=debug for detailed logs on stderr.")]
#[command(version)]
struct Cli {
    /// Worksheet root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document list as JSON
    Files,
    /// Build and print the table of contents
    Toc {
        /// Print JSON instead of the text outline
        #[arg(long)]
        json: bool,
    },
    /// Check page structure and reading order (exit status 1 on violations)
    Check,
    /// Write the static reader page
    Generate {
        /// Reader file, relative to the root (default: reader.output from config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock preview.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Files => {
            let config = config::load_config(&cli.root)?;
            let files = lister::list_documents(&cli.root, &config.document_listing())?;
            let json = serde_json::to_string_pretty(&serde_json::json!({ "files": files }))?;
            println!("{}", json);
        }
        Command::Toc { json } => {
            let config = config::load_config(&cli.root)?;
            let toc = toc::build_from_root(&cli.root, &config.document_listing())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&toc)?);
            } else {
                output::print_toc_output(&toc);
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            let report = rules::check(&cli.root, &config)?;
            output::print_check_output(&report);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Generate { output: target } => {
            let config = config::load_config(&cli.root)?;
            let target = target.unwrap_or_else(|| PathBuf::from(&config.reader.output));
            let toc = generate::generate(&cli.root, &target, &config)?;
            output::print_generate_output(&toc, &target);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
