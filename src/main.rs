//! Sponsorscout - hackathon sponsor discovery and outreach
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sponsorscout::cli::mail_merge::default_contacts_path;
use sponsorscout::cli::pipeline::{run_advance, run_send};
use sponsorscout::pipeline::Stage;
use sponsorscout::{Config, MailMerge, Repl};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sponsorscout - find, vet and contact hackathon sponsors
#[derive(Parser, Debug)]
#[command(name = "sponsorscout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use one model for the agent, evaluator and writer
    #[arg(long, short = 'm', global = true)]
    model: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive sponsor discovery (default)
    Find,

    /// Draft personalized emails from an enriched contacts CSV
    MailMerge {
        /// Contacts CSV (defaults to <searches>/people/people_enriched.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Email template file
        #[arg(long)]
        template: PathBuf,

        /// Output CSV (defaults to ./mail_merge_<timestamp>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Mail every flagged row of a stage through a Mailgun template
    Send {
        /// Stage tab: outreach or negotiation
        #[arg(long)]
        stage: Stage,

        /// Mailgun template name
        #[arg(long)]
        template: Option<String>,
    },

    /// Move rows that reached the next stage into its tab
    Advance {
        /// Stage tab to move rows out of
        #[arg(long)]
        from: Stage,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.set_model(model.clone());
    }

    if args.debug {
        config.agent.debug = true;
        config.logging.level = "debug".to_string();
    }

    init_logging(&config);
    debug!(command = ?args.command, "Starting sponsorscout");

    match args.command.unwrap_or(Command::Find) {
        Command::Find => {
            let mut repl = Repl::with_config(config)?;
            repl.run().await?;
        }
        Command::MailMerge {
            csv,
            template,
            output,
        } => {
            let csv = csv.unwrap_or_else(|| default_contacts_path(&config));
            let flow = MailMerge::with_config(&config)?;
            flow.run(&csv, &template, output).await?;
        }
        Command::Send { stage, template } => {
            run_send(&config, stage, template).await?;
        }
        Command::Advance { from } => {
            run_advance(&config, from).await?;
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter = if config.agent.debug {
        EnvFilter::new(&config.logging.level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
