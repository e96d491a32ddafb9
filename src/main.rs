//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio::{BuildMode, Site};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Build the blog: posts, reading time, HTML pages and RSS feed", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the static output
    #[command(alias = "b")]
    Build {
        /// Build mode, decides which posts are published
        #[arg(short, long, value_enum, default_value_t = BuildMode::Production)]
        mode: BuildMode,
    },

    /// Build in development mode and serve with live reload
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List posts with reading time and visibility
    List {
        /// Build mode used to decide visibility
        #[arg(short, long, value_enum, default_value_t = BuildMode::Production)]
        mode: BuildMode,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a new post (as a draft unless --publish)
    New {
        /// Title of the new post
        title: String,

        /// Create the post with `draft: false`
        #[arg(long)]
        publish: bool,
    },

    /// Remove the public folder
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = Site::new(&base_dir)?;

    match cli.command {
        Commands::Build { mode } => {
            tracing::info!("Building {} output...", mode);
            let report = site.build(mode)?;
            println!(
                "Built {} post pages and a feed with {} items.",
                report.post_pages, report.feed_items
            );
        }

        Commands::Serve { port, ip, open } => {
            folio::server::start(&site, &ip, port, open).await?;
        }

        Commands::List { mode, json } => {
            folio::commands::list::run(&site, mode, json)?;
        }

        Commands::New { title, publish } => {
            let path = site.new_post(&title, !publish)?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
