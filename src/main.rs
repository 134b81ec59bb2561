//! CLI entry point for headless-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use headless_blog::source::MemorySource;
use headless_blog::Blog;

#[derive(Parser)]
#[command(name = "headless-blog")]
#[command(version)]
#[command(about = "A server-rendered blog front-end backed by a headless content API", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Serve posts from a JSON fixture instead of the content API
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a _config.yml and static assets
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Start the server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts
    List {
        /// Follow pagination to the last page
        #[arg(short, long)]
        all: bool,
    },

    /// Show a post with its reading time
    Show {
        /// Key (slug) of the post
        slug: String,
    },

    /// Print the detail page paths of the first page
    Paths,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "headless_blog=debug,info"
    } else {
        "headless_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            headless_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Server { port, ip } => {
            let blog = open_blog(&base_dir, cli.fixture.as_deref())?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            headless_blog::server::start(blog, &ip, port).await?;
        }

        Commands::List { all } => {
            let blog = open_blog(&base_dir, cli.fixture.as_deref())?;
            headless_blog::commands::list::run(&blog, all).await?;
        }

        Commands::Show { slug } => {
            let blog = open_blog(&base_dir, cli.fixture.as_deref())?;
            headless_blog::commands::show::run(&blog, &slug).await?;
        }

        Commands::Paths => {
            let blog = open_blog(&base_dir, cli.fixture.as_deref())?;
            headless_blog::commands::paths::run(&blog).await?;
        }

        Commands::Version => {
            println!("headless-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Build the blog with either the fixture source or the configured API
fn open_blog(base_dir: &Path, fixture: Option<&Path>) -> Result<Blog> {
    match fixture {
        Some(path) => {
            let config = Blog::load_config(base_dir)?;
            let source = MemorySource::from_file(path)?;
            tracing::info!("Serving posts from fixture {:?}", path);
            Blog::with_source(config, base_dir, Arc::new(source))
        }
        None => Blog::new(base_dir),
    }
}
