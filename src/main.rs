//! CLI entry point for blog-pipeline

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_pipeline::commands;

#[derive(Parser)]
#[command(name = "blog-pipeline")]
#[command(version)]
#[command(about = "Parse, render and validate markdown blog posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Blog data tree, relative to the base directory
    #[arg(long, global = true, default_value = "blog-data")]
    data_dir: PathBuf,

    /// Cache directory, relative to the base directory
    #[arg(long, global = true, default_value = ".blog-cache")]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a post file and print it as JSON
    #[command(alias = "p")]
    Parse {
        /// Markdown file with front-matter
        file: PathBuf,

        /// Folder used to resolve ./assets/ images (defaults to the file's grandparent)
        #[arg(short, long)]
        folder: Option<String>,

        /// Post id used to resolve ./assets/ images (defaults to the file's parent)
        #[arg(short, long)]
        post_id: Option<String>,

        /// Print only the heading outline
        #[arg(long)]
        headings: bool,
    },

    /// Show a post from the data tree
    Show {
        /// Folder holding the post, e.g. blogs-2024
        folder: String,

        /// Post directory, e.g. post-01
        post_id: String,
    },

    /// List blog information
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Check post front-matter against the authoring rules
    Validate {
        /// Directory to validate (defaults to the data directory)
        dir: Option<PathBuf>,
    },

    /// Clear the cache
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_pipeline=debug,info"
    } else {
        "blog_pipeline=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = cli
        .cwd
        .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current directory"));

    let blog = blog_pipeline::Blog::with_dirs(&base_dir, &cli.data_dir, &cli.cache_dir)?;

    match cli.command {
        Commands::Parse {
            file,
            folder,
            post_id,
            headings,
        } => {
            let (inferred_folder, inferred_id) = commands::parse::infer_location(&file);
            let folder = folder.unwrap_or(inferred_folder);
            let post_id = post_id.unwrap_or(inferred_id);
            let file = base_dir.join(file);

            let json = commands::parse::run(&blog, &file, &folder, &post_id, headings)?;
            println!("{}", json);
        }

        Commands::Show { folder, post_id } => {
            let out = commands::show::run(&blog, &folder, &post_id)?;
            print!("{}", out);
        }

        Commands::List { r#type } => {
            let out = commands::list::run(&blog, &r#type)?;
            print!("{}", out);
        }

        Commands::Validate { dir } => {
            let dir = dir.map(|d| base_dir.join(d)).unwrap_or_else(|| blog.data_dir.clone());
            let (reports, ok) = commands::validate::run(&dir)?;
            print!("{}", commands::validate::format_reports(&reports));
            if !ok {
                anyhow::bail!("Validation failed");
            }
        }

        Commands::Clean => {
            tracing::info!("Cleaning cache...");
            let removed = blog.clean()?;
            println!("Cleaned {} cache entries", removed);
        }
    }

    Ok(())
}
