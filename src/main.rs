use std::{process::ExitCode, time::Duration};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use gallery_sync::{
    capture::{self, Attachment},
    config::{self, StoreConfig},
    report, GalleryEngine, GalleryStore, GitHubStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-sync")]
#[command(version, about = "Mirror chat image captures into a JSON gallery kept in a GitHub repository")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Maximum number of images kept; the oldest are evicted first
    #[arg(long, global = true, env = "GALLERY_MAX_IMAGES", default_value_t = config::DEFAULT_MAX_IMAGES)]
    max_images: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StoreArgs {
    /// Bearer token for the contents API
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// Repository holding the gallery, as owner/name
    #[arg(long, global = true, env = "GITHUB_REPO", default_value = "")]
    repo: String,

    /// Path of the gallery document inside the repository
    #[arg(long, global = true, env = "GITHUB_FILE", default_value = config::DEFAULT_PATH)]
    file: String,

    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = config::DEFAULT_API_BASE)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GALLERY_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

impl From<StoreArgs> for StoreConfig {
    fn from(args: StoreArgs) -> Self {
        StoreConfig::new(args.repo, args.token)
            .api_base(args.api_url)
            .path(args.file)
            .timeout(Duration::from_secs(args.timeout_secs))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show how many images the gallery holds and the latest one
    View,

    /// List every image with its number
    List,

    /// Delete the image with the given number (see `list`)
    Delete { number: i64 },

    /// Delete every image
    Clear,

    /// Add an image
    Ingest(IngestArgs),

    /// Read the document strictly, reporting why a read fails
    Check,
}

#[derive(Args)]
struct IngestArgs {
    #[arg(long)]
    url: String,

    #[arg(long)]
    author: String,

    #[arg(long, default_value = "image/png")]
    content_type: String,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = StoreConfig::from(cli.store);
    let pages_url = config.pages_url();

    let store = GitHubStore::new(config)?;

    tracing::info!(repo = %store.config().repo, path = %store.config().path, "gallery");

    let engine = GalleryEngine::new(store, cli.max_images);

    let applied = match cli.command {
        Command::View => {
            let summary = engine.count().await;
            println!("{}", report::summary(&summary, pages_url.as_deref()));
            true
        }

        Command::List => {
            println!("{}", report::list(&engine.list().await));
            true
        }

        Command::Delete { number } => match engine.delete_at(number).await {
            Ok(deletion) => {
                println!("{}", report::deletion(number, &deletion));
                deletion.saved
            }
            Err(err) => {
                println!("{}", report::out_of_range(&err));
                false
            }
        },

        Command::Clear => {
            let cleared = engine.clear().await;
            println!("{}", report::cleared(&cleared));
            cleared.saved
        }

        Command::Ingest(args) => {
            let attachment = Attachment {
                url: args.url,
                content_type: Some(args.content_type),
                width: args.width,
                height: args.height,
            };

            let images = capture::images_from([&attachment], &args.author, Utc::now());

            if images.is_empty() {
                println!("{} not an image: {}", report::FAILED_MARKER, attachment.url);
                false
            } else {
                let saved = engine.ingest(images).await;
                println!("{}", report::ingest_marker(saved));
                saved
            }
        }

        Command::Check => match engine.store().try_fetch().await {
            Ok(snapshot) => {
                let revision = snapshot.revision.map(|x| x.to_string()).unwrap_or_default();
                println!("ok: {} images at revision {revision}", snapshot.images.len());
                true
            }
            Err(err) if err.is_not_found() => {
                println!("ok: document doesn't exist yet");
                true
            }
            Err(err) => {
                println!("{} {err}", report::FAILED_MARKER);
                false
            }
        },
    };

    Ok(if applied {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
