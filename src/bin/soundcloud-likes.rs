use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use soundcloud_likes::{
    ClientOptions, ExportOptions, LikesError, LikesExporter, SchemaValidator, SoundCloudApi,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soundcloud-likes")]
#[command(about = "Export a SoundCloud user's likes to JSON", long_about = None)]
struct Cli {
    /// Profile permalink of the user whose likes are exported
    #[arg(short, long, env = "SOUNDCLOUD_USERNAME")]
    username: Option<String>,

    /// Output file
    #[arg(short, long, env = "SOUNDCLOUD_OUTPUT", default_value = "likes.json")]
    output: PathBuf,

    /// API client id (scraped from the website when omitted)
    #[arg(long, env = "SOUNDCLOUD_CLIENT_ID")]
    client_id: Option<String>,

    /// Numeric user id (resolved from the profile page when omitted)
    #[arg(long)]
    user_id: Option<String>,

    /// Playlists enriched concurrently
    #[arg(long, default_value_t = soundcloud_likes::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Likes requested per page
    #[arg(long, default_value_t = soundcloud_likes::DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// JSON API base URL
    #[arg(long, env = "SOUNDCLOUD_API_BASE", default_value = soundcloud_likes::api::client::API_BASE_URL)]
    api_base: String,

    /// Website base URL
    #[arg(long, env = "SOUNDCLOUD_WEB_BASE", default_value = soundcloud_likes::api::client::WEB_BASE_URL)]
    web_base: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export likes to the output file (default)
    Export,
    /// Search users, to find the permalink to export
    FindUser {
        /// Search query
        query: String,

        /// Limit results
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("soundcloud_likes={level},hyper=warn,reqwest=warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), LikesError> {
    let validator = Arc::new(SchemaValidator::new()?);
    let options = ClientOptions {
        api_base: cli.api_base.trim_end_matches('/').to_string(),
        web_base: cli.web_base.trim_end_matches('/').to_string(),
        ..Default::default()
    };
    let api = SoundCloudApi::new(options, validator)?;

    let exporter = LikesExporter::new(
        api,
        ExportOptions {
            page_size: cli.page_size,
            concurrency: cli.concurrency,
            client_id: cli.client_id,
            user_id: cli.user_id,
        },
    );

    match cli.command.unwrap_or(Commands::Export) {
        Commands::Export => {
            let Some(username) = cli.username else {
                Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "--username (or SOUNDCLOUD_USERNAME) is required to export",
                    )
                    .exit();
            };

            let count = exporter.export(&username, &cli.output).await?;
            info!("Exported {} likes to {}", count, cli.output.display());
        }
        Commands::FindUser { query, limit } => {
            let client_id = match &exporter.options().client_id {
                Some(id) => id.clone(),
                None => exporter.api().resolve_client_id().await?,
            };

            let users = exporter.api().search_users(&query, &client_id, limit).await?;
            for (i, user) in users.iter().enumerate() {
                println!(
                    "{}. {} (ID: {}) {}",
                    i + 1,
                    user.username,
                    user.id,
                    user.permalink_url
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
