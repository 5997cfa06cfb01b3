use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replay_report::api::state::AppState;
use replay_report::config::AppConfig;
use replay_report::cosmetics::CosmeticsClient;
use replay_report::decode::{JsonReplayDecoder, ReplayDecoder};
use replay_report::find_roster_player;
use replay_report::report::{
    build_report, render_report, sorted_roster, PlatformInfo, RenderOptions, Selection,
};

#[derive(Parser)]
#[command(name = "replay-report")]
#[command(about = "Match reports and elimination timelines from decoded replays")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server and web page
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the web page
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List the participants of a replay
    Players {
        /// Decoded replay file
        file: PathBuf,
    },

    /// Print the match report for a replay
    Report {
        /// Decoded replay file
        file: PathBuf,

        /// Roster index, player id or player name
        #[arg(long)]
        player: Option<String>,

        /// Seconds added to every elimination time
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },

    /// Write the decoded replay as pretty-printed JSON
    Export {
        /// Decoded replay file
        file: PathBuf,

        /// Output path
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting replay-report v{}", env!("CARGO_PKG_VERSION"));

    let decoder: Arc<dyn ReplayDecoder> = Arc::new(JsonReplayDecoder::new());

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = static_dir {
                config.server.static_dir = dir;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let cosmetics = if config.cosmetics.enabled {
                Some(CosmeticsClient::new(&config.cosmetics)?)
            } else {
                None
            };

            let mut state = AppState::new(config, decoder);
            if let Some(client) = cosmetics {
                tracing::info!("Cosmetic name lookup enabled");
                state = state.with_cosmetics(client);
            }

            let app = replay_report::api::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Web page: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Players { file } => {
            let decoded = decode_file(decoder.as_ref(), &file)?;
            let roster = sorted_roster(&decoded.replay);

            for (index, player) in roster.iter().enumerate() {
                println!("{:>3}  {}", index, player.roster_label());
            }
            tracing::info!("{} participants", roster.len());
        }
        Commands::Report {
            file,
            player,
            offset,
        } => {
            let decoded = decode_file(decoder.as_ref(), &file)?;
            let roster = sorted_roster(&decoded.replay);

            let selection = match player.as_deref() {
                Some(query) => Selection::Selected(
                    find_roster_player(&roster, query)
                        .with_context(|| format!("No participant matches {:?}", query))?,
                ),
                None => Selection::NoSelection,
            };
            let report = build_report(&decoded.replay, selection, offset);

            let cosmetic_names = if config.cosmetics.enabled {
                let client = CosmeticsClient::new(&config.cosmetics)?;
                Some(client.lookup_names_or_empty(&report.cosmetic_ids()).await)
            } else {
                None
            };
            let options = RenderOptions {
                cosmetic_names: cosmetic_names.as_ref(),
                platform: config.report.include_platform.then(PlatformInfo::current),
            };
            print!("{}", render_report(&report, &options));
        }
        Commands::Export { file, out } => {
            let decoded = decode_file(decoder.as_ref(), &file)?;
            let written = decoded
                .export_to(&out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            tracing::info!("Exported {} bytes to {}", written, out.display());
        }
    }

    Ok(())
}

fn decode_file(
    decoder: &dyn ReplayDecoder,
    path: &Path,
) -> Result<replay_report::DecodedReplay> {
    tracing::info!("Reading replay {} ({} decoder)", path.display(), decoder.name());
    decoder
        .decode_file(path)
        .with_context(|| format!("Failed to read replay file {}", path.display()))
}
