use clap::{Parser, ValueEnum};
use lyrisync_core::{
    CoreError, LyricsFetcher, LyricsProvider, LyricsProviderType, LyricsQuery, LyrisyncConfig,
};
use lyrisync_lyrics_index::{IndexProvider, IndexProviderConfig};
use lyrisync_lyrics_search::{SearchProvider, SearchProviderConfig};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code when the lookup result carries an error
const EXIT_LOOKUP_FAILED: u8 = 1;
/// Exit code for config problems
const EXIT_CONFIG: u8 = 2;
/// Exit code when the lookup was interrupted
const EXIT_CANCELLED: u8 = 130;

/// Look up time-synchronized lyrics for a track
#[derive(Debug, Parser)]
#[command(name = "lyrisync", version, about)]
struct Args {
    /// Track title
    #[arg(long)]
    title: String,

    /// Artist name
    #[arg(long)]
    artist: String,

    /// Track URI echoed back in the result (defaults to "artist - title")
    #[arg(long)]
    uri: Option<String>,

    /// Track duration in seconds
    #[arg(long)]
    duration: Option<u32>,

    /// Config file to use instead of ~/.config/lyrisync/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Provider to try, in order; overrides lyrics.providers from the config
    #[arg(long = "provider", value_enum)]
    providers: Vec<ProviderArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Index,
    Search,
}

impl From<ProviderArg> for LyricsProviderType {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Index => Self::Index,
            ProviderArg::Search => Self::Search,
        }
    }
}

impl Args {
    fn query(&self) -> LyricsQuery {
        let uri = self
            .uri
            .clone()
            .unwrap_or_else(|| format!("{} - {}", self.artist, self.title));
        let query = LyricsQuery::new(uri, &self.title, &self.artist);
        match self.duration {
            Some(secs) => query.with_duration(secs),
            None => query,
        }
    }

    fn provider_order(&self, config: &LyrisyncConfig) -> Vec<LyricsProviderType> {
        if self.providers.is_empty() {
            config.lyrics.providers.clone()
        } else {
            self.providers.iter().copied().map(Into::into).collect()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Config is loaded before tracing so the file layer can honor logging.enabled
    let config = load_config(&args);
    init_tracing(config.as_ref().is_ok_and(|c| c.logging.enabled));

    let config = match config {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            error!(
                "No config found. A template was written to {}; fill in the provider URLs and run again.",
                path.display()
            );
            return ExitCode::from(EXIT_CONFIG);
        }
        Err(e) => {
            error!("Failed to load config: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let providers = match create_providers(&config, &args.provider_order(&config)) {
        Ok(providers) if providers.is_empty() => {
            error!("No lyrics providers are configured");
            return ExitCode::from(EXIT_CONFIG);
        }
        Ok(providers) => providers,
        Err(e) => {
            error!("Invalid provider config: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let fetcher = LyricsFetcher::new(providers);
    info!("Initialized lyrics providers: {:?}", fetcher.provider_names());

    // Cancel the pending lookup on Ctrl+C
    let cancel_token = CancellationToken::new();
    let ctrlc_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling lookup...");
            ctrlc_token.cancel();
        }
    });

    let query = args.query();
    let Some(result) = fetcher.find_until_cancelled(&query, &cancel_token).await else {
        return ExitCode::from(EXIT_CANCELLED);
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize result: {e}");
            return ExitCode::from(EXIT_LOOKUP_FAILED);
        }
    }

    if result.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_LOOKUP_FAILED)
    }
}

fn load_config(args: &Args) -> Result<LyrisyncConfig, CoreError> {
    match &args.config {
        Some(path) => LyrisyncConfig::load_from(path),
        None => {
            let provider_templates: &[&str] = &[
                lyrisync_lyrics_index::config::CONFIG_TEMPLATE,
                lyrisync_lyrics_search::config::CONFIG_TEMPLATE,
            ];
            LyrisyncConfig::load_or_create(Some(provider_templates))
        }
    }
}

/// Create lyrics providers in priority order.
///
/// Providers without a config section are skipped with a warning.
fn create_providers(
    config: &LyrisyncConfig,
    order: &[LyricsProviderType],
) -> Result<Vec<Box<dyn LyricsProvider>>, CoreError> {
    let mut providers: Vec<Box<dyn LyricsProvider>> = Vec::new();

    for provider_type in order {
        match provider_type {
            LyricsProviderType::Index => {
                match IndexProviderConfig::from_providers(&config.providers)? {
                    Some(index_config) => {
                        let provider = IndexProvider::new(&index_config)?;
                        providers.push(Box::new(provider.into_provider()));
                    }
                    None => warn!("Skipping index provider: no [providers.index] section"),
                }
            }
            LyricsProviderType::Search => {
                match SearchProviderConfig::from_providers(&config.providers)? {
                    Some(search_config) => {
                        let provider = SearchProvider::new(&search_config)?;
                        providers.push(Box::new(provider.into_provider()));
                    }
                    None => warn!("Skipping search provider: no [providers.search] section"),
                }
            }
        }
    }

    Ok(providers)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if file_logging_enabled {
        let log_path = lyrisync_core::log_file_path();

        // Create cache directory if needed
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
