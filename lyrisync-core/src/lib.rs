pub mod aggregate;
pub mod backend;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod facade;
pub mod fetcher;
pub mod lyrics;
pub mod matcher;
pub mod normalize;
pub mod paths;
pub mod provider;
pub mod raw;
pub mod time;

pub use aggregate::{aggregate, aggregate_line, AggregatedLine, AggregatedLyrics};
pub use backend::LyricsBackend;
pub use cache::{IndexCache, INDEX_CACHE_TTL};
pub use config::{
    build_config_template, LoggingConfig, LyricsConfig, LyricsProviderType, LyrisyncConfig,
    ProvidersConfig,
};
pub use convert::{convert_background, convert_line, WORD_GAP_TOLERANCE_MS};
pub use error::CoreError;
pub use facade::ProviderFacade;
pub use fetcher::LyricsFetcher;
pub use lyrics::{Cue, KaraokeWord, SyncedLine, UnsyncedLine};
pub use matcher::{find_candidate, find_match, IndexEntry, MatchTier, SearchCandidate};
pub use normalize::normalize;
pub use paths::{config_dir, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME};
pub use provider::{ErrorKind, LyricsProvider, LyricsQuery, LyricsResult};
pub use raw::{RawLine, RawLyrics, RawWord};
pub use time::TimeUnit;
