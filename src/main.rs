use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import modules from the library crate
use moodtune::config::{self, CliConfig};
use moodtune::enrichment::{EnrichmentCache, EnrichmentClient};
use moodtune::profile::{Emotion, UserProfile};
use moodtune::recommend::{PipelineResult, RecommendationClient, RecommendationPipeline};
use moodtune::textgen::GeminiProvider;
use moodtune::videosearch::YouTubeSearchClient;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the questionnaire profile TOML file.
    #[clap(long, value_parser = parse_path)]
    pub profile: PathBuf,

    /// Detected emotion label. Defaults to "unknown" when no detector ran.
    #[clap(long, default_value = "unknown")]
    pub emotion: String,

    /// Text-generation model identifier. Can also be specified in config file.
    #[clap(long)]
    pub model: Option<String>,

    /// Timeout in seconds for each capability call.
    #[clap(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Maximum number of entries kept in the enrichment cache.
    #[clap(long, default_value_t = 512)]
    pub cache_capacity: usize,

    /// Print the result as raw JSON instead of a formatted report.
    #[clap(long)]
    pub json: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            model: args.model.clone(),
            timeout_secs: args.timeout_secs,
            cache_capacity: args.cache_capacity,
        }
    }
}

fn load_profile(path: &PathBuf) -> Result<UserProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {:?}", path))?;
    let profile: UserProfile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse profile file: {:?}", path))?;
    profile
        .validate()
        .map_err(|e| e.context(format!("Invalid profile in {:?}", path)))?;
    Ok(profile)
}

fn print_report(result: &PipelineResult) {
    if !result.tips.is_empty() {
        println!("Well-being suggestions:");
        for (i, tip) in result.tips.iter().enumerate() {
            println!("  {}. {}: {}", i + 1, tip.title, tip.body);
        }
        println!();
    }

    if result.songs.is_empty() {
        println!("No song recommendations are available right now.");
    } else {
        println!("Recommended songs:");
        for (i, song) in result.songs.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, song.title, song.artist);
            if !song.description.is_empty() {
                println!("     {}", song.description);
            }
            println!("     video:     {}", song.video_title);
            println!("     link:      {}", song.video_link);
            println!("     thumbnail: {}", song.thumbnail_url);
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("Notes:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    let emotion = Emotion::from_str(&cli_args.emotion)
        .map_err(|e| e.context(format!("Invalid --emotion value: {}", cli_args.emotion)))?;

    let profile = load_profile(&cli_args.profile)?;

    info!("Configuration loaded:");
    info!("  model: {}", app_config.gemini.model);
    info!("  timeout_secs: {}", app_config.generation.timeout_secs);
    info!("  cache_capacity: {}", app_config.cache_capacity);

    let textgen = Arc::new(GeminiProvider::new(
        app_config.gemini.api_key.clone(),
        app_config.gemini.model.clone(),
    ));
    let search = Arc::new(
        YouTubeSearchClient::new(&app_config.youtube.api_key)
            .context("Failed to create YouTube search client")?,
    );

    let client = RecommendationClient::new(textgen, app_config.generation_options());
    let enricher = EnrichmentClient::new(search, EnrichmentCache::new(app_config.cache_capacity));
    let mut pipeline = RecommendationPipeline::new(client, enricher);

    let result = pipeline.run(&profile, emotion).await;

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }

    Ok(())
}
