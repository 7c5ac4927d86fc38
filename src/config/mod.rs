mod file_config;

pub use file_config::{
    CacheFileConfig, FileConfig, GeminiFileConfig, GenerationFileConfig, YouTubeFileConfig,
};

use crate::textgen::GenerationOptions;
use anyhow::{bail, Result};
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 512;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            model: None,
            timeout_secs: 30,
            cache_capacity: 512,
        }
    }
}

/// Settings for the text-generation capability.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
}

/// Settings for the video-search capability.
#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub api_key: String,
}

/// Sampling and timeout settings shared by both generation calls.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub youtube: YouTubeSettings,
    pub generation: GenerationSettings,
    pub cache_capacity: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present; credentials come from
    /// the TOML file or from the environment and are required.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let gemini_file = file.gemini.unwrap_or_default();
        let gemini_api_key = match gemini_file.api_key.or_else(|| env_key("GEMINI_API_KEY")) {
            Some(key) => key,
            None => bail!(
                "Gemini API key must be provided via [gemini].api_key in the config file \
                 or the GEMINI_API_KEY environment variable"
            ),
        };
        let gemini_model = gemini_file
            .model
            .or_else(|| cli.model.clone())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let youtube_file = file.youtube.unwrap_or_default();
        let youtube_api_key = match youtube_file.api_key.or_else(|| env_key("YOUTUBE_API_KEY")) {
            Some(key) => key,
            None => bail!(
                "YouTube API key must be provided via [youtube].api_key in the config file \
                 or the YOUTUBE_API_KEY environment variable"
            ),
        };

        let generation_file = file.generation.unwrap_or_default();
        let temperature = generation_file.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            bail!("temperature must be between 0.0 and 2.0, got {}", temperature);
        }
        let max_output_tokens = generation_file
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);
        if max_output_tokens == 0 {
            bail!("max_output_tokens must be greater than zero");
        }
        let timeout_secs = generation_file.timeout_secs.unwrap_or(cli.timeout_secs);
        if timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }

        let cache_capacity = file
            .cache
            .unwrap_or_default()
            .capacity
            .unwrap_or(cli.cache_capacity);
        if cache_capacity == 0 {
            bail!("cache capacity must be greater than zero");
        }

        Ok(Self {
            gemini: GeminiSettings {
                api_key: gemini_api_key,
                model: gemini_model,
            },
            youtube: YouTubeSettings {
                api_key: youtube_api_key,
            },
            generation: GenerationSettings {
                temperature,
                max_output_tokens,
                timeout_secs,
            },
            cache_capacity,
        })
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.generation.temperature,
            max_output_tokens: self.generation.max_output_tokens,
            timeout: Duration::from_secs(self.generation.timeout_secs),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_keys() -> FileConfig {
        FileConfig {
            gemini: Some(GeminiFileConfig {
                api_key: Some("gem-key".to_string()),
                model: None,
            }),
            youtube: Some(YouTubeFileConfig {
                api_key: Some("yt-key".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), Some(file_with_keys())).unwrap();

        assert_eq!(config.gemini.api_key, "gem-key");
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.youtube.api_key, "yt-key");
        assert_eq!(config.generation.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.generation.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(config.generation.timeout_secs, 30);
        assert_eq!(config.cache_capacity, 512);
    }

    #[test]
    fn test_resolve_toml_overrides_cli_model() {
        let cli = CliConfig {
            model: Some("cli-model".to_string()),
            ..Default::default()
        };
        let mut file = file_with_keys();
        file.gemini.as_mut().unwrap().model = Some("toml-model".to_string());

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();
        assert_eq!(config.gemini.model, "toml-model");

        let config = AppConfig::resolve(&cli, Some(file_with_keys())).unwrap();
        assert_eq!(config.gemini.model, "cli-model");
    }

    #[test]
    fn test_resolve_generation_overrides() {
        let mut file = file_with_keys();
        file.generation = Some(GenerationFileConfig {
            temperature: Some(0.2),
            max_output_tokens: Some(256),
            timeout_secs: Some(5),
        });

        let config = AppConfig::resolve(&CliConfig::default(), Some(file)).unwrap();
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_output_tokens, 256);
        assert_eq!(config.generation.timeout_secs, 5);

        let options = config.generation_options();
        assert_eq!(options.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_invalid_temperature() {
        let mut file = file_with_keys();
        file.generation = Some(GenerationFileConfig {
            temperature: Some(3.5),
            ..Default::default()
        });

        let result = AppConfig::resolve(&CliConfig::default(), Some(file));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("temperature"));
    }

    #[test]
    fn test_resolve_zero_cache_capacity() {
        let mut file = file_with_keys();
        file.cache = Some(CacheFileConfig { capacity: Some(0) });

        let result = AppConfig::resolve(&CliConfig::default(), Some(file));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cache capacity"));
    }
}
