//! Configuration management for skillscope

use crate::error::{Result, SkillScopeError};
use crate::processing::extractor::MatchStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional TOML catalog replacing the built-in one.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    pub extraction: ExtractionConfig,
    pub vectorizer: VectorizerConfig,
    pub clustering: ClusteringConfig,
    pub recommendation: RecommendationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub fuzzy_threshold: f32,
    pub contextual_factor: f32,
    pub min_confidence: f32,
    pub max_ngram: usize,
    pub min_fuzzy_length: usize,
    pub strategies: Vec<MatchStrategy>,
    pub detect_sections: bool,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub strategy: VectorizerStrategy,
    /// Local Model2Vec model directory, required by the dense strategy.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerStrategy {
    Sparse,
    Dense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub mode: ClusteringModeKind,
    pub k: usize,
    pub max_iterations: usize,
    pub min_cluster_size: usize,
    pub epsilon: f32,
    pub max_titles: usize,
    /// Seed for k-means initialisation.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringModeKind {
    FixedK,
    Density,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub top_n: usize,
    pub boost_factor: f32,
    pub boost_share: f32,
    pub include_known: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.75,
            contextual_factor: 0.6,
            min_confidence: 0.5,
            max_ngram: 3,
            min_fuzzy_length: 4,
            strategies: vec![
                MatchStrategy::Exact,
                MatchStrategy::Fuzzy,
                MatchStrategy::Contextual,
            ],
            detect_sections: false,
            batch_size: 32,
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            strategy: VectorizerStrategy::Sparse,
            model_path: None,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            mode: ClusteringModeKind::FixedK,
            k: 5,
            max_iterations: 100,
            min_cluster_size: 3,
            epsilon: 0.5,
            max_titles: 5,
            seed: default_seed(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            boost_factor: 1.5,
            boost_share: 0.5,
            include_known: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            extraction: ExtractionConfig::default(),
            vectorizer: VectorizerConfig::default(),
            clustering: ClusteringConfig::default(),
            recommendation: RecommendationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SkillScopeError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillScopeError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skillscope")
            .join("config.toml")
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        for (name, value) in [
            ("extraction.fuzzy_threshold", extraction.fuzzy_threshold),
            ("extraction.contextual_factor", extraction.contextual_factor),
            ("extraction.min_confidence", extraction.min_confidence),
            ("recommendation.boost_share", self.recommendation.boost_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SkillScopeError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if extraction.max_ngram == 0 {
            return Err(SkillScopeError::Configuration(
                "extraction.max_ngram must be at least 1".to_string(),
            ));
        }
        if extraction.batch_size == 0 {
            return Err(SkillScopeError::Configuration(
                "extraction.batch_size must be at least 1".to_string(),
            ));
        }
        if self.clustering.k == 0 {
            return Err(SkillScopeError::Configuration(
                "clustering.k must be at least 1".to_string(),
            ));
        }
        if self.clustering.min_cluster_size < 2 {
            return Err(SkillScopeError::Configuration(
                "clustering.min_cluster_size must be at least 2".to_string(),
            ));
        }
        if self.clustering.epsilon <= 0.0 || self.clustering.epsilon > 2.0 {
            return Err(SkillScopeError::Configuration(
                "clustering.epsilon must be within (0, 2]".to_string(),
            ));
        }
        if self.recommendation.top_n == 0 {
            return Err(SkillScopeError::Configuration(
                "recommendation.top_n must be at least 1".to_string(),
            ));
        }
        if self.recommendation.boost_factor < 1.0 {
            return Err(SkillScopeError::Configuration(
                "recommendation.boost_factor must be at least 1.0".to_string(),
            ));
        }
        if self.vectorizer.strategy == VectorizerStrategy::Dense && self.vectorizer.model_path.is_none() {
            return Err(SkillScopeError::Configuration(
                "vectorizer.model_path is required for the dense strategy".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.fuzzy_threshold, 0.75);
        assert_eq!(config.extraction.strategies.len(), 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();

        assert_eq!(parsed.clustering.k, config.clustering.k);
        assert_eq!(parsed.vectorizer.strategy, VectorizerStrategy::Sparse);
        assert_eq!(parsed.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.clustering.k = 0;
        assert!(matches!(config.validate(), Err(SkillScopeError::Configuration(_))));

        let mut config = Config::default();
        config.extraction.fuzzy_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vectorizer.strategy = VectorizerStrategy::Dense;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.clustering.min_cluster_size = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.clustering.epsilon = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.clustering.k = 3;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.clustering.k, 3);
    }
}
