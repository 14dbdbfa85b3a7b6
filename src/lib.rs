//! skillscope library
//!
//! Extracts weighted technical skills from job postings, clusters postings
//! into job profiles and recommends skills against those profiles.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use catalog::{SkillCatalog, SkillCatalogEntry, SkillCategory};
pub use config::Config;
pub use error::{DataQualityWarning, Result, SkillScopeError, WarningKind};
pub use processing::document::Document;
pub use processing::extractor::{MatchStrategy, SkillExtractor, WeightedSkill};
pub use processing::pipeline::SkillPipeline;
pub use processing::recommender::{Recommendation, RecommendationEngine, UserProfile};
