//! CLI interface for skillscope

use crate::catalog::SkillCategory;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skillscope")]
#[command(about = "Skill extraction, job profile clustering and learning recommendations")]
#[command(long_about = "Extract technical skills from job postings, group postings into job profiles and recommend what to learn next")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract weighted skills from job postings
    Extract {
        /// Postings file (JSON, JSONL, TXT, MD) or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Show match strategy and section for every skill
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Cluster postings into job profiles
    Cluster {
        #[arg(short, long)]
        input: PathBuf,

        /// Override the configured number of clusters (fixed-k mode)
        #[arg(short, long)]
        k: Option<usize>,

        /// Use density clustering instead of fixed-k
        #[arg(long)]
        density: bool,

        #[arg(short, long)]
        detailed: bool,

        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Gap analysis and recommendations for a skill set
    Recommend {
        #[arg(short, long)]
        input: PathBuf,

        /// Current skills, comma separated
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,

        /// File with current skills (JSON array or one per line)
        #[arg(long)]
        skills_file: Option<PathBuf>,

        /// Restrict recommendations to one cluster
        #[arg(long, allow_hyphen_values = true)]
        cluster: Option<i32>,

        /// Number of recommendations
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[arg(short, long)]
        detailed: bool,

        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List the skill catalog
    Catalog {
        /// Only show one category (e.g. languages, databases, cloud_devops)
        #[arg(long)]
        category: Option<String>,

        /// Show synonyms
        #[arg(long)]
        synonyms: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_category(category: &str) -> Result<SkillCategory, String> {
    SkillCategory::parse(category).ok_or_else(|| {
        let known: Vec<String> = SkillCategory::ALL
            .iter()
            .map(|c| format!("{:?}", c).to_lowercase())
            .collect();
        format!("Unknown category: {}. Known: {}", category, known.join(", "))
    })
}
