//! skillscope: skill extraction, job profile clustering and recommendations

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use skillscope::catalog::SkillCategory;
use skillscope::cli::{self, Cli, Commands, ConfigAction};
use skillscope::config::{ClusteringModeKind, Config, OutputFormat};
use skillscope::input::InputManager;
use skillscope::output::formatter::{save_report_to_file, ReportGenerator};
use skillscope::output::report::{ClusterReport, ExtractionReport, RecommendationSummary, Report};
use skillscope::processing::pipeline::SkillPipeline;
use skillscope::processing::recommender::UserProfile;
use skillscope::{Result, SkillScopeError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Per-command output options
struct OutputOptions {
    format: Option<String>,
    detailed: bool,
    save: Option<PathBuf>,
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Extract {
            input,
            detailed,
            output,
            save,
        } => {
            let start_time = Instant::now();
            let pipeline = SkillPipeline::new(config.clone())?;
            let documents = load_documents(&config, &input).await?;

            let progress = spinner(&format!("Extracting skills from {} postings...", documents.len()));
            let extracted = pipeline.extract_corpus(documents).await?;
            progress.finish_and_clear();

            let warnings = extracted.iter().flat_map(|d| d.warnings.iter().cloned()).collect();
            let report = Report::Extraction(ExtractionReport::new(
                extracted,
                warnings,
                start_time.elapsed().as_millis() as u64,
                pipeline.catalog(),
            ));
            emit(&report, &config, OutputOptions { format: output, detailed, save })
        }

        Commands::Cluster {
            input,
            k,
            density,
            detailed,
            output,
            save,
        } => {
            if let Some(k) = k {
                config.clustering.k = k;
            }
            if density {
                config.clustering.mode = ClusteringModeKind::Density;
            }

            let pipeline = SkillPipeline::new(config.clone())?;
            let documents = load_documents(&config, &input).await?;

            let progress = spinner(&format!("Clustering {} postings...", documents.len()));
            let run = pipeline.run(documents).await;
            progress.finish_and_clear();
            let run = run?;

            let report = Report::Clusters(ClusterReport::from_run(&run));
            emit(&report, &config, OutputOptions { format: output, detailed, save })
        }

        Commands::Recommend {
            input,
            skills,
            skills_file,
            cluster,
            top,
            detailed,
            output,
            save,
        } => {
            if let Some(top) = top {
                config.recommendation.top_n = top;
            }

            let pipeline = SkillPipeline::new(config.clone())?;
            let manager = InputManager::new();
            let mut raw_skills = skills;
            if let Some(path) = &skills_file {
                raw_skills.extend(manager.load_skill_list(path).await?);
            }
            if raw_skills.is_empty() {
                info!("No current skills given, recommending from scratch");
            }

            let documents = load_documents(&config, &input).await?;
            let progress = spinner(&format!("Analyzing {} postings...", documents.len()));
            let run = pipeline.run(documents).await;
            progress.finish_and_clear();
            let run = run?;

            let user = UserProfile::from_raw_skills(pipeline.catalog(), &raw_skills, cluster);
            let recommendation = pipeline.recommend(&user)?;
            let alignments = pipeline.align(&user);
            let complementary = pipeline.complementary(&user, &run.documents);

            let report = Report::Recommendation(RecommendationSummary::new(
                &user,
                recommendation,
                alignments,
                complementary,
                &run,
            ));
            emit(&report, &config, OutputOptions { format: output, detailed, save })
        }

        Commands::Catalog { category, synonyms } => {
            let pipeline = SkillPipeline::new(config)?;
            let catalog = pipeline.catalog();

            let categories: Vec<SkillCategory> = match category {
                Some(name) => vec![cli::parse_category(&name).map_err(SkillScopeError::InvalidInput)?],
                None => SkillCategory::ALL.to_vec(),
            };

            for category in categories {
                let entries: Vec<_> = catalog.entries_in(category).collect();
                if entries.is_empty() {
                    continue;
                }
                println!("\n{} ({})", category.to_string().bold().blue(), entries.len());
                for entry in entries {
                    if synonyms && !entry.synonyms.is_empty() {
                        let list: Vec<&str> = entry.synonyms.iter().map(String::as_str).collect();
                        println!("  {} {}", entry.canonical_name, format!("[{}]", list.join(", ")).dimmed());
                    } else {
                        println!("  {}", entry.canonical_name);
                    }
                }
            }
            println!("\n{} skills in catalog", catalog.len());
            Ok(())
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    SkillScopeError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("Configuration ({})\n", Config::config_path().display());
                println!("{}", content);
                Ok(())
            }
            Some(ConfigAction::Reset) => {
                println!("Resetting configuration to defaults...");
                Config::default().save()?;
                println!("{}", "Configuration reset successfully".green());
                Ok(())
            }
            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
                Ok(())
            }
        },
    }
}

async fn load_documents(config: &Config, input: &Path) -> Result<Vec<skillscope::processing::document::Document>> {
    InputManager::new()
        .with_section_detection(config.extraction.detect_sections)
        .load_documents(input)
        .await
}

fn spinner(message: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn emit(report: &Report, config: &Config, options: OutputOptions) -> Result<()> {
    let format = match &options.format {
        Some(format) => cli::parse_output_format(format).map_err(SkillScopeError::InvalidInput)?,
        None => config.output.format,
    };

    let mut output_config = config.output.clone();
    output_config.detailed |= options.detailed;
    if options.save.is_some() {
        output_config.color_output = false;
    }

    let content = ReportGenerator::from_config(&output_config).generate_report(report, &format)?;

    match &options.save {
        Some(path) => {
            save_report_to_file(&content, path)?;
            println!("Report saved to {}", path.display());
        }
        None if format == OutputFormat::Console => print!("{}", content),
        None => println!("{}", content),
    }
    Ok(())
}
