//! Output formatters: console, JSON and Markdown

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::*;
use crate::processing::clustering::ClusteringMode;
use crate::processing::recommender::{PriorityLevel, RecommendationOutcome};
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn describe_mode(mode: &ClusteringMode) -> String {
    match mode {
        ClusteringMode::FixedK { k, .. } => format!("fixed-k (k = {})", k),
        ClusteringMode::Density {
            epsilon,
            min_cluster_size,
        } => format!("density (epsilon = {}, min size = {})", epsilon, min_cluster_size),
    }
}

fn skill_list(skills: &[(String, usize)]) -> String {
    skills
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        format!(
            "Generated: {} | Documents: {} | Processing time: {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.document_count,
            metadata.processing_time_ms
        )
    }

    fn format_weight(&self, weight: f32) -> String {
        let text = format!("{:.2}", weight);
        let color = if weight >= 0.99 {
            Color::Green
        } else if weight >= 0.75 {
            Color::Yellow
        } else {
            Color::BrightRed
        };
        self.colorize(&text, color)
    }

    fn format_extraction(&self, report: &ExtractionReport) -> String {
        let mut output = self.format_header("SKILL EXTRACTION", 1);
        output.push_str(&self.format_metadata(&report.metadata));

        for doc in &report.documents {
            let title = doc.title.as_deref().unwrap_or("untitled");
            output.push_str(&self.format_header(&format!("{} - {}", doc.document_id, title), 2));
            if doc.skills.is_empty() {
                output.push_str(&self.colorize("  no skills found\n", Color::BrightBlack));
                continue;
            }
            for skill in &doc.skills {
                let _ = write!(output, "  {} {}", self.format_weight(skill.weight), skill.skill_name);
                if self.detailed {
                    let _ = write!(output, " [{} in {}]", skill.match_strategy, skill.matched_section);
                }
                output.push('\n');
            }
            if self.detailed {
                if let Some(groups) = report.categories.get(&doc.document_id) {
                    for (category, skills) in groups {
                        let _ = writeln!(
                            output,
                            "  {}: {}",
                            self.colorize(&category.to_string(), Color::Cyan),
                            skills.join(", ")
                        );
                    }
                }
            }
        }

        output.push_str(&self.format_warnings(&report.warnings));
        output
    }

    fn format_clusters(&self, report: &ClusterReport) -> String {
        let mut output = self.format_header("JOB PROFILES", 1);
        output.push_str(&self.format_metadata(&report.metadata));
        let _ = writeln!(
            output,
            "Mode: {} | Clusters: {} | Noise: {}",
            describe_mode(&report.mode),
            report.cluster_count,
            report.noise_count
        );
        if let Some(inertia) = report.inertia {
            let _ = writeln!(output, "Inertia: {:.4}", inertia);
        }

        for summary in &report.clusters {
            let profile = &summary.profile;
            output.push_str(&self.format_header(
                &format!("Cluster {} ({} postings)", profile.cluster_label, profile.member_count),
                2,
            ));
            let _ = writeln!(output, "  Top skills: {}", skill_list(&summary.top_skills));
            if !profile.representative_titles.is_empty() {
                let _ = writeln!(
                    output,
                    "  Titles: {}",
                    self.colorize(&profile.representative_titles.join(" | "), Color::Cyan)
                );
            }
        }

        if !report.top_corpus_skills.is_empty() {
            output.push_str(&self.format_header("Most demanded skills", 3));
            for (i, (skill, count)) in report.top_corpus_skills.iter().enumerate() {
                let _ = writeln!(output, "  {:>2}. {} ({})", i + 1, skill, count);
            }
        }

        if self.detailed {
            output.push_str(&self.format_warnings(&report.warnings));
        }
        output
    }

    fn format_recommendation(&self, summary: &RecommendationSummary) -> String {
        let report = &summary.report;
        let mut output = self.format_header("SKILL RECOMMENDATIONS", 1);
        output.push_str(&self.format_metadata(&summary.metadata));
        let _ = writeln!(output, "Scope: {}", report.scope);
        let _ = writeln!(output, "Current skills: {}", summary.current_skills.join(", "));

        if report.outcome == RecommendationOutcome::NoData {
            output.push_str(&self.colorize("\nNo data available for this scope.\n", Color::Yellow));
            return output;
        }

        output.push_str(&self.format_header("Gap Analysis", 2));
        let gap_color = if report.gap.gap_percentage <= 30.0 {
            Color::Green
        } else if report.gap.gap_percentage <= 60.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        let _ = writeln!(
            output,
            "Gap: {} ({} of {} skills missing)",
            self.colorize(&format!("{:.1}%", report.gap.gap_percentage), gap_color),
            report.gap.missing.len(),
            report.gap.total_skills
        );
        if !report.gap.mastered.is_empty() {
            let _ = writeln!(output, "Mastered: {}", report.gap.mastered.join(", "));
        }
        if self.detailed {
            for priority in &report.gap.priorities {
                let color = match priority.level {
                    PriorityLevel::Critical => Color::Red,
                    PriorityLevel::High => Color::Yellow,
                    PriorityLevel::Medium => Color::White,
                };
                let _ = writeln!(
                    output,
                    "  {} {} (demand {}, impact {:.0})",
                    self.colorize(&format!("{:<8}", priority.level.to_string()), color),
                    priority.skill_name,
                    priority.frequency,
                    priority.impact_score
                );
            }
        }
        if !report.gap.quick_wins.is_empty() {
            let quick: Vec<&str> = report.gap.quick_wins.iter().map(|q| q.skill_name.as_str()).collect();
            let _ = writeln!(output, "Quick wins: {}", self.colorize(&quick.join(", "), Color::Green));
        }

        output.push_str(&self.format_header("Recommended Skills", 2));
        for (i, rec) in report.recommendations.iter().enumerate() {
            let _ = write!(
                output,
                "  {:>2}. {} priority {:.1}",
                i + 1,
                self.colorize(&rec.skill_name, Color::Cyan),
                rec.priority
            );
            if self.detailed {
                let _ = write!(
                    output,
                    " | demand {} | importance {:.2}",
                    rec.frequency_in_corpus, rec.importance_score
                );
            }
            if rec.already_known {
                output.push_str(" (known)");
            }
            output.push('\n');
        }

        if !report.learning_path.is_empty() {
            output.push_str(&self.format_header("Learning Path", 2));
            for (i, phase) in report.learning_path.iter().enumerate() {
                let _ = writeln!(output, "  Phase {} - {}: {}", i + 1, phase.phase, phase.skills.join(", "));
            }
        }

        if !summary.complementary.is_empty() {
            output.push_str(&self.format_header("Often Paired With Your Skills", 2));
            for skill in &summary.complementary {
                let _ = writeln!(output, "  {} ({} postings)", skill.skill_name, skill.co_occurrences);
            }
        }

        if self.detailed && !summary.alignments.is_empty() {
            output.push_str(&self.format_header("Closest Profiles", 3));
            for alignment in &summary.alignments {
                let _ = writeln!(
                    output,
                    "  Cluster {}: {:.1}% aligned ({}/{}) {}",
                    alignment.cluster_label,
                    alignment.alignment_percentage,
                    alignment.matched_skills,
                    alignment.total_skills,
                    alignment.representative_titles.first().map(String::as_str).unwrap_or("")
                );
            }
        }
        output
    }

    fn format_warnings(&self, warnings: &[crate::error::DataQualityWarning]) -> String {
        if warnings.is_empty() {
            return String::new();
        }
        let mut output = self.format_header("Data quality warnings", 3);
        for warning in warnings {
            let _ = writeln!(output, "  {}", self.colorize(&warning.to_string(), Color::Yellow));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Extraction(r) => self.format_extraction(r),
            Report::Clusters(r) => self.format_clusters(r),
            Report::Recommendation(r) => self.format_recommendation(r),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn metadata(&self, metadata: &ReportMetadata) -> String {
        if !self.include_metadata {
            return String::new();
        }
        format!(
            "*Generated {} by skillscope {} over {} documents in {}ms*\n\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.tool_version,
            metadata.document_count,
            metadata.processing_time_ms
        )
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut md = String::new();
        match report {
            Report::Extraction(r) => {
                md.push_str("# Skill Extraction\n\n");
                md.push_str(&self.metadata(&r.metadata));
                for doc in &r.documents {
                    let _ = writeln!(md, "## {}\n", doc.document_id);
                    if let Some(title) = &doc.title {
                        let _ = writeln!(md, "_{}_\n", title);
                    }
                    md.push_str("| Skill | Weight | Strategy | Section |\n|---|---|---|---|\n");
                    for skill in &doc.skills {
                        let _ = writeln!(
                            md,
                            "| {} | {:.2} | {} | {} |",
                            skill.skill_name, skill.weight, skill.match_strategy, skill.matched_section
                        );
                    }
                    md.push('\n');
                    if let Some(groups) = r.categories.get(&doc.document_id) {
                        for (category, skills) in groups {
                            let _ = writeln!(md, "- **{}:** {}", category, skills.join(", "));
                        }
                        if !groups.is_empty() {
                            md.push('\n');
                        }
                    }
                }
            }
            Report::Clusters(r) => {
                md.push_str("# Job Profiles\n\n");
                md.push_str(&self.metadata(&r.metadata));
                let _ = writeln!(
                    md,
                    "**Mode:** {} | **Clusters:** {} | **Noise:** {}\n",
                    describe_mode(&r.mode),
                    r.cluster_count,
                    r.noise_count
                );
                for summary in &r.clusters {
                    let profile = &summary.profile;
                    let _ = writeln!(
                        md,
                        "## Cluster {} ({} postings)\n",
                        profile.cluster_label, profile.member_count
                    );
                    let _ = writeln!(md, "- **Top skills:** {}", skill_list(&summary.top_skills));
                    if !profile.representative_titles.is_empty() {
                        let _ = writeln!(md, "- **Titles:** {}", profile.representative_titles.join(", "));
                    }
                    md.push('\n');
                }
            }
            Report::Recommendation(r) => {
                let report = &r.report;
                md.push_str("# Skill Recommendations\n\n");
                md.push_str(&self.metadata(&r.metadata));
                let _ = writeln!(md, "**Scope:** {}\n", report.scope);
                if report.outcome == RecommendationOutcome::NoData {
                    md.push_str("No data available for this scope.\n");
                    return Ok(md);
                }
                let _ = writeln!(
                    md,
                    "**Gap:** {:.1}% ({} of {} skills missing)\n",
                    report.gap.gap_percentage,
                    report.gap.missing.len(),
                    report.gap.total_skills
                );
                md.push_str("| # | Skill | Priority | Demand | Importance |\n|---|---|---|---|---|\n");
                for (i, rec) in report.recommendations.iter().enumerate() {
                    let _ = writeln!(
                        md,
                        "| {} | {} | {:.1} | {} | {:.2} |",
                        i + 1,
                        rec.skill_name,
                        rec.priority,
                        rec.frequency_in_corpus,
                        rec.importance_score
                    );
                }
                if !report.gap.priorities.is_empty() {
                    md.push_str("\n## Missing Skills\n\n| Skill | Level | Demand | Impact |\n|---|---|---|---|\n");
                    for priority in &report.gap.priorities {
                        let _ = writeln!(
                            md,
                            "| {} | {} | {} | {:.0} |",
                            priority.skill_name, priority.level, priority.frequency, priority.impact_score
                        );
                    }
                }
                if !report.gap.quick_wins.is_empty() {
                    let quick: Vec<&str> = report.gap.quick_wins.iter().map(|q| q.skill_name.as_str()).collect();
                    let _ = writeln!(md, "\n**Quick wins:** {}", quick.join(", "));
                }
                if !report.learning_path.is_empty() {
                    md.push_str("\n## Learning Path\n\n");
                    for phase in &report.learning_path {
                        let _ = writeln!(md, "- **{}:** {}", phase.phase, phase.skills.join(", "));
                    }
                }
                if !r.complementary.is_empty() {
                    md.push_str("\n## Often Paired With Your Skills\n\n");
                    for skill in &r.complementary {
                        let _ = writeln!(md, "- {} ({} postings)", skill.skill_name, skill.co_occurrences);
                    }
                }
            }
        }
        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(config.color_output, config.detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
