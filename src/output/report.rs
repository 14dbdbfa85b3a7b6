//! Serializable report records handed to the presentation layer

use crate::catalog::{SkillCatalog, SkillCategory};
use crate::error::DataQualityWarning;
use crate::processing::clustering::{ClusterProfile, ClusteringMode, CorpusSnapshot};
use crate::processing::extractor::ExtractedDocument;
use crate::processing::pipeline::PipelineRun;
use crate::processing::recommender::{ClusterAlignment, ComplementarySkill, RecommendationReport, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Skills listed in cluster and corpus summaries.
const TOP_SKILLS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Extraction(ExtractionReport),
    Clusters(ClusterReport),
    Recommendation(RecommendationSummary),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub document_count: usize,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(processing_time_ms: u64, document_count: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            document_count,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub metadata: ReportMetadata,
    pub documents: Vec<ExtractedDocument>,
    /// Matched skills per document id, grouped by catalog category.
    pub categories: BTreeMap<String, BTreeMap<SkillCategory, Vec<String>>>,
    pub warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub profile: ClusterProfile,
    pub top_skills: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub metadata: ReportMetadata,
    pub mode: ClusteringMode,
    pub cluster_count: usize,
    pub noise_count: usize,
    pub inertia: Option<f32>,
    pub clusters: Vec<ClusterSummary>,
    pub top_corpus_skills: Vec<(String, usize)>,
    pub warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub metadata: ReportMetadata,
    pub current_skills: Vec<String>,
    pub report: RecommendationReport,
    pub alignments: Vec<ClusterAlignment>,
    pub complementary: Vec<ComplementarySkill>,
}

impl ExtractionReport {
    pub fn new(
        documents: Vec<ExtractedDocument>,
        warnings: Vec<DataQualityWarning>,
        processing_time_ms: u64,
        catalog: &SkillCatalog,
    ) -> Self {
        let categories = documents
            .iter()
            .map(|doc| (doc.document_id.clone(), doc.by_category(catalog)))
            .collect();
        Self {
            metadata: ReportMetadata::new(processing_time_ms, documents.len()),
            documents,
            categories,
            warnings,
        }
    }
}

impl ClusterReport {
    pub fn from_run(run: &PipelineRun) -> Self {
        let clusters = Self::summaries(&run.snapshot);
        Self {
            metadata: ReportMetadata::new(run.processing_time_ms, run.documents.len()),
            mode: run.clusters.mode,
            cluster_count: run.clusters.cluster_count,
            noise_count: run.clusters.noise_count,
            inertia: run.clusters.inertia,
            clusters,
            top_corpus_skills: run.snapshot.top_skills(TOP_SKILLS),
            warnings: run.warnings.clone(),
        }
    }

    fn summaries(snapshot: &CorpusSnapshot) -> Vec<ClusterSummary> {
        snapshot
            .profiles
            .values()
            .map(|profile| ClusterSummary {
                top_skills: profile.top_skills(TOP_SKILLS),
                profile: profile.clone(),
            })
            .collect()
    }
}

impl RecommendationSummary {
    pub fn new(
        user: &UserProfile,
        report: RecommendationReport,
        alignments: Vec<ClusterAlignment>,
        complementary: Vec<ComplementarySkill>,
        run: &PipelineRun,
    ) -> Self {
        Self {
            metadata: ReportMetadata::new(run.processing_time_ms, run.documents.len()),
            current_skills: user.current_skills.iter().cloned().collect(),
            report,
            alignments,
            complementary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::extractor::{MatchStrategy, WeightedSkill};

    fn skill(name: &str) -> WeightedSkill {
        WeightedSkill {
            skill_name: name.to_string(),
            weight: 1.0,
            matched_section: "full_text".to_string(),
            match_strategy: MatchStrategy::Exact,
        }
    }

    #[test]
    fn test_extraction_report_groups_categories_per_document() {
        let catalog = SkillCatalog::builtin();
        let documents = vec![
            ExtractedDocument {
                document_id: "a".to_string(),
                title: None,
                skills: vec![skill("python"), skill("docker"), skill("rust")],
                warnings: Vec::new(),
            },
            ExtractedDocument {
                document_id: "b".to_string(),
                title: None,
                skills: Vec::new(),
                warnings: Vec::new(),
            },
        ];
        let report = ExtractionReport::new(documents, Vec::new(), 3, &catalog);

        assert_eq!(report.metadata.document_count, 2);
        let a = &report.categories["a"];
        assert_eq!(
            a[&SkillCategory::Languages],
            vec!["python".to_string(), "rust".to_string()]
        );
        assert_eq!(a[&SkillCategory::CloudDevops], vec!["docker".to_string()]);
        assert!(report.categories["b"].is_empty());
    }
}
