//! End-to-end orchestration: extraction, vectorization, clustering and the
//! published profile snapshot recommendations are served from.

use crate::catalog::SkillCatalog;
use crate::config::Config;
use crate::error::{DataQualityWarning, Result, SkillScopeError};
use crate::processing::clustering::{
    ClusterEngine, ClusterResult, ClusteringMode, CorpusSnapshot, ProfileStore,
};
use crate::processing::document::Document;
use crate::processing::extractor::{ExtractedDocument, SkillExtractor};
use crate::processing::recommender::{
    ClusterAlignment, ComplementarySkill, RecommendationEngine, RecommendationReport, UserProfile,
};
use crate::processing::vectorizer::{VectorizedCorpus, Vectorizer};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Artifacts of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub documents: Vec<ExtractedDocument>,
    pub vectors: VectorizedCorpus,
    pub clusters: ClusterResult,
    pub snapshot: Arc<CorpusSnapshot>,
    pub warnings: Vec<DataQualityWarning>,
    pub processing_time_ms: u64,
}

pub struct SkillPipeline {
    config: Config,
    catalog: Arc<SkillCatalog>,
    extractor: Arc<SkillExtractor>,
    recommender: RecommendationEngine,
    store: ProfileStore,
}

impl SkillPipeline {
    /// Load the configured catalog (or the built-in one) and build every stage.
    pub fn new(config: Config) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading skill catalog from {}", path.display());
                SkillCatalog::load(path)?
            }
            None => SkillCatalog::builtin(),
        };
        Self::with_catalog(config, Arc::new(catalog))
    }

    pub fn with_catalog(config: Config, catalog: Arc<SkillCatalog>) -> Result<Self> {
        config.validate()?;
        let extractor = SkillExtractor::new(Arc::clone(&catalog), config.extraction.clone())?;
        let recommender = RecommendationEngine::new(config.recommendation.clone());

        Ok(Self {
            config,
            catalog,
            extractor: Arc::new(extractor),
            recommender,
            store: ProfileStore::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<SkillCatalog> {
        &self.catalog
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    /// Extract every document on blocking workers, one batch per worker.
    /// Results keep the input order.
    pub async fn extract_corpus(&self, documents: Vec<Document>) -> Result<Vec<ExtractedDocument>> {
        let batch_size = self.config.extraction.batch_size.max(1);
        let mut handles = Vec::new();

        let mut documents = documents.into_iter().peekable();
        while documents.peek().is_some() {
            let batch: Vec<Document> = documents.by_ref().take(batch_size).collect();
            let extractor = Arc::clone(&self.extractor);
            handles.push(tokio::task::spawn_blocking(move || {
                batch
                    .iter()
                    .map(|doc| extractor.extract_document(doc))
                    .collect::<Vec<_>>()
            }));
        }

        let mut extracted = Vec::new();
        for handle in handles {
            let batch = handle
                .await
                .map_err(|e| SkillScopeError::Processing(format!("Extraction worker failed: {}", e)))?;
            extracted.extend(batch);
        }
        Ok(extracted)
    }

    /// Run every stage with the configured vectorizer and publish the
    /// resulting snapshot.
    pub async fn run(&self, documents: Vec<Document>) -> Result<PipelineRun> {
        let vectorizer = Vectorizer::from_config(&self.config.vectorizer)?;
        self.run_with(documents, vectorizer).await
    }

    pub async fn run_with(&self, documents: Vec<Document>, mut vectorizer: Vectorizer) -> Result<PipelineRun> {
        let start_time = Instant::now();
        info!("Processing {} documents", documents.len());

        let extracted = self.extract_corpus(documents).await?;
        let mut warnings: Vec<DataQualityWarning> =
            extracted.iter().flat_map(|d| d.warnings.iter().cloned()).collect();

        debug!("Vectorizing with the {:?} strategy", vectorizer.strategy());
        let vectors = vectorizer.vectorize(&extracted)?;
        warnings.extend(vectors.warnings.iter().cloned());

        let mode = ClusteringMode::from_config(&self.config.clustering);
        let clusters = if vectors.vectors.is_empty() {
            warn!("Empty corpus: no clusters to build");
            ClusterResult {
                mode,
                assignments: BTreeMap::new(),
                cluster_count: 0,
                noise_count: 0,
                inertia: None,
            }
        } else {
            ClusterEngine::new(mode).fit(&vectors.vectors)?
        };

        let snapshot = CorpusSnapshot::build(&clusters, &extracted, self.config.clustering.max_titles);
        let snapshot = self.store.publish(snapshot);

        for warning in &warnings {
            warn!("Data quality: {}", warning);
        }

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Pipeline finished in {}ms: {} clusters, {} warnings",
            processing_time_ms,
            clusters.cluster_count,
            warnings.len()
        );

        Ok(PipelineRun {
            documents: extracted,
            vectors,
            clusters,
            snapshot,
            warnings,
            processing_time_ms,
        })
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.store.snapshot()
    }

    pub fn recommend(&self, user: &UserProfile) -> Result<RecommendationReport> {
        self.recommender.report(user, &self.snapshot())
    }

    pub fn align(&self, user: &UserProfile) -> Vec<ClusterAlignment> {
        self.recommender.align_clusters(user, &self.snapshot())
    }

    pub fn complementary(&self, user: &UserProfile, documents: &[ExtractedDocument]) -> Vec<ComplementarySkill> {
        self.recommender.complementary_skills(user, documents)
    }
}
