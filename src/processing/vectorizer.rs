//! Document vectorization: sparse skill-weight vectors or dense embeddings

use crate::config::{VectorizerConfig, VectorizerStrategy};
use crate::error::{DataQualityWarning, Result, SkillScopeError, WarningKind};
use crate::processing::extractor::ExtractedDocument;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    pub document_id: String,
    pub vector: Vec<f32>,
}

impl DocumentVector {
    pub fn is_zero(&self) -> bool {
        self.vector.iter().all(|v| *v == 0.0)
    }
}

/// Vectors for a whole corpus, keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct VectorizedCorpus {
    pub vectors: BTreeMap<String, DocumentVector>,
    pub dimension: usize,
    pub warnings: Vec<DataQualityWarning>,
}

/// Sentence encoder behind the dense strategy.
pub trait TextEncoder: Send + Sync {
    fn dimension(&self) -> usize;
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Model2Vec static embeddings loaded from a local model directory.
pub struct Model2VecEncoder {
    model: StaticModel,
    dimension: usize,
}

impl Model2VecEncoder {
    pub fn load(model_path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| SkillScopeError::Embedding(format!("Failed to load model: {}", e)))?;

        let dimension = model.encode_single("skill").len();
        if dimension == 0 {
            return Err(SkillScopeError::Embedding(
                "Model produced an empty embedding".to_string(),
            ));
        }

        info!("Model loaded in {:.2?} ({} dimensions)", start_time.elapsed(), dimension);
        Ok(Self { model, dimension })
    }
}

impl TextEncoder for Model2VecEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

enum Space {
    Vocabulary {
        terms: Vec<String>,
        index: HashMap<String, usize>,
    },
    Embedding {
        dimension: usize,
    },
}

/// Fit once over a corpus, then apply per document. The dimensionality is
/// fixed by `fit` and shared by every vector it produces.
pub struct Vectorizer {
    encoder: Option<Box<dyn TextEncoder>>,
    space: Option<Space>,
}

impl Vectorizer {
    pub fn sparse() -> Self {
        Self {
            encoder: None,
            space: None,
        }
    }

    pub fn dense(encoder: Box<dyn TextEncoder>) -> Self {
        Self {
            encoder: Some(encoder),
            space: None,
        }
    }

    pub fn from_config(config: &VectorizerConfig) -> Result<Self> {
        match config.strategy {
            VectorizerStrategy::Sparse => Ok(Self::sparse()),
            VectorizerStrategy::Dense => {
                let path = config.model_path.as_ref().ok_or_else(|| {
                    SkillScopeError::Configuration(
                        "vectorizer.model_path is required for the dense strategy".to_string(),
                    )
                })?;
                Ok(Self::dense(Box::new(Model2VecEncoder::load(path)?)))
            }
        }
    }

    pub fn strategy(&self) -> VectorizerStrategy {
        if self.encoder.is_some() {
            VectorizerStrategy::Dense
        } else {
            VectorizerStrategy::Sparse
        }
    }

    /// Fixed dimensionality, or `None` before `fit`.
    pub fn dimension(&self) -> Option<usize> {
        self.space.as_ref().map(|space| match space {
            Space::Vocabulary { terms, .. } => terms.len(),
            Space::Embedding { dimension } => *dimension,
        })
    }

    /// Sparse vocabulary in dimension order; empty for dense vectorizers.
    pub fn vocabulary(&self) -> &[String] {
        match &self.space {
            Some(Space::Vocabulary { terms, .. }) => terms,
            _ => &[],
        }
    }

    pub fn fit(&mut self, documents: &[ExtractedDocument]) -> Result<()> {
        let space = match &self.encoder {
            None => {
                let terms: Vec<String> = documents
                    .iter()
                    .flat_map(|d| d.skills.iter().map(|s| s.skill_name.clone()))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
                debug!("Sparse vocabulary fitted with {} skills", terms.len());
                Space::Vocabulary { terms, index }
            }
            Some(encoder) => Space::Embedding {
                dimension: encoder.dimension(),
            },
        };
        self.space = Some(space);
        Ok(())
    }

    /// Vectorize one document. Skills never seen during `fit` are ignored.
    pub fn transform(&self, document: &ExtractedDocument) -> Result<(DocumentVector, Option<DataQualityWarning>)> {
        let mut batch = self.transform_batch(std::slice::from_ref(document))?;
        let (vector, warning) = batch.pop().ok_or_else(|| {
            SkillScopeError::Processing("Vectorizer returned no vector".to_string())
        })?;
        Ok((vector, warning))
    }

    fn transform_batch(
        &self,
        documents: &[ExtractedDocument],
    ) -> Result<Vec<(DocumentVector, Option<DataQualityWarning>)>> {
        let space = self.space.as_ref().ok_or_else(|| {
            SkillScopeError::Configuration("Vectorizer used before fit".to_string())
        })?;

        let mut vectors: Vec<Vec<f32>> = match space {
            Space::Vocabulary { terms, index } => documents
                .iter()
                .map(|doc| {
                    let mut vector = vec![0.0; terms.len()];
                    for skill in &doc.skills {
                        if let Some(&i) = index.get(&skill.skill_name) {
                            vector[i] = skill.weight;
                        }
                    }
                    vector
                })
                .collect(),
            Space::Embedding { dimension } => self.embed(documents, *dimension)?,
        };

        Ok(documents
            .iter()
            .zip(vectors.drain(..))
            .map(|(doc, vector)| {
                let vector = DocumentVector {
                    document_id: doc.document_id.clone(),
                    vector,
                };
                let warning = vector
                    .is_zero()
                    .then(|| DataQualityWarning::new(&doc.document_id, WarningKind::ZeroVector));
                (vector, warning)
            })
            .collect())
    }

    fn embed(&self, documents: &[ExtractedDocument], dimension: usize) -> Result<Vec<Vec<f32>>> {
        let encoder = self.encoder.as_ref().ok_or_else(|| {
            SkillScopeError::Configuration("Dense vectorizer has no encoder".to_string())
        })?;

        // Skill-less documents stay zero vectors and never reach the encoder.
        let texts: Vec<String> = documents
            .iter()
            .filter(|d| !d.skills.is_empty())
            .map(|d| {
                d.skills
                    .iter()
                    .map(|s| s.skill_name.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let mut encoded = if texts.is_empty() {
            Vec::new()
        } else {
            encoder.encode(&texts)?
        }
        .into_iter();

        documents
            .iter()
            .map(|doc| {
                if doc.skills.is_empty() {
                    return Ok(vec![0.0; dimension]);
                }
                let vector = encoded.next().ok_or_else(|| {
                    SkillScopeError::Embedding("Encoder returned fewer vectors than texts".to_string())
                })?;
                if vector.len() != dimension {
                    return Err(SkillScopeError::Embedding(format!(
                        "Expected {} dimensions, encoder returned {}",
                        dimension,
                        vector.len()
                    )));
                }
                Ok(vector
                    .into_iter()
                    .map(|v| if v.is_finite() { v } else { 0.0 })
                    .collect())
            })
            .collect()
    }

    /// Fit over the corpus and vectorize every document.
    pub fn vectorize(&mut self, documents: &[ExtractedDocument]) -> Result<VectorizedCorpus> {
        let mut seen = BTreeSet::new();
        for doc in documents {
            if !seen.insert(doc.document_id.as_str()) {
                return Err(SkillScopeError::InvalidInput(format!(
                    "Duplicate document id '{}'",
                    doc.document_id
                )));
            }
        }

        self.fit(documents)?;
        let dimension = self.dimension().unwrap_or(0);

        let mut corpus = VectorizedCorpus {
            dimension,
            ..VectorizedCorpus::default()
        };
        for (vector, warning) in self.transform_batch(documents)? {
            if let Some(warning) = warning {
                corpus.warnings.push(warning);
            }
            corpus.vectors.insert(vector.document_id.clone(), vector);
        }

        debug!(
            "Vectorized {} documents into {} dimensions",
            corpus.vectors.len(),
            dimension
        );
        Ok(corpus)
    }
}
