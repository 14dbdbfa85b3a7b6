//! Clustering of document vectors into job profiles, and the per-cluster
//! statistics derived from the assignments.

use crate::config::{ClusteringConfig, ClusteringModeKind};
use crate::error::{Result, SkillScopeError};
use crate::processing::extractor::ExtractedDocument;
use crate::processing::vectorizer::DocumentVector;
use chrono::{DateTime, Utc};
use log::{debug, info};
use linfa::traits::{Fit, Predict, Transformer};
use linfa::{DatasetBase, ParamGuard};
use linfa_clustering::{Dbscan, KMeans, KMeansInit};
use ndarray::{Array1, Array2, ArrayView1};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Reserved label for documents outside every dense group.
pub const NOISE_LABEL: i32 = -1;

/// Independent k-means restarts; the lowest inertia wins.
const KMEANS_RUNS: usize = 10;
const KMEANS_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClusteringMode {
    FixedK {
        k: usize,
        max_iterations: usize,
        seed: u64,
    },
    Density { epsilon: f32, min_cluster_size: usize },
}

impl ClusteringMode {
    pub fn from_config(config: &ClusteringConfig) -> Self {
        match config.mode {
            ClusteringModeKind::FixedK => ClusteringMode::FixedK {
                k: config.k,
                max_iterations: config.max_iterations,
                seed: config.seed,
            },
            ClusteringModeKind::Density => ClusteringMode::Density {
                epsilon: config.epsilon,
                min_cluster_size: config.min_cluster_size,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub document_id: String,
    pub cluster_label: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResult {
    pub mode: ClusteringMode,
    pub assignments: BTreeMap<String, ClusterAssignment>,
    pub cluster_count: usize,
    pub noise_count: usize,
    /// Within-cluster sum of squared distances, fixed-k only.
    pub inertia: Option<f32>,
}

impl ClusterResult {
    pub fn label_of(&self, document_id: &str) -> Option<i32> {
        self.assignments.get(document_id).map(|a| a.cluster_label)
    }

    pub fn labels(&self) -> BTreeSet<i32> {
        self.assignments
            .values()
            .map(|a| a.cluster_label)
            .filter(|l| *l != NOISE_LABEL)
            .collect()
    }
}

pub struct ClusterEngine {
    mode: ClusteringMode,
}

impl ClusterEngine {
    pub fn new(mode: ClusteringMode) -> Self {
        Self { mode }
    }

    /// Assign every document a label. Vectors must share one dimensionality.
    pub fn fit(&self, vectors: &BTreeMap<String, DocumentVector>) -> Result<ClusterResult> {
        let ids: Vec<&String> = vectors.keys().collect();
        let data = Self::to_matrix(vectors)?;

        let (labels, inertia) = match self.mode {
            ClusteringMode::FixedK {
                k,
                max_iterations,
                seed,
            } => {
                let (labels, inertia) = kmeans(&data, k, max_iterations, seed)?;
                (labels, Some(inertia))
            }
            ClusteringMode::Density {
                epsilon,
                min_cluster_size,
            } => {
                if min_cluster_size < 2 {
                    return Err(SkillScopeError::Configuration(
                        "min_cluster_size must be at least 2".to_string(),
                    ));
                }
                (density(&data, epsilon, min_cluster_size)?, None)
            }
        };

        let assignments: BTreeMap<String, ClusterAssignment> = ids
            .iter()
            .zip(labels.iter())
            .map(|(id, label)| {
                (
                    (*id).clone(),
                    ClusterAssignment {
                        document_id: (*id).clone(),
                        cluster_label: *label,
                    },
                )
            })
            .collect();

        let noise_count = labels.iter().filter(|l| **l == NOISE_LABEL).count();
        let cluster_count = labels
            .iter()
            .filter(|l| **l != NOISE_LABEL)
            .collect::<BTreeSet<_>>()
            .len();

        info!(
            "Clustered {} documents into {} clusters ({} noise)",
            assignments.len(),
            cluster_count,
            noise_count
        );

        Ok(ClusterResult {
            mode: self.mode,
            assignments,
            cluster_count,
            noise_count,
            inertia,
        })
    }

    /// A corpus without any vocabulary still gets one (all-zero) column.
    fn to_matrix(vectors: &BTreeMap<String, DocumentVector>) -> Result<Array2<f32>> {
        let dimension = vectors.values().next().map_or(0, |v| v.vector.len());
        let mut data = Array2::<f32>::zeros((vectors.len(), dimension.max(1)));
        for (row, vector) in vectors.values().enumerate() {
            if vector.vector.len() != dimension {
                return Err(SkillScopeError::InvalidInput(format!(
                    "Vector for '{}' has {} dimensions, expected {}",
                    vector.document_id,
                    vector.vector.len(),
                    dimension
                )));
            }
            if dimension > 0 {
                data.row_mut(row).assign(&ArrayView1::from(&vector.vector[..]));
            }
        }
        Ok(data)
    }
}

fn squared_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Seeded k-means, best of several restarts, followed by a refill pass so
/// all `k` labels are used.
fn kmeans(data: &Array2<f32>, k: usize, max_iterations: usize, seed: u64) -> Result<(Vec<i32>, f32)> {
    let n = data.nrows();
    if k == 0 || k > n {
        return Err(SkillScopeError::Configuration(format!(
            "k must be between 1 and the number of documents ({}), got {}",
            n, k
        )));
    }

    let dataset = DatasetBase::from(data.view());
    let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(seed))
        .init_method(KMeansInit::Random)
        .n_runs(KMEANS_RUNS)
        .max_n_iterations(max_iterations.max(1) as u64)
        .tolerance(KMEANS_TOLERANCE)
        .fit(&dataset)
        .map_err(|e| SkillScopeError::Processing(format!("K-Means fit failed: {}", e)))?;

    let predicted: Array1<usize> = model.predict(data);
    let mut labels = predicted.to_vec();
    let mut centroids = model.centroids().clone();
    refill_empty(data, &mut labels, &mut centroids, k);
    let centroids = mean_centroids(data, &labels, &centroids, k);

    let inertia = (0..n)
        .map(|i| squared_distance(data.row(i), centroids.row(labels[i])))
        .sum();

    debug!("k-means finished with inertia {:.4}", inertia);
    Ok((labels.into_iter().map(|l| l as i32).collect(), inertia))
}

/// Move the point farthest from its centroid (taken from a cluster with
/// more than one member) into each empty cluster.
fn refill_empty(data: &Array2<f32>, labels: &mut [usize], centroids: &mut Array2<f32>, k: usize) {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let mut donor: Option<(usize, f32)> = None;
        for (i, &l) in labels.iter().enumerate() {
            if counts[l] < 2 {
                continue;
            }
            let distance = squared_distance(data.row(i), centroids.row(l));
            if donor.map_or(true, |(_, d)| distance > d) {
                donor = Some((i, distance));
            }
        }
        if let Some((point, _)) = donor {
            counts[labels[point]] -= 1;
            labels[point] = empty;
            counts[empty] += 1;
            centroids.row_mut(empty).assign(&data.row(point));
        }
    }
}

fn mean_centroids(data: &Array2<f32>, labels: &[usize], previous: &Array2<f32>, k: usize) -> Array2<f32> {
    let mut sums = Array2::<f32>::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];
    for (i, &l) in labels.iter().enumerate() {
        let mut row = sums.row_mut(l);
        row += &data.row(i);
        counts[l] += 1;
    }
    for c in 0..k {
        if counts[c] == 0 {
            sums.row_mut(c).assign(&previous.row(c));
        } else {
            let count = counts[c] as f32;
            sums.row_mut(c).mapv_inplace(|v| v / count);
        }
    }
    sums
}

/// DBSCAN over cosine distance. Rows are scaled to unit length, where a
/// euclidean tolerance of `sqrt(2 * epsilon)` is a cosine distance of
/// `epsilon`. Zero rows have no direction and are always noise.
fn density(data: &Array2<f32>, epsilon: f32, min_cluster_size: usize) -> Result<Vec<i32>> {
    let params = Dbscan::params(min_cluster_size)
        .tolerance((2.0 * epsilon).sqrt())
        .check()
        .map_err(|e| SkillScopeError::Configuration(format!("Invalid density parameters: {}", e)))?;

    let n = data.nrows();
    let mut labels = vec![NOISE_LABEL; n];

    let directed: Vec<(usize, f32)> = (0..n)
        .map(|i| (i, data.row(i).dot(&data.row(i)).sqrt()))
        .filter(|(_, norm)| *norm > 0.0)
        .collect();
    if directed.len() < min_cluster_size {
        return Ok(labels);
    }

    let mut unit = Array2::<f32>::zeros((directed.len(), data.ncols()));
    for (row, (i, norm)) in directed.iter().enumerate() {
        unit.row_mut(row).assign(&data.row(*i).mapv(|v| v / norm));
    }

    let found: Array1<Option<usize>> = params.transform(&unit);

    // Groups left smaller than the minimum once borders were claimed by
    // earlier clusters are dissolved; survivors are renumbered in order.
    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for label in found.iter().flatten() {
        *sizes.entry(*label).or_default() += 1;
    }
    let mut renumbered: BTreeMap<usize, i32> = BTreeMap::new();
    for (label, size) in sizes {
        if size >= min_cluster_size {
            let new_label = renumbered.len() as i32;
            renumbered.insert(label, new_label);
        }
    }

    for ((i, _), label) in directed.iter().zip(found.iter()) {
        if let Some(new_label) = label.and_then(|l| renumbered.get(&l)) {
            labels[*i] = *new_label;
        }
    }
    Ok(labels)
}

/// Aggregate skill statistics for one non-noise cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster_label: i32,
    pub member_count: usize,
    /// Number of distinct member documents containing each skill.
    pub skill_frequency: BTreeMap<String, usize>,
    pub representative_titles: Vec<String>,
}

impl ClusterProfile {
    fn empty(cluster_label: i32) -> Self {
        Self {
            cluster_label,
            member_count: 0,
            skill_frequency: BTreeMap::new(),
            representative_titles: Vec::new(),
        }
    }

    /// Skills ordered by descending frequency, then name.
    pub fn top_skills(&self, n: usize) -> Vec<(String, usize)> {
        top_by_frequency(&self.skill_frequency, n)
    }
}

/// Skill frequencies over the whole clustered corpus. Noise documents are
/// not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub member_count: usize,
    pub skill_frequency: BTreeMap<String, usize>,
}

/// Immutable view of every profile produced by one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub profiles: BTreeMap<i32, ClusterProfile>,
    pub corpus: CorpusStats,
    pub document_count: usize,
    pub noise_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl Default for CorpusSnapshot {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            corpus: CorpusStats::default(),
            document_count: 0,
            noise_count: 0,
            generated_at: Utc::now(),
        }
    }
}

impl CorpusSnapshot {
    pub fn build(result: &ClusterResult, documents: &[ExtractedDocument], max_titles: usize) -> Self {
        let mut profiles: BTreeMap<i32, ClusterProfile> = BTreeMap::new();
        let mut corpus = CorpusStats::default();

        let mut ordered: Vec<&ExtractedDocument> = documents.iter().collect();
        ordered.sort_by(|a, b| a.document_id.cmp(&b.document_id));

        for doc in ordered {
            let Some(label) = result.label_of(&doc.document_id) else {
                continue;
            };
            if label == NOISE_LABEL {
                continue;
            }

            let profile = profiles
                .entry(label)
                .or_insert_with(|| ClusterProfile::empty(label));
            profile.member_count += 1;
            corpus.member_count += 1;

            for skill in doc.skill_names() {
                *profile.skill_frequency.entry(skill.to_string()).or_default() += 1;
                *corpus.skill_frequency.entry(skill.to_string()).or_default() += 1;
            }

            if let Some(title) = &doc.title {
                if profile.representative_titles.len() < max_titles
                    && !profile.representative_titles.contains(title)
                {
                    profile.representative_titles.push(title.clone());
                }
            }
        }

        Self {
            profiles,
            corpus,
            document_count: result.assignments.len(),
            noise_count: result.noise_count,
            generated_at: Utc::now(),
        }
    }

    pub fn profile(&self, label: i32) -> Option<&ClusterProfile> {
        self.profiles.get(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.member_count == 0
    }

    /// Most demanded skills across the corpus.
    pub fn top_skills(&self, n: usize) -> Vec<(String, usize)> {
        top_by_frequency(&self.corpus.skill_frequency, n)
    }
}

fn top_by_frequency(frequency: &BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut skills: Vec<(String, usize)> = frequency.iter().map(|(s, c)| (s.clone(), *c)).collect();
    skills.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    skills.truncate(n);
    skills
}

/// Copy-on-write holder for the current snapshot. Readers get an `Arc` and
/// never see a half-built aggregate.
#[derive(Debug, Default)]
pub struct ProfileStore {
    current: RwLock<Arc<CorpusSnapshot>>,
}

impl ProfileStore {
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn publish(&self, snapshot: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::clone(&snapshot);
        snapshot
    }

    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }
}
