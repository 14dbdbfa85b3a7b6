//! Gap analysis and skill recommendations over published cluster profiles

use crate::catalog::SkillCatalog;
use crate::config::RecommendationConfig;
use crate::error::{Result, SkillScopeError};
use crate::processing::clustering::CorpusSnapshot;
use crate::processing::extractor::ExtractedDocument;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Scope ranks below `CRITICAL_RANKS` are critical, below `HIGH_RANKS` high.
const CRITICAL_RANKS: usize = 3;
const HIGH_RANKS: usize = 6;
/// Impact lost per scope rank.
const IMPACT_STEP: f32 = 5.0;

const MAX_QUICK_WINS: usize = 5;

/// Tools and frameworks that take weeks rather than months to pick up.
const LOW_EFFORT_SKILLS: &[&str] = &[
    "git",
    "docker",
    "jenkins",
    "webpack",
    "terraform",
    "ansible",
    "graphql",
    "rest api",
    "oauth",
    "postman",
    "github actions",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub current_skills: BTreeSet<String>,
    pub target_cluster: Option<i32>,
}

impl UserProfile {
    /// Skills must already be canonical.
    pub fn new<I, S>(current_skills: I, target_cluster: Option<i32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            current_skills: current_skills.into_iter().map(Into::into).collect(),
            target_cluster,
        }
    }

    /// Canonicalize user-supplied skill strings, dropping unknown ones.
    pub fn from_raw_skills<I, S>(catalog: &SkillCatalog, raw_skills: I, target_cluster: Option<i32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            current_skills: raw_skills
                .into_iter()
                .filter_map(|s| catalog.canonicalize(s.as_ref()))
                .collect(),
            target_cluster,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub skill_name: String,
    pub frequency_in_corpus: usize,
    pub importance_score: f32,
    pub already_known: bool,
    pub priority: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Scope {
    Corpus,
    Cluster(i32),
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Corpus => write!(f, "whole corpus"),
            Scope::Cluster(label) => write!(f, "cluster {}", label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
}

impl PriorityLevel {
    fn from_rank(rank: usize) -> Self {
        if rank < CRITICAL_RANKS {
            PriorityLevel::Critical
        } else if rank < HIGH_RANKS {
            PriorityLevel::High
        } else {
            PriorityLevel::Medium
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityLevel::Critical => write!(f, "CRITICAL"),
            PriorityLevel::High => write!(f, "HIGH"),
            PriorityLevel::Medium => write!(f, "MEDIUM"),
        }
    }
}

/// A missing skill graded by its demand rank within the scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPriority {
    pub skill_name: String,
    pub level: PriorityLevel,
    pub frequency: usize,
    /// `100 - 5 * rank`, floored at 0.
    pub impact_score: f32,
}

/// A missing skill that is cheap to learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickWin {
    pub skill_name: String,
    pub frequency: usize,
}

/// A skill seen next to the user's skills in postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplementarySkill {
    pub skill_name: String,
    /// Postings containing both this skill and one of the user's.
    pub co_occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub total_skills: usize,
    pub mastered: Vec<String>,
    pub missing: Vec<String>,
    /// Always within [0, 100]; 0 for a scope without skills.
    pub gap_percentage: f32,
    /// Missing skills, most urgent first.
    pub priorities: Vec<SkillPriority>,
    pub quick_wins: Vec<QuickWin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Foundations,
    Specialization,
    Advanced,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::Foundations => write!(f, "Foundations"),
            PhaseKind::Specialization => write!(f, "Specialization"),
            PhaseKind::Advanced => write!(f, "Advanced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPhase {
    pub phase: PhaseKind,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Recommendations,
    /// Empty scope: nothing to recommend, not an invalid request.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub scope: Scope,
    pub outcome: RecommendationOutcome,
    pub recommendations: Vec<Recommendation>,
    pub gap: GapAnalysis,
    pub learning_path: Vec<LearningPhase>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAlignment {
    pub cluster_label: i32,
    pub alignment_percentage: f32,
    pub matched_skills: usize,
    pub total_skills: usize,
    pub representative_titles: Vec<String>,
}

struct ScopeView<'a> {
    scope: Scope,
    member_count: usize,
    skill_frequency: &'a BTreeMap<String, usize>,
}

pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Ranked recommendations for the user's scope, at most `top_n`.
    pub fn recommend(
        &self,
        user: &UserProfile,
        snapshot: &CorpusSnapshot,
        top_n: usize,
    ) -> Result<Vec<Recommendation>> {
        let Some(view) = Self::resolve_scope(user, snapshot)? else {
            return Ok(Vec::new());
        };

        let max_frequency = view.skill_frequency.values().copied().max().unwrap_or(0);
        if max_frequency == 0 {
            return Ok(Vec::new());
        }
        let boost_threshold = self.config.boost_share * view.member_count as f32;

        let mut recommendations: Vec<Recommendation> = view
            .skill_frequency
            .iter()
            .filter_map(|(skill, &frequency)| {
                let already_known = user.current_skills.contains(skill);
                if already_known && !self.config.include_known {
                    return None;
                }
                let importance_score = frequency as f32 / max_frequency as f32;
                let boost = if frequency as f32 > boost_threshold {
                    self.config.boost_factor
                } else {
                    1.0
                };
                Some(Recommendation {
                    skill_name: skill.clone(),
                    frequency_in_corpus: frequency,
                    importance_score,
                    already_known,
                    priority: importance_score * 100.0 * boost,
                })
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(b.frequency_in_corpus.cmp(&a.frequency_in_corpus))
                .then(a.skill_name.cmp(&b.skill_name))
        });
        recommendations.truncate(top_n);

        debug!(
            "{} recommendations for {} ({} known skills)",
            recommendations.len(),
            view.scope,
            user.current_skills.len()
        );
        Ok(recommendations)
    }

    pub fn gap_analysis(&self, user: &UserProfile, snapshot: &CorpusSnapshot) -> Result<GapAnalysis> {
        let Some(view) = Self::resolve_scope(user, snapshot)? else {
            return Ok(GapAnalysis {
                total_skills: 0,
                mastered: Vec::new(),
                missing: Vec::new(),
                gap_percentage: 0.0,
                priorities: Vec::new(),
                quick_wins: Vec::new(),
            });
        };

        let total_skills = view.skill_frequency.len();
        let (mastered, missing): (Vec<&String>, Vec<&String>) = view
            .skill_frequency
            .keys()
            .partition(|skill| user.current_skills.contains(*skill));

        let gap_percentage = if total_skills == 0 {
            0.0
        } else {
            missing.len() as f32 / total_skills as f32 * 100.0
        };

        let mut ranked: Vec<(&String, usize)> = view.skill_frequency.iter().map(|(s, c)| (s, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let priorities: Vec<SkillPriority> = ranked
            .iter()
            .enumerate()
            .filter(|(_, (skill, _))| !user.current_skills.contains(*skill))
            .map(|(rank, (skill, frequency))| SkillPriority {
                skill_name: (*skill).clone(),
                level: PriorityLevel::from_rank(rank),
                frequency: *frequency,
                impact_score: (100.0 - rank as f32 * IMPACT_STEP).max(0.0),
            })
            .collect();

        let quick_wins: Vec<QuickWin> = ranked
            .iter()
            .filter(|(skill, _)| {
                !user.current_skills.contains(*skill) && LOW_EFFORT_SKILLS.contains(&skill.as_str())
            })
            .take(MAX_QUICK_WINS)
            .map(|(skill, frequency)| QuickWin {
                skill_name: (*skill).clone(),
                frequency: *frequency,
            })
            .collect();

        Ok(GapAnalysis {
            total_skills,
            mastered: mastered.into_iter().cloned().collect(),
            missing: missing.into_iter().cloned().collect(),
            gap_percentage,
            priorities,
            quick_wins,
        })
    }

    /// Skills the user lacks that appear in postings alongside skills they
    /// have, counted once per posting. At most `top_n`.
    pub fn complementary_skills(
        &self,
        user: &UserProfile,
        documents: &[ExtractedDocument],
    ) -> Vec<ComplementarySkill> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in documents {
            let skills = doc.skill_names();
            if !skills.iter().any(|s| user.current_skills.contains(*s)) {
                continue;
            }
            for skill in skills {
                if !user.current_skills.contains(skill) {
                    *counts.entry(skill).or_default() += 1;
                }
            }
        }

        let mut complementary: Vec<ComplementarySkill> = counts
            .into_iter()
            .map(|(skill, co_occurrences)| ComplementarySkill {
                skill_name: skill.to_string(),
                co_occurrences,
            })
            .collect();
        complementary.sort_by(|a, b| {
            b.co_occurrences
                .cmp(&a.co_occurrences)
                .then(a.skill_name.cmp(&b.skill_name))
        });
        complementary.truncate(self.config.top_n);
        complementary
    }

    /// Recommendations, gap analysis and learning path in one record.
    pub fn report(&self, user: &UserProfile, snapshot: &CorpusSnapshot) -> Result<RecommendationReport> {
        let scope = Self::resolve_scope(user, snapshot)?;
        let outcome = match &scope {
            Some(view) if !view.skill_frequency.is_empty() => RecommendationOutcome::Recommendations,
            _ => RecommendationOutcome::NoData,
        };
        let scope = scope.map(|v| v.scope).unwrap_or(match user.target_cluster {
            Some(label) => Scope::Cluster(label),
            None => Scope::Corpus,
        });

        let recommendations = self.recommend(user, snapshot, self.config.top_n)?;
        let learning_path = Self::learning_path(&recommendations);

        Ok(RecommendationReport {
            scope,
            outcome,
            gap: self.gap_analysis(user, snapshot)?,
            recommendations,
            learning_path,
            generated_at: Utc::now(),
        })
    }

    /// Split ranked recommendations into three phases. Known skills are
    /// skipped and empty phases omitted.
    pub fn learning_path(recommendations: &[Recommendation]) -> Vec<LearningPhase> {
        let skills: Vec<String> = recommendations
            .iter()
            .filter(|r| !r.already_known)
            .map(|r| r.skill_name.clone())
            .collect();
        if skills.is_empty() {
            return Vec::new();
        }

        let n = skills.len();
        let foundations = (n / 3).max(1);
        let specialization = n.saturating_sub(2 * foundations);

        let mut phases = Vec::new();
        let mut remaining = skills.into_iter();
        for (phase, size) in [
            (PhaseKind::Foundations, foundations),
            (PhaseKind::Specialization, specialization),
            (PhaseKind::Advanced, usize::MAX),
        ] {
            let chunk: Vec<String> = remaining.by_ref().take(size).collect();
            if !chunk.is_empty() {
                phases.push(LearningPhase { phase, skills: chunk });
            }
        }
        phases
    }

    /// Every cluster ranked by the share of its skills the user already has.
    pub fn align_clusters(&self, user: &UserProfile, snapshot: &CorpusSnapshot) -> Vec<ClusterAlignment> {
        let mut alignments: Vec<ClusterAlignment> = snapshot
            .profiles
            .values()
            .map(|profile| {
                let total_skills = profile.skill_frequency.len();
                let matched_skills = profile
                    .skill_frequency
                    .keys()
                    .filter(|s| user.current_skills.contains(*s))
                    .count();
                let alignment_percentage = if total_skills == 0 {
                    0.0
                } else {
                    matched_skills as f32 / total_skills as f32 * 100.0
                };
                ClusterAlignment {
                    cluster_label: profile.cluster_label,
                    alignment_percentage,
                    matched_skills,
                    total_skills,
                    representative_titles: profile.representative_titles.clone(),
                }
            })
            .collect();

        alignments.sort_by(|a, b| {
            b.alignment_percentage
                .total_cmp(&a.alignment_percentage)
                .then(a.cluster_label.cmp(&b.cluster_label))
        });
        alignments
    }

    /// `Ok(None)` for an empty corpus; unknown labels are caller errors.
    fn resolve_scope<'a>(user: &UserProfile, snapshot: &'a CorpusSnapshot) -> Result<Option<ScopeView<'a>>> {
        if snapshot.document_count == 0 {
            return Ok(None);
        }
        match user.target_cluster {
            None => Ok(Some(ScopeView {
                scope: Scope::Corpus,
                member_count: snapshot.corpus.member_count,
                skill_frequency: &snapshot.corpus.skill_frequency,
            })),
            Some(label) => {
                let profile = snapshot.profile(label).ok_or_else(|| {
                    SkillScopeError::Configuration(format!("Unknown cluster label {}", label))
                })?;
                Ok(Some(ScopeView {
                    scope: Scope::Cluster(label),
                    member_count: profile.member_count,
                    skill_frequency: &profile.skill_frequency,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::clustering::{ClusterProfile, CorpusStats};
    use crate::processing::extractor::{MatchStrategy, WeightedSkill};

    fn snapshot(clusters: &[(i32, usize, &[(&str, usize)])]) -> CorpusSnapshot {
        let mut snapshot = CorpusSnapshot::default();
        for (label, members, skills) in clusters {
            let skill_frequency: BTreeMap<String, usize> =
                skills.iter().map(|(s, c)| (s.to_string(), *c)).collect();
            for (skill, count) in &skill_frequency {
                *snapshot.corpus.skill_frequency.entry(skill.clone()).or_default() += count;
            }
            snapshot.corpus.member_count += members;
            snapshot.document_count += members;
            snapshot.profiles.insert(
                *label,
                ClusterProfile {
                    cluster_label: *label,
                    member_count: *members,
                    skill_frequency,
                    representative_titles: vec![format!("Role {}", label)],
                },
            );
        }
        snapshot
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(RecommendationConfig::default())
    }

    #[test]
    fn test_known_skills_excluded() {
        let snapshot = snapshot(&[(0, 4, &[("python", 4), ("sql", 3), ("docker", 2), ("aws", 1)])]);
        let user = UserProfile::new(["python", "sql"], None);
        let recs = engine().recommend(&user, &snapshot, 10).unwrap();

        let names: BTreeSet<&str> = recs.iter().map(|r| r.skill_name.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["docker", "aws"]));
        assert!(recs.iter().all(|r| !r.already_known));
    }

    #[test]
    fn test_priority_and_boost() {
        let snapshot = snapshot(&[(0, 10, &[("docker", 8), ("aws", 4)])]);
        let recs = engine().recommend(&UserProfile::default(), &snapshot, 10).unwrap();

        assert_eq!(recs[0].skill_name, "docker");
        assert_eq!(recs[0].importance_score, 1.0);
        assert!((recs[0].priority - 150.0).abs() < 1e-4);
        assert!((recs[1].importance_score - 0.5).abs() < 1e-6);
        assert!((recs[1].priority - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let snapshot = snapshot(&[(0, 30, &[("gcp", 10), ("aws", 10), ("azure", 5)])]);
        let recs = engine().recommend(&UserProfile::default(), &snapshot, 2).unwrap();

        let names: Vec<&str> = recs.iter().map(|r| r.skill_name.as_str()).collect();
        assert_eq!(names, vec!["aws", "gcp"]);
    }

    #[test]
    fn test_include_known_mode() {
        let config = RecommendationConfig {
            include_known: true,
            ..RecommendationConfig::default()
        };
        let snapshot = snapshot(&[(0, 2, &[("python", 2), ("docker", 1)])]);
        let user = UserProfile::new(["python"], None);
        let recs = RecommendationEngine::new(config).recommend(&user, &snapshot, 10).unwrap();

        assert!(recs.iter().any(|r| r.skill_name == "python" && r.already_known));
    }

    #[test]
    fn test_target_cluster_scope() {
        let snapshot = snapshot(&[
            (0, 3, &[("python", 3), ("pandas", 2)]),
            (1, 3, &[("java", 3), ("spring", 3)]),
        ]);
        let user = UserProfile::new(["java"], Some(1));
        let recs = engine().recommend(&user, &snapshot, 10).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].skill_name, "spring");

        let unknown = UserProfile::new(["java"], Some(7));
        assert!(matches!(
            engine().recommend(&unknown, &snapshot, 10),
            Err(SkillScopeError::Configuration(_))
        ));
        let noise = UserProfile::new(["java"], Some(-1));
        assert!(engine().recommend(&noise, &snapshot, 10).is_err());
    }

    #[test]
    fn test_gap_analysis_bounds() {
        let snapshot = snapshot(&[(0, 2, &[("python", 2), ("sql", 1), ("docker", 1), ("aws", 1)])]);
        let gap = engine()
            .gap_analysis(&UserProfile::new(["python"], None), &snapshot)
            .unwrap();
        assert_eq!(gap.total_skills, 4);
        assert_eq!(gap.mastered, vec!["python".to_string()]);
        assert!((gap.gap_percentage - 75.0).abs() < 1e-4);

        let empty = CorpusSnapshot::default();
        let gap = engine().gap_analysis(&UserProfile::default(), &empty).unwrap();
        assert_eq!(gap.gap_percentage, 0.0);
        assert!(gap.priorities.is_empty());
    }

    #[test]
    fn test_missing_skill_priorities_and_quick_wins() {
        let snapshot = snapshot(&[(
            0,
            10,
            &[
                ("python", 9),
                ("sql", 8),
                ("docker", 7),
                ("aws", 6),
                ("git", 5),
                ("react", 4),
                ("kafka", 3),
                ("helm", 2),
            ],
        )]);
        let gap = engine()
            .gap_analysis(&UserProfile::new(["python"], None), &snapshot)
            .unwrap();

        let levels: Vec<(&str, PriorityLevel)> = gap
            .priorities
            .iter()
            .map(|p| (p.skill_name.as_str(), p.level))
            .collect();
        assert_eq!(
            levels,
            vec![
                ("sql", PriorityLevel::Critical),
                ("docker", PriorityLevel::Critical),
                ("aws", PriorityLevel::High),
                ("git", PriorityLevel::High),
                ("react", PriorityLevel::High),
                ("kafka", PriorityLevel::Medium),
                ("helm", PriorityLevel::Medium),
            ]
        );
        assert_eq!(gap.priorities[0].impact_score, 95.0);
        assert_eq!(gap.priorities[6].impact_score, 65.0);
        assert_eq!(gap.priorities[1].frequency, 7);

        let quick: Vec<&str> = gap.quick_wins.iter().map(|q| q.skill_name.as_str()).collect();
        assert_eq!(quick, vec!["docker", "git"]);
    }

    #[test]
    fn test_complementary_skills_from_co_occurrence() {
        fn posting(id: &str, skills: &[&str]) -> ExtractedDocument {
            ExtractedDocument {
                document_id: id.to_string(),
                title: None,
                skills: skills
                    .iter()
                    .map(|name| WeightedSkill {
                        skill_name: name.to_string(),
                        weight: 1.0,
                        matched_section: "full_text".to_string(),
                        match_strategy: MatchStrategy::Exact,
                    })
                    .collect(),
                warnings: Vec::new(),
            }
        }

        let documents = vec![
            posting("a", &["python", "django", "docker"]),
            posting("b", &["python", "pandas", "docker", "docker"]),
            posting("c", &["java", "spring framework", "docker"]),
        ];
        let config = RecommendationConfig {
            top_n: 2,
            ..RecommendationConfig::default()
        };
        let user = UserProfile::new(["python"], None);
        let complementary = RecommendationEngine::new(config).complementary_skills(&user, &documents);

        assert_eq!(
            complementary,
            vec![
                ComplementarySkill {
                    skill_name: "docker".to_string(),
                    co_occurrences: 2,
                },
                ComplementarySkill {
                    skill_name: "django".to_string(),
                    co_occurrences: 1,
                },
            ]
        );
        assert!(engine()
            .complementary_skills(&UserProfile::default(), &documents)
            .is_empty());
    }

    #[test]
    fn test_empty_corpus_reports_no_data() {
        let empty = CorpusSnapshot::default();
        let report = engine()
            .report(&UserProfile::new(["python"], Some(0)), &empty)
            .unwrap();
        assert_eq!(report.outcome, RecommendationOutcome::NoData);
        assert!(report.recommendations.is_empty());
        assert!(report.learning_path.is_empty());

        let mut skill_less = CorpusSnapshot::default();
        skill_less.document_count = 3;
        skill_less.corpus = CorpusStats {
            member_count: 3,
            skill_frequency: BTreeMap::new(),
        };
        let report = engine().report(&UserProfile::default(), &skill_less).unwrap();
        assert_eq!(report.outcome, RecommendationOutcome::NoData);
    }

    #[test]
    fn test_learning_path_phases() {
        let recs: Vec<Recommendation> = (0..7)
            .map(|i| Recommendation {
                skill_name: format!("skill{}", i),
                frequency_in_corpus: 7 - i,
                importance_score: 1.0,
                already_known: false,
                priority: 100.0 - i as f32,
            })
            .collect();

        let path = RecommendationEngine::learning_path(&recs);
        let sizes: Vec<usize> = path.iter().map(|p| p.skills.len()).collect();
        assert_eq!(sizes, vec![2, 3, 2]);
        assert_eq!(path[0].skills, vec!["skill0".to_string(), "skill1".to_string()]);

        let single = RecommendationEngine::learning_path(&recs[..1]);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].phase, PhaseKind::Foundations);

        let pair = RecommendationEngine::learning_path(&recs[..2]);
        let phases: Vec<PhaseKind> = pair.iter().map(|p| p.phase).collect();
        assert_eq!(phases, vec![PhaseKind::Foundations, PhaseKind::Advanced]);
    }

    #[test]
    fn test_cluster_alignment() {
        let snapshot = snapshot(&[
            (0, 3, &[("python", 3), ("pandas", 2)]),
            (1, 3, &[("java", 3), ("spring", 3), ("sql", 1)]),
            (2, 1, &[("python", 1), ("docker", 1)]),
        ]);
        let user = UserProfile::new(["python", "pandas", "docker"], None);
        let aligned = engine().align_clusters(&user, &snapshot);

        let labels: Vec<i32> = aligned.iter().map(|a| a.cluster_label).collect();
        assert_eq!(labels, vec![0, 2, 1]);
        assert_eq!(aligned[0].alignment_percentage, 100.0);
        assert_eq!(aligned[2].matched_skills, 0);
    }

    #[test]
    fn test_profile_from_raw_skills() {
        let catalog = SkillCatalog::builtin();
        let user = UserProfile::from_raw_skills(&catalog, ["Postgres", "K8s", "underwater basket weaving"], None);
        assert_eq!(
            user.current_skills,
            BTreeSet::from(["kubernetes".to_string(), "postgresql".to_string()])
        );
    }
}
