//! Multi-strategy skill extraction
//!
//! Every section of a document is normalized and scanned twice: an exact pass
//! over all catalog surface forms, then a fuzzy pass over the n-grams the exact
//! pass left uncovered. Section priority drives contextual down-weighting, and
//! the per-document result keeps one entry per canonical skill.

use crate::catalog::{SkillCatalog, SkillCategory};
use crate::config::ExtractionConfig;
use crate::error::{DataQualityWarning, Result, SkillScopeError, WarningKind};
use crate::processing::document::{Document, SectionKind};
use crate::processing::text_normalizer::{is_stop_phrase, ngrams, normalize, tokenize};
use aho_corasick::AhoCorasick;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use strsim::normalized_damerau_levenshtein;

/// Catalog forms whose length differs from the candidate by more than this
/// are never compared.
const MAX_FUZZY_LENGTH_DIFF: usize = 4;

const FULL_TEXT_SECTION: &str = "full_text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Fuzzy,
    Contextual,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Exact => write!(f, "exact"),
            MatchStrategy::Fuzzy => write!(f, "fuzzy"),
            MatchStrategy::Contextual => write!(f, "contextual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub skill_name: String,
    pub weight: f32,
    pub matched_section: String,
    pub match_strategy: MatchStrategy,
}

/// Extraction result for one document, warnings included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub document_id: String,
    pub title: Option<String>,
    pub skills: Vec<WeightedSkill>,
    pub warnings: Vec<DataQualityWarning>,
}

impl ExtractedDocument {
    pub fn skill_names(&self) -> BTreeSet<&str> {
        self.skills.iter().map(|s| s.skill_name.as_str()).collect()
    }

    /// Skill names grouped by catalog category, each group in extraction
    /// order. Names the catalog does not know are left out.
    pub fn by_category(&self, catalog: &SkillCatalog) -> BTreeMap<SkillCategory, Vec<String>> {
        let mut groups: BTreeMap<SkillCategory, Vec<String>> = BTreeMap::new();
        for skill in &self.skills {
            if let Some(category) = catalog.category_of(&skill.skill_name) {
                groups.entry(category).or_default().push(skill.skill_name.clone());
            }
        }
        groups
    }
}

#[derive(Debug, Clone)]
struct Hit {
    entry: usize,
    weight: f32,
    section: String,
    strategy: MatchStrategy,
    order: usize,
}

pub struct SkillExtractor {
    catalog: Arc<SkillCatalog>,
    config: ExtractionConfig,
    exact_matcher: AhoCorasick,
}

impl SkillExtractor {
    pub fn new(catalog: Arc<SkillCatalog>, config: ExtractionConfig) -> Result<Self> {
        if config.strategies.is_empty() {
            return Err(SkillScopeError::Configuration(
                "At least one extraction strategy must be enabled".to_string(),
            ));
        }

        // Overlapping search so a longer form failing the token boundary
        // check does not hide a shorter valid one.
        let patterns: Vec<&str> = catalog.surface_forms().iter().map(|(f, _)| f.as_str()).collect();
        let exact_matcher = AhoCorasick::new(&patterns)
            .map_err(|e| SkillScopeError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        debug!(
            "Skill extractor ready: {} surface forms, strategies {:?}",
            patterns.len(),
            config.strategies
        );

        Ok(Self {
            catalog,
            config,
            exact_matcher,
        })
    }

    pub fn catalog(&self) -> &Arc<SkillCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Deduplicated skills ordered by descending weight.
    pub fn extract(&self, document: &Document) -> Vec<WeightedSkill> {
        self.extract_document(document).skills
    }

    pub fn extract_document(&self, document: &Document) -> ExtractedDocument {
        let mut warnings = Vec::new();

        if document.is_blank() {
            warnings.push(DataQualityWarning::new(&document.id, WarningKind::EmptyText));
            return ExtractedDocument {
                document_id: document.id.clone(),
                title: None,
                skills: Vec::new(),
                warnings,
            };
        }

        let detected;
        let document = if self.config.detect_sections && !document.is_sectioned() {
            detected = document.clone().with_detected_sections();
            &detected
        } else {
            document
        };

        let sectioned = document.is_sectioned();
        let mut hits = Vec::new();

        for section in document.sections() {
            self.scan_section(section.text, section.name, &section.kind, sectioned, &mut hits);
        }
        if !document.raw_text.trim().is_empty() {
            self.scan_section(
                &document.raw_text,
                FULL_TEXT_SECTION,
                &SectionKind::FullText,
                sectioned,
                &mut hits,
            );
        }

        let skills = self.finalize(hits);
        if skills.is_empty() {
            warnings.push(DataQualityWarning::new(&document.id, WarningKind::NoSkillsExtracted));
        }

        debug!("Document {}: {} skills extracted", document.id, skills.len());

        ExtractedDocument {
            document_id: document.id.clone(),
            title: document.title(),
            skills,
            warnings,
        }
    }

    /// Flat canonical skill set for a candidate profile (CV, manual input).
    pub fn skill_set(&self, document: &Document) -> BTreeSet<String> {
        self.extract(document)
            .into_iter()
            .map(|s| s.skill_name)
            .collect()
    }

    fn strategy_enabled(&self, strategy: MatchStrategy) -> bool {
        self.config.strategies.contains(&strategy)
    }

    fn scan_section(
        &self,
        text: &str,
        section_name: &str,
        kind: &SectionKind,
        sectioned: bool,
        hits: &mut Vec<Hit>,
    ) {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return;
        }

        let tokens = tokenize(&normalized);
        let spans = token_spans(&normalized);
        let mut covered = vec![false; tokens.len()];
        // (first token, entry, weight, strategy)
        let mut found: Vec<(usize, usize, f32, MatchStrategy)> = Vec::new();

        if self.strategy_enabled(MatchStrategy::Exact) {
            for (start, end, entry) in self.exact_matches(&normalized, &spans) {
                covered[start..end].iter_mut().for_each(|c| *c = true);
                found.push((start, entry, 1.0, MatchStrategy::Exact));
            }
        }

        if self.strategy_enabled(MatchStrategy::Fuzzy) {
            for (start, len, candidate) in ngrams(&tokens, self.config.max_ngram) {
                if covered[start..start + len].iter().any(|c| *c) {
                    continue;
                }
                let window = &tokens[start..start + len];
                if !self.is_fuzzy_candidate(&candidate, window) {
                    continue;
                }
                if let Some((entry, similarity)) = self.best_fuzzy_match(&candidate) {
                    covered[start..start + len].iter_mut().for_each(|c| *c = true);
                    found.push((start, entry, similarity, MatchStrategy::Fuzzy));
                }
            }
        }

        let down_weight = sectioned
            && !kind.is_high_value()
            && self.strategy_enabled(MatchStrategy::Contextual);

        found.sort_by_key(|(start, ..)| *start);
        for (_, entry, weight, strategy) in found {
            let (weight, strategy) = if down_weight {
                (weight * self.config.contextual_factor, MatchStrategy::Contextual)
            } else {
                (weight, strategy)
            };
            let order = hits.len();
            hits.push(Hit {
                entry,
                weight: weight.clamp(0.0, 1.0),
                section: section_name.to_string(),
                strategy,
                order,
            });
        }
    }

    /// Non-overlapping, token-aligned exact matches as
    /// `(first_token, end_token, entry)`, leftmost-longest.
    fn exact_matches(&self, normalized: &str, spans: &[(usize, usize)]) -> Vec<(usize, usize, usize)> {
        let forms = self.catalog.surface_forms();
        let mut aligned: Vec<(usize, usize, usize)> = self
            .exact_matcher
            .find_overlapping_iter(normalized)
            .filter_map(|mat| {
                let start = spans.iter().position(|(s, _)| *s == mat.start())?;
                let end = spans.iter().position(|(_, e)| *e == mat.end())?;
                Some((start, end + 1, forms[mat.pattern().as_usize()].1))
            })
            .collect();

        aligned.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut selected = Vec::new();
        let mut next_free = 0;
        for (start, end, entry) in aligned {
            if start >= next_free {
                selected.push((start, end, entry));
                next_free = end;
            }
        }
        selected
    }

    fn is_fuzzy_candidate(&self, candidate: &str, window: &[&str]) -> bool {
        if candidate.chars().count() < self.config.min_fuzzy_length {
            return false;
        }
        if is_stop_phrase(window) {
            return false;
        }
        // "with pyhton" is covered by the shorter "pyhton" window
        if window.len() > 1
            && (is_stop_phrase(&window[..1]) || is_stop_phrase(&window[window.len() - 1..]))
        {
            return false;
        }
        true
    }

    fn best_fuzzy_match(&self, candidate: &str) -> Option<(usize, f32)> {
        let candidate_len = candidate.chars().count();
        let mut best: Option<(usize, f32)> = None;

        for (form, entry) in self.catalog.surface_forms() {
            let form_len = form.chars().count();
            if form_len.abs_diff(candidate_len) > MAX_FUZZY_LENGTH_DIFF {
                continue;
            }
            let similarity = normalized_damerau_levenshtein(candidate, form) as f32;
            if similarity >= self.config.fuzzy_threshold
                && best.map_or(true, |(_, score)| similarity > score)
            {
                best = Some((*entry, similarity));
            }
        }

        best
    }

    fn finalize(&self, hits: Vec<Hit>) -> Vec<WeightedSkill> {
        let mut kept: HashMap<usize, Hit> = HashMap::new();
        for hit in hits {
            match kept.get(&hit.entry) {
                Some(existing) if existing.weight >= hit.weight => {}
                _ => {
                    kept.insert(hit.entry, hit);
                }
            }
        }

        let mut retained: Vec<Hit> = kept
            .into_values()
            .filter(|hit| hit.weight >= self.config.min_confidence)
            .collect();
        retained.sort_by(|a, b| b.weight.total_cmp(&a.weight).then(a.order.cmp(&b.order)));

        retained
            .into_iter()
            .map(|hit| WeightedSkill {
                skill_name: self.catalog.entry_at(hit.entry).canonical_name.clone(),
                weight: hit.weight,
                matched_section: hit.section,
                match_strategy: hit.strategy,
            })
            .collect()
    }
}

/// Byte spans of the space-separated tokens of normalized text.
fn token_spans(normalized: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for token in normalized.split(' ') {
        spans.push((offset, offset + token.len()));
        offset += token.len() + 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SkillCatalogEntry, SkillCategory};

    fn catalog() -> Arc<SkillCatalog> {
        Arc::new(
            SkillCatalog::new(vec![
                SkillCatalogEntry::new("Python", SkillCategory::Languages, ["python3"]),
                SkillCatalogEntry::new("Django", SkillCategory::Backend, Vec::<String>::new()),
                SkillCatalogEntry::new("PostgreSQL", SkillCategory::Databases, ["postgres"]),
                SkillCatalogEntry::new("Docker", SkillCategory::CloudDevops, Vec::<String>::new()),
            ])
            .unwrap(),
        )
    }

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(catalog(), ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn test_end_to_end_document() {
        let doc = Document::new(
            "d1",
            "Senior Python Developer. Requirements: Python, Django, PostgreSQL, Docker.",
        );
        let result = extractor().extract_document(&doc);

        assert_eq!(result.skills.len(), 4);
        for skill in &result.skills {
            assert_eq!(skill.weight, 1.0);
            assert_eq!(skill.match_strategy, MatchStrategy::Exact);
            assert_eq!(skill.matched_section, "full_text");
        }
        let names: Vec<&str> = result.skills.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(names, vec!["python", "django", "postgresql", "docker"]);
        assert_eq!(result.title.as_deref(), Some("Senior Python Developer"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_exact_beats_fuzzy() {
        let skills = extractor().extract(&Document::new("d1", "We love Python"));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_name, "python");
        assert_eq!(skills[0].weight, 1.0);
        assert_eq!(skills[0].match_strategy, MatchStrategy::Exact);
    }

    #[test]
    fn test_fuzzy_match_on_typo() {
        let skills = extractor().extract(&Document::new("d1", "Experience with Pyhton and Docker"));

        let python = skills.iter().find(|s| s.skill_name == "python").unwrap();
        assert_eq!(python.match_strategy, MatchStrategy::Fuzzy);
        assert!(python.weight >= 0.75 && python.weight < 1.0);
        assert_eq!(skills[0].skill_name, "docker");
    }

    #[test]
    fn test_synonym_resolves_to_canonical() {
        let skills = extractor().extract(&Document::new("d1", "Postgres and python3"));
        let names: BTreeSet<&str> = skills.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["postgresql", "python"]));
    }

    #[test]
    fn test_token_boundaries() {
        let skills = extractor().extract(&Document::new("d1", "dockerized pythonic tooling"));
        assert!(skills.iter().all(|s| s.match_strategy != MatchStrategy::Exact));
    }

    #[test]
    fn test_contextual_down_weighting() {
        let doc = Document::new("d1", "")
            .with_section("requirements", "Python")
            .with_section("description", "Docker is a plus, Python too");
        let skills = extractor().extract(&doc);

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].skill_name, "python");
        assert_eq!(skills[0].weight, 1.0);
        assert_eq!(skills[0].matched_section, "requirements");

        assert_eq!(skills[1].skill_name, "docker");
        assert!((skills[1].weight - 0.6).abs() < 1e-6);
        assert_eq!(skills[1].match_strategy, MatchStrategy::Contextual);
    }

    #[test]
    fn test_equal_weights_follow_section_priority() {
        let doc = Document::new("d1", "")
            .with_section("requirements", "Django")
            .with_section("title", "Python");
        let names: Vec<String> = extractor()
            .extract(&doc)
            .into_iter()
            .map(|s| s.skill_name)
            .collect();
        assert_eq!(names, vec!["python", "django"]);

        let doc = Document::new("d2", "")
            .with_section("requirements", "Python")
            .with_section("title", "Python developer");
        let skills = extractor().extract(&doc);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].weight, 1.0);
        assert_eq!(skills[0].matched_section, "title");
    }

    #[test]
    fn test_skills_grouped_by_category() {
        let extractor = extractor();
        let doc = Document::new("d1", "Django, Python, Docker and Postgres");
        let groups = extractor.extract_document(&doc).by_category(extractor.catalog());

        assert_eq!(groups.len(), 4);
        assert_eq!(groups[&SkillCategory::Languages], vec!["python".to_string()]);
        assert_eq!(groups[&SkillCategory::Databases], vec!["postgresql".to_string()]);
        assert!(!groups.contains_key(&SkillCategory::Tools));
    }

    #[test]
    fn test_confidence_filter() {
        let config = ExtractionConfig {
            contextual_factor: 0.4,
            ..ExtractionConfig::default()
        };
        let extractor = SkillExtractor::new(catalog(), config).unwrap();
        let doc = Document::new("d1", "")
            .with_section("title", "Django developer")
            .with_section("profile", "Docker");
        let skills = extractor.extract(&doc);

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_name, "django");
        assert!(skills.iter().all(|s| s.weight >= 0.5 && s.weight <= 1.0));
    }

    #[test]
    fn test_deterministic_extraction() {
        let doc = Document::new("d1", "Pyhton, Django and postgres on Docker. Django again.")
            .with_section("requirements", "Docker, Python");
        let extractor = extractor();
        let first = extractor.extract(&doc);
        for _ in 0..5 {
            assert_eq!(extractor.extract(&doc), first);
        }
    }

    #[test]
    fn test_empty_and_skillless_documents() {
        let extractor = extractor();

        let empty = extractor.extract_document(&Document::new("e", "   "));
        assert!(empty.skills.is_empty());
        assert_eq!(empty.warnings[0].kind, WarningKind::EmptyText);

        let none = extractor.extract_document(&Document::new("n", "Nothing relevant here"));
        assert!(none.skills.is_empty());
        assert_eq!(none.warnings[0].kind, WarningKind::NoSkillsExtracted);
    }

    #[test]
    fn test_exact_only_strategy() {
        let config = ExtractionConfig {
            strategies: vec![MatchStrategy::Exact],
            ..ExtractionConfig::default()
        };
        let extractor = SkillExtractor::new(catalog(), config).unwrap();
        let skills = extractor.extract(&Document::new("d1", "Pyhton and Docker"));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_name, "docker");

        let config = ExtractionConfig {
            strategies: Vec::new(),
            ..ExtractionConfig::default()
        };
        assert!(SkillExtractor::new(catalog(), config).is_err());
    }

    #[test]
    fn test_everyday_words_are_not_skills() {
        let extractor = SkillExtractor::new(Arc::new(SkillCatalog::builtin()), ExtractionConfig::default()).unwrap();
        let prose = Document::new("d1", "Ready to go? A solid understanding of node is a plus this spring");
        assert!(extractor.extract(&prose).is_empty());

        let stack = Document::new("d2", "Golang, Node.js and Spring Framework with SOLID principles");
        assert_eq!(
            extractor.skill_set(&stack),
            BTreeSet::from([
                "golang".to_string(),
                "node.js".to_string(),
                "solid principles".to_string(),
                "spring framework".to_string(),
            ])
        );
    }

    #[test]
    fn test_skill_set_for_candidate() {
        let skills = extractor().skill_set(&Document::new("cv", "Built APIs with Django and PostgreSQL"));
        assert_eq!(skills, BTreeSet::from(["django".to_string(), "postgresql".to_string()]));
    }
}
