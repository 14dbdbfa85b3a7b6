//! Skill catalog: canonical skill names, synonyms and categories
//!
//! The catalog is built once and shared read-only (usually behind an `Arc`)
//! by every extraction call. Every name it hands out is canonical, i.e. the
//! normalized form of the entry's primary name.

mod builtin;

use crate::error::{Result, SkillScopeError};
use crate::processing::text_normalizer::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    Frontend,
    Backend,
    Databases,
    CloudDevops,
    DataAi,
    Tools,
    Concepts,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Languages,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Databases,
        SkillCategory::CloudDevops,
        SkillCategory::DataAi,
        SkillCategory::Tools,
        SkillCategory::Concepts,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "languages" => Some(SkillCategory::Languages),
            "frontend" => Some(SkillCategory::Frontend),
            "backend" => Some(SkillCategory::Backend),
            "databases" => Some(SkillCategory::Databases),
            "cloud_devops" | "devops" => Some(SkillCategory::CloudDevops),
            "data_ai" | "ai_ml" => Some(SkillCategory::DataAi),
            "tools" => Some(SkillCategory::Tools),
            "concepts" => Some(SkillCategory::Concepts),
            _ => None,
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SkillCategory::Languages => "Languages",
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Databases => "Databases",
            SkillCategory::CloudDevops => "Cloud & DevOps",
            SkillCategory::DataAi => "Data & AI",
            SkillCategory::Tools => "Tools",
            SkillCategory::Concepts => "Concepts",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCatalogEntry {
    pub canonical_name: String,
    pub category: SkillCategory,
    pub synonyms: BTreeSet<String>,
}

impl SkillCatalogEntry {
    pub fn new<I, S>(canonical_name: &str, category: SkillCategory, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            canonical_name: canonical_name.to_string(),
            category,
            synonyms: synonyms.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// On-disk catalog layout: category -> canonical name -> synonyms.
///
/// ```toml
/// [languages]
/// python = ["python3", "py"]
/// "c++" = ["cpp"]
/// ```
pub type CatalogSource = BTreeMap<SkillCategory, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    entries: Vec<SkillCatalogEntry>,
    by_name: HashMap<String, usize>,
    /// Every normalized surface form with the index of its entry, sorted by form.
    surface_forms: Vec<(String, usize)>,
}

impl SkillCatalog {
    /// Build a catalog, normalizing names and synonyms.
    ///
    /// Fails when the catalog is empty, a name normalizes to nothing, or one
    /// surface form would resolve to two different skills.
    pub fn new(entries: Vec<SkillCatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SkillScopeError::Configuration(
                "Skill catalog must contain at least one entry".to_string(),
            ));
        }

        let mut normalized_entries: Vec<SkillCatalogEntry> = Vec::with_capacity(entries.len());
        let mut by_name = HashMap::new();
        let mut forms: BTreeMap<String, usize> = BTreeMap::new();

        for entry in entries {
            let canonical = normalize(&entry.canonical_name);
            if canonical.is_empty() {
                return Err(SkillScopeError::Configuration(format!(
                    "Skill name '{}' is empty after normalization",
                    entry.canonical_name
                )));
            }
            if by_name.contains_key(&canonical) {
                return Err(SkillScopeError::Configuration(format!(
                    "Duplicate skill '{}' in catalog",
                    canonical
                )));
            }

            let index = normalized_entries.len();
            let synonyms: BTreeSet<String> = entry
                .synonyms
                .iter()
                .map(|s| normalize(s))
                .filter(|s| !s.is_empty() && *s != canonical)
                .collect();

            for form in std::iter::once(&canonical).chain(synonyms.iter()) {
                match forms.get(form) {
                    Some(&existing) if existing != index => {
                        let other = normalized_entries
                            .get(existing)
                            .map(|e| e.canonical_name.as_str())
                            .unwrap_or("?");
                        return Err(SkillScopeError::Configuration(format!(
                            "Surface form '{}' maps to both '{}' and '{}'",
                            form, other, canonical
                        )));
                    }
                    _ => {
                        forms.insert(form.clone(), index);
                    }
                }
            }

            by_name.insert(canonical.clone(), index);
            normalized_entries.push(SkillCatalogEntry {
                canonical_name: canonical,
                category: entry.category,
                synonyms,
            });
        }

        // Derived spellings never shadow an explicit form.
        let explicit: Vec<(String, usize)> = forms.iter().map(|(f, i)| (f.clone(), *i)).collect();
        for (form, index) in explicit {
            for variant in Self::derived_variants(&form) {
                forms.entry(variant).or_insert(index);
            }
        }

        debug!(
            "Skill catalog built with {} skills and {} surface forms",
            normalized_entries.len(),
            forms.len()
        );

        Ok(Self {
            entries: normalized_entries,
            by_name,
            surface_forms: forms.into_iter().collect(),
        })
    }

    /// The built-in technology catalog.
    pub fn builtin() -> Self {
        Self::from_source(builtin::default_source())
            .expect("built-in catalog must be valid")
    }

    pub fn from_source(source: CatalogSource) -> Result<Self> {
        let entries = source
            .into_iter()
            .flat_map(|(category, skills)| {
                skills
                    .into_iter()
                    .map(move |(name, synonyms)| SkillCatalogEntry::new(&name, category, synonyms))
            })
            .collect();
        Self::new(entries)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let source: CatalogSource = toml::from_str(content)
            .map_err(|e| SkillScopeError::Configuration(format!("Malformed catalog: {}", e)))?;
        Self::from_source(source)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve an already-normalized surface form.
    pub fn lookup(&self, surface: &str) -> Option<&SkillCatalogEntry> {
        self.surface_forms
            .binary_search_by(|(form, _)| form.as_str().cmp(surface))
            .ok()
            .map(|pos| &self.entries[self.surface_forms[pos].1])
    }

    /// Map a raw, user-supplied skill string to its canonical name.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let normalized = normalize(raw);
        let resolved = self.lookup(&normalized).map(|e| e.canonical_name.clone());
        if resolved.is_none() && !normalized.is_empty() {
            debug!("Unknown skill '{}' ignored", raw);
        }
        resolved
    }

    pub fn entry(&self, canonical_name: &str) -> Option<&SkillCatalogEntry> {
        self.by_name.get(canonical_name).map(|&i| &self.entries[i])
    }

    pub fn category_of(&self, canonical_name: &str) -> Option<SkillCategory> {
        self.entry(canonical_name).map(|e| e.category)
    }

    pub fn entries(&self) -> &[SkillCatalogEntry] {
        &self.entries
    }

    pub fn entries_in(&self, category: SkillCategory) -> impl Iterator<Item = &SkillCatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub(crate) fn surface_forms(&self) -> &[(String, usize)] {
        &self.surface_forms
    }

    pub(crate) fn entry_at(&self, index: usize) -> &SkillCatalogEntry {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// "spring boot" <-> "spring-boot"
    fn derived_variants(form: &str) -> Vec<String> {
        let mut variants = Vec::new();
        if form.contains(' ') {
            variants.push(form.replace(' ', "-"));
        }
        if form.contains('-') {
            variants.push(form.replace('-', " "));
        }
        variants
    }
}
