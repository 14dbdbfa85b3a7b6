//! Job posting documents and their sections

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(title|requirements?|required skills?|qualifications?|technical skills?|skills|tech stack|profile|summary|description|missions?)\s*:\s*(.*)$",
    )
    .expect("Invalid heading regex")
});

/// A raw posting as delivered by the ingestion collaborator. Never mutated
/// once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub raw_text: String,
    #[serde(default)]
    pub section_texts: BTreeMap<String, String>,
    #[serde(default)]
    pub source_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Title,
    Requirements,
    TechnicalSkills,
    Profile,
    Description,
    Other(String),
    /// The whole `raw_text`, scanned in addition to named sections.
    FullText,
}

/// Borrowed view over one scannable section of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<'a> {
    pub kind: SectionKind,
    pub name: &'a str,
    pub text: &'a str,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Self {
        let key = name.trim().to_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "title" | "job title" => SectionKind::Title,
            "requirements" | "requirement" | "required skills" | "required skill"
            | "qualifications" | "qualification" => SectionKind::Requirements,
            "technical skills" | "technical skill" | "skills" | "tech stack" => {
                SectionKind::TechnicalSkills
            }
            "profile" | "summary" => SectionKind::Profile,
            "description" | "missions" | "mission" => SectionKind::Description,
            "full text" => SectionKind::FullText,
            _ => SectionKind::Other(key),
        }
    }

    /// Lower is more trustworthy: title > requirements/technical skills >
    /// profile/description > anything else.
    pub fn priority(&self) -> u8 {
        match self {
            SectionKind::Title => 0,
            SectionKind::Requirements | SectionKind::TechnicalSkills => 1,
            SectionKind::Profile | SectionKind::Description => 2,
            SectionKind::Other(_) => 3,
            SectionKind::FullText => 4,
        }
    }

    pub fn is_high_value(&self) -> bool {
        matches!(
            self,
            SectionKind::Title | SectionKind::Requirements | SectionKind::TechnicalSkills
        )
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Title => write!(f, "title"),
            SectionKind::Requirements => write!(f, "requirements"),
            SectionKind::TechnicalSkills => write!(f, "technical_skills"),
            SectionKind::Profile => write!(f, "profile"),
            SectionKind::Description => write!(f, "description"),
            SectionKind::Other(name) => write!(f, "{}", name),
            SectionKind::FullText => write!(f, "full_text"),
        }
    }
}

impl Document {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            section_texts: BTreeMap::new(),
            source_tag: None,
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.section_texts.insert(name.into(), text.into());
        self
    }

    pub fn with_source(mut self, tag: impl Into<String>) -> Self {
        self.source_tag = Some(tag.into());
        self
    }

    pub fn is_sectioned(&self) -> bool {
        self.section_texts.values().any(|t| !t.trim().is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty() && !self.is_sectioned()
    }

    /// Named sections ordered by priority, then name. Blank sections are skipped.
    pub fn sections(&self) -> Vec<SectionView<'_>> {
        let mut views: Vec<SectionView<'_>> = self
            .section_texts
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(name, text)| SectionView {
                kind: SectionKind::from_name(name),
                name: name.as_str(),
                text: text.as_str(),
            })
            .collect();
        views.sort_by(|a, b| a.kind.priority().cmp(&b.kind.priority()).then(a.name.cmp(b.name)));
        views
    }

    /// The title section, or the first short sentence of the raw text.
    pub fn title(&self) -> Option<String> {
        if let Some(title) = self
            .section_texts
            .iter()
            .find(|(name, text)| SectionKind::from_name(name) == SectionKind::Title && !text.trim().is_empty())
            .map(|(_, text)| text.trim().to_string())
        {
            return Some(title);
        }

        let first_line = self.raw_text.lines().map(str::trim).find(|l| !l.is_empty())?;
        let first_sentence = first_line
            .unicode_sentences()
            .next()
            .unwrap_or(first_line)
            .trim()
            .trim_end_matches(['.', ':', ';']);

        let length = first_sentence.chars().count();
        if length > 5 && length < 100 && !first_sentence.contains('@') {
            Some(first_sentence.to_string())
        } else {
            None
        }
    }

    /// Split `raw_text` on heading lines such as `Requirements:`.
    ///
    /// Text before the first heading becomes the description. Returns an
    /// empty map when no heading is found.
    pub fn detect_sections(&self) -> BTreeMap<String, String> {
        let mut sections: BTreeMap<String, String> = BTreeMap::new();
        let mut current: Option<String> = None;
        let mut preamble = String::new();
        let mut found = false;

        for line in self.raw_text.lines() {
            if let Some(caps) = HEADING_REGEX.captures(line) {
                found = true;
                let kind = SectionKind::from_name(&caps[1]);
                let name = kind.to_string();
                let body = sections.entry(name.clone()).or_default();
                Self::append_line(body, caps.get(2).map(|m| m.as_str()).unwrap_or(""));
                current = Some(name);
            } else if let Some(name) = &current {
                if let Some(body) = sections.get_mut(name) {
                    Self::append_line(body, line);
                }
            } else {
                Self::append_line(&mut preamble, line);
            }
        }

        if !found {
            return BTreeMap::new();
        }
        if !preamble.trim().is_empty() {
            let body = sections.entry(SectionKind::Description.to_string()).or_default();
            if body.is_empty() {
                *body = preamble;
            } else {
                *body = format!("{}\n{}", preamble, body);
            }
        }
        sections.retain(|_, text| !text.trim().is_empty());
        sections
    }

    /// Fill `section_texts` from heading detection when none were supplied.
    pub fn with_detected_sections(mut self) -> Self {
        if !self.is_sectioned() {
            let detected = self.detect_sections();
            if !detected.is_empty() {
                self.section_texts = detected;
            }
        }
        self
    }

    fn append_line(body: &mut String, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(line);
    }
}
