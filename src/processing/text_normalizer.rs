//! Text normalization and tokenization

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("Invalid URL regex"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").expect("Invalid email regex"));

/// Characters kept inside tokens so names like `c++`, `c#`, `node.js` or
/// `ci/cd` survive normalization.
const TOKEN_SYMBOLS: &[char] = &['+', '#', '.', '/', '-'];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in",
        "is", "it", "its", "of", "on", "or", "our", "that", "the", "this", "to", "was", "we",
        "will", "with", "you", "your", "experience", "years", "strong", "good", "knowledge",
        "skills", "team", "work", "working", "required", "preferred", "plus", "must",
        "senior", "junior", "developer", "engineer", "requirements", "profile", "description",
        "scale", "rest", "ability", "other", "level", "language", "languages",
        // French
        "le", "la", "les", "de", "du", "des", "et", "ou", "un", "une", "en", "avec", "pour",
        "par", "que", "ce", "est", "sont", "nous", "vous", "leur", "son", "sa", "ses", "plus",
        "tout", "faire", "avoir", "etre", "dans", "sur",
    ]
    .into_iter()
    .collect()
});

/// Strip markup, fold accents, lowercase and collapse whitespace.
///
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = decode_entities(text);
    let without_tags = TAG_REGEX.replace_all(&decoded, " ");
    let folded = fold_accents(&fold_accents(&without_tags).to_lowercase());
    let without_urls = URL_REGEX.replace_all(&folded, " ");
    let without_emails = EMAIL_REGEX.replace_all(&without_urls, " ");

    let cleaned: String = without_emails
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || TOKEN_SYMBOLS.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .map(trim_token)
        .filter(|token| token.chars().any(|c| c.is_alphanumeric()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split already-normalized text into tokens.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Whether a candidate consists only of stop words.
pub fn is_stop_phrase(tokens: &[&str]) -> bool {
    tokens.iter().all(|t| STOP_WORDS.contains(t))
}

/// Contiguous token windows of length `1..=max_n`, longest first.
///
/// Each item is `(start_token, len, joined_text)`.
pub fn ngrams<'a>(tokens: &[&'a str], max_n: usize) -> Vec<(usize, usize, String)> {
    let mut grams = Vec::new();
    for n in (1..=max_n.min(tokens.len())).rev() {
        for start in 0..=tokens.len() - n {
            grams.push((start, n, tokens[start..start + n].join(" ")));
        }
    }
    grams
}

/// Trim sentence punctuation from token edges. A leading `.` is kept
/// (`.net`), a trailing `+` / `#` is kept (`c++`, `c#`).
fn trim_token(token: &str) -> &str {
    token
        .trim_end_matches(|c| c == '.' || c == '/' || c == '-')
        .trim_start_matches(|c| c == '/' || c == '-' || c == '+' || c == '#')
}

fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("  Senior   PYTHON\tDeveloper\n"), "senior python developer");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_strips_markup_and_accents() {
        let text = "<p>Développeur <b>Java</b> &amp; Spring</p>";
        assert_eq!(normalize(text), "developpeur java spring");
    }

    #[test]
    fn test_keeps_symbolic_skill_names() {
        let text = "C++, C#, Node.js and CI/CD.";
        assert_eq!(normalize(text), "c++ c# node.js and ci/cd");
        assert_eq!(normalize("Experience with .NET"), "experience with .net");
    }

    #[test]
    fn test_removes_urls_and_emails() {
        let text = "Apply at https://jobs.example.com or jobs@example.com today";
        assert_eq!(normalize(text), "apply at or today");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "Senior Python Developer. Requirements: Python, Django, PostgreSQL, Docker.",
            "&lt;b&gt;Ingénieur&lt;/b&gt; -- DevOps/ SRE ... (K8s)!!",
            "Ünïcödé çà et là — “quotes” … www.example.com/path",
            "a.- -/x ++ ## .. c++. node.js/ -data-",
            "ǅemal İstanbul ß ﬁne",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_ngrams_longest_first() {
        let tokens = tokenize("spring boot java");
        let grams = ngrams(&tokens, 3);

        assert_eq!(grams[0], (0, 3, "spring boot java".to_string()));
        assert_eq!(grams[1], (0, 2, "spring boot".to_string()));
        assert_eq!(grams.len(), 6);
        assert!(ngrams(&[], 3).is_empty());
    }

    #[test]
    fn test_stop_phrases() {
        assert!(is_stop_phrase(&["senior", "developer"]));
        assert!(!is_stop_phrase(&["senior", "pyhton"]));
    }
}
