//! TF-IDF vectorizer for subject lines.
//!
//! Case-folds, tokenizes on runs of two or more alphanumerics, drops a fixed
//! English stop-word list, and weights each term by tf × ln(N/df). A term
//! present in every document therefore weighs zero. Vocabulary order is
//! lexicographic, so vector positions are reproducible across runs. Rows are
//! L2-normalized so distances downstream reflect direction, not length.
//!
//! The clustering core does no logging; failures surface as `ClusterError`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ClusterError;

/// Token pattern: two or more ASCII alphanumerics, applied after lowercasing.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]{2,}").unwrap());

/// Fixed English stop-word list. Single-letter words never tokenize, so the
/// list starts at two characters.
const STOP_WORDS: &[&str] = &[
    "about", "above", "across", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyone", "anything", "anywhere", "are", "around", "as", "at", "back", "be", "because",
    "been", "before", "behind", "being", "below", "between", "both", "but", "by", "can",
    "cannot", "could", "did", "do", "does", "doing", "down", "during", "each", "either", "else",
    "enough", "etc", "even", "ever", "every", "everyone", "everything", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "if", "in", "into", "is", "it", "its", "itself", "just",
    "least", "less", "many", "may", "me", "might", "more", "most", "much", "must", "my",
    "myself", "neither", "never", "no", "nobody", "none", "nor", "not", "nothing", "now", "of",
    "off", "on", "once", "only", "onto", "or", "other", "others", "our", "ours", "out", "over",
    "own", "per", "perhaps", "please", "rather", "re", "same", "she", "should", "since", "so",
    "some", "someone", "something", "somewhere", "still", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "together", "too", "toward", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "when", "where", "whether", "which", "while", "who",
    "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself",
];

// ── Feature matrix ──────────────────────────────────────────────────

/// N×V TF-IDF matrix, rows aligned with the input subject order.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Vocabulary terms in lexicographic order; column i is `vocabulary[i]`.
    pub vocabulary: Vec<String>,
    /// One L2-normalized weight row per input subject.
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }
}

// ── Vectorization ───────────────────────────────────────────────────

/// Vectorize an ordered sequence of subject lines.
///
/// Fails with `ClusterError::EmptyCorpus` when there are no subjects or when
/// every subject consists entirely of stop words.
pub fn vectorize<S: AsRef<str>>(subjects: &[S]) -> Result<FeatureMatrix, ClusterError> {
    if subjects.is_empty() {
        return Err(ClusterError::EmptyCorpus);
    }

    let tokenized: Vec<Vec<String>> = subjects
        .iter()
        .map(|s| tokenize(s.as_ref()))
        .collect();

    // Lexicographic vocabulary with document frequencies.
    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for tokens in &tokenized {
        let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in distinct {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
    }
    if doc_freq.is_empty() {
        return Err(ClusterError::EmptyCorpus);
    }

    let n_docs = tokenized.len() as f64;
    let vocabulary: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
    let term_index: BTreeMap<&str, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let idf: Vec<f64> = doc_freq
        .values()
        .map(|&df| (n_docs / df as f64).ln())
        .collect();

    let rows = tokenized
        .iter()
        .map(|tokens| {
            let mut row = vec![0.0; vocabulary.len()];
            for token in tokens {
                let col = term_index[token.as_str()];
                row[col] += idf[col];
            }
            normalize(&mut row);
            row
        })
        .collect();

    Ok(FeatureMatrix { vocabulary, rows })
}

/// Lowercase and extract non-stop-word tokens.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Scale a row to unit length. All-zero rows (subjects made only of
/// ubiquitous terms) are left as-is.
fn normalize(row: &mut [f64]) {
    let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in row.iter_mut() {
            *w /= norm;
        }
    }
}
