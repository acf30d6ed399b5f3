//! Keyword rule classifier.
//!
//! One Aho-Corasick pass finds every keyword present (case-insensitive,
//! overlapping, substring semantics); rules are then evaluated against the
//! hit set.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

use super::rules::{AnyOf, CATEGORIES, FALLBACK};
use super::{Assessment, CandidateCondition, ClassifierError, SymptomClassifier};

/// Maximum number of candidates returned.
pub const MAX_CANDIDATES: usize = 5;

pub struct KeywordClassifier {
    matcher: AhoCorasick,
    keywords: Vec<&'static str>,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self, ClassifierError> {
        let keywords = super::rules::all_keywords();
        let matcher = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&keywords)
            .map_err(|e| ClassifierError::Build(e.to_string()))?;
        Ok(Self { matcher, keywords })
    }

    fn hits(&self, text: &str) -> HashSet<&'static str> {
        self.matcher
            .find_overlapping_iter(text)
            .map(|m| self.keywords[m.pattern().as_usize()])
            .collect()
    }

    /// Candidates from the rule table before ranking, plus the names of the
    /// categories whose gate opened.
    fn candidates(
        &self,
        hits: &HashSet<&'static str>,
    ) -> (Vec<CandidateCondition>, Vec<&'static str>) {
        let satisfied = |groups: &[AnyOf]| {
            groups
                .iter()
                .all(|group| group.iter().any(|kw| hits.contains(kw)))
        };

        let mut out = Vec::new();
        let mut opened = Vec::new();
        for category in CATEGORIES.iter().filter(|c| satisfied(c.gate)) {
            opened.push(category.name);
            for rule in category.rules.iter().filter(|r| satisfied(r.requires)) {
                let (probability, description) = match &rule.boost {
                    Some(boost) if satisfied(boost.requires) => {
                        (boost.probability, boost.description)
                    }
                    _ => (rule.probability, rule.description),
                };
                out.push(CandidateCondition {
                    condition: rule.condition.to_string(),
                    probability,
                    description: description.to_string(),
                });
            }
        }
        (out, opened)
    }
}

impl SymptomClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Assessment {
        let hits = self.hits(text);
        let (mut conditions, categories) = self.candidates(&hits);
        if conditions.is_empty() {
            conditions = FALLBACK
                .iter()
                .map(|(condition, probability, description)| CandidateCondition {
                    condition: condition.to_string(),
                    probability: *probability,
                    description: description.to_string(),
                })
                .collect();
        }

        // Stable: equal probabilities keep table order.
        conditions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        conditions.truncate(MAX_CANDIDATES);

        tracing::debug!(
            keyword_hits = hits.len(),
            categories = ?categories,
            candidates = conditions.len(),
            "symptoms classified"
        );
        Assessment::from_ranked(conditions)
    }
}
