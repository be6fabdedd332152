//! Search over currently-enabled libraries
//!
//! Both modes are pure reads over already-loaded state and never trigger a
//! fetch. An empty enabled set yields empty results, not an error; callers
//! enable libraries first.

use crate::catalog::Catalog;
use crate::model::{PresetCategory, PresetEntry};
use std::cmp::Ordering;

/// Exact-filter query. Filters compose conjunctively; an empty options
/// struct matches every enabled preset.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Case-insensitive equality against the owning library name
    pub library: Option<String>,
    pub category: Option<PresetCategory>,
    pub gm_program: Option<u32>,
    /// Entry matches if it carries at least one of these tags
    /// (case-insensitive)
    pub tags: Vec<String>,
    /// Case-insensitive substring of the preset name
    pub name: Option<String>,
}

/// One exact-search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub library: String,
    pub entry: PresetEntry,
}

/// One fuzzy-search result with its ranking score.
#[derive(Debug, Clone)]
pub struct FuzzyHit {
    pub score: f32,
    pub library: String,
    pub entry: PresetEntry,
}

impl Catalog {
    /// Exact filter over presets from enabled libraries.
    ///
    /// Results keep enable order between libraries and document order within
    /// a library.
    pub fn search(&self, options: &SearchOptions) -> Vec<SearchHit> {
        let mut hits = Vec::new();

        for (library_name, library) in self.enabled_snapshot() {
            if let Some(filter) = &options.library {
                if !filter.eq_ignore_ascii_case(&library_name) {
                    continue;
                }
            }

            for entry in library.index.presets() {
                if entry_matches(entry, options) {
                    hits.push(SearchHit {
                        library: library_name.clone(),
                        entry: entry.clone(),
                    });
                }
            }
        }

        hits
    }

    /// Rank every enabled preset against `query` and return the top `limit`.
    ///
    /// Scoring is deterministic: exact name match 100, name prefix 80, name
    /// contains 60, any tag contains 40, otherwise a partial-word score of
    /// `30 * matched_words / total_words`. Zero-score entries are excluded
    /// and ties keep candidate order (stable sort).
    pub fn fuzzy_search(&self, query: &str, limit: usize) -> Vec<FuzzyHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let words: Vec<&str> = query.split_whitespace().collect();

        let mut hits = Vec::new();
        for (library_name, library) in self.enabled_snapshot() {
            for entry in library.index.presets() {
                let score = score_entry(entry, &query, &words);
                if score > 0.0 {
                    hits.push(FuzzyHit {
                        score,
                        library: library_name.clone(),
                        entry: entry.clone(),
                    });
                }
            }
        }

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(limit);
        hits
    }
}

fn entry_matches(entry: &PresetEntry, options: &SearchOptions) -> bool {
    if let Some(category) = options.category {
        if entry.category != category {
            return false;
        }
    }

    if let Some(program) = options.gm_program {
        if entry.gm_program != Some(program) {
            return false;
        }
    }

    if !options.tags.is_empty() {
        let any_overlap = entry.tags.iter().any(|tag| {
            options
                .tags
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(tag))
        });
        if !any_overlap {
            return false;
        }
    }

    if let Some(name) = &options.name {
        if !entry.name.to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }

    true
}

fn score_entry(entry: &PresetEntry, query: &str, words: &[&str]) -> f32 {
    let name = entry.name.to_lowercase();

    if name == query {
        return 100.0;
    }
    if name.starts_with(query) {
        return 80.0;
    }
    if name.contains(query) {
        return 60.0;
    }
    if entry
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(query))
    {
        return 40.0;
    }

    let matched = words
        .iter()
        .filter(|word| {
            name.contains(*word)
                || entry
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(*word))
        })
        .count();

    30.0 * matched as f32 / words.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, tags: &[&str]) -> PresetEntry {
        PresetEntry {
            name: name.to_string(),
            path: format!("{}.json", name.to_lowercase().replace(' ', "_")),
            category: PresetCategory::Sampler,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            gm_program: None,
            zone_count: None,
        }
    }

    #[test]
    fn test_score_ladder() {
        let exact = entry("Grand Piano", &[]);
        let contains = entry("Acoustic Grand Piano", &[]);
        let tagged = entry("Concert 1", &["piano"]);

        let query = "grand piano";
        let words: Vec<&str> = query.split_whitespace().collect();

        assert_eq!(score_entry(&exact, query, &words), 100.0);
        assert_eq!(score_entry(&contains, query, &words), 60.0);
        // Only "piano" matches via the tag, "grand" matches nothing
        let partial = score_entry(&tagged, query, &words);
        assert!(partial > 0.0 && partial <= 30.0);
        assert_eq!(partial, 15.0);
    }

    #[test]
    fn test_score_prefix_and_tag() {
        let prefix = entry("Grand Piano Bright", &[]);
        let tagged = entry("Steinway D", &["grand piano"]);

        let query = "grand piano";
        let words: Vec<&str> = query.split_whitespace().collect();

        assert_eq!(score_entry(&prefix, query, &words), 80.0);
        assert_eq!(score_entry(&tagged, query, &words), 40.0);
    }

    #[test]
    fn test_score_zero_for_unrelated() {
        let unrelated = entry("Violin", &["strings"]);
        let query = "grand piano";
        let words: Vec<&str> = query.split_whitespace().collect();
        assert_eq!(score_entry(&unrelated, query, &words), 0.0);
    }

    #[test]
    fn test_entry_matches_tags_any_overlap() {
        let piano = entry("Grand", &["piano", "grand"]);
        let strings = entry("Ensemble", &["strings"]);

        let options = SearchOptions {
            tags: vec!["Piano".to_string()],
            ..Default::default()
        };

        assert!(entry_matches(&piano, &options));
        assert!(!entry_matches(&strings, &options));
    }

    #[test]
    fn test_entry_matches_conjunction() {
        let mut e = entry("Lead Square", &["lead"]);
        e.category = PresetCategory::Synth;
        e.gm_program = Some(81);

        let options = SearchOptions {
            category: Some(PresetCategory::Synth),
            gm_program: Some(81),
            name: Some("square".to_string()),
            ..Default::default()
        };
        assert!(entry_matches(&e, &options));

        let wrong_program = SearchOptions {
            gm_program: Some(82),
            ..options
        };
        assert!(!entry_matches(&e, &wrong_program));
    }
}
