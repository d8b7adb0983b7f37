//! Approximate string matching backends.

use crate::config::FuzzyBackend;

pub trait FuzzyMatcher: Send + Sync {
    /// Similarity in [0, 1]; 1.0 means identical.
    fn similarity(&self, query: &str, candidate: &str) -> f64;

    /// Best candidate scoring at least `cutoff`. Ties go to the
    /// lexicographically greatest candidate so results do not depend on
    /// iteration order.
    fn best_match<'a>(
        &self,
        query: &str,
        candidates: &mut dyn Iterator<Item = &'a str>,
        cutoff: f64,
    ) -> Option<(&'a str, f64)> {
        let mut best: Option<(&'a str, f64)> = None;
        for candidate in candidates {
            let score = self.similarity(query, candidate);
            if score < cutoff {
                continue;
            }
            best = match best {
                Some((b, s)) if s > score || (s == score && b >= candidate) => Some((b, s)),
                _ => Some((candidate, score)),
            };
        }
        best
    }
}

pub fn from_backend(backend: FuzzyBackend) -> Box<dyn FuzzyMatcher> {
    match backend {
        FuzzyBackend::Ratio => Box::new(SequenceRatio),
        FuzzyBackend::JaroWinkler => Box::new(JaroWinkler),
    }
}

/// Ratcliff/Obershelp gestalt ratio: `2 * M / T`, where `M` counts characters
/// in the matching blocks found by repeatedly taking the longest common
/// substring and recursing on both sides of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl FuzzyMatcher for SequenceRatio {
    fn similarity(&self, query: &str, candidate: &str) -> f64 {
        let a: Vec<char> = candidate.chars().collect();
        let b: Vec<char> = query.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matched_chars(&a, &b) as f64 / total as f64
    }
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`; among equally
/// long blocks, the one starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[j + 1] = length of the match ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        let mut cur = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        prev = cur;
    }
    (best_i, best_j, best_k)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl FuzzyMatcher for JaroWinkler {
    fn similarity(&self, query: &str, candidate: &str) -> f64 {
        strsim::jaro_winkler(query, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_matches_gestalt_definition() {
        let r = SequenceRatio;
        assert!(approx(r.similarity("yoghurt", "yogurt"), 12.0 / 13.0));
        assert!(approx(r.similarity("milk", "milk"), 1.0));
        assert!(approx(r.similarity("abcd", "bcde"), 0.75));
        assert!(approx(r.similarity("", ""), 1.0));
        assert!(approx(r.similarity("abc", "xyz"), 0.0));
    }

    #[test]
    fn best_match_respects_cutoff() {
        let r = SequenceRatio;
        let candidates = ["yogurt", "yogurts", "bread"];
        let best = r.best_match("yoghurt", &mut candidates.iter().copied(), 0.8);
        assert_eq!(best.map(|(c, _)| c), Some("yogurt"));
        assert!(r
            .best_match("zzz", &mut candidates.iter().copied(), 0.8)
            .is_none());
    }

    #[test]
    fn ties_prefer_greatest_candidate() {
        let r = SequenceRatio;
        let candidates = ["bat", "cat"];
        let best = r.best_match("at", &mut candidates.iter().copied(), 0.5);
        assert_eq!(best.map(|(c, _)| c), Some("cat"));
    }

    #[test]
    fn jaro_winkler_backend() {
        let jw = from_backend(FuzzyBackend::JaroWinkler);
        assert!(approx(jw.similarity("milk", "milk"), 1.0));
        let candidates = ["cheddar", "cheese"];
        let best = jw.best_match("chedar", &mut candidates.iter().copied(), 0.8);
        assert_eq!(best.map(|(c, _)| c), Some("cheddar"));
    }
}
