use crate::error::{Result, RetrievalError};
use promptline_protocol::{KbCandidate, KbMatch};
use std::cmp::Ordering;

/// Upper bound on requested matches
pub const MAX_K: usize = 20;

/// Used when the caller asks for zero or fewer matches
pub const DEFAULT_K: usize = 5;

/// Clamp a caller-supplied K into `1..=MAX_K`; non-positive means default.
#[must_use]
pub fn clamp_k(k: i64) -> usize {
    if k <= 0 {
        return DEFAULT_K;
    }
    usize::try_from(k).map_or(MAX_K, |k| k.min(MAX_K))
}

/// Cosine similarity over the common prefix of `a` and `b`.
///
/// `None` when either side is empty or has zero magnitude, or the result is
/// not a finite number.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let len = a.len().min(b.len());
    if len == 0 {
        return None;
    }
    let (a, b) = (&a[..len], &b[..len]);

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let similarity = dot_product / (norm_a * norm_b);
    similarity.is_finite().then_some(similarity)
}

/// Rank candidates by similarity to `query`, best first, at most
/// `clamp_k(k)` of them. Ties keep candidate order.
pub fn rank(query: &[f32], candidates: &[KbCandidate], k: i64) -> Result<Vec<KbMatch>> {
    if query.is_empty() {
        return Err(RetrievalError::EmptyQuery);
    }
    let k = clamp_k(k);

    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, candidate)| {
            let embedding = candidate.embedding.as_deref()?;
            cosine_similarity(query, embedding).map(|score| (idx, score))
        })
        .collect();

    // `sort_by` is stable, so equal scores stay in candidate order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(idx, score)| KbMatch::from_candidate(&candidates[idx], score))
        .collect())
}
