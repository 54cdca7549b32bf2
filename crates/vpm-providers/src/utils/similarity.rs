//! Similarity scoring and top-k selection

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use vpm_domain::value_objects::DistanceMetric;

/// A candidate with its score under some metric
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<T> {
    /// Higher is better
    pub score: f32,
    /// Lower is closer
    pub distance: f32,
    /// The scored item
    pub item: T,
}

/// Score `candidate` against `query`, returning `(score, distance)`
///
/// Cosine scores are normalized to `[0, 1]`; euclidean scores are
/// `1 / (1 + d)`; dot-product scores are the raw inner product.
pub fn score_vectors(metric: DistanceMetric, query: &[f32], candidate: &[f32]) -> (f32, f32) {
    match metric {
        DistanceMetric::Cosine => {
            let norm_q = norm(query);
            let norm_c = norm(candidate);
            if norm_q == 0.0 || norm_c == 0.0 {
                return (0.0, 1.0);
            }
            let cosine = dot(query, candidate) / (norm_q * norm_c);
            (f32::midpoint(cosine, 1.0), 1.0 - cosine)
        }
        DistanceMetric::Euclidean => {
            let distance = query
                .iter()
                .zip(candidate)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f32>()
                .sqrt();
            (1.0 / (1.0 + distance), distance)
        }
        DistanceMetric::DotProduct => {
            let product = dot(query, candidate);
            (product, -product)
        }
    }
}

/// Keep the `k` best candidates, best first
///
/// Uses a bounded min-heap: O(n log k).
pub fn top_k<T, I>(candidates: I, k: usize) -> Vec<ScoredCandidate<T>>
where
    I: IntoIterator<Item = ScoredCandidate<T>>,
{
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<MinByScore<T>> = BinaryHeap::with_capacity(k + 1);
    for candidate in candidates {
        if heap.len() < k {
            heap.push(MinByScore(candidate));
        } else if heap.peek().is_some_and(|min| candidate.score > min.0.score) {
            heap.pop();
            heap.push(MinByScore(candidate));
        }
    }

    let mut best: Vec<_> = heap.into_iter().map(|entry| entry.0).collect();
    best.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    best
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Heap entry ordered so `BinaryHeap` pops the smallest score first
struct MinByScore<T>(ScoredCandidate<T>);

impl<T> PartialEq for MinByScore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.score == other.0.score
    }
}

impl<T> Eq for MinByScore<T> {}

impl<T> Ord for MinByScore<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .score
            .partial_cmp(&self.0.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl<T> PartialOrd for MinByScore<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
