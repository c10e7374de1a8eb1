// Typed spans and overlap resolution.
//
// Every extractor reports what it found as byte ranges into the source text.
// When two detections of the same extractor family collide, the one with the
// higher confidence survives; on a tie the one registered first (earlier in
// the input order) wins.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Anything with a byte range and a confidence that can take part in overlap
/// resolution.
pub trait Located {
    fn start(&self) -> usize;
    fn end(&self) -> usize;
    fn confidence(&self) -> f64;

    fn overlaps<L: Located>(&self, other: &L) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// A detection: surface text, category, byte range and confidence in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span<C> {
    pub text: String,
    pub category: C,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

impl<C> Span<C> {
    /// Build a span over `source[start..end]`, clamping confidence to [0,1].
    pub fn new(source: &str, category: C, start: usize, end: usize, confidence: f64) -> Self {
        Self {
            text: source[start..end].to_string(),
            category,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

impl<C> Located for Span<C> {
    fn start(&self) -> usize {
        self.start
    }
    fn end(&self) -> usize {
        self.end
    }
    fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Drop overlapping items, keeping higher confidence first and, on equal
/// confidence, the item that came earlier in `items`. Output is ordered by
/// start offset.
pub fn resolve_overlaps<T: Located>(items: Vec<T>) -> Vec<T> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[b]
            .confidence()
            .partial_cmp(&items[a].confidence())
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut keep = vec![false; items.len()];
    let mut accepted: Vec<usize> = Vec::new();
    for idx in order {
        if accepted.iter().all(|&k| !items[k].overlaps(&items[idx])) {
            keep[idx] = true;
            accepted.push(idx);
        }
    }

    let mut out: Vec<T> = items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect();
    out.sort_by_key(|item| (item.start(), item.end()));
    out
}
