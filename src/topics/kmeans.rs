// Spherical k-means over sparse TF-IDF vectors.
//
// Similarity is cosine, not Euclidean distance. Seeding is reproducible: the
// first centroid is a document drawn from a seeded RNG and every further
// centroid is the document least similar to the centroids chosen so far.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::tfidf::{cosine, SparseVector};

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub max_iterations: usize,
    pub seed: u64,
    /// Wall-clock budget. When exceeded the current assignment is returned
    /// with `converged == false`.
    pub deadline: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster index per input vector.
    pub assignments: Vec<usize>,
    /// Cosine similarity of each vector to its cluster centroid.
    pub similarities: Vec<f64>,
    pub centroids: Vec<SparseVector>,
    pub iterations: usize,
    pub converged: bool,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed,
            deadline: None,
        }
    }

    /// Cluster `vectors`. `k` is clamped to the number of vectors; an empty
    /// input yields an empty clustering that counts as converged.
    pub fn fit(&self, vectors: &[SparseVector]) -> Clustering {
        let started = Instant::now();
        let k = self.k.min(vectors.len());
        if k == 0 {
            return Clustering {
                assignments: Vec::new(),
                similarities: Vec::new(),
                centroids: Vec::new(),
                iterations: 0,
                converged: true,
            };
        }

        let mut centroids = self.seed_centroids(vectors, k);
        let (mut assignments, mut similarities) = assign(vectors, &centroids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            if self.deadline.is_some_and(|d| started.elapsed() >= d) {
                debug!(iterations, "k-means deadline reached");
                break;
            }
            iterations += 1;
            update_centroids(vectors, &assignments, &mut centroids);
            let (next, sims) = assign(vectors, &centroids);
            similarities = sims;
            if next == assignments {
                converged = true;
                break;
            }
            assignments = next;
        }

        debug!(k, iterations, converged, "k-means finished");
        Clustering {
            assignments,
            similarities,
            centroids,
            iterations,
            converged,
        }
    }

    fn seed_centroids(&self, vectors: &[SparseVector], k: usize) -> Vec<SparseVector> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let first = rng.random_range(0..vectors.len());
        let mut chosen = vec![first];

        while chosen.len() < k {
            let next = (0..vectors.len())
                .filter(|i| !chosen.contains(i))
                .map(|i| {
                    let closest = chosen
                        .iter()
                        .map(|&c| cosine(&vectors[i], &vectors[c]))
                        .fold(f64::MIN, f64::max);
                    (i, closest)
                })
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            match next {
                Some((i, _)) => chosen.push(i),
                None => break,
            }
        }
        chosen.into_iter().map(|i| vectors[i].clone()).collect()
    }
}

/// Nearest centroid by cosine for every vector. Ties go to the lower
/// cluster index.
fn assign(vectors: &[SparseVector], centroids: &[SparseVector]) -> (Vec<usize>, Vec<f64>) {
    vectors
        .iter()
        .map(|v| {
            let mut best = (0, f64::MIN);
            for (c, centroid) in centroids.iter().enumerate() {
                let sim = cosine(v, centroid);
                if sim > best.1 {
                    best = (c, sim);
                }
            }
            (best.0, best.1.max(0.0))
        })
        .unzip()
}

/// Mean of member vectors. A cluster that lost all members keeps its
/// previous centroid.
fn update_centroids(vectors: &[SparseVector], assignments: &[usize], centroids: &mut [SparseVector]) {
    let mut sums: Vec<SparseVector> = vec![HashMap::new(); centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (v, &c) in vectors.iter().zip(assignments) {
        counts[c] += 1;
        for (term, w) in v {
            *sums[c].entry(term.clone()).or_insert(0.0) += w;
        }
    }
    for (c, sum) in sums.into_iter().enumerate() {
        if counts[c] == 0 {
            continue;
        }
        let n = counts[c] as f64;
        centroids[c] = sum.into_iter().map(|(t, w)| (t, w / n)).collect();
    }
}
