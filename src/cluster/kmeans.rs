//! Seeded k-means over the TF-IDF matrix.
//!
//! Lloyd's algorithm with a deterministic farthest-point variant of
//! k-means++ seeding and a restart sweep: each restart starts the seeding
//! from a different document, and the assignment with the lowest
//! within-cluster sum of squares wins. The random seed picks where the sweep
//! starts; everything after that is deterministic, so identical input and
//! seed always produce identical labels.
//!
//! Near-equal distances (within `TIE_EPSILON`) count as ties and resolve to
//! the lower-indexed centroid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::vectorizer::FeatureMatrix;
use crate::error::ClusterError;

/// Lloyd iteration cap per restart.
const MAX_ITERATIONS: usize = 100;

/// Upper bound on seeding restarts.
const MAX_RESTARTS: usize = 10;

/// Distances closer than this are treated as equal.
const TIE_EPSILON: f64 = 1e-9;

/// Partition the matrix rows into `k` clusters.
///
/// Returns one label in `[0, k)` per row, aligned with row order. Fails with
/// `ClusterError::InsufficientData` when there are fewer rows than clusters;
/// K is never silently reduced.
pub fn assign_clusters(
    matrix: &FeatureMatrix,
    k: usize,
    seed: u64,
) -> Result<Vec<usize>, ClusterError> {
    let rows = &matrix.rows;
    let n = rows.len();
    if k == 0 || n < k {
        return Err(ClusterError::InsufficientData {
            have: n,
            requested: k,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let offset = rng.gen_range(0..n);
    let restarts = n.min(MAX_RESTARTS);

    let mut best: Option<(f64, Vec<usize>)> = None;
    for r in 0..restarts {
        let first = (offset + r) % n;
        let centroids = seed_centroids(rows, k, first);
        let (labels, score) = run_lloyd(rows, centroids, k);
        let improved = best.as_ref().is_none_or(|(s, _)| score + TIE_EPSILON < *s);
        if improved {
            best = Some((score, labels));
        }
    }

    // restarts >= 1, so the sweep always produced a candidate.
    best.map(|(_, labels)| labels)
        .ok_or(ClusterError::InsufficientData {
            have: n,
            requested: k,
        })
}

// ── Seeding ─────────────────────────────────────────────────────────

/// Farthest-point seeding: start from `first`, then repeatedly take the row
/// with the greatest distance to its nearest chosen centroid.
fn seed_centroids(rows: &[Vec<f64>], k: usize, first: usize) -> Vec<Vec<f64>> {
    let n = rows.len();
    let mut chosen = Vec::with_capacity(k);
    chosen.push(first);

    let mut min_dist: Vec<f64> = rows.iter().map(|r| distance_sq(r, &rows[first])).collect();

    while chosen.len() < k {
        let mut next = n;
        let mut next_dist = f64::NEG_INFINITY;
        for (i, &d) in min_dist.iter().enumerate() {
            if chosen.contains(&i) {
                continue;
            }
            if next == n || d > next_dist + TIE_EPSILON {
                next = i;
                next_dist = d;
            }
        }
        debug_assert!(next < n, "k <= n guarantees an unchosen row");
        chosen.push(next);
        for (i, slot) in min_dist.iter_mut().enumerate() {
            let d = distance_sq(&rows[i], &rows[next]);
            if d < *slot {
                *slot = d;
            }
        }
    }

    chosen.into_iter().map(|i| rows[i].clone()).collect()
}

// ── Lloyd iterations ────────────────────────────────────────────────

fn run_lloyd(rows: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, k: usize) -> (Vec<usize>, f64) {
    let mut labels = assign_all(rows, &centroids);

    for _ in 0..MAX_ITERATIONS {
        recompute_centroids(rows, &labels, k, &mut centroids);
        let next = assign_all(rows, &centroids);
        if next == labels {
            break;
        }
        labels = next;
    }

    let score = wcss(rows, &labels, &centroids);
    (labels, score)
}

fn assign_all(rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    rows.iter().map(|r| nearest_centroid(r, centroids)).collect()
}

/// Index of the nearest centroid; ties go to the lower index.
fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = distance_sq(row, &centroids[0]);
    for (c, centroid) in centroids.iter().enumerate().skip(1) {
        let d = distance_sq(row, centroid);
        if d + TIE_EPSILON < best_dist {
            best = c;
            best_dist = d;
        }
    }
    best
}

/// Replace each centroid with the mean of its assigned rows. A cluster left
/// empty is re-seeded on the row farthest from its current centroid, so every
/// cluster can recover members on the next assignment pass.
fn recompute_centroids(
    rows: &[Vec<f64>],
    labels: &[usize],
    k: usize,
    centroids: &mut [Vec<f64>],
) {
    let dim = rows[0].len();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (row, &c) in rows.iter().zip(labels) {
        counts[c] += 1;
        for (slot, w) in sums[c].iter_mut().zip(row) {
            *slot += w;
        }
    }

    for c in 0..k {
        if counts[c] == 0 {
            continue;
        }
        for slot in sums[c].iter_mut() {
            *slot /= counts[c] as f64;
        }
        centroids[c] = std::mem::take(&mut sums[c]);
    }

    let mut relocated: Vec<usize> = Vec::new();
    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }
        let mut far = 0;
        let mut far_dist = f64::NEG_INFINITY;
        for (i, row) in rows.iter().enumerate() {
            if relocated.contains(&i) {
                continue;
            }
            let d = distance_sq(row, &centroids[labels[i]]);
            if d > far_dist + TIE_EPSILON {
                far = i;
                far_dist = d;
            }
        }
        centroids[c] = rows[far].clone();
        relocated.push(far);
    }
}

fn wcss(rows: &[Vec<f64>], labels: &[usize], centroids: &[Vec<f64>]) -> f64 {
    rows.iter()
        .zip(labels)
        .map(|(row, &c)| distance_sq(row, &centroids[c]))
        .sum()
}

fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::vectorizer::vectorize;

    fn matrix_of(subjects: &[&str]) -> FeatureMatrix {
        vectorize(subjects).unwrap()
    }

    #[test]
    fn labels_cover_input_and_stay_in_range() {
        let matrix = matrix_of(&[
            "standup notes monday",
            "standup notes tuesday",
            "flash sale tonight",
            "flash sale tomorrow",
        ]);
        let labels = assign_clusters(&matrix, 2, 42).unwrap();
        assert_eq!(labels.len(), 4);
        assert!(labels.iter().all(|&c| c < 2));
    }

    #[test]
    fn identical_runs_yield_identical_labels() {
        let matrix = matrix_of(&[
            "invoice payment due",
            "standup notes monday",
            "weekend sale discount",
            "invoice payment reminder",
            "notes from standup",
        ]);
        let a = assign_clusters(&matrix, 2, 42).unwrap();
        let b = assign_clusters(&matrix, 2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fewer_rows_than_clusters_is_insufficient_data() {
        let matrix = matrix_of(&["meeting notes", "sale today"]);
        let result = assign_clusters(&matrix, 3, 42);
        assert!(matches!(
            result,
            Err(ClusterError::InsufficientData {
                have: 2,
                requested: 3
            })
        ));
    }

    #[test]
    fn zero_clusters_is_insufficient_data() {
        let matrix = matrix_of(&["meeting notes"]);
        assert!(matches!(
            assign_clusters(&matrix, 0, 42),
            Err(ClusterError::InsufficientData { .. })
        ));
    }

    #[test]
    fn single_cluster_takes_everything() {
        let matrix = matrix_of(&["alpha report", "beta report", "gamma report"]);
        let labels = assign_clusters(&matrix, 1, 42).unwrap();
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn as_many_clusters_as_rows_makes_singletons() {
        let matrix = matrix_of(&["alpha one", "beta two", "gamma three"]);
        let labels = assign_clusters(&matrix, 3, 42).unwrap();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn near_duplicate_subjects_share_a_cluster() {
        let matrix = matrix_of(&[
            "project phoenix kickoff",
            "project phoenix kickoff agenda",
            "gym membership renewal",
        ]);
        let labels = assign_clusters(&matrix, 2, 42).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn seed_changes_do_not_break_partition_shape() {
        let matrix = matrix_of(&[
            "invoice payment due",
            "invoice payment reminder",
            "standup notes monday",
            "standup notes tuesday",
        ]);
        for seed in [0, 1, 42, 9999] {
            let labels = assign_clusters(&matrix, 2, seed).unwrap();
            assert_eq!(labels.len(), 4);
            assert!(labels.iter().all(|&c| c < 2));
            // The two invoice subjects always agree, as do the two standups.
            assert_eq!(labels[0], labels[1]);
            assert_eq!(labels[2], labels[3]);
        }
    }
}
