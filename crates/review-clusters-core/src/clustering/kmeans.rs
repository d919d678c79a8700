//! K-means partitioning over plain `Vec<f32>` rows: Lloyd's algorithm with
//! k-means++ initialization and seeded, reproducible centroid selection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::ClusteringError;

/// K-means clusterer.
///
/// Seeded for reproducibility: the pipeline always passes an explicit seed so
/// reruns over identical input produce identical labels.
///
/// # Example
///
/// ```
/// use review_clusters_core::clustering::KMeans;
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.1, 0.1],
///     vec![9.0, 9.0],
///     vec![9.1, 9.1],
/// ];
/// let labels = KMeans::new(2).with_seed(42).fit_predict(&data).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iter: usize,
    tol: f32,
    seed: u64,
}

impl KMeans {
    /// Create a clusterer for `k` clusters with default iteration limits.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: 0,
        }
    }

    /// Set the maximum Lloyd iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the RNG seed for centroid initialization.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Partition `data`, returning one label in `[0, k)` per row.
    ///
    /// # Errors
    ///
    /// - [`ClusteringError::EmptyInput`] for no rows
    /// - [`ClusteringError::InvalidClusterCount`] when `k` exceeds the row count
    /// - [`ClusteringError::DimensionMismatch`] for ragged rows
    pub fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>, ClusteringError> {
        if data.is_empty() {
            return Err(ClusteringError::EmptyInput);
        }
        let n = data.len();
        if self.k == 0 || self.k > n {
            return Err(ClusteringError::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        let dim = data[0].len();
        for row in data {
            if row.len() != dim {
                return Err(ClusteringError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids = self.init_centroids(data, &mut rng);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            // Assignment step.
            for (i, row) in data.iter().enumerate() {
                let mut best = 0;
                let mut best_dist = f32::MAX;
                for (c, centroid) in centroids.iter().enumerate() {
                    let dist = squared_distance(row, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best = c;
                    }
                }
                labels[i] = best;
            }

            // Update step.
            let mut sums = vec![vec![0.0f32; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (row, &label) in data.iter().zip(&labels) {
                counts[label] += 1;
                for (s, v) in sums[label].iter_mut().zip(row) {
                    *s += v;
                }
            }

            let mut shift = 0.0f32;
            for c in 0..self.k {
                if counts[c] > 0 {
                    for s in sums[c].iter_mut() {
                        *s /= counts[c] as f32;
                    }
                } else {
                    // Empty cluster: re-seed from a random point.
                    let idx = rng.gen_range(0..n);
                    sums[c] = data[idx].clone();
                }
                shift += squared_distance(&centroids[c], &sums[c]);
                centroids[c] = std::mem::take(&mut sums[c]);
            }

            if shift < self.tol {
                break;
            }
        }

        Ok(labels)
    }

    /// K-means++ seeding: spread initial centroids proportionally to squared
    /// distance from the nearest already-chosen centroid.
    fn init_centroids(&self, data: &[Vec<f32>], rng: &mut ChaCha8Rng) -> Vec<Vec<f32>> {
        let n = data.len();
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(self.k);
        centroids.push(data[rng.gen_range(0..n)].clone());

        while centroids.len() < self.k {
            let distances: Vec<f32> = data
                .iter()
                .map(|row| {
                    centroids
                        .iter()
                        .map(|c| squared_distance(row, c))
                        .fold(f32::MAX, f32::min)
                })
                .collect();

            let total: f32 = distances.iter().sum();
            if total == 0.0 {
                // All points coincide with existing centroids.
                centroids.push(data[rng.gen_range(0..n)].clone());
                continue;
            }

            let threshold = rng.gen::<f32>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (i, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold {
                    selected = i;
                    break;
                }
            }
            centroids.push(data[selected].clone());
        }

        centroids
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_separates_obvious_groups() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let labels = KMeans::new(2).with_seed(42).fit_predict(&data).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);

        println!("[PASS] test_kmeans_separates_obvious_groups - labels={:?}", labels);
    }

    #[test]
    fn test_kmeans_labels_cover_all_points_in_range() {
        let data: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![i as f32 * 0.1, (i % 5) as f32])
            .collect();

        let labels = KMeans::new(5).with_seed(123).fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data: Vec<Vec<f32>> = (0..20).map(|i| vec![(i % 7) as f32, i as f32]).collect();

        let a = KMeans::new(3).with_seed(7).fit_predict(&data).unwrap();
        let b = KMeans::new(3).with_seed(7).fit_predict(&data).unwrap();

        assert_eq!(a, b, "same seed must give same labels");
    }

    #[test]
    fn test_kmeans_single_cluster_collapses_labels() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let labels = KMeans::new(1).with_seed(1).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0]);
    }

    #[test]
    fn test_kmeans_rejects_empty_input() {
        let result = KMeans::new(2).fit_predict(&[]);
        assert!(matches!(result, Err(ClusteringError::EmptyInput)));
    }

    #[test]
    fn test_kmeans_rejects_k_greater_than_n() {
        let data = vec![vec![0.0], vec![1.0]];
        let result = KMeans::new(5).fit_predict(&data);
        assert!(matches!(
            result,
            Err(ClusteringError::InvalidClusterCount { requested: 5, n_items: 2 })
        ));
    }

    #[test]
    fn test_kmeans_rejects_ragged_rows() {
        let data = vec![vec![0.0, 1.0], vec![1.0]];
        let result = KMeans::new(1).fit_predict(&data);
        assert!(matches!(result, Err(ClusteringError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_kmeans_identical_points() {
        // All-identical input must not loop or panic in k-means++ seeding.
        let data = vec![vec![1.0, 1.0]; 6];
        let labels = KMeans::new(2).with_seed(9).fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 6);
    }
}
