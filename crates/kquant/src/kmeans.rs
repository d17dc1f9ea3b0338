use crate::point_set::PointSet;
use crate::{Error, ZeroClustersSnafu};
use log::debug;
use rand::Rng;
use snafu::prelude::*;

// References:
// - https://en.wikipedia.org/wiki/K-means_clustering (Lloyd's algorithm)
//
// sklearn caps refinement at 300 rounds; 8-bit color data converges well
// before 100.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Everything one clustering run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    /// Surviving centroids, component-wise means truncated to `u8`.
    pub centroids: Vec<Vec<u8>>,
    /// One centroid index per input point.
    pub assignments: Vec<usize>,
    /// Refinement rounds executed.
    pub iterations: usize,
    /// Whether the run stopped because an update changed nothing.
    pub converged: bool,
}

/// Lloyd's-algorithm k-means over integer color points.
///
/// The engine owns its point set and recomputes centroids and assignments
/// from scratch on every [`run`](KMeans::run). Clusters that lose all
/// their points mid-run are dropped permanently instead of being reseeded,
/// so the final centroid count may be smaller than the requested `k` —
/// callers must treat that as a normal outcome, not an error.
#[derive(Debug)]
pub struct KMeans {
    points: PointSet,
    k: usize,
    result: Option<Clustering>,
}

impl KMeans {
    /// `k` greater than the number of points is silently clamped.
    pub fn new(points: PointSet, k: usize) -> Result<Self, Error> {
        ensure!(k >= 1, ZeroClustersSnafu);
        let k = k.min(points.len());
        Ok(Self {
            points,
            k,
            result: None,
        })
    }

    /// Cluster the point set into up to `k` groups, discarding any previous
    /// result.
    ///
    /// Seeding and one assignment pass always happen, so the result is
    /// well-defined even with `max_iterations == 0`.
    pub fn run(&mut self, rng: &mut impl Rng, max_iterations: usize) -> &Clustering {
        let mut centroids: Vec<Vec<u8>> = rand::seq::index::sample(rng, self.points.len(), self.k)
            .into_iter()
            .map(|i| self.points.point(i).to_vec())
            .collect();

        let mut assignments = vec![0usize; self.points.len()];
        assign_points(&self.points, &centroids, &mut assignments);

        let mut iterations = 0;
        let mut converged = false;
        while iterations < max_iterations {
            iterations += 1;

            let update = update_centroids(&self.points, &mut assignments, &centroids);
            centroids = update.centroids;
            converged = update.converged;
            if converged {
                debug!("k-means converged after {iterations} iterations");
                break;
            }

            assign_points(&self.points, &centroids, &mut assignments);
        }

        self.result.insert(Clustering {
            centroids,
            assignments,
            iterations,
            converged,
        })
    }

    /// The most recent run's centroids, or `None` before the first run.
    pub fn centroids(&self) -> Option<&[Vec<u8>]> {
        self.result.as_ref().map(|r| r.centroids.as_slice())
    }

    /// The most recent run's point → centroid mapping, or `None` before
    /// the first run.
    pub fn assignments(&self) -> Option<&[usize]> {
        self.result.as_ref().map(|r| r.assignments.as_slice())
    }

    pub fn result(&self) -> Option<&Clustering> {
        self.result.as_ref()
    }

    /// The cluster count this engine targets, after clamping.
    pub fn k(&self) -> usize {
        self.k
    }
}

#[inline(always)]
fn distance_squared(point: &[u8], centroid: &[u8]) -> f32 {
    point
        .iter()
        .zip(centroid)
        .map(|(&p, &c)| {
            let d = f32::from(p) - f32::from(c);
            d * d
        })
        .sum()
}

/// Nearest-centroid pass. Ties break to the lowest centroid index.
fn assign_points(points: &PointSet, centroids: &[Vec<u8>], assignments: &mut [usize]) {
    for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
        let mut min = f32::MAX;
        let mut min_idx = 0;
        for (j, centroid) in centroids.iter().enumerate() {
            let d = distance_squared(point, centroid);
            if d < min {
                min = d;
                min_idx = j;
            }
        }

        *assignment = min_idx;
    }
}

#[derive(Debug)]
struct UpdateOutcome {
    centroids: Vec<Vec<u8>>,
    converged: bool,
}

/// Mean step. Clusters that gathered no points are dropped for the rest of
/// the run; survivors are re-packed without gaps and `assignments` is
/// remapped to the compacted indices in the same pass.
fn update_centroids(
    points: &PointSet,
    assignments: &mut [usize],
    centroids: &[Vec<u8>],
) -> UpdateOutcome {
    let dims = points.dims();
    let k = centroids.len();

    let mut counts = vec![0usize; k];
    let mut sums = vec![0f64; k * dims];
    for (point, &assigned) in points.iter().zip(assignments.iter()) {
        counts[assigned] += 1;
        let sum = &mut sums[assigned * dims..(assigned + 1) * dims];
        for (s, &component) in sum.iter_mut().zip(point) {
            *s += f64::from(component);
        }
    }

    let mut new_centroids = Vec::with_capacity(k);
    let mut remap = vec![usize::MAX; k];
    let mut converged = true;
    for (j, &count) in counts.iter().enumerate() {
        if count == 0 {
            debug!("cluster {j} gathered no points, dropping it");
            continue;
        }

        remap[j] = new_centroids.len();
        // Means are truncated toward zero, not rounded; the convergence
        // check compares these stored values.
        let mean: Vec<u8> = sums[j * dims..(j + 1) * dims]
            .iter()
            .map(|&sum| (sum / count as f64) as u8)
            .collect();
        if mean != centroids[j] {
            converged = false;
        }
        new_centroids.push(mean);
    }

    for assigned in assignments.iter_mut() {
        *assigned = remap[*assigned];
    }

    UpdateOutcome {
        centroids: new_centroids,
        converged,
    }
}
