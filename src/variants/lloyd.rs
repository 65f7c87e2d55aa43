use crate::{api::{Point, Sample}, memory::*, settings::EmptyClusterPolicy};
use tracing::{error, warn};

/// Per-centroid running sum of the member coordinates, used while computing the new means.
#[derive(Clone, Copy, Debug, Default)]
struct MeanAccumulator<T> {
    sum_x: T,
    sum_y: T,
    total: usize,
}

/// Outcome of one [`update`] pass.
///
/// ## Fields
/// - **skipped**: The accumulator buffer could not be allocated, centroids were left untouched
/// - **centroid_frequency**: Amount of samples assigned to each centroid
/// - **empty_clusters**: Indices of centroids without a single assigned sample
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub skipped: bool,
    pub centroid_frequency: Vec<usize>,
    pub empty_clusters: Vec<usize>,
}
impl UpdateReport {
    pub fn has_empty_clusters(&self) -> bool { !self.empty_clusters.is_empty() }
}


#[inline(always)]
pub(crate) fn squared_distance<T: Primitive>(sx: T, sy: T, c: &Point<T>) -> T {
    let (dx, dy) = (sx - c.x, sy - c.y);
    dx * dx + dy * dy
}

/// Assignment step: label every sample with the index of its nearest centroid.
///
/// Centroids are scanned in index order and a later centroid only wins on a strictly smaller
/// distance, so ties go to the lowest index. The scan starts at the first centroid with a non-NaN
/// distance, even if that distance overflowed to infinity. A sample keeps its previous label only
/// if every centroid is at a NaN distance.
///
/// ## Returns
/// Amount of samples whose label changed.
pub fn assign<T: Primitive>(centroids: &[Point<T>], samples: &mut [Sample<T>]) -> usize {
    let mut changed = 0;
    for sample in samples.iter_mut() {
        let mut best: Option<(usize, T)> = None;
        for (ci, c) in centroids.iter().enumerate() {
            let dist = squared_distance(sample.x, sample.y, c);
            if dist.is_nan() {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((ci, dist)),
            }
        }
        let best_idx = best.map(|(ci, _)| ci).or(sample.cluster);
        if best_idx != sample.cluster {
            changed += 1;
            sample.cluster = best_idx;
        }
    }
    changed
}

/// Update step: move every centroid to the mean position of the samples labelled with its index.
/// Unassigned samples do not contribute.
///
/// Centroids without members are handled according to **policy**; either way they are listed in
/// the returned report and a warning is emitted.
pub fn update<T: Primitive>(centroids: &mut [Point<T>], samples: &[Sample<T>], policy: EmptyClusterPolicy) -> UpdateReport {
    let mut means: Vec<MeanAccumulator<T>> = match try_alloc_default(centroids.len()) {
        Ok(means) => means,
        Err(e) => {
            error!(k = centroids.len(), error = %e, "could not allocate mean accumulators, skipping update");
            return UpdateReport { skipped: true, ..Default::default() };
        }
    };

    for s in samples {
        if let Some(m) = s.cluster.and_then(|ci| means.get_mut(ci)) {
            m.sum_x += s.x;
            m.sum_y += s.y;
            m.total += 1;
        }
    }

    let mut empty_clusters = Vec::new();
    for (ci, (c, m)) in centroids.iter_mut().zip(means.iter()).enumerate() {
        if m.total == 0 {
            empty_clusters.push(ci);
            if policy == EmptyClusterPolicy::KeepPosition {
                continue;
            }
        }
        // For empty clusters under the propagating policy this is 0/0 = NaN.
        let total: T = crate::helpers::cast(m.total);
        c.x = m.sum_x / total;
        c.y = m.sum_y / total;
    }
    if !empty_clusters.is_empty() {
        warn!(clusters = ?empty_clusters, ?policy, "centroids without assigned samples");
    }

    UpdateReport {
        skipped: false,
        centroid_frequency: means.iter().map(|m| m.total).collect(),
        empty_clusters,
    }
}
