use crate::{api::Point, error::{Error, Result}, helpers, memory::*};
use rand::RngCore;

/// Place `k` centroids, the `i`-th one drawn uniformly from the `i`-th of `k` equal bands along
/// each axis of the `width` x `height` region. The centroids therefore run diagonally across the
/// region, which keeps them from all starting out in the same spot.
pub fn calculate<T: Primitive>(width: T, height: T, k: usize, rnd: &mut dyn RngCore) -> Result<Vec<Point<T>>> {
    let mut centroids = Vec::new();
    centroids.try_reserve_exact(k)
        .map_err(|source| Error::Allocation { collection: "centroids", source })?;

    let kf: T = helpers::cast(k);
    let (x_band, y_band) = (width / kf, height / kf);
    for i in 0..k {
        let (lo, hi) = (helpers::cast::<T>(i), helpers::cast::<T>(i + 1));
        let x = helpers::random_between(rnd, x_band * lo, x_band * hi);
        let y = helpers::random_between(rnd, y_band * lo, y_band * hi);
        centroids.push(Point::new(x, y));
    }
    Ok(centroids)
}
