use crate::{api::{Point, Sample}, error::{Error, Result}, helpers, memory::*};
use rand::RngCore;

/// Append `count` samples, scattered uniformly around `center` by at most `radius` per axis.
///
/// ## Arguments
/// - **samples**: Collection the new samples are appended to (existing entries are left untouched)
/// - **center**: Center of the new blob
/// - **count**: Amount of samples to generate
/// - **radius**: Maximum per-axis offset from **center**
/// - **rnd**: Random generator to draw the offsets from
///
/// ## Errors
/// - [`Error::InvalidConfig`] when **center** is not finite, or **radius** is negative, not finite, or
///   spans a range that can not be represented (`center ± radius`, `2 * radius`). Nothing is appended.
/// - [`Error::Allocation`] when the collection can not grow. The collection keeps all samples
///   appended before the failure.
pub fn generate_samples<T: Primitive>(samples: &mut Vec<Sample<T>>, center: Point<T>, count: usize, radius: T,
                rnd: &mut dyn RngCore) -> Result<()> {
    check_extent(center, radius)?;
    for _ in 0..count {
        let x = center.x + helpers::random_between(rnd, -radius, radius);
        let y = center.y + helpers::random_between(rnd, -radius, radius);
        try_push(samples, Sample::new(x, y))
            .map_err(|source| Error::Allocation { collection: "samples", source })?;
    }
    Ok(())
}

fn check_extent<T: Primitive>(center: Point<T>, radius: T) -> Result<()> {
    if !center.x.is_finite() || !center.y.is_finite() {
        return Err(Error::invalid("center", format!("must be finite, got ({}, {})", center.x, center.y)));
    }
    if !radius.is_finite() || radius < T::zero() {
        return Err(Error::invalid("radius", format!("must be a non-negative finite number, got {}", radius)));
    }
    let bounds = [radius + radius, center.x - radius, center.x + radius, center.y - radius, center.y + radius];
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(Error::invalid("radius", format!("{} around ({}, {}) leaves the representable range", radius, center.x, center.y)));
    }
    Ok(())
}

/// Centers of the four blobs the reference scene is made of, derived from the region size.
/// Starting in the middle of the region, the center is moved down, then right, then back left.
pub fn reference_centers<T: Primitive>(width: T, height: T) -> [Point<T>; 4] {
    let two = T::one() + T::one();
    let seven_tenths = T::from(0.7).unwrap_or_else(T::zero);

    let first = Point::new(width / two, height / two);
    let second = Point::new(first.x, first.y + first.y / two);
    let third = Point::new(second.x + second.x / two, second.y);
    let fourth = Point::new(third.x - third.x * seven_tenths, third.y);
    [first, second, third, fourth]
}
