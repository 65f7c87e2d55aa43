use crate::{api::Point, memory::*, variants::lloyd::squared_distance};

/// Squared displacement below which a centroid counts as settled, unless configured otherwise.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Check whether the centroid set stabilized between two consecutive update steps.
///
/// ## Returns
/// - **false** if the two sets differ in size
/// - **false** if any centroid moved by a squared distance of more than **epsilon**
/// - **true** otherwise
///
/// A `NaN` displacement never counts as settled, so a centroid that turned into `NaN` keeps
/// the set from converging.
pub fn converged<T: Primitive>(previous: &[Point<T>], current: &[Point<T>], epsilon: T) -> bool {
	if previous.len() != current.len() {
		return false;
	}
	previous.iter().zip(current.iter())
		.all(|(p, c)| squared_distance(p.x, p.y, c) <= epsilon)
}

/// Largest squared displacement of any centroid between the two sets. `NaN` if any centroid is `NaN`.
pub fn max_displacement<T: Primitive>(previous: &[Point<T>], current: &[Point<T>]) -> T {
	previous.iter().zip(current.iter())
		.map(|(p, c)| squared_distance(p.x, p.y, c))
		.fold(T::zero(), |acc, d| if d.is_nan() || acc.is_nan() { T::nan() } else { acc.max(d) })
}
