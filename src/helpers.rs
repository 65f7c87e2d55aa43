use crate::memory::Primitive;
use rand::{Rng, RngCore};

/// Uniform draw from `[min, max)`. A degenerate range yields `min`.
pub(crate) fn random_between<T: Primitive>(rnd: &mut dyn RngCore, min: T, max: T) -> T {
    if !(min < max) {
        return min;
    }
    rnd.gen_range(min..max)
}

/// Lossless conversion of the small integral values used for counts and indices.
#[inline(always)]
pub(crate) fn cast<T: Primitive>(v: usize) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-6))
}



#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	fn random_between_stays_in_range() {
		let mut rnd = StdRng::seed_from_u64(1337);
		for _ in 0..1000 {
			let v: f64 = random_between(&mut rnd, -50.0, 50.0);
			assert!((-50.0..50.0).contains(&v));
		}
	}

	#[test]
	fn random_between_degenerate_range() {
		let mut rnd = StdRng::seed_from_u64(1337);
		assert_eq!(random_between(&mut rnd, 3.0f32, 3.0), 3.0);
		assert_eq!(random_between(&mut rnd, 0.0f32, -1.0), 0.0);
	}
}
