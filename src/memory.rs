use num::{NumCast, Zero, Float};
use std::{
    collections::TryReserveError,
    fmt::{Debug, Display, LowerExp}, iter::Sum, ops::{AddAssign, SubAssign}
};
use rand::distributions::uniform::SampleUniform;

/// Floating point type all calculations of this crate can be carried out in.
pub trait Primitive: AddAssign + Sum + SubAssign + Zero + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static {}
impl Primitive for f32 {}
impl Primitive for f64 {}


/// Append `item` to `vec`, growing the buffer fallibly instead of aborting the process.
pub(crate) fn try_push<T>(vec: &mut Vec<T>, item: T) -> Result<(), TryReserveError> {
    if vec.len() == vec.capacity() {
        vec.try_reserve(1)?;
    }
    vec.push(item);
    Ok(())
}

/// Allocate a buffer of `size` default-initialized elements without panicking on allocation failure.
pub(crate) fn try_alloc_default<T: Default + Clone>(size: usize) -> Result<Vec<T>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)?;
    buf.resize(size, T::default());
    Ok(buf)
}
