//! Numeric Value Module
//!
//! Compile-time capability gate for the increment operations. Only caches whose
//! value type implements [`Numeric`] expose `increment` and `increment_by`.

// == Numeric Trait ==
/// A value type that supports counter-style addition.
pub trait Numeric: Copy + Send + Sync + 'static {
    /// The unit step used by `increment`.
    const ONE: Self;

    /// Returns false for values that are not a number (float NaN).
    fn is_number(&self) -> bool;

    /// Adds `rhs`, returning None when the result leaves the representable range.
    fn try_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                const ONE: Self = 1;

                #[inline]
                fn is_number(&self) -> bool {
                    true
                }

                #[inline]
                fn try_add(self, rhs: Self) -> Option<Self> {
                    self.checked_add(rhs)
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                const ONE: Self = 1.0;

                #[inline]
                fn is_number(&self) -> bool {
                    !self.is_nan()
                }

                #[inline]
                fn try_add(self, rhs: Self) -> Option<Self> {
                    let sum = self + rhs;
                    if sum.is_finite() {
                        Some(sum)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_numeric_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_numeric_float!(f32, f64);
