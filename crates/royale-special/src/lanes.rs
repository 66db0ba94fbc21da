use num_traits::Float;

/// A scalar or a fixed-width group of floats processed element-wise.
///
/// Every special function in this crate is written once against this trait and
/// evaluated lane by lane, so `f32`, `f64`, `[f32; 4]` and friends share one
/// implementation.
///
/// # Examples
///
/// ```
/// use royale_special::Lanes;
///
/// let v = [1.0f32, 2.0, 3.0].map_lanes(|x| x * 2.0);
/// assert_eq!(v, [2.0, 4.0, 6.0]);
/// assert_eq!(<[f32; 3] as Lanes>::LANES, 3);
/// ```
pub trait Lanes: Copy + Send + Sync + 'static {
    /// The element type of each lane.
    type Scalar: Float + Send + Sync + 'static;

    /// Number of lanes.
    const LANES: usize;

    /// Build a value by evaluating `f` for every lane index.
    fn from_fn(f: impl FnMut(usize) -> Self::Scalar) -> Self;

    /// Read lane `i`.
    ///
    /// PRECONDITION: `i < Self::LANES`.
    fn lane(&self, i: usize) -> Self::Scalar;

    /// Broadcast a scalar to every lane.
    fn splat(v: Self::Scalar) -> Self {
        Self::from_fn(|_| v)
    }

    /// Apply `f` to every lane.
    fn map_lanes(self, f: impl Fn(Self::Scalar) -> Self::Scalar) -> Self {
        Self::from_fn(|i| f(self.lane(i)))
    }

    /// Combine two values lane by lane.
    fn zip_lanes(self, other: Self, f: impl Fn(Self::Scalar, Self::Scalar) -> Self::Scalar) -> Self {
        Self::from_fn(|i| f(self.lane(i), other.lane(i)))
    }
}

macro_rules! impl_scalar_lanes {
    ($($t:ty),*) => {
        $(
            impl Lanes for $t {
                type Scalar = $t;
                const LANES: usize = 1;

                #[inline]
                fn from_fn(mut f: impl FnMut(usize) -> $t) -> Self {
                    f(0)
                }

                #[inline]
                fn lane(&self, _i: usize) -> $t {
                    *self
                }
            }
        )*
    };
}

impl_scalar_lanes!(f32, f64);

impl<F, const N: usize> Lanes for [F; N]
where
    F: Float + Send + Sync + 'static,
{
    type Scalar = F;
    const LANES: usize = N;

    #[inline]
    fn from_fn(f: impl FnMut(usize) -> F) -> Self {
        std::array::from_fn(f)
    }

    #[inline]
    fn lane(&self, i: usize) -> F {
        self[i]
    }
}

/// Convert an `f64` literal into the lane scalar type.
///
/// Every float type the crate supports can represent the constants it uses, so the
/// NaN fallback is unreachable in practice.
#[inline]
pub(crate) fn lit<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}
