use num_traits::Float;

use crate::lanes::{lit, Lanes};

/// Precision mode for the error function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErfMode {
    /// Abramowitz-Stegun rational approximation, max absolute error below 2.5e-5.
    #[default]
    Accurate,
    /// Scaled hyperbolic tangent. Visually acceptable but with a max absolute error
    /// around 0.019, and only as good as the platform `tanh`.
    Fast,
}

/// Evaluate the error function with the requested precision.
///
/// # Arguments
///
/// * `x` - The argument, a scalar or lane group.
/// * `mode` - Which approximation to use.
///
/// # Examples
///
/// ```
/// use royale_special::{erf, ErfMode};
///
/// let y = erf(1.0f64, ErfMode::Accurate);
/// assert!((y - 0.8427007929).abs() < 2.5e-5);
/// ```
pub fn erf<L: Lanes>(x: L, mode: ErfMode) -> L {
    match mode {
        ErfMode::Accurate => erf6(x),
        ErfMode::Fast => erft(x),
    }
}

/// Accurate error function, `1 - t(a1 + t(a2 + t·a3))·exp(-x²)` with
/// `t = 1 / (1 + 0.47047|x|)`, evaluated on `|x|` and mirrored by sign.
///
/// Max absolute error is below 2.5e-5 over the real line.
pub fn erf6<L: Lanes>(x: L) -> L {
    x.map_lanes(erf6_scalar)
}

/// Fast error function, `tanh(1.20276058 x)`.
pub fn erft<L: Lanes>(x: L) -> L {
    x.map_lanes(|v| (v * lit(1.202760580)).tanh())
}

fn erf6_scalar<F: Float>(x: F) -> F {
    let t = F::one() / (F::one() + lit::<F>(0.47047) * x.abs());
    let poly = t * (lit::<F>(0.3480242) + t * (lit::<F>(-0.0958798) + t * lit::<F>(0.7478556)));
    let y = F::one() - poly * (-x * x).exp();
    if x < F::zero() {
        -y
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Maclaurin series, accurate to ~1e-9 on [-4, 4] in f64.
    fn erf_reference(x: f64) -> f64 {
        let x2 = x * x;
        let mut term = x;
        let mut sum = x;
        for n in 1..200 {
            term *= -x2 / n as f64;
            let contrib = term / (2 * n + 1) as f64;
            sum += contrib;
            if contrib.abs() < 1e-17 {
                break;
            }
        }
        sum * 2.0 / std::f64::consts::PI.sqrt()
    }

    #[test]
    fn erf_accurate_error_bound() {
        let mut max_err = 0.0f64;
        for i in -400..=400 {
            let x = i as f64 * 0.01;
            max_err = max_err.max((erf6(x) - erf_reference(x)).abs());
        }
        assert!(max_err <= 2.5e-5, "max error {max_err}");
    }

    #[test]
    fn erf_accurate_f32() {
        for i in -40..=40 {
            let x = i as f32 * 0.1;
            let expected = erf_reference(x as f64) as f32;
            assert_relative_eq!(erf6(x), expected, epsilon = 3e-5);
        }
    }

    #[test]
    fn erf_is_odd_and_bounded() {
        assert_relative_eq!(erf6(0.0f64), 0.0, epsilon = 1e-7);
        assert_relative_eq!(erf6(-0.7f64), -erf6(0.7f64));
        assert!(erf6(10.0f64) <= 1.0);
        assert!(erf6(f64::NAN).is_nan());
    }

    #[test]
    fn erf_fast_is_coarse() {
        let mut max_err = 0.0f64;
        for i in -400..=400 {
            let x = i as f64 * 0.01;
            max_err = max_err.max((erft(x) - erf_reference(x)).abs());
        }
        assert!(max_err < 0.02, "max error {max_err}");
        assert!(max_err > 2.5e-5);
    }

    #[test]
    fn erf_lanes_match_scalars() {
        let xs = [-1.5f32, -0.25, 0.0, 0.5, 2.0];
        let ys = erf(xs, ErfMode::Accurate);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(*y, erf(*x, ErfMode::Accurate));
        }
        let fast = erf([0.3f64; 4], ErfMode::Fast);
        assert_eq!(fast, [erft(0.3f64); 4]);
    }
}
