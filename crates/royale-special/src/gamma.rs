use num_traits::Float;

use crate::lanes::{lit, Lanes};

/// Lanczos `g` parameter of the two-coefficient fit.
pub const LANCZOS_G: f64 = 1.12906830989;
/// First Lanczos series coefficient.
pub const LANCZOS_C0: f64 = 0.8109119309638332633713423362694399653724431;
/// Second Lanczos series coefficient.
pub const LANCZOS_C1: f64 = 0.4808354605142681877121661197951496120000040;

/// Largest argument for which [`gamma`] meets its error bound.
pub const GAMMA_MAX_ARG: f64 = 36.0;

/// Approximate the complete gamma function.
///
/// Uses a two-coefficient Lanczos approximation with a max relative error of about
/// 0.000463 for `s` in (0, 36]. `s = 0` divides by zero and yields a non-finite value.
///
/// # Examples
///
/// ```
/// use royale_special::gamma;
///
/// assert!((gamma(5.0f64) - 24.0).abs() / 24.0 < 4.63e-4);
/// ```
pub fn gamma<L: Lanes>(s: L) -> L {
    gamma_impl(s, s.map_lanes(|v| v.recip()))
}

/// [`gamma`] for callers that already hold `1 / s`.
///
/// # Arguments
///
/// * `s` - The argument, in (0, 36].
/// * `s_inv` - The reciprocal of `s`.
pub fn gamma_impl<L: Lanes>(s: L, s_inv: L) -> L {
    s.zip_lanes(s_inv, gamma_scalar)
}

// gamma(s) = gamma(s + 1) / s, with the Lanczos form evaluated for s + 1.
pub(crate) fn gamma_scalar<F: Float>(s: F, s_inv: F) -> F {
    let half = lit::<F>(0.5);
    let sph = s + half;
    let lanczos_sum = lit::<F>(LANCZOS_C0) + lit::<F>(LANCZOS_C1) / (s + F::one());
    let base = (sph + lit::<F>(LANCZOS_G)) / lit::<F>(std::f64::consts::E);
    base.powf(sph) * lanczos_sum * s_inv
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gamma_five() {
        assert_relative_eq!(gamma(5.0f64), 24.0, max_relative = 4.63e-4);
        assert_relative_eq!(gamma(5.0f32), 24.0, max_relative = 4.63e-4);
    }

    #[test]
    fn gamma_relative_error_bound() {
        let mut max_err = 0.0f64;
        for i in 1..=3600 {
            let s = i as f64 * 0.01;
            let expected = reference::gamma(s);
            max_err = max_err.max(((gamma(s) - expected) / expected).abs());
        }
        // 0.000463 rounded to the printed precision of the fit.
        assert!(max_err <= 4.65e-4, "max relative error {max_err}");
    }

    #[test]
    fn gamma_f32_tracks_f64() {
        for i in 1..=200 {
            let s = i as f32 * 0.1;
            let expected = reference::gamma(s as f64);
            assert_relative_eq!(gamma(s) as f64, expected, max_relative = 5e-4);
        }
    }

    #[test]
    fn gamma_impl_reuses_reciprocal() {
        let s = 2.75f64;
        assert_eq!(gamma_impl(s, 1.0 / s), gamma(s));
    }

    #[test]
    fn gamma_zero_is_not_finite() {
        assert!(!gamma(0.0f64).is_finite());
    }

    #[test]
    fn gamma_lanes() {
        let s = [0.5f64, 1.0, 3.0, 10.0];
        let g = gamma(s);
        for (x, y) in s.iter().zip(g.iter()) {
            assert_eq!(*y, gamma(*x));
        }
        assert_relative_eq!(g[0], std::f64::consts::PI.sqrt(), max_relative = 4.63e-4);
    }
}
