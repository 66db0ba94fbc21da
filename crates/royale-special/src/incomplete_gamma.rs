use num_traits::Float;

use crate::gamma::gamma_scalar;
use crate::lanes::{lit, Lanes};

/// Value of `z` above which [`normalized_ligamma`] switches from the lower series to
/// the upper continued fraction.
pub const LIGAMMA_BRANCH_THRESHOLD: f64 = 0.775075;

/// Lower incomplete gamma `γ(s, z)` from a 4-term series, accurate for small `z`.
///
/// `z^s (1/s - z/(s+1) + z²/(2s+4) - z³/(6s+18))`
///
/// # Arguments
///
/// * `s` - Shape parameter, meant for `s < 0.5`.
/// * `z` - Upper integration bound, meant for `z <= LIGAMMA_BRANCH_THRESHOLD`.
/// * `s_inv` - The reciprocal of `s`.
pub fn ligamma_small_z_impl<L: Lanes>(s: L, z: L, s_inv: L) -> L {
    L::from_fn(|i| ligamma_small_z_scalar(s.lane(i), z.lane(i), s_inv.lane(i)))
}

/// Upper incomplete gamma `Γ(s, z)` from a 4-level continued fraction, accurate for
/// large `z`.
pub fn uigamma_large_z_impl<L: Lanes>(s: L, z: L) -> L {
    s.zip_lanes(z, uigamma_large_z_scalar)
}

/// Regularized lower incomplete gamma `P(s, z) = γ(s, z) / Γ(s)` for small `s`.
///
/// Valid for `s` below roughly 0.5, where the max relative error is about 0.00182
/// near the branch threshold. Outside that range accuracy degrades continuously.
/// Both branches are evaluated and blended by a 0/1 mask so lanes never diverge.
///
/// # Examples
///
/// ```
/// use royale_special::normalized_ligamma;
///
/// let p = normalized_ligamma(0.3f64, 0.775075);
/// assert!((p - 0.8817342).abs() / 0.8817342 < 0.00182);
/// ```
pub fn normalized_ligamma<L: Lanes>(s: L, z: L) -> L {
    L::from_fn(|i| {
        let s = s.lane(i);
        let s_inv = s.recip();
        let gamma_s_inv = gamma_scalar(s, s_inv).recip();
        normalized_ligamma_scalar(s, z.lane(i), s_inv, gamma_s_inv)
    })
}

/// [`normalized_ligamma`] for callers that already hold `1 / s` and `1 / Γ(s)`.
pub fn normalized_ligamma_impl<L: Lanes>(s: L, z: L, s_inv: L, gamma_s_inv: L) -> L {
    L::from_fn(|i| {
        normalized_ligamma_scalar(s.lane(i), z.lane(i), s_inv.lane(i), gamma_s_inv.lane(i))
    })
}

fn ligamma_small_z_scalar<F: Float>(s: F, z: F, s_inv: F) -> F {
    let two = lit::<F>(2.0);
    let z2 = z * z;
    let z3 = z2 * z;
    let series = s_inv - z / (s + F::one()) + z2 / (two * s + lit(4.0))
        - z3 / (lit::<F>(6.0) * s + lit(18.0));
    z.powf(s) * series
}

fn uigamma_large_z_scalar<F: Float>(s: F, z: F) -> F {
    let zms = z - s;
    let mut d = lit::<F>(7.0) + zms;
    d = lit::<F>(5.0) + zms + (lit::<F>(3.0) * s - lit(9.0)) / d;
    d = lit::<F>(3.0) + zms + (lit::<F>(2.0) * s - lit(4.0)) / d;
    d = F::one() + zms + (s - F::one()) / d;
    z.powf(s) * (-z).exp() / d
}

fn normalized_ligamma_scalar<F: Float>(s: F, z: F, s_inv: F, gamma_s_inv: F) -> F {
    let small = ligamma_small_z_scalar(s, z, s_inv) * gamma_s_inv;
    let large = F::one() - uigamma_large_z_scalar(s, z) * gamma_s_inv;
    let mask = if z > lit(LIGAMMA_BRANCH_THRESHOLD) {
        F::one()
    } else {
        F::zero()
    };
    large * mask + small * (F::one() - mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamma::reference;
    use approx::assert_relative_eq;

    // Power series for P(s, z), converges for every z > 0.
    fn regularized_lower_reference(s: f64, z: f64) -> f64 {
        let mut term = 1.0 / s;
        let mut sum = 0.0;
        let mut n = 0.0;
        while term.abs() > 1e-18 {
            sum += term;
            n += 1.0;
            term *= z / (s + n);
        }
        z.powf(s) * (-z).exp() * sum / reference::gamma(s)
    }

    #[test]
    fn branches_agree_at_threshold() {
        let s = 0.3f64;
        let z = LIGAMMA_BRANCH_THRESHOLD;
        let gamma_s_inv = 1.0 / crate::gamma(s);
        let expected = regularized_lower_reference(s, z);

        let small = ligamma_small_z_impl(s, z, 1.0 / s) * gamma_s_inv;
        let large = 1.0 - uigamma_large_z_impl(s, z) * gamma_s_inv;

        assert_relative_eq!(small, expected, max_relative = 0.00182);
        assert_relative_eq!(large, expected, max_relative = 0.00182);
    }

    #[test]
    fn normalized_ligamma_error_bound() {
        for s in [0.1f64, 0.2, 0.3, 0.4, 0.45] {
            for i in 1..400 {
                let z = i as f64 * 0.01;
                let expected = regularized_lower_reference(s, z);
                assert_relative_eq!(
                    normalized_ligamma(s, z),
                    expected,
                    max_relative = 0.00182
                );
            }
        }
    }

    #[test]
    fn small_z_selects_series() {
        // z below the threshold must not be zeroed by the mask.
        let p = normalized_ligamma(0.25f64, 0.1);
        assert!(p > 0.4);
        assert_relative_eq!(p, regularized_lower_reference(0.25, 0.1), max_relative = 0.00182);
    }

    #[test]
    fn impl_matches_convenience() {
        let (s, z) = (0.35f64, 1.3);
        let s_inv = 1.0 / s;
        let gamma_s_inv = 1.0 / crate::gamma_impl(s, s_inv);
        assert_eq!(
            normalized_ligamma_impl(s, z, s_inv, gamma_s_inv),
            normalized_ligamma(s, z)
        );
    }

    #[test]
    fn ligamma_lanes() {
        let s = [0.2f32, 0.3, 0.4, 0.45];
        let z = [0.2f32, 0.7, 0.9, 2.0];
        let p = normalized_ligamma(s, z);
        for i in 0..4 {
            assert_eq!(p[i], normalized_ligamma(s[i], z[i]));
        }
    }
}
