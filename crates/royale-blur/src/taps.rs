use crate::kernels::GaussianKernel1d;

/// One bilinear fetch standing in for up to two adjacent kernel taps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearTap {
    /// Offset from the centre in texels, non-negative.
    pub offset: f32,
    /// Combined unnormalized weight of the merged taps.
    pub weight: f32,
}

/// A kernel whose taps were merged pairwise into bilinear fetches.
///
/// Only taps with non-negative offsets are stored. Each one is fetched at `+offset`
/// and `-offset`, except the centre tap of an even-radius kernel which is fetched
/// once.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedKernel {
    taps: Vec<LinearTap>,
    split_centre: bool,
    weight_sum_inv: f32,
}

impl CompressedKernel {
    /// The taps with non-negative offsets, ordered by offset.
    pub fn half_taps(&self) -> &[LinearTap] {
        &self.taps
    }

    /// Whether the centre weight was split between the two innermost fetches.
    pub fn split_centre(&self) -> bool {
        self.split_centre
    }

    /// Offset signs at which the tap at `index` is fetched.
    pub fn mirror_signs(&self, index: usize) -> &'static [f32] {
        if index == 0 && !self.split_centre {
            &[1.0]
        } else {
            &[1.0, -1.0]
        }
    }

    /// Total number of fetches for one 1D evaluation.
    pub fn fetches(&self) -> usize {
        (0..self.taps.len()).map(|i| self.mirror_signs(i).len()).sum()
    }

    /// The normalization factor inherited from the source kernel.
    pub fn weight_sum_inv(&self) -> f32 {
        self.weight_sum_inv
    }

    /// Sum of the weights of every fetch, equal to the source kernel's unnormalized sum.
    pub fn weight_sum(&self) -> f32 {
        self.taps
            .iter()
            .enumerate()
            .map(|(i, tap)| tap.weight * self.mirror_signs(i).len() as f32)
            .sum()
    }
}

/// Merge adjacent taps of a kernel into bilinear fetches.
///
/// A fetch at `i + r`, with `r = w(i+1) / (w(i) + w(i+1))`, returns
/// `(1 - r)·s(i) + r·s(i+1)`, so weighting it by `w(i) + w(i+1)` reproduces both taps.
/// Kernels with an odd radius split the centre weight in half between the two
/// fetches adjacent to it; kernels with an even radius fetch the centre alone.
/// Both layouts take `(taps + 1) / 2` fetches.
///
/// Only valid for sources with bilinear filtering sampled at 1x scale.
///
/// # Examples
///
/// ```
/// use royale_blur::kernels::GaussianKernel1d;
/// use royale_blur::taps::compress_kernel;
///
/// let kernel = GaussianKernel1d::exact(9, 1.75);
/// let compressed = compress_kernel(&kernel);
///
/// assert_eq!(compressed.fetches(), 5);
/// assert_eq!(compressed.half_taps()[0].offset, 0.0);
/// ```
pub fn compress_kernel(kernel: &GaussianKernel1d) -> CompressedKernel {
    let w = kernel.weights();
    let radius = kernel.radius();
    let mut taps = Vec::with_capacity(radius / 2 + 1);

    // odd radius pairs (0, 1), (2, 3), ...; even radius pairs (1, 2), (3, 4), ...
    let split_centre = radius % 2 == 1;
    let first_pair = if split_centre {
        taps.push(merge_taps(0, w[0] * 0.5, w[1]));
        2
    } else {
        taps.push(LinearTap {
            offset: 0.0,
            weight: w[0],
        });
        1
    };

    for i in (first_pair..radius).step_by(2) {
        taps.push(merge_taps(i, w[i], w[i + 1]));
    }

    CompressedKernel {
        taps,
        split_centre,
        weight_sum_inv: kernel.weight_sum_inv(),
    }
}

fn merge_taps(first: usize, w0: f32, w1: f32) -> LinearTap {
    let weight = w0 + w1;
    let ratio = if weight > 0.0 { w1 / weight } else { 0.0 };
    LinearTap {
        offset: first as f32 + ratio,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fetch_counts() {
        for taps in (1..=43).step_by(2) {
            let compressed = compress_kernel(&GaussianKernel1d::exact(taps, 2.0));
            assert_eq!(compressed.fetches(), taps.div_ceil(2), "taps {taps}");
        }
    }

    #[test]
    fn split_centre_layout() {
        let kernel = GaussianKernel1d::exact(7, 1.36103515625);
        let w = kernel.weights().to_vec();
        let compressed = compress_kernel(&kernel);
        let half = compressed.half_taps();
        assert_eq!(half.len(), 2);
        assert!(compressed.split_centre());

        let w01 = 0.5 * w[0] + w[1];
        assert_relative_eq!(half[0].weight, w01);
        assert_relative_eq!(half[0].offset, w[1] / w01);

        let w23 = w[2] + w[3];
        assert_relative_eq!(half[1].weight, w23);
        assert_relative_eq!(half[1].offset, 2.0 + w[3] / w23);
    }

    #[test]
    fn nearest_centre_layout() {
        let kernel = GaussianKernel1d::exact(5, 0.9845703125);
        let w = kernel.weights().to_vec();
        let compressed = compress_kernel(&kernel);
        let half = compressed.half_taps();
        assert_eq!(half.len(), 2);

        assert_eq!(half[0], LinearTap { offset: 0.0, weight: w[0] });
        let w12 = w[1] + w[2];
        assert_relative_eq!(half[1].weight, w12);
        assert_relative_eq!(half[1].offset, 1.0 + w[2] / w12);
    }

    #[test]
    fn weights_are_preserved() {
        for taps in (1..=43).step_by(2) {
            for sigma in [0.5f32, 1.0, 3.0, 10.0] {
                let kernel = GaussianKernel1d::exact(taps, sigma);
                let compressed = compress_kernel(&kernel);
                assert_relative_eq!(
                    compressed.weight_sum(),
                    kernel.weight_sum(),
                    max_relative = 1e-5
                );
                assert_eq!(compressed.weight_sum_inv(), kernel.weight_sum_inv());
            }
        }
    }

    #[test]
    fn underflowed_pairs_fetch_at_pair_start() {
        // the outer weights underflow to zero for a tiny sigma
        let compressed = compress_kernel(&GaussianKernel1d::exact(11, 0.05));
        let last = compressed.half_taps()[2];
        assert_eq!(last.weight, 0.0);
        assert_eq!(last.offset, 4.0);

        // the split centre still counts twice at offset zero
        let first = compressed.half_taps()[0];
        assert_eq!(first, LinearTap { offset: 0.0, weight: 0.5 });
        assert_eq!(compressed.mirror_signs(0).len(), 2);
        assert_eq!(compressed.weight_sum(), 1.0);
    }
}
