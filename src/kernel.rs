/**
 * Gaussian proximity kernel
 *
 * A cube of `size^3` weights, `exp(-d^2 / (2 sigma^2))` where `d` is the
 * distance from the centre cell. Weights are not normalised; only the relative
 * ordering of accumulated energies matters to the search.
 *
 * The non-zero cells are also kept as a flat list of (offset, weight) taps so
 * the engine can splat the kernel without walking the cube on every toggle.
 */

use crate::error::{GeneratorError, Result};
use crate::field::{Dims, ScalarField};
use crate::vec3::Vec3;

/// Immutable 3D Gaussian kernel
#[derive(Debug, Clone)]
pub struct Kernel {
    size: usize,
    sigma: f32,
    weights: ScalarField,
    taps: Vec<(Vec3, f32)>,
}

impl Kernel {
    /// Build a Gaussian kernel of odd edge length `size`
    pub fn gaussian(size: usize, sigma: f32) -> Result<Self> {
        if size % 2 == 0 || size > i32::MAX as usize {
            return Err(GeneratorError::InvalidKernelSize(size));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(GeneratorError::InvalidSigma(sigma));
        }

        let center = Self::center_of(size);
        let inv_two_sigma2 = 1.0 / (2.0 * sigma * sigma);
        let weights = ScalarField::from_fn(Dims::cube(size), |cell| {
            let d2 = (cell - center).length_squared() as f32;
            (-d2 * inv_two_sigma2).exp()
        });

        let taps = (0..weights.dims().volume())
            .map(|i| (weights.dims().coord_of(i) - center, weights.at(i)))
            .filter(|&(_, w)| w > 0.0)
            .collect();

        Ok(Self {
            size,
            sigma,
            weights,
            taps,
        })
    }

    fn center_of(size: usize) -> Vec3 {
        let c = (size / 2) as i32;
        Vec3::new(c, c, c)
    }

    /// Edge length of the kernel cube
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gaussian sigma the kernel was built with
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Number of cells in the kernel cube
    pub fn volume(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Weight at an offset from the kernel centre, zero outside the cube
    pub fn weight(&self, offset: Vec3) -> f32 {
        let half = (self.size / 2) as i32;
        let inside = |c: i32| c.abs() <= half;
        if inside(offset.x) && inside(offset.y) && inside(offset.z) {
            self.weights.get(offset + Self::center_of(self.size))
        } else {
            0.0
        }
    }

    /// Sum of all kernel weights
    pub fn total_weight(&self) -> f32 {
        self.weights.as_slice().iter().sum()
    }

    /// Non-zero (offset from centre, weight) pairs
    #[inline]
    pub fn taps(&self) -> &[(Vec3, f32)] {
        &self.taps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            Kernel::gaussian(4, 1.0).unwrap_err(),
            GeneratorError::InvalidKernelSize(4)
        );
        assert_eq!(
            Kernel::gaussian(0, 1.0).unwrap_err(),
            GeneratorError::InvalidKernelSize(0)
        );
        assert!(matches!(
            Kernel::gaussian(3, 0.0),
            Err(GeneratorError::InvalidSigma(_))
        ));
        assert!(matches!(
            Kernel::gaussian(3, -1.3),
            Err(GeneratorError::InvalidSigma(_))
        ));
        assert!(matches!(
            Kernel::gaussian(3, f32::NAN),
            Err(GeneratorError::InvalidSigma(_))
        ));
    }

    #[test]
    fn test_center_weight_is_one() {
        let kernel = Kernel::gaussian(17, 1.4).unwrap();
        assert_eq!(kernel.weight(Vec3::default()), 1.0);
        assert_eq!(kernel.volume(), 17 * 17 * 17);
    }

    #[test]
    fn test_gaussian_values() {
        let sigma = 1.0f32;
        let kernel = Kernel::gaussian(3, sigma).unwrap();
        let expect = |d2: f32| (-d2 / (2.0 * sigma * sigma)).exp();

        assert!((kernel.weight(Vec3::new(1, 0, 0)) - expect(1.0)).abs() < 1e-6);
        assert!((kernel.weight(Vec3::new(1, 1, 0)) - expect(2.0)).abs() < 1e-6);
        assert!((kernel.weight(Vec3::new(-1, 1, -1)) - expect(3.0)).abs() < 1e-6);
        assert_eq!(kernel.weight(Vec3::new(2, 0, 0)), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let kernel = Kernel::gaussian(5, 1.3).unwrap();
        for &(offset, w) in kernel.taps() {
            let mirrored = Vec3::default() - offset;
            assert_eq!(kernel.weight(mirrored), w);
            let swapped = Vec3::new(offset.z, offset.x, offset.y);
            assert!((kernel.weight(swapped) - w).abs() < 1e-7);
        }
    }

    #[test]
    fn test_taps_cover_kernel() {
        let kernel = Kernel::gaussian(5, 1.3).unwrap();
        assert_eq!(kernel.taps().len(), 125);
        let tap_sum: f32 = kernel.taps().iter().map(|&(_, w)| w).sum();
        assert!((tap_sum - kernel.total_weight()).abs() < 1e-4);
    }

    #[test]
    fn test_size_one_kernel() {
        let kernel = Kernel::gaussian(1, 1.0).unwrap();
        assert_eq!(kernel.taps(), &[(Vec3::default(), 1.0)]);
    }
}
