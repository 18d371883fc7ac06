/**
 * Toroidal Scalar Field
 *
 * Dense 3D storage of `f32` cells in row-major order
 * (`idx = x + y*d0 + z*d0*d1`). Coordinates are wrapped on every access, so
 * no coordinate is ever out of range. Each axis-2 index selects a contiguous
 * d0 x d1 layer, which is what the exporter writes out as one image.
 */

use crate::error::{GeneratorError, Result};
use crate::vec3::Vec3;

/// Lattice dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Extent along axis 0
    pub d0: usize,
    /// Extent along axis 1
    pub d1: usize,
    /// Extent along axis 2 (number of layers)
    pub d2: usize,
}

impl Dims {
    /// Create dimensions without validation
    pub const fn new(d0: usize, d1: usize, d2: usize) -> Self {
        Self { d0, d1, d2 }
    }

    /// Cubic lattice with edge length `n`
    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Create dimensions, rejecting empty or oversized axes
    pub fn checked(d0: usize, d1: usize, d2: usize) -> Result<Self> {
        let fits = |d: usize| d > 0 && d <= i32::MAX as usize;
        if !(fits(d0) && fits(d1) && fits(d2)) {
            return Err(GeneratorError::InvalidDimensions);
        }
        d0.checked_mul(d1)
            .and_then(|a| a.checked_mul(d2))
            .ok_or(GeneratorError::InvalidDimensions)?;
        Ok(Self::new(d0, d1, d2))
    }

    /// Number of voxels
    #[inline]
    pub fn volume(&self) -> usize {
        self.d0 * self.d1 * self.d2
    }

    /// Number of voxels in one axis-2 layer
    #[inline]
    pub fn layer_len(&self) -> usize {
        self.d0 * self.d1
    }

    /// Flat index of a coordinate, wrapping it first
    #[inline]
    pub fn index_of(&self, coord: Vec3) -> usize {
        let c = coord.wrap(*self);
        c.x as usize + c.y as usize * self.d0 + c.z as usize * self.layer_len()
    }

    /// Coordinate of a flat index in `[0, volume)`
    #[inline]
    pub fn coord_of(&self, idx: usize) -> Vec3 {
        let d01 = self.layer_len();
        Vec3::new(
            (idx % self.d0) as i32,
            ((idx % d01) / self.d0) as i32,
            (idx / d01) as i32,
        )
    }
}

/// Dense scalar field over a toroidal lattice
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    dims: Dims,
    cells: Vec<f32>,
}

impl ScalarField {
    /// Field with every cell set to zero
    pub fn new(dims: Dims) -> Self {
        Self::filled(dims, 0.0)
    }

    /// Field with every cell set to `value`
    pub fn filled(dims: Dims, value: f32) -> Self {
        Self {
            dims,
            cells: vec![value; dims.volume()],
        }
    }

    /// Field whose cell at each coordinate is `f(coord)`
    pub fn from_fn(dims: Dims, mut f: impl FnMut(Vec3) -> f32) -> Self {
        let cells = (0..dims.volume()).map(|i| f(dims.coord_of(i))).collect();
        Self { dims, cells }
    }

    /// Lattice dimensions
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Read the cell at a (wrapped) coordinate
    #[inline]
    pub fn get(&self, coord: Vec3) -> f32 {
        self.cells[self.dims.index_of(coord)]
    }

    /// Write the cell at a (wrapped) coordinate
    #[inline]
    pub fn set(&mut self, coord: Vec3, value: f32) {
        let idx = self.dims.index_of(coord);
        self.cells[idx] = value;
    }

    #[inline]
    pub(crate) fn at(&self, idx: usize) -> f32 {
        self.cells[idx]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, idx: usize) -> &mut f32 {
        &mut self.cells[idx]
    }

    /// The d0 x d1 layer at axis-2 index `z` (wrapped), rows along axis 0
    pub fn layer(&self, z: usize) -> &[f32] {
        let len = self.dims.layer_len();
        let start = (z % self.dims.d2) * len;
        &self.cells[start..start + len]
    }

    /// All cells in flat index order
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let dims = Dims::new(3, 4, 5);
        for idx in 0..dims.volume() {
            assert_eq!(dims.index_of(dims.coord_of(idx)), idx);
        }
    }

    #[test]
    fn test_row_major_layout() {
        let dims = Dims::new(3, 4, 5);
        assert_eq!(dims.index_of(Vec3::new(1, 0, 0)), 1);
        assert_eq!(dims.index_of(Vec3::new(0, 1, 0)), 3);
        assert_eq!(dims.index_of(Vec3::new(0, 0, 1)), 12);
        assert_eq!(dims.index_of(Vec3::new(2, 3, 4)), 59);
    }

    #[test]
    fn test_get_set_wraps() {
        let mut field = ScalarField::new(Dims::cube(4));
        field.set(Vec3::new(-1, 4, 9), 0.5);
        assert_eq!(field.get(Vec3::new(3, 0, 1)), 0.5);
        assert_eq!(field.get(Vec3::new(7, -4, -3)), 0.5);
    }

    #[test]
    fn test_layer_slices() {
        let dims = Dims::new(2, 3, 4);
        let field = ScalarField::from_fn(dims, |c| c.z as f32 * 10.0 + c.x as f32);
        let layer = field.layer(2);
        assert_eq!(layer.len(), 6);
        assert_eq!(layer, &[20.0, 21.0, 20.0, 21.0, 20.0, 21.0]);
        assert_eq!(field.layer(6), layer);
    }

    #[test]
    fn test_checked_dims() {
        assert!(Dims::checked(4, 4, 4).is_ok());
        assert!(matches!(
            Dims::checked(0, 4, 4),
            Err(GeneratorError::InvalidDimensions)
        ));
        assert!(Dims::checked(4, 4, 0).is_err());
    }
}
