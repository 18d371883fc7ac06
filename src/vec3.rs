/**
 * Integer lattice coordinates
 *
 * A voxel is addressed by three signed components so that kernel offsets can
 * point "behind" the origin. Every lookup reduces the components modulo the
 * lattice dimensions, which is what makes the lattice a 3-torus.
 */

use std::fmt;
use std::ops::{Add, Sub};

use crate::field::Dims;

/// Integer coordinate (or offset) in a 3D lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec3 {
    /// Component along axis 0
    pub x: i32,
    /// Component along axis 1
    pub y: i32,
    /// Component along axis 2 (the layer axis)
    pub z: i32,
}

impl Vec3 {
    /// Create a coordinate from its components
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Reduce every component into `[0, dim)` for its axis
    ///
    /// Negative components wrap to the far side, so `(-1, 0, 0)` in a lattice
    /// of width 4 becomes `(3, 0, 0)`.
    #[inline]
    pub fn wrap(self, dims: Dims) -> Self {
        Self {
            x: self.x.rem_euclid(dims.d0 as i32),
            y: self.y.rem_euclid(dims.d1 as i32),
            z: self.z.rem_euclid(dims.d2 as i32),
        }
    }

    /// Squared euclidean length
    #[inline]
    pub fn length_squared(self) -> i32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub() {
        let a = Vec3::new(1, 2, 3);
        let b = Vec3::new(4, -5, 6);
        assert_eq!(a + b, Vec3::new(5, -3, 9));
        assert_eq!(a - b, Vec3::new(-3, 7, -3));
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn test_wrap_negative_and_overflow() {
        let dims = Dims::new(4, 5, 6);
        assert_eq!(Vec3::new(-1, 0, 0).wrap(dims), Vec3::new(3, 0, 0));
        assert_eq!(Vec3::new(4, 5, 6).wrap(dims), Vec3::new(0, 0, 0));
        assert_eq!(Vec3::new(-9, 11, -13).wrap(dims), Vec3::new(3, 1, 5));
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let dims = Dims::cube(7);
        let v = Vec3::new(-20, 33, 7).wrap(dims);
        assert_eq!(v.wrap(dims), v);
    }

    #[test]
    fn test_length_squared() {
        assert_eq!(Vec3::new(1, -2, 3).length_squared(), 14);
        assert_eq!(Vec3::default().length_squared(), 0);
    }
}
