/**
 * Layer export
 *
 * Writes a dither volume as one 8-bit grayscale PNG per axis-2 layer and
 * reads such a directory back. Pixel values are `round(rank * 256)` clamped
 * to 255, the same threshold levels `DitherVolume::threshold_layer` gives.
 *
 * Export failures never touch the volume itself; callers can report them and
 * keep using the ranks in memory.
 */

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma};
use log::{debug, info};
use thiserror::Error;

use crate::generator::DitherVolume;

/// File name prefix used when none is given
pub const DEFAULT_LAYER_PREFIX: &str = "layer_";

/// Error types for layer export and import
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to create or read the layer directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode, decode or write a layer image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The directory holds no layer matching the prefix
    #[error("No layers found in {0}")]
    NoLayers(PathBuf),

    /// A layer does not have the size of the first one
    #[error("Layer {layer} is {found:?}, expected {expected:?}")]
    LayerSizeMismatch {
        /// Index of the offending layer
        layer: usize,
        /// Size of layer 0
        expected: (u32, u32),
        /// Size of the offending layer
        found: (u32, u32),
    },
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// File name of layer `z`
pub fn layer_file_name(prefix: &str, z: usize) -> String {
    format!("{prefix}{z}.png")
}

/// Default output directory for a cubic volume of edge `size`
pub fn default_output_dir(size: usize) -> PathBuf {
    PathBuf::from(format!("{size}x{size}x{size}"))
}

/**
 * Save every layer of the volume as `<dir>/<prefix><z>.png`
 *
 * Creates `dir` if it does not exist and returns it.
 */
pub fn save_layers<P: AsRef<Path>>(
    volume: &DitherVolume,
    dir: P,
    prefix: &str,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let dims = volume.dims();
    for z in 0..dims.d2 {
        let levels = volume.threshold_layer(z);
        let img: GrayImage = ImageBuffer::from_fn(dims.d0 as u32, dims.d1 as u32, |x, y| {
            Luma([levels[y as usize * dims.d0 + x as usize]])
        });
        let path = dir.join(layer_file_name(prefix, z));
        img.save(&path)?;
        debug!("wrote {}", path.display());
    }

    info!("Saved {} layers to {}", dims.d2, dir.display());
    Ok(dir.to_path_buf())
}

/// Stack of 8-bit layers, as exported or loaded back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    width: usize,
    height: usize,
    layers: Vec<Vec<u8>>,
}

impl LayerStack {
    /// Threshold levels of every layer of a volume
    pub fn from_volume(volume: &DitherVolume) -> Self {
        let dims = volume.dims();
        Self {
            width: dims.d0,
            height: dims.d1,
            layers: (0..dims.d2).map(|z| volume.threshold_layer(z)).collect(),
        }
    }

    /// Load `<prefix>0.png`, `<prefix>1.png`, ... until the first gap
    pub fn load<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut layers = Vec::new();
        let mut size = None;

        loop {
            let path = dir.join(layer_file_name(prefix, layers.len()));
            if !path.is_file() {
                break;
            }
            let gray = image::open(&path)?.to_luma8();
            let found = gray.dimensions();
            match size {
                None => size = Some(found),
                Some(expected) if expected != found => {
                    return Err(ExportError::LayerSizeMismatch {
                        layer: layers.len(),
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            layers.push(gray.into_raw());
        }

        let (width, height) = size.ok_or_else(|| ExportError::NoLayers(dir.to_path_buf()))?;
        Ok(Self {
            width: width as usize,
            height: height as usize,
            layers,
        })
    }

    /// Layer width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Layer height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Pixels of layer `z`, rows of `width` values
    pub fn layer(&self, z: usize) -> &[u8] {
        &self.layers[z]
    }

    /// Threshold level at a voxel (with tiling)
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        let layer = &self.layers[z % self.layers.len()];
        layer[(y % self.height) * self.width + x % self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Dims, ScalarField};

    fn ramp_volume() -> DitherVolume {
        let dims = Dims::new(4, 3, 2);
        let n = dims.volume() as f32;
        DitherVolume::from_ranks(ScalarField::from_fn(dims, |c| {
            dims.index_of(c) as f32 / n
        }))
    }

    #[test]
    fn test_layer_file_name() {
        assert_eq!(layer_file_name("layer_", 0), "layer_0.png");
        assert_eq!(layer_file_name("slice-", 17), "slice-17.png");
        assert_eq!(default_output_dir(32), PathBuf::from("32x32x32"));
    }

    #[test]
    fn test_save_and_load_layers() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let volume = ramp_volume();

        let written = save_layers(&volume, &dir, DEFAULT_LAYER_PREFIX).unwrap();
        assert_eq!(written, dir);
        assert!(dir.join("layer_0.png").is_file());
        assert!(dir.join("layer_1.png").is_file());
        assert!(!dir.join("layer_2.png").exists());

        let stack = LayerStack::load(&dir, DEFAULT_LAYER_PREFIX).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!((stack.width(), stack.height()), (4, 3));
        assert_eq!(stack, LayerStack::from_volume(&volume));
    }

    #[test]
    fn test_pixel_values() {
        let volume = ramp_volume();
        let stack = LayerStack::from_volume(&volume);
        // rank 13/24 at (1, 0, 1)
        assert_eq!(stack.get(1, 0, 1), (13.0f32 / 24.0 * 256.0).round() as u8);
        assert_eq!(stack.get(0, 0, 0), 0);
        // rank 23/24 at (3, 2, 1)
        assert_eq!(stack.get(3, 2, 1), 245);
        assert_eq!(stack.get(5, 3, 3), stack.get(1, 0, 1));
    }

    #[test]
    fn test_load_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = LayerStack::load(tmp.path().join("nothing"), DEFAULT_LAYER_PREFIX).unwrap_err();
        assert!(matches!(err, ExportError::NoLayers(_)));
    }

    #[test]
    fn test_load_rejects_mismatched_layers() {
        let tmp = tempfile::tempdir().unwrap();
        GrayImage::new(4, 4).save(tmp.path().join("layer_0.png")).unwrap();
        GrayImage::new(4, 5).save(tmp.path().join("layer_1.png")).unwrap();

        let err = LayerStack::load(tmp.path(), DEFAULT_LAYER_PREFIX).unwrap_err();
        assert!(matches!(
            err,
            ExportError::LayerSizeMismatch {
                layer: 1,
                expected: (4, 4),
                found: (4, 5)
            }
        ));
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("occupied");
        fs::write(&blocker, b"not a directory").unwrap();

        assert!(save_layers(&ramp_volume(), blocker.join("out"), DEFAULT_LAYER_PREFIX).is_err());
    }
}
