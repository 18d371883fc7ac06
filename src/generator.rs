/**
 * 3D Dither Volume Generator using the Void-and-Cluster Algorithm
 *
 * Ulichney's void-and-cluster method, carried over from 2D images to an
 * N x N x N lattice with a 3D Gaussian kernel and toroidal neighbourhoods.
 * Read layer by layer, every threshold of the finished volume is a blue noise
 * pattern, and so is every slice through it along the layer axis.
 *
 * GENERATION PHASES
 * =================
 *
 * Initial sampling
 *   - Turn on a small number of distinct random voxels
 *
 * Initial balancing
 *   - Move the tightest cluster into the largest void until the voxel just
 *     removed is the one that gets picked again
 *
 * Initial ranking
 *   - Remove the initial points from the tightest clusters first, giving
 *     them ranks from (initial count - 1) down to 0
 *
 * Dense ranking
 *   - Keep filling the largest void, ranks initial count .. volume - 1
 *
 * Filling the largest void of the ones is the same search as removing the
 * tightest cluster of the zeros, so the 2D method's third phase (invert the
 * pattern and remove clusters) collapses into the second one here. Cluster
 * tracking is switched off for it since only voids are queried.
 *
 * Energy is never recomputed from scratch: every toggle splats the kernel
 * into the energy field and re-keys the touched voxels in ordered sets, see
 * [`crate::engine`].
 *
 * REFERENCES
 * ==========
 * - Ulichney, R. (1993). "Void-and-cluster method for dither array generation"
 *   Proceedings of SPIE 1913, Human Vision, Visual Processing, and Digital
 *   Display IV. https://doi.org/10.1117/12.152707
 */

use std::time::Instant;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::VoidClusterEngine;
use crate::error::{GeneratorError, Result};
use crate::field::{Dims, ScalarField};
use crate::kernel::Kernel;
use crate::progress::Progress;
use crate::vec3::Vec3;

/// Content value of initial-pattern voxels before they receive a rank
pub const INITIAL_SENTINEL: f32 = 1.0;

/// Default fraction of the volume seeded in the initial pattern
///
/// About 0.85%, which lands on (6^3 + 7^3) / 2 = 279 points for a 32^3 volume.
/// The 10% of the 2D method is far too dense in 3D.
pub const DEFAULT_INITIAL_DENSITY: f64 = 0.0085;

/// Number of threshold levels in exported layers
pub const THRESHOLD_LEVELS: f32 = 256.0;

/// Configuration for dither volume generation
#[derive(Debug, Clone, PartialEq)]
pub struct BlueNoiseConfig {
    /// Edge length of the cubic lattice in voxels
    pub size: usize,
    /// Gaussian kernel sigma (1.3-1.4 works well in 3D)
    pub sigma: f32,
    /// Edge length of the kernel cube, must be odd
    pub kernel_size: usize,
    /// Number of voxels in the initial pattern, derived from
    /// `initial_density` when not set
    pub initial_count: Option<usize>,
    /// Fraction of the volume used to derive the initial count
    pub initial_density: f64,
    /// Random seed, `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Redraw progress every this many steps, 0 disables progress output
    pub report_interval: usize,
    /// Safety cap on balancing swaps, defaults to ten times the volume
    pub max_balancing_iterations: Option<usize>,
}

impl Default for BlueNoiseConfig {
    fn default() -> Self {
        Self {
            size: 32,
            sigma: 1.4,
            kernel_size: 17,
            initial_count: None,
            initial_density: DEFAULT_INITIAL_DENSITY,
            seed: Some(0),
            report_interval: 0,
            max_balancing_iterations: None,
        }
    }
}

impl BlueNoiseConfig {
    /// Lattice dimensions, validated
    pub fn dims(&self) -> Result<Dims> {
        Dims::checked(self.size, self.size, self.size)
    }

    /// Initial pattern size after applying the density heuristic
    pub fn resolved_initial_count(&self) -> Result<usize> {
        let volume = self.dims()?.volume();
        let count = match self.initial_count {
            Some(count) => count,
            None => {
                if !(self.initial_density > 0.0 && self.initial_density < 1.0) {
                    return Err(GeneratorError::InvalidDensity(self.initial_density));
                }
                default_initial_count(volume, self.initial_density)
            }
        };

        if count == 0 || count >= volume {
            return Err(GeneratorError::InvalidInitialCount { count, volume });
        }
        Ok(count)
    }
}

fn is_cube(n: usize) -> bool {
    let root = (n as f64).cbrt().round() as usize;
    root * root * root == n
}

/// Whether `count` points could form a simple, body-centred or face-centred
/// cubic arrangement (`k^3`, `2k^3` or `4k^3` points)
fn is_regular_lattice_count(count: usize) -> bool {
    [1, 2, 4]
        .iter()
        .any(|&f| count % f == 0 && is_cube(count / f))
}

/// Initial pattern size for a volume at the given density
///
/// Takes the midpoint between the cubes around `volume * density` and steps
/// off any count that would allow a regular cubic lattice, which otherwise
/// shows up as structure in the balanced pattern. The result is clamped to
/// `[1, volume)` where possible.
pub fn default_initial_count(volume: usize, density: f64) -> usize {
    let target = (volume as f64 * density).max(0.0);
    let base = target.cbrt().floor() as usize;
    let mut count = (base.pow(3) + (base + 1).pow(3)) / 2;

    while is_regular_lattice_count(count) && count + 1 < volume {
        count += 1;
    }
    count.clamp(1, volume.saturating_sub(1).max(1))
}

/// Map a rank in `[0, 1)` to an 8-bit threshold level
pub fn threshold_level(rank: f32) -> u8 {
    (rank * THRESHOLD_LEVELS).round().clamp(0.0, 255.0) as u8
}

/// Generation phases, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Random initial pattern
    InitialSampling,
    /// Swapping clusters into voids until stable
    InitialBalancing,
    /// Ranking the initial pattern
    InitialRanking,
    /// Ranking every remaining voxel
    DenseRanking,
    /// Every voxel ranked
    Done,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::InitialSampling => Phase::InitialBalancing,
            Phase::InitialBalancing => Phase::InitialRanking,
            Phase::InitialRanking => Phase::DenseRanking,
            Phase::DenseRanking | Phase::Done => Phase::Done,
        }
    }
}

/// How the initial balancing ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceOutcome {
    /// Number of cluster-to-void swaps attempted
    pub iterations: usize,
    /// Whether the removed cluster came back as the largest void
    pub converged: bool,
}

/// Finished 3D dither array
#[derive(Debug, Clone, PartialEq)]
pub struct DitherVolume {
    ranks: ScalarField,
}

impl DitherVolume {
    /// Wrap a field of ranks in `[0, 1)`
    pub fn from_ranks(ranks: ScalarField) -> Self {
        Self { ranks }
    }

    /// Lattice dimensions
    pub fn dims(&self) -> Dims {
        self.ranks.dims()
    }

    /// Rank of the voxel at `coord` (wrapped)
    pub fn get(&self, coord: Vec3) -> f32 {
        self.ranks.get(coord)
    }

    /// The underlying rank field
    pub fn ranks(&self) -> &ScalarField {
        &self.ranks
    }

    /// Ranks of one axis-2 layer
    pub fn layer(&self, z: usize) -> &[f32] {
        self.ranks.layer(z)
    }

    /// Insertion order of the voxel at `coord`, in `[0, volume)`
    pub fn rank_order(&self, coord: Vec3) -> usize {
        (self.get(coord) * self.dims().volume() as f32).round() as usize
    }

    /// One layer as 8-bit threshold levels
    pub fn threshold_layer(&self, z: usize) -> Vec<u8> {
        self.layer(z).iter().map(|&r| threshold_level(r)).collect()
    }
}

/**
 * Drives the void-cluster engine through the generation phases
 */
pub struct BlueNoiseGenerator {
    dims: Dims,
    initial_count: usize,
    max_balancing_iterations: usize,
    phase: Phase,
    rng: ChaCha8Rng,
    engine: VoidClusterEngine,
    progress: Progress,
}

impl BlueNoiseGenerator {
    /// Multiplier of the volume used as the default balancing cap
    const MAX_ITERATIONS_MULTIPLIER: usize = 10;

    /// Validate the configuration and set up an empty lattice
    pub fn new(config: BlueNoiseConfig) -> Result<Self> {
        let dims = config.dims()?;
        let kernel = Kernel::gaussian(config.kernel_size, config.sigma)?;
        let initial_count = config.resolved_initial_count()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let engine = VoidClusterEngine::new(dims, kernel, &mut rng);

        debug!(
            "lattice {}x{}x{}, kernel {} sigma {}, {} initial points",
            dims.d0, dims.d1, dims.d2, config.kernel_size, config.sigma, initial_count
        );

        Ok(Self {
            dims,
            initial_count,
            max_balancing_iterations: config
                .max_balancing_iterations
                .unwrap_or(dims.volume() * Self::MAX_ITERATIONS_MULTIPLIER),
            phase: Phase::InitialSampling,
            rng,
            engine,
            progress: Progress::new(dims.volume(), config.report_interval),
        })
    }

    /// Lattice dimensions
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Size of the initial pattern
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Next phase to run
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Engine state, for inspection between phases
    pub fn engine(&self) -> &VoidClusterEngine {
        &self.engine
    }

    fn enter(&mut self, requested: Phase, message: &'static str) -> Result<()> {
        if self.phase != requested {
            return Err(GeneratorError::PhaseOrder {
                requested,
                current: self.phase,
            });
        }
        info!("{message}");
        self.progress.phase(message);
        Ok(())
    }

    fn rank_value(&self, order: usize) -> f32 {
        order as f32 / self.dims.volume() as f32
    }

    /// Turn on `initial_count` distinct random voxels
    pub fn sample_initial_pattern(&mut self) -> Result<()> {
        self.enter(Phase::InitialSampling, "Sampling initial pattern")?;

        let mut remaining = self.initial_count;
        while remaining > 0 {
            let voxel = Vec3::new(
                self.rng.gen_range(0..self.dims.d0) as i32,
                self.rng.gen_range(0..self.dims.d1) as i32,
                self.rng.gen_range(0..self.dims.d2) as i32,
            );
            if !self.engine.is_on(voxel) {
                self.engine.set_on(voxel, INITIAL_SENTINEL)?;
                remaining -= 1;
            }
            self.progress.step(0);
        }

        self.phase = self.phase.next();
        Ok(())
    }

    /// Swap tightest clusters into largest voids until the pattern is stable
    pub fn balance_initial_pattern(&mut self) -> Result<BalanceOutcome> {
        self.enter(Phase::InitialBalancing, "Balancing initial pattern")?;

        let mut iterations = 0;
        let converged = loop {
            if iterations >= self.max_balancing_iterations {
                break false;
            }
            iterations += 1;

            let cluster = self.engine.largest_cluster()?;
            self.engine.set_off(cluster);
            let void = self.engine.largest_void()?;
            self.engine.set_on(void, INITIAL_SENTINEL)?;
            self.progress.step(0);

            if void == cluster {
                break true;
            }
        };

        if converged {
            debug!("initial pattern balanced after {iterations} swaps");
        } else {
            warn!(
                "initial pattern not balanced after {} swaps, continuing",
                iterations
            );
        }

        self.phase = self.phase.next();
        Ok(BalanceOutcome {
            iterations,
            converged,
        })
    }

    /// Rank the initial pattern, tightest clusters get the highest ranks
    pub fn rank_initial_pattern(&mut self) -> Result<()> {
        self.enter(Phase::InitialRanking, "Ranking initial pattern")?;

        for order in (0..self.initial_count).rev() {
            let cluster = self.engine.largest_cluster()?;
            let rank = self.rank_value(order);
            self.engine.set_off(cluster);
            self.engine.set_on(cluster, rank)?;
            self.engine.evict(cluster);
            self.progress.step(0);
        }

        self.phase = self.phase.next();
        Ok(())
    }

    /// Rank every remaining voxel by repeatedly filling the largest void
    pub fn rank_remaining(&mut self) -> Result<()> {
        self.enter(Phase::DenseRanking, "Filling voids")?;
        self.engine.disable_cluster_tracking();

        for order in self.initial_count..self.dims.volume() {
            let void = self.engine.largest_void()?;
            let rank = self.rank_value(order);
            self.engine.set_on(void, rank)?;
            self.progress.step(order);
        }

        self.progress.finish("Dither volume complete");
        self.phase = self.phase.next();
        Ok(())
    }

    /// Hand over the ranks once every phase has run
    pub fn into_volume(self) -> Result<DitherVolume> {
        if self.phase != Phase::Done {
            return Err(GeneratorError::PhaseOrder {
                requested: Phase::Done,
                current: self.phase,
            });
        }
        Ok(DitherVolume::from_ranks(self.engine.into_content()))
    }

    /// Run every phase and return the dither volume
    pub fn generate(mut self) -> Result<DitherVolume> {
        let start_time = Instant::now();
        info!(
            "Generating {}x{}x{} dither volume",
            self.dims.d0, self.dims.d1, self.dims.d2
        );

        self.sample_initial_pattern()?;
        self.balance_initial_pattern()?;
        self.rank_initial_pattern()?;
        self.rank_remaining()?;

        info!(
            "Dither volume complete in {:.2}s",
            start_time.elapsed().as_secs_f32()
        );
        self.into_volume()
    }
}

/**
 * Convenience function to generate a cubic dither volume with default settings
 */
pub fn generate_dither_volume(size: usize, sigma: f32) -> Result<DitherVolume> {
    let config = BlueNoiseConfig {
        size,
        sigma,
        ..Default::default()
    };
    BlueNoiseGenerator::new(config)?.generate()
}
