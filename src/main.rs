/**
 * 3D Blue Noise CLI - generate dither volumes and browse their layers
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use blue_noise_3d::export::default_output_dir;
use blue_noise_3d::{
    save_layers, view_layers, BlueNoiseConfig, BlueNoiseGenerator, LayerStack,
    DEFAULT_LAYER_PREFIX,
};

/// 3D blue noise generation tools
#[derive(Parser)]
#[command(name = "blue-noise-3d")]
#[command(version)]
#[command(about = "Void-and-cluster 3D dither array generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a 3D dither array and save it as one PNG per layer
    Generate {
        /// Output directory (defaults to NxNxN)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layer file name prefix
        #[arg(long, default_value = DEFAULT_LAYER_PREFIX)]
        prefix: String,

        /// Volume edge length in voxels
        #[arg(short, long, default_value = "32")]
        size: usize,

        /// Gaussian sigma value (1.3-1.4 works well in 3D)
        #[arg(long, default_value = "1.4")]
        sigma: f32,

        /// Kernel edge length, must be odd
        #[arg(short, long, default_value = "17")]
        kernel_size: usize,

        /// Number of points in the initial pattern (derived from the volume if omitted)
        #[arg(short, long)]
        initial_count: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long, default_value = "0", conflicts_with = "entropy")]
        seed: u64,

        /// Seed from OS entropy instead of a fixed seed
        #[arg(long)]
        entropy: bool,

        /// Progress redraw interval in steps, non-positive disables progress
        #[arg(long, default_value = "50", allow_negative_numbers = true)]
        report_interval: i64,

        /// Browse the layers in the terminal afterwards
        #[arg(long)]
        view: bool,
    },

    /// Browse previously exported layers in the terminal
    View {
        /// Directory holding the layer images
        #[arg(short, long)]
        input: PathBuf,

        /// Layer file name prefix
        #[arg(long, default_value = DEFAULT_LAYER_PREFIX)]
        prefix: String,
    },
}

fn view(stack: &LayerStack) -> Result<()> {
    let stdin = io::stdin();
    view_layers(stack, stdin.lock(), io::stdout().lock()).context("Layer viewer failed")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            prefix,
            size,
            sigma,
            kernel_size,
            initial_count,
            seed,
            entropy,
            report_interval,
            view: show,
        } => {
            let config = BlueNoiseConfig {
                size,
                sigma,
                kernel_size,
                initial_count,
                seed: (!entropy).then_some(seed),
                report_interval: report_interval.max(0) as usize,
                ..Default::default()
            };

            let generator = BlueNoiseGenerator::new(config)
                .context("Invalid generator configuration")?;

            println!("Void-and-Cluster Method for Generating 3D Dither Arrays");
            println!("Generating: {}x{}x{} texture", size, size, size);
            println!("Sigma: {}, kernel: {}", sigma, kernel_size);
            println!("Initial points: {}", generator.initial_count());
            if !entropy {
                println!("Seed: {}", seed);
            }
            println!();

            let volume = generator
                .generate()
                .context("Failed to generate dither volume")?;

            // The ranks stay valid in memory even if writing them out fails
            let output = output.unwrap_or_else(|| default_output_dir(size));
            match save_layers(&volume, &output, &prefix) {
                Ok(dir) => println!("Files saved in: {}", dir.display()),
                Err(err) => eprintln!("Failed to save layers: {err}"),
            }

            if show {
                view(&LayerStack::from_volume(&volume))?;
            }
        }

        Commands::View { input, prefix } => {
            let stack = LayerStack::load(&input, &prefix)
                .with_context(|| format!("Failed to load layers from {}", input.display()))?;
            println!(
                "{} layers of {}x{} from {}",
                stack.len(),
                stack.width(),
                stack.height(),
                input.display()
            );
            view(&stack)?;
        }
    }

    Ok(())
}
