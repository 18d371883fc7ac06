/**
 * Example: Compare generation time for different volume sizes
 *
 * Generation cost grows with both the volume and the kernel volume, so this
 * prints a small table for a few combinations.
 *
 * Run with:
 *   cargo run --example compare_sizes --release
 *
 * Note: Use --release mode for faster generation!
 */

use blue_noise_3d::{BlueNoiseConfig, BlueNoiseGenerator};
use std::time::Instant;

fn generate_and_time(size: usize, kernel_size: usize) -> Result<f64, Box<dyn std::error::Error>> {
    let config = BlueNoiseConfig {
        size,
        kernel_size,
        sigma: 1.4,
        seed: Some(0),
        ..Default::default()
    };

    let start = Instant::now();
    let generator = BlueNoiseGenerator::new(config)?;
    generator.generate()?;
    Ok(start.elapsed().as_secs_f64())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("3D Blue Noise Size Comparison\n");
    println!("{:<12} {:<10} {:<12}", "Size", "Kernel", "Time (sec)");
    println!("{}", "-".repeat(36));

    for (size, kernel_size) in [(8, 9), (16, 9), (16, 17), (24, 17)] {
        let elapsed = generate_and_time(size, kernel_size)?;
        println!(
            "{:<12} {:<10} {:<12.2}",
            format!("{0}x{0}x{0}", size),
            kernel_size,
            elapsed
        );
    }

    Ok(())
}
