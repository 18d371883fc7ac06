/**
 * Example: Generate a 3D dither volume
 *
 * Generates a small volume with custom parameters, saves one PNG per layer
 * and prints a layer to the terminal.
 *
 * Run with:
 *   cargo run --example generate_volume --release
 */

use blue_noise_3d::viewer::render_layer;
use blue_noise_3d::{save_layers, BlueNoiseConfig, BlueNoiseGenerator, LayerStack};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating 3D dither volume...\n");

    let config = BlueNoiseConfig {
        size: 16,
        sigma: 1.4,
        kernel_size: 11,
        seed: Some(42), // Use a seed for reproducibility
        report_interval: 50,
        ..Default::default()
    };

    let generator = BlueNoiseGenerator::new(config)?;
    println!("Initial points: {}", generator.initial_count());
    let volume = generator.generate()?;

    let dir = save_layers(&volume, "example-volume-16", "layer_")?;
    println!("\nLayers saved to {}", dir.display());

    let stack = LayerStack::from_volume(&volume);
    println!("\nLayer 0:\n{}", render_layer(&stack, 0));

    Ok(())
}
