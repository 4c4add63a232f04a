/// Example program to print the loaded configuration
///
/// Run with: cargo run -p layerform-config --example print_config

fn main() {
    let config = layerform_config::LayerformConfig::load();

    println!("=== Layerform Configuration ===\n");

    println!("Decompose Settings:");
    println!("  Epsilon: {:e}", config.decompose.epsilon);
    println!();

    println!("Interpolation Settings:");
    println!("  Rotation: {:?}", config.interpolation.rotation);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
