//! Extracts the sphere inscribed in the unit cube and prints a summary.
//!
//! Run with: `RUST_LOG=debug cargo run --example sphere -- [resolution] [--smooth]`

use isosurface::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = GridConfig::default().with_resolution(64);
    for arg in std::env::args().skip(1) {
        if arg == "--smooth" {
            config = config.with_smoothing(true);
        } else if let Ok(resolution) = arg.parse() {
            config = config.with_resolution(resolution);
        } else {
            log::warn!("ignoring argument '{arg}'");
        }
    }

    let mesh = extract(&fields::Distance::new(DVec3::splat(0.5)), &config)?;

    println!("triangles: {}", mesh.num_triangles());
    println!("surface area: {:.4}", mesh.area());
    if let Some((min, max)) = mesh.bounding_box() {
        println!("bounds: {min} .. {max}");
    }
    Ok(())
}
