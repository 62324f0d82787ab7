//! `hyperfield [both|particles|tesseract] [seed]`

use hyperfield::prelude::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let layers = args.next().unwrap_or_else(|| "both".to_string());
    let seed: Option<u64> = args.next().and_then(|s| s.parse().ok());

    let mut particles = ParticleConfig::default();
    if let Some(seed) = seed {
        particles = particles.with_seed(seed);
    }

    let backdrop = Backdrop::new().with_particles(particles);
    let backdrop = match layers.as_str() {
        "both" => backdrop,
        "particles" => backdrop.without_tesseract(),
        "tesseract" => backdrop.without_particles(),
        other => {
            log::error!("unknown layer selection {:?}, expected both, particles or tesseract", other);
            std::process::exit(2);
        }
    };

    if let Err(e) = backdrop.run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
