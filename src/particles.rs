//! Ambient 2D particle network.
//!
//! A fixed batch of dots drifts across the viewport, bouncing off its edges,
//! and every pair closer than the link distance is joined by a faint line.
//!
//! All coordinates are in physical pixels with the origin in the top-left
//! corner and y pointing down.
//!
//! # Example
//!
//! ```
//! use hyperfield::particles::{ParticleConfig, ParticleField, Viewport};
//!
//! let mut field = ParticleField::new(
//!     &ParticleConfig::default().with_seed(7),
//!     Viewport::new(800.0, 600.0),
//! );
//! field.step();
//! assert_eq!(field.particles().len(), 100);
//! ```

use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size of the drawing surface the particles live in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// A single dot of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in pixels.
    pub position: Vec2,
    /// Velocity in pixels per frame.
    pub velocity: Vec2,
    /// Circle radius in pixels, fixed at creation.
    pub radius: f32,
}

/// A connection between two particles, by index into the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

/// Settings for the particle layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    /// Number of particles created at startup.
    pub count: usize,
    /// Pairs strictly closer than this (pixels) are linked.
    pub link_distance: f32,
    /// Radius range, `[min, max)`.
    pub radius_range: (f32, f32),
    /// Each velocity component is drawn from `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Dot fill color (RGBA, 0.0-1.0).
    pub dot_color: Vec4,
    /// Link stroke color (RGBA, 0.0-1.0).
    pub link_color: Vec4,
    /// Link stroke width in pixels.
    pub link_width: f32,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            link_distance: 100.0,
            radius_range: (1.0, 4.0),
            max_speed: 0.25,
            dot_color: Vec4::new(1.0, 1.0, 1.0, 0.8),
            link_color: Vec4::new(1.0, 1.0, 1.0, 0.2),
            link_width: 0.5,
            seed: None,
        }
    }
}

impl ParticleConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_colors(mut self, dot: Vec4, link: Vec4) -> Self {
        self.dot_color = dot;
        self.link_color = link;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.link_distance > 0.0) {
            return Err(format!(
                "particle link distance must be positive, got {}",
                self.link_distance
            ));
        }
        let (min, max) = self.radius_range;
        if !(min > 0.0 && max >= min) {
            return Err(format!("invalid particle radius range [{}, {})", min, max));
        }
        if !(self.max_speed >= 0.0) {
            return Err(format!("particle max speed must not be negative, got {}", self.max_speed));
        }
        if !(self.link_width > 0.0) {
            return Err(format!("link width must be positive, got {}", self.link_width));
        }
        Ok(())
    }
}

/// Create `config.count` particles scattered uniformly over the viewport.
pub fn spawn_particles<R: Rng>(config: &ParticleConfig, viewport: Viewport, rng: &mut R) -> Vec<Particle> {
    let (min_radius, max_radius) = config.radius_range;
    // gen_range panics on an empty range; a zero-sized viewport spawns at the origin
    (0..config.count)
        .map(|_| Particle {
            position: Vec2::new(
                rng.gen::<f32>() * viewport.width,
                rng.gen::<f32>() * viewport.height,
            ),
            velocity: Vec2::new(
                (rng.gen::<f32>() * 2.0 - 1.0) * config.max_speed,
                (rng.gen::<f32>() * 2.0 - 1.0) * config.max_speed,
            ),
            radius: min_radius + rng.gen::<f32>() * (max_radius - min_radius),
        })
        .collect()
}

/// Advance every particle by its velocity and reflect velocity components
/// whose coordinate has left the viewport.
///
/// Reflection always points the component back toward the viewport, so a
/// particle stranded outside by a shrinking resize walks back in instead of
/// flipping direction every frame. Positions are never clamped.
pub fn step_particles(particles: &mut [Particle], viewport: Viewport) {
    for p in particles.iter_mut() {
        p.position += p.velocity;
        if p.position.x > viewport.width {
            p.velocity.x = -p.velocity.x.abs();
        } else if p.position.x < 0.0 {
            p.velocity.x = p.velocity.x.abs();
        }
        if p.position.y > viewport.height {
            p.velocity.y = -p.velocity.y.abs();
        } else if p.position.y < 0.0 {
            p.velocity.y = p.velocity.y.abs();
        }
    }
}

/// Every unordered pair strictly closer than `max_distance`.
///
/// Brute force over all pairs; fine for the hundred-ish particles this is
/// meant for.
pub fn find_links(particles: &[Particle], max_distance: f32) -> Vec<Link> {
    let mut links = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate().skip(i + 1) {
            let distance = a.position.distance(b.position);
            if distance < max_distance {
                links.push(Link { a: i, b: j, distance });
            }
        }
    }
    links
}

/// Upper bound on the number of links among `count` particles.
pub fn max_links(count: usize) -> usize {
    count * count.saturating_sub(1) / 2
}

/// The particle layer's state: particles, the links found on the last step,
/// and the viewport they bounce inside.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    links: Vec<Link>,
    viewport: Viewport,
    link_distance: f32,
}

impl ParticleField {
    /// Spawn a field using the config's seed (or entropy).
    pub fn new(config: &ParticleConfig, viewport: Viewport) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = spawn_particles(config, viewport, &mut rng);
        Self::from_particles(particles, viewport, config.link_distance)
    }

    /// Build a field around existing particles.
    pub fn from_particles(particles: Vec<Particle>, viewport: Viewport, link_distance: f32) -> Self {
        let links = find_links(&particles, link_distance);
        Self {
            particles,
            links,
            viewport,
            link_distance,
        }
    }

    /// Advance one frame: move, bounce, then relink.
    pub fn step(&mut self) {
        step_particles(&mut self.particles, self.viewport);
        self.links = find_links(&self.particles, self.link_distance);
    }

    /// Adopt a new viewport size. Particles are left where they are.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Links found by the most recent [`step`](Self::step) (or at creation).
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            radius: 2.0,
        }
    }

    #[test]
    fn test_spawn_ranges() {
        let config = ParticleConfig::default().with_count(500);
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(1);
        let particles = spawn_particles(&config, viewport, &mut rng);

        assert_eq!(particles.len(), 500);
        for p in &particles {
            assert!(p.position.x >= 0.0 && p.position.x <= 640.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 480.0);
            assert!(p.radius >= 1.0 && p.radius <= 4.0);
            assert!(p.velocity.x.abs() <= 0.25);
            assert!(p.velocity.y.abs() <= 0.25);
        }
    }

    #[test]
    fn test_spawn_zero_viewport() {
        let config = ParticleConfig::default().with_count(3);
        let mut rng = StdRng::seed_from_u64(9);
        let particles = spawn_particles(&config, Viewport::new(0.0, 0.0), &mut rng);
        assert!(particles.iter().all(|p| p.position == Vec2::ZERO));
    }

    #[test]
    fn test_seeded_field_is_reproducible() {
        let config = ParticleConfig::default().with_seed(42);
        let viewport = Viewport::new(1024.0, 768.0);
        let a = ParticleField::new(&config, viewport);
        let b = ParticleField::new(&config, viewport);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut ps = [particle(10.0, 20.0, 0.2, -0.1)];
        step_particles(&mut ps, Viewport::new(100.0, 100.0));
        assert!((ps[0].position - Vec2::new(10.2, 19.9)).length() < 1e-5);
        assert_eq!(ps[0].velocity, Vec2::new(0.2, -0.1));
    }

    #[test]
    fn test_bounce_past_right_edge() {
        let mut ps = [particle(100.01, 50.0, 0.2, 0.0)];
        step_particles(&mut ps, Viewport::new(100.0, 100.0));
        assert!(ps[0].velocity.x < 0.0);
    }

    #[test]
    fn test_bounce_past_left_edge() {
        let mut ps = [particle(-0.01, 50.0, -0.2, 0.0)];
        step_particles(&mut ps, Viewport::new(100.0, 100.0));
        assert!(ps[0].velocity.x > 0.0);
    }

    #[test]
    fn test_bounce_axes_independent() {
        let mut ps = [particle(50.0, 100.01, 0.1, 0.2)];
        step_particles(&mut ps, Viewport::new(100.0, 100.0));
        assert_eq!(ps[0].velocity.x, 0.1);
        assert!(ps[0].velocity.y < 0.0);

        let mut ps = [particle(50.0, -0.01, 0.1, -0.2)];
        step_particles(&mut ps, Viewport::new(100.0, 100.0));
        assert!(ps[0].velocity.y > 0.0);
    }

    #[test]
    fn test_escaped_particle_returns() {
        // Outside after a shrink: it bounces once and heads back in.
        let mut ps = [particle(150.0, 50.0, 0.25, 0.0)];
        let viewport = Viewport::new(100.0, 100.0);
        step_particles(&mut ps, viewport);
        assert!(ps[0].velocity.x < 0.0);
        for _ in 0..400 {
            step_particles(&mut ps, viewport);
        }
        assert!(ps[0].position.x <= 100.0);
    }

    #[test]
    fn test_link_threshold() {
        let near = [particle(0.0, 0.0, 0.0, 0.0), particle(99.999, 0.0, 0.0, 0.0)];
        assert_eq!(find_links(&near, 100.0).len(), 1);

        let far = [particle(0.0, 0.0, 0.0, 0.0), particle(100.001, 0.0, 0.0, 0.0)];
        assert!(find_links(&far, 100.0).is_empty());
    }

    #[test]
    fn test_links_are_unordered_pairs() {
        let ps = [
            particle(0.0, 0.0, 0.0, 0.0),
            particle(3.0, 4.0, 0.0, 0.0),
            particle(6.0, 8.0, 0.0, 0.0),
        ];
        let links = find_links(&ps, 100.0);
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.a < l.b));
        assert!((links[0].distance - 5.0).abs() < 1e-6);
        assert_eq!(max_links(ps.len()), 3);
    }

    #[test]
    fn test_resize_does_not_clamp() {
        let ps = vec![particle(700.0, 500.0, 0.0, 0.0)];
        let mut field = ParticleField::from_particles(ps, Viewport::new(800.0, 600.0), 100.0);
        field.resize(400.0, 300.0);
        assert_eq!(field.viewport(), Viewport::new(400.0, 300.0));
        assert_eq!(field.particles()[0].position, Vec2::new(700.0, 500.0));
        assert!(!field.viewport().contains(field.particles()[0].position));
    }

    #[test]
    fn test_config_validation() {
        assert!(ParticleConfig::default().validate().is_ok());
        assert!(ParticleConfig::default().with_link_distance(0.0).validate().is_err());
        assert!(ParticleConfig::default().with_link_distance(f32::NAN).validate().is_err());
        let mut config = ParticleConfig::default();
        config.radius_range = (3.0, 1.0);
        assert!(config.validate().is_err());
    }
}
