//! # hyperfield
//!
//! Two decorative animations rendered with wgpu:
//!
//! - an ambient **particle network**: dots drifting across the window,
//!   bouncing off its edges, joined by faint lines when they come close;
//! - a **tesseract**: the 4D hypercube rotated in 4D by a slowly morphing
//!   matrix, perspective-projected into 3D and drawn as a wireframe.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hyperfield::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     Backdrop::new()
//!         .with_particles(ParticleConfig::default().with_count(150))
//!         .with_tesseract(TesseractConfig::default().with_mode(RotationMode::Fresh))
//!         .run()
//! }
//! ```
//!
//! ## Layers
//!
//! Both layers are independent. Each owns its state outright and advances a
//! fixed amount per frame:
//!
//! | Layer | State | Per frame |
//! |-------|-------|-----------|
//! | Particles | [`ParticleField`] | move, bounce, relink ([`particles::find_links`]) |
//! | Tesseract | [`TesseractView`] | rotate, morph, project ([`tesseract::project_to_3d`]) |
//!
//! The geometry lives in plain modules ([`particles`], [`tesseract`],
//! [`camera`]) and can be driven and tested without a GPU.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade. The `hyperfield` binary installs
//! `env_logger`; set `RUST_LOG=debug` to see resize events and FPS samples.

mod backdrop;
pub mod camera;
mod error;
mod gpu;
pub mod particles;
pub mod tesseract;
pub mod time;

pub use backdrop::Backdrop;
pub use camera::PerspectiveCamera;
pub use error::{BackdropError, GpuError};
pub use glam::{Vec2, Vec3, Vec4};
pub use particles::{ParticleConfig, ParticleField};
pub use tesseract::{RotationMode, Tesseract, TesseractConfig, TesseractView};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use hyperfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::camera::PerspectiveCamera;
    pub use crate::error::{BackdropError, GpuError};
    pub use crate::particles::{Link, Particle, ParticleConfig, ParticleField, Viewport};
    pub use crate::tesseract::{
        MorphingRotation, RotationMode, Segment, Tesseract, TesseractConfig, TesseractView,
    };
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
