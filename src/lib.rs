//! # Galaxy - procedural particle galaxy viewer
//!
//! Generates a spiral galaxy as a cloud of colored points and renders it
//! with a perspective camera, orbit controls and a small debug panel.
//!
//! ## Quick Start
//!
//! ```no_run
//! use galaxy::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_params(
//!             GalaxyParams::default()
//!                 .with_count(200_000)
//!                 .with_branch_count(4)
//!                 .with_branch_spin(1.0),
//!         )
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Parameters
//!
//! [`GalaxyParams`] holds the nine values that define a galaxy. Each field
//! has a [`ParamRange`] (min, max, step) and every value that enters the
//! system is snapped to it.
//!
//! ### Generation
//!
//! [`generate`] turns parameters into two flat `f32` buffers, positions and
//! colors, three floats per particle. Each particle sits on one of the
//! branches at a random radius, twisted by `branch_spin * radius` and pushed
//! off the arm by a signed random offset. The offset magnitude is
//! `u^power * randomness` for uniform `u`, so higher powers pull particles
//! tighter onto the arms. Color blends from the inside to the outside color
//! by `radius / params.radius`.
//!
//! Use [`generate_with`] and a seeded RNG for reproducible output:
//!
//! ```
//! use galaxy::{generate_with, GalaxyParams};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let params = GalaxyParams::default().with_count(1000);
//! let a = generate_with(&params, &mut StdRng::seed_from_u64(7));
//! let b = generate_with(&params, &mut StdRng::seed_from_u64(7));
//! assert_eq!(a, b);
//! assert_eq!(a.positions.len(), 3000);
//! ```
//!
//! ### Scene
//!
//! [`Scene`] owns the camera, orbit controls, the helper axes and grid,
//! and at most one live particle cloud. [`Scene::regenerate`] releases the
//! old cloud before installing the new one. GPU uploads go through the
//! [`SceneBackend`] trait.
//!
//! ### Debug Panel
//!
//! Slider and color edits are staged while the pointer is held and
//! committed on release, one regeneration per finished gesture. `H` hides
//! the panel and `C` collapses it. The `spin` button adds an eased
//! `1.25π` turn to the cloud's steady rotation.
//!
//! ## Logging
//!
//! The viewer logs through the [`log`] facade. The binary installs
//! `env_logger` with `info` as the default level; set `RUST_LOG=debug` to
//! see per-regeneration timings.

mod app;
pub mod camera;
pub mod color;
mod error;
pub mod generator;
mod gpu;
pub mod helpers;
pub mod input;
pub mod panel;
pub mod params;
pub mod scene;
pub mod spin;
pub mod time;
pub mod viewport;

pub use app::Viewer;
pub use camera::{Camera, OrbitControls};
pub use color::Rgb;
pub use error::{GpuError, ViewerError};
pub use generator::{generate, generate_with, GalaxyBuffers};
pub use glam::{Mat4, Vec2, Vec3};
pub use panel::{DebugPanel, PanelEvent};
pub use params::{GalaxyParams, ParamField, ParamRange};
pub use scene::{BlendMode, PointsMaterial, Scene, SceneBackend, SceneGraph, SceneNode};
pub use viewport::Viewport;

/// Convenient re-exports for common usage.
///
/// ```
/// use galaxy::prelude::*;
///
/// let params = GalaxyParams::default().with_colors(Rgb::from_hex(0xff6030), Rgb::WHITE);
/// assert_eq!(params.inside_color.to_hex(), 0xff6030);
/// ```
pub mod prelude {
    pub use crate::camera::{Camera, OrbitControls};
    pub use crate::color::Rgb;
    pub use crate::error::{GpuError, ViewerError};
    pub use crate::generator::{generate, generate_with, GalaxyBuffers};
    pub use crate::input::{Input, KeyCode, MouseButton, Shortcut};
    pub use crate::panel::{DebugPanel, PanelEvent};
    pub use crate::params::{GalaxyParams, ParamField, ParamRange};
    pub use crate::scene::{Scene, SceneBackend};
    pub use crate::time::Time;
    pub use crate::viewport::Viewport;
    pub use crate::Viewer;
    pub use crate::{Vec2, Vec3};
}
