//! Procedural spiral galaxy point cloud.
//!
//! Each particle is placed on one of `branch_count` evenly spaced arms, chosen
//! by index so that arms are equally populated. Its distance from the center
//! is uniform in `[0, radius)`, the arm is twisted by `radius * branch_spin`,
//! and each axis gets an independent scatter whose magnitude is
//! `u^power * randomness` for a uniform `u`. Higher powers pull the scatter
//! toward zero and tighten the arms.
//!
//! ```
//! use galaxy::{generate, GalaxyParams};
//!
//! let params = GalaxyParams::default().with_count(1000);
//! let buffers = generate(&params);
//! assert_eq!(buffers.positions.len(), 3000);
//! assert_eq!(buffers.colors.len(), 3000);
//! ```

use std::f32::consts::TAU;

use rand::Rng;

use crate::color::Rgb;
use crate::params::GalaxyParams;

/// Interleaved `xyz` positions and `rgb` colors, three floats per particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalaxyBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl GalaxyBuffers {
    /// Number of particles held.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn color(&self, index: usize) -> Rgb {
        let i = index * 3;
        Rgb::new(self.colors[i], self.colors[i + 1], self.colors[i + 2])
    }
}

/// Generate a galaxy with a fresh thread-local RNG.
pub fn generate(params: &GalaxyParams) -> GalaxyBuffers {
    generate_with(params, &mut rand::thread_rng())
}

/// Generate a galaxy drawing randomness from `rng`.
pub fn generate_with<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> GalaxyBuffers {
    let count = params.count as usize;
    let mut positions = vec![0.0_f32; count * 3];
    let mut colors = vec![0.0_f32; count * 3];

    for i in 0..count {
        let i3 = i * 3;

        let radius = rng.gen::<f32>() * params.radius;
        let angle = branch_angle(i as u32, params.branch_count) + radius * params.branch_spin;

        let power = params.branch_randomness_power;
        let randomness = params.branch_randomness;
        let offset_x = scatter(rng, power, randomness);
        let offset_y = scatter(rng, power, randomness);
        let offset_z = scatter(rng, power, randomness);

        positions[i3] = angle.cos() * radius + offset_x;
        positions[i3 + 1] = offset_y;
        positions[i3 + 2] = angle.sin() * radius + offset_z;

        let color = particle_color(params, radius);
        colors[i3] = color.r;
        colors[i3 + 1] = color.g;
        colors[i3 + 2] = color.b;
    }

    GalaxyBuffers { positions, colors }
}

/// Arm index for particle `index`.
#[inline]
pub fn branch_index(index: u32, branch_count: u32) -> u32 {
    index % branch_count.max(1)
}

/// Base angle of the arm particle `index` belongs to, before spin.
#[inline]
pub fn branch_angle(index: u32, branch_count: u32) -> f32 {
    let branches = branch_count.max(1);
    branch_index(index, branches) as f32 / branches as f32 * TAU
}

/// Signed scatter for one axis: `u^power * ±1 * randomness`.
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, power: u32, randomness: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powi(power as i32);
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * randomness
}

/// Gradient color for a particle at `radius`.
pub fn particle_color(params: &GalaxyParams, radius: f32) -> Rgb {
    let t = if params.radius > 0.0 {
        radius / params.radius
    } else {
        0.0
    };
    Rgb::lerp(params.inside_color, params.outside_color, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat_params(count: u32, branches: u32) -> GalaxyParams {
        GalaxyParams::default()
            .with_count(count)
            .with_branch_count(branches)
            .with_branch_spin(0.0)
            .with_branch_randomness(0.0)
    }

    #[test]
    fn test_buffer_lengths() {
        let mut rng = StdRng::seed_from_u64(1);
        for count in [100, 1000, 12_300] {
            let buffers = generate_with(&GalaxyParams::default().with_count(count), &mut rng);
            assert_eq!(buffers.positions.len(), count as usize * 3);
            assert_eq!(buffers.colors.len(), count as usize * 3);
            assert_eq!(buffers.len(), count as usize);
        }
    }

    #[test]
    fn test_branch_angles_are_discrete() {
        for branches in 2..=20 {
            for k in 0..branches {
                let expected = k as f32 / branches as f32 * TAU;
                assert_eq!(branch_angle(k, branches), expected);
                assert_eq!(branch_angle(k + branches * 7, branches), expected);
            }
        }
    }

    #[test]
    fn test_unspun_particles_sit_on_their_arm() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = flat_params(1000, 3);
        let buffers = generate_with(&params, &mut rng);

        for i in 0..buffers.len() {
            let [x, y, z] = buffers.position(i);
            assert_eq!(y, 0.0);
            let r = (x * x + z * z).sqrt();
            if r < 1e-3 {
                continue;
            }
            let mut angle = z.atan2(x);
            if angle < -1e-4 {
                angle += TAU;
            }
            let expected = branch_angle(i as u32, 3);
            let diff = (angle - expected).abs().min((angle - expected - TAU).abs());
            assert!(diff < 1e-3, "particle {} angle {} expected {}", i, angle, expected);
        }
    }

    #[test]
    fn test_positions_stay_within_reach() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = GalaxyParams::default().with_count(5000);
        let buffers = generate_with(&params, &mut rng);
        let reach = params.radius + params.branch_randomness * 3.0_f32.sqrt() + 1e-4;
        for i in 0..buffers.len() {
            let [x, y, z] = buffers.position(i);
            assert!((x * x + y * y + z * z).sqrt() <= reach);
            assert!(y.abs() <= params.branch_randomness);
        }
    }

    #[test]
    fn test_zero_randomness_gives_no_scatter() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(scatter(&mut rng, 3, 0.0).abs(), 0.0);
        }
    }

    #[test]
    fn test_scatter_takes_both_signs() {
        let mut rng = StdRng::seed_from_u64(5);
        let samples: Vec<f32> = (0..1000).map(|_| scatter(&mut rng, 1, 1.0)).collect();
        assert!(samples.iter().any(|&s| s > 0.0));
        assert!(samples.iter().any(|&s| s < 0.0));
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_particle_color_endpoints() {
        let params = GalaxyParams::default().with_radius(10.0);
        assert_eq!(particle_color(&params, 0.0), params.inside_color);
        assert_eq!(particle_color(&params, 10.0), params.outside_color);
    }

    #[test]
    fn test_empty_galaxy() {
        let mut params = GalaxyParams::default();
        params.count = 0;
        let buffers = generate(&params);
        assert!(buffers.is_empty());
        assert!(buffers.colors.is_empty());
    }
}
