//! Static debug geometry: axis indicator and ground grid.
//!
//! Both produce line-list vertices (two per segment) that the renderer
//! uploads once at startup.

use bytemuck::{Pod, Zeroable};

use crate::color::Rgb;

/// Vertex of a colored line segment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub fn new(position: [f32; 3], color: Rgb) -> Self {
        Self {
            position,
            color: color.to_array(),
        }
    }
}

/// X/Y/Z axis lines from the origin, red/green/blue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesHelper {
    pub size: f32,
}

impl AxesHelper {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    pub fn vertices(&self) -> Vec<LineVertex> {
        let s = self.size;
        vec![
            LineVertex::new([0.0, 0.0, 0.0], Rgb::new(1.0, 0.0, 0.0)),
            LineVertex::new([s, 0.0, 0.0], Rgb::new(1.0, 0.6, 0.0)),
            LineVertex::new([0.0, 0.0, 0.0], Rgb::new(0.0, 1.0, 0.0)),
            LineVertex::new([0.0, s, 0.0], Rgb::new(0.6, 1.0, 0.0)),
            LineVertex::new([0.0, 0.0, 0.0], Rgb::new(0.0, 0.0, 1.0)),
            LineVertex::new([0.0, 0.0, s], Rgb::new(0.0, 0.6, 1.0)),
        ]
    }
}

/// Square grid on the XZ plane, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Rgb,
    pub line_color: Rgb,
}

impl GridHelper {
    pub fn new(size: f32, divisions: u32) -> Self {
        Self {
            size,
            divisions: divisions.max(1),
            center_color: Rgb::from_hex(0x444444),
            line_color: Rgb::from_hex(0x888888),
        }
    }

    /// `divisions + 1` lines along each axis.
    pub fn vertices(&self) -> Vec<LineVertex> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;

        let mut out = Vec::with_capacity((self.divisions as usize + 1) * 4);
        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if i == center && self.divisions % 2 == 0 {
                self.center_color
            } else {
                self.line_color
            };
            out.push(LineVertex::new([-half, 0.0, k], color));
            out.push(LineVertex::new([half, 0.0, k], color));
            out.push(LineVertex::new([k, 0.0, -half], color));
            out.push(LineVertex::new([k, 0.0, half], color));
        }
        out
    }
}
