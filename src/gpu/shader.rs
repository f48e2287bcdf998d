use bytemuck::{Pod, Zeroable};
use glam::Mat4;

pub const SHADER_SOURCE: &str = include_str!("galaxy.wgsl");

/// Mirrors `Uniforms` in `galaxy.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub size_attenuation: u32,
    pub pixel_scale: f32,
    pub _pad: [f32; 3],
}

impl Uniforms {
    pub fn new(view: Mat4, proj: Mat4, model: Mat4, viewport: [f32; 2]) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            viewport,
            point_size: 1.0,
            size_attenuation: 0,
            pixel_scale: 1.0,
            _pad: [0.0; 3],
        }
    }
}
