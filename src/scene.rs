//! Scene host: scene graph, camera, helpers and the live particle cloud.
//!
//! The scene never talks to the GPU directly. Uploading and releasing cloud
//! buffers goes through a [`SceneBackend`], which the wgpu renderer
//! implements and tests replace with a recording stub.

use std::time::Instant;

use crate::camera::{Camera, OrbitControls};
use crate::color::Rgb;
use crate::generator::{self, GalaxyBuffers};
use crate::helpers::{AxesHelper, GridHelper};
use crate::params::GalaxyParams;
use crate::spin::SpinAnimator;
use crate::viewport::Viewport;

/// Cloud rotation about Y, radians per second.
pub const ROTATION_SPEED: f32 = 0.1;

/// How overlapping fragments combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Colors add up; dense regions glow.
    Additive,
}

/// Render settings of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    /// Point size in world units, or pixels without attenuation.
    pub size: f32,
    /// Shrink points with view distance.
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub blending: BlendMode,
    /// Take color from the per-vertex color buffer.
    pub vertex_colors: bool,
}

impl PointsMaterial {
    /// Material used for galaxy clouds.
    pub fn galaxy(size: f32) -> Self {
        Self {
            size,
            size_attenuation: true,
            depth_write: true,
            blending: BlendMode::Additive,
            vertex_colors: true,
        }
    }
}

/// Low-intensity fill light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Stable identifier of a node in the [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A render-visible point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsObject {
    pub count: u32,
    pub material: PointsMaterial,
    /// Rotation about the Y axis in radians.
    pub rotation_y: f32,
    /// Regeneration counter of the cloud this node shows.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Camera,
    AmbientLight(AmbientLight),
    Axes(AxesHelper),
    Grid(GridHelper),
    Points(PointsObject),
}

/// Flat, insertion-ordered scene graph.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<(NodeId, SceneNode)>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node));
        id
    }

    /// Detach a node. Returns it if it was present.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.nodes.iter().position(|(node_id, _)| *node_id == id)?;
        Some(self.nodes.remove(index).1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|(node_id, _)| *node_id == id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|(node_id, _)| *node_id == id).map(|(_, n)| n)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes
            .iter_mut()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, n)| n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of point clouds attached.
    pub fn points_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|(_, n)| matches!(n, SceneNode::Points(_)))
            .count()
    }
}

/// Rendering host the scene uploads cloud buffers to.
pub trait SceneBackend {
    /// Handle owning one cloud's position and color buffers.
    type Cloud;

    /// Upload freshly generated buffers.
    fn install(&mut self, buffers: &GalaxyBuffers, material: &PointsMaterial) -> Self::Cloud;

    /// Release both buffers of a cloud that is being replaced.
    fn release(&mut self, cloud: Self::Cloud);
}

/// The one live cloud: its scene node and backend buffers.
#[derive(Debug)]
pub struct ParticleCloud<C> {
    pub node: NodeId,
    pub buffers: C,
    pub count: u32,
    pub generation: u64,
}

/// Scene host owning the camera, helpers, light and the live cloud.
pub struct Scene<B: SceneBackend> {
    graph: SceneGraph,
    camera: Camera,
    controls: OrbitControls,
    viewport: Viewport,
    ambient: AmbientLight,
    cloud: Option<ParticleCloud<B::Cloud>>,
    spin: SpinAnimator,
    generation: u64,
    elapsed: f32,
}

impl<B: SceneBackend> Scene<B> {
    /// Build the static scene. No cloud is installed until
    /// [`Scene::regenerate`] runs.
    pub fn new(viewport: Viewport) -> Self {
        let ambient = AmbientLight {
            color: Rgb::from_hex(0xb9d5ff),
            intensity: 0.12,
        };

        let mut graph = SceneGraph::new();
        graph.add(SceneNode::Camera);
        graph.add(SceneNode::AmbientLight(ambient));
        graph.add(SceneNode::Axes(AxesHelper::new(11.0)));
        graph.add(SceneNode::Grid(GridHelper::new(10.0, 10)));

        Self {
            graph,
            camera: Camera::new(viewport.aspect()),
            controls: OrbitControls::new(),
            viewport,
            ambient,
            cloud: None,
            spin: SpinAnimator::new(),
            generation: 0,
            elapsed: 0.0,
        }
    }

    /// Replace the live cloud with a new galaxy built from `params`.
    ///
    /// The previous cloud's buffers are released and its node detached
    /// before the new one is generated, so at most one cloud exists.
    pub fn regenerate(&mut self, backend: &mut B, params: &GalaxyParams) {
        self.dispose_cloud(backend);

        let started = Instant::now();
        let buffers = generator::generate(params);
        let material = PointsMaterial::galaxy(params.size);
        let handle = backend.install(&buffers, &material);

        self.generation += 1;
        let node = self.graph.add(SceneNode::Points(PointsObject {
            count: params.count,
            material,
            rotation_y: self.cloud_rotation(),
            generation: self.generation,
        }));
        self.cloud = Some(ParticleCloud {
            node,
            buffers: handle,
            count: params.count,
            generation: self.generation,
        });

        log::debug!(
            "generated galaxy #{}: {} particles in {:.1?}",
            self.generation,
            params.count,
            started.elapsed()
        );
    }

    /// Release the live cloud, if any.
    pub fn dispose_cloud(&mut self, backend: &mut B) {
        if let Some(old) = self.cloud.take() {
            self.graph.remove(old.node);
            backend.release(old.buffers);
        }
    }

    /// Advance animation to `elapsed` seconds and step the camera controls.
    pub fn tick(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        self.spin.settle(elapsed);
        let rotation = self.cloud_rotation();
        if let Some(cloud) = &self.cloud {
            if let Some(SceneNode::Points(points)) = self.graph.get_mut(cloud.node) {
                points.rotation_y = rotation;
            }
        }
        self.controls.update(&mut self.camera);
    }

    /// Cloud rotation at the last ticked time.
    pub fn cloud_rotation(&self) -> f32 {
        self.elapsed * ROTATION_SPEED + self.spin.offset_at(self.elapsed)
    }

    /// Queue a spin starting now.
    pub fn spin(&mut self) {
        self.spin.trigger(self.elapsed);
        log::debug!("spin at {:.2}s, {} active", self.elapsed, self.spin.active());
    }

    /// Mirror a new window size into the viewport and camera.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) -> bool {
        if !self.viewport.resize(width, height, scale_factor) {
            return false;
        }
        self.camera.set_aspect(self.viewport.aspect());
        log::debug!("resized to {}x{} @{:.2}x", width, height, scale_factor);
        true
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn ambient(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn cloud(&self) -> Option<&ParticleCloud<B::Cloud>> {
        self.cloud.as_ref()
    }

    /// The live cloud's scene object and buffers, for rendering.
    pub fn live_points(&self) -> Option<(&PointsObject, &B::Cloud)> {
        let cloud = self.cloud.as_ref()?;
        match self.graph.get(cloud.node)? {
            SceneNode::Points(points) => Some((points, &cloud.buffers)),
            _ => None,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
