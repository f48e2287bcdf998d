//! End-to-end tests for generation, the scene host and the debug panel.
//!
//! Everything here runs without a window or GPU: the scene is driven
//! through a counting [`SceneBackend`] stub.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use galaxy::input::{Input, KeyCode, MouseButton, Shortcut};
use galaxy::prelude::*;
use galaxy::scene::{PointsMaterial, SceneNode};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Test backend
// ============================================================================

#[derive(Default)]
struct CountingBackend {
    installs: usize,
    releases: usize,
    live: usize,
    last_len: usize,
}

impl SceneBackend for CountingBackend {
    type Cloud = usize;

    fn install(&mut self, buffers: &GalaxyBuffers, _material: &PointsMaterial) -> usize {
        self.installs += 1;
        self.live += 1;
        self.last_len = buffers.len();
        self.installs
    }

    fn release(&mut self, _cloud: usize) {
        self.releases += 1;
        self.live -= 1;
    }
}

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_thousand_particles_three_arms() {
    let params = GalaxyParams::default()
        .with_count(1000)
        .with_branch_count(3)
        .with_branch_spin(0.0)
        .with_branch_randomness(0.0);
    let buffers = generate_with(&params, &mut seeded(1));

    assert_eq!(buffers.positions.len(), 3000);
    assert_eq!(buffers.colors.len(), 3000);

    // With no spin and no scatter every particle lies on one of three rays.
    let arms: BTreeSet<i32> = (0..buffers.len())
        .filter_map(|i| {
            let [x, _, z] = buffers.position(i);
            if x.hypot(z) < 1e-3 {
                return None;
            }
            let angle = z.atan2(x).rem_euclid(TAU);
            Some((angle / (TAU / 3.0)).round() as i32 % 3)
        })
        .collect();
    assert_eq!(arms, BTreeSet::from([0, 1, 2]));

    for i in 0..buffers.len() {
        let [x, y, z] = buffers.position(i);
        assert_eq!(y, 0.0);
        let angle = z.atan2(x).rem_euclid(TAU);
        let expected = (i % 3) as f32 / 3.0 * TAU;
        let diff = (angle - expected).rem_euclid(TAU);
        assert!(
            diff < 1e-3 || TAU - diff < 1e-3 || x.hypot(z) < 1e-3,
            "particle {} off its arm",
            i
        );
    }
}

#[test]
fn test_colors_stay_between_endpoints() {
    let inside = Rgb::from_hex(0xdb3f0f);
    let outside = Rgb::from_hex(0x8aa8f4);
    let params = GalaxyParams::default()
        .with_count(5000)
        .with_colors(inside, outside);
    let buffers = generate_with(&params, &mut seeded(2));

    let bounds = |a: f32, b: f32| (a.min(b) - 1e-6, a.max(b) + 1e-6);
    let (r_lo, r_hi) = bounds(inside.r, outside.r);
    let (g_lo, g_hi) = bounds(inside.g, outside.g);
    let (b_lo, b_hi) = bounds(inside.b, outside.b);

    for i in 0..buffers.len() {
        let c = buffers.color(i);
        assert!((r_lo..=r_hi).contains(&c.r));
        assert!((g_lo..=g_hi).contains(&c.g));
        assert!((b_lo..=b_hi).contains(&c.b));
    }
}

#[test]
fn test_higher_power_pulls_particles_onto_arms() {
    // The vertical coordinate is pure scatter: E|y| = randomness / (power + 1).
    let mean_abs_y = |power: u32| {
        let params = GalaxyParams::default()
            .with_count(20_000)
            .with_branch_randomness(1.0)
            .with_branch_randomness_power(power);
        let buffers = generate_with(&params, &mut seeded(power as u64));
        let sum: f32 = (0..buffers.len()).map(|i| buffers.position(i)[1].abs()).sum();
        sum / buffers.len() as f32
    };

    let means: Vec<f32> = [1, 3, 10].iter().map(|&p| mean_abs_y(p)).collect();
    for (mean, power) in means.iter().zip([1.0_f32, 3.0, 10.0]) {
        let expected = 1.0 / (power + 1.0);
        assert!(
            (mean - expected).abs() < 0.02,
            "power {}: mean {} expected {}",
            power,
            mean,
            expected
        );
    }
    assert!(means[0] > means[1] && means[1] > means[2]);
}

#[test]
fn test_radius_bounds_particle_reach() {
    let params = GalaxyParams::default()
        .with_count(2000)
        .with_radius(5.0)
        .with_branch_randomness(0.5);
    let buffers = generate_with(&params, &mut seeded(3));
    // radial distance plus scatter on both planar axes
    let limit = 5.0 + 0.5 * 2.0_f32.sqrt() + 1e-4;
    for i in 0..buffers.len() {
        let [x, y, z] = buffers.position(i);
        assert!(x.hypot(z) <= limit);
        assert!(y.abs() <= 0.5 + 1e-6);
    }
}

#[test]
fn test_same_seed_same_galaxy() {
    let params = GalaxyParams::default().with_count(500);
    assert_eq!(
        generate_with(&params, &mut seeded(9)),
        generate_with(&params, &mut seeded(9))
    );
    assert_ne!(
        generate_with(&params, &mut seeded(9)),
        generate_with(&params, &mut seeded(10))
    );
}

// ============================================================================
// Scene
// ============================================================================

#[test]
fn test_regenerate_keeps_exactly_one_cloud() {
    let mut backend = CountingBackend::default();
    let mut scene = Scene::new(Viewport::new(800, 600, 1.0));

    for count in [1000, 200, 3000] {
        scene.regenerate(&mut backend, &GalaxyParams::default().with_count(count));
        assert_eq!(backend.live, 1);
        assert_eq!(scene.graph().points_count(), 1);
        assert_eq!(backend.last_len, count as usize);
    }
    assert_eq!(backend.installs, 3);
    assert_eq!(backend.releases, 2);

    scene.dispose_cloud(&mut backend);
    assert_eq!(backend.live, 0);
    assert_eq!(scene.graph().points_count(), 0);
}

#[test]
fn test_helpers_present() {
    let scene = Scene::<CountingBackend>::new(Viewport::default());
    let mut axes = 0;
    let mut grids = 0;
    for (_, node) in scene.graph().iter() {
        match node {
            SceneNode::Axes(a) => {
                axes += 1;
                assert_eq!(a.size, 11.0);
            }
            SceneNode::Grid(g) => {
                grids += 1;
                assert_eq!(g.size, 10.0);
                assert_eq!(g.divisions, 10);
            }
            _ => {}
        }
    }
    assert_eq!((axes, grids), (1, 1));
}

#[test]
fn test_resize_800x600_to_1024x768() {
    let mut scene = Scene::<CountingBackend>::new(Viewport::new(800, 600, 1.0));
    assert!(scene.resize(1024, 768, 1.0));
    assert_eq!(scene.camera().aspect, 1024.0 / 768.0);
    assert_eq!(scene.viewport().output_size(), (1024, 768));
    assert_eq!(scene.viewport().drawing_buffer_size(), (1024, 768));

    // high-density displays are capped at a pixel ratio of two
    assert!(scene.resize(1024, 768, 3.0));
    assert_eq!(scene.viewport().drawing_buffer_size(), (2048, 1536));

    // minimized windows leave the last size in place
    assert!(!scene.resize(0, 0, 1.0));
    assert_eq!(scene.viewport().output_size(), (1024, 768));
}

#[test]
fn test_camera_starts_at_default_position() {
    let scene = Scene::<CountingBackend>::new(Viewport::default());
    let position = scene.camera().position();
    assert!((position - Vec3::new(1.5, 10.0, 7.0)).length() < 1e-4);
    assert_eq!(scene.camera().fov_y, 75.0);
    assert_eq!(scene.camera().near, 0.1);
    assert_eq!(scene.camera().far, 100.0);
}

#[test]
fn test_drag_rotates_camera_with_inertia() {
    let mut scene = Scene::<CountingBackend>::new(Viewport::new(800, 600, 1.0));
    let start_yaw = scene.camera().yaw;

    let mut input = Input::new(800, 600);
    input.move_cursor(400.0, 300.0);
    input.press_button(MouseButton::Left);
    input.move_cursor(550.0, 300.0);
    let drag = input.drag_delta();
    assert_eq!(drag, Vec2::new(150.0, 0.0));

    scene.controls_mut().rotate(drag.x, drag.y, 600.0);
    input.end_frame();

    // the first damped step moves only part of the way
    scene.tick(0.016);
    let first = (start_yaw - scene.camera().yaw).rem_euclid(TAU);
    assert!(first > 0.0 && first < TAU / 4.0);

    for frame in 2..600 {
        scene.tick(frame as f32 * 0.016);
    }
    let total = (start_yaw - scene.camera().yaw).rem_euclid(TAU);
    assert!((total - TAU / 4.0).abs() < 1e-3, "total {}", total);
}

// ============================================================================
// Debug panel
// ============================================================================

#[test]
fn test_panel_drag_regenerates_once() {
    let mut backend = CountingBackend::default();
    let mut scene = Scene::new(Viewport::default());
    let mut panel = DebugPanel::new(GalaxyParams::default().with_count(1000));
    scene.regenerate(&mut backend, panel.committed());

    // a slider drag across several frames
    for value in [1100.0, 1500.0, 2000.0] {
        panel.stage_numeric(ParamField::Count, value);
        assert!(panel.settle(true).is_empty());
    }
    let events = panel.settle(false);
    assert_eq!(events.len(), 1);

    for event in events {
        if let PanelEvent::Commit { params, .. } = event {
            scene.regenerate(&mut backend, &params);
        }
    }
    assert_eq!(backend.installs, 2);
    assert_eq!(backend.last_len, 2000);
    assert_eq!(scene.cloud().map(|c| c.count), Some(2000));
}

#[test]
fn test_shortcut_keys_drive_panel() {
    let mut panel = DebugPanel::default();
    let mut input = Input::default();

    input.press_key(KeyCode::H);
    let shortcuts: Vec<_> = input.shortcuts().collect();
    assert_eq!(shortcuts, vec![Shortcut::TogglePanel]);
    for s in shortcuts {
        panel.apply_shortcut(s);
    }
    assert!(!panel.is_visible());

    // holding the key does not toggle again
    input.end_frame();
    assert_eq!(input.shortcuts().count(), 0);

    input.release_key(KeyCode::H);
    input.press_key(KeyCode::C);
    for s in input.shortcuts().collect::<Vec<_>>() {
        panel.apply_shortcut(s);
    }
    assert!(!panel.is_expanded());
}

#[test]
fn test_spin_button_adds_a_turn() {
    let mut backend = CountingBackend::default();
    let mut scene = Scene::new(Viewport::default());
    let mut panel = DebugPanel::default();
    scene.regenerate(&mut backend, &GalaxyParams::default().with_count(100));

    scene.tick(2.0);
    panel.request_spin();
    for event in panel.settle(false) {
        if event == PanelEvent::Spin {
            scene.spin();
        }
    }

    // still in the delay window
    scene.tick(2.4);
    assert!((scene.cloud_rotation() - 0.24).abs() < 1e-5);

    scene.tick(10.0);
    let expected = 1.0 + std::f32::consts::PI * 1.25;
    assert!((scene.cloud_rotation() - expected).abs() < 1e-4);
}
