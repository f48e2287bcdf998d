//! egui rendering of the debug panel.

use crate::params::ParamField;

use super::{DebugPanel, PanelEvent};

/// Draw the panel and collect the events it produced this frame.
pub fn show(panel: &mut DebugPanel, ctx: &egui::Context) -> Vec<PanelEvent> {
    if panel.is_visible() {
        egui::Window::new("Debug")
            .default_width(panel.width)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| render_galaxy_panel(ui, panel));
    }

    panel.settle(gesture_in_progress(ctx))
}

/// A held pointer button or a focused text field means an edit is still
/// underway. Value boxes report every keystroke as a change, so typed
/// values wait for Enter or focus loss.
fn gesture_in_progress(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.pointer.any_down()) || ctx.wants_keyboard_input()
}

fn render_galaxy_panel(ui: &mut egui::Ui, panel: &mut DebugPanel) {
    if ui.button("spin").clicked() {
        panel.request_spin();
    }

    let header = egui::CollapsingHeader::new("galaxy").open(Some(panel.is_expanded()));
    let response = header.show(ui, |ui| {
        for field in ParamField::ALL {
            if field.is_color() {
                color_row(ui, panel, field);
            } else {
                slider_row(ui, panel, field);
            }
        }
    });
    if response.header_response.clicked() {
        panel.toggle_expanded();
    }
}

fn slider_row(ui: &mut egui::Ui, panel: &mut DebugPanel, field: ParamField) {
    let (Some(range), Some(mut value)) = (field.range(), panel.staged().numeric(field)) else {
        return;
    };

    let decimals = if field.is_integer() { 0 } else { 3 };
    let slider = egui::Slider::new(&mut value, range.min..=range.max)
        .step_by(range.step)
        .max_decimals(decimals)
        .text(field.label());

    if ui.add(slider).changed() {
        panel.stage_numeric(field, value);
    }
}

fn color_row(ui: &mut egui::Ui, panel: &mut DebugPanel, field: ParamField) {
    let Some(color) = panel.staged().color(field) else {
        return;
    };
    let mut rgb = color.to_array();

    ui.horizontal(|ui| {
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            panel.stage_color(field, rgb.into());
        }
        ui.label(field.label());
    });
}
