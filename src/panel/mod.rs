//! Debug panel state and finish-change commit logic.
//!
//! The panel edits a *staged* copy of the parameters. A staged edit marks its
//! field pending; pending fields are committed only once no pointer button
//! is held, which is when a drag or color-picker gesture has finished. Each
//! commit yields a [`PanelEvent::Commit`] carrying the full committed
//! parameter set, so one gesture costs one regeneration.
//!
//! Drawing with egui lives in [`ui`]; everything here is toolkit-free.

pub mod ui;

use std::collections::BTreeSet;

use crate::color::Rgb;
use crate::input::Shortcut;
use crate::params::{GalaxyParams, ParamField};

/// Something the rest of the app must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// `field` finished changing; `params` is the new committed set.
    Commit {
        field: ParamField,
        params: GalaxyParams,
    },
    /// The spin button was pressed.
    Spin,
}

#[derive(Debug, Clone)]
pub struct DebugPanel {
    committed: GalaxyParams,
    staged: GalaxyParams,
    pending: BTreeSet<ParamField>,
    visible: bool,
    expanded: bool,
    spin_requested: bool,
    pub width: f32,
}

impl DebugPanel {
    pub fn new(params: GalaxyParams) -> Self {
        let params = params.validated();
        Self {
            committed: params,
            staged: params,
            pending: BTreeSet::new(),
            visible: true,
            expanded: true,
            spin_requested: false,
            width: 300.0,
        }
    }

    /// Parameters as of the last commit.
    pub fn committed(&self) -> &GalaxyParams {
        &self.committed
    }

    /// Parameters including edits still in progress.
    pub fn staged(&self) -> &GalaxyParams {
        &self.staged
    }

    pub fn is_pending(&self, field: ParamField) -> bool {
        self.pending.contains(&field)
    }

    /// Stage a numeric edit. The value is snapped to the field's range.
    /// Returns the staged value, or `None` for color fields.
    pub fn stage_numeric(&mut self, field: ParamField, value: f64) -> Option<f64> {
        let stored = self.staged.set_numeric(field, value)?;
        self.mark(field, self.staged.numeric(field) != self.committed.numeric(field));
        Some(stored)
    }

    /// Stage a color edit. Returns `false` for numeric fields.
    pub fn stage_color(&mut self, field: ParamField, color: Rgb) -> bool {
        if !self.staged.set_color(field, color) {
            return false;
        }
        self.mark(field, self.staged.color(field) != self.committed.color(field));
        true
    }

    fn mark(&mut self, field: ParamField, changed: bool) {
        if changed {
            self.pending.insert(field);
        } else {
            self.pending.remove(&field);
        }
    }

    /// Commit pending fields once the edit gesture is over: the pointer is
    /// released and no value box is being typed into.
    ///
    /// Fields are committed in panel order, one event each.
    pub fn settle(&mut self, gesture_active: bool) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        if self.spin_requested {
            self.spin_requested = false;
            events.push(PanelEvent::Spin);
        }
        if gesture_active {
            return events;
        }

        for field in std::mem::take(&mut self.pending) {
            let staged = self.staged;
            self.committed.copy_field(field, &staged);
            events.push(PanelEvent::Commit {
                field,
                params: self.committed,
            });
        }
        events
    }

    /// Press the spin button.
    pub fn request_spin(&mut self) {
        self.spin_requested = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::TogglePanel => self.toggle_visible(),
            Shortcut::ToggleCollapsed => self.toggle_expanded(),
        }
        log::debug!(
            "panel {:?}: visible={} expanded={}",
            shortcut,
            self.visible,
            self.expanded
        );
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new(GalaxyParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_commit_while_dragging() {
        let mut panel = DebugPanel::default();
        panel.stage_numeric(ParamField::Radius, 5.0);
        panel.stage_numeric(ParamField::Radius, 6.0);
        assert!(panel.settle(true).is_empty());
        assert_eq!(panel.committed().radius, 10.0);
        assert_eq!(panel.staged().radius, 6.0);
    }

    #[test]
    fn test_commit_once_after_release() {
        let mut panel = DebugPanel::default();
        panel.stage_numeric(ParamField::Radius, 5.0);
        panel.settle(true);
        panel.stage_numeric(ParamField::Radius, 7.5);
        panel.settle(true);

        let events = panel.settle(false);
        assert_eq!(events.len(), 1);
        match &events[0] {
            PanelEvent::Commit { field, params } => {
                assert_eq!(*field, ParamField::Radius);
                assert_eq!(params.radius, 7.5);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(panel.settle(false).is_empty());
    }

    #[test]
    fn test_staged_values_are_snapped() {
        let mut panel = DebugPanel::default();
        assert_eq!(panel.stage_numeric(ParamField::Count, 5_000_000.0), Some(1_000_000.0));
        assert_eq!(panel.stage_numeric(ParamField::BranchCount, 3.4), Some(3.0));
        assert_eq!(panel.stage_numeric(ParamField::InsideColor, 1.0), None);
    }

    #[test]
    fn test_commits_in_field_order() {
        let mut panel = DebugPanel::default();
        panel.stage_color(ParamField::OutsideColor, Rgb::WHITE);
        panel.stage_numeric(ParamField::Count, 2000.0);
        let fields: Vec<_> = panel
            .settle(false)
            .into_iter()
            .filter_map(|e| match e {
                PanelEvent::Commit { field, .. } => Some(field),
                PanelEvent::Spin => None,
            })
            .collect();
        assert_eq!(fields, vec![ParamField::Count, ParamField::OutsideColor]);
        assert_eq!(panel.committed().count, 2000);
        assert_eq!(panel.committed().outside_color, Rgb::WHITE);
    }

    #[test]
    fn test_color_commit() {
        let mut panel = DebugPanel::default();
        let red = Rgb::new(1.0, 0.0, 0.0);
        assert!(panel.stage_color(ParamField::InsideColor, red));
        assert!(!panel.stage_color(ParamField::Size, red));
        let events = panel.settle(false);
        assert_eq!(
            events,
            vec![PanelEvent::Commit {
                field: ParamField::InsideColor,
                params: *panel.committed(),
            }]
        );
        assert_eq!(panel.committed().inside_color, red);
    }

    #[test]
    fn test_unchanged_edit_does_not_commit() {
        let mut panel = DebugPanel::default();
        panel.stage_numeric(ParamField::Size, 0.01);
        assert!(panel.settle(false).is_empty());
    }

    #[test]
    fn test_edit_back_to_committed_value_is_dropped() {
        let mut panel = DebugPanel::default();
        panel.stage_numeric(ParamField::BranchCount, 5.0);
        assert!(panel.is_pending(ParamField::BranchCount));
        panel.stage_numeric(ParamField::BranchCount, 3.0);
        assert!(!panel.is_pending(ParamField::BranchCount));
        assert!(panel.settle(false).is_empty());
    }

    #[test]
    fn test_spin_is_independent_of_commits() {
        let mut panel = DebugPanel::default();
        panel.stage_numeric(ParamField::BranchSpin, 1.0);
        panel.request_spin();
        let events = panel.settle(true);
        assert_eq!(events, vec![PanelEvent::Spin]);
        assert!(panel.is_pending(ParamField::BranchSpin));
    }

    #[test]
    fn test_shortcuts_toggle_state() {
        let mut panel = DebugPanel::default();
        assert!(panel.is_visible());
        assert!(panel.is_expanded());
        panel.apply_shortcut(Shortcut::TogglePanel);
        assert!(!panel.is_visible());
        panel.apply_shortcut(Shortcut::ToggleCollapsed);
        assert!(!panel.is_expanded());
        panel.apply_shortcut(Shortcut::TogglePanel);
        assert!(panel.is_visible());
    }
}
