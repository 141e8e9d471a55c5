// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tool activation registry for one plot.
//!
//! Each [`Category`] has at most one active tool. Activating a tool makes it
//! active in every category it declares and fully deactivates any tool it
//! displaces, so a multi-gesture tool is either active everywhere or nowhere.
//!
//! Inspectors are tracked separately: any number can be active at once, and
//! they never take part in category activation.
//!
//! A newly added tool that declares [`Category::Tap`] or [`Category::Pan`]
//! is activated automatically when none of its categories has an active tool
//! yet. Tools of every other category, wheel tools included, start inactive
//! until [`Toolbar::activate`] is called.

use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::tool::{Category, ToolId};

#[derive(Clone, Debug, Default)]
struct GestureEntry {
    tools: SmallVec<[ToolId; 4]>,
    active: Option<ToolId>,
}

/// Per-plot tool activation state.
#[derive(Clone, Debug, Default)]
pub struct Toolbar {
    gestures: HashMap<Category, GestureEntry>,
    memberships: HashMap<ToolId, SmallVec<[Category; 2]>>,
    inspectors: Vec<(ToolId, bool)>,
}

impl Toolbar {
    /// An empty toolbar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gesture tool for `categories`, or an inspector.
    ///
    /// Inspectors start active.
    pub fn add_tool(&mut self, tool: ToolId, categories: &[Category], inspector: bool) {
        if inspector {
            if !self.inspectors.iter().any(|(t, _)| *t == tool) {
                self.inspectors.push((tool, true));
            }
            return;
        }
        let mut declared: SmallVec<[Category; 2]> = SmallVec::new();
        for &category in categories {
            if declared.contains(&category) {
                continue;
            }
            declared.push(category);
            let entry = self.gestures.entry(category).or_default();
            if !entry.tools.contains(&tool) {
                entry.tools.push(tool);
            }
        }
        let automatic = declared.iter().any(|c| c.auto_activates())
            && declared.iter().all(|c| self.active(*c).is_none());
        self.memberships.insert(tool, declared);
        if automatic {
            self.activate(tool);
        }
    }

    /// Forget `tool` entirely.
    pub fn remove_tool(&mut self, tool: ToolId) {
        self.inspectors.retain(|(t, _)| *t != tool);
        if let Some(categories) = self.memberships.remove(&tool) {
            for category in categories {
                if let Some(entry) = self.gestures.get_mut(&category) {
                    entry.tools.retain(|t| *t != tool);
                    if entry.active == Some(tool) {
                        entry.active = None;
                    }
                }
            }
        }
    }

    /// Make `tool` the active tool of every category it declares.
    ///
    /// Returns `false` if `tool` is not a gesture tool of this toolbar.
    pub fn activate(&mut self, tool: ToolId) -> bool {
        let Some(categories) = self.memberships.get(&tool).cloned() else {
            return false;
        };
        for category in &categories {
            if let Some(previous) = self.active(*category) {
                if previous != tool {
                    self.deactivate(previous);
                }
            }
        }
        for category in categories {
            if let Some(entry) = self.gestures.get_mut(&category) {
                entry.active = Some(tool);
            }
        }
        true
    }

    /// Clear `tool` from every category where it is active.
    pub fn deactivate(&mut self, tool: ToolId) {
        for entry in self.gestures.values_mut() {
            if entry.active == Some(tool) {
                entry.active = None;
            }
        }
    }

    /// The active tool for `category`.
    pub fn active(&self, category: Category) -> Option<ToolId> {
        self.gestures.get(&category).and_then(|e| e.active)
    }

    /// Tools declared for `category`, in insertion order.
    pub fn tools(&self, category: Category) -> &[ToolId] {
        self.gestures
            .get(&category)
            .map(|e| e.tools.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `tool` is active anywhere, as gesture tool or inspector.
    pub fn is_active(&self, tool: ToolId) -> bool {
        self.gestures.values().any(|e| e.active == Some(tool))
            || self.inspectors.iter().any(|&(t, on)| t == tool && on)
    }

    /// Toggle an inspector. Returns `false` for unknown inspectors.
    pub fn set_inspector_active(&mut self, tool: ToolId, active: bool) -> bool {
        match self.inspectors.iter_mut().find(|(t, _)| *t == tool) {
            Some((_, on)) => {
                *on = active;
                true
            }
            None => false,
        }
    }

    /// Active inspectors, in insertion order.
    pub fn active_inspectors(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.inspectors
            .iter()
            .filter(|(_, on)| *on)
            .map(|(t, _)| *t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAN: ToolId = ToolId(1);
    const ZOOM: ToolId = ToolId(2);
    const MULTI: ToolId = ToolId(3);
    const CROSS: ToolId = ToolId(4);

    #[test]
    fn first_tool_per_category_is_auto_activated() {
        let mut tb = Toolbar::new();
        tb.add_tool(PAN, &[Category::Pan], false);
        tb.add_tool(ZOOM, &[Category::Pan], false);
        assert_eq!(tb.active(Category::Pan), Some(PAN));
        assert_eq!(tb.tools(Category::Pan), &[PAN, ZOOM]);
        assert!(tb.tools(Category::Scroll).is_empty());
    }

    #[test]
    fn wheel_and_hover_tools_start_inactive() {
        let mut tb = Toolbar::new();
        tb.add_tool(ZOOM, &[Category::Scroll], false);
        tb.add_tool(PAN, &[Category::Move], false);
        assert_eq!(tb.active(Category::Scroll), None);
        assert_eq!(tb.active(Category::Move), None);
        assert!(!tb.is_active(ZOOM));

        assert!(tb.activate(ZOOM));
        assert_eq!(tb.active(Category::Scroll), Some(ZOOM));
    }

    #[test]
    fn tap_or_pan_membership_activates_the_whole_tool() {
        let mut tb = Toolbar::new();
        tb.add_tool(MULTI, &[Category::Pan, Category::Pinch], false);
        assert_eq!(tb.active(Category::Pan), Some(MULTI));
        assert_eq!(tb.active(Category::Pinch), Some(MULTI));
    }

    #[test]
    fn activation_is_exclusive() {
        let mut tb = Toolbar::new();
        tb.add_tool(PAN, &[Category::Pan], false);
        tb.add_tool(ZOOM, &[Category::Pan], false);
        assert!(tb.activate(ZOOM));
        assert_eq!(tb.active(Category::Pan), Some(ZOOM));
        assert!(!tb.is_active(PAN));
    }

    #[test]
    fn multi_gesture_tools_move_as_a_unit() {
        let mut tb = Toolbar::new();
        tb.add_tool(MULTI, &[Category::Pan, Category::Tap], false);
        assert_eq!(tb.active(Category::Pan), Some(MULTI));
        assert_eq!(tb.active(Category::Tap), Some(MULTI));

        tb.add_tool(PAN, &[Category::Pan], false);
        tb.activate(PAN);
        assert_eq!(tb.active(Category::Pan), Some(PAN));
        assert_eq!(tb.active(Category::Tap), None);

        tb.activate(MULTI);
        assert_eq!(tb.active(Category::Pan), Some(MULTI));
        assert_eq!(tb.active(Category::Tap), Some(MULTI));
    }

    #[test]
    fn inspectors_toggle_independently() {
        let mut tb = Toolbar::new();
        tb.add_tool(CROSS, &[Category::Move], true);
        assert_eq!(tb.active_inspectors().collect::<Vec<_>>(), [CROSS]);
        assert_eq!(tb.active(Category::Move), None);
        assert!(tb.set_inspector_active(CROSS, false));
        assert_eq!(tb.active_inspectors().count(), 0);
        assert!(!tb.set_inspector_active(PAN, true));
    }

    #[test]
    fn removal_clears_activation() {
        let mut tb = Toolbar::new();
        tb.add_tool(PAN, &[Category::Pan], false);
        tb.add_tool(CROSS, &[Category::Move], true);
        tb.remove_tool(PAN);
        tb.remove_tool(CROSS);
        assert_eq!(tb.active(Category::Pan), None);
        assert!(tb.tools(Category::Pan).is_empty());
        assert_eq!(tb.active_inspectors().count(), 0);
        assert!(!tb.activate(PAN));
    }
}
