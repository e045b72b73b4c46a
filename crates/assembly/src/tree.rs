//! The part collection: identity, selection, editing and the per-frame pass.

use std::collections::{BTreeMap, BTreeSet};

use arbor_kernel::{Pose, Vec3};
use arbor_parts::{DisplayFlags, Part, PartId, PartShape};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::display::{InteractionState, RenderDirective};
use crate::engine::{compatibility_sweep, intersection_sweep, SweepEntry};
use crate::settings::{snap_vec, TreeSettings};
use crate::structure::{StructuralModel, StructuralNode};
use crate::types::{SettingsError, TreeError};

/// What one call to [`Tree::frame`] produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// One directive per live part, in insertion order.
    pub directives: Vec<RenderDirective>,
    /// Parts deleted since the previous frame; the host frees their resources.
    pub released: Vec<PartId>,
    /// Number of colliding part pairs.
    pub intersecting_pairs: usize,
    /// Number of connection points with a mate.
    pub connected_points: usize,
}

impl FrameReport {
    pub fn directive(&self, id: PartId) -> Option<&RenderDirective> {
        self.directives.iter().find(|d| d.part == id)
    }
}

/// Owns every live part.
///
/// Ids come from a monotonic counter and are never reused, so they also give
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    parts: BTreeMap<PartId, Part>,
    next_id: u64,
    selection: BTreeSet<PartId>,
    released: Vec<PartId>,
    settings: TreeSettings,
    /// Drag motion not yet large enough to snap.
    drag_residual: Vec3,
    rotate_residual: Vec3,
}

impl Tree {
    /// An empty tree with checked settings. The builders trust these values,
    /// so a plate thickness near zero would otherwise ask for one stem joint
    /// per sliver of tube.
    pub fn new(settings: TreeSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn add(&mut self, shape: PartShape, pose: Pose) -> PartId {
        let part = Part::build(shape, pose, &self.settings.build);
        let id = self.insert(part);
        info!(%id, kind = %shape.kind(), "part added");
        id
    }

    fn insert(&mut self, part: Part) -> PartId {
        let id = PartId(self.next_id);
        self.next_id += 1;
        self.parts.insert(id, part);
        id
    }

    /// Add a rebuilt copy of `id` at its current pose, with the same display
    /// flags. The copy is not selected.
    #[instrument(skip(self))]
    pub fn copy(&mut self, id: PartId) -> Result<PartId, TreeError> {
        let copy = self.part(id)?.duplicate(&self.settings.build);
        let new_id = self.insert(copy);
        info!(source = %id, copy = %new_id, "part copied");
        Ok(new_id)
    }

    #[instrument(skip(self))]
    pub fn delete(&mut self, id: PartId) -> Result<Part, TreeError> {
        let part = self.parts.remove(&id).ok_or(TreeError::PartNotFound { id })?;
        self.selection.remove(&id);
        self.released.push(id);
        info!(%id, "part deleted");
        Ok(part)
    }

    /// Replace `id` by a mirrored rebuild under a fresh id.
    #[instrument(skip(self))]
    pub fn reflect(&mut self, id: PartId) -> Result<PartId, TreeError> {
        let mirrored = self.part(id)?.reflect(&self.settings.build)?;
        let was_selected = self.selection.contains(&id);
        self.delete(id)?;
        let new_id = self.insert(mirrored);
        if was_selected {
            self.selection.insert(new_id);
        }
        info!(source = %id, mirrored = %new_id, "part reflected");
        Ok(new_id)
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.get(&id)
    }

    fn part(&self, id: PartId) -> Result<&Part, TreeError> {
        self.parts.get(&id).ok_or(TreeError::PartNotFound { id })
    }

    fn part_mut(&mut self, id: PartId) -> Result<&mut Part, TreeError> {
        self.parts.get_mut(&id).ok_or(TreeError::PartNotFound { id })
    }

    /// Parts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PartId, &Part)> + '_ {
        self.parts.iter().map(|(id, p)| (*id, p))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    // ── Motion ────────────────────────────────────────────────────────────

    pub fn translate(&mut self, id: PartId, delta: Vec3) -> Result<(), TreeError> {
        self.part_mut(id)?.translate(delta);
        Ok(())
    }

    pub fn rotate(&mut self, id: PartId, delta: Vec3) -> Result<(), TreeError> {
        self.part_mut(id)?.rotate(delta);
        Ok(())
    }

    /// Feed an incremental drag delta. Whole translation increments are
    /// applied to every selected part and the rest is carried to the next
    /// call. Returns the applied step.
    pub fn drag_selected_translate(&mut self, delta: Vec3) -> Vec3 {
        let total = self.drag_residual + delta;
        let step = snap_vec(total, self.settings.translation_snap);
        self.drag_residual = total - step;
        for id in &self.selection {
            if let Some(part) = self.parts.get_mut(id) {
                part.translate(step);
            }
        }
        step
    }

    /// Rotation counterpart of [`Tree::drag_selected_translate`].
    pub fn drag_selected_rotate(&mut self, delta: Vec3) -> Vec3 {
        let total = self.rotate_residual + delta;
        let step = snap_vec(total, self.settings.rotation_snap);
        self.rotate_residual = total - step;
        for id in &self.selection {
            if let Some(part) = self.parts.get_mut(id) {
                part.rotate(step);
            }
        }
        step
    }

    /// Drop any unsnapped drag remainder.
    pub fn end_drag(&mut self) {
        self.drag_residual = Vec3::ZERO;
        self.rotate_residual = Vec3::ZERO;
    }

    // ── Selection and hover ───────────────────────────────────────────────

    pub fn select(&mut self, id: PartId) -> Result<(), TreeError> {
        self.part(id)?;
        self.selection.insert(id);
        Ok(())
    }

    /// Returns whether the part was selected.
    pub fn deselect(&mut self, id: PartId) -> bool {
        self.selection.remove(&id)
    }

    /// Returns the new selection state.
    pub fn toggle_selected(&mut self, id: PartId) -> Result<bool, TreeError> {
        self.part(id)?;
        if self.selection.remove(&id) {
            Ok(false)
        } else {
            self.selection.insert(id);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> impl Iterator<Item = PartId> + '_ {
        self.selection.iter().copied()
    }

    pub fn is_selected(&self, id: PartId) -> bool {
        self.selection.contains(&id)
    }

    /// Hover at most one part; `None` clears the hover.
    pub fn set_hovered(&mut self, id: Option<PartId>) -> Result<(), TreeError> {
        if let Some(id) = id {
            self.part(id)?;
        }
        for (pid, part) in &mut self.parts {
            part.state.hovered = Some(*pid) == id;
        }
        Ok(())
    }

    // ── Display toggles ───────────────────────────────────────────────────

    fn toggle_display(
        &mut self,
        id: PartId,
        flag: impl FnOnce(&mut DisplayFlags) -> &mut bool,
    ) -> Result<bool, TreeError> {
        let value = flag(&mut self.part_mut(id)?.display);
        *value = !*value;
        Ok(*value)
    }

    pub fn toggle_visibility(&mut self, id: PartId) -> Result<bool, TreeError> {
        self.toggle_display(id, |d| &mut d.visible)
    }

    pub fn toggle_transparency(&mut self, id: PartId) -> Result<bool, TreeError> {
        self.toggle_display(id, |d| &mut d.transparent)
    }

    pub fn toggle_connections(&mut self, id: PartId) -> Result<bool, TreeError> {
        self.toggle_display(id, |d| &mut d.show_connections)
    }

    pub fn toggle_structural_view(&mut self, id: PartId) -> Result<bool, TreeError> {
        self.toggle_display(id, |d| &mut d.structural_view)
    }

    // ── Per-frame pass ────────────────────────────────────────────────────

    /// Run both sweeps over the visible parts, store the results on each part
    /// and resolve one render directive per part.
    #[instrument(skip(self), fields(parts = self.parts.len()))]
    pub fn frame(&mut self) -> FrameReport {
        let tolerance = self.settings.build.coincidence;
        let (ids, colliding, links) = {
            let entries: Vec<SweepEntry<'_>> = self
                .parts
                .iter()
                .filter(|(_, p)| p.display.visible)
                .map(|(id, p)| SweepEntry::new(*id, p))
                .collect();
            let colliding = intersection_sweep(&entries);
            let links = compatibility_sweep(&entries, &colliding, tolerance);
            let ids: Vec<PartId> = entries.iter().map(|e| e.id).collect();
            (ids, colliding, links)
        };

        for (id, part) in &mut self.parts {
            part.clear_connections();
            part.state.intersecting = false;
            part.state.selected = self.selection.contains(id);
        }
        for (a, b) in &colliding {
            for id in [a, b] {
                if let Some(part) = self.parts.get_mut(id) {
                    part.state.intersecting = true;
                }
            }
        }
        let mut connected_points = 0;
        for (id, part_links) in ids.iter().zip(links) {
            if let Some(part) = self.parts.get_mut(id) {
                for (point, link) in part.connections_mut().iter_mut().zip(part_links) {
                    connected_points += usize::from(link.is_some());
                    point.connected_to = link;
                }
            }
        }

        let directives: Vec<RenderDirective> = self
            .parts
            .iter()
            .map(|(id, part)| RenderDirective::for_part(*id, part))
            .collect();
        let highlighted = directives
            .iter()
            .filter(|d| d.state != InteractionState::Default)
            .count();
        debug!(
            pairs = colliding.len(),
            connected_points, highlighted, "frame resolved"
        );

        FrameReport {
            directives,
            released: std::mem::take(&mut self.released),
            intersecting_pairs: colliding.len(),
            connected_points,
        }
    }

    /// World-space skeletons of the visible parts shown in structural view.
    pub fn structural_model(&self) -> StructuralModel {
        let mut model = StructuralModel::default();
        for (id, part) in self
            .iter()
            .filter(|(_, p)| p.display.visible && p.display.structural_view)
        {
            let skeleton = part.skeleton().transformed(&part.world_transform());
            let base = model.nodes.len();
            model
                .nodes
                .extend(skeleton.nodes.iter().map(|&position| StructuralNode { part: id, position }));
            model
                .members
                .extend(skeleton.members.iter().map(|&(a, b)| (base + a, base + b)));
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arbor_parts::LeafParams;

    fn leaf() -> PartShape {
        PartShape::Leaf(LeafParams {
            width: 2.0,
            height: 2.0,
            thickness: 0.5,
        })
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut tree = Tree::default();
        let a = tree.add(leaf(), Pose::default());
        let b = tree.add(leaf(), Pose::default());
        tree.delete(b).unwrap();
        let c = tree.add(leaf(), Pose::default());
        assert!(a < b && b < c);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_delete_clears_selection_and_releases() {
        let mut tree = Tree::default();
        let a = tree.add(leaf(), Pose::default());
        tree.select(a).unwrap();
        tree.delete(a).unwrap();
        assert_eq!(tree.selected().count(), 0);
        assert_eq!(tree.frame().released, vec![a]);
        assert!(tree.frame().released.is_empty());
        assert_eq!(tree.delete(a).unwrap_err(), TreeError::PartNotFound { id: a });
    }

    #[test]
    fn test_drag_snaps_and_carries_remainder() {
        let mut tree = Tree::default();
        let a = tree.add(leaf(), Pose::default());
        tree.select(a).unwrap();
        assert_eq!(tree.drag_selected_translate(Vec3::new(0.3, 0.0, 0.0)), Vec3::ZERO);
        let step = tree.drag_selected_translate(Vec3::new(0.3, 0.0, 0.0));
        assert_relative_eq!(step.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(tree.get(a).unwrap().pose().position.x, 0.5, epsilon = 1e-12);

        // About 0.1 is left over, so 0.45 more completes another increment.
        let step = tree.drag_selected_translate(Vec3::new(0.45, 0.0, 0.0));
        assert_relative_eq!(step.x, 0.5, epsilon = 1e-12);
        tree.end_drag();
        assert_eq!(tree.drag_selected_translate(Vec3::new(0.4, 0.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_new_rejects_unchecked_settings() {
        let mut settings = TreeSettings::default();
        settings.build.plate_thickness = 0.0;
        assert_eq!(
            Tree::new(settings).unwrap_err(),
            SettingsError::NonPositive {
                field: "plate_thickness",
                value: 0.0
            }
        );
        settings.build.plate_thickness = f64::INFINITY;
        assert!(Tree::new(settings).is_err());
        assert!(Tree::new(TreeSettings::default()).is_ok());
    }

    #[test]
    fn test_hover_is_exclusive() {
        let mut tree = Tree::default();
        let a = tree.add(leaf(), Pose::default());
        let b = tree.add(leaf(), Pose::at(5.0, 0.0, 0.0));
        tree.set_hovered(Some(a)).unwrap();
        tree.set_hovered(Some(b)).unwrap();
        assert!(!tree.get(a).unwrap().state.hovered);
        assert!(tree.get(b).unwrap().state.hovered);
        assert!(tree.set_hovered(Some(PartId(99))).is_err());
    }

    #[test]
    fn test_toggles_report_new_value() {
        let mut tree = Tree::default();
        let a = tree.add(leaf(), Pose::default());
        assert!(!tree.toggle_visibility(a).unwrap());
        assert!(tree.toggle_transparency(a).unwrap());
        assert!(tree.toggle_connections(a).unwrap());
        assert!(tree.toggle_structural_view(a).unwrap());
    }
}
