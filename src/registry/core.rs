use std::collections::{HashMap, HashSet};

use blake3::Hash;

use crate::geometry::Rect;
use crate::pane::{PaneContent, PaneId, PaneSnapshot};

/// Last known collaborator-facing state of one pane.
#[derive(Debug, Clone)]
pub struct PaneState {
    pub rect: Rect,
    pub content: PaneContent,
    pub is_active: bool,
    hash: Option<Hash>,
    pub is_dirty: bool,
}

impl PaneState {
    fn new(rect: Rect, is_active: bool) -> Self {
        Self {
            rect,
            content: PaneContent::new(),
            is_active,
            hash: None,
            is_dirty: true,
        }
    }

    fn update_content(&mut self, content: &PaneContent) {
        let new_hash = blake3::hash(content.as_bytes());
        if self.hash.map(|h| h != new_hash).unwrap_or(true) {
            self.content = content.clone();
            self.hash = Some(new_hash);
            self.is_dirty = true;
        }
    }
}

/// Tracks which panes changed since the renderer last drained the registry.
///
/// The engine re-emits a full snapshot after every command; the registry
/// diffs it against the previous one so the rendering collaborator only
/// repaints panes whose rectangle, content, or focus flag actually moved.
/// Content changes are suppressed through a `blake3` hash so re-sending the
/// same payload stays cheap.
#[derive(Debug, Default)]
pub struct PaneRegistry {
    entries: HashMap<PaneId, PaneState>,
    dirty: HashSet<PaneId>,
}

impl PaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the registry with a fresh engine snapshot.
    pub fn sync(&mut self, snapshot: &[PaneSnapshot]) {
        use std::collections::hash_map::Entry;

        let mut newly_dirty = Vec::new();

        for snap in snapshot {
            match self.entries.entry(snap.id) {
                Entry::Occupied(mut entry) => {
                    let state = entry.get_mut();
                    if state.rect != snap.rect || state.is_active != snap.is_active {
                        state.rect = snap.rect;
                        state.is_active = snap.is_active;
                        state.is_dirty = true;
                    }
                    state.update_content(&snap.content);
                    if state.is_dirty {
                        newly_dirty.push(snap.id);
                    }
                }
                Entry::Vacant(vacant) => {
                    let state = vacant.insert(PaneState::new(snap.rect, snap.is_active));
                    state.update_content(&snap.content);
                    newly_dirty.push(snap.id);
                }
            }
        }

        // Drop panes the engine no longer knows about.
        let gone: Vec<PaneId> = self
            .entries
            .keys()
            .filter(|id| !snapshot.iter().any(|snap| snap.id == **id))
            .copied()
            .collect();
        for id in gone {
            self.entries.remove(&id);
            self.dirty.remove(&id);
        }

        self.dirty.extend(newly_dirty);
    }

    /// Drain the dirty set, clearing each pane's flag as it leaves.
    pub fn take_dirty(&mut self) -> Vec<(PaneId, PaneState)> {
        let ids: Vec<PaneId> = self.dirty.drain().collect();
        ids.into_iter()
            .filter_map(|id| {
                self.entries.get_mut(&id).map(|state| {
                    state.is_dirty = false;
                    (id, state.clone())
                })
            })
            .collect()
    }

    pub fn rect_of(&self, id: PaneId) -> Option<Rect> {
        self.entries.get(&id).map(|state| state.rect)
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.entries
            .iter()
            .find(|(_, state)| state.is_active)
            .map(|(id, _)| *id)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: PaneId, rect: Rect, content: &str, is_active: bool) -> PaneSnapshot {
        PaneSnapshot {
            id,
            rect,
            content: content.to_string(),
            is_active,
        }
    }

    fn pane_ids(count: usize) -> Vec<PaneId> {
        let mut arena: slotmap::SlotMap<PaneId, ()> = slotmap::SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn first_sync_marks_everything_dirty() {
        let ids = pane_ids(2);
        let mut registry = PaneRegistry::new();
        registry.sync(&[
            snap(ids[0], Rect::new(0, 0, 40, 20), "a", true),
            snap(ids[1], Rect::new(40, 0, 40, 20), "b", false),
        ]);

        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 2);
        assert!(!registry.has_dirty());
    }

    #[test]
    fn unchanged_content_stays_clean() {
        let ids = pane_ids(1);
        let mut registry = PaneRegistry::new();
        let board = [snap(ids[0], Rect::new(0, 0, 40, 20), "hello", true)];

        registry.sync(&board);
        registry.take_dirty();
        registry.sync(&board);
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn focus_change_dirties_both_panes() {
        let ids = pane_ids(2);
        let left = Rect::new(0, 0, 40, 20);
        let right = Rect::new(40, 0, 40, 20);
        let mut registry = PaneRegistry::new();

        registry.sync(&[snap(ids[0], left, "a", true), snap(ids[1], right, "b", false)]);
        registry.take_dirty();

        registry.sync(&[snap(ids[0], left, "a", false), snap(ids[1], right, "b", true)]);
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 2);
        assert_eq!(registry.active_pane(), Some(ids[1]));
    }

    #[test]
    fn removed_panes_leave_the_registry() {
        let ids = pane_ids(2);
        let mut registry = PaneRegistry::new();
        registry.sync(&[
            snap(ids[0], Rect::new(0, 0, 40, 20), "a", true),
            snap(ids[1], Rect::new(40, 0, 40, 20), "b", false),
        ]);
        registry.take_dirty();

        registry.sync(&[snap(ids[0], Rect::new(0, 0, 80, 20), "a", true)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.rect_of(ids[1]).is_none());
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].0, ids[0]);
    }
}
