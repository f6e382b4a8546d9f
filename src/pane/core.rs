use crate::geometry::{Rect, Side};

slotmap::new_key_type! {
    /// Opaque arena handle for a live pane.
    pub struct PaneId;
}

/// Opaque content payload attached to a pane. The engine never interprets
/// it; the hosting application owns what it means.
pub type PaneContent = String;

/// A tileable rectangular region of the container.
///
/// A pane is a plain record: its rectangle, one neighbor slot per side, and
/// the content handle. All behavior lives in the engine; the neighbor slots
/// are non-owning arena keys used for default navigation, while the full
/// per-side adjacency is always derived from geometry (see the `adjacency`
/// module).
#[derive(Debug, Clone)]
pub struct Pane {
    rect: Rect,
    neighbors: [Option<PaneId>; 4],
    content: PaneContent,
}

impl Pane {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            neighbors: [None; 4],
            content: PaneContent::new(),
        }
    }

    pub fn with_content(rect: Rect, content: PaneContent) -> Self {
        Self {
            rect,
            neighbors: [None; 4],
            content,
        }
    }

    pub const fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// The single default-navigation neighbor on `side`, if any.
    pub fn neighbor(&self, side: Side) -> Option<PaneId> {
        self.neighbors[side.index()]
    }

    pub fn set_neighbor(&mut self, side: Side, neighbor: Option<PaneId>) {
        self.neighbors[side.index()] = neighbor;
    }

    /// Drop every slot that points at `id`. Called when a pane leaves the
    /// arena so no stale key survives.
    pub fn scrub_neighbor(&mut self, id: PaneId) {
        for slot in &mut self.neighbors {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }

    pub fn content(&self) -> &PaneContent {
        &self.content
    }

    pub fn set_content(&mut self, content: PaneContent) {
        self.content = content;
    }
}

/// Collaborator-facing view of one pane, emitted by the engine after every
/// structural change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    pub id: PaneId,
    pub rect: Rect,
    pub content: PaneContent,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn new_pane_has_empty_slots_and_content() {
        let pane = Pane::new(Rect::new(0, 0, 10, 10));
        for side in Side::ALL {
            assert!(pane.neighbor(side).is_none());
        }
        assert!(pane.content().is_empty());
    }

    #[test]
    fn scrub_clears_only_matching_slots() {
        let mut arena: SlotMap<PaneId, Pane> = SlotMap::with_key();
        let a = arena.insert(Pane::new(Rect::new(0, 0, 5, 5)));
        let b = arena.insert(Pane::new(Rect::new(5, 0, 5, 5)));

        let mut pane = Pane::new(Rect::new(0, 5, 10, 5));
        pane.set_neighbor(Side::Above, Some(a));
        pane.set_neighbor(Side::Right, Some(b));

        pane.scrub_neighbor(a);
        assert!(pane.neighbor(Side::Above).is_none());
        assert_eq!(pane.neighbor(Side::Right), Some(b));
    }
}
