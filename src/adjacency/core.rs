use slotmap::SlotMap;

use crate::geometry::{Rect, Side};
use crate::pane::{Pane, PaneId};

/// True when `b` borders `a` on `a`'s side `side`.
///
/// Two panes share a border when their facing edges are colinear and their
/// spans along the border overlap by more than zero cells. Meeting at a
/// single corner point does not count.
pub fn share_border(a: &Rect, b: &Rect, side: Side) -> bool {
    let edges_touch = match side {
        Side::Above => a.y == b.bottom(),
        Side::Below => a.bottom() == b.y,
        Side::Left => a.x == b.right(),
        Side::Right => a.right() == b.x,
    };
    edges_touch && a.span_overlap(b, side.border_axis()) > 0
}

/// All live panes bordering `rect` on `side`, ordered by their position
/// along the border (top-to-bottom for left/right, left-to-right for
/// above/below). `exclude` filters the querying pane itself out of the
/// scan.
///
/// This is the authoritative adjacency query. It is derived from geometry
/// on every call, never cached and never read back from the single-slot
/// pointers, so it stays correct across any sequence of structural edits.
pub fn border_panes(
    arena: &SlotMap<PaneId, Pane>,
    rect: &Rect,
    side: Side,
    exclude: &[PaneId],
) -> Vec<PaneId> {
    let axis = side.border_axis();
    let mut found: Vec<PaneId> = arena
        .iter()
        .filter(|(id, _)| !exclude.contains(id))
        .filter(|(_, pane)| share_border(rect, &pane.rect(), side))
        .map(|(id, _)| id)
        .collect();
    found.sort_by_key(|id| arena[*id].rect().span_start(axis));
    found
}

/// Ordered adjacency list for a live pane's side.
pub fn edge_neighbors(arena: &SlotMap<PaneId, Pane>, id: PaneId, side: Side) -> Vec<PaneId> {
    let Some(pane) = arena.get(id) else {
        return Vec::new();
    };
    border_panes(arena, &pane.rect(), side, &[id])
}

/// The neighbor a single slot should point at after the pane's extent
/// changed: the first pane along the border whose far offset reaches the
/// pane's own near offset. Used to re-seed slots after split, close, and
/// resize move the border's starting pane.
pub fn first_full_neighbor(
    arena: &SlotMap<PaneId, Pane>,
    rect: &Rect,
    side: Side,
    exclude: &[PaneId],
) -> Option<PaneId> {
    let axis = side.border_axis();
    let near = rect.span_start(axis);
    border_panes(arena, rect, side, exclude)
        .into_iter()
        .find(|id| arena[*id].rect().span_end(axis) >= near)
}
