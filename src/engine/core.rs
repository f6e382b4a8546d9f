use slotmap::SlotMap;

use crate::adjacency::{edge_neighbors, first_full_neighbor, share_border};
use crate::engine::{Command, CommandOutcome};
use crate::error::{EngineError, Result};
use crate::geometry::{Rect, Side, Size};
use crate::pane::{Pane, PaneContent, PaneId, PaneSnapshot};

/// Dynamic rectangular-tiling engine.
///
/// Owns the pane arena and the active pointer. Every structural operation
/// runs to completion before returning: geometry is mutated and all
/// neighbor slots are re-derived in the same call, so the board is always
/// a gapless, overlap-free partition of the container between calls.
///
/// Operations that have no eligible target (swapping toward a container
/// edge, closing the last pane) are silent no-ops; nothing is mutated on
/// those paths.
pub struct LayoutEngine {
    panes: SlotMap<PaneId, Pane>,
    active: Option<PaneId>,
    container: Size,
}

impl LayoutEngine {
    /// Empty engine over a container. The first pane arrives through
    /// [`Command::New`] or [`LayoutEngine::with_root`].
    pub fn new(container: Size) -> Result<Self> {
        if container.width == 0 || container.height == 0 {
            return Err(EngineError::InvalidResize {
                width: container.width,
                height: container.height,
            });
        }
        Ok(Self {
            panes: SlotMap::with_key(),
            active: None,
            container,
        })
    }

    /// Engine with a single root pane covering the whole container.
    pub fn with_root(container: Size, content: PaneContent) -> Result<Self> {
        let mut engine = Self::new(container)?;
        engine.attach_content(content);
        Ok(engine)
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn active(&self) -> Option<PaneId> {
        self.active
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id)
    }

    pub fn rect_of(&self, id: PaneId) -> Option<Rect> {
        self.panes.get(id).map(Pane::rect)
    }

    /// Ordered adjacency list for a pane's side, derived fresh from
    /// geometry on every call.
    pub fn neighbors(&self, id: PaneId, side: Side) -> Vec<PaneId> {
        edge_neighbors(&self.panes, id, side)
    }

    /// Collaborator-facing view of the whole board, ordered by position.
    pub fn snapshot(&self) -> Vec<PaneSnapshot> {
        let mut panes: Vec<PaneSnapshot> = self
            .panes
            .iter()
            .map(|(id, pane)| PaneSnapshot {
                id,
                rect: pane.rect(),
                content: pane.content().clone(),
                is_active: Some(id) == self.active,
            })
            .collect();
        panes.sort_by_key(|snap| (snap.rect.y, snap.rect.x));
        panes
    }

    /// Run one command against the board.
    pub fn apply(&mut self, command: &Command) -> Result<CommandOutcome> {
        let previous_active = self.active;
        let mut outcome = CommandOutcome::default();

        match command {
            Command::Split(side) => {
                if let Some(id) = self.split(*side) {
                    outcome.created = Some(id);
                    outcome.layout_changed = true;
                }
            }
            Command::Swap(side) => {
                outcome.layout_changed = self.swap(*side);
            }
            Command::Close => {
                if let Some(id) = self.close() {
                    outcome.removed = Some(id);
                    outcome.layout_changed = true;
                }
            }
            Command::Switch(side) => {
                self.switch_active(*side);
            }
            Command::Resize(size) => {
                self.resize(*size)?;
                outcome.layout_changed = !self.panes.is_empty();
            }
            Command::New(content) => match self.attach_content(content.clone()) {
                Some(id) => {
                    outcome.created = Some(id);
                    outcome.layout_changed = true;
                }
                None => outcome.content_changed = true,
            },
        }

        outcome.active_changed = self.active != previous_active;
        Ok(outcome)
    }

    /// Handle `NEW`: on an empty board create the root pane holding
    /// `content` and make it active; otherwise hand the content to the
    /// active pane. Returns the root's id when one was created.
    pub fn attach_content(&mut self, content: PaneContent) -> Option<PaneId> {
        match self.active {
            None => {
                let id = self
                    .panes
                    .insert(Pane::with_content(self.container.as_rect(), content));
                self.active = Some(id);
                Some(id)
            }
            Some(active) => {
                self.panes[active].set_content(content);
                None
            }
        }
    }

    /// Divide the active pane in half along `side`. The new pane takes the
    /// named side's half and becomes active; its content starts empty and
    /// the caller supplies it once split returns. Returns the new pane's
    /// id, or `None` when there is no active pane or it is too small to
    /// halve.
    pub fn split(&mut self, side: Side) -> Option<PaneId> {
        let active_id = self.active?;
        let old_rect = self.panes[active_id].rect();
        let (kept, fresh) = split_rect(old_rect, side)?;

        // Adjacency around the original rectangle, captured before any
        // mutation.
        let old_lists: [Vec<PaneId>; 4] =
            Side::ALL.map(|s| edge_neighbors(&self.panes, active_id, s));
        let old_far_slot = self.panes[active_id].neighbor(side);

        let new_id = self.panes.insert(Pane::new(fresh));
        self.panes[active_id].set_rect(kept);

        // The freshly cut edge links the two halves directly, both ways.
        self.panes[active_id].set_neighbor(side, Some(new_id));
        self.panes[new_id].set_neighbor(side.opposite(), Some(active_id));

        // The named side's outer edge now belongs to the new pane: it
        // inherits the old slot, and every outside pane that pointed in
        // through that edge follows.
        self.panes[new_id].set_neighbor(side, old_far_slot);
        for ext in &old_lists[side.index()] {
            if self.panes[*ext].neighbor(side.opposite()) == Some(active_id) {
                self.panes[*ext].set_neighbor(side.opposite(), Some(new_id));
            }
        }

        // Flanking edges: an outside pane that pointed at the split pane is
        // reassigned to whichever half it actually borders; one that spans
        // the cut goes to the first half along the border. Each half's own
        // slot is re-derived from the old list by the same predicate.
        for flank in side.flanks() {
            let toward = flank.opposite();
            let axis = toward.border_axis();
            let mut halves = [(active_id, kept), (new_id, fresh)];
            halves.sort_by_key(|(_, rect)| rect.span_start(axis));

            for ext in &old_lists[flank.index()] {
                if self.panes[*ext].neighbor(toward) != Some(active_id) {
                    continue;
                }
                let ext_rect = self.panes[*ext].rect();
                let target = halves
                    .iter()
                    .find(|(_, rect)| share_border(&ext_rect, rect, toward))
                    .map(|(id, _)| *id);
                if let Some(target) = target {
                    self.panes[*ext].set_neighbor(toward, Some(target));
                }
            }

            let kept_slot = old_lists[flank.index()]
                .iter()
                .copied()
                .find(|n| share_border(&kept, &self.panes[*n].rect(), flank));
            let fresh_slot = old_lists[flank.index()]
                .iter()
                .copied()
                .find(|n| share_border(&fresh, &self.panes[*n].rect(), flank));
            self.panes[active_id].set_neighbor(flank, kept_slot);
            self.panes[new_id].set_neighbor(flank, fresh_slot);
        }

        self.active = Some(new_id);
        Some(new_id)
    }

    /// Exchange the active pane with its slot neighbor on `side`:
    /// rectangles are swapped wholesale and each participant inherits the
    /// other's outside relationships, while the pair's mutual link is
    /// preserved. Returns false when there is no neighbor to swap with.
    pub fn swap(&mut self, side: Side) -> bool {
        let Some(a) = self.active else {
            return false;
        };
        let Some(b) = self.panes[a].neighbor(side) else {
            return false;
        };
        if a == b || !self.panes.contains_key(b) {
            return false;
        }

        let a_rect = self.panes[a].rect();
        let b_rect = self.panes[b].rect();
        let a_slots: [Option<PaneId>; 4] = Side::ALL.map(|s| self.panes[a].neighbor(s));
        let b_slots: [Option<PaneId>; 4] = Side::ALL.map(|s| self.panes[b].neighbor(s));

        // Outside panes that pointed at either participant and actually
        // bordered it follow the rectangle to the other participant.
        let mut repoints: Vec<(PaneId, Side, PaneId)> = Vec::new();
        for (id, pane) in self.panes.iter() {
            if id == a || id == b {
                continue;
            }
            for s in Side::ALL {
                match pane.neighbor(s) {
                    Some(n) if n == a && share_border(&pane.rect(), &a_rect, s) => {
                        repoints.push((id, s, b));
                    }
                    Some(n) if n == b && share_border(&pane.rect(), &b_rect, s) => {
                        repoints.push((id, s, a));
                    }
                    _ => {}
                }
            }
        }

        self.panes[a].set_rect(b_rect);
        self.panes[b].set_rect(a_rect);

        // Each participant takes the other's slots. A slot that pointed
        // back at the other participant keeps the pair linked instead of
        // becoming a self-reference.
        for s in Side::ALL {
            let from_b = b_slots[s.index()];
            let from_a = a_slots[s.index()];
            self.panes[a].set_neighbor(s, if from_b == Some(a) { Some(b) } else { from_b });
            self.panes[b].set_neighbor(s, if from_a == Some(b) { Some(a) } else { from_a });
        }

        for (id, s, to) in repoints {
            self.panes[id].set_neighbor(s, Some(to));
        }
        true
    }

    /// Close the active pane and hand its rectangle to the first side whose
    /// neighbors fit it squarely. The first absorbing pane becomes active.
    /// Returns the removed pane's id, or `None` when fewer than two panes
    /// exist or no side fits.
    pub fn close(&mut self) -> Option<PaneId> {
        let closing = self.active?;
        if self.panes.len() <= 1 {
            return None;
        }

        let rect = self.panes[closing].rect();
        let lists: [Vec<PaneId>; 4] = Side::ALL.map(|s| edge_neighbors(&self.panes, closing, s));

        // Every pane's rectangle originated from a split of some ancestor,
        // so at least one side's neighbors tile the freed edge exactly.
        let side = Side::ALL
            .into_iter()
            .find(|s| self.fits_squarely(&rect, &lists[s.index()], *s))?;
        let absorbers = lists[side.index()].clone();
        let far_list = lists[side.opposite().index()].clone();

        for id in &absorbers {
            let mut r = self.panes[*id].rect();
            match side {
                Side::Above => r.height += rect.height,
                Side::Below => {
                    r.y = rect.y;
                    r.height += rect.height;
                }
                Side::Left => r.width += rect.width,
                Side::Right => {
                    r.x = rect.x;
                    r.width += rect.width;
                }
            }
            self.panes[*id].set_rect(r);
        }

        // Absorbers now face the freed direction; seed their slot there
        // from the closed pane's former far-side neighbors.
        let toward_far = side.opposite();
        for id in &absorbers {
            let r = self.panes[*id].rect();
            let slot = far_list
                .iter()
                .copied()
                .find(|f| share_border(&r, &self.panes[*f].rect(), toward_far));
            self.panes[*id].set_neighbor(toward_far, slot);
        }

        // Neighbors on the other three sides that pointed at the closed
        // pane move to the nearest absorber bordering them.
        for s in Side::ALL {
            if s == side {
                continue;
            }
            let toward = s.opposite();
            for ext in &lists[s.index()] {
                if self.panes[*ext].neighbor(toward) != Some(closing) {
                    continue;
                }
                let ext_rect = self.panes[*ext].rect();
                let slot = absorbers
                    .iter()
                    .copied()
                    .find(|ab| share_border(&ext_rect, &self.panes[*ab].rect(), toward));
                self.panes[*ext].set_neighbor(toward, slot);
            }
        }

        self.panes.remove(closing);
        for (_, pane) in self.panes.iter_mut() {
            pane.scrub_neighbor(closing);
        }
        self.active = absorbers.first().copied();
        Some(closing)
    }

    /// Move the active pointer to the slot neighbor on `side`. No-op when
    /// the slot is empty.
    pub fn switch_active(&mut self, side: Side) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        match self.panes[active].neighbor(side) {
            Some(next) if self.panes.contains_key(next) => {
                self.active = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Rescale every pane proportionally to the new container size.
    ///
    /// Each offset and extent is scaled independently with round-half-up
    /// division, matching the behavior the hosting application has always
    /// had: repeated resizes can drift the partition by a cell or two, and
    /// the drift is accepted rather than redistributing remainders.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Err(EngineError::InvalidResize {
                width: size.width,
                height: size.height,
            });
        }

        let old = self.container;
        self.container = size;
        if old == size || self.panes.is_empty() {
            return Ok(());
        }

        let ids: Vec<PaneId> = self.panes.keys().collect();
        for id in &ids {
            let r = self.panes[*id].rect();
            let scaled = Rect::new(
                scale(r.x, old.width, size.width),
                scale(r.y, old.height, size.height),
                scale(r.width, old.width, size.width),
                scale(r.height, old.height, size.height),
            );
            self.panes[*id].set_rect(scaled);
        }

        // Rounding can change which pane borders first; re-seed any slot
        // whose pane no longer borders it.
        for id in &ids {
            for s in Side::ALL {
                let rect = self.panes[*id].rect();
                let stale = match self.panes[*id].neighbor(s) {
                    Some(n) => {
                        !self.panes.contains_key(n)
                            || !share_border(&rect, &self.panes[n].rect(), s)
                    }
                    None => false,
                };
                if stale {
                    let seed = first_full_neighbor(&self.panes, &rect, s, &[*id]);
                    self.panes[*id].set_neighbor(s, seed);
                }
            }
        }
        Ok(())
    }

    /// A neighbor list fits squarely when it tiles the closed pane's edge
    /// end to end: first near offset and last far offset line up exactly.
    fn fits_squarely(&self, rect: &Rect, list: &[PaneId], side: Side) -> bool {
        let (Some(first), Some(last)) = (list.first(), list.last()) else {
            return false;
        };
        let axis = side.border_axis();
        self.panes[*first].rect().span_start(axis) == rect.span_start(axis)
            && self.panes[*last].rect().span_end(axis) == rect.span_end(axis)
    }
}

/// Halve a rectangle along `side`. The named side's floor-half goes to the
/// new pane; the original keeps the remainder.
fn split_rect(rect: Rect, side: Side) -> Option<(Rect, Rect)> {
    match side {
        Side::Above => {
            let half = rect.height / 2;
            if half == 0 {
                return None;
            }
            let fresh = Rect::new(rect.x, rect.y, rect.width, half);
            let kept = Rect::new(rect.x, rect.y + half, rect.width, rect.height - half);
            Some((kept, fresh))
        }
        Side::Below => {
            let half = rect.height / 2;
            if half == 0 {
                return None;
            }
            let kept = Rect::new(rect.x, rect.y, rect.width, rect.height - half);
            let fresh = Rect::new(
                rect.x,
                rect.y + rect.height - half,
                rect.width,
                half,
            );
            Some((kept, fresh))
        }
        Side::Left => {
            let half = rect.width / 2;
            if half == 0 {
                return None;
            }
            let fresh = Rect::new(rect.x, rect.y, half, rect.height);
            let kept = Rect::new(rect.x + half, rect.y, rect.width - half, rect.height);
            Some((kept, fresh))
        }
        Side::Right => {
            let half = rect.width / 2;
            if half == 0 {
                return None;
            }
            let kept = Rect::new(rect.x, rect.y, rect.width - half, rect.height);
            let fresh = Rect::new(
                rect.x + rect.width - half,
                rect.y,
                half,
                rect.height,
            );
            Some((kept, fresh))
        }
    }
}

/// Round-half-up proportional rescale of one coordinate.
fn scale(value: u16, old_extent: u16, new_extent: u16) -> u16 {
    (((value as u32) * (new_extent as u32) + (old_extent as u32) / 2) / (old_extent as u32)) as u16
}
