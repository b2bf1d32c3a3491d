//! Generic virtualized tree view.
//!
//! The view owns a forest of adapter items (one per visible node of some
//! external tree) and never the external tree itself. Children are built
//! lazily, on first expansion or paint, and cached together with the parent's
//! fingerprint. A fingerprint mismatch on the next paint drops the cached
//! children wholesale; they are rebuilt the next time they are needed.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use slotmap::SlotMap;

use super::draw::{DrawList, IconCommand, PanelCommand, TextCommand};
use super::keybindings::ModifierFlags;
use super::menu::MenuEntry;
use super::theme::Theme;
use super::{Rect, RowId};
use crate::selection::Selection;

/// Which band of a row the pointer is over during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEdge {
    Top,
    Bottom,
    Middle,
}

impl DropEdge {
    /// Top and bottom bands are `fraction` of the row height each; the rest
    /// is the middle.
    pub fn from_pointer(rect: Rect, y: f32, fraction: f32) -> Self {
        let band = rect.height * fraction;
        if y < rect.y + band {
            DropEdge::Top
        } else if y >= rect.bottom() - band {
            DropEdge::Bottom
        } else {
            DropEdge::Middle
        }
    }
}

/// Reply of a row to a hovering or dropped payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    Ignore,
    Move,
}

/// Inputs for one row's render description.
#[derive(Debug, Clone, Copy)]
pub struct RowState<'a, P> {
    /// Label column: indented by depth.
    pub rect: Rect,
    /// Whole row, edge to edge of the viewport.
    pub full_span: Rect,
    pub selected: bool,
    /// Set only on the hovered row, and only when it would accept the drop.
    pub drop_edge: Option<DropEdge>,
    /// Payload of the drag in progress, if any.
    pub dragging: Option<&'a P>,
}

/// What a row wants drawn. Emitted in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub drop_indicator: Option<PanelCommand>,
    pub background: Option<PanelCommand>,
    pub icon: Option<IconCommand>,
    pub label: TextCommand,
    pub opacity: f32,
}

impl RenderSpec {
    pub fn emit(self, draw: &mut DrawList) {
        if let Some(p) = self.drop_indicator {
            draw.panels.push(p);
        }
        if let Some(p) = self.background {
            draw.panels.push(p);
        }
        if let Some(i) = self.icon {
            draw.icons.push(i);
        }
        draw.texts.push(self.label);
    }
}

/// Capabilities a node adapter exposes to the tree view.
///
/// `Model` is the external tree. The view hands it in on every call and never
/// stores it.
pub trait TreeItem: Sized {
    type Model;
    /// Identity used to remember expansion across child rebuilds.
    type Key: Copy + Eq + Hash + Debug;
    /// What the selection holds for this row.
    type Value: Copy + Eq + Hash;
    type Payload: Clone + Debug;
    type Action: Clone;

    fn key(&self) -> Self::Key;

    /// `None` for rows that cannot be selected.
    fn value(&self, model: &Self::Model) -> Option<Self::Value>;

    /// Must not build child items.
    fn has_children(&self, model: &Self::Model) -> bool;

    /// Shallow summary of the node and its direct children. Must cost
    /// O(direct children).
    fn fingerprint(&self, model: &Self::Model) -> u64;

    /// One item per current child, in child order.
    fn build_children(&self, model: &Self::Model) -> Vec<Self>;

    fn describe(&self, model: &Self::Model, row: &RowState<'_, Self::Payload>, theme: &Theme)
    -> RenderSpec;

    /// `None` if this row cannot be dragged.
    fn drag_start(&self, model: &Self::Model) -> Option<Self::Payload>;

    /// Asked on every hover with `is_drop == false`, which must not mutate
    /// the model, and once more with `is_drop == true` on release.
    fn drag_drop(
        &self,
        model: &mut Self::Model,
        payload: &Self::Payload,
        edge: DropEdge,
        is_drop: bool,
    ) -> DropAction;

    fn context_menu(&self, model: &Self::Model) -> Vec<MenuEntry<Self::Action>>;
}

struct Row<N> {
    item: N,
    parent: Option<RowId>,
    depth: usize,
    /// `None` until built, and again after a fingerprint change.
    children: Option<Vec<RowId>>,
    fingerprint: Option<u64>,
    has_children: bool,
}

struct DragState<P> {
    payload: P,
    source: RowId,
    hovered: Option<RowId>,
    edge: Option<DropEdge>,
    action: DropAction,
}

/// Layout metrics the host may tune.
#[derive(Debug, Clone, Copy)]
pub struct TreeMetrics {
    pub row_height: f32,
    pub indent: f32,
    pub drop_edge_fraction: f32,
}

impl Default for TreeMetrics {
    fn default() -> Self {
        Self {
            row_height: 18.0,
            indent: 14.0,
            drop_edge_fraction: 0.25,
        }
    }
}

/// Arena-backed tree view over adapter items.
pub struct TreeView<N: TreeItem> {
    rows: SlotMap<RowId, Row<N>>,
    roots: Vec<RowId>,
    expanded: HashSet<N::Key>,
    drag: Option<DragState<N::Payload>>,
    /// Rows inside the viewport after the last layout, top to bottom.
    visible: Vec<(RowId, Rect)>,
    viewport: Rect,
    scroll_offset: f32,
    content_height: f32,
    pub metrics: TreeMetrics,
    pub multi_select: bool,
    expander_width: f32,
}

impl<N: TreeItem> TreeView<N> {
    pub fn new(metrics: TreeMetrics) -> Self {
        Self {
            rows: SlotMap::with_key(),
            roots: Vec::new(),
            expanded: HashSet::new(),
            drag: None,
            visible: Vec::new(),
            viewport: Rect::default(),
            scroll_offset: 0.0,
            content_height: 0.0,
            metrics,
            multi_select: true,
            expander_width: Theme::default().expander_width,
        }
    }

    // ------------------------------------------------------------------
    // Forest
    // ------------------------------------------------------------------

    /// Drop every row together with expansion and drag state.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.roots.clear();
        self.expanded.clear();
        self.drag = None;
        self.visible.clear();
        self.scroll_offset = 0.0;
        self.content_height = 0.0;
    }

    /// Replace the whole forest. Selection is left to the caller.
    pub fn set_roots(&mut self, items: Vec<N>) -> Vec<RowId> {
        self.clear();
        items.into_iter().map(|item| self.add_root(item)).collect()
    }

    pub fn add_root(&mut self, item: N) -> RowId {
        let id = self.rows.insert(Row {
            item,
            parent: None,
            depth: 0,
            children: None,
            fingerprint: None,
            has_children: false,
        });
        self.roots.push(id);
        id
    }

    pub fn roots(&self) -> &[RowId] {
        &self.roots
    }

    pub fn item(&self, row: RowId) -> Option<&N> {
        self.rows.get(row).map(|r| &r.item)
    }

    pub fn parent(&self, row: RowId) -> Option<RowId> {
        self.rows.get(row).and_then(|r| r.parent)
    }

    pub fn depth(&self, row: RowId) -> usize {
        self.rows.get(row).map_or(0, |r| r.depth)
    }

    /// Cached children, `None` if not built (or invalidated).
    pub fn children(&self, row: RowId) -> Option<&[RowId]> {
        self.rows.get(row)?.children.as_deref()
    }

    /// Number of live rows in the arena.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a built row by item key.
    pub fn find(&self, key: N::Key) -> Option<RowId> {
        self.rows
            .iter()
            .find(|(_, r)| r.item.key() == key)
            .map(|(id, _)| id)
    }

    // ------------------------------------------------------------------
    // Cache validation
    // ------------------------------------------------------------------

    /// Re-check one row against the model. If its fingerprint moved, the
    /// cached children are discarded. Returns true when the cache was dropped.
    pub fn refresh(&mut self, model: &N::Model, row: RowId) -> bool {
        let Some(r) = self.rows.get(row) else {
            return false;
        };
        let fingerprint = r.item.fingerprint(model);
        if r.fingerprint == Some(fingerprint) {
            return false;
        }
        let has_children = r.item.has_children(model);
        let stale: Vec<RowId> = r.children.clone().unwrap_or_default();
        for child in stale {
            self.remove_subtree(child);
        }
        if let Some(r) = self.rows.get_mut(row) {
            r.children = None;
            r.fingerprint = Some(fingerprint);
            r.has_children = has_children;
        }
        true
    }

    /// Make sure the row's children are built and current.
    pub fn ensure_children(&mut self, model: &N::Model, row: RowId) {
        self.refresh(model, row);
        let Some(r) = self.rows.get(row) else {
            return;
        };
        if r.children.is_some() {
            return;
        }
        let depth = r.depth + 1;
        let built = r.item.build_children(model);
        let ids: Vec<RowId> = built
            .into_iter()
            .map(|item| {
                self.rows.insert(Row {
                    item,
                    parent: Some(row),
                    depth,
                    children: None,
                    fingerprint: None,
                    has_children: false,
                })
            })
            .collect();
        for &id in &ids {
            self.refresh(model, id);
        }
        if let Some(r) = self.rows.get_mut(row) {
            r.children = Some(ids);
        }
    }

    pub fn has_children(&self, row: RowId) -> bool {
        self.rows.get(row).is_some_and(|r| r.has_children)
    }

    fn remove_subtree(&mut self, row: RowId) {
        let mut stack = vec![row];
        while let Some(id) = stack.pop() {
            if let Some(r) = self.rows.remove(id)
                && let Some(children) = r.children
            {
                stack.extend(children);
            }
        }
        // A rebuilt hover row is re-evaluated on the next pointer move.
        let rows = &self.rows;
        if let Some(drag) = &mut self.drag
            && drag.hovered.is_some_and(|h| !rows.contains_key(h))
        {
            drag.hovered = None;
            drag.edge = None;
            drag.action = DropAction::Ignore;
        }
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    pub fn is_expanded(&self, row: RowId) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| self.expanded.contains(&r.item.key()))
    }

    pub fn expand(&mut self, model: &N::Model, row: RowId) {
        let Some(r) = self.rows.get(row) else {
            return;
        };
        self.expanded.insert(r.item.key());
        self.ensure_children(model, row);
    }

    pub fn collapse(&mut self, row: RowId) {
        if let Some(r) = self.rows.get(row) {
            self.expanded.remove(&r.item.key());
        }
    }

    pub fn toggle(&mut self, model: &N::Model, row: RowId) {
        if self.is_expanded(row) {
            self.collapse(row);
        } else {
            self.expand(model, row);
        }
    }

    /// Mark a key expanded whether or not a row for it is built yet. It opens
    /// as soon as it becomes reachable.
    pub fn open_key(&mut self, key: N::Key) {
        self.expanded.insert(key);
    }

    pub fn is_key_expanded(&self, key: N::Key) -> bool {
        self.expanded.contains(&key)
    }

    /// Rows reachable through expanded parents, depth-first. Builds and
    /// re-validates children along the way.
    pub fn flatten(&mut self, model: &N::Model) -> Vec<RowId> {
        let mut out = Vec::new();
        let roots = self.roots.clone();
        for root in roots {
            self.flatten_row(model, root, &mut out);
        }
        out
    }

    fn flatten_row(&mut self, model: &N::Model, row: RowId, out: &mut Vec<RowId>) {
        self.refresh(model, row);
        out.push(row);
        if !self.is_expanded(row) || !self.has_children(row) {
            return;
        }
        self.ensure_children(model, row);
        let children: Vec<RowId> = self.children(row).map(<[RowId]>::to_vec).unwrap_or_default();
        for child in children {
            self.flatten_row(model, child, out);
        }
    }

    // ------------------------------------------------------------------
    // Layout / paint
    // ------------------------------------------------------------------

    /// Lay out rows inside `viewport`. Rows scrolled out of view get no rect.
    pub fn layout(&mut self, model: &N::Model, viewport: Rect) {
        let rows = self.flatten(model);
        let rh = self.metrics.row_height;
        self.viewport = viewport;
        self.content_height = rows.len() as f32 * rh;
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());

        self.visible.clear();
        for (i, row) in rows.into_iter().enumerate() {
            let y = viewport.y + i as f32 * rh - self.scroll_offset;
            if y + rh <= viewport.y || y >= viewport.bottom() {
                continue;
            }
            let x = viewport.x + self.depth(row) as f32 * self.metrics.indent + self.expander_width;
            let rect = Rect::new(x, y, (viewport.right() - x).max(0.0), rh);
            self.visible.push((row, rect));
        }
    }

    /// Layout, then emit draw commands for every row inside the viewport.
    pub fn paint(
        &mut self,
        model: &N::Model,
        selection: &Selection<N::Value>,
        theme: &Theme,
        viewport: Rect,
        draw: &mut DrawList,
    ) {
        self.expander_width = theme.expander_width;
        self.layout(model, viewport);

        let drag_payload = self.drag.as_ref().map(|d| &d.payload);
        let drop_target = self
            .drag
            .as_ref()
            .filter(|d| d.action == DropAction::Move)
            .and_then(|d| Some((d.hovered?, d.edge?)));

        for &(row, rect) in &self.visible {
            let Some(r) = self.rows.get(row) else {
                continue;
            };
            let selected = r
                .item
                .value(model)
                .is_some_and(|v| selection.contains(&v));
            let drop_edge = drop_target.filter(|(h, _)| *h == row).map(|(_, e)| e);
            let state = RowState {
                rect,
                full_span: Rect::new(viewport.x, rect.y, viewport.width, rect.height),
                selected,
                drop_edge,
                dragging: drag_payload,
            };
            r.item.describe(model, &state, theme).emit(draw);

            if r.has_children {
                let expanded = self.expanded.contains(&r.item.key());
                draw.icons.push(IconCommand {
                    name: if expanded { "arrow_drop_down" } else { "arrow_right" },
                    x: rect.x - self.expander_width,
                    y: rect.y + (rect.height - theme.icon_size) * 0.5,
                    size: theme.icon_size,
                    color: theme.control_text,
                });
            }
        }
    }

    /// Rows laid out by the last layout/paint, top to bottom.
    pub fn visible_rows(&self) -> &[(RowId, Rect)] {
        &self.visible
    }

    pub fn row_rect(&self, row: RowId) -> Option<Rect> {
        self.visible.iter().find(|(id, _)| *id == row).map(|(_, r)| *r)
    }

    /// Row under (x, y), using the full row width.
    pub fn row_at(&self, x: f32, y: f32) -> Option<RowId> {
        if !self.viewport.contains(x, y) {
            return None;
        }
        self.visible
            .iter()
            .find(|(_, r)| y >= r.y && y < r.bottom())
            .map(|(id, _)| *id)
    }

    /// True if (x, y) is on the expand/collapse arrow of `row`.
    pub fn hit_expander(&self, row: RowId, x: f32, y: f32) -> bool {
        if !self.has_children(row) {
            return false;
        }
        self.row_rect(row).is_some_and(|r| {
            y >= r.y && y < r.bottom() && x >= r.x - self.expander_width && x < r.x
        })
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport.height).max(0.0)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    /// Scroll so that `row` is inside the viewport. The row must be reachable.
    pub fn ensure_visible(&mut self, model: &N::Model, row: RowId) {
        let rows = self.flatten(model);
        let Some(index) = rows.iter().position(|&r| r == row) else {
            return;
        };
        let rh = self.metrics.row_height;
        self.content_height = rows.len() as f32 * rh;
        let top = index as f32 * rh;
        if top < self.scroll_offset {
            self.set_scroll_offset(top);
        } else if top + rh > self.scroll_offset + self.viewport.height {
            self.set_scroll_offset(top + rh - self.viewport.height);
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Apply a click on `row`: plain click replaces, Ctrl toggles, Shift adds
    /// the visible range from the anchor.
    pub fn click(
        &mut self,
        model: &N::Model,
        selection: &mut Selection<N::Value>,
        row: RowId,
        modifiers: ModifierFlags,
    ) {
        let Some(value) = self.rows.get(row).and_then(|r| r.item.value(model)) else {
            if !modifiers.ctrl && !modifiers.shift {
                selection.clear();
            }
            return;
        };

        if !self.multi_select {
            selection.set(value);
            return;
        }

        if modifiers.ctrl {
            selection.toggle(value);
        } else if modifiers.shift
            && let Some(anchor) = selection.anchor()
        {
            let values: Vec<Option<N::Value>> = self
                .flatten(model)
                .into_iter()
                .map(|id| self.rows.get(id).and_then(|r| r.item.value(model)))
                .collect();
            let from = values.iter().position(|v| *v == Some(anchor));
            let to = values.iter().position(|v| *v == Some(value));
            match (from, to) {
                (Some(a), Some(b)) => {
                    let (lo, hi) = (a.min(b), a.max(b));
                    for v in values[lo..=hi].iter().flatten() {
                        selection.add(*v);
                    }
                }
                _ => selection.set(value),
            }
        } else {
            selection.set(value);
        }
    }

    /// Move a single selection up or down the visible order.
    pub fn select_step(
        &mut self,
        model: &N::Model,
        selection: &mut Selection<N::Value>,
        step: isize,
    ) -> Option<RowId> {
        let rows: Vec<(RowId, N::Value)> = self
            .flatten(model)
            .into_iter()
            .filter_map(|id| Some((id, self.rows.get(id)?.item.value(model)?)))
            .collect();
        if rows.is_empty() {
            return None;
        }
        let current = selection
            .anchor()
            .and_then(|a| rows.iter().position(|(_, v)| *v == a));
        let next = match current {
            Some(i) => (i as isize + step).clamp(0, rows.len() as isize - 1) as usize,
            None if step < 0 => rows.len() - 1,
            None => 0,
        };
        let (id, value) = rows[next];
        selection.set(value);
        self.ensure_visible(model, id);
        Some(id)
    }

    /// First built row whose value is `value`.
    pub fn row_for_value(&self, model: &N::Model, value: N::Value) -> Option<RowId> {
        self.rows
            .iter()
            .find(|(_, r)| r.item.value(model) == Some(value))
            .map(|(id, _)| id)
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Start dragging `row`. Returns false if the row refuses.
    pub fn begin_drag(&mut self, model: &N::Model, row: RowId) -> bool {
        let Some(payload) = self.rows.get(row).and_then(|r| r.item.drag_start(model)) else {
            return false;
        };
        log::debug!("drag start {:?}", payload);
        self.drag = Some(DragState {
            payload,
            source: row,
            hovered: None,
            edge: None,
            action: DropAction::Ignore,
        });
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Row the drag started from. May be stale after a rebuild.
    pub fn drag_source(&self) -> Option<RowId> {
        self.drag.as_ref().map(|d| d.source)
    }

    pub fn drag_payload(&self) -> Option<&N::Payload> {
        self.drag.as_ref().map(|d| &d.payload)
    }

    /// Hovered row, edge and the row's answer, for the drag in progress.
    pub fn drag_target(&self) -> Option<(RowId, DropEdge, DropAction)> {
        let d = self.drag.as_ref()?;
        Some((d.hovered?, d.edge?, d.action))
    }

    /// Pointer moved during a drag: ask the row under it what a drop would do.
    /// Never mutates the model.
    pub fn drag_over(&mut self, model: &mut N::Model, x: f32, y: f32) -> DropAction {
        let Some(drag) = &self.drag else {
            return DropAction::Ignore;
        };
        let hit = self.row_at(x, y).and_then(|row| {
            let rect = self.row_rect(row)?;
            let edge = DropEdge::from_pointer(rect, y, self.metrics.drop_edge_fraction);
            let r = self.rows.get(row)?;
            let action = r.item.drag_drop(model, &drag.payload, edge, false);
            Some((row, edge, action))
        });

        let Some(drag) = &mut self.drag else {
            return DropAction::Ignore;
        };
        match hit {
            Some((row, edge, action)) => {
                if drag.hovered != Some(row) || drag.edge != Some(edge) {
                    log::debug!("drag over {:?} {:?} -> {:?}", row, edge, action);
                }
                drag.hovered = Some(row);
                drag.edge = Some(edge);
                drag.action = action;
                action
            }
            None => {
                drag.hovered = None;
                drag.edge = None;
                drag.action = DropAction::Ignore;
                DropAction::Ignore
            }
        }
    }

    /// Release the drag over the last hovered row. The drag state is gone
    /// afterwards whatever the outcome.
    pub fn drop(&mut self, model: &mut N::Model) -> DropAction {
        let Some(drag) = self.drag.take() else {
            return DropAction::Ignore;
        };
        let (Some(row), Some(edge)) = (drag.hovered, drag.edge) else {
            log::debug!("drop outside any row, cancelled");
            return DropAction::Ignore;
        };
        if drag.action != DropAction::Move {
            return DropAction::Ignore;
        }
        let Some(r) = self.rows.get(row) else {
            return DropAction::Ignore;
        };
        r.item.drag_drop(model, &drag.payload, edge, true)
    }

    /// Abandon the drag without touching the model.
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("drag cancelled");
        }
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    pub fn context_menu(&self, model: &N::Model, row: RowId) -> Vec<MenuEntry<N::Action>> {
        self.rows
            .get(row)
            .map(|r| r.item.context_menu(model))
            .unwrap_or_default()
    }
}
