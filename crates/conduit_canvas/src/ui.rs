// SPDX-License-Identifier: MIT OR Apache-2.0
//! The egui view of the canvas.
//!
//! Features:
//! - Node rendering with ports and per-output visibility lights
//! - Connection rendering (bezier curves)
//! - Pan/zoom navigation and fit-to-content
//! - Node selection, multi-selection, rubber band
//! - Connection drag-to-create, grab-to-replug
//! - Node dragging with grid snap on release
//! - Rename-in-place and context menu
//!
//! All interaction happens in scene coordinates; this module owns only the
//! scene/screen transform and the pointer mode machine, while every edit is
//! routed through [`Canvas`] so the host stays authoritative.

use crate::canvas::Canvas;
use crate::connection::DropVerdict;
use crate::geometry::{GRID_SPACING, PORT_SIZE};
use crate::layout::{LayeredLayout, LayoutProvider};
use crate::node::NodeKind;
use crate::port::PortDirection;
use conduit_host::{EntityRef, Fragment, PipelineHost};
use egui::{Align2, Color32, FontId, Key, Pos2, Rect, Rounding, Stroke, Vec2};

/// Zoom limits.
const ZOOM_MIN: f32 = 0.125;
const ZOOM_MAX: f32 = 8.0;
/// Padding around the graph when fitting the view.
const FIT_MARGIN: f32 = 50.0;
/// Connection stroke width at zoom 1.
const WIRE_THICKNESS: f32 = 2.0;
/// Visibility light radius at zoom 1.
const LIGHT_RADIUS: f32 = 4.0;

/// Node body fill.
const NODE_FILL: Color32 = Color32::from_rgb(59, 61, 61);
/// Border for selected nodes.
const SELECTED_BORDER: Color32 = Color32::from_rgb(122, 25, 27);
/// Border for entities with uncommitted changes.
const MODIFIED_BORDER: Color32 = Color32::from_rgb(251, 188, 5);
/// Sticky note fill.
const NOTE_FILL: Color32 = Color32::from_rgb(84, 82, 58);
/// Wire colors by hover verdict.
const WIRE_COLOR: Color32 = Color32::from_rgb(170, 170, 170);
const WIRE_ACCEPT: Color32 = Color32::from_rgb(80, 170, 90);
const WIRE_REJECT: Color32 = Color32::from_rgb(190, 60, 50);

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, Default)]
enum Mode {
    #[default]
    Normal,
    Panning,
    DraggingNodes,
    Wiring,
    BoxSelect {
        /// Anchor corner, scene coordinates.
        start: Pos2,
    },
    ResizingNote(EntityRef),
}

/// An in-progress rename.
#[derive(Debug, Clone)]
struct RenameEdit {
    entity: EntityRef,
    text: String,
}

/// View state for one editor panel.
pub struct EditorView {
    /// Pan offset in scene units.
    pub pan: Vec2,
    /// Zoom level.
    pub zoom: f32,
    mode: Mode,
    clipboard: Option<Fragment>,
    last_mouse: Pos2,
    last_scene: Pos2,
    hover_port: Option<(EntityRef, PortDirection, u32)>,
    hover_since: f64,
    renaming: Option<RenameEdit>,
    context_pos: Pos2,
    layout: Box<dyn LayoutProvider>,
}

impl Default for EditorView {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorView {
    /// Create a view at the origin.
    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            mode: Mode::Normal,
            clipboard: None,
            last_mouse: Pos2::ZERO,
            last_scene: Pos2::ZERO,
            hover_port: None,
            hover_since: 0.0,
            renaming: None,
            context_pos: Pos2::ZERO,
            layout: Box::new(LayeredLayout),
        }
    }

    /// The pointer's most recent position in scene coordinates. Embedders
    /// feed this to [`Canvas::place_next_at`] when creating entities, so
    /// new nodes land under the pointer.
    pub fn pointer_scene(&self) -> Pos2 {
        self.last_scene
    }

    /// Convert a screen position to scene coordinates.
    pub fn screen_to_scene(&self, screen: Pos2, rect: Rect) -> Pos2 {
        let center = rect.center();
        Pos2::new(
            (screen.x - center.x) / self.zoom - self.pan.x,
            (screen.y - center.y) / self.zoom - self.pan.y,
        )
    }

    /// Convert a scene position to screen coordinates.
    pub fn scene_to_screen(&self, scene: Pos2, rect: Rect) -> Pos2 {
        let center = rect.center();
        Pos2::new(
            (scene.x + self.pan.x) * self.zoom + center.x,
            (scene.y + self.pan.y) * self.zoom + center.y,
        )
    }

    /// Pan and zoom so the whole graph is visible with a margin.
    pub fn fit_to_content(&mut self, canvas: &Canvas, rect: Rect) {
        let Some(bounds) = canvas.bounds() else {
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
            return;
        };
        let bounds = bounds.expand(FIT_MARGIN);
        let zoom_x = rect.width() / bounds.width();
        let zoom_y = rect.height() / bounds.height();
        self.zoom = zoom_x.min(zoom_y).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = -bounds.center().to_vec2();
    }

    /// Render one frame and process its input.
    pub fn ui(&mut self, ui: &mut egui::Ui, canvas: &mut Canvas, host: &mut dyn PipelineHost) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let mouse = ui
            .input(|i| i.pointer.hover_pos())
            .unwrap_or(self.last_mouse);
        let delta = mouse - self.last_mouse;
        self.last_mouse = mouse;
        let scene_pos = self.screen_to_scene(mouse, rect);
        self.last_scene = scene_pos;

        canvas.set_force_connect(ui.input(|i| i.modifiers.shift));

        self.handle_zoom(ui, rect, mouse);
        self.handle_pointer(ui, &response, rect, scene_pos, delta, canvas, host);
        self.handle_keys(ui, rect, canvas, host);
        self.context_menu(&response, rect, canvas, host);

        self.draw_grid(&painter, rect);
        self.draw_connections(&painter, rect, canvas);
        self.draw_drag_wire(&painter, rect, canvas);
        self.draw_nodes(&painter, rect, canvas, host);
        if let Mode::BoxSelect { start } = self.mode {
            self.draw_box(&painter, rect, start, scene_pos);
        }
        self.draw_tooltip(ui, &painter, mouse, canvas, host);
        self.rename_editor(ui, rect, canvas, host);
    }

    fn handle_zoom(&mut self, ui: &egui::Ui, rect: Rect, mouse: Pos2) {
        ui.input(|i| {
            if !rect.contains(mouse) {
                return;
            }
            let scroll = i.raw_scroll_delta.y;
            if scroll == 0.0 {
                return;
            }
            let old_zoom = self.zoom;
            self.zoom = (self.zoom * (1.0 + scroll * 0.001)).clamp(ZOOM_MIN, ZOOM_MAX);
            if self.zoom != old_zoom {
                // Keep the point under the cursor fixed.
                let anchor = self.screen_to_scene(mouse, rect);
                let ratio = self.zoom / old_zoom;
                self.pan.x += anchor.x * (1.0 - ratio);
                self.pan.y += anchor.y * (1.0 - ratio);
            }
        });
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        scene_pos: Pos2,
        delta: Vec2,
        canvas: &mut Canvas,
        host: &mut dyn PipelineHost,
    ) {
        self.hover_port = Self::port_under(canvas, scene_pos);
        if self.hover_port.is_none() {
            self.hover_since = ui.input(|i| i.time);
        }

        if response.secondary_clicked() {
            self.context_pos = scene_pos;
        }

        match self.mode {
            Mode::Normal => {
                if response.dragged_by(egui::PointerButton::Middle) {
                    self.mode = Mode::Panning;
                    return;
                }
                if response.double_clicked() {
                    match canvas.node_at(scene_pos) {
                        Some(entity) => self.begin_rename(canvas, host, entity),
                        None => self.fit_to_content(canvas, rect),
                    }
                    return;
                }
                if response.clicked() {
                    let shift = ui.input(|i| i.modifiers.shift);
                    if let Some((entity, light)) = Self::light_under(canvas, scene_pos) {
                        // Plain click toggles the output; shift-click its
                        // color legend.
                        let (visible, legend) = host.output_visibility(entity, light);
                        if shift {
                            host.set_legend_visibility(entity, light, !legend);
                        } else {
                            host.set_output_visibility(entity, light, !visible);
                        }
                    } else if let Some(entity) = canvas.node_at(scene_pos) {
                        if shift {
                            canvas.toggle_selected(host, entity);
                        } else {
                            canvas.select_only(host, entity);
                        }
                    } else if let Some(key) = canvas.connection_at(scene_pos) {
                        canvas.select_connection(host, key);
                    } else if !shift {
                        canvas.clear_selection(host);
                    }
                    return;
                }
                if response.drag_started_by(egui::PointerButton::Primary) {
                    self.begin_primary_drag(canvas, host, scene_pos);
                }
            }
            Mode::Panning => {
                if response.dragged() {
                    self.pan += delta / self.zoom;
                }
                if response.drag_stopped() {
                    self.mode = Mode::Normal;
                }
            }
            Mode::DraggingNodes => {
                if response.dragged() {
                    canvas.drag_selected_by(delta / self.zoom);
                }
                if response.drag_stopped() {
                    canvas.end_move(host);
                    canvas.end_gesture(host);
                    self.mode = Mode::Normal;
                }
            }
            Mode::Wiring => {
                canvas.move_wire(host, scene_pos);
                if response.drag_stopped() {
                    canvas.finish_wire(host, scene_pos);
                    self.mode = Mode::Normal;
                }
            }
            Mode::BoxSelect { start } => {
                let band = Rect::from_two_pos(start, scene_pos);
                canvas.select_rect(band);
                if response.drag_stopped() {
                    canvas.end_gesture(host);
                    self.mode = Mode::Normal;
                }
            }
            Mode::ResizingNote(entity) => {
                if response.dragged() {
                    if let Some(node) = canvas.nodes.get(&entity) {
                        let size = node.size + delta / self.zoom;
                        canvas.resize_note(host, entity, size);
                    }
                }
                if response.drag_stopped() {
                    self.mode = Mode::Normal;
                }
            }
        }
    }

    fn begin_primary_drag(
        &mut self,
        canvas: &mut Canvas,
        host: &mut dyn PipelineHost,
        scene_pos: Pos2,
    ) {
        if let Some((entity, direction, index)) = Self::port_under(canvas, scene_pos) {
            match direction {
                PortDirection::Output => {
                    canvas.start_wire(entity, index, scene_pos);
                    self.mode = Mode::Wiring;
                }
                PortDirection::Input => {
                    // Grabbing a connected input re-plugs its most recent
                    // connection.
                    let grabbed = canvas
                        .nodes
                        .get(&entity)
                        .and_then(|n| n.port(PortDirection::Input, index))
                        .and_then(|p| p.connections.last().copied());
                    if let Some(key) = grabbed {
                        canvas.grab_connection(host, key, scene_pos);
                        self.mode = Mode::Wiring;
                    }
                }
            }
            return;
        }
        if let Some(entity) = Self::note_resize_handle_under(canvas, scene_pos) {
            self.mode = Mode::ResizingNote(entity);
            return;
        }
        if let Some(entity) = canvas.node_at(scene_pos) {
            canvas.begin_gesture();
            // Dragging an unselected node takes over the selection first.
            if !canvas.nodes.get(&entity).is_some_and(|n| n.selected) {
                canvas.select_only(host, entity);
            }
            self.mode = Mode::DraggingNodes;
            return;
        }
        canvas.begin_gesture();
        self.mode = Mode::BoxSelect { start: scene_pos };
    }

    fn handle_keys(
        &mut self,
        ui: &egui::Ui,
        rect: Rect,
        canvas: &mut Canvas,
        host: &mut dyn PipelineHost,
    ) {
        if self.renaming.is_some() {
            return;
        }
        let (delete, escape, copy, paste, fit) = ui.input(|i| {
            (
                i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace),
                i.key_pressed(Key::Escape),
                i.modifiers.command && i.key_pressed(Key::C),
                i.modifiers.command && i.key_pressed(Key::V),
                i.key_pressed(Key::F),
            )
        });
        if escape {
            canvas.cancel_wire();
            self.mode = Mode::Normal;
        }
        if delete {
            canvas.delete_selection(host);
        }
        if copy {
            let fragment = canvas.copy_selection(host);
            if !fragment.is_empty() {
                self.clipboard = Some(fragment);
            }
        }
        if paste {
            if let Some(fragment) = self.clipboard.clone() {
                let drop = self.screen_to_scene(self.last_mouse, rect);
                canvas.paste(host, &fragment, drop, false);
            }
        }
        if fit {
            self.fit_to_content(canvas, rect);
        }
    }

    fn context_menu(
        &mut self,
        response: &egui::Response,
        rect: Rect,
        canvas: &mut Canvas,
        host: &mut dyn PipelineHost,
    ) {
        let context_pos = self.context_pos;
        let mut rename_target = None;
        let mut fit = false;
        response.context_menu(|ui| {
            if ui.button("Rename").clicked() {
                rename_target = canvas.node_at(context_pos);
                ui.close_menu();
            }
            if ui.button("Copy").clicked() {
                let fragment = canvas.copy_selection(host);
                if !fragment.is_empty() {
                    self.clipboard = Some(fragment);
                }
                ui.close_menu();
            }
            let paste = self.clipboard.clone();
            if ui
                .add_enabled(paste.is_some(), egui::Button::new("Paste"))
                .clicked()
            {
                if let Some(fragment) = paste {
                    canvas.paste(host, &fragment, context_pos, false);
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(self.clipboard.is_some(), egui::Button::new("Paste with connections"))
                .clicked()
            {
                if let Some(fragment) = self.clipboard.clone() {
                    canvas.paste(host, &fragment, context_pos, true);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Delete").clicked() {
                canvas.delete_selection(host);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Auto layout").clicked() {
                self.run_layout(canvas, host);
                ui.close_menu();
            }
            if ui.button("Fit view").clicked() {
                fit = true;
                ui.close_menu();
            }
        });
        if let Some(entity) = rename_target {
            self.begin_rename(canvas, host, entity);
        }
        if fit {
            self.fit_to_content(canvas, rect);
        }
    }

    /// Run the configured layout provider over the whole graph.
    pub fn run_layout(&mut self, canvas: &mut Canvas, host: &mut dyn PipelineHost) {
        let nodes: Vec<EntityRef> = canvas.nodes.keys().copied().collect();
        let edges: Vec<(EntityRef, EntityRef)> = canvas
            .connections()
            .map(|c| (c.key.pair.source, c.key.pair.dest))
            .collect();
        let positions = self.layout.compute(&nodes, &edges);
        canvas.apply_layout(host, &positions);
    }

    fn begin_rename(&mut self, canvas: &Canvas, host: &dyn PipelineHost, entity: EntityRef) {
        if canvas.nodes.get(&entity).and_then(|n| n.entity).is_none() {
            return;
        }
        self.renaming = Some(RenameEdit {
            entity,
            text: host.name(entity).unwrap_or_default(),
        });
    }

    fn rename_editor(
        &mut self,
        ui: &mut egui::Ui,
        rect: Rect,
        canvas: &Canvas,
        host: &mut dyn PipelineHost,
    ) {
        let Some(entity) = self.renaming.as_ref().map(|e| e.entity) else {
            return;
        };
        let Some(node) = canvas.nodes.get(&entity) else {
            self.renaming = None;
            return;
        };
        let anchor = self.scene_to_screen(node.rect().left_top(), rect);
        let mut commit = false;
        let mut cancel = false;
        if let Some(edit) = self.renaming.as_mut() {
            egui::Area::new(egui::Id::new(("rename", entity.0)))
                .fixed_pos(anchor)
                .show(ui.ctx(), |ui| {
                    let response = ui.text_edit_singleline(&mut edit.text);
                    response.request_focus();
                    if response.lost_focus() {
                        commit = ui.input(|i| i.key_pressed(Key::Enter));
                        cancel = !commit;
                    }
                });
        }
        if commit {
            if let Some(edit) = self.renaming.take() {
                if !edit.text.trim().is_empty() {
                    host.rename(edit.entity, edit.text.trim());
                }
            }
        } else if cancel {
            self.renaming = None;
        }
    }

    // ------------------------------------------------------------------
    // Hit tests

    fn port_under(canvas: &Canvas, scene_pos: Pos2) -> Option<(EntityRef, PortDirection, u32)> {
        canvas.nodes.iter().rev().find_map(|(&entity, node)| {
            node.entity?;
            if let Some(i) = node.output_at(scene_pos) {
                return Some((entity, PortDirection::Output, i));
            }
            node.input_at(scene_pos)
                .map(|i| (entity, PortDirection::Input, i))
        })
    }

    fn light_under(canvas: &Canvas, scene_pos: Pos2) -> Option<(EntityRef, u32)> {
        canvas.nodes.iter().rev().find_map(|(&entity, node)| {
            node.entity?;
            node.outputs.iter().find_map(|port| {
                let center = Self::light_center(node.rect(), port.index);
                (center.distance(scene_pos) <= LIGHT_RADIUS + 2.0).then_some((entity, port.index))
            })
        })
    }

    fn light_center(node_rect: Rect, output: u32) -> Pos2 {
        Pos2::new(
            node_rect.right() - 8.0,
            node_rect.top() + 10.0 + output as f32 * (LIGHT_RADIUS * 2.0 + 3.0),
        )
    }

    fn note_resize_handle_under(canvas: &Canvas, scene_pos: Pos2) -> Option<EntityRef> {
        canvas.nodes.iter().rev().find_map(|(&entity, node)| {
            if node.kind != NodeKind::Note {
                return None;
            }
            let corner = node.rect().right_bottom();
            (corner.distance(scene_pos) <= 8.0).then_some(entity)
        })
    }

    // ------------------------------------------------------------------
    // Painting

    fn draw_grid(&self, painter: &egui::Painter, rect: Rect) {
        let spacing = GRID_SPACING * self.zoom;
        if spacing < 4.0 {
            return;
        }
        let color = Color32::from_rgba_unmultiplied(70, 70, 70, 90);
        let origin = self.scene_to_screen(Pos2::ZERO, rect);

        let mut x = origin.x % spacing;
        if x < rect.left() {
            x += ((rect.left() - x) / spacing).ceil() * spacing;
        }
        while x < rect.right() {
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, color),
            );
            x += spacing;
        }
        let mut y = origin.y % spacing;
        if y < rect.top() {
            y += ((rect.top() - y) / spacing).ceil() * spacing;
        }
        while y < rect.bottom() {
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(1.0, color),
            );
            y += spacing;
        }
    }

    fn draw_connections(&self, painter: &egui::Painter, rect: Rect, canvas: &Canvas) {
        for conn in canvas.connections() {
            let color = if conn.selected {
                SELECTED_BORDER
            } else {
                WIRE_COLOR
            };
            self.draw_curve(painter, rect, &conn.path.points(32), color);
        }
    }

    fn draw_drag_wire(&self, painter: &egui::Painter, rect: Rect, canvas: &Canvas) {
        let Some(drag) = &canvas.drag else {
            return;
        };
        let color = match drag.verdict {
            DropVerdict::Neutral => WIRE_COLOR,
            DropVerdict::Accept => WIRE_ACCEPT,
            DropVerdict::Reject => WIRE_REJECT,
        };
        self.draw_curve(painter, rect, &drag.path.points(32), color);
    }

    fn draw_curve(&self, painter: &egui::Painter, rect: Rect, points: &[Pos2], color: Color32) {
        let stroke = Stroke::new(WIRE_THICKNESS * self.zoom, color);
        for pair in points.windows(2) {
            painter.line_segment(
                [
                    self.scene_to_screen(pair[0], rect),
                    self.scene_to_screen(pair[1], rect),
                ],
                stroke,
            );
        }
    }

    fn draw_nodes(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        canvas: &Canvas,
        host: &dyn PipelineHost,
    ) {
        for node in canvas.nodes.values() {
            let scene_rect = node.rect();
            let screen_rect = Rect::from_min_size(
                self.scene_to_screen(scene_rect.min, rect),
                scene_rect.size() * self.zoom,
            );
            if !screen_rect.intersects(rect) {
                continue;
            }

            let fill = match node.kind {
                NodeKind::Note => NOTE_FILL,
                NodeKind::Entity => NODE_FILL,
            };
            painter.rect_filled(screen_rect, 4.0 * self.zoom, fill);

            let modified = node.entity.is_some_and(|e| host.is_modified(e));
            let border = if node.selected {
                Some(SELECTED_BORDER)
            } else if modified {
                Some(MODIFIED_BORDER)
            } else {
                None
            };
            if let Some(color) = border {
                painter.rect_stroke(
                    screen_rect,
                    Rounding::same(4.0 * self.zoom),
                    Stroke::new(2.0, color),
                );
            }

            let name = node
                .entity
                .and_then(|e| host.name(e))
                .unwrap_or_default();
            painter.text(
                screen_rect.center(),
                Align2::CENTER_CENTER,
                name,
                FontId::proportional(12.0 * self.zoom),
                Color32::from_gray(220),
            );

            if node.kind == NodeKind::Entity {
                self.draw_ports(painter, rect, node);
                self.draw_lights(painter, rect, node, host);
            }
        }
    }

    fn draw_ports(&self, painter: &egui::Painter, rect: Rect, node: &crate::node::Node) {
        let size = Vec2::splat(PORT_SIZE * self.zoom);
        for port in node.inputs.iter().chain(node.outputs.iter()) {
            let center = self.scene_to_screen(node.position + port.offset, rect);
            let fill = if port.is_connected() {
                Color32::from_gray(200)
            } else {
                Color32::from_gray(120)
            };
            painter.rect_filled(Rect::from_center_size(center, size), 1.0, fill);
            painter.rect_stroke(
                Rect::from_center_size(center, size),
                Rounding::same(1.0),
                Stroke::new(1.0, Color32::from_gray(30)),
            );
        }
    }

    fn draw_lights(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        node: &crate::node::Node,
        host: &dyn PipelineHost,
    ) {
        let Some(entity) = node.entity else {
            return;
        };
        for port in &node.outputs {
            let (visible, legend) = host.output_visibility(entity, port.index);
            let color = if visible {
                Color32::from_rgb(120, 200, 120)
            } else {
                Color32::from_gray(80)
            };
            let center = self.scene_to_screen(Self::light_center(node.rect(), port.index), rect);
            painter.circle_filled(center, LIGHT_RADIUS * self.zoom, color);
            if legend {
                painter.circle_stroke(
                    center,
                    (LIGHT_RADIUS + 2.0) * self.zoom,
                    Stroke::new(1.0, Color32::from_rgb(200, 200, 120)),
                );
            }
        }
    }

    fn draw_box(&self, painter: &egui::Painter, rect: Rect, start: Pos2, current: Pos2) {
        let band = Rect::from_two_pos(
            self.scene_to_screen(start, rect),
            self.scene_to_screen(current, rect),
        );
        painter.rect_filled(band, 0.0, Color32::from_rgba_unmultiplied(120, 140, 180, 30));
        painter.rect_stroke(
            band,
            Rounding::ZERO,
            Stroke::new(1.0, Color32::from_rgb(120, 140, 180)),
        );
    }

    fn draw_tooltip(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        mouse: Pos2,
        canvas: &Canvas,
        host: &dyn PipelineHost,
    ) {
        let Some((entity, direction, index)) = self.hover_port else {
            return;
        };
        let elapsed = ui.input(|i| i.time) - self.hover_since;
        if elapsed < canvas.config.tooltip_delay().as_secs_f64() {
            ui.ctx().request_repaint();
            return;
        }
        let text = match direction {
            PortDirection::Input => host.input_port_name(entity, index).unwrap_or_default(),
            PortDirection::Output => {
                let name = host.output_port_name(entity, index).unwrap_or_default();
                match host.output_data_type(entity, index) {
                    Some(ty) => format!("{name}: {ty}"),
                    None => name,
                }
            }
        };
        if text.is_empty() {
            return;
        }
        painter.text(
            mouse + Vec2::new(12.0, 12.0),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(11.0),
            Color32::from_gray(230),
        );
    }
}
