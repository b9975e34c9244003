use crate::canvas::{Color, SymmetryMode};
use crate::editor::{APP_NAME, EditorState, Intent};
use crate::keymap::{KeyBindings, key_name};
use crate::settings::AppSettings;
use eframe::egui;
use egui::{Align2, Color32, ColorImage, FontId, Pos2, Rect, Stroke, TextureHandle, TextureOptions};
use image::RgbaImage;

// ============================================================================
// LAYOUT CONSTANTS
// ============================================================================

const BACKGROUND: Color32 = Color32::from_rgb(210, 210, 210);
const CANVAS_BACKDROP: Color32 = Color32::from_rgb(160, 160, 160);
const TEXT_COLOR: Color32 = Color32::from_rgb(30, 30, 30);
const GRID_COLOR: Color32 = Color32::from_rgb(90, 90, 90);
const SYMMETRY_COLOR: Color32 = Color32::from_rgb(220, 40, 200);
const CURSOR_COLOR: Color32 = Color32::from_rgb(255, 128, 0);

const HEADER_HEIGHT: f32 = 28.0;
const FOOTER_HEIGHT: f32 = 44.0;
const PADDING: f32 = 8.0;
/// Grid lines are skipped when a cell is smaller than this on screen.
const MIN_GRID_CELL: f32 = 4.0;

/// Convert an `image::RgbaImage` into an egui `ColorImage`.
fn rgba_image_to_color_image(img: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied([img.width() as usize, img.height() as usize], img.as_raw())
}

fn to_color32(c: Color) -> Color32 {
    let [r, g, b, a] = c.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Screen rect of a `width`×`height` canvas at `cell` px per pixel, centered
/// horizontally in `area` and pinned to its top.
fn canvas_rect(area: Rect, width: u32, height: u32, cell: f32) -> Rect {
    let size = egui::vec2(width as f32 * cell, height as f32 * cell);
    let left = if size.x < area.width() {
        area.center().x - size.x / 2.0
    } else {
        area.left()
    };
    Rect::from_min_size(egui::pos2(left, area.top()), size)
}

fn cell_rect(canvas: Rect, x: i32, y: i32, cell: f32) -> Rect {
    Rect::from_min_size(
        canvas.min + egui::vec2(x as f32 * cell, y as f32 * cell),
        egui::vec2(cell, cell),
    )
}

// ============================================================================
// APP
// ============================================================================

pub struct KeyPixelApp {
    state: EditorState,
    keybindings: KeyBindings,
    texture: Option<TextureHandle>,
    /// Canvas generation currently uploaded to `texture`.
    uploaded_generation: Option<u64>,
}

impl KeyPixelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, state: EditorState, settings: &AppSettings) -> Self {
        Self {
            state,
            keybindings: settings.keybindings.clone(),
            texture: None,
            uploaded_generation: None,
        }
    }

    /// Intents triggered this frame. Zoom bindings fire on every frame the
    /// key is held, everything else once per press.
    fn collect_intents(&self, ctx: &egui::Context) -> Vec<Intent> {
        ctx.input(|i| {
            self.keybindings
                .iter()
                .filter(|b| {
                    if b.intent.repeats_while_held() {
                        i.key_down(b.key)
                    } else {
                        i.key_pressed(b.key)
                    }
                })
                .map(|b| b.intent)
                .collect()
        })
    }

    fn any_repeating_key_down(&self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            self.keybindings
                .iter()
                .any(|b| b.intent.repeats_while_held() && i.key_down(b.key))
        })
    }

    /// Re-upload the canvas texture when the pixels changed since last frame.
    fn sync_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let generation = self.state.generation();
        if let Some(texture) = &self.texture
            && self.uploaded_generation == Some(generation)
        {
            return texture.id();
        }
        let image = rgba_image_to_color_image(self.state.project.canvas.as_image());
        match &mut self.texture {
            Some(texture) => {
                texture.set(image, TextureOptions::NEAREST);
                self.uploaded_generation = Some(generation);
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("keypixel_canvas", image, TextureOptions::NEAREST);
                let id = texture.id();
                self.texture = Some(texture);
                self.uploaded_generation = Some(generation);
                id
            }
        }
    }

    fn paint(&mut self, ui: &mut egui::Ui) {
        let texture_id = self.sync_texture(ui.ctx());
        let painter = ui.painter().clone();
        let full = ui.max_rect();
        let state = &self.state;
        let width = state.project.canvas.width();
        let height = state.project.canvas.height();
        let cell = state.zoom.cell_size();

        // -- Header ---------------------------------------------------------
        painter.text(
            full.left_top() + egui::vec2(PADDING, PADDING),
            Align2::LEFT_TOP,
            state.header_text(),
            FontId::proportional(16.0),
            TEXT_COLOR,
        );

        // -- Canvas ---------------------------------------------------------
        let area = Rect::from_min_max(
            egui::pos2(full.left() + PADDING, full.top() + HEADER_HEIGHT + PADDING),
            egui::pos2(full.right() - PADDING, full.bottom() - FOOTER_HEIGHT),
        );
        let canvas = canvas_rect(area, width, height, cell);
        let canvas_painter = painter.with_clip_rect(area);
        canvas_painter.rect_filled(canvas, 0.0, CANVAS_BACKDROP);
        canvas_painter.image(
            texture_id,
            canvas,
            Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
        canvas_painter.rect_stroke(canvas.expand(1.0), 0.0, Stroke::new(1.0, GRID_COLOR));

        if state.show_grid && cell >= MIN_GRID_CELL {
            let stroke = Stroke::new(1.0, GRID_COLOR.linear_multiply(0.5));
            for x in 1..width {
                let sx = canvas.left() + x as f32 * cell;
                canvas_painter.line_segment(
                    [egui::pos2(sx, canvas.top()), egui::pos2(sx, canvas.bottom())],
                    stroke,
                );
            }
            for y in 1..height {
                let sy = canvas.top() + y as f32 * cell;
                canvas_painter.line_segment(
                    [egui::pos2(canvas.left(), sy), egui::pos2(canvas.right(), sy)],
                    stroke,
                );
            }
        }

        // Horizontal flips top/bottom, so its axis is a horizontal line.
        let axis = Stroke::new(2.0, SYMMETRY_COLOR);
        match state.symmetry {
            SymmetryMode::None => {}
            SymmetryMode::Vertical => {
                let sx = canvas.left() + (width / 2) as f32 * cell;
                canvas_painter.line_segment(
                    [egui::pos2(sx, canvas.top()), egui::pos2(sx, canvas.bottom())],
                    axis,
                );
            }
            SymmetryMode::Horizontal => {
                let sy = canvas.top() + (height / 2) as f32 * cell;
                canvas_painter.line_segment(
                    [egui::pos2(canvas.left(), sy), egui::pos2(canvas.right(), sy)],
                    axis,
                );
            }
        }

        // -- Cursor (and its mirror) -----------------------------------------
        let (cx, cy) = (state.cursor.x as i32, state.cursor.y as i32);
        let cursor_stroke = Stroke::new(2.0, CURSOR_COLOR);
        if let Some((mx, my)) = state.symmetry.mirror(cx, cy, width, height)
            && state.project.canvas.contains(mx, my)
        {
            canvas_painter.rect_stroke(
                cell_rect(canvas, mx, my, cell),
                0.0,
                Stroke::new(1.0, CURSOR_COLOR.linear_multiply(0.6)),
            );
        }
        canvas_painter.rect_stroke(cell_rect(canvas, cx, cy, cell), 0.0, cursor_stroke);

        // -- Footer: coordinates, color swatch, help hint, status -------------
        let footer_top = full.bottom() - FOOTER_HEIGHT + 4.0;
        painter.text(
            egui::pos2(full.left() + PADDING, footer_top),
            Align2::LEFT_TOP,
            format!("({}, {})", cx, cy),
            FontId::monospace(14.0),
            TEXT_COLOR,
        );
        let swatch = Rect::from_min_size(
            egui::pos2(full.right() - PADDING - 20.0, footer_top),
            egui::vec2(20.0, 20.0),
        );
        painter.rect_filled(swatch, 2.0, to_color32(state.color));
        painter.rect_stroke(swatch, 2.0, Stroke::new(1.0, TEXT_COLOR));

        let hint = match self.keybindings.key_for(Intent::ToggleHelp) {
            Some(key) => format!("{}: Help", key_name(key)),
            None => String::new(),
        };
        painter.text(
            egui::pos2(full.center().x, footer_top),
            Align2::CENTER_TOP,
            hint,
            FontId::proportional(14.0),
            TEXT_COLOR,
        );
        if let Some(status) = &state.status {
            painter.text(
                egui::pos2(full.left() + PADDING, footer_top + 20.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                TEXT_COLOR,
            );
        }

        // -- Overlays --------------------------------------------------------
        if state.show_color_selection {
            self.paint_color_selection(&painter, full);
        }
        if state.show_help {
            self.paint_help(&painter, full);
        }
    }

    fn paint_color_selection(&self, painter: &egui::Painter, full: Rect) {
        const SWATCH: f32 = 36.0;
        let count = self.state.palette.len() as f32;
        let panel = Rect::from_center_size(
            full.center(),
            egui::vec2(count * (SWATCH + PADDING) + PADDING, SWATCH + 3.0 * PADDING + 16.0),
        );
        painter.rect_filled(panel, 4.0, Color32::from_black_alpha(200));

        for (slot, color) in self.state.palette.iter().enumerate() {
            let min = panel.min + egui::vec2(PADDING + slot as f32 * (SWATCH + PADDING), PADDING);
            let rect = Rect::from_min_size(min, egui::vec2(SWATCH, SWATCH));
            painter.rect_filled(rect, 2.0, to_color32(*color));
            if *color == self.state.color {
                painter.rect_stroke(rect.expand(2.0), 2.0, Stroke::new(2.0, Color32::WHITE));
            }
            let label = self
                .keybindings
                .key_for(Intent::SelectColor(slot))
                .map(key_name)
                .unwrap_or("");
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() + PADDING / 2.0),
                Align2::CENTER_TOP,
                label,
                FontId::monospace(14.0),
                Color32::WHITE,
            );
        }
    }

    fn paint_help(&self, painter: &egui::Painter, full: Rect) {
        let lines = self.keybindings.help_lines();
        let line_height = 18.0;
        let panel = Rect::from_center_size(
            full.center(),
            egui::vec2(
                (full.width() - 4.0 * PADDING).max(0.0),
                lines.len() as f32 * line_height + 2.0 * PADDING,
            ),
        );
        painter.rect_filled(panel, 4.0, Color32::from_black_alpha(220));
        for (i, line) in lines.iter().enumerate() {
            painter.text(
                panel.min + egui::vec2(PADDING, PADDING + i as f32 * line_height),
                Align2::LEFT_TOP,
                line,
                FontId::monospace(14.0),
                Color32::WHITE,
            );
        }
    }
}

impl eframe::App for KeyPixelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Dynamic window title: "keypixel - <file name>[*]" ---
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "{} - {}",
            APP_NAME,
            self.state.project.display_title()
        )));

        for intent in self.collect_intents(ctx) {
            self.state.apply(intent);
        }
        if self.state.quit_requested() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if self.any_repeating_key_down(ctx) {
            ctx.request_repaint();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| self.paint(ui));
    }
}
