//! Control-loop state and intent dispatch.
//!
//! The window layer turns key presses into [`Intent`]s and feeds them to
//! [`EditorState::apply`]; each intent maps to exactly one canvas, history or
//! file operation. Failures never escape: they end up in [`EditorState::status`]
//! and the session log.

use image::Rgba;

use crate::canvas::{Color, SymmetryMode};
use crate::components::history::DrawPixel;
use crate::io;
use crate::project::Project;
use crate::settings::AppSettings;

pub const APP_NAME: &str = "keypixel";

/// Default draw color.
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// One discrete user request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveCursor { dx: i32, dy: i32 },
    /// Pick a palette slot (0-based).
    SelectColor(usize),
    CycleSymmetry,
    Draw,
    Erase,
    Undo,
    Redo,
    Save,
    ZoomIn,
    ZoomOut,
    ToggleGrid,
    ToggleColorSelection,
    ToggleHelp,
    Quit,
}

// ============================================================================
// ZOOM
// ============================================================================

/// Magnification in percent (100 = one screen pixel per image pixel).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zoom {
    pub percent: u32,
    pub step: u32,
}

impl Zoom {
    /// Largest zoom that fits the image's longer side in the window, minus
    /// `margin_percent` left for the rest of the UI. The step is 5% of it.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        window_width: u32,
        window_height: u32,
        margin_percent: u32,
    ) -> Self {
        let full = if image_width > image_height {
            window_width as u64 * 100 / image_width.max(1) as u64
        } else {
            window_height as u64 * 100 / image_height.max(1) as u64
        };
        let kept = full * 100u64.saturating_sub(margin_percent as u64) / 100;
        let percent = u32::try_from(kept).unwrap_or(u32::MAX).max(1);
        let step = (percent / 20).max(1);
        log::debug!("Zoom initialized to {percent}% (step {step})");
        Self { percent, step }
    }

    /// Add or subtract one step. Returns `false` when the zoom would drop to zero.
    pub fn change(&mut self, zoom_in: bool) -> bool {
        let next = if zoom_in {
            self.percent.checked_add(self.step)
        } else {
            self.percent.checked_sub(self.step)
        };
        match next {
            Some(p) if p > 0 => {
                self.percent = p;
                true
            }
            _ => false,
        }
    }

    /// Screen size of one image pixel.
    pub fn cell_size(&self) -> f32 {
        self.percent as f32 / 100.0
    }
}

// ============================================================================
// EDITOR STATE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: u32,
    pub y: u32,
}

/// Everything the control loop owns between frames.
pub struct EditorState {
    pub project: Project,
    pub cursor: Cursor,
    pub color: Color,
    pub symmetry: SymmetryMode,
    pub zoom: Zoom,
    pub palette: Vec<Color>,
    pub show_grid: bool,
    pub show_color_selection: bool,
    pub show_help: bool,
    /// Last message for the status line.
    pub status: Option<String>,
    quit_requested: bool,
    /// Bumped whenever canvas pixels change.
    generation: u64,
}

impl EditorState {
    pub fn new(project: Project, settings: &AppSettings) -> Self {
        let zoom = Zoom::fit(
            project.canvas.width(),
            project.canvas.height(),
            settings.window_width,
            settings.window_height,
            settings.zoom_margin_percent,
        );
        Self {
            project,
            cursor: Cursor::default(),
            color: WHITE,
            symmetry: SymmetryMode::None,
            zoom,
            palette: settings.palette.clone(),
            show_grid: settings.show_grid,
            show_color_selection: false,
            show_help: false,
            status: None,
            quit_requested: false,
            generation: 0,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `"<app>: <file> (<w>x<h>) <zoom>%"`
    pub fn header_text(&self) -> String {
        format!(
            "{}: {} ({}x{}) {}%",
            APP_NAME,
            self.project.name,
            self.project.canvas.width(),
            self.project.canvas.height(),
            self.zoom.percent
        )
    }

    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::MoveCursor { dx, dy } => self.move_cursor(dx, dy),
            Intent::SelectColor(slot) => self.select_color(slot),
            Intent::CycleSymmetry => {
                self.symmetry = self.symmetry.next();
                log::debug!("Symmetry set to {}", self.symmetry.label());
            }
            Intent::Draw => self.draw(self.color),
            Intent::Erase => self.draw(crate::canvas::TRANSPARENT),
            Intent::Undo => self.undo(),
            Intent::Redo => self.redo(),
            Intent::Save => self.save(),
            Intent::ZoomIn => {
                self.zoom.change(true);
            }
            Intent::ZoomOut => {
                self.zoom.change(false);
            }
            Intent::ToggleGrid => self.show_grid = !self.show_grid,
            Intent::ToggleColorSelection => {
                self.show_color_selection = !self.show_color_selection
            }
            Intent::ToggleHelp => self.show_help = !self.show_help,
            Intent::Quit => {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
        }
    }

    /// Wraps around at the canvas edges.
    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let width = self.project.canvas.width() as i64;
        let height = self.project.canvas.height() as i64;
        self.cursor.x = (self.cursor.x as i64 + dx as i64).rem_euclid(width) as u32;
        self.cursor.y = (self.cursor.y as i64 + dy as i64).rem_euclid(height) as u32;
        log::debug!("Cursor moved to ({}, {})", self.cursor.x, self.cursor.y);
    }

    fn select_color(&mut self, slot: usize) {
        let Some(&color) = self.palette.get(slot) else {
            return;
        };
        self.color = color;
        self.show_color_selection = false;
        log::debug!("Cursor color set to {:?}", color.0);
    }

    fn draw(&mut self, color: Color) {
        let command = DrawPixel::new(
            self.cursor.x as i32,
            self.cursor.y as i32,
            color,
            self.symmetry,
        );
        let project = &mut self.project;
        match project.history.execute(command, &mut project.canvas) {
            Ok(()) => self.canvas_changed(),
            Err(e) => {
                log::warn!("Draw rejected: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn undo(&mut self) {
        let project = &mut self.project;
        match project.history.undo(&mut project.canvas) {
            Ok(Some(description)) => {
                self.status = Some(format!("Undo: {description}"));
                self.canvas_changed();
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Undo failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn redo(&mut self) {
        let project = &mut self.project;
        match project.history.redo(&mut project.canvas) {
            Ok(Some(description)) => {
                self.status = Some(format!("Redo: {description}"));
                self.canvas_changed();
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Redo failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn save(&mut self) {
        match io::save_image(&self.project.canvas, &self.project.path) {
            Ok(()) => {
                self.project.mark_clean();
                self.status = Some(format!("Saved {}", self.project.path.display()));
            }
            Err(e) => {
                log::error!("Save failed: {e}");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    fn canvas_changed(&mut self) {
        self.project.mark_dirty();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PixelCanvas, TRANSPARENT};
    use std::path::PathBuf;

    fn state(width: u32, height: u32) -> EditorState {
        let canvas = PixelCanvas::new(width, height).unwrap();
        let project = Project::from_file(PathBuf::from("test.png"), canvas);
        EditorState::new(project, &AppSettings::default())
    }

    #[test]
    fn zoom_fits_longer_side_with_margin() {
        // 600 * 100 / 20 = 3000, minus 20% margin
        let zoom = Zoom::fit(20, 10, 600, 600, 20);
        assert_eq!(zoom.percent, 2400);
        assert_eq!(zoom.step, 120);

        let zoom = Zoom::fit(16, 32, 600, 600, 20);
        assert_eq!(zoom.percent, 1500);
    }

    #[test]
    fn zoom_step_never_zero() {
        let zoom = Zoom::fit(4000, 4000, 600, 600, 20);
        assert_eq!(zoom.percent, 12);
        assert_eq!(zoom.step, 1);
    }

    #[test]
    fn zoom_fit_survives_huge_window() {
        let zoom = Zoom::fit(8, 8, 50_000_000, 50_000_000, 20);
        assert_eq!(zoom.percent, 500_000_000);
        assert_eq!(zoom.step, 25_000_000);

        let zoom = Zoom::fit(1, 1, u32::MAX, u32::MAX, 0);
        assert_eq!(zoom.percent, u32::MAX);
    }

    #[test]
    fn zoom_out_stops_above_zero() {
        let mut zoom = Zoom { percent: 2, step: 1 };
        assert!(zoom.change(false));
        assert_eq!(zoom.percent, 1);
        assert!(!zoom.change(false));
        assert_eq!(zoom.percent, 1);
        assert!(zoom.change(true));
        assert_eq!(zoom.percent, 2);
    }

    #[test]
    fn cursor_wraps_around_edges() {
        let mut state = state(4, 3);
        state.apply(Intent::MoveCursor { dx: -1, dy: 0 });
        assert_eq!(state.cursor, Cursor { x: 3, y: 0 });
        state.apply(Intent::MoveCursor { dx: 1, dy: -1 });
        assert_eq!(state.cursor, Cursor { x: 0, y: 2 });
        state.apply(Intent::MoveCursor { dx: 0, dy: 1 });
        assert_eq!(state.cursor, Cursor { x: 0, y: 0 });
    }

    #[test]
    fn select_color_closes_palette() {
        let mut state = state(4, 4);
        state.apply(Intent::ToggleColorSelection);
        assert!(state.show_color_selection);

        state.apply(Intent::SelectColor(1));

        assert_eq!(state.color, Rgba([217, 160, 102, 255]));
        assert!(!state.show_color_selection);
    }

    #[test]
    fn unknown_palette_slot_is_ignored() {
        let mut state = state(4, 4);
        state.apply(Intent::SelectColor(42));
        assert_eq!(state.color, WHITE);
    }

    #[test]
    fn draw_erase_undo_redo_through_intents() {
        let mut state = state(10, 10);
        state.apply(Intent::MoveCursor { dx: 2, dy: 3 });
        state.apply(Intent::CycleSymmetry);
        state.apply(Intent::CycleSymmetry);
        assert_eq!(state.symmetry, SymmetryMode::Vertical);

        state.apply(Intent::Draw);
        let canvas = &state.project.canvas;
        assert_eq!(canvas.get(2, 3).unwrap(), WHITE);
        assert_eq!(canvas.get(7, 3).unwrap(), WHITE);
        assert!(state.project.is_dirty);
        assert_eq!(state.generation(), 1);

        state.apply(Intent::Erase);
        assert_eq!(state.project.canvas.get(2, 3).unwrap(), TRANSPARENT);

        state.apply(Intent::Undo);
        assert_eq!(state.project.canvas.get(7, 3).unwrap(), WHITE);
        assert_eq!(
            state.status.as_deref(),
            Some("Undo: Erase at (2, 3), Vertical symmetry")
        );

        state.apply(Intent::Redo);
        assert_eq!(state.project.canvas.get(7, 3).unwrap(), TRANSPARENT);
        assert_eq!(state.generation(), 4);
    }

    #[test]
    fn rejected_draw_reports_status() {
        // On a 9-wide canvas the last column mirrors to x = -1.
        let mut state = state(9, 9);
        state.apply(Intent::MoveCursor { dx: -1, dy: 0 });
        state.apply(Intent::CycleSymmetry);
        state.apply(Intent::CycleSymmetry);

        state.apply(Intent::Draw);

        assert_eq!(state.project.canvas, PixelCanvas::new(9, 9).unwrap());
        assert!(state.status.as_deref().unwrap().contains("outside"));
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn empty_undo_is_silent() {
        let mut state = state(3, 3);
        state.apply(Intent::Undo);
        state.apply(Intent::Redo);
        assert_eq!(state.status, None);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn failed_save_keeps_canvas_and_reports() {
        let mut state = state(3, 3);
        state.project.path = PathBuf::from("no_such_dir/definitely/missing/out.png");
        state.apply(Intent::Draw);
        let before = state.project.canvas.clone();

        state.apply(Intent::Save);

        assert_eq!(state.project.canvas, before);
        assert!(state.project.is_dirty);
        assert!(state.status.as_deref().unwrap().starts_with("Save failed"));
    }

    #[test]
    fn successful_save_marks_clean() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(3, 3);
        state.project.path = dir.path().join("out.png");
        state.apply(Intent::Draw);

        state.apply(Intent::Save);

        assert!(!state.project.is_dirty);
        assert!(state.project.path.is_file());
    }

    #[test]
    fn toggles_and_quit() {
        let mut state = state(3, 3);
        state.apply(Intent::ToggleGrid);
        state.apply(Intent::ToggleHelp);
        assert!(state.show_grid);
        assert!(state.show_help);
        assert!(!state.quit_requested());
        state.apply(Intent::Quit);
        assert!(state.quit_requested());
    }

    #[test]
    fn header_shows_name_size_and_zoom() {
        let state = state(20, 10);
        assert_eq!(state.header_text(), "keypixel: test.png (20x10) 2400%");
    }
}
