use std::path::PathBuf;

use crate::canvas::PixelCanvas;
use crate::components::history::EditHistory;

/// Single open document.
pub struct Project {
    pub canvas: PixelCanvas,
    pub history: EditHistory,
    /// Save target. May not exist on disk until the first save.
    pub path: PathBuf,
    pub is_dirty: bool,

    /// Display name (file name of `path`)
    pub name: String,
}

impl Project {
    /// A fresh transparent canvas that will be written to `path` on save.
    pub fn new_blank(path: PathBuf, canvas: PixelCanvas) -> Self {
        let mut project = Self::from_file(path, canvas);
        // Never saved yet
        project.is_dirty = true;
        project
    }

    pub fn from_file(path: PathBuf, canvas: PixelCanvas) -> Self {
        let name = name_from_path(&path);
        Self {
            canvas,
            history: EditHistory::new(),
            path,
            is_dirty: false,
            name,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Get the display title (name with dirty indicator)
    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

fn name_from_path(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
