use image::Rgba;
use std::path::PathBuf;

use crate::canvas::Color;
use crate::keymap::{KeyBindings, PALETTE_KEYS};

/// Largest accepted `window_width`/`window_height`.
pub const MAX_WINDOW_SIDE: u32 = 16384;
/// Largest accepted `new_image_width`/`new_image_height`.
pub const MAX_IMAGE_SIDE: u32 = 8192;

/// Settings that persist across sessions, stored as `key=value` lines.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    /// Initial window size; also the reference for the initial zoom.
    pub window_width: u32,
    pub window_height: u32,
    /// Share of the window kept free for the header and status text.
    pub zoom_margin_percent: u32,
    /// Size of a new image when the file does not exist and no size was given.
    pub new_image_width: u32,
    pub new_image_height: u32,
    pub show_grid: bool,
    /// Colors selectable with the number keys (at most 9).
    pub palette: Vec<Color>,
    pub keybindings: KeyBindings,
}

pub fn default_palette() -> Vec<Color> {
    vec![
        Rgba([172, 50, 50, 255]),   // red
        Rgba([217, 160, 102, 255]), // cream
        Rgba([102, 57, 49, 255]),   // brown
        Rgba([0, 0, 0, 255]),       // black
        Rgba([91, 110, 225, 255]),  // blue
        Rgba([251, 242, 54, 255]),  // yellow
    ]
}

impl Default for AppSettings {
    fn default() -> Self {
        let palette = default_palette();
        Self {
            window_width: 600,
            window_height: 600,
            zoom_margin_percent: 20,
            new_image_width: 32,
            new_image_height: 32,
            show_grid: false,
            keybindings: KeyBindings::with_palette_size(palette.len()),
            palette,
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/keypixel/keypixel_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\KeyPixel\keypixel_settings.cfg
    /// On macOS:   ~/Library/Application Support/KeyPixel/keypixel_settings.cfg
    /// Fallback:   same directory as the executable.
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .ok()?
                .join("keypixel");
            return Some(config_dir.join("keypixel_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").ok()?;
            return Some(PathBuf::from(appdata).join("KeyPixel").join("keypixel_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("KeyPixel")
                    .join("keypixel_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("keypixel_settings.cfg")))
        }
    }

    /// Serialize a color as "r,g,b,a"
    fn color_to_str(c: Color) -> String {
        let [r, g, b, a] = c.0;
        format!("{r},{g},{b},{a}")
    }

    /// Parse a color from "r,g,b,a" (alpha optional)
    fn str_to_color(s: &str) -> Option<Color> {
        let parts: Vec<u8> = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts[..] {
            [r, g, b] => Some(Rgba([r, g, b, 255])),
            [r, g, b, a] => Some(Rgba([r, g, b, a])),
            _ => None,
        }
    }

    /// Render the whole settings file.
    pub fn to_config_string(&self) -> String {
        let mut content = format!(
            "window_width={}\n\
             window_height={}\n\
             zoom_margin_percent={}\n\
             new_image_width={}\n\
             new_image_height={}\n\
             show_grid={}\n",
            self.window_width,
            self.window_height,
            self.zoom_margin_percent,
            self.new_image_width,
            self.new_image_height,
            self.show_grid,
        );
        for (i, color) in self.palette.iter().enumerate() {
            content.push_str(&format!("palette.{}={}\n", i + 1, Self::color_to_str(*color)));
        }
        for line in self.keybindings.to_config_lines() {
            content.push_str(&line);
            content.push('\n');
        }
        content
    }

    /// Parse settings text. Unknown keys and malformed values keep their defaults.
    ///
    /// `palette.N` lines, when present, replace the whole default palette.
    /// They are ordered by `N` and packed without gaps: `palette.1` and
    /// `palette.3` alone become the colors on keys `1` and `2`.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        let mut palette: Vec<(usize, Color)> = Vec::new();
        let mut keybind_lines: Vec<(&str, &str)> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "window_width" => {
                    s.window_width = parse_positive(val, MAX_WINDOW_SIDE).unwrap_or(s.window_width)
                }
                "window_height" => {
                    s.window_height = parse_positive(val, MAX_WINDOW_SIDE).unwrap_or(s.window_height)
                }
                "zoom_margin_percent" => {
                    s.zoom_margin_percent = val
                        .parse()
                        .ok()
                        .filter(|m| *m < 100)
                        .unwrap_or(s.zoom_margin_percent);
                }
                "new_image_width" => {
                    s.new_image_width = parse_positive(val, MAX_IMAGE_SIDE).unwrap_or(s.new_image_width)
                }
                "new_image_height" => {
                    s.new_image_height = parse_positive(val, MAX_IMAGE_SIDE).unwrap_or(s.new_image_height)
                }
                "show_grid" => s.show_grid = val == "true",
                _ => {
                    if let Some(slot) = key.strip_prefix("palette.") {
                        match (slot.parse::<usize>(), Self::str_to_color(val)) {
                            (Ok(n), Some(color)) if (1..=PALETTE_KEYS.len()).contains(&n) => {
                                palette.retain(|(existing, _)| *existing != n);
                                palette.push((n, color));
                            }
                            _ => log::warn!("Ignoring settings line {line:?}"),
                        }
                    } else if let Some(name) = key.strip_prefix("keybind.") {
                        keybind_lines.push((name, val));
                    } else {
                        log::warn!("Unknown settings key {key:?}");
                    }
                }
            }
        }

        if !palette.is_empty() {
            palette.sort_by_key(|(n, _)| *n);
            if palette.last().is_some_and(|(n, _)| *n != palette.len()) {
                log::warn!("Palette slots have gaps, colors are renumbered from 1");
            }
            s.palette = palette.into_iter().map(|(_, c)| c).collect();
            s.keybindings = KeyBindings::with_palette_size(s.palette.len());
        }
        for (name, key) in keybind_lines {
            s.keybindings.load_config_line(name, key);
        }
        s
    }

    /// Load settings from disk (returns default if file missing or unreadable)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::info!("Settings loaded from {}", path.display());
                Self::parse(&content)
            }
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::settings_path() else { return Ok(()) };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_config_string())
    }

    /// Like [`load`](Self::load), but writes the defaults on first launch so
    /// there is a file to edit.
    pub fn load_or_create() -> Self {
        let exists = Self::settings_path().is_some_and(|p| p.is_file());
        if exists {
            return Self::load();
        }
        let settings = Self::default();
        if let Err(e) = settings.save() {
            log::warn!("Could not write default settings: {e}");
        }
        settings
    }
}

/// `1..=max`, anything else is rejected.
fn parse_positive(val: &str, max: u32) -> Option<u32> {
    val.parse::<u32>().ok().filter(|v| (1..=max).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Intent;
    use egui::Key;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppSettings::parse(""), AppSettings::default());
    }

    #[test]
    fn config_string_round_trips() {
        let mut settings = AppSettings::default();
        settings.window_width = 800;
        settings.show_grid = true;
        settings.palette.push(Rgba([1, 2, 3, 4]));
        settings.keybindings = KeyBindings::with_palette_size(settings.palette.len());
        settings.keybindings.set(Intent::Draw, Key::D);

        let parsed = AppSettings::parse(&settings.to_config_string());

        assert_eq!(parsed, settings);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let parsed = AppSettings::parse(
            "window_width=wide\n\
             window_height=0\n\
             zoom_margin_percent=150\n\
             palette.1=300,0,0\n\
             palette.12=1,2,3\n\
             nonsense\n\
             mystery=1\n",
        );
        assert_eq!(parsed, AppSettings::default());
    }

    #[test]
    fn palette_lines_replace_default_palette() {
        let parsed = AppSettings::parse(
            "# two colors only\n\
             palette.2=0,0,255\n\
             palette.1=255,0,0,255\n",
        );
        assert_eq!(
            parsed.palette,
            vec![Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 255])]
        );
        assert_eq!(parsed.keybindings.key_for(Intent::SelectColor(1)), Some(Key::Num2));
        assert_eq!(parsed.keybindings.key_for(Intent::SelectColor(2)), None);
    }

    #[test]
    fn palette_gaps_are_packed() {
        let parsed = AppSettings::parse(
            "palette.1=1,1,1\n\
             palette.3=3,3,3\n",
        );
        assert_eq!(
            parsed.palette,
            vec![Rgba([1, 1, 1, 255]), Rgba([3, 3, 3, 255])]
        );
        assert_eq!(parsed.keybindings.key_for(Intent::SelectColor(1)), Some(Key::Num2));
        assert_eq!(parsed.keybindings.key_for(Intent::SelectColor(2)), None);
    }

    #[test]
    fn out_of_range_color_keybind_is_ignored() {
        let parsed = AppSettings::parse("keybind.Color0=Z\nkeybind.Color10=Y\n");
        assert_eq!(parsed, AppSettings::default());
    }

    #[test]
    fn oversized_dimensions_keep_defaults() {
        let parsed = AppSettings::parse(
            "window_width=50000000\n\
             window_height=16385\n\
             new_image_width=4294967295\n",
        );
        assert_eq!(parsed, AppSettings::default());

        let parsed = AppSettings::parse("window_width=16384\nnew_image_height=8192\n");
        assert_eq!(parsed.window_width, MAX_WINDOW_SIDE);
        assert_eq!(parsed.new_image_height, MAX_IMAGE_SIDE);
    }

    #[test]
    fn keybind_lines_apply_after_palette() {
        let parsed = AppSettings::parse(
            "keybind.Undo=Z\n\
             palette.1=1,1,1\n",
        );
        assert_eq!(parsed.keybindings.key_for(Intent::Undo), Some(Key::Z));
        assert_eq!(parsed.palette.len(), 1);
    }
}
