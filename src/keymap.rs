use egui::Key;

use crate::editor::Intent;

/// Number-row keys for the palette slots, in slot order.
pub const PALETTE_KEYS: [Key; 9] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

impl Intent {
    /// Heading used by the help overlay.
    pub fn group(&self) -> &'static str {
        match self {
            Intent::Draw => "Draw",
            Intent::Erase => "Erase",
            Intent::Undo => "Undo",
            Intent::Redo => "Redo",
            Intent::Save => "Save file",
            Intent::ZoomIn | Intent::ZoomOut => "Zoom",
            Intent::MoveCursor { .. } => "Move cursor",
            Intent::ToggleGrid => "Grid",
            Intent::CycleSymmetry => "Symmetry",
            Intent::Quit => "Exit",
            Intent::ToggleColorSelection => "Color selection",
            Intent::SelectColor(_) => "Color",
            Intent::ToggleHelp => "Help",
        }
    }

    /// Fire every frame while the key is held instead of once per press.
    pub fn repeats_while_held(&self) -> bool {
        matches!(self, Intent::ZoomIn | Intent::ZoomOut)
    }

    /// Name used in `keybind.<name>=<key>` settings lines.
    pub fn config_name(&self) -> String {
        match self {
            Intent::MoveCursor { dx: 0, dy: -1 } => "MoveUp".into(),
            Intent::MoveCursor { dx: 0, dy: 1 } => "MoveDown".into(),
            Intent::MoveCursor { dx: -1, dy: 0 } => "MoveLeft".into(),
            Intent::MoveCursor { dx: 1, dy: 0 } => "MoveRight".into(),
            Intent::MoveCursor { dx, dy } => format!("Move({dx},{dy})"),
            Intent::SelectColor(slot) => format!("Color{}", slot + 1),
            other => format!("{other:?}"),
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        let intent = match name {
            "MoveUp" => Intent::MoveCursor { dx: 0, dy: -1 },
            "MoveDown" => Intent::MoveCursor { dx: 0, dy: 1 },
            "MoveLeft" => Intent::MoveCursor { dx: -1, dy: 0 },
            "MoveRight" => Intent::MoveCursor { dx: 1, dy: 0 },
            "CycleSymmetry" => Intent::CycleSymmetry,
            "Draw" => Intent::Draw,
            "Erase" => Intent::Erase,
            "Undo" => Intent::Undo,
            "Redo" => Intent::Redo,
            "Save" => Intent::Save,
            "ZoomIn" => Intent::ZoomIn,
            "ZoomOut" => Intent::ZoomOut,
            "ToggleGrid" => Intent::ToggleGrid,
            "ToggleColorSelection" => Intent::ToggleColorSelection,
            "ToggleHelp" => Intent::ToggleHelp,
            "Quit" => Intent::Quit,
            _ => {
                let slot: usize = name.strip_prefix("Color")?.parse().ok()?;
                // "Color1" is slot 0; "Color0" names nothing
                return slot
                    .checked_sub(1)
                    .filter(|s| *s < PALETTE_KEYS.len())
                    .map(Intent::SelectColor);
            }
        };
        Some(intent)
    }
}

/// A key and the intent it triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: Key,
    pub intent: Intent,
}

/// Ordered key table. Order matters for the help overlay grouping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::with_palette_size(6)
    }
}

impl KeyBindings {
    /// Default vim-style table with number keys for the first
    /// `palette_size` colors.
    pub fn with_palette_size(palette_size: usize) -> Self {
        let mut bindings = vec![
            KeyBinding { key: Key::I, intent: Intent::Draw },
            KeyBinding { key: Key::X, intent: Intent::Erase },
            KeyBinding { key: Key::U, intent: Intent::Undo },
            KeyBinding { key: Key::R, intent: Intent::Redo },
            KeyBinding { key: Key::W, intent: Intent::Save },
            KeyBinding { key: Key::N, intent: Intent::ZoomIn },
            KeyBinding { key: Key::B, intent: Intent::ZoomOut },
            KeyBinding { key: Key::K, intent: Intent::MoveCursor { dx: 0, dy: -1 } },
            KeyBinding { key: Key::J, intent: Intent::MoveCursor { dx: 0, dy: 1 } },
            KeyBinding { key: Key::L, intent: Intent::MoveCursor { dx: 1, dy: 0 } },
            KeyBinding { key: Key::H, intent: Intent::MoveCursor { dx: -1, dy: 0 } },
            KeyBinding { key: Key::G, intent: Intent::ToggleGrid },
            KeyBinding { key: Key::S, intent: Intent::CycleSymmetry },
            KeyBinding { key: Key::Q, intent: Intent::Quit },
            KeyBinding { key: Key::C, intent: Intent::ToggleColorSelection },
        ];
        bindings.extend(
            PALETTE_KEYS
                .iter()
                .take(palette_size)
                .enumerate()
                .map(|(slot, &key)| KeyBinding { key, intent: Intent::SelectColor(slot) }),
        );
        bindings.push(KeyBinding { key: Key::Space, intent: Intent::ToggleHelp });
        Self { bindings }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter()
    }

    pub fn key_for(&self, intent: Intent) -> Option<Key> {
        self.bindings.iter().find(|b| b.intent == intent).map(|b| b.key)
    }

    /// Rebind `intent` to `key`. Any other intent bound to `key` loses it.
    pub fn set(&mut self, intent: Intent, key: Key) {
        self.bindings.retain(|b| b.key != key || b.intent == intent);
        match self.bindings.iter_mut().find(|b| b.intent == intent) {
            Some(binding) => binding.key = key,
            None => self.bindings.push(KeyBinding { key, intent }),
        }
    }

    /// Serialize all bindings for the config file
    pub fn to_config_lines(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!("keybind.{}={}", b.intent.config_name(), key_name(b.key)))
            .collect()
    }

    /// Load a single `keybind.` line from config. Unknown names are ignored.
    pub fn load_config_line(&mut self, intent_name: &str, key_str: &str) {
        match (Intent::from_config_name(intent_name), key_from_name(key_str)) {
            (Some(intent), Some(key)) => self.set(intent, key),
            _ => log::warn!("Ignoring keybinding {intent_name}={key_str}"),
        }
    }

    /// `"Group: key, key"` lines, merging consecutive bindings of one group.
    pub fn help_lines(&self) -> Vec<String> {
        let mut groups: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
        for binding in &self.bindings {
            let group = binding.intent.group();
            match groups.last_mut() {
                Some((last, keys)) if *last == group => keys.push(key_name(binding.key)),
                _ => groups.push((group, vec![key_name(binding.key)])),
            }
        }
        groups
            .into_iter()
            .map(|(group, keys)| format!("{group}: {}", keys.join(", ")))
            .collect()
    }
}

/// Convert egui::Key to display / config name
pub fn key_name(k: Key) -> &'static str {
    match k {
        Key::ArrowDown => "Down",
        Key::ArrowLeft => "Left",
        Key::ArrowRight => "Right",
        Key::ArrowUp => "Up",
        Key::Escape => "Esc",
        Key::Tab => "Tab",
        Key::Backspace => "Backspace",
        Key::Enter => "Enter",
        Key::Space => "Space",
        Key::Minus => "-",
        Key::PlusEquals => "+",
        Key::Num0 => "0", Key::Num1 => "1", Key::Num2 => "2",
        Key::Num3 => "3", Key::Num4 => "4", Key::Num5 => "5",
        Key::Num6 => "6", Key::Num7 => "7", Key::Num8 => "8",
        Key::Num9 => "9",
        Key::A => "A", Key::B => "B", Key::C => "C",
        Key::D => "D", Key::E => "E", Key::F => "F",
        Key::G => "G", Key::H => "H", Key::I => "I",
        Key::J => "J", Key::K => "K", Key::L => "L",
        Key::M => "M", Key::N => "N", Key::O => "O",
        Key::P => "P", Key::Q => "Q", Key::R => "R",
        Key::S => "S", Key::T => "T", Key::U => "U",
        Key::V => "V", Key::W => "W", Key::X => "X",
        Key::Y => "Y", Key::Z => "Z",
        _ => "?",
    }
}

/// Inverse of [`key_name`], case-insensitive.
pub fn key_from_name(name: &str) -> Option<Key> {
    let name = name.trim().to_ascii_lowercase();
    let key = match name.as_str() {
        "down" => Key::ArrowDown,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "up" => Key::ArrowUp,
        "esc" => Key::Escape,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "enter" => Key::Enter,
        "space" => Key::Space,
        "-" => Key::Minus,
        "+" => Key::PlusEquals,
        _ => {
            let mut chars = name.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            return match c.to_ascii_uppercase() {
                '0' => Some(Key::Num0), '1' => Some(Key::Num1), '2' => Some(Key::Num2),
                '3' => Some(Key::Num3), '4' => Some(Key::Num4), '5' => Some(Key::Num5),
                '6' => Some(Key::Num6), '7' => Some(Key::Num7), '8' => Some(Key::Num8),
                '9' => Some(Key::Num9),
                'A' => Some(Key::A), 'B' => Some(Key::B), 'C' => Some(Key::C),
                'D' => Some(Key::D), 'E' => Some(Key::E), 'F' => Some(Key::F),
                'G' => Some(Key::G), 'H' => Some(Key::H), 'I' => Some(Key::I),
                'J' => Some(Key::J), 'K' => Some(Key::K), 'L' => Some(Key::L),
                'M' => Some(Key::M), 'N' => Some(Key::N), 'O' => Some(Key::O),
                'P' => Some(Key::P), 'Q' => Some(Key::Q), 'R' => Some(Key::R),
                'S' => Some(Key::S), 'T' => Some(Key::T), 'U' => Some(Key::U),
                'V' => Some(Key::V), 'W' => Some(Key::W), 'X' => Some(Key::X),
                'Y' => Some(Key::Y), 'Z' => Some(Key::Z),
                _ => None,
            };
        }
    };
    Some(key)
}
