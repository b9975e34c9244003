//! KeyPixel: a keyboard-driven pixel art editor.
//!
//! The editing core is [`canvas::PixelCanvas`] (symmetry-aware pixel writes)
//! plus [`components::history::EditHistory`] (undo/redo of draw commands).
//! Everything else wires that core to files, settings, keys and a window.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod editor;
pub mod io;
pub mod keymap;
pub mod logger;
pub mod project;
pub mod settings;
