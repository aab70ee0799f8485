//! Snake Arcade - Snake with power-ups and a terminal front-end
//!
//! This library provides:
//! - Core game logic with explicit time (game module)
//! - Persisted preferences and best score (prefs module)
//! - Audio cues (audio module)
//! - TUI rendering and key mapping (render, input modules)
//! - The interactive driver (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod prefs;
pub mod render;
