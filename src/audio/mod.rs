//! Audio feedback for game cues

pub mod player;

pub use player::{BellPlayer, CueDispatcher, CueError, CuePlayer, SilentPlayer};
