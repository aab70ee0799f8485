use std::io::Write;
use thiserror::Error;

use crate::game::Cue;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("audio output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Something that can make a noise for a [`Cue`]. Implementations are free
/// to ignore cues they have no sound for.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Rings the terminal bell: once for food, twice for a power-up, three times
/// on game over. Move cues are too frequent for a bell and stay silent.
pub struct BellPlayer<W: Write> {
    out: W,
}

impl<W: Write> BellPlayer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Move => 0,
            Cue::Eat => 1,
            Cue::PowerUp => 2,
            Cue::GameOver => 3,
        }
    }
}

impl<W: Write> CuePlayer for BellPlayer<W> {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        let rings = Self::rings(cue);
        if rings == 0 {
            return Ok(());
        }
        self.out.write_all(&vec![0x07; rings])?;
        self.out.flush()?;
        Ok(())
    }
}

/// Routes session cues to a player, honouring the mute preference.
///
/// Player failures are logged here and never reach the game loop.
pub struct CueDispatcher {
    player: Box<dyn CuePlayer + Send>,
    enabled: bool,
}

impl CueDispatcher {
    pub fn new(player: Box<dyn CuePlayer + Send>, enabled: bool) -> Self {
        Self { player, enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dispatch(&mut self, cues: &[Cue]) {
        if !self.enabled {
            return;
        }
        for &cue in cues {
            if let Err(err) = self.player.play(cue) {
                tracing::warn!(?cue, error = %err, "cue playback failed");
            }
        }
    }
}
