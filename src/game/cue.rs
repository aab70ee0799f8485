/// Audible feedback the session asks its cue player for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Periodic footstep while the snake moves
    Move,
    /// Ordinary food eaten
    Eat,
    /// Special food collected
    PowerUp,
    GameOver,
}
