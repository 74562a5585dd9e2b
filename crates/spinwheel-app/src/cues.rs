// Audio cue sinks.
//
// Cues are fire-and-forget. A sink may fail for any reason (missing file,
// no output device); the controller logs the failure and moves on.

use spinwheel_core::protocol::Cue;

#[derive(Debug, thiserror::Error)]
pub enum CueError {
    #[error("no sound available for {0:?}")]
    Unavailable(Cue),

    #[error("playback failed: {0}")]
    Playback(String),
}

/// Something that can play a cue.
pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue) -> Result<(), CueError>;
}

/// Sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl CueSink for SilentSink {
    fn play(&self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}
