// Controller for the spin wheel: the event loop, timed draw tasks, and cue
// sinks.

pub mod app;
pub mod cues;
pub mod sequencer;
