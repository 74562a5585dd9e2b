// Terminal front end for the spin wheel: view state, key handling, widgets,
// and the audio cue sinks wired up by the `spinwheel` binary.

pub mod audio;
pub mod tui;
