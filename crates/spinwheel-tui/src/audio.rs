// Cue sinks for the terminal front end.
//
// `BellSink` rings the terminal bell on wins and needs nothing. With the
// `audio` feature, `RodioSink` plays configured sound files on a dedicated
// thread that owns the output stream.

use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use spinwheel_app::cues::{CueError, CueSink};
use spinwheel_core::config::AudioConfig;
use spinwheel_core::protocol::Cue;

/// Rings the terminal bell for win cues. Other cues have no bell sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellSink;

impl CueSink for BellSink {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        match cue {
            Cue::Win => {
                let mut out = std::io::stdout();
                out.write_all(b"\x07")
                    .and_then(|_| out.flush())
                    .map_err(|e| CueError::Playback(e.to_string()))
            }
            other => Err(CueError::Unavailable(other)),
        }
    }
}

/// Pick the sink for this session.
///
/// Sound files are used when the `audio` feature is enabled and at least one
/// is configured; otherwise the terminal bell.
pub fn build_sink(config: &AudioConfig) -> Arc<dyn CueSink> {
    #[cfg(feature = "audio")]
    {
        if config.tick_sound.is_some() || config.win_sound.is_some() || config.pop_sound.is_some()
        {
            match rodio_sink::RodioSink::spawn(config) {
                Ok(sink) => {
                    info!("Audio cues: sound files");
                    return Arc::new(sink);
                }
                Err(e) => warn!("Audio output unavailable, falling back to bell: {}", e),
            }
        }
    }
    #[cfg(not(feature = "audio"))]
    {
        if config.win_sound.is_some() || config.tick_sound.is_some() || config.pop_sound.is_some()
        {
            warn!("Sound files configured but built without the `audio` feature");
        }
    }
    info!("Audio cues: terminal bell");
    Arc::new(BellSink)
}

#[cfg(feature = "audio")]
pub mod rodio_sink {
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc;
    use std::sync::Mutex;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::debug;

    use spinwheel_app::cues::{CueError, CueSink};
    use spinwheel_core::config::AudioConfig;
    use spinwheel_core::protocol::Cue;

    /// Plays sound files on a background thread.
    ///
    /// `OutputStream` is not `Send`, so the stream lives on its own thread
    /// and cues are handed over a channel.
    pub struct RodioSink {
        tx: Mutex<mpsc::Sender<Cue>>,
        available: Vec<Cue>,
    }

    impl RodioSink {
        pub fn spawn(config: &AudioConfig) -> Result<Self, CueError> {
            let mut sounds: HashMap<Cue, PathBuf> = HashMap::new();
            for (cue, path) in [
                (Cue::Tick, &config.tick_sound),
                (Cue::Win, &config.win_sound),
                (Cue::RevealPop, &config.pop_sound),
            ] {
                if let Some(path) = path {
                    sounds.insert(cue, path.clone());
                }
            }
            let available: Vec<Cue> = sounds.keys().copied().collect();

            let (tx, rx) = mpsc::channel::<Cue>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

            std::thread::Builder::new()
                .name("spinwheel-audio".into())
                .spawn(move || {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(pair) => {
                            let _ = ready_tx.send(Ok(()));
                            pair
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.to_string()));
                            return;
                        }
                    };
                    while let Ok(cue) = rx.recv() {
                        let Some(path) = sounds.get(&cue) else {
                            continue;
                        };
                        if let Err(e) = play_file(&handle, path) {
                            debug!("Cue {:?} from {} failed: {}", cue, path.display(), e);
                        }
                    }
                })
                .map_err(|e| CueError::Playback(e.to_string()))?;

            match ready_rx.recv() {
                Ok(Ok(())) => Ok(RodioSink {
                    tx: Mutex::new(tx),
                    available,
                }),
                Ok(Err(e)) => Err(CueError::Playback(e)),
                Err(e) => Err(CueError::Playback(e.to_string())),
            }
        }
    }

    fn play_file(handle: &OutputStreamHandle, path: &Path) -> Result<(), CueError> {
        let file = File::open(path).map_err(|e| CueError::Playback(e.to_string()))?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| CueError::Playback(e.to_string()))?;
        let sink = Sink::try_new(handle).map_err(|e| CueError::Playback(e.to_string()))?;
        sink.append(source);
        sink.detach();
        Ok(())
    }

    impl CueSink for RodioSink {
        fn play(&self, cue: Cue) -> Result<(), CueError> {
            if !self.available.contains(&cue) {
                return Err(CueError::Unavailable(cue));
            }
            let tx = self
                .tx
                .lock()
                .map_err(|_| CueError::Playback("audio channel poisoned".into()))?;
            tx.send(cue)
                .map_err(|_| CueError::Playback("audio thread stopped".into()))
        }
    }
}
