//! Camera passthrough backdrop for the showcase.

/// Handle to a live camera stream. Implemented over `MediaStream` on the web
/// and by fakes in tests.
pub trait MediaTracks {
    /// Stop every track so the browser releases the camera.
    fn stop_all(&mut self);
    fn live_tracks(&self) -> usize;
}

/// Placeholder stream for sessions that never enable passthrough.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMedia;

impl MediaTracks for NoMedia {
    fn stop_all(&mut self) {}
    fn live_tracks(&self) -> usize {
        0
    }
}

#[derive(Debug, Default)]
pub enum ArState<S> {
    #[default]
    Off,
    Requesting,
    Live(S),
}

#[derive(Debug, Default)]
pub struct ArBackdrop<S> {
    state: ArState<S>,
}

impl<S: MediaTracks> ArBackdrop<S> {
    pub fn new() -> Self {
        Self {
            state: ArState::Off,
        }
    }

    pub fn state(&self) -> &ArState<S> {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, ArState::Off)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, ArState::Live(_))
    }

    /// Ask for passthrough. Returns `true` when the caller must issue a
    /// camera request; an existing stream is reused.
    pub fn request(&mut self) -> bool {
        match self.state {
            ArState::Off => {
                self.state = ArState::Requesting;
                true
            }
            ArState::Requesting | ArState::Live(_) => false,
        }
    }

    /// Deliver a granted stream. A stream that arrives after passthrough was
    /// switched off is stopped immediately and `false` is returned.
    pub fn grant(&mut self, mut stream: S) -> bool {
        match self.state {
            ArState::Requesting => {
                log::info!("[ar] camera stream live ({} tracks)", stream.live_tracks());
                self.state = ArState::Live(stream);
                true
            }
            _ => {
                stream.stop_all();
                false
            }
        }
    }

    /// Permission denied or the request failed.
    pub fn deny(&mut self) {
        if matches!(self.state, ArState::Requesting) {
            self.state = ArState::Off;
        }
    }

    pub fn disable(&mut self) {
        if let ArState::Live(stream) = &mut self.state {
            stream.stop_all();
            log::info!("[ar] camera stream released");
        }
        self.state = ArState::Off;
    }

    pub fn stream(&self) -> Option<&S> {
        match &self.state {
            ArState::Live(s) => Some(s),
            _ => None,
        }
    }

    pub fn live_tracks(&self) -> usize {
        self.stream().map_or(0, MediaTracks::live_tracks)
    }

    /// Whether the renderer should clear to transparent.
    pub fn clears_transparent(&self) -> bool {
        self.is_live()
    }
}
