//! Start/pause control over an external playback service.

use tracing::debug;

/// A media service holding one pre-loaded audio resource.
pub trait PlaybackService {
    fn is_playing(&self) -> bool;
    fn start(&mut self);
    fn pause(&mut self);
}

/// Toggles a [`PlaybackService`], consulting only its playing flag.
#[derive(Debug)]
pub struct SongPlayer<S> {
    service: S,
}

impl<S: PlaybackService> SongPlayer<S> {
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Start playback unless already playing. Returns whether it started.
    pub fn play(&mut self) -> bool {
        if self.service.is_playing() {
            return false;
        }
        debug!("playback started");
        self.service.start();
        true
    }

    /// Pause playback if playing. Returns whether it paused.
    pub fn pause(&mut self) -> bool {
        if !self.service.is_playing() {
            return false;
        }
        debug!("playback paused");
        self.service.pause();
        true
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.service.is_playing()
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.service
    }
}
