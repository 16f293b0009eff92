//! Where rendered hits go.
//!
//! The machine owns exactly one backend. Everything it needs is on
//! [`AudioBackend`]; tests use [`RecordingBackend`], headless runs use
//! [`NullBackend`], and the `device` feature adds [`CpalBackend`] for real
//! output.

use crate::{error::BackendError, voices::RenderedHit};

#[cfg(feature = "device")]
mod device;
mod recording;

#[cfg(feature = "device")]
pub use device::CpalBackend;
pub use recording::{HitLog, RecordingBackend};

pub trait AudioBackend {
    /// Rate hits must be rendered at.
    fn sample_rate(&self) -> f32;

    /// False when there is no output at all; triggers become no-ops.
    fn is_available(&self) -> bool {
        true
    }

    /// Output exists but is paused until the first user interaction.
    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Queue one hit to start as soon as possible.
    fn play(&mut self, hit: RenderedHit) -> Result<(), BackendError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn sample_rate(&self) -> f32 {
        (**self).sample_rate()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn is_suspended(&self) -> bool {
        (**self).is_suspended()
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        (**self).resume()
    }

    fn play(&mut self, hit: RenderedHit) -> Result<(), BackendError> {
        (**self).play(hit)
    }
}

/// No output device. Every trigger is ignored.
#[derive(Debug, Clone, Copy)]
pub struct NullBackend {
    sample_rate: f32,
}

impl NullBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

impl AudioBackend for NullBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_available(&self) -> bool {
        false
    }

    fn play(&mut self, _hit: RenderedHit) -> Result<(), BackendError> {
        Err(BackendError::Unavailable)
    }
}
