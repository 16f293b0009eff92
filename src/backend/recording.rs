use std::{cell::RefCell, rc::Rc};

use crate::{error::BackendError, voices::{RenderedHit, Voice}};

use super::AudioBackend;

#[derive(Debug, Default)]
struct Log {
    hits: Vec<RenderedHit>,
    resumes: usize,
}

/// Read side of a [`RecordingBackend`], kept by the test after the backend
/// itself has been moved into the machine.
#[derive(Debug, Clone, Default)]
pub struct HitLog {
    inner: Rc<RefCell<Log>>,
}

impl HitLog {
    pub fn voices(&self) -> Vec<Voice> {
        self.inner.borrow().hits.iter().map(|h| h.voice).collect()
    }

    pub fn hits(&self) -> Vec<RenderedHit> {
        self.inner.borrow().hits.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, voice: Voice) -> usize {
        self.inner.borrow().hits.iter().filter(|h| h.voice == voice).count()
    }

    /// How many times the backend was resumed out of suspension.
    pub fn resumes(&self) -> usize {
        self.inner.borrow().resumes
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().hits.clear();
    }
}

/// Backend that keeps every hit instead of playing it.
#[derive(Debug)]
pub struct RecordingBackend {
    sample_rate: f32,
    suspended: bool,
    failing: bool,
    log: HitLog,
}

impl RecordingBackend {
    pub fn new(sample_rate: f32) -> (Self, HitLog) {
        let log = HitLog::default();
        let backend = Self {
            sample_rate,
            suspended: false,
            failing: false,
            log: log.clone(),
        };
        (backend, log)
    }

    /// Starts paused, like an output that waits for a user gesture.
    pub fn suspended(sample_rate: f32) -> (Self, HitLog) {
        let (mut backend, log) = Self::new(sample_rate);
        backend.suspended = true;
        (backend, log)
    }

    /// Every `play` fails with a stream error.
    pub fn failing(sample_rate: f32) -> (Self, HitLog) {
        let (mut backend, log) = Self::new(sample_rate);
        backend.failing = true;
        (backend, log)
    }
}

impl AudioBackend for RecordingBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        if self.suspended {
            self.suspended = false;
            self.log.inner.borrow_mut().resumes += 1;
        }
        Ok(())
    }

    fn play(&mut self, hit: RenderedHit) -> Result<(), BackendError> {
        if self.failing {
            return Err(BackendError::Stream("recording backend set to fail".into()));
        }
        self.log.inner.borrow_mut().hits.push(hit);
        Ok(())
    }
}
