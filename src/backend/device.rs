use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat, SampleRate, SupportedStreamConfig,
};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{error::BackendError, voices::RenderedHit};

use super::AudioBackend;

/// Hits waiting for the audio thread.
const QUEUE_CAPACITY: usize = 64;
/// Hits mixed at once; the oldest is cut when another arrives.
const MAX_PLAYING: usize = 32;

/// Default output device through cpal.
///
/// The control thread renders hits and pushes them through an `rtrb` ring;
/// the device callback only sums the playing buffers. Finished buffers are
/// sent back on a second ring and freed on the control side, so the callback
/// never allocates or frees.
pub struct CpalBackend {
    stream: cpal::Stream,
    hits: Producer<RenderedHit>,
    spent: Consumer<Vec<f32>>,
    sample_rate: f32,
    suspended: bool,
}

impl CpalBackend {
    /// Open the default device at `sample_rate`, or at the device's own rate
    /// when `None`. The stream starts suspended.
    pub fn open(sample_rate: Option<f32>) -> Result<Self, BackendError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(BackendError::NoDevice)?;

        let config = match sample_rate {
            Some(rate) => f32_config_at(&device, rate as u32)?,
            None => default_f32_config(&device)?,
        };
        Self::build(&device, config)
    }

    /// Whatever f32 configuration the default device offers first. Used for
    /// the degraded fallback mode.
    pub fn open_default() -> Result<Self, BackendError> {
        Self::open(None)
    }

    fn build(device: &cpal::Device, config: SupportedStreamConfig) -> Result<Self, BackendError> {
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (hits, incoming) = RingBuffer::<RenderedHit>::new(QUEUE_CAPACITY);
        let (returns, spent) = RingBuffer::<Vec<f32>>::new(QUEUE_CAPACITY + MAX_PLAYING);
        let mut mixer = Mixer {
            incoming,
            returns,
            playing: Vec::with_capacity(MAX_PLAYING),
            channels,
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| mixer.fill(data),
                |err| tracing::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| BackendError::Stream(e.to_string()))?;

        // Hosts differ on whether a new stream is already running.
        let suspended = match stream.pause() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("stream cannot pause, starting it now: {e}");
                stream.play().map_err(|e| BackendError::Stream(e.to_string()))?;
                false
            }
        };

        let name = device.name().unwrap_or_else(|_| "unknown".into());
        tracing::info!(device = %name, sample_rate, channels, "audio output opened");

        Ok(Self {
            stream,
            hits,
            spent,
            sample_rate,
            suspended,
        })
    }

    fn collect_spent(&mut self) {
        while self.spent.pop().is_ok() {}
    }
}

fn default_f32_config(device: &cpal::Device) -> Result<SupportedStreamConfig, BackendError> {
    let default = device
        .default_output_config()
        .map_err(|e| BackendError::Config(e.to_string()))?;
    if default.sample_format() == SampleFormat::F32 {
        return Ok(default);
    }

    device
        .supported_output_configs()
        .map_err(|e| BackendError::Config(e.to_string()))?
        .find(|range| range.sample_format() == SampleFormat::F32)
        .map(|range| range.with_max_sample_rate())
        .ok_or_else(|| BackendError::Config("device has no f32 output".into()))
}

fn f32_config_at(device: &cpal::Device, rate: u32) -> Result<SupportedStreamConfig, BackendError> {
    device
        .supported_output_configs()
        .map_err(|e| BackendError::Config(e.to_string()))?
        .find(|range| {
            range.sample_format() == SampleFormat::F32
                && range.min_sample_rate().0 <= rate
                && rate <= range.max_sample_rate().0
        })
        .map(|range| range.with_sample_rate(SampleRate(rate)))
        .ok_or_else(|| BackendError::Config(format!("no f32 output at {rate} Hz")))
}

impl AudioBackend for CpalBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        if self.suspended {
            self.stream
                .play()
                .map_err(|e| BackendError::Stream(e.to_string()))?;
            self.suspended = false;
            tracing::debug!("audio output resumed");
        }
        Ok(())
    }

    fn play(&mut self, hit: RenderedHit) -> Result<(), BackendError> {
        self.collect_spent();
        let voice = hit.voice;
        self.hits
            .push(hit)
            .map_err(|_| BackendError::QueueFull(voice))
    }
}

struct Playing {
    samples: Vec<f32>,
    position: usize,
}

impl Playing {
    fn is_done(&self) -> bool {
        self.position >= self.samples.len()
    }
}

/// Audio-thread side.
struct Mixer {
    incoming: Consumer<RenderedHit>,
    returns: Producer<Vec<f32>>,
    playing: Vec<Playing>,
    channels: usize,
}

impl Mixer {
    fn fill(&mut self, data: &mut [f32]) {
        while let Ok(hit) = self.incoming.pop() {
            if self.playing.len() == MAX_PLAYING {
                let oldest = self.playing.remove(0);
                self.retire(oldest.samples);
            }
            self.playing.push(Playing {
                samples: hit.samples,
                position: 0,
            });
        }

        for frame in data.chunks_mut(self.channels.max(1)) {
            let mut sum = 0.0f32;
            for voice in self.playing.iter_mut() {
                if let Some(s) = voice.samples.get(voice.position) {
                    sum += s;
                    voice.position += 1;
                }
            }
            frame.fill(sum.clamp(-1.0, 1.0));
        }

        let mut i = 0;
        while i < self.playing.len() {
            if self.playing[i].is_done() {
                let done = self.playing.swap_remove(i);
                self.retire(done.samples);
            } else {
                i += 1;
            }
        }
    }

    fn retire(&mut self, samples: Vec<f32>) {
        // Only drops here when the control side has stopped collecting.
        if let Err(PushError::Full(samples)) = self.returns.push(samples) {
            drop(samples);
        }
    }
}
