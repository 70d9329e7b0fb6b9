// Audio clip representation
// A mono sample buffer plus its sample rate

use crate::error::{AudioError, AudioResult};

/// A decoded mono audio clip.
///
/// Samples are f32 in [-1.0, 1.0]; the sample rate is always positive.
/// A clip may be empty (zero samples).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Mono audio samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
}

impl AudioClip {
    /// Create a clip, rejecting a zero sample rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Number of samples in the clip.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Maximum absolute sample value. Zero for an empty clip.
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
    }
}
