// Clip normalization
// Scales a clip to unit peak amplitude and stretches it to a fixed duration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clip::AudioClip;
use crate::error::{AudioError, AudioResult};
use crate::io::wav::{read_wav, write_wav};
use crate::stretch::time_stretch;

/// Peaks at or below this are treated as silence
const PEAK_EPSILON: f32 = 1e-10;

/// Normalization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Target clip duration in seconds (default 5.0)
    pub target_seconds: f64,

    /// Audio file extension accepted by the batch driver, without the dot,
    /// matched case-sensitively (default "wav")
    pub extension: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_seconds: 5.0,
            extension: "wav".to_string(),
        }
    }
}

/// Normalize a clip to unit peak amplitude and exactly
/// `round(sample_rate * target_seconds)` samples.
///
/// The sample rate is preserved; only amplitudes and the sample count change.
/// Duration is adjusted with a pitch-preserving time stretch at speed factor
/// `current_len / target_len` (above 1.0 shortens, below 1.0 lengthens).
/// `name` identifies the clip in error messages.
///
/// # Errors
///
/// Returns [`AudioError::DegenerateSignal`] when the peak amplitude is zero;
/// silent input cannot be rescaled.
pub fn normalize(clip: &AudioClip, name: &str, config: &NormalizeConfig) -> AudioResult<AudioClip> {
    let peak = clip.peak();
    if peak <= PEAK_EPSILON {
        return Err(AudioError::DegenerateSignal {
            name: name.to_string(),
        });
    }

    let target_len = (clip.sample_rate as f64 * config.target_seconds).round() as usize;
    if target_len == 0 {
        return Err(AudioError::InvalidInput(format!(
            "target duration {}s is below one sample at {} Hz",
            config.target_seconds, clip.sample_rate
        )));
    }

    let mut samples: Vec<f32> = clip.samples.iter().map(|&x| x / peak).collect();

    if samples.len() != target_len {
        let rate = samples.len() as f64 / target_len as f64;
        log::debug!(
            "stretching '{}': {} -> {} samples (rate {:.4})",
            name,
            samples.len(),
            target_len,
            rate
        );
        samples = time_stretch(&samples, rate)?;
        samples.resize(target_len, 0.0);

        // stretching perturbs the peak slightly; restore unit amplitude
        let stretched_peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
        if stretched_peak > PEAK_EPSILON {
            for sample in samples.iter_mut() {
                *sample /= stretched_peak;
            }
        }
    }

    AudioClip::new(samples, clip.sample_rate)
}

/// Read a WAV file, normalize it, and write the result.
///
/// No output file is written when normalization fails.
pub fn normalize_file(input: &Path, output: &Path, config: &NormalizeConfig) -> AudioResult<()> {
    let clip = read_wav(input)?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let normalized = normalize(&clip, &name, config)?;
    write_wav(output, &normalized)
}
