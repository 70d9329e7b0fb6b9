// Acoustic feature extraction
// Computes scalar descriptors and time-frequency matrices from a clip

pub mod cqt;
pub mod mel;
pub mod mfcc;
pub mod scalar;
pub mod stft;

use serde::{Deserialize, Serialize};

use crate::clip::AudioClip;
use crate::error::{AudioError, AudioResult};
pub use stft::WindowFunction;

/// dB range kept below the peak in log-scaled matrices
const TOP_DB: f32 = 80.0;

/// Feature toggles and shared transform parameters.
///
/// All seven features default to enabled. Matrix features share the STFT
/// parameters; `mel_bands` applies to the log-mel spectrogram (and the MFCC
/// pipeline built on it), `mfcc_coefficients` to MFCC only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub energy: bool,
    pub rms: bool,
    pub zcr: bool,
    pub log_spectrogram: bool,
    pub logmel_spectrogram: bool,
    pub cqt_spectrogram: bool,
    pub mfcc: bool,

    /// FFT size in samples (power of two, default 1024)
    pub fft_size: usize,

    /// Hop between frames in samples (default 512)
    pub hop_length: usize,

    /// Analysis window length, at most `fft_size` (default 1024)
    pub window_length: usize,

    /// Analysis window shape (default Hann)
    pub window: WindowFunction,

    /// Number of mel bands (default 128)
    pub mel_bands: usize,

    /// Number of cepstral coefficients (default 13)
    pub mfcc_coefficients: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            energy: true,
            rms: true,
            zcr: true,
            log_spectrogram: true,
            logmel_spectrogram: true,
            cqt_spectrogram: true,
            mfcc: true,
            fft_size: 1024,
            hop_length: 512,
            window_length: 1024,
            window: WindowFunction::Hann,
            mel_bands: 128,
            mfcc_coefficients: 13,
        }
    }
}

impl FeatureConfig {
    /// Reject parameter combinations the transforms cannot satisfy.
    pub fn validate(&self) -> AudioResult<()> {
        if self.fft_size == 0 || !self.fft_size.is_power_of_two() {
            return Err(AudioError::UnsupportedConfig(format!(
                "fft_size must be a power of two, got {}",
                self.fft_size
            )));
        }
        if self.window_length == 0 || self.window_length > self.fft_size {
            return Err(AudioError::UnsupportedConfig(format!(
                "window_length {} must be between 1 and fft_size {}",
                self.window_length, self.fft_size
            )));
        }
        if self.hop_length == 0 {
            return Err(AudioError::UnsupportedConfig(
                "hop_length must be positive".to_string(),
            ));
        }
        if self.mel_bands == 0 {
            return Err(AudioError::UnsupportedConfig(
                "mel_bands must be positive".to_string(),
            ));
        }
        if self.mfcc_coefficients == 0 || self.mfcc_coefficients > self.mel_bands {
            return Err(AudioError::UnsupportedConfig(format!(
                "mfcc_coefficients {} must be between 1 and mel_bands {}",
                self.mfcc_coefficients, self.mel_bands
            )));
        }
        Ok(())
    }
}

/// Extracted features for one clip.
///
/// Every field is always present; a feature disabled in [`FeatureConfig`] is
/// `None`. Matrices are indexed `[frequency_bin][time_frame]` and dB-scaled
/// where the name says log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    pub energy: Option<f32>,
    pub rms: Option<f32>,
    pub zcr: Option<f32>,
    pub log_spectrogram: Option<Vec<Vec<f32>>>,
    pub logmel_spectrogram: Option<Vec<Vec<f32>>>,
    pub cqt_spectrogram: Option<Vec<Vec<f32>>>,
    pub mfcc: Option<Vec<Vec<f32>>>,
}

/// Extract the configured features from a clip.
///
/// Deterministic for identical `(clip, config)` inputs. Errors propagate to
/// the caller; unlike batch normalization there is no per-item isolation.
pub fn extract_features(clip: &AudioClip, config: &FeatureConfig) -> AudioResult<FeatureSet> {
    config.validate()?;

    let samples = &clip.samples;
    let mut set = FeatureSet::default();

    if config.energy {
        set.energy = Some(scalar::energy(samples));
    }
    if config.rms {
        set.rms = Some(scalar::rms(samples));
    }
    if config.zcr {
        set.zcr = Some(scalar::zero_crossing_rate(samples));
    }

    let needs_stft = config.log_spectrogram || config.logmel_spectrogram || config.mfcc;
    if needs_stft {
        let window = config
            .window
            .generate_padded(config.window_length, config.fft_size);
        let frames = stft::stft(samples, config.fft_size, config.hop_length, &window);
        let num_bins = config.fft_size / 2 + 1;
        let magnitude = stft::magnitude_matrix(&frames, num_bins);

        if config.logmel_spectrogram || config.mfcc {
            let power: Vec<Vec<f32>> = magnitude
                .iter()
                .map(|row| row.iter().map(|&v| v * v).collect())
                .collect();
            let filterbank =
                mel::mel_filterbank(clip.sample_rate, config.fft_size, config.mel_bands);
            let mut mel_db = mel::apply_filterbank(&power, &filterbank);
            stft::power_to_db(&mut mel_db, TOP_DB);

            if config.mfcc {
                set.mfcc = Some(mfcc::mfcc(&mel_db, config.mfcc_coefficients));
            }
            if config.logmel_spectrogram {
                set.logmel_spectrogram = Some(mel_db);
            }
        }

        if config.log_spectrogram {
            let mut db = magnitude;
            stft::amplitude_to_db_ref_max(&mut db, TOP_DB);
            set.log_spectrogram = Some(db);
        }
    }

    if config.cqt_spectrogram {
        let mut cqt_db = cqt::cqt_spectrogram(samples, clip.sample_rate, config.hop_length);
        stft::amplitude_to_db_ref_max(&mut cqt_db, TOP_DB);
        set.cqt_spectrogram = Some(cqt_db);
    }

    log::debug!(
        "extracted features from {} samples at {} Hz",
        samples.len(),
        clip.sample_rate
    );

    Ok(set)
}
