// Short-time Fourier transform
// Windowing, centered STFT/ISTFT, and decibel scaling shared by the
// spectrogram features and the time-stretcher

use realfft::num_complex::Complex;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

/// Floor for amplitude values before taking log10
const AMIN_AMPLITUDE: f32 = 1e-5;

/// Floor for power values before taking log10
const AMIN_POWER: f32 = 1e-10;

/// Overlap-add positions with a window sum below this are left unnormalized
const WINDOW_SUM_EPS: f32 = 1e-6;

/// Analysis window shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    Hann,
    Hamming,
}

impl WindowFunction {
    /// Generate a window of `n` samples.
    pub fn generate(&self, n: usize) -> Vec<f32> {
        if n == 0 {
            return Vec::new();
        }
        (0..n)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / n as f32;
                match self {
                    WindowFunction::Hann => 0.5 - 0.5 * x.cos(),
                    WindowFunction::Hamming => 0.54 - 0.46 * x.cos(),
                }
            })
            .collect()
    }

    /// Generate a window of `win_length` samples, centered inside a
    /// zero-padded buffer of `fft_size` samples. `win_length` must not
    /// exceed `fft_size`.
    pub fn generate_padded(&self, win_length: usize, fft_size: usize) -> Vec<f32> {
        let mut padded = vec![0.0f32; fft_size];
        let window = self.generate(win_length);
        let offset = (fft_size - win_length) / 2;
        padded[offset..offset + win_length].copy_from_slice(&window);
        padded
    }
}

/// Compute a centered STFT.
///
/// The signal is zero-padded by `fft_size / 2` on both sides so frame `t` is
/// centered on sample `t * hop`. Returns one spectrum of `fft_size / 2 + 1`
/// bins per frame; an empty input yields no frames.
pub fn stft(
    samples: &[f32],
    fft_size: usize,
    hop: usize,
    window: &[f32],
) -> Vec<Vec<Complex<f32>>> {
    if samples.is_empty() {
        return Vec::new();
    }

    let pad = fft_size / 2;
    let mut padded = vec![0.0f32; samples.len() + fft_size];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let num_frames = 1 + samples.len() / hop;

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut input = fft.make_input_vec();
    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop;
        for i in 0..fft_size {
            input[i] = padded[start + i] * window[i];
        }
        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum).unwrap();
        frames.push(spectrum);
    }

    frames
}

/// Invert an STFT by windowed overlap-add with window-sum compensation.
///
/// The center padding added by [`stft`] is removed and the result is
/// truncated or zero-padded to exactly `length` samples.
pub fn istft(
    frames: &[Vec<Complex<f32>>],
    fft_size: usize,
    hop: usize,
    window: &[f32],
    length: usize,
) -> Vec<f32> {
    if frames.is_empty() {
        return vec![0.0; length];
    }

    let total = (frames.len() - 1) * hop + fft_size;
    let mut ola = vec![0.0f32; total];
    let mut window_sum = vec![0.0f32; total];

    let mut planner = RealFftPlanner::<f32>::new();
    let ifft = planner.plan_fft_inverse(fft_size);
    let mut spectrum = ifft.make_input_vec();
    let mut time = ifft.make_output_vec();
    let inv_fft = 1.0 / fft_size as f32;

    for (frame_idx, frame) in frames.iter().enumerate() {
        spectrum.copy_from_slice(frame);
        // the DC and Nyquist bins of a real spectrum must be purely real
        spectrum[0].im = 0.0;
        spectrum[fft_size / 2].im = 0.0;
        ifft.process(&mut spectrum, &mut time).unwrap();

        let start = frame_idx * hop;
        for i in 0..fft_size {
            let win = window[i];
            ola[start + i] += time[i] * inv_fft * win;
            window_sum[start + i] += win * win;
        }
    }

    for i in 0..total {
        if window_sum[i] > WINDOW_SUM_EPS {
            ola[i] /= window_sum[i];
        }
    }

    let pad = fft_size / 2;
    let mut out = vec![0.0f32; length];
    let available = total.saturating_sub(pad).min(length);
    out[..available].copy_from_slice(&ola[pad..pad + available]);
    out
}

/// Magnitude matrix from STFT frames, transposed to `[bin][frame]`.
pub fn magnitude_matrix(frames: &[Vec<Complex<f32>>], num_bins: usize) -> Vec<Vec<f32>> {
    let mut matrix = vec![vec![0.0f32; frames.len()]; num_bins];
    for (t, frame) in frames.iter().enumerate() {
        for (k, value) in frame.iter().enumerate() {
            matrix[k][t] = value.norm();
        }
    }
    matrix
}

/// Convert an amplitude matrix to decibels relative to its own maximum,
/// clamped to `top_db` below the peak.
pub fn amplitude_to_db_ref_max(matrix: &mut [Vec<f32>], top_db: f32) {
    let peak = matrix
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(0.0f32, f32::max)
        .max(AMIN_AMPLITUDE);
    let ref_db = 20.0 * peak.log10();

    for row in matrix.iter_mut() {
        for value in row.iter_mut() {
            *value = 20.0 * value.max(AMIN_AMPLITUDE).log10() - ref_db;
            *value = value.max(-top_db);
        }
    }
}

/// Convert a power matrix to decibels relative to full scale (ref = 1.0),
/// clamped to `top_db` below the matrix maximum.
pub fn power_to_db(matrix: &mut [Vec<f32>], top_db: f32) {
    let mut max_db = f32::NEG_INFINITY;
    for row in matrix.iter_mut() {
        for value in row.iter_mut() {
            *value = 10.0 * value.max(AMIN_POWER).log10();
            max_db = max_db.max(*value);
        }
    }
    if !max_db.is_finite() {
        return;
    }
    let floor = max_db - top_db;
    for row in matrix.iter_mut() {
        for value in row.iter_mut() {
            *value = value.max(floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * duration) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window_tapers() {
        let window = WindowFunction::Hann.generate(100);
        assert!(window[0] < 0.1);
        assert!(window[50] > 0.9);
    }

    #[test]
    fn test_padded_window_centered() {
        let padded = WindowFunction::Hann.generate_padded(512, 1024);
        assert_eq!(padded.len(), 1024);
        assert_eq!(padded[0], 0.0);
        assert_eq!(padded[1023], 0.0);
        assert!(padded[512] > 0.9);
    }

    #[test]
    fn test_stft_frame_count() {
        let signal = sine(440.0, 8000, 1.0);
        let window = WindowFunction::Hann.generate(1024);
        let frames = stft(&signal, 1024, 512, &window);

        assert_eq!(frames.len(), 1 + signal.len() / 512);
        assert_eq!(frames[0].len(), 513);
    }

    #[test]
    fn test_stft_empty_signal() {
        let window = WindowFunction::Hann.generate(1024);
        assert!(stft(&[], 1024, 512, &window).is_empty());
    }

    #[test]
    fn test_stft_istft_reconstruction() {
        let signal = sine(440.0, 8000, 0.5);
        let window = WindowFunction::Hann.generate(1024);
        let frames = stft(&signal, 1024, 256, &window);
        let restored = istft(&frames, 1024, 256, &window, signal.len());

        assert_eq!(restored.len(), signal.len());
        // interior samples should round-trip closely; edges lose window overlap
        let margin = 1024;
        for i in margin..signal.len() - margin {
            assert!(
                (restored[i] - signal[i]).abs() < 1e-3,
                "sample {} diverged: {} vs {}",
                i,
                restored[i],
                signal[i]
            );
        }
    }

    #[test]
    fn test_amplitude_to_db_peak_is_zero() {
        let mut matrix = vec![vec![0.5, 1.0, 0.25]];
        amplitude_to_db_ref_max(&mut matrix, 80.0);

        assert!((matrix[0][1] - 0.0).abs() < 1e-5);
        assert!(matrix[0][0] < 0.0);
        assert!(matrix[0].iter().all(|&v| v >= -80.0));
    }

    #[test]
    fn test_power_to_db_full_scale() {
        let mut matrix = vec![vec![1.0, 0.1]];
        power_to_db(&mut matrix, 80.0);

        assert!((matrix[0][0] - 0.0).abs() < 1e-5);
        assert!((matrix[0][1] + 10.0).abs() < 1e-4);
    }
}
