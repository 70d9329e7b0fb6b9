// Constant-Q spectrogram
// Direct windowed evaluation with log-spaced frequency bins

use crate::features::stft::WindowFunction;

/// Lowest analyzed pitch: C1
const CQT_FMIN: f32 = 32.703_195;

/// Total number of constant-Q bins (7 octaves)
pub const CQT_BINS: usize = 84;

const BINS_PER_OCTAVE: usize = 12;

/// Compute a constant-Q magnitude spectrogram indexed `[bin][frame]`.
///
/// Each bin `k` analyzes frequency `fmin * 2^(k/12)` with a Hann window whose
/// length keeps the frequency-to-bandwidth ratio Q constant, evaluated at
/// frame centers `t * hop`. Bins at or above Nyquist stay zero. Magnitudes
/// are scaled so a full-scale sinusoid at a bin center reads ~1.0.
pub fn cqt_spectrogram(samples: &[f32], sample_rate: u32, hop: usize) -> Vec<Vec<f32>> {
    let num_frames = if samples.is_empty() {
        0
    } else {
        1 + samples.len() / hop
    };
    let mut matrix = vec![vec![0.0f32; num_frames]; CQT_BINS];
    if num_frames == 0 {
        return matrix;
    }

    let q = 1.0 / (2f32.powf(1.0 / BINS_PER_OCTAVE as f32) - 1.0);
    let nyquist = sample_rate as f32 / 2.0;

    for (k, row) in matrix.iter_mut().enumerate() {
        let freq = CQT_FMIN * 2f32.powf(k as f32 / BINS_PER_OCTAVE as f32);
        if freq >= nyquist {
            log::debug!("CQT bin {} at {:.1} Hz above Nyquist, left zero", k, freq);
            continue;
        }

        let win_length = ((q * sample_rate as f32 / freq).ceil() as usize)
            .max(2)
            .min(2 * samples.len());
        let window = WindowFunction::Hann.generate(win_length);
        let window_sum: f32 = window.iter().sum();
        let scale = if window_sum > 0.0 { 2.0 / window_sum } else { 0.0 };
        let omega = 2.0 * std::f32::consts::PI * freq / sample_rate as f32;

        for (t, out) in row.iter_mut().enumerate() {
            let center = (t * hop) as isize;
            let start = center - (win_length / 2) as isize;

            let mut re = 0.0f32;
            let mut im = 0.0f32;
            for (j, &w) in window.iter().enumerate() {
                let idx = start + j as isize;
                if idx < 0 || idx >= samples.len() as isize {
                    continue;
                }
                let x = samples[idx as usize] * w;
                let phase = omega * j as f32;
                re += x * phase.cos();
                im -= x * phase.sin();
            }

            *out = (re * re + im * im).sqrt() * scale;
        }
    }

    matrix
}
