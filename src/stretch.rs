// Pitch-preserving time stretch
// Phase vocoder over the shared STFT: interpolated magnitudes, accumulated
// phases, inverse transform by windowed overlap-add

use realfft::num_complex::Complex;

use crate::error::{AudioError, AudioResult};
use crate::features::stft::{istft, stft, WindowFunction};

const STRETCH_FFT_SIZE: usize = 2048;
const STRETCH_HOP: usize = 512;

/// Stretch a signal by `rate` without altering its pitch.
///
/// `rate` is a speed factor: values above 1.0 shorten the signal, values
/// below 1.0 lengthen it. The output has `round(input_len / rate)` samples.
pub fn time_stretch(samples: &[f32], rate: f64) -> AudioResult<Vec<f32>> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AudioError::InvalidInput(format!(
            "stretch rate must be positive, got {}",
            rate
        )));
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // exact passthrough avoids phase/window processing drift
    if (rate - 1.0).abs() <= f64::EPSILON {
        return Ok(samples.to_vec());
    }

    let out_len = (samples.len() as f64 / rate).round() as usize;
    if out_len == 0 {
        return Ok(Vec::new());
    }

    let window = WindowFunction::Hann.generate(STRETCH_FFT_SIZE);
    let frames = stft(samples, STRETCH_FFT_SIZE, STRETCH_HOP, &window);
    let stretched = phase_vocoder(&frames, rate);

    Ok(istft(
        &stretched,
        STRETCH_FFT_SIZE,
        STRETCH_HOP,
        &window,
        out_len,
    ))
}

/// Resample the time axis of an STFT by `rate`, keeping per-bin phase
/// coherent. Magnitudes are linearly interpolated between neighboring
/// frames; phases advance by the bin's expected increment plus the wrapped
/// deviation observed between the source frames.
fn phase_vocoder(frames: &[Vec<Complex<f32>>], rate: f64) -> Vec<Vec<Complex<f32>>> {
    if frames.is_empty() {
        return Vec::new();
    }

    let num_bins = frames[0].len();
    let fft_size = (num_bins - 1) * 2;
    let two_pi = 2.0 * std::f32::consts::PI;

    // expected phase advance per hop for each bin
    let phase_advance: Vec<f32> = (0..num_bins)
        .map(|k| two_pi * k as f32 * STRETCH_HOP as f32 / fft_size as f32)
        .collect();

    let mut phase_acc: Vec<f32> = frames[0].iter().map(|c| c.arg()).collect();
    let mut output = Vec::with_capacity((frames.len() as f64 / rate).ceil() as usize + 1);

    let mut t = 0.0f64;
    while t < frames.len() as f64 {
        let i = t.floor() as usize;
        let frac = (t - i as f64) as f32;
        let current = &frames[i];
        let next = frames.get(i + 1).unwrap_or(current);

        let mut frame = Vec::with_capacity(num_bins);
        for k in 0..num_bins {
            let magnitude = (1.0 - frac) * current[k].norm() + frac * next[k].norm();
            frame.push(Complex::from_polar(magnitude, phase_acc[k]));

            let deviation = next[k].arg() - current[k].arg() - phase_advance[k];
            let wrapped = deviation - two_pi * (deviation / two_pi).round();
            phase_acc[k] += phase_advance[k] + wrapped;
        }
        output.push(frame);

        t += rate;
    }

    output
}
