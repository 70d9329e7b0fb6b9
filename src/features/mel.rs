// Mel filterbank and log-mel spectrogram

/// HTK mel scale conversion.
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}

/// Build a triangular mel filterbank mapping `fft_size / 2 + 1` linear bins
/// onto `n_mels` bands between 0 Hz and Nyquist. Each filter is normalized
/// to unit area so band energies stay comparable.
pub fn mel_filterbank(sample_rate: u32, fft_size: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let num_bins = fft_size / 2 + 1;
    let fmax = sample_rate as f32 / 2.0;

    let mel_min = hz_to_mel(0.0);
    let mel_max = hz_to_mel(fmax);
    let hz_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32)
        .map(mel_to_hz)
        .collect();

    let bin_hz = sample_rate as f32 / fft_size as f32;
    let mut filters = vec![vec![0.0f32; num_bins]; n_mels];

    for m in 0..n_mels {
        let f_left = hz_points[m];
        let f_center = hz_points[m + 1];
        let f_right = hz_points[m + 2];

        for k in 0..num_bins {
            let freq = k as f32 * bin_hz;
            if freq >= f_left && freq <= f_center && f_center > f_left {
                filters[m][k] = (freq - f_left) / (f_center - f_left);
            } else if freq > f_center && freq <= f_right && f_right > f_center {
                filters[m][k] = (f_right - freq) / (f_right - f_center);
            }
        }

        let area: f32 = filters[m].iter().sum();
        if area > 0.0 {
            for v in &mut filters[m] {
                *v /= area;
            }
        }
    }

    filters
}

/// Apply a mel filterbank to a power spectrogram indexed `[bin][frame]`,
/// producing a mel power matrix indexed `[mel_band][frame]`.
pub fn apply_filterbank(power: &[Vec<f32>], filterbank: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let num_frames = power.first().map_or(0, |row| row.len());
    let mut mel = vec![vec![0.0f32; num_frames]; filterbank.len()];

    for (m, filter) in filterbank.iter().enumerate() {
        for t in 0..num_frames {
            let mut acc = 0.0f32;
            for (k, &weight) in filter.iter().enumerate() {
                if weight > 0.0 {
                    acc += weight * power[k][t];
                }
            }
            mel[m][t] = acc;
        }
    }

    mel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filterbank_shape() {
        let fb = mel_filterbank(22050, 1024, 128);
        assert_eq!(fb.len(), 128);
        assert_eq!(fb[0].len(), 513);
    }

    #[test]
    fn test_filters_have_unit_area() {
        let fb = mel_filterbank(22050, 1024, 40);
        for filter in &fb {
            let area: f32 = filter.iter().sum();
            assert!((area - 1.0).abs() < 1e-4, "filter area {} not unit", area);
        }
    }

    #[test]
    fn test_filter_centers_increase() {
        let fb = mel_filterbank(22050, 1024, 40);
        let centers: Vec<usize> = fb
            .iter()
            .map(|f| {
                f.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(k, _)| k)
                    .unwrap()
            })
            .collect();
        for pair in centers.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_apply_filterbank_shape() {
        let power = vec![vec![1.0f32; 10]; 513];
        let fb = mel_filterbank(22050, 1024, 64);
        let mel = apply_filterbank(&power, &fb);
        assert_eq!(mel.len(), 64);
        assert_eq!(mel[0].len(), 10);
        // unit-area filters over a flat spectrum give back ~1.0
        assert!((mel[32][0] - 1.0).abs() < 1e-3);
    }
}
