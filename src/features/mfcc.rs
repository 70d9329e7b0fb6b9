// Mel-frequency cepstral coefficients
// Orthonormal DCT-II over the log-mel spectrogram

/// Compute MFCCs from a log-mel (dB) matrix indexed `[mel_band][frame]`.
/// Returns the first `n_mfcc` cepstral coefficients per frame, indexed
/// `[coefficient][frame]`.
pub fn mfcc(logmel_db: &[Vec<f32>], n_mfcc: usize) -> Vec<Vec<f32>> {
    let n_mels = logmel_db.len();
    let num_frames = logmel_db.first().map_or(0, |row| row.len());
    let mut out = vec![vec![0.0f32; num_frames]; n_mfcc];

    if n_mels == 0 {
        return out;
    }

    let mut column = vec![0.0f32; n_mels];
    for t in 0..num_frames {
        for m in 0..n_mels {
            column[m] = logmel_db[m][t];
        }
        let coeffs = dct_ii_orthonormal(&column, n_mfcc);
        for (k, &c) in coeffs.iter().enumerate() {
            out[k][t] = c;
        }
    }

    out
}

/// Orthonormal DCT-II, truncated to the first `n_out` coefficients.
fn dct_ii_orthonormal(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len();
    let scale = (2.0 / n as f32).sqrt();
    let dc_scale = (1.0 / n as f32).sqrt();

    (0..n_out.min(n))
        .map(|k| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (std::f32::consts::PI * k as f32 * (2 * i + 1) as f32
                        / (2.0 * n as f32))
                        .cos()
                })
                .sum();
            if k == 0 {
                sum * dc_scale
            } else {
                sum * scale
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dct_constant_input_only_dc() {
        let coeffs = dct_ii_orthonormal(&[1.0; 8], 8);
        assert!((coeffs[0] - (8.0f32).sqrt()).abs() < 1e-5);
        for &c in &coeffs[1..] {
            assert!(c.abs() < 1e-5);
        }
    }

    #[test]
    fn test_dct_orthonormal_preserves_energy() {
        let input = [0.3, -0.7, 1.2, 0.1, -0.4, 0.9, -1.1, 0.5];
        let coeffs = dct_ii_orthonormal(&input, input.len());

        let input_energy: f32 = input.iter().map(|x| x * x).sum();
        let coeff_energy: f32 = coeffs.iter().map(|x| x * x).sum();
        assert!((input_energy - coeff_energy).abs() < 1e-4);
    }

    #[test]
    fn test_mfcc_shape() {
        let logmel = vec![vec![0.5f32; 20]; 128];
        let result = mfcc(&logmel, 13);
        assert_eq!(result.len(), 13);
        assert_eq!(result[0].len(), 20);
    }

    #[test]
    fn test_mfcc_empty_frames() {
        let logmel = vec![Vec::new(); 128];
        let result = mfcc(&logmel, 13);
        assert_eq!(result.len(), 13);
        assert!(result[0].is_empty());
    }
}
