// Scalar signal descriptors
// Energy, RMS, and zero-crossing rate over a whole clip

/// Total signal energy: sum of squared samples.
pub fn energy(samples: &[f32]) -> f32 {
    samples.iter().map(|&x| x * x).sum()
}

/// Root mean square amplitude. Zero for an empty signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (energy(samples) / samples.len() as f32).sqrt()
}

/// Zero-crossing rate: `sum(|sign(s[i]) - sign(s[i-1])|) / (2 * n)` with
/// sign in {-1, 0, 1}. A full sign flip contributes 2 to the sum, so an
/// alternating-sign signal approaches a rate of 1.
pub fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }

    let sum: i32 = samples
        .windows(2)
        .map(|pair| (sign(pair[1]) - sign(pair[0])).abs())
        .sum();

    sum as f32 / (2.0 * samples.len() as f32)
}

fn sign(x: f32) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
