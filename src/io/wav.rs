// WAV file I/O
// Decodes WAV files into mono f32 clips and writes clips back as float WAV

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::clip::AudioClip;
use crate::error::{AudioError, AudioResult};

/// Read a WAV file into a mono `AudioClip`.
///
/// Integer PCM (8/16/24/32 bit) and 32-bit float input are supported; samples
/// are rescaled to f32 in [-1.0, 1.0]. Multi-channel input is downmixed to
/// mono by averaging the channels.
pub fn read_wav(path: &Path) -> AudioResult<AudioClip> {
    let unreadable = |source| AudioError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(unreadable)?;
    let spec = reader.spec();

    log::debug!(
        "decoding {}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => {
            // 8-bit PCM is unsigned in WAV: [0, 255] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(unreadable)?
                .into_iter()
                .map(|s| (s as f32 - 128.0) / 128.0)
                .collect()
        }
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(unreadable)?
            .into_iter()
            .map(|s| s as f32 / 32768.0)
            .collect(),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(unreadable)?
            .into_iter()
            .map(|s| s as f32 / 8_388_608.0)
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(unreadable)?
            .into_iter()
            .map(|s| s as f32 / 2_147_483_648.0)
            .collect(),
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(unreadable)?,
        _ => {
            return Err(AudioError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!(
                    "{:?} {}-bit audio",
                    spec.sample_format, spec.bits_per_sample
                ),
            });
        }
    };

    let mono = downmix(&samples, spec.channels as usize);
    AudioClip::new(mono, spec.sample_rate)
}

/// Write a mono clip as 32-bit float WAV, preserving sample values exactly.
/// An existing file at `path` is overwritten.
pub fn write_wav(path: &Path, clip: &AudioClip) -> AudioResult<()> {
    write_wav_inner(path, clip).map_err(|source| AudioError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

fn write_wav_inner(path: &Path, clip: &AudioClip) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &clip.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Average interleaved channels into a mono buffer.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_downmix_stereo() {
        let stereo = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let mono = downmix(&stereo, 2);

        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.15).abs() < 1e-6);
        assert!((mono[1] - 0.35).abs() < 1e-6);
        assert!((mono[2] - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_write_then_read_float_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");

        let clip = AudioClip::new(vec![0.0, 0.25, -0.5, 1.0, -1.0], 22050).unwrap();
        write_wav(&path, &clip).unwrap();

        let decoded = read_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.samples, clip.samples);
    }

    #[test]
    fn test_read_int16_rescales() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("int16.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.finalize().unwrap();

        let clip = read_wav(&path).unwrap();
        assert_eq!(clip.len(), 3);
        assert!((clip.samples[0] + 1.0).abs() < 1e-4);
        assert_eq!(clip.samples[1], 0.0);
        assert!((clip.samples[2] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = read_wav(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert!(matches!(err, AudioError::UnreadableFile { .. }));
    }
}
