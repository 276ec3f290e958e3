use super::symphonia_reader::read_with_symphonia;
use super::wav_reader::read_wav;
use super::{DecodeError, PcmBuffer, SampleDecoder};

/// Default decoder: hound for plain WAV, symphonia for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioDecoder;

impl AudioDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }
}

impl SampleDecoder for AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Invalid {
                message: "empty payload".into(),
            });
        }
        let pcm = match read_wav(bytes)? {
            Some(pcm) => pcm,
            None => read_with_symphonia(bytes)?,
        };
        pcm.ensure_finite()?;
        tracing::debug!(
            channels = pcm.channel_count(),
            frames = pcm.frames(),
            sample_rate = pcm.sample_rate,
            "Decoded audio payload"
        );
        Ok(pcm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::SampleFormat;
    use std::io::Cursor;

    fn wav_bytes_f32(channels: u16, samples: &[f32]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22_050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create wav writer");
            for &sample in samples {
                writer.write_sample(sample).expect("write sample");
            }
            writer.finalize().expect("finalize wav");
        }
        cursor.into_inner()
    }

    #[test]
    fn decode_reports_invalid_data_errors() {
        let err = AudioDecoder::new().decode(&[0, 1, 2, 3, 4, 5]);
        assert!(matches!(err, Err(DecodeError::Invalid { .. })));
    }

    #[test]
    fn decode_rejects_empty_payload() {
        let err = AudioDecoder::new().decode(&[]);
        assert!(matches!(err, Err(DecodeError::Invalid { .. })));
    }

    #[test]
    fn float_wav_decodes_to_planar_channels() {
        let bytes = wav_bytes_f32(2, &[0.25, -0.5, 0.75, -1.0]);
        let pcm = AudioDecoder::new().decode(&bytes).unwrap();
        assert_eq!(pcm.sample_rate, 22_050);
        assert_eq!(pcm.channels, vec![vec![0.25, 0.75], vec![-0.5, -1.0]]);
    }

    #[test]
    fn nan_samples_are_rejected() {
        let bytes = wav_bytes_f32(1, &[0.0, f32::NAN]);
        let err = AudioDecoder::new().decode(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::NonFinite { channel: 0, index: 1 }));
    }

    #[test]
    fn zero_length_wav_decodes_to_empty_buffer() {
        let bytes = wav_bytes_f32(2, &[]);
        let pcm = AudioDecoder::new().decode(&bytes).unwrap();
        assert!(pcm.is_empty());
        assert_eq!(pcm.channel_count(), 2);
    }
}
