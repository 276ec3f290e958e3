use super::{DecodeError, PcmBuffer};
use hound::SampleFormat;
use std::io::Cursor;

/// Decode RIFF/WAVE bytes with hound.
///
/// Returns `Ok(None)` when hound does not accept the header so another reader
/// can try; errors after a valid header are reported.
pub(super) fn read_wav(bytes: &[u8]) -> Result<Option<PcmBuffer>, DecodeError> {
    let mut reader = match hound::WavReader::new(Cursor::new(bytes)) {
        Ok(reader) => reader,
        Err(_) => return Ok(None),
    };
    let spec = reader.spec();
    let channel_count = spec.channels.max(1) as usize;
    let interleaved = match spec.sample_format {
        SampleFormat::Float => read_float_samples(&mut reader)?,
        SampleFormat::Int => read_int_samples(&mut reader, spec.bits_per_sample)?,
    };
    Ok(Some(PcmBuffer::from_interleaved(
        &interleaved,
        channel_count,
        spec.sample_rate,
    )))
}

fn read_float_samples(reader: &mut hound::WavReader<Cursor<&[u8]>>) -> Result<Vec<f32>, DecodeError> {
    reader
        .samples::<f32>()
        .map(|s| s.map_err(|source| DecodeError::Sample { source }))
        .collect()
}

fn read_int_samples(
    reader: &mut hound::WavReader<Cursor<&[u8]>>,
    bits_per_sample: u16,
) -> Result<Vec<f32>, DecodeError> {
    let scale = (1i64 << bits_per_sample.saturating_sub(1)).max(1) as f32;
    reader
        .samples::<i32>()
        .map(|s| {
            s.map(|v| v as f32 / scale)
                .map_err(|source| DecodeError::Sample { source })
        })
        .collect()
}
