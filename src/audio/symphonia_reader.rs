//! Symphonia-backed decoding for every container hound does not handle.

use super::{DecodeError, PcmBuffer};
use std::io::Cursor;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};

/// Probe an in-memory payload, keeping container and embedded tag metadata.
pub(crate) fn probe(bytes: &[u8]) -> Result<ProbeResult, DecodeError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());
    symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|error| DecodeError::Invalid {
            message: format!("probe failed: {error}"),
        })
}

/// Decode the first audio track of `bytes` into planar PCM.
pub(super) fn read_with_symphonia(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    let probed = probe(bytes)?;
    let mut reader = probed.format;
    let track = reader
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::Invalid {
            message: "no audio track found".into(),
        })?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let declared_channels = track
        .codec_params
        .channels
        .map(|channels| channels.count())
        .unwrap_or(0);
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|error| DecodeError::Invalid {
            message: format!("unsupported codec: {error}"),
        })?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); declared_channels];
    let mut scratch: Option<(SampleBuffer<f32>, SignalSpec, usize)> = None;
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(ref err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(Error::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(error) => {
                return Err(DecodeError::Codec {
                    message: error.to_string(),
                });
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(Error::DecodeError(message)) => {
                tracing::warn!("Skipping undecodable packet: {message}");
                continue;
            }
            Err(error) => {
                return Err(DecodeError::Codec {
                    message: error.to_string(),
                });
            }
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        let needs_buffer = match scratch.as_ref() {
            Some((_, current, capacity)) => *current != spec || *capacity < decoded.capacity(),
            None => true,
        };
        if needs_buffer {
            let capacity = decoded.capacity();
            scratch = Some((SampleBuffer::new(capacity as u64, spec), spec, capacity));
        }
        let Some((buffer, _, _)) = scratch.as_mut() else {
            continue;
        };
        buffer.copy_planar_ref(decoded);

        let channel_count = spec.channels.count();
        if channels.len() < channel_count {
            let filled = channels.first().map(Vec::len).unwrap_or(0);
            channels.resize(channel_count, vec![0.0; filled]);
        }
        for (channel, planar) in channels.iter_mut().zip(buffer.samples().chunks(frames)) {
            channel.extend_from_slice(planar);
        }
        sample_rate = spec.rate;
    }

    Ok(PcmBuffer::new(channels, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Big-endian 16-bit AIFF with interleaved `frames`.
    fn aiff_bytes(channels: u16, sample_rate: u32, frames: &[Vec<i16>]) -> Vec<u8> {
        let data: Vec<u8> = frames
            .iter()
            .flat_map(|frame| frame.iter().flat_map(|sample| sample.to_be_bytes()))
            .collect();
        let mut comm = Vec::with_capacity(18);
        comm.extend_from_slice(&channels.to_be_bytes());
        comm.extend_from_slice(&(frames.len() as u32).to_be_bytes());
        comm.extend_from_slice(&16u16.to_be_bytes());
        comm.extend_from_slice(&extended_rate(sample_rate));

        let mut body = b"AIFF".to_vec();
        body.extend_from_slice(b"COMM");
        body.extend_from_slice(&(comm.len() as u32).to_be_bytes());
        body.extend_from_slice(&comm);
        body.extend_from_slice(b"SSND");
        body.extend_from_slice(&((data.len() + 8) as u32).to_be_bytes());
        body.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&data);

        let mut out = b"FORM".to_vec();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// 80-bit IEEE extended encoding of a positive integer rate.
    fn extended_rate(rate: u32) -> [u8; 10] {
        let exponent = 31 - rate.leading_zeros();
        let mantissa = u64::from(rate) << (63 - exponent);
        let mut out = [0; 10];
        out[..2].copy_from_slice(&((16_383 + exponent) as u16).to_be_bytes());
        out[2..].copy_from_slice(&mantissa.to_be_bytes());
        out
    }

    #[test]
    fn extended_rate_matches_known_encoding() {
        assert_eq!(
            extended_rate(44_100),
            [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn aiff_is_split_into_planar_channels() {
        let frames = vec![vec![16_384, -8_192]; 1_000];
        let pcm = read_with_symphonia(&aiff_bytes(2, 44_100, &frames)).unwrap();

        assert_eq!(pcm.channel_count(), 2);
        assert_eq!(pcm.frames(), 1_000);
        assert_eq!(pcm.sample_rate, 44_100);
        assert!(pcm.channels[0].iter().all(|&sample| sample == 0.5));
        assert!(pcm.channels[1].iter().all(|&sample| sample == -0.25));
    }

    #[test]
    fn mono_aiff_keeps_sample_order_and_rate() {
        let frames: Vec<Vec<i16>> = (0..64).map(|i| vec![i * 256]).collect();
        let pcm = read_with_symphonia(&aiff_bytes(1, 22_050, &frames)).unwrap();

        assert_eq!(pcm.channel_count(), 1);
        assert_eq!(pcm.sample_rate, 22_050);
        assert_eq!(pcm.frames(), 64);
        assert_eq!(pcm.channels[0][1], 256.0 / 32_768.0);
        assert_eq!(pcm.channels[0][63], (63.0 * 256.0) / 32_768.0);
    }

    #[test]
    fn truncated_header_is_invalid() {
        let bytes = aiff_bytes(2, 44_100, &vec![vec![0, 0]; 16]);
        let err = read_with_symphonia(&bytes[..30]).unwrap_err();
        assert!(matches!(err, DecodeError::Invalid { .. }), "{err}");
    }

    #[test]
    fn unrecognized_bytes_are_invalid() {
        let err = read_with_symphonia(b"definitely not audio").unwrap_err();
        assert!(matches!(err, DecodeError::Invalid { .. }));
    }

    #[test]
    fn probe_exposes_the_container_tracks() {
        let bytes = aiff_bytes(1, 44_100, &vec![vec![0]; 8]);
        let probed = probe(&bytes).unwrap();
        assert_eq!(probed.format.tracks().len(), 1);
    }
}
