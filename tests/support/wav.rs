use std::io::Cursor;
use std::path::Path;

use soundpeaks::storage::SOUNDS_DIR;

/// Interleaved 32-bit float WAV bytes.
pub fn float_wav_bytes(channels: u16, sample_rate: u32, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write wav sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Stereo float WAV holding `frames` frames of a constant level.
pub fn constant_stereo(frames: usize, level: f32, sample_rate: u32) -> Vec<u8> {
    float_wav_bytes(2, sample_rate, &vec![level; frames * 2])
}

/// Place a seed asset under `root` the way the store lays them out.
pub fn write_seed_asset(root: &Path, id: &str, bytes: &[u8]) {
    let dir = root.join(SOUNDS_DIR);
    std::fs::create_dir_all(&dir).expect("create sounds dir");
    std::fs::write(dir.join(format!("{id}.wav")), bytes).expect("write seed asset");
}

/// Header fields and sample count of a WAV payload.
pub fn read_spec(bytes: &[u8]) -> (hound::WavSpec, u32) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).expect("open wav");
    (reader.spec(), reader.len())
}
