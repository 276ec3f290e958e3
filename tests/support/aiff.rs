/// Big-endian 16-bit AIFF holding `frames` frames of a constant level on every channel.
pub fn constant_aiff(channels: u16, frames: u32, level: i16, sample_rate: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(frames as usize * channels as usize * 2);
    for _ in 0..frames * u32::from(channels) {
        data.extend_from_slice(&level.to_be_bytes());
    }

    let exponent = 31 - sample_rate.leading_zeros();
    let mantissa = u64::from(sample_rate) << (63 - exponent);
    let mut comm = Vec::with_capacity(18);
    comm.extend_from_slice(&channels.to_be_bytes());
    comm.extend_from_slice(&frames.to_be_bytes());
    comm.extend_from_slice(&16u16.to_be_bytes());
    comm.extend_from_slice(&((16_383 + exponent) as u16).to_be_bytes());
    comm.extend_from_slice(&mantissa.to_be_bytes());

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
