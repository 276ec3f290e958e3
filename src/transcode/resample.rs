/// Upper bound on output frames per input frame.
const MAX_UPSAMPLE_RATIO: usize = 64;

/// Linearly resample interleaved audio so the first and last frames are kept.
pub(super) fn resample_linear(
    samples: &[f32],
    channels: usize,
    src_rate: u32,
    dst_rate: u32,
) -> Vec<f32> {
    let channels = channels.max(1);
    if samples.is_empty() || src_rate == 0 || dst_rate == 0 {
        return Vec::new();
    }
    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }
    if frames == 1 || src_rate == dst_rate {
        return samples[..frames * channels].to_vec();
    }

    let target_frames = ((frames as f64) * (dst_rate as f64) / (src_rate as f64))
        .round()
        .max(1.0)
        .min(frames.saturating_mul(MAX_UPSAMPLE_RATIO) as f64) as usize;
    if target_frames == 1 {
        return samples[..channels].to_vec();
    }

    let max_src = (frames - 1) as f64;
    let step = max_src / (target_frames - 1) as f64;
    let mut out = Vec::with_capacity(target_frames * channels);
    for i in 0..target_frames {
        let src_pos = step * i as f64;
        let idx = (src_pos.floor() as usize).min(frames - 1);
        let frac = (src_pos - idx as f64) as f32;
        let next = (idx + 1).min(frames - 1);
        for ch in 0..channels {
            let s0 = samples[idx * channels + ch];
            let s1 = samples[next * channels + ch];
            out.push(s0 + (s1 - s0) * frac);
        }
    }
    out
}
