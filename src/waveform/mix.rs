/// Down-mix planar channels into one envelope: the mean of absolute values per frame.
///
/// Stereo matches `(|l| + |r|) / 2` exactly; mono is `|x|`. Only complete
/// frames (the shortest channel length) are mixed.
pub fn downmix(channels: &[Vec<f32>]) -> Vec<f64> {
    let Some(frames) = channels.iter().map(Vec::len).min() else {
        return Vec::new();
    };
    let divisor = channels.len() as f64;
    (0..frames)
        .map(|index| {
            let sum: f64 = channels
                .iter()
                .map(|channel| f64::from(channel[index].abs()))
                .sum();
            sum / divisor
        })
        .collect()
}
