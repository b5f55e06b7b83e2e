use super::SplineSample;
use commons::{lerp, V2};
use std::f32::consts::PI;

fn with_cumulative_lengths(mut samples: Vec<SplineSample>) -> Vec<SplineSample> {
    let mut length = 0.0;
    for i in 0..samples.len() {
        if i > 0 {
            length += (samples[i].position - samples[i - 1].position).norm();
        }
        samples[i].cumulative_length = length;
    }
    samples
}

/// Drops samples closer than `min_spacing` to the last one kept. The final sample is always
/// kept.
pub fn thin(samples: &[SplineSample], min_spacing: f32) -> Vec<SplineSample> {
    if samples.len() < 2 {
        return samples.to_vec();
    }
    let mut kept = vec![samples[0]];
    for (i, sample) in samples.iter().enumerate().skip(1) {
        let last = kept[kept.len() - 1].position;
        if i == samples.len() - 1 || (sample.position - last).norm() >= min_spacing {
            kept.push(*sample);
        }
    }
    with_cumulative_lengths(kept)
}

/// Laplacian smoothing of a closed curve whose last sample repeats the first. `pinned` sample
/// indices do not move. Headings are recomputed from neighbours and the closing sample is set
/// back onto the first.
pub fn smooth_closed(
    samples: &[SplineSample],
    iterations: usize,
    lambda: f32,
    pinned: &[usize],
) -> Vec<SplineSample> {
    if samples.len() < 4 {
        return samples.to_vec();
    }
    let n = samples.len() - 1;
    let mut points: Vec<V2<f32>> = samples[..n].iter().map(|sample| sample.position).collect();
    for _ in 0..iterations {
        points = (0..n)
            .map(|i| {
                if pinned.contains(&i) {
                    return points[i];
                }
                let midpoint = (points[(i + n - 1) % n] + points[(i + 1) % n]) / 2.0;
                points[i] * (1.0 - lambda) + midpoint * lambda
            })
            .collect();
    }

    let mut out: Vec<SplineSample> = (0..n)
        .map(|i| {
            let heading = points[(i + 1) % n] - points[(i + n - 1) % n];
            SplineSample {
                position: points[i],
                angle: heading.y.atan2(heading.x),
                cumulative_length: 0.0,
            }
        })
        .collect();
    out.push(out[0]);
    with_cumulative_lengths(out)
}

/// Evenly spaced subset of at most `max` samples, keeping the first and last.
pub fn cap(samples: &[SplineSample], max: usize) -> Vec<SplineSample> {
    if samples.len() <= max || max < 2 {
        return samples.to_vec();
    }
    let step = (samples.len() - 1) as f32 / (max - 1) as f32;
    let mut out = Vec::with_capacity(max);
    out.push(samples[0]);
    for i in 1..max - 1 {
        out.push(samples[(i as f32 * step).round() as usize]);
    }
    out.push(samples[samples.len() - 1]);
    with_cumulative_lengths(out)
}

fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let mut delta = to - from;
    if delta > PI {
        delta -= 2.0 * PI;
    } else if delta < -PI {
        delta += 2.0 * PI;
    }
    from + delta * t
}

/// Samples every `interval` of arc length, plus one at the very end. Positions and headings are
/// interpolated between the surrounding input samples.
pub fn resample_by_arc_length(samples: &[SplineSample], interval: f32) -> Vec<SplineSample> {
    if samples.len() < 2 || interval <= 0.0 {
        return samples.to_vec();
    }
    let total = samples[samples.len() - 1].cumulative_length;
    let count = ((total / interval).ceil() as usize).max(1);
    let mut out = Vec::with_capacity(count + 1);
    let mut index = 0;
    for i in 0..=count {
        let target = (i as f32 * interval).min(total);
        while index < samples.len() - 1 && samples[index].cumulative_length < target {
            index += 1;
        }
        let after = &samples[index];
        let before = &samples[index.saturating_sub(1)];
        let span = after.cumulative_length - before.cumulative_length;
        let t = if span > 1e-6 {
            (target - before.cumulative_length) / span
        } else {
            1.0
        };
        out.push(SplineSample {
            position: lerp(&before.position, &after.position, t),
            angle: lerp_angle(before.angle, after.angle, t),
            cumulative_length: target,
        });
    }
    out
}
