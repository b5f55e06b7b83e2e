use super::SplineSample;
use commons::V2;

/// 0 is a loose Catmull-Rom curve that can overshoot, 1 is straight lines.
const TENSION: f32 = 0.5;
const MIN_STEPS: usize = 24;
const MAX_STEPS: usize = 64;
/// Shorter chords are sampled along a straight line.
const MIN_CHORD: f32 = 1e-6;
const MIN_LENGTH: f32 = 1e-10;

/// Position and derivative at `t` of the cardinal spline segment from `p1` to `p2`.
pub fn cardinal(
    p0: &V2<f32>,
    p1: &V2<f32>,
    p2: &V2<f32>,
    p3: &V2<f32>,
    t: f32,
) -> (V2<f32>, V2<f32>) {
    let scale = (1.0 - TENSION) / 2.0;
    let m1 = (p2 - p0) * scale;
    let m2 = (p3 - p1) * scale;
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    let position = p1 * h00 + m1 * h10 + p2 * h01 + m2 * h11;

    let d00 = 6.0 * t2 - 6.0 * t;
    let d10 = 3.0 * t2 - 4.0 * t + 1.0;
    let d01 = -6.0 * t2 + 6.0 * t;
    let d11 = 3.0 * t2 - 2.0 * t;
    let tangent = p1 * d00 + m1 * d10 + p2 * d01 + m2 * d11;

    (position, tangent)
}

/// More steps for segments that leave or enter a sharp bend.
fn steps_for_segment(p0: &V2<f32>, p1: &V2<f32>, p2: &V2<f32>, p3: &V2<f32>) -> usize {
    let length = |v: V2<f32>| {
        let norm = v.norm();
        if norm == 0.0 {
            MIN_LENGTH
        } else {
            norm
        }
    };
    let (incoming, middle, outgoing) = (p1 - p0, p2 - p1, p3 - p2);
    let cos_at_p1 = incoming.dot(&middle) / (length(incoming) * length(middle));
    let cos_at_p2 = middle.dot(&outgoing) / (length(middle) * length(outgoing));
    let t = (1.0 - cos_at_p1.min(cos_at_p2).max(-1.0).min(1.0)) * 0.5;
    let steps = (MIN_STEPS as f32 + t * (MAX_STEPS - MIN_STEPS) as f32).round() as usize;
    steps.max(MIN_STEPS).min(MAX_STEPS)
}

struct FineSampler {
    samples: Vec<SplineSample>,
}

impl FineSampler {
    fn new(first: V2<f32>, angle: f32) -> FineSampler {
        FineSampler {
            samples: vec![SplineSample {
                position: first,
                angle,
                cumulative_length: 0.0,
            }],
        }
    }

    fn push(&mut self, position: V2<f32>, tangent: V2<f32>) {
        let last = self.samples[self.samples.len() - 1];
        self.samples.push(SplineSample {
            position,
            angle: tangent.y.atan2(tangent.x),
            cumulative_length: last.cumulative_length + (position - last.position).norm(),
        });
    }

    fn segment(&mut self, p0: &V2<f32>, p1: &V2<f32>, p2: &V2<f32>, p3: &V2<f32>) {
        let linear = (p2 - p1).norm() < MIN_CHORD;
        let steps = steps_for_segment(p0, p1, p2, p3);
        for k in 1..=steps {
            let t = k as f32 / steps as f32;
            if linear {
                self.push(p1 + (p2 - p1) * t, p2 - p1);
            } else {
                let (position, tangent) = cardinal(p0, p1, p2, p3, t);
                self.push(position, tangent);
            }
        }
    }
}

/// Dense samples along an open curve through `points`. The end segments reuse their end point
/// as the missing neighbour.
pub fn fine_samples_open(points: &[V2<f32>]) -> Vec<SplineSample> {
    let n = points.len();
    if n < 2 {
        return vec![];
    }
    let first = points[1] - points[0];
    let mut sampler = FineSampler::new(points[0], first.y.atan2(first.x));
    for segment in 0..n - 1 {
        let p0 = &points[segment.saturating_sub(1)];
        let p3 = &points[(segment + 2).min(n - 1)];
        sampler.segment(p0, &points[segment], &points[segment + 1], p3);
    }
    sampler.samples
}

/// Dense samples around the closed curve through `points`. The first and last samples are both
/// the first point, with the same heading.
pub fn fine_samples_closed(points: &[V2<f32>]) -> Vec<SplineSample> {
    let n = points.len();
    if n < 3 {
        return fine_samples_open(points);
    }
    let at = |i: usize| &points[i % n];
    let junction = at(1) - at(n - 1);
    let junction_angle = junction.y.atan2(junction.x);

    let mut sampler = FineSampler::new(points[0], junction_angle);
    for segment in 0..n {
        sampler.segment(
            at(segment + n - 1),
            at(segment),
            at(segment + 1),
            at(segment + 2),
        );
    }
    let mut samples = sampler.samples;
    if let Some(last) = samples.last_mut() {
        last.position = points[0];
        last.angle = junction_angle;
    }
    samples
}
