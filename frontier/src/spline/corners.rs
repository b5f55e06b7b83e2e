use commons::V2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Corners turning more sharply than this cosine (about 45 degrees) are rounded.
const CORNER_COS_THRESHOLD: f32 = 0.7;
const MIN_LENGTH: f32 = 1e-10;

fn unit(vector: V2<f32>) -> (V2<f32>, f32) {
    let length = vector.norm().max(MIN_LENGTH);
    (vector / length, length)
}

/// Points replacing the corner at `p1`, or `None` when it should stay as it is.
fn arc(p0: &V2<f32>, p1: &V2<f32>, p2: &V2<f32>, radius: f32) -> Option<[V2<f32>; 4]> {
    let (d1, len1) = unit(p1 - p0);
    let (d2, len2) = unit(p2 - p1);
    let cos = d1.dot(&d2);
    if cos >= CORNER_COS_THRESHOLD {
        return None;
    }
    let half_angle = cos.max(-1.0).min(1.0).acos() / 2.0;
    if half_angle < 0.01 || half_angle > FRAC_PI_2 - 0.01 {
        return None;
    }
    let tan_half = half_angle.tan();
    let along = (radius / tan_half).min(len1.min(len2) * 0.45);
    if along < 1.0 {
        return None;
    }
    let radius = along / tan_half;
    let start = p1 - d1 * along;
    let end = p1 + d2 * along;

    let (bisector, _) = unit(d2 - d1);
    let centre = p1 + bisector * (radius / half_angle.cos());
    let angle_of = |point: &V2<f32>| (point.y - centre.y).atan2(point.x - centre.x);
    let from = angle_of(&start);
    let mut sweep = angle_of(&end) - from;
    if sweep > PI {
        sweep -= 2.0 * PI;
    } else if sweep < -PI {
        sweep += 2.0 * PI;
    }
    let on_arc = |t: f32| {
        let angle = from + t * sweep;
        centre + V2::new(angle.cos(), angle.sin()) * radius
    };
    Some([start, on_arc(1.0 / 3.0), on_arc(2.0 / 3.0), end])
}

/// Replaces every sharp corner with four points on a circular arc of `radius`, shrunk where the
/// adjoining edges are short. Open paths keep their ends; `preserve` indices are never replaced.
pub fn round_corners(
    points: &[V2<f32>],
    closed: bool,
    radius: f32,
    preserve: &[usize],
) -> Vec<V2<f32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let at = |i: isize| &points[i.rem_euclid(n as isize) as usize];
    let range = if closed { 0..n } else { 1..n - 1 };

    let mut out = vec![];
    if !closed {
        out.push(points[0]);
    }
    for i in range {
        let p1 = &points[i];
        if preserve.contains(&i) {
            out.push(*p1);
            continue;
        }
        let i = i as isize;
        match arc(at(i - 1), p1, at(i + 1), radius) {
            Some(arc) => out.extend_from_slice(&arc),
            None => out.push(*p1),
        }
    }
    if !closed {
        out.push(points[n - 1]);
    }
    out
}
