use commons::V2;

#[derive(Clone, Debug, PartialEq)]
pub struct Simplified {
    pub points: Vec<V2<f32>>,
    /// Indices into `points` of the protected input points.
    pub preserved: Vec<usize>,
}

fn distance_to_line(point: &V2<f32>, a: &V2<f32>, b: &V2<f32>) -> f32 {
    let direction = b - a;
    let length_squared = direction.norm_squared();
    if length_squared == 0.0 {
        return (point - a).norm();
    }
    let u = (point - a).dot(&direction) / length_squared;
    (point - (a + direction * u)).norm()
}

struct DouglasPeucker<'a> {
    points: &'a [V2<f32>],
    tolerance: f32,
    preserve: &'a [usize],
}

impl<'a> DouglasPeucker<'a> {
    /// Kept indices from `start` to `end` inclusive.
    fn run(&self, start: usize, end: usize) -> Vec<usize> {
        if end - start <= 1 {
            return vec![start, end];
        }
        let (a, b) = (&self.points[start], &self.points[end]);
        let mut furthest = start;
        let mut max_distance = 0.0;
        for i in start + 1..end {
            let distance = distance_to_line(&self.points[i], a, b);
            if distance > max_distance {
                max_distance = distance;
                furthest = i;
            }
        }
        if max_distance < self.tolerance {
            let mut out = vec![start];
            out.extend((start + 1..end).filter(|i| self.preserve.contains(i)));
            out.push(end);
            return out;
        }
        let mut out = self.run(start, furthest);
        out.pop();
        out.extend(self.run(furthest, end));
        out
    }
}

/// Douglas-Peucker simplification that never drops the `preserve` indices. The first and last
/// points are always kept.
pub fn simplify(points: &[V2<f32>], tolerance: f32, preserve: &[usize]) -> Simplified {
    let kept: Vec<usize> = if points.len() <= 2 || tolerance <= 0.0 {
        (0..points.len()).collect()
    } else {
        DouglasPeucker {
            points,
            tolerance,
            preserve,
        }
        .run(0, points.len() - 1)
    };
    Simplified {
        points: kept.iter().map(|i| points[*i]).collect(),
        preserved: kept
            .iter()
            .enumerate()
            .filter(|(_, original)| preserve.contains(original))
            .map(|(i, _)| i)
            .collect(),
    }
}
