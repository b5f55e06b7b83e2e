use commons::V2;

const EPSILON: f32 = 1e-9;

/// True when segments `a`-`b` and `c`-`d` cross at a point strictly inside both. Parallel
/// segments never cross.
pub fn segments_intersect(a: &V2<f32>, b: &V2<f32>, c: &V2<f32>, d: &V2<f32>) -> bool {
    let ab = b - a;
    let cd = d - c;
    let ac = c - a;
    let denominator = ab.x * cd.y - ab.y * cd.x;
    if denominator.abs() < EPSILON {
        return false;
    }
    let t = (ac.x * cd.y - ac.y * cd.x) / denominator;
    let s = (ac.x * ab.y - ac.y * ab.x) / denominator;
    t > EPSILON && t < 1.0 - EPSILON && s > EPSILON && s < 1.0 - EPSILON
}

fn adjacent(i: usize, j: usize, len: usize) -> bool {
    (i + 1) % len == j || (j + 1) % len == i
}

/// Untangles a closed polygon. Wherever two edges cross, one of the two loops they form is cut
/// out: the one without preserved points, or the smaller when neither has any. Crossings with
/// preserved points on both sides are left alone. Returns the new points with the preserved
/// indices remapped.
pub fn remove_self_intersections(
    points: &[V2<f32>],
    preserved: &[usize],
) -> (Vec<V2<f32>>, Vec<usize>) {
    let original = preserved;
    let mut current = points.to_vec();
    let mut preserved = preserved.to_vec();

    'search: loop {
        let m = current.len();
        if m < 4 {
            break;
        }
        for i in 0..m {
            for j in i + 2..m {
                if adjacent(i, j, m) {
                    continue;
                }
                let crossing = segments_intersect(
                    &current[i],
                    &current[(i + 1) % m],
                    &current[j],
                    &current[(j + 1) % m],
                );
                if !crossing {
                    continue;
                }

                let inner = |index: usize| index > i && index <= j;
                let inner_preserved = preserved.iter().filter(|index| inner(**index)).count();
                let outer_preserved = preserved.len() - inner_preserved;
                if inner_preserved > 0 && outer_preserved > 0 {
                    continue;
                }
                let inner_len = j - i;
                let outer_len = m - inner_len;
                let drop_inner = if inner_preserved != outer_preserved {
                    inner_preserved == 0
                } else {
                    inner_len <= outer_len
                };

                if drop_inner {
                    current.drain(i + 1..=j);
                    preserved = preserved
                        .iter()
                        .filter(|index| !inner(**index))
                        .map(|index| if *index > j { index - inner_len } else { *index })
                        .collect();
                } else {
                    current = current[i + 1..=j].to_vec();
                    preserved = preserved
                        .iter()
                        .filter(|index| inner(**index))
                        .map(|index| index - (i + 1))
                        .collect();
                }
                continue 'search;
            }
        }
        break;
    }

    if current.len() >= 3 {
        (current, preserved)
    } else {
        (points.to_vec(), original.to_vec())
    }
}
