use std::f64::consts::PI;
use std::time::Instant;

use crate::math::mesh::GeometryBuffer;

pub const MIN_RADIUS: f64 = 0.25;
pub const DEFAULT_STEP: f64 = 0.01;
pub const MAX_VERTICES: usize = 12_000_000;

// Upper bound on the vertices emitted for (max_r, step), with a ring and a
// sector of slack for accumulated rounding. None when the grid is empty,
// non-finite, or larger than MAX_VERTICES.
pub fn planned_vertices(max_r: f64, step: f64) -> Option<usize> {
    if !(max_r > MIN_RADIUS) || !max_r.is_finite() || !(step > 0.0) || !step.is_finite() {
        return None;
    }

    let rings = ((max_r - MIN_RADIUS) / step).floor() + 2.0;
    let sectors = (2.0 * PI / step).ceil() + 1.0;
    let vertices = rings * sectors * 6.0;
    (vertices <= MAX_VERTICES as f64).then_some(vertices as usize)
}

pub fn surface_point(r: f64, theta: f64) -> [f64; 3] {
    let r3 = r.powi(3);
    let x = -(theta.cos() / (2.0 * r)) - r3 * (3.0 * theta).cos() / 6.0;
    let y = -(theta.sin() / (2.0 * r)) + r3 * (3.0 * theta).sin() / 6.0;
    let z = r * theta.cos();
    [x, y, z]
}

/// Texture coordinate for sample `(r, theta)` on a surface bounded by `max_r`.
///
/// The angular term is `theta / 2 * PI`, evaluated left to right as
/// `(theta / 2) * PI`. A unit mapping would be `theta / (2 * PI)`; the two
/// differ by a factor of `PI²`. The repeat-addressed sampler tiles the
/// texture accordingly.
pub fn tex_coord(r: f64, theta: f64, max_r: f64) -> [f64; 2] {
    let u = (r - MIN_RADIUS) / (max_r - MIN_RADIUS);
    let v = theta / 2.0 * PI;
    [u, v]
}

/// Walks the `(r, theta)` grid and emits two triangles per cell.
///
/// `r` runs from [`MIN_RADIUS`] while `r <= max_r` and `theta` from zero
/// while `theta < 2π`, both by repeated addition of `step`. The accumulated
/// rounding decides the final ring, so the walk is kept as repeated addition.
pub fn tessellate(max_r: f64, step: f64) -> GeometryBuffer {
    let Some(capacity) = planned_vertices(max_r, step) else {
        log::warn!("surface parameters out of range: max_r={max_r}, step={step}");
        return GeometryBuffer::default();
    };

    let started = Instant::now();

    let mut geometry = GeometryBuffer::with_capacity(capacity);

    let mut r = MIN_RADIUS;
    while r <= max_r {
        let mut theta = 0.0;
        while theta < 2.0 * PI {
            let corners = [
                (r, theta),
                (r, theta + step),
                (r + step, theta),
                (r + step, theta + step),
            ];

            // (v1, v2, v3) and (v2, v4, v3)
            for index in [0, 1, 2, 1, 3, 2] {
                let (cr, ct) = corners[index];
                geometry.push_vertex(surface_point(cr, ct), tex_coord(cr, ct, max_r));
            }

            theta += step;
        }
        r += step;
    }

    log::debug!(
        "tessellated surface max_r={max_r} step={step}: {} triangles in {:.2?}",
        geometry.triangle_count(),
        started.elapsed()
    );

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loop_counts(max_r: f64, step: f64) -> (usize, usize) {
        let mut rings = 0;
        let mut r = MIN_RADIUS;
        while r <= max_r {
            rings += 1;
            r += step;
        }
        let mut sectors = 0;
        let mut theta = 0.0;
        while theta < 2.0 * PI {
            sectors += 1;
            theta += step;
        }
        (rings, sectors)
    }

    #[test]
    fn surface_point_matches_closed_form() {
        let [x, y, z] = surface_point(1.0, 0.0);
        assert_relative_eq!(x, -0.5 - 1.0 / 6.0);
        assert_relative_eq!(y, 0.0);
        assert_relative_eq!(z, 1.0);

        let [x, y, z] = surface_point(0.5, PI / 2.0);
        // cos(π/2) ≈ 0, sin(π/2) = 1, cos(3π/2) ≈ 0, sin(3π/2) = -1
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, -1.0 - 0.125 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tex_coord_uses_left_to_right_theta_term() {
        let [u, v] = tex_coord(0.25, 1.0, 1.0);
        assert_relative_eq!(u, 0.0);
        assert_relative_eq!(v, PI / 2.0);

        let [u, v] = tex_coord(1.0, 2.0 * PI, 1.0);
        assert_relative_eq!(u, 1.0);
        assert_relative_eq!(v, PI * PI);
    }

    #[test]
    fn tessellation_is_deterministic() {
        let a = tessellate(0.6, 0.02);
        let b = tessellate(0.6, 0.02);
        assert_eq!(a.positions.len(), b.positions.len());
        assert!(
            a.positions
                .iter()
                .zip(&b.positions)
                .all(|(x, y)| x.to_bits() == y.to_bits())
        );
        assert!(
            a.tex_coords
                .iter()
                .zip(&b.tex_coords)
                .all(|(x, y)| x.to_bits() == y.to_bits())
        );
    }

    #[test]
    fn bound_at_or_below_inner_radius_is_empty() {
        for max_r in [0.25, 0.2, 0.0, -1.0] {
            let geometry = tessellate(max_r, DEFAULT_STEP);
            assert!(geometry.positions.is_empty());
            assert!(geometry.tex_coords.is_empty());
        }
    }

    #[test]
    fn non_positive_step_is_empty() {
        assert!(tessellate(1.0, 0.0).is_empty());
        assert!(tessellate(1.0, -0.01).is_empty());
        assert!(tessellate(1.0, f64::NAN).is_empty());
    }

    #[test]
    fn non_finite_bound_is_empty() {
        assert!(tessellate(f64::INFINITY, DEFAULT_STEP).is_empty());
        assert!(tessellate(f64::NAN, DEFAULT_STEP).is_empty());
        assert!(tessellate(1.0, f64::INFINITY).is_empty());
    }

    #[test]
    fn grids_over_the_vertex_budget_are_empty() {
        assert!(tessellate(1.0, 1e-15).is_empty());
        assert!(tessellate(1.0, 1e-17).is_empty());
        assert!(tessellate(f64::MAX, DEFAULT_STEP).is_empty());
        assert!(tessellate(1e12, 1e3).is_empty());
        assert_eq!(planned_vertices(1.0, 1e-15), None);
    }

    #[test]
    fn planned_vertices_bounds_actual_output() {
        for (max_r, step) in [(1.0, DEFAULT_STEP), (0.26, 0.01), (1.5, 0.02), (0.75, 0.03)] {
            let planned = planned_vertices(max_r, step).unwrap();
            assert!(tessellate(max_r, step).vertex_count() <= planned);
        }
    }

    #[test]
    fn arrays_stay_index_aligned() {
        let geometry = tessellate(0.5, 0.05);
        assert!(!geometry.is_empty());
        assert_eq!(geometry.positions.len() / 3, geometry.tex_coords.len() / 2);
        assert_eq!(geometry.positions.len() % 9, 0);
    }

    #[test]
    fn triangle_count_follows_loop_counts() {
        for (max_r, step) in [(0.5, 0.1), (1.0, 0.05), (0.26, 0.01), (0.75, 0.03)] {
            let (rings, sectors) = loop_counts(max_r, step);
            let geometry = tessellate(max_r, step);
            assert_eq!(geometry.triangle_count(), 2 * rings * sectors);
        }
    }

    #[test]
    fn default_grid_regression_baseline() {
        // 75 rings (the 76th accumulated r is 1.0000000000000007) by 629
        // sectors (6.28 is still below 2π).
        assert_eq!(loop_counts(1.0, DEFAULT_STEP), (75, 629));
        let geometry = tessellate(1.0, DEFAULT_STEP);
        assert_eq!(geometry.triangle_count(), 94_350);
        assert_eq!(geometry.vertex_count(), 283_050);
    }

    #[test]
    fn output_is_finite() {
        let geometry = tessellate(1.0, 0.02);
        assert!(geometry.positions.iter().all(|c| c.is_finite()));
        assert!(geometry.tex_coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn radial_coordinate_never_below_inner_radius() {
        let max_r = 0.8;
        let geometry = tessellate(max_r, 0.05);
        // u = (r - 0.25) / (max_r - 0.25) is non-negative iff r >= 0.25
        assert!(geometry.tex_coords.chunks(2).all(|uv| uv[0] >= 0.0));
    }

    #[test]
    fn first_cell_winding() {
        let step = 0.1;
        let geometry = tessellate(0.3, step);
        let vertex = |i: usize| {
            let p = &geometry.positions[i * 3..i * 3 + 3];
            [p[0], p[1], p[2]]
        };
        let expected = |r: f64, t: f64| surface_point(r, t).map(|c| c as f32);

        let v1 = expected(0.25, 0.0);
        let v2 = expected(0.25, step);
        let v3 = expected(0.25 + step, 0.0);
        let v4 = expected(0.25 + step, step);

        assert_eq!(
            [vertex(0), vertex(1), vertex(2), vertex(3), vertex(4), vertex(5)],
            [v1, v2, v3, v2, v4, v3]
        );
    }
}
