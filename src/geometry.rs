// Plane geometry for the warp: the 4-point projective transform and the
// sanity checks on the four clicked corners.

use crate::error::{Error, Result};
use crate::types::Point;
use imageproc::geometric_transformations::Projection;
use tracing::debug;

/// Exact projective transform taking `src[i]` onto `dst[i]`.
///
/// Corners with three points on one line (or two on top of each other) are
/// rejected before solving; a solve that still fails is `SingularHomography`.
pub fn solve_projection(src: [(f32, f32); 4], dst: [(f32, f32); 4]) -> Result<Projection> {
    check_no_three_collinear(&src, "source")?;
    check_no_three_collinear(&dst, "destination")?;

    let projection = Projection::from_control_points(src, dst).ok_or(Error::SingularHomography)?;
    debug!(?src, ?dst, "Projection solved");
    Ok(projection)
}

/// Corners of a `width x height` rectangle, TL, TR, BR, BL.
pub fn rectangle_corners(width: u32, height: u32) -> [(f32, f32); 4] {
    let (w, h) = (width as f32, height as f32);
    [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
}

pub fn quad_from_points(points: &[Point; 4]) -> [(f32, f32); 4] {
    points.map(Point::as_f32)
}

/// Twice the signed area of triangle (a, b, c). Positive when the turn
/// a -> b -> c is clockwise on screen (y grows downwards).
#[inline]
fn cross(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn check_no_three_collinear(quad: &[(f32, f32); 4], which: &str) -> Result<()> {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    for [i, j, k] in TRIPLES {
        let (a, b, c) = (quad[i], quad[j], quad[k]);
        let ab = (b.0 - a.0).hypot(b.1 - a.1);
        let ac = (c.0 - a.0).hypot(c.1 - a.1);
        // |cross| = |ab| * |ac| * sin(angle); a relative bound keeps this scale-free.
        if cross(a, b, c).abs() <= 1e-6 * ab * ac {
            return Err(Error::DegenerateQuad(format!(
                "{which} points {i}, {j} and {k} are collinear: {a:?} {b:?} {c:?}"
            )));
        }
    }
    Ok(())
}

/// True when the quad is convex and visits its corners clockwise on screen,
/// which is what TL -> TR -> BR -> BL looks like.
pub fn is_convex_clockwise(quad: &[(f32, f32); 4]) -> bool {
    (0..4).all(|i| cross(quad[i], quad[(i + 1) % 4], quad[(i + 2) % 4]) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-2;

    fn assert_maps(p: &Projection, from: (f32, f32), to: (f32, f32)) {
        let got = *p * from;
        assert!(
            (got.0 - to.0).abs() < TOL && (got.1 - to.1).abs() < TOL,
            "{from:?} should land on {to:?}, got {got:?}"
        );
    }

    #[test]
    fn rectangle_onto_itself_is_identity() {
        let rect = rectangle_corners(300, 400);
        let p = solve_projection(rect, rect).unwrap();
        for pt in [(0.0, 0.0), (17.0, 33.0), (150.0, 200.0), (299.0, 1.0), (300.0, 400.0)] {
            assert_maps(&p, pt, pt);
        }
    }

    #[test]
    fn arbitrary_quad_maps_each_corner_onto_its_target() {
        let src = [(100.0, 50.0), (420.0, 80.0), (400.0, 500.0), (90.0, 470.0)];
        let dst = rectangle_corners(300, 400);
        let p = solve_projection(src, dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            assert_maps(&p, *s, *d);
        }
    }

    #[test]
    fn strong_perspective_still_solves_exactly() {
        // Narrow at the top, wide at the bottom: a page photographed from low down.
        let src = [(600.0, 100.0), (680.0, 100.0), (1200.0, 700.0), (50.0, 690.0)];
        let dst = rectangle_corners(300, 400);
        let p = solve_projection(src, dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            assert_maps(&p, *s, *d);
        }
    }

    #[test]
    fn three_collinear_points_are_rejected() {
        let src = [(0.0, 0.0), (100.0, 100.0), (200.0, 200.0), (0.0, 300.0)];
        let dst = rectangle_corners(300, 400);
        assert!(matches!(solve_projection(src, dst), Err(Error::DegenerateQuad(_))));
    }

    #[test]
    fn repeated_point_is_rejected() {
        let src = [(10.0, 10.0), (10.0, 10.0), (200.0, 220.0), (5.0, 300.0)];
        let dst = rectangle_corners(300, 400);
        assert!(matches!(solve_projection(src, dst), Err(Error::DegenerateQuad(_))));
    }

    #[test]
    fn clockwise_convex_order_is_recognised() {
        let tl_tr_br_bl = [(10.0, 10.0), (300.0, 20.0), (290.0, 400.0), (5.0, 380.0)];
        assert!(is_convex_clockwise(&tl_tr_br_bl));

        // Same corners, counter-clockwise (TL, BL, BR, TR).
        let ccw = [tl_tr_br_bl[0], tl_tr_br_bl[3], tl_tr_br_bl[2], tl_tr_br_bl[1]];
        assert!(!is_convex_clockwise(&ccw));

        // Bow-tie: TL, TR, BL, BR.
        let crossed = [tl_tr_br_bl[0], tl_tr_br_bl[1], tl_tr_br_bl[3], tl_tr_br_bl[2]];
        assert!(!is_convex_clockwise(&crossed));
    }
}
