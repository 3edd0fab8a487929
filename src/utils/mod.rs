use smithay::utils::{Logical, Point, Rectangle, Size};

/// Returns the center of a rectangle.
pub fn center(rect: Rectangle<f64, Logical>) -> Point<f64, Logical> {
    rect.loc + Point::from((rect.size.w / 2., rect.size.h / 2.))
}

/// Returns a rectangle of the given size centered around `center`.
pub fn centered_at(
    size: Size<f64, Logical>,
    center: Point<f64, Logical>,
) -> Rectangle<f64, Logical> {
    let loc = center - Point::from((size.w / 2., size.h / 2.));
    Rectangle::new(loc, size)
}

/// Grows a size by the given amounts, clamping the result at zero.
pub fn enlarge(size: Size<f64, Logical>, dw: f64, dh: f64) -> Size<f64, Logical> {
    Size::from((f64::max(0., size.w + dw), f64::max(0., size.h + dh)))
}

/// Grows a rectangle outwards by `dx` on the left and right and by `dy` on the top and bottom.
pub fn outset(rect: Rectangle<f64, Logical>, dx: f64, dy: f64) -> Rectangle<f64, Logical> {
    let dx = f64::max(0., dx);
    let dy = f64::max(0., dy);
    Rectangle::new(
        rect.loc - Point::from((dx, dy)),
        enlarge(rect.size, dx * 2., dy * 2.),
    )
}

/// Signed distance from `x` to the nearest vertical edge of `rect`, positive when outside.
pub fn manhattan_distance_x(x: f64, rect: Rectangle<f64, Logical>) -> f64 {
    f64::max(rect.loc.x - x, x - (rect.loc.x + rect.size.w))
}

/// Signed distance from `y` to the nearest horizontal edge of `rect`, positive when outside.
pub fn manhattan_distance_y(y: f64, rect: Rectangle<f64, Logical>) -> f64 {
    f64::max(rect.loc.y - y, y - (rect.loc.y + rect.size.h))
}

/// Linearly interpolates between two sizes.
///
/// `t` is clamped to `[0, 1]` so that the result stays between `from` and `to`.
pub fn lerp_size(
    from: Size<f64, Logical>,
    to: Size<f64, Logical>,
    t: f64,
) -> Size<f64, Logical> {
    let t = t.clamp(0., 1.);
    if t == 0. {
        return from;
    }
    if t == 1. {
        return to;
    }

    Size::from((
        from.w + (to.w - from.w) * t,
        from.h + (to.h - from.h) * t,
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle<f64, Logical> {
        Rectangle::new(Point::from((x, y)), Size::from((w, h)))
    }

    #[test]
    fn center_and_centered_at_agree() {
        let r = rect(100., 100., 100., 100.);
        assert_eq!(center(r), Point::from((150., 150.)));
        assert_eq!(centered_at(r.size, center(r)), r);
    }

    #[test]
    fn outset_grows_both_sides() {
        let r = outset(rect(10., 20., 100., 50.), 5., 10.);
        assert_eq!(r, rect(5., 10., 110., 70.));
    }

    #[test]
    fn manhattan_distances() {
        let r = rect(0., 100., 400., 50.);
        assert_eq!(manhattan_distance_y(60., r), 40.);
        assert_eq!(manhattan_distance_y(170., r), 20.);
        assert!(manhattan_distance_y(120., r) < 0.);
        assert_eq!(manhattan_distance_x(-30., r), 30.);
        assert_eq!(manhattan_distance_x(410., r), 10.);
    }

    #[test]
    fn lerp_size_endpoints_are_exact() {
        let from = Size::from((123.4, 56.7));
        let to = Size::from((10.1, 20.2));
        assert_eq!(lerp_size(from, to, 0.), from);
        assert_eq!(lerp_size(from, to, 1.), to);
        assert_eq!(lerp_size(from, to, -3.), from);
        assert_eq!(lerp_size(from, to, 3.), to);

        let mid = lerp_size(Size::from((100., 50.)), Size::from((50., 25.)), 0.5);
        assert_abs_diff_eq!(mid.w, 75., epsilon = 1e-9);
        assert_abs_diff_eq!(mid.h, 37.5, epsilon = 1e-9);
    }

    #[test]
    fn enlarge_clamps_at_zero() {
        assert_eq!(
            enlarge(Size::from((10., 10.)), -20., 5.),
            Size::from((0., 15.))
        );
    }
}
