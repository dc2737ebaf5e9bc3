use kitti_fusion_image::Image;

/// Set a pixel's color, silently skipping coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Extra room around the image for the first clipping pass of [`draw_line`].
const COARSE_CLIP_MARGIN: i64 = 1 << 20;

/// Clips a segment to the box `[min, max]` with the Liang-Barsky algorithm.
///
/// Returns `None` when the segment misses the box. Endpoints already inside are kept as is.
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let inside = |(x, y): (i64, i64)| x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1;
    if inside(p0) && inside(p1) {
        return Some((p0, p1));
    }

    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let dx = p1.0 as f64 - x0;
    let dy = p1.1 as f64 - y0;

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64, p: (i64, i64)| {
        if inside(p) {
            return p;
        }
        let x = (x0 + t * dx).round().clamp(min.0 as f64, max.0 as f64);
        let y = (y0 + t * dy).round().clamp(min.1 as f64, max.1 as f64);
        (x as i64, y as i64)
    };
    Some((at(t0, p0), at(t1, p1)))
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// The segment is clipped to the image before rasterizing, so the work is bounded by the
/// image size whatever the endpoints are.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. (Note: thickness > 1 is approximate).
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    if img.cols() == 0 || img.rows() == 0 {
        return;
    }

    let half_thickness = if thickness > 1 {
        (thickness / 2).min(img.cols().max(img.rows())) as i64
    } else {
        0
    };

    // the brush may reach into the image from just outside of it
    let min = (-half_thickness, -half_thickness);
    let max = (
        img.cols() as i64 - 1 + half_thickness,
        img.rows() as i64 - 1 + half_thickness,
    );

    // far endpoints lose precision in f64, so first bring them within a coarse box
    let coarse_min = (min.0 - COARSE_CLIP_MARGIN, min.1 - COARSE_CLIP_MARGIN);
    let coarse_max = (max.0 + COARSE_CLIP_MARGIN, max.1 + COARSE_CLIP_MARGIN);
    let Some((p0, p1)) = clip_segment(p0, p1, coarse_min, coarse_max)
        .and_then(|(p0, p1)| clip_segment(p0, p1, min, max))
    else {
        return;
    };

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        // a thick line is approximated with a square brush
        for i in -half_thickness..=half_thickness {
            for j in -half_thickness..=half_thickness {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a closed polygon outline, connecting the last vertex back to the first.
///
/// Fewer than two vertices draw at most a single point.
pub fn draw_polygon<const C: usize>(
    img: &mut Image<u8, C>,
    vertices: &[(i64, i64)],
    color: [u8; C],
    thickness: usize,
) {
    match vertices {
        [] => {}
        [p] => draw_line(img, *p, *p, color, thickness),
        _ => {
            for (i, p0) in vertices.iter().enumerate() {
                let p1 = vertices[(i + 1) % vertices.len()];
                draw_line(img, *p0, p1, color, thickness);
            }
        }
    }
}

/// Draws a circle outline with the midpoint circle algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The center of the circle as (x, y).
/// * `radius` - The radius in pixels. A radius of zero draws the center pixel.
/// * `color` - The color of the outline.
pub fn draw_circle<const C: usize>(
    img: &mut Image<u8, C>,
    center: (i64, i64),
    radius: u32,
    color: [u8; C],
) {
    let (cx, cy) = center;
    let r = radius as i64;
    if cx.saturating_add(r) < 0
        || cx.saturating_sub(r) >= img.cols() as i64
        || cy.saturating_add(r) < 0
        || cy.saturating_sub(r) >= img.rows() as i64
    {
        return;
    }

    let mut x = r;
    let mut y = 0i64;
    let mut err = 1 - x;

    while x >= y {
        for (ox, oy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            set_pixel(img, cx + ox, cy + oy, color);
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitti_fusion_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    #[test]
    fn test_draw_line() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_line(&mut img, (0, 0), (4, 4), [255], 1);
        assert_eq!(
            img.as_slice(),
            &[
                255,   0,   0,   0,   0,
                  0, 255,   0,   0,   0,
                  0,   0, 255,   0,   0,
                  0,   0,   0, 255,   0,
                  0,   0,   0,   0, 255,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_draw_line_clipped() -> Result<(), ImageError> {
        let mut img = Image::new(ImageSize { width: 3, height: 1 }, vec![0u8; 3])?;
        draw_line(&mut img, (-5, 0), (10, 0), [9], 1);
        assert_eq!(img.as_slice(), &[9, 9, 9]);
        Ok(())
    }

    #[test]
    fn test_draw_line_far_endpoints() -> Result<(), ImageError> {
        let mut img = Image::new(ImageSize { width: 3, height: 2 }, vec![0u8; 6])?;
        draw_line(&mut img, (i64::MIN, 0), (i64::MAX, 0), [9], 1);
        assert_eq!(img.as_slice(), &[9, 9, 9, 0, 0, 0]);

        // entirely outside, in both directions
        draw_line(&mut img, (i64::MIN, -4), (i64::MAX, -4), [5], 3);
        draw_line(&mut img, (4_000_000_000, 1), (i64::MAX / 2, i64::MAX), [5], 1);
        assert_eq!(img.as_slice(), &[9, 9, 9, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_draw_line_diagonal_clipped() -> Result<(), ImageError> {
        let mut img = Image::new(ImageSize { width: 3, height: 3 }, vec![0u8; 9])?;
        let far = 1_000_000_000;
        draw_line(&mut img, (-far, -far), (far, far), [1], 1);
        assert_eq!(img.as_slice(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_draw_line_thick_brush_from_outside() -> Result<(), ImageError> {
        let mut img = Image::new(ImageSize { width: 3, height: 3 }, vec![0u8; 9])?;
        // the brush centered one row above still covers the top row
        draw_line(&mut img, (-10, -1), (10, -1), [4], 3);
        assert_eq!(img.as_slice(), &[4, 4, 4, 0, 0, 0, 0, 0, 0]);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_polygon_closed() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_polygon(&mut img, &[(1, 1), (3, 1), (3, 3), (1, 3)], [128], 1);
        assert_eq!(
            img.as_slice(),
            &[
                  0,   0,   0,   0,   0,
                  0, 128, 128, 128,   0,
                  0, 128,   0, 128,   0,
                  0, 128, 128, 128,   0,
                  0,   0,   0,   0,   0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_circle_radius_one() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_circle(&mut img, (2, 2), 1, [7]);
        assert_eq!(
            img.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 0, 7, 0, 0,
                0, 7, 0, 7, 0,
                0, 0, 7, 0, 0,
                0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_draw_circle_rgb_near_border() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 0);
        draw_circle(&mut img, (0, 0), 4, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 0)?, [0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_draw_circle_far_center() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 0);
        draw_circle(&mut img, (i64::MAX, i64::MAX), 4, [1]);
        draw_circle(&mut img, (i64::MIN, 2), u32::MAX, [1]);
        assert!(img.as_slice().iter().all(|v| *v == 0));
        Ok(())
    }
}
