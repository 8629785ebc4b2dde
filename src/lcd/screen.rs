use super::framebuffer::Framebuffer;
use crate::definitions::{LCD_HEIGHT, LCD_WIDTH};

/// Colour of a drawn pixel. Black is a lit LCD pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn is_black(self) -> bool {
        self == Color::Black
    }
}

impl From<bool> for Color {
    fn from(black: bool) -> Self {
        if black {
            Color::Black
        } else {
            Color::White
        }
    }
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..LCD_WIDTH as i32).contains(&x) && (0..LCD_HEIGHT as i32).contains(&y)
}

/// Draws a single pixel. Anything outside of the panel is silently dropped, so the
/// primitives below can be computed in signed space and clipped per pixel.
pub fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Color) {
    if !in_bounds(x, y) {
        return;
    }
    fb.set_pixel(x as usize, y as usize, color.is_black());
}

pub fn line(fb: &mut Framebuffer, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let step_x = if x1 > x2 { -1 } else { 1 };
    let step_y = if y1 > y2 { -1 } else { 1 };

    let (mut x, mut y) = (x1, y1);

    // on a tie x is the major axis
    if dx >= dy {
        // var = 2*dy - dx, the usual midpoint decision variable
        let two_dy = 2 * dy;
        let mut var = two_dy - dx;
        let two_dy_minus_two_dx = two_dy - 2 * dx;

        for _ in 0..=dx {
            plot(fb, x, y, color);
            if var < 0 {
                var += two_dy;
            } else {
                var += two_dy_minus_two_dx;
                y += step_y;
            }
            x += step_x;
        }
    } else {
        let two_dx = 2 * dx;
        let mut var = two_dx - dy;
        let two_dx_minus_two_dy = two_dx - 2 * dy;

        for _ in 0..=dy {
            plot(fb, x, y, color);
            if var < 0 {
                var += two_dx;
            } else {
                var += two_dx_minus_two_dy;
                x += step_x;
            }
            y += step_y;
        }
    }
}

pub fn rect(fb: &mut Framebuffer, x1: i32, y1: i32, x2: i32, y2: i32, fill: bool, color: Color) {
    if !fill {
        line(fb, x1, y1, x2, y1, color);
        line(fb, x1, y2, x2, y2, color);
        line(fb, x1, y1, x1, y2, color);
        line(fb, x2, y1, x2, y2, color);
        return;
    }

    let (min_x, max_x) = (x1.min(x2), x1.max(x2));
    let (min_y, max_y) = (y1.min(y2), y1.max(y2));

    for x in min_x..=max_x {
        for y in min_y..=max_y {
            plot(fb, x, y, color);
        }
    }
}

/// A line with a thickness of `width` pixels, painted perpendicular to the major axis.
/// Odd widths are centred, even widths get the extra pixel on the negative side.
pub fn bar(
    fb: &mut Framebuffer,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    width: u32,
    color: Color,
) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let step_x = if x1 > x2 { -1 } else { 1 };
    let step_y = if y1 > y2 { -1 } else { 1 };

    let half_width = (width / 2) as i32;
    let upper = half_width + (width % 2) as i32;

    let (mut x, mut y) = (x1, y1);

    if dx >= dy {
        let mut var = 2 * dy - dx;
        let diff = var - dx;

        for _ in 0..=dx {
            for j in -half_width..upper {
                plot(fb, x, y + j, color);
            }
            if var < 0 {
                var += 2 * dy;
            } else {
                var += diff;
                y += step_y;
            }
            x += step_x;
        }
    } else {
        let mut var = 2 * dx - dy;
        let diff = var - dy;

        for _ in 0..=dy {
            for j in -half_width..upper {
                plot(fb, x + j, y, color);
            }
            if var < 0 {
                var += 2 * dx;
            } else {
                var += diff;
                x += step_x;
            }
            y += step_y;
        }
    }
}

pub fn circle(fb: &mut Framebuffer, x: i32, y: i32, radius: u32, fill: bool, color: Color) {
    // delta1 walks along the axis, delta2 is the matching height on the circle
    let mut delta1 = 0;
    let mut delta2 = radius as i32;
    let mut var = 1 - delta2;

    loop {
        if fill {
            line(fb, x - delta1, y + delta2, x + delta1, y + delta2, color);
            line(fb, x - delta1, y - delta2, x + delta1, y - delta2, color);
            line(fb, x - delta2, y + delta1, x + delta2, y + delta1, color);
            line(fb, x - delta2, y - delta1, x + delta2, y - delta1, color);
        } else {
            plot(fb, x + delta1, y + delta2, color);
            plot(fb, x + delta2, y + delta1, color);
            plot(fb, x - delta1, y + delta2, color);
            plot(fb, x - delta2, y + delta1, color);
            plot(fb, x + delta2, y - delta1, color);
            plot(fb, x + delta1, y - delta2, color);
            plot(fb, x - delta1, y - delta2, color);
            plot(fb, x - delta2, y - delta1, color);
        }

        if var < 0 {
            var += 3 + 2 * delta1;
        } else {
            var += 5 + 2 * (delta1 - delta2);
            delta2 -= 1;
        }
        delta1 += 1;

        if delta1 > delta2 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::{Black, White};

    fn lit(fb: &Framebuffer) -> Vec<(usize, usize)> {
        let mut pixels = Vec::new();
        for y in 0..LCD_HEIGHT {
            for x in 0..LCD_WIDTH {
                if fb.pixel(x, y) {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    #[test]
    fn test_plot_outside_is_noop() {
        let mut fb = Framebuffer::new();
        line(&mut fb, 0, 0, 83, 47, Black);
        let before = fb.serialize();

        for (x, y) in [(84, 0), (0, 48), (-1, 5), (5, -1), (1000, 1000), (i32::MIN, 0)] {
            plot(&mut fb, x, y, Black);
            plot(&mut fb, x, y, White);
        }

        assert_eq!(before, fb.serialize());
    }

    #[test]
    fn test_degenerate_line_is_one_pixel() {
        let mut fb = Framebuffer::new();
        line(&mut fb, 17, 31, 17, 31, Black);
        assert_eq!(vec![(17, 31)], lit(&fb));
    }

    #[test]
    fn test_line_plots_both_endpoints() {
        let cases = [
            (0, 0, 20, 7),
            (20, 7, 0, 0),
            (5, 40, 9, 2),
            (9, 2, 5, 40),
            (10, 10, 20, 20),
            (30, 5, 2, 5),
        ];
        for (x1, y1, x2, y2) in cases {
            let mut fb = Framebuffer::new();
            line(&mut fb, x1, y1, x2, y2, Black);

            assert!(fb.pixel(x1 as usize, y1 as usize), "start of {:?}", (x1, y1, x2, y2));
            assert!(fb.pixel(x2 as usize, y2 as usize), "end of {:?}", (x1, y1, x2, y2));

            // one pixel per step on the major axis
            let major = (x2 - x1).abs().max((y2 - y1).abs()) as usize + 1;
            assert_eq!(major, fb.count_lit());
        }
    }

    #[test]
    fn test_diagonal_tie_uses_x_as_major_axis() {
        let mut fb = Framebuffer::new();
        line(&mut fb, 0, 0, 5, 5, Black);
        assert_eq!(
            vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)],
            lit(&fb)
        );
    }

    #[test]
    fn test_line_clips_at_the_border() {
        let mut fb = Framebuffer::new();
        line(&mut fb, -10, 47, 100, 47, Black);
        assert_eq!(LCD_WIDTH, fb.count_lit());
    }

    #[test]
    fn test_rect_filled_and_outline() {
        let mut filled = Framebuffer::new();
        rect(&mut filled, 5, 7, 2, 3, true, Black);
        assert_eq!(4 * 5, filled.count_lit());

        let mut outline = Framebuffer::new();
        rect(&mut outline, 2, 3, 5, 7, false, Black);
        // the 2x3 interior stays white
        assert_eq!(20 - 2 * 3, outline.count_lit());
        assert!(!outline.pixel(3, 4));
        assert!(outline.pixel(5, 7));

        rect(&mut filled, 3, 4, 4, 6, true, White);
        assert_eq!(outline.serialize(), filled.serialize());
    }

    #[test]
    fn test_bar_thickness() {
        let mut fb = Framebuffer::new();
        bar(&mut fb, 10, 20, 30, 20, 3, Black);
        assert_eq!(21 * 3, fb.count_lit());
        assert!(fb.pixel(10, 19));
        assert!(fb.pixel(10, 21));

        let mut fb = Framebuffer::new();
        bar(&mut fb, 40, 0, 40, 10, 2, Black);
        assert_eq!(11 * 2, fb.count_lit());
        assert!(fb.pixel(39, 0));
        assert!(fb.pixel(40, 10));
        assert!(!fb.pixel(41, 5));

        let mut fb = Framebuffer::new();
        bar(&mut fb, 0, 0, 10, 0, 0, Black);
        assert_eq!(0, fb.count_lit());
    }

    #[test]
    fn test_circle_outline_inside_filled() {
        for radius in [0, 1, 2, 5, 12, 23] {
            let mut filled = Framebuffer::new();
            circle(&mut filled, 42, 24, radius, true, Black);
            let mut outline = Framebuffer::new();
            circle(&mut outline, 42, 24, radius, false, Black);

            let filled = lit(&filled);
            for pixel in lit(&outline) {
                assert!(filled.contains(&pixel), "r={} {:?}", radius, pixel);
            }
        }
    }

    #[test]
    fn test_circle_radius_zero_is_center() {
        let mut fb = Framebuffer::new();
        circle(&mut fb, 6, 20, 0, false, Black);
        assert_eq!(vec![(6, 20)], lit(&fb));
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut fb = Framebuffer::new();
        circle(&mut fb, 40, 20, 7, false, Black);
        for (x, y) in lit(&fb) {
            let mx = 80 - x;
            let my = 40 - y;
            assert!(fb.pixel(mx, y));
            assert!(fb.pixel(x, my));
        }
        assert!(fb.pixel(47, 20));
        assert!(fb.pixel(40, 13));
    }

    #[test]
    fn test_circle_near_corner_does_not_wrap() {
        let mut fb = Framebuffer::new();
        circle(&mut fb, 0, 0, 5, true, Black);
        for (x, y) in lit(&fb) {
            assert!(x <= 5 && y <= 5, "{:?} wrapped around", (x, y));
        }
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(5, 0));
    }
}
