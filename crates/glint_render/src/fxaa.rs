//! FXAA pass over the finished frame.
//!
//! Works on the gamma-corrected framebuffer. Each output pixel is rebuilt
//! from its 3x3 luma neighborhood: pixels below the local contrast
//! threshold pass through untouched, everything else is classified as part
//! of a horizontal or vertical edge, the edge is walked to both ends, and
//! the result blends between the colors found there. Sampling outside the
//! frame clamps to the border.

use glint_math::{luminance, Color};

use crate::renderer::Framebuffer;

const EDGE_THRESHOLD_MIN: f32 = 0.0312;
const EDGE_THRESHOLD: f32 = 0.125;
const SUBPIXEL_QUALITY: f32 = 0.75;
const SEARCH_STEPS: u32 = 16;
const MAX_SEARCH_STEPS: u32 = 32;
const SEARCH_ACCELERATION: f32 = 1.5;
const SEARCH_ACCELERATION_AFTER: u32 = 8;

/// Anti-alias `input` into a new framebuffer of the same size.
pub fn apply_fxaa(input: &Framebuffer) -> Framebuffer {
    let mut output = Framebuffer::new(input.width, input.height);
    for y in 0..input.height {
        for x in 0..input.width {
            output.set(x, y, fxaa_pixel(input, x as i32, y as i32));
        }
    }
    output
}

fn fxaa_pixel(input: &Framebuffer, x: i32, y: i32) -> Color {
    let center = sample(input, x, y);
    let north = sample(input, x, y - 1);
    let south = sample(input, x, y + 1);
    let west = sample(input, x - 1, y);
    let east = sample(input, x + 1, y);

    let lum_center = luminance(center);
    let lum_north = luminance(north);
    let lum_south = luminance(south);
    let lum_west = luminance(west);
    let lum_east = luminance(east);

    let lum_min = lum_center.min(lum_north.min(lum_south).min(lum_west.min(lum_east)));
    let lum_max = lum_center.max(lum_north.max(lum_south).max(lum_west.max(lum_east)));
    let lum_range = lum_max - lum_min;

    // Below the local contrast threshold there is no edge to smooth.
    if lum_range < EDGE_THRESHOLD_MIN.max(lum_max * EDGE_THRESHOLD) {
        return center;
    }

    let lum_north_west = luminance(sample(input, x - 1, y - 1));
    let lum_north_east = luminance(sample(input, x + 1, y - 1));
    let lum_south_west = luminance(sample(input, x - 1, y + 1));
    let lum_south_east = luminance(sample(input, x + 1, y + 1));

    let horizontal_gradient = (lum_north_west - lum_north_east).abs()
        + (lum_south - lum_south_east).abs()
        + (lum_west - lum_east).abs() * 2.0;
    let vertical_gradient = (lum_north_west - lum_south_west).abs()
        + (lum_north - lum_south).abs() * 2.0
        + (lum_north_east - lum_south_east).abs();

    let is_horizontal = horizontal_gradient >= vertical_gradient;

    let (grad_neg, grad_pos) = if is_horizontal {
        (lum_west, lum_east)
    } else {
        (lum_north, lum_south)
    };
    let lum_gradient = (grad_neg - grad_pos).abs();

    let step_length: f32 = if grad_neg < grad_pos { 1.0 } else { -1.0 };
    let is_negative_direction = grad_neg >= grad_pos;

    let (step_x, step_y) = if is_horizontal {
        (step_length, 0.0)
    } else {
        (0.0, step_length)
    };

    let (pos_end, pos_match) = search_edge_end(input, x, y, step_x, step_y, lum_center);
    let (neg_end, neg_match) = search_edge_end(input, x, y, -step_x, -step_y, lum_center);

    let mut blend = if pos_match + neg_match < lum_gradient {
        SUBPIXEL_QUALITY
    } else {
        0.0
    };
    blend = blend.min((pos_match + neg_match) / (lum_gradient * 2.0));

    if is_negative_direction {
        pos_end.lerp(neg_end, blend)
    } else {
        neg_end.lerp(pos_end, blend)
    }
}

/// Walk from `(start_x, start_y)` in steps of `(step_x, step_y)` until a
/// pixel's luma difference to the reference reaches the reference itself,
/// accelerating after the first few steps. Returns the color found there
/// and the final luma difference; without a find, the color at the last
/// visited position.
fn search_edge_end(
    input: &Framebuffer,
    start_x: i32,
    start_y: i32,
    mut step_x: f32,
    mut step_y: f32,
    reference_lum: f32,
) -> (Color, f32) {
    let mut current_x = start_x as f32;
    let mut current_y = start_y as f32;
    let mut end_color = Color::ZERO;
    let mut lum_end_match = 0.0;

    for i in 0..SEARCH_STEPS.min(MAX_SEARCH_STEPS) {
        current_x += step_x;
        current_y += step_y;

        let pixel = sample(input, current_x as i32, current_y as i32);
        lum_end_match = (luminance(pixel) - reference_lum).abs();

        if lum_end_match >= reference_lum {
            end_color = pixel;
            break;
        }

        if i > SEARCH_ACCELERATION_AFTER {
            step_x *= SEARCH_ACCELERATION;
            step_y *= SEARCH_ACCELERATION;
        }
    }

    if lum_end_match < reference_lum {
        end_color = sample(input, current_x as i32, current_y as i32);
    }

    (end_color, lum_end_match)
}

fn sample(input: &Framebuffer, x: i32, y: i32) -> Color {
    let x = x.clamp(0, input.width as i32 - 1) as u32;
    let y = y.clamp(0, input.height as i32 - 1) as u32;
    input.get(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u32, height: u32, color: Color) -> Framebuffer {
        let mut frame = Framebuffer::new(width, height);
        frame.pixels.fill(color);
        frame
    }

    #[test]
    fn test_flat_image_passes_through() {
        let gray = Color::splat(0.5);
        let frame = filled(9, 7, gray);

        let result = apply_fxaa(&frame);
        assert_eq!(result.width, 9);
        assert_eq!(result.height, 7);
        assert!(result.pixels.iter().all(|pixel| *pixel == gray));
    }

    #[test]
    fn test_isolated_bright_pixel_is_removed() {
        let mut frame = filled(5, 5, Color::ZERO);
        frame.set(2, 2, Color::ONE);

        let result = apply_fxaa(&frame);
        assert_eq!(result.get(2, 2), Color::ZERO);
        assert!(result.pixels.iter().all(|pixel| *pixel == Color::ZERO));
    }

    #[test]
    fn test_vertical_edge_stays_sharp() {
        // Left half black, right half white. The filter may move a hard
        // edge by one column but must not smear it into a gradient.
        let mut frame = filled(8, 8, Color::ZERO);
        for y in 0..8 {
            for x in 4..8 {
                frame.set(x, y, Color::ONE);
            }
        }

        let result = apply_fxaa(&frame);
        for y in 0..8 {
            for x in 0..8 {
                let pixel = result.get(x, y);
                let expected = if x <= 4 { Color::ZERO } else { Color::ONE };
                assert_eq!(pixel, expected, "unexpected blend at ({x},{y})");
            }
        }
    }
}
