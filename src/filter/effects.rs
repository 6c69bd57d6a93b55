/// Pixel implementations of the seven filters
///
/// Every function edits the buffer in place and is deterministic.
/// Parameter validation happens in the library before these are called,
/// so here a degenerate parameter (zero radius, block of one pixel) simply
/// leaves the image untouched.

use image::{imageops, GrayImage, ImageBuffer, Luma, RgbaImage};

/// Gain applied to Sobel magnitudes before the intensity scale
const EDGE_GAIN: f32 = 2.0;

/// Sepia tone blended with the original by `intensity`
pub fn sepia(image: &mut RgbaImage, intensity: f32) {
    let intensity = intensity.clamp(0.0, 1.0);

    for pixel in image.pixels_mut() {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;

        let tr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0);
        let tg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0);
        let tb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0);

        pixel[0] = (r * (1.0 - intensity) + tr * intensity).round() as u8;
        pixel[1] = (g * (1.0 - intensity) + tg * intensity).round() as u8;
        pixel[2] = (b * (1.0 - intensity) + tb * intensity).round() as u8;
    }
}

/// Voronoi cells over a jittered grid of `radius` pixels
///
/// Each output pixel takes the source colour at its nearest seed point.
pub fn crystallize(image: &mut RgbaImage, radius: f32) {
    let cell = radius.round() as u32;
    let (width, height) = image.dimensions();
    if cell <= 1 || width == 0 || height == 0 {
        return;
    }

    let source = image.clone();
    let cols = width.div_ceil(cell);
    let rows = height.div_ceil(cell);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let cx = x / cell;
        let cy = y / cell;

        let mut best = (u64::MAX, 0u32, 0u32);
        // Our own seed is under 1.5 cells away and anything three cells out
        // is over two, so the 5x5 block always holds the nearest seed
        for ny in cy.saturating_sub(2)..=(cy + 2).min(rows - 1) {
            for nx in cx.saturating_sub(2)..=(cx + 2).min(cols - 1) {
                let (sx, sy) = seed_point(nx, ny, cell);
                let dx = sx as i64 - x as i64;
                let dy = sy as i64 - y as i64;
                let d = (dx * dx + dy * dy) as u64;
                if d < best.0 {
                    best = (d, sx, sy);
                }
            }
        }

        let sx = best.1.min(width - 1);
        let sy = best.2.min(height - 1);
        *pixel = *source.get_pixel(sx, sy);
    }
}

/// Seed point of grid cell (cx, cy)
fn seed_point(cx: u32, cy: u32, cell: u32) -> (u32, u32) {
    let h = cell_hash(cx, cy);
    let jx = h % cell;
    let jy = (h >> 16) % cell;
    (cx * cell + jx, cy * cell + jy)
}

fn cell_hash(cx: u32, cy: u32) -> u32 {
    let mut h = cx.wrapping_mul(0x8da6_b343) ^ cy.wrapping_mul(0xd816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    h
}

/// Per-channel Sobel edge magnitude scaled by `intensity`
pub fn edges(image: &mut RgbaImage, intensity: f32) {
    let (width, height) = image.dimensions();

    for channel in 0..3 {
        let plane: GrayImage =
            ImageBuffer::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[channel]]));
        let gradients = imageproc::gradients::sobel_gradients(&plane);

        for (pixel, magnitude) in image.pixels_mut().zip(gradients.pixels()) {
            let value = magnitude[0] as f32 * intensity * EDGE_GAIN;
            pixel[channel] = value.clamp(0.0, 255.0).round() as u8;
        }
    }
}

/// Gaussian blur with sigma = `radius`
///
/// Uses the three-pass box approximation, whose cost does not depend on
/// the radius.
pub fn gaussian_blur(image: &mut RgbaImage, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    *image = imageops::fast_blur(image, effective_sigma(image, radius));
}

/// Clamp a blur sigma to the image's longest side
///
/// Past that point the blur is already a flat average of the whole frame.
fn effective_sigma(image: &RgbaImage, radius: f32) -> f32 {
    let longest = image.width().max(image.height()).max(1) as f32;
    radius.min(longest)
}

/// Average colour over square blocks of `scale` pixels
pub fn pixellate(image: &mut RgbaImage, scale: f32) {
    let block = scale.round() as u32;
    if block <= 1 {
        return;
    }

    let (width, height) = image.dimensions();
    for by in (0..height).step_by(block as usize) {
        for bx in (0..width).step_by(block as usize) {
            let x_end = (bx + block).min(width);
            let y_end = (by + block).min(height);

            let mut sum = [0u64; 4];
            for y in by..y_end {
                for x in bx..x_end {
                    let p = image.get_pixel(x, y);
                    for c in 0..4 {
                        sum[c] += p[c] as u64;
                    }
                }
            }

            let count = ((x_end - bx) * (y_end - by)) as u64;
            let avg = [
                ((sum[0] + count / 2) / count) as u8,
                ((sum[1] + count / 2) / count) as u8,
                ((sum[2] + count / 2) / count) as u8,
                ((sum[3] + count / 2) / count) as u8,
            ];

            for y in by..y_end {
                for x in bx..x_end {
                    image.get_pixel_mut(x, y).0 = avg;
                }
            }
        }
    }
}

/// Sharpen by adding back the difference from a blurred copy
pub fn unsharp_mask(image: &mut RgbaImage, radius: f32, intensity: f32) {
    if radius <= 0.0 || intensity == 0.0 {
        return;
    }

    let blurred = imageops::fast_blur(image, effective_sigma(image, radius));
    for (pixel, soft) in image.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let s = pixel[c] as f32;
            let b = soft[c] as f32;
            pixel[c] = (s + intensity * (s - b)).clamp(0.0, 255.0).round() as u8;
        }
    }
}

/// Darken everything further than `radius` pixels from the centre
pub fn vignette(image: &mut RgbaImage, radius: f32, intensity: f32) {
    let (width, height) = image.dimensions();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let falloff = (center_x * center_x + center_y * center_y).sqrt().max(1.0);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center_x;
        let dy = y as f32 + 0.5 - center_y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= radius {
            continue;
        }

        let t = ((distance - radius) / falloff).min(1.0);
        let smooth = t * t * (3.0 - 2.0 * t);
        let factor = (1.0 - intensity * smooth).clamp(0.0, 1.0);

        for c in 0..3 {
            pixel[c] = (pixel[c] as f32 * factor).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x * 20) as u8, (y * 20) as u8, ((x + y) * 10) as u8, 255])
        })
    }

    #[test]
    fn test_sepia_zero_is_identity() {
        let original = gradient(8, 8);
        let mut image = original.clone();
        sepia(&mut image, 0.0);
        assert_eq!(image, original);
    }

    #[test]
    fn test_sepia_full_on_white() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        sepia(&mut image, 1.0);
        let p = image.get_pixel(0, 0);
        // Red and green saturate, blue stays below
        assert_eq!(p[0], 255);
        assert_eq!(p[1], 255);
        assert!(p[2] < 255);
    }

    #[test]
    fn test_crystallize_uses_source_colours() {
        let original = gradient(12, 12);
        let mut image = original.clone();
        crystallize(&mut image, 4.0);
        for pixel in image.pixels() {
            assert!(original.pixels().any(|p| p == pixel));
        }
        assert_ne!(image, original);
    }

    #[test]
    fn test_crystallize_picks_nearest_seed() {
        let original = gradient(13, 11);
        let mut image = original.clone();
        crystallize(&mut image, 3.0);

        let seeds: Vec<(u32, u32)> = (0..4)
            .flat_map(|cy| (0..5).map(move |cx| seed_point(cx, cy, 3)))
            .collect();
        for (x, y, pixel) in image.enumerate_pixels() {
            let nearest = seeds
                .iter()
                .map(|&(sx, sy)| {
                    let dx = sx as i64 - x as i64;
                    let dy = sy as i64 - y as i64;
                    dx * dx + dy * dy
                })
                .min()
                .unwrap();
            let chosen = seeds
                .iter()
                .filter(|&&(sx, sy)| original.get_pixel(sx.min(12), sy.min(10)) == pixel)
                .any(|&(sx, sy)| {
                    let dx = sx as i64 - x as i64;
                    let dy = sy as i64 - y as i64;
                    dx * dx + dy * dy == nearest
                });
            assert!(chosen, "pixel ({}, {}) did not take its nearest seed", x, y);
        }
    }

    #[test]
    fn test_blur_cost_does_not_grow_with_radius() {
        let mut image = gradient(1280, 960);
        let started = std::time::Instant::now();
        gaussian_blur(&mut image, 200.0);
        unsharp_mask(&mut image, 200.0, 1.0);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_blur_softens_an_edge() {
        let mut image = RgbaImage::from_fn(20, 4, |x, _| {
            if x < 10 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        gaussian_blur(&mut image, 3.0);
        let left = image.get_pixel(9, 1)[0];
        let right = image.get_pixel(10, 1)[0];
        assert!(left > 0 && right < 255);
        assert!(left < right);
    }

    #[test]
    fn test_edges_flat_image_is_black() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([120, 80, 40, 255]));
        edges(&mut image, 1.0);
        for p in image.pixels() {
            assert_eq!(p.0, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_pixellate_blocks_are_uniform() {
        let mut image = gradient(8, 8);
        pixellate(&mut image, 4.0);
        let corner = *image.get_pixel(0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*image.get_pixel(x, y), corner);
            }
        }
    }

    #[test]
    fn test_pixellate_single_pixel_block_is_identity() {
        let original = gradient(5, 5);
        let mut image = original.clone();
        pixellate(&mut image, 0.4);
        assert_eq!(image, original);
    }

    #[test]
    fn test_blur_zero_radius_is_identity() {
        let original = gradient(5, 5);
        let mut image = original.clone();
        gaussian_blur(&mut image, 0.0);
        assert_eq!(image, original);
    }

    #[test]
    fn test_vignette_darkens_corners_only() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([200, 200, 200, 255]));
        vignette(&mut image, 4.0, 1.0);
        assert_eq!(image.get_pixel(10, 10)[0], 200);
        assert!(image.get_pixel(0, 0)[0] < 200);
        assert_eq!(image.get_pixel(0, 0)[3], 255);
    }
}
