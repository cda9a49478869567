//! Separable gaussian approximation on premultiplied RGBA.
//!
//! Three successive box blurs converge on a gaussian, and each box pass is a
//! running sum, so cost is independent of sigma. Pixels outside the canvas
//! count as transparent, which lets shadows fade out at the edges.

use tiny_skia::Pixmap;

const PASSES: usize = 3;

/// Blur a pixmap in place
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    if !sigma.is_finite() || sigma <= 0.0 {
        return;
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data_mut();

    let mut src: Vec<f32> = data.iter().map(|&v| v as f32).collect();
    let mut tmp = vec![0.0f32; src.len()];

    for size in box_sizes(sigma) {
        let radius = (size - 1) / 2;
        if radius == 0 {
            continue;
        }
        horizontal_pass(&src, &mut tmp, width, height, radius);
        vertical_pass(&tmp, &mut src, width, height, radius);
    }

    for (dst, v) in data.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = v[3].round().clamp(0.0, 255.0);
        dst[3] = a as u8;
        // keep premultiplied invariant c <= a
        for c in 0..3 {
            dst[c] = v[c].round().clamp(0.0, a) as u8;
        }
    }
}

/// Box widths whose successive application approximates a gaussian of `sigma`
fn box_sizes(sigma: f32) -> [usize; PASSES] {
    let n = PASSES as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let l = lower as f32;
    let m_ideal = (12.0 * sigma * sigma - n * l * l - 4.0 * n * l - 3.0 * n) / (-4.0 * l - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    let mut sizes = [0usize; PASSES];
    for (i, size) in sizes.iter_mut().enumerate() {
        *size = if i < m { lower as usize } else { upper as usize };
    }
    sizes
}

fn horizontal_pass(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    for y in 0..height {
        let row = y * width * 4;
        for c in 0..4 {
            box_line(src, dst, row + c, 4, width, radius);
        }
    }
}

fn vertical_pass(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    let stride = width * 4;
    for x in 0..width {
        for c in 0..4 {
            box_line(src, dst, x * 4 + c, stride, height, radius);
        }
    }
}

/// Running-sum box filter over one strided line, zero outside `0..len`
fn box_line(src: &[f32], dst: &mut [f32], start: usize, stride: usize, len: usize, radius: usize) {
    let scale = 1.0 / (2 * radius + 1) as f32;
    let at = |i: usize| start + i * stride;

    let mut acc: f32 = (0..=radius.min(len - 1)).map(|i| src[at(i)]).sum();
    for i in 0..len {
        dst[at(i)] = acc * scale;
        if i + radius + 1 < len {
            acc += src[at(i + radius + 1)];
        }
        if i >= radius {
            acc -= src[at(i - radius)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut pixmap = Pixmap::new(3, 3).unwrap();
        pixmap.fill(Color::from_rgba8(10, 20, 30, 255));
        let before = pixmap.data().to_vec();
        gaussian_blur(&mut pixmap, 0.0);
        assert_eq!(pixmap.data(), &before[..]);
    }

    #[test]
    fn test_box_sizes_are_odd() {
        for sigma in [0.5f32, 1.5, 4.0, 9.0, 16.0, 28.0, 44.0] {
            for size in box_sizes(sigma) {
                assert_eq!(size % 2, 1, "sigma {sigma} produced even box {size}");
            }
        }
    }

    #[test]
    fn test_blur_preserves_energy() {
        let (w, h) = (41u32, 41u32);
        let mut pixmap = Pixmap::new(w, h).unwrap();
        let center = ((20 * w + 20) * 4) as usize;
        pixmap.data_mut()[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        gaussian_blur(&mut pixmap, 2.0);

        let nonzero = pixmap.data().chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);
        // rounding each tap to u8 loses a little energy
        let sum: u32 = pixmap.data().chunks_exact(4).map(|px| px[3] as u32).sum();
        assert!(sum <= 255 + 8);
    }

    #[test]
    fn test_edges_fade_to_transparent() {
        let mut pixmap = Pixmap::new(30, 30).unwrap();
        pixmap.fill(Color::from_rgba8(0, 0, 0, 255));
        gaussian_blur(&mut pixmap, 4.0);

        let corner = pixmap.pixel(0, 0).unwrap().alpha();
        let middle = pixmap.pixel(15, 15).unwrap().alpha();
        assert!(corner < middle);
        assert!(middle > 250);
    }

    #[test]
    fn test_premultiplied_invariant_holds() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        pixmap.fill(Color::from_rgba8(255, 128, 0, 200));
        gaussian_blur(&mut pixmap, 5.0);
        for px in pixmap.data().chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }
}
