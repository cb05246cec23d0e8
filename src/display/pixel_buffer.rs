// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

/// Source-over onto a pixel that may itself be translucent.
/// Straight (non-premultiplied) alpha on both sides.
#[inline]
fn paint_over(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    if a == 0 {
        return;
    }
    let da = dest[0];
    if a == 255 || da == 0 {
        write_pixel_rgba(dest, r, g, b, a);
        return;
    }
    if da == 255 {
        let alpha = a as u16;
        dest[1] = blend_channel(b, dest[1], alpha);
        dest[2] = blend_channel(g, dest[2], alpha);
        dest[3] = blend_channel(r, dest[3], alpha);
        return;
    }

    let sa = a as u32;
    let da = da as u32;
    let dst_weight = da * (255 - sa);
    let out_a = sa * 255 + dst_weight; // scaled by 255
    let mix = |s: u8, d: u8| ((s as u32 * sa * 255 + d as u32 * dst_weight) / out_a) as u8;
    dest[1] = mix(b, dest[1]);
    dest[2] = mix(g, dest[2]);
    dest[3] = mix(r, dest[3]);
    dest[0] = ((out_a + 127) / 255) as u8;
}

/// Source-atop: tint only pixels that already carry coverage, keeping their alpha.
#[inline]
fn paint_atop(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    if a == 0 || dest[0] == 0 {
        return;
    }
    let alpha = a as u16;
    dest[1] = blend_channel(b, dest[1], alpha);
    dest[2] = blend_channel(g, dest[2], alpha);
    dest[3] = blend_channel(r, dest[3], alpha);
}

/// How a filled shape combines with what is already in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Source-over, alpha aware on both sides
    Over,
    /// Only touches pixels that are already covered
    Atop,
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// Used both for the presented frame and for offscreen sprites/layers,
/// which start out fully transparent.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with custom resolution.
    /// Starts fully transparent black.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Clear to a solid opaque color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        self.clear_rgba(r, g, b, 255);
    }

    /// Clear to a solid color with custom alpha (for layers and sprites)
    /// Optimized: uses u32 fill
    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let pixel = u32::from_ne_bytes([a, b, g, r]);
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;
        for i in 0..len {
            // Safety: pixels.len() is width * height * 4, so i < len stays in
            // bounds; write_unaligned avoids assuming Vec<u8> alignment.
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set a single pixel with custom alpha (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], r, g, b, a);
        }
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Read a pixel's color channels (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        self.get_pixel_rgba(x, y).map(|(r, g, b, _)| (r, g, b))
    }

    /// Paint a pixel with the given compositing rule (bounds checked)
    #[inline]
    pub fn paint_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8, paint: Paint) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let dest = &mut self.pixels[idx..idx + 4];
            match paint {
                Paint::Over => paint_over(dest, r, g, b, a),
                Paint::Atop => paint_atop(dest, r, g, b, a),
            }
        }
    }

    /// Paint a horizontal span, endpoints inclusive and clipped
    pub fn hline_paint(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8, paint: Paint) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        for _ in start..=end {
            let dest = &mut self.pixels[idx..idx + 4];
            match paint {
                Paint::Over => paint_over(dest, r, g, b, a),
                Paint::Atop => paint_atop(dest, r, g, b, a),
            }
            idx += 4;
        }
    }

    /// Fill a disc with sub-pixel center and radius.
    /// Covers every pixel whose center lies inside the circle; a disc too small
    /// to cover any pixel center still marks the pixel it sits in.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, r: u8, g: u8, b: u8, a: u8) {
        if !(radius.is_finite() && cx.is_finite() && cy.is_finite()) || radius < 0.0 {
            return;
        }

        let mut covered = false;
        let y_start = ((cy - radius).floor() as i32).max(0);
        let y_end = ((cy + radius).ceil() as i32).min(self.height as i32 - 1);
        let r2 = radius * radius;

        for y in y_start..=y_end {
            let dy = y as f32 + 0.5 - cy;
            let reach2 = r2 - dy * dy;
            if reach2 < 0.0 {
                continue;
            }
            let reach = reach2.sqrt();
            let x1 = (cx - reach - 0.5).ceil() as i32;
            let x2 = (cx + reach - 0.5).floor() as i32;
            if x1 <= x2 {
                covered = true;
                self.hline_paint(x1, x2, y, r, g, b, a, Paint::Over);
            }
        }

        if !covered {
            self.paint_pixel(cx.floor() as i32, cy.floor() as i32, r, g, b, a, Paint::Over);
        }
    }

    /// Scanline spans (x1, x2, y) covering a polygon, clipped vertically
    fn polygon_spans(&self, vertices: &[(f32, f32)]) -> Vec<(i32, i32, i32)> {
        let mut spans = Vec::new();
        if vertices.len() < 3 || self.height == 0 {
            return spans;
        }

        // Find bounding box
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (_, y) in vertices {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }

        let min_y = (min_y as i32).max(0);
        let max_y = (max_y as i32).min(self.height as i32 - 1);

        // Preallocate intersection buffer (reused per scanline)
        let mut intersections = Vec::with_capacity(vertices.len());
        let n = vertices.len();

        for y in min_y..=max_y {
            intersections.clear();
            let yf = y as f32 + 0.5;

            for i in 0..n {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];

                // Check if edge crosses this scanline
                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    let x = x1 + (yf - y1) / (y2 - y1) * (x2 - x1);
                    intersections.push(x as i32);
                }
            }

            intersections.sort_unstable();
            for pair in intersections.chunks_exact(2) {
                spans.push((pair[0], pair[1], y));
            }
        }
        spans
    }

    /// Fill a polygon using the scanline algorithm
    pub fn fill_polygon(&mut self, vertices: &[(f32, f32)], r: u8, g: u8, b: u8, a: u8, paint: Paint) {
        for (x1, x2, y) in self.polygon_spans(vertices) {
            self.hline_paint(x1, x2, y, r, g, b, a, paint);
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Composite a source buffer onto this one using per-pixel source alpha (src-over).
    /// Skips fully transparent pixels; fast-copies fully opaque ones.
    pub fn composite(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32) {
        let src_w = src.width() as i32;
        let src_h = src.height() as i32;
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for sy in 0..src_h {
            let dy = dst_y + sy;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            for sx in 0..src_w {
                let dx = dst_x + sx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }

                let si = src.pixel_index(sx as u32, sy as u32);
                let sa = src.pixels[si]; // alpha channel (ABGR[0])
                if sa == 0 {
                    continue;
                }

                let sr = src.pixels[si + 3];
                let sg = src.pixels[si + 2];
                let sb = src.pixels[si + 1];

                let di = self.pixel_index(dx as u32, dy as u32);
                paint_over(&mut self.pixels[di..di + 4], sr, sg, sb, sa);
            }
        }
    }

    /// Draw `src` rotated by `angle` radians (clockwise on screen) with its
    /// center on (`pivot_x`, `pivot_y`), scaled by a global `opacity` in [0, 1].
    /// Nearest-neighbour sampling with incremental scanline stepping.
    pub fn draw_rotated(&mut self, src: &PixelBuffer, pivot_x: f32, pivot_y: f32, angle: f32, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || src.width == 0 || src.height == 0 {
            return;
        }

        let (sin_a, cos_a) = angle.sin_cos();
        let src_cx = src.width as f32 / 2.0;
        let src_cy = src.height as f32 / 2.0;
        let src_w = src.width as i32;
        let src_h = src.height as i32;

        // Source step per destination pixel (inverse rotation)
        let du_dx = cos_a;
        let dv_dx = -sin_a;
        let du_dy = sin_a;
        let dv_dy = cos_a;

        // Source coords at the center of destination pixel (0, 0)
        let rx = 0.5 - pivot_x;
        let ry = 0.5 - pivot_y;
        let mut u_row = rx * cos_a + ry * sin_a + src_cx;
        let mut v_row = -rx * sin_a + ry * cos_a + src_cy;

        for y in 0..self.height {
            let mut u = u_row;
            let mut v = v_row;
            let mut di = self.pixel_index(0, y);

            for _x in 0..self.width {
                let sx = u.floor() as i32;
                let sy = v.floor() as i32;
                if sx >= 0 && sx < src_w && sy >= 0 && sy < src_h {
                    let si = src.pixel_index(sx as u32, sy as u32);
                    let sa = src.pixels[si];
                    if sa != 0 {
                        let a = (sa as f32 * opacity).round() as u8;
                        let (sr, sg, sb) = (src.pixels[si + 3], src.pixels[si + 2], src.pixels[si + 1]);
                        paint_over(&mut self.pixels[di..di + 4], sr, sg, sb, a);
                    }
                }

                u += du_dx;
                v += dv_dx;
                di += 4;
            }

            u_row += du_dy;
            v_row += dv_dy;
        }
    }

    /// Number of pixels with non-zero alpha
    pub fn covered_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[0] != 0).count()
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let buffer = PixelBuffer::with_size(8, 4);
        assert_eq!(buffer.covered_pixels(), 0);
        assert_eq!(buffer.as_bytes().len(), 8 * 4 * 4);
    }

    #[test]
    fn test_clear_is_opaque() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(10, 20, 30);
        assert_eq!(buffer.get_pixel_rgba(3, 3), Some((10, 20, 30, 255)));
        assert_eq!(buffer.get_pixel(4, 0), None);
    }

    #[test]
    fn test_paint_over_transparent_keeps_source_alpha() {
        let mut buffer = PixelBuffer::with_size(2, 2);
        buffer.paint_pixel(0, 0, 0, 0, 0, 4, Paint::Over);
        assert_eq!(buffer.get_pixel_rgba(0, 0), Some((0, 0, 0, 4)));
    }

    #[test]
    fn test_paint_over_translucent_accumulates_alpha() {
        let mut buffer = PixelBuffer::with_size(1, 1);
        buffer.set_pixel_rgba(0, 0, 255, 255, 255, 128);
        buffer.paint_pixel(0, 0, 255, 255, 255, 128, Paint::Over);
        let (r, _, _, a) = buffer.get_pixel_rgba(0, 0).unwrap();
        assert_eq!(r, 255);
        assert!((190..=193).contains(&a), "alpha was {}", a);
    }

    #[test]
    fn test_paint_atop_skips_empty_pixels() {
        let mut buffer = PixelBuffer::with_size(2, 1);
        buffer.set_pixel_rgba(1, 0, 200, 200, 200, 255);
        buffer.hline_paint(0, 1, 0, 0, 0, 0, 128, Paint::Atop);
        assert_eq!(buffer.get_pixel_rgba(0, 0), Some((0, 0, 0, 0)));
        let (r, _, _, a) = buffer.get_pixel_rgba(1, 0).unwrap();
        assert_eq!(a, 255);
        assert!(r < 110 && r > 90, "red was {}", r);
    }

    #[test]
    fn test_fill_disc_area() {
        let mut buffer = PixelBuffer::with_size(64, 64);
        buffer.fill_disc(32.0, 32.0, 10.0, 255, 255, 255, 255);
        let area = buffer.covered_pixels() as f32;
        let expected = std::f32::consts::PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05);
    }

    #[test]
    fn test_tiny_disc_marks_one_pixel() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.fill_disc(3.2, 4.9, 0.1, 255, 255, 255, 200);
        assert_eq!(buffer.covered_pixels(), 1);
        assert_eq!(buffer.get_pixel_rgba(3, 4), Some((255, 255, 255, 200)));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut buffer = PixelBuffer::with_size(10, 10);
        buffer.fill_polygon(&[(0.0, 10.0), (10.0, 10.0), (5.0, 0.0)], 1, 2, 3, 255, Paint::Over);
        assert_eq!(buffer.get_pixel(5, 8), Some((1, 2, 3)));
        assert_eq!(buffer.get_pixel_rgba(0, 0), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_fill_polygon_far_offscreen_vertices() {
        let mut buffer = PixelBuffer::with_size(10, 10);
        let wedge = [(-5000.0, -1.0e7), (5.0, 2.0), (10.0, 10.0), (-5000.0, 10.0)];
        buffer.fill_polygon(&wedge, 0, 0, 0, 255, Paint::Over);
        assert!(buffer.covered_pixels() > 0);
    }

    #[test]
    fn test_draw_rotated_identity_centers_sprite() {
        let mut sprite = PixelBuffer::with_size(3, 3);
        sprite.set_pixel_rgba(1, 1, 255, 0, 0, 255);
        let mut frame = PixelBuffer::with_size(9, 9);
        frame.clear(0, 0, 0);
        frame.draw_rotated(&sprite, 4.5, 4.5, 0.0, 1.0);
        assert_eq!(frame.get_pixel(4, 4), Some((255, 0, 0)));
        assert_eq!(frame.get_pixel(3, 4), Some((0, 0, 0)));
    }

    #[test]
    fn test_draw_rotated_quarter_turn() {
        // Marker right of center ends up below center after a clockwise quarter turn
        let mut sprite = PixelBuffer::with_size(5, 5);
        sprite.set_pixel_rgba(4, 2, 0, 255, 0, 255);
        let mut frame = PixelBuffer::with_size(5, 5);
        frame.clear(0, 0, 0);
        frame.draw_rotated(&sprite, 2.5, 2.5, std::f32::consts::FRAC_PI_2, 1.0);
        assert_eq!(frame.get_pixel(2, 4), Some((0, 255, 0)));
    }

    #[test]
    fn test_draw_rotated_respects_opacity() {
        let mut sprite = PixelBuffer::with_size(1, 1);
        sprite.set_pixel_rgba(0, 0, 255, 255, 255, 255);
        let mut frame = PixelBuffer::with_size(1, 1);
        frame.clear(0, 0, 0);
        frame.draw_rotated(&sprite, 0.5, 0.5, 0.0, 0.0);
        assert_eq!(frame.get_pixel(0, 0), Some((0, 0, 0)));
        frame.draw_rotated(&sprite, 0.5, 0.5, 0.0, 0.5);
        let (r, _, _) = frame.get_pixel(0, 0).unwrap();
        assert!((126..=130).contains(&r), "red was {}", r);
    }

    #[test]
    fn test_composite_over_opaque() {
        let mut layer = PixelBuffer::with_size(2, 1);
        layer.set_pixel_rgba(0, 0, 255, 255, 255, 255);
        let mut frame = PixelBuffer::with_size(2, 1);
        frame.clear(10, 10, 10);
        frame.composite(&layer, 0, 0);
        assert_eq!(frame.get_pixel(0, 0), Some((255, 255, 255)));
        assert_eq!(frame.get_pixel(1, 0), Some((10, 10, 10)));
    }
}
