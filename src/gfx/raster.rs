//! Software raster backend.
//!
//! Fills a `Vec<u32>` scratch in **0xAARRGGBB** and loans the finished
//! buffer to a presenter closure (`window.update_with_buffer`, PNG encoder,
//! a test probe).  Pure CPU scanline work: span fills for discs and
//! polygons, Bresenham for hairlines, inverse-mapped sampling for rotated
//! sprite blits.
//!
//! The world→device transforms this crate builds are uniform scale +
//! translation (no shear, no rotation), and the circle/ellipse/rect fast
//! paths rely on that.  Polygons and blits transform every point and stay
//! correct under any affine.

use glam::{Affine2, Vec2, vec2};
use smallvec::SmallVec;

use crate::gfx::{Bitmap, Blend, Paint, Rgba, Surface, add, lerp, mul_alpha, over};

/// Device-space clip entry; drawing must pass **every** active clip.
#[derive(Clone, Copy, Debug)]
enum Clip {
    Rect { x0: f32, y0: f32, x1: f32, y1: f32 },
    Circle { cx: f32, cy: f32, r2: f32 },
}

impl Clip {
    #[inline]
    fn admits(&self, x: f32, y: f32) -> bool {
        match *self {
            Clip::Rect { x0, y0, x1, y1 } => x >= x0 && x <= x1 && y >= y0 && y <= y1,
            Clip::Circle { cx, cy, r2 } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= r2
            }
        }
    }
}

/// Paint with its geometry pre-transformed to device space, so the per-pixel
/// evaluation needs no matrix work.
#[derive(Clone, Copy)]
enum DevPaint {
    Solid(Rgba),
    Linear {
        p0: Vec2,
        /// Gradient axis divided by its squared length.
        axis_over_len2: Vec2,
        start: Rgba,
        end: Rgba,
    },
    Radial {
        center: Vec2,
        inv_radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

impl DevPaint {
    #[inline]
    fn eval(&self, x: f32, y: f32) -> Rgba {
        match *self {
            DevPaint::Solid(c) => c,
            DevPaint::Linear {
                p0,
                axis_over_len2,
                start,
                end,
            } => {
                let d = vec2(x, y) - p0;
                lerp(start, end, d.dot(axis_over_len2))
            }
            DevPaint::Radial {
                center,
                inv_radius,
                inner,
                outer,
            } => {
                let d = (vec2(x, y) - center).length() * inv_radius;
                lerp(inner, outer, d)
            }
        }
    }
}

/// CPU rasterizer over an owned scratch buffer.
pub struct RasterSurface {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    t: Affine2,
    blend: Blend,
    clips: Vec<Clip>,
    /// Scanline intersection scratch for polygon fills.
    xs: Vec<f32>,
}

impl RasterSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            scratch: vec![0; width * height],
            width,
            height,
            t: Affine2::IDENTITY,
            blend: Blend::Alpha,
            clips: Vec::new(),
            xs: Vec::new(),
        }
    }

    /// (Re)allocate for a new viewport; keeps the buffer when unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.scratch.resize(width * height, 0);
        }
    }

    /// Loan the finished buffer to `submit` exactly once.
    pub fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }

    /// Raw frame view, primarily for tests and encoders.
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    /*──────────────────────── internals ────────────────────────*/

    /// Uniform world→device scale of the current transform.
    #[inline]
    fn scale(&self) -> f32 {
        self.t.matrix2.x_axis.x
    }

    #[inline]
    fn clipped_out(&self, x: f32, y: f32) -> bool {
        !self.clips.is_empty() && self.clips.iter().any(|c| !c.admits(x, y))
    }

    /// Blend one fragment; bounds- and clip-checked.
    #[inline]
    fn put(&mut self, x: i32, y: i32, src: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        if self.clipped_out(x as f32 + 0.5, y as f32 + 0.5) {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let dst = self.scratch[idx];
        self.scratch[idx] = match self.blend {
            Blend::Alpha => over(dst, src),
            Blend::Add => add(dst, src),
        };
    }

    /// Horizontal run of paint at row `y`, device-x in `x0..=x1`.
    fn span(&mut self, y: i32, x0: f32, x1: f32, paint: &DevPaint) {
        if y < 0 || y >= self.height as i32 || x1 < x0 {
            return;
        }
        let xa = (x0.floor().max(0.0)) as i32;
        let xb = (x1.ceil().min(self.width as f32 - 1.0)) as i32;
        let yc = y as f32 + 0.5;
        for x in xa..=xb {
            let xc = x as f32 + 0.5;
            if xc < x0 || xc > x1 {
                continue;
            }
            self.put(x, y, paint.eval(xc, yc));
        }
    }

    /// Pre-transform a paint's geometry to device space.
    fn dev_paint(&self, paint: &Paint) -> DevPaint {
        match *paint {
            Paint::Solid(c) => DevPaint::Solid(c),
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => {
                let p0 = self.t.transform_point2(from);
                let axis = self.t.transform_point2(to) - p0;
                let len2 = axis.length_squared().max(1e-12);
                DevPaint::Linear {
                    p0,
                    axis_over_len2: axis / len2,
                    start,
                    end,
                }
            }
            Paint::Radial {
                center,
                radius,
                inner,
                outer,
            } => DevPaint::Radial {
                center: self.t.transform_point2(center),
                inv_radius: 1.0 / (radius * self.scale()).max(1e-6),
                inner,
                outer,
            },
        }
    }

    /// Scanline fill of an axis-aligned device-space ellipse.
    fn fill_dev_ellipse(&mut self, c: Vec2, rx: f32, ry: f32, paint: &DevPaint) {
        if rx <= 0.0 || ry <= 0.0 || !c.is_finite() {
            return;
        }
        let y0 = ((c.y - ry).floor().max(0.0)) as i32;
        let y1 = ((c.y + ry).ceil().min(self.height as f32 - 1.0)) as i32;
        for y in y0..=y1 {
            let dy = (y as f32 + 0.5 - c.y) / ry;
            let t = 1.0 - dy * dy;
            if t <= 0.0 {
                continue;
            }
            let half = rx * t.sqrt();
            self.span(y, c.x - half, c.x + half, paint);
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_transform(&mut self, t: Affine2) {
        self.t = t;
    }

    fn transform(&self) -> Affine2 {
        self.t
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn blend(&self) -> Blend {
        self.blend
    }

    fn clear(&mut self, color: Rgba) {
        self.scratch.fill(color);
    }

    fn fill_rect(&mut self, min: Vec2, max: Vec2, paint: &Paint) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let a = self.t.transform_point2(min);
        let b = self.t.transform_point2(max);
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        let dev = self.dev_paint(paint);
        let ya = (y0.floor().max(0.0)) as i32;
        let yb = (y1.ceil().min(self.height as f32 - 1.0)) as i32;
        for y in ya..=yb {
            let yc = y as f32 + 0.5;
            if yc < y0 || yc > y1 {
                continue;
            }
            self.span(y, x0, x1, &dev);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        let c = self.t.transform_point2(center);
        let r = radius * self.scale();
        let dev = self.dev_paint(paint);
        self.fill_dev_ellipse(c, r, r, &dev);
    }

    fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, paint: &Paint) {
        if !center.is_finite() {
            return;
        }
        let c = self.t.transform_point2(center);
        let s = self.scale();
        let dev = self.dev_paint(paint);
        self.fill_dev_ellipse(c, rx * s, ry * s, &dev);
    }

    fn fill_polygon(&mut self, pts: &[Vec2], paint: &Paint) {
        if pts.len() < 3 || pts.iter().any(|p| !p.is_finite()) {
            return;
        }
        let dev: SmallVec<[Vec2; 16]> =
            pts.iter().map(|&p| self.t.transform_point2(p)).collect();
        let paint = self.dev_paint(paint);

        let mut y_min = f32::MAX;
        let mut y_max = f32::MIN;
        for p in &dev {
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        let ya = (y_min.floor().max(0.0)) as i32;
        let yb = (y_max.ceil().min(self.height as f32 - 1.0)) as i32;

        let mut xs = std::mem::take(&mut self.xs);
        for y in ya..=yb {
            let yc = y as f32 + 0.5;
            xs.clear();
            for i in 0..dev.len() {
                let p0 = dev[i];
                let p1 = dev[(i + 1) % dev.len()];
                // half-open rule so shared vertices count once
                if (p0.y <= yc && p1.y > yc) || (p1.y <= yc && p0.y > yc) {
                    xs.push(p0.x + (yc - p0.y) * (p1.x - p0.x) / (p1.y - p0.y));
                }
            }
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for pair in xs.chunks_exact(2) {
                self.span(y, pair[0], pair[1], &paint);
            }
        }
        self.xs = xs;
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let dev_w = width * self.scale();
        if dev_w <= 1.5 {
            // hairline: Bresenham straight into the scratch
            let pa = self.t.transform_point2(a);
            let pb = self.t.transform_point2(b);
            let mut x0 = pa.x.round() as i32;
            let mut y0 = pa.y.round() as i32;
            let x1 = pb.x.round() as i32;
            let y1 = pb.y.round() as i32;
            let dx = (x1 - x0).abs();
            let sx = if x0 < x1 { 1 } else { -1 };
            let dy = -(y1 - y0).abs();
            let sy = if y0 < y1 { 1 } else { -1 };
            let mut err = dx + dy;
            loop {
                self.put(x0, y0, color);
                if x0 == x1 && y0 == y1 {
                    break;
                }
                let e2 = 2 * err;
                if e2 >= dy {
                    err += dy;
                    x0 += sx;
                }
                if e2 <= dx {
                    err += dx;
                    y0 += sy;
                }
            }
            return;
        }
        // wide line: filled quad
        let dir = b - a;
        if dir.length_squared() < 1e-12 {
            self.fill_circle(a, width * 0.5, &Paint::Solid(color));
            return;
        }
        let n = dir.perp().normalize() * (width * 0.5);
        self.fill_polygon(&[a + n, b + n, b - n, a - n], &Paint::Solid(color));
    }

    fn stroke_polyline(&mut self, pts: &[Vec2], width: f32, color: Rgba) {
        for seg in pts.windows(2) {
            self.stroke_line(seg[0], seg[1], width, color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        if !center.is_finite() || radius <= 0.0 {
            return;
        }
        let c = self.t.transform_point2(center);
        let s = self.scale();
        let r_out = radius * s + width * s * 0.5;
        let r_in = (radius * s - width * s * 0.5).max(0.0);
        let dev = DevPaint::Solid(color);
        let y0 = ((c.y - r_out).floor().max(0.0)) as i32;
        let y1 = ((c.y + r_out).ceil().min(self.height as f32 - 1.0)) as i32;
        let r_out2 = r_out * r_out;
        let r_in2 = r_in * r_in;
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - c.y;
            let t_out = r_out2 - dy * dy;
            if t_out <= 0.0 {
                continue;
            }
            let wo = t_out.sqrt();
            let t_in = r_in2 - dy * dy;
            if t_in <= 0.0 {
                self.span(y, c.x - wo, c.x + wo, &dev);
            } else {
                let wi = t_in.sqrt();
                self.span(y, c.x - wo, c.x - wi, &dev);
                self.span(y, c.x + wi, c.x + wo, &dev);
            }
        }
    }

    fn blit(
        &mut self,
        bmp: &Bitmap,
        src: Option<(usize, usize, usize, usize)>,
        center: Vec2,
        half: Vec2,
        rotation: f32,
        alpha: f32,
    ) {
        if bmp.w == 0 || bmp.h == 0 || !center.is_finite() || half.x <= 0.0 || half.y <= 0.0 {
            return;
        }
        let (sx, sy, sw, sh) = src.unwrap_or((0, 0, bmp.w, bmp.h));
        if sw == 0 || sh == 0 || sx + sw > bmp.w || sy + sh > bmp.h {
            return;
        }

        let c = self.t.transform_point2(center);
        let s = self.scale();
        let hx = half.x * s;
        let hy = half.y * s;
        // device bbox of the rotated quad
        let (rs, rc) = rotation.sin_cos();
        let ex = hx * rc.abs() + hy * rs.abs();
        let ey = hx * rs.abs() + hy * rc.abs();

        let x0 = ((c.x - ex).floor().max(0.0)) as i32;
        let x1 = ((c.x + ex).ceil().min(self.width as f32 - 1.0)) as i32;
        let y0 = ((c.y - ey).floor().max(0.0)) as i32;
        let y1 = ((c.y + ey).ceil().min(self.height as f32 - 1.0)) as i32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = vec2(x as f32 + 0.5, y as f32 + 0.5) - c;
                // rotate back into sprite-local space
                let lx = d.x * rc + d.y * rs;
                let ly = -d.x * rs + d.y * rc;
                let u = (lx / (2.0 * hx) + 0.5) * sw as f32;
                let v = (ly / (2.0 * hy) + 0.5) * sh as f32;
                if u < 0.0 || v < 0.0 {
                    continue;
                }
                let (ui, vi) = (u as usize, v as usize);
                if ui >= sw || vi >= sh {
                    continue;
                }
                let texel = bmp.pixels[(sy + vi) * bmp.w + (sx + ui)];
                if texel >> 24 == 0 {
                    continue;
                }
                self.put(x, y, mul_alpha(texel, alpha));
            }
        }
    }

    fn push_clip_rect(&mut self, min: Vec2, max: Vec2) {
        let a = self.t.transform_point2(min);
        let b = self.t.transform_point2(max);
        self.clips.push(Clip::Rect {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        });
    }

    fn push_clip_circle(&mut self, center: Vec2, radius: f32) {
        let c = self.t.transform_point2(center);
        let r = radius * self.scale();
        self.clips.push(Clip::Circle {
            cx: c.x,
            cy: c.y,
            r2: r * r,
        });
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rgb;

    fn solid(c: Rgba) -> Paint {
        Paint::Solid(c)
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut s = RasterSurface::new(4, 3);
        s.clear(rgb(1, 2, 3));
        assert!(s.frame().iter().all(|&p| p == rgb(1, 2, 3)));
    }

    #[test]
    fn rect_fill_respects_transform() {
        let mut s = RasterSurface::new(16, 16);
        s.clear(0xFF00_0000);
        // world unit = 2 device px, origin at device (8, 8)
        s.set_transform(Affine2::from_cols(
            vec2(2.0, 0.0),
            vec2(0.0, 2.0),
            vec2(8.0, 8.0),
        ));
        s.fill_rect(vec2(0.0, 0.0), vec2(2.0, 2.0), &solid(rgb(9, 9, 9)));
        assert_eq!(s.pixel(9, 9), rgb(9, 9, 9));
        assert_eq!(s.pixel(11, 11), rgb(9, 9, 9));
        assert_eq!(s.pixel(7, 7), 0xFF00_0000);
        assert_eq!(s.pixel(13, 13), 0xFF00_0000);
    }

    #[test]
    fn circle_fill_center_and_outside() {
        let mut s = RasterSurface::new(32, 32);
        s.clear(0xFF00_0000);
        s.fill_circle(vec2(16.0, 16.0), 6.0, &solid(rgb(50, 60, 70)));
        assert_eq!(s.pixel(16, 16), rgb(50, 60, 70));
        assert_eq!(s.pixel(16, 25), 0xFF00_0000); // 9 px away
        assert_eq!(s.pixel(31, 31), 0xFF00_0000);
    }

    #[test]
    fn polygon_fill_triangle() {
        let mut s = RasterSurface::new(20, 20);
        s.clear(0xFF00_0000);
        s.fill_polygon(
            &[vec2(2.0, 2.0), vec2(18.0, 2.0), vec2(2.0, 18.0)],
            &solid(rgb(100, 0, 0)),
        );
        assert_eq!(s.pixel(4, 4), rgb(100, 0, 0));
        // far corner stays untouched
        assert_eq!(s.pixel(17, 17), 0xFF00_0000);
    }

    #[test]
    fn hairline_reaches_both_endpoints() {
        let mut s = RasterSurface::new(10, 10);
        s.clear(0xFF00_0000);
        s.stroke_line(vec2(1.0, 1.0), vec2(8.0, 6.0), 1.0, rgb(255, 255, 255));
        assert_eq!(s.pixel(1, 1), rgb(255, 255, 255));
        assert_eq!(s.pixel(8, 6), rgb(255, 255, 255));
    }

    #[test]
    fn circle_clip_masks_fill() {
        let mut s = RasterSurface::new(20, 20);
        s.clear(0xFF00_0000);
        s.push_clip_circle(vec2(10.0, 10.0), 4.0);
        s.fill_rect(vec2(0.0, 0.0), vec2(20.0, 20.0), &solid(rgb(1, 1, 1)));
        s.pop_clip();
        assert_eq!(s.pixel(10, 10), rgb(1, 1, 1));
        assert_eq!(s.pixel(1, 1), 0xFF00_0000);
        // after pop, drawing is unrestricted again
        s.fill_rect(vec2(0.0, 0.0), vec2(2.0, 2.0), &solid(rgb(2, 2, 2)));
        assert_eq!(s.pixel(1, 1), rgb(2, 2, 2));
    }

    #[test]
    fn additive_blend_brightens_overlaps() {
        let mut s = RasterSurface::new(8, 8);
        s.clear(rgb(0, 0, 0));
        s.set_blend(Blend::Add);
        let p = solid(crate::gfx::rgba(100, 100, 100, 255));
        s.fill_rect(vec2(0.0, 0.0), vec2(8.0, 8.0), &p);
        s.fill_rect(vec2(0.0, 0.0), vec2(8.0, 8.0), &p);
        let px = s.pixel(4, 4);
        assert_eq!((px >> 16) & 0xFF, 200);
    }

    #[test]
    fn blit_skips_transparent_texels() {
        let mut s = RasterSurface::new(12, 12);
        s.clear(rgb(0, 0, 0));
        let mut bmp = Bitmap::solid(2, 2, rgb(10, 20, 30));
        bmp.pixels[0] = 0; // fully transparent texel
        s.blit(&bmp, None, vec2(6.0, 6.0), vec2(2.0, 2.0), 0.0, 1.0);
        // opaque texel landed
        assert_eq!(s.pixel(7, 7), rgb(10, 20, 30));
        // transparent texel left the backdrop alone
        assert_eq!(s.pixel(5, 5), rgb(0, 0, 0));
    }

    #[test]
    fn nan_geometry_degrades_to_noop() {
        let mut s = RasterSurface::new(8, 8);
        s.clear(rgb(3, 3, 3));
        s.fill_circle(vec2(f32::NAN, 1.0), 4.0, &solid(rgb(9, 9, 9)));
        s.fill_polygon(
            &[vec2(0.0, 0.0), vec2(f32::NAN, 1.0), vec2(2.0, 2.0)],
            &solid(rgb(9, 9, 9)),
        );
        assert!(s.frame().iter().all(|&p| p == rgb(3, 3, 3)));
    }

    #[test]
    fn radial_gradient_darkens_outward() {
        let mut s = RasterSurface::new(32, 32);
        s.clear(rgb(0, 0, 0));
        s.fill_circle(
            vec2(16.0, 16.0),
            12.0,
            &Paint::Radial {
                center: vec2(16.0, 16.0),
                radius: 12.0,
                inner: rgb(255, 255, 255),
                outer: rgb(0, 0, 0),
            },
        );
        let mid = (s.pixel(16, 16) >> 16) & 0xFF;
        let edge = (s.pixel(26, 16) >> 16) & 0xFF;
        assert!(mid > edge, "center {mid} should outshine edge {edge}");
    }
}
