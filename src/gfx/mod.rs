//! Drawing-surface abstraction.
//!
//! *The compositor never touches a pixel buffer directly.*  It draws through
//! the [`Surface`] trait — affine transform, blend mode, a small set of path
//! primitives, gradient paints, sprite blits, and clip regions — and any 2D
//! raster backend can sit underneath.  The crate ships one: the software
//! rasterizer in [`raster`], which fills a `Vec<u32>` scratch and loans it to
//! a presenter closure at end of frame.
//!
//! Coordinates passed to a surface are **world-space**; the current affine
//! maps them to device pixels.  Composers that want screen-anchored drawing
//! set the identity transform explicitly.

use glam::{Affine2, Vec2};

pub mod raster;

pub use raster::RasterSurface;

/// Packed pixel/color, `0xAARRGGBB` (the software framebuffer format).
pub type Rgba = u32;

/// Build an opaque color.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Build a color with explicit alpha.
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Replace the alpha channel, `a` clamped to `0..=1`.
#[inline]
pub fn with_alpha(c: Rgba, a: f32) -> Rgba {
    let a = (a.clamp(0.0, 1.0) * 255.0) as u32;
    (c & 0x00FF_FFFF) | (a << 24)
}

/// Multiply the existing alpha channel by `f` (clamped to `0..=1`).
#[inline]
pub fn mul_alpha(c: Rgba, f: f32) -> Rgba {
    let a = ((c >> 24) as f32 * f.clamp(0.0, 1.0)) as u32;
    (c & 0x00FF_FFFF) | (a.min(255) << 24)
}

/// Per-channel linear interpolation (alpha included), `t` clamped.
#[inline]
pub fn lerp(c0: Rgba, c1: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let a = ((c0 >> shift) & 0xFF) as f32;
        let b = ((c1 >> shift) & 0xFF) as f32;
        ((a + (b - a) * t) as u32) << shift
    };
    ch(24) | ch(16) | ch(8) | ch(0)
}

/// Source-over blend of `src` onto `dst` using `src`'s alpha.
#[inline]
pub fn over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = (src >> 24) & 0xFF;
    match sa {
        0 => dst,
        255 => src | 0xFF00_0000,
        _ => {
            let ia = 255 - sa;
            let ch = |shift: u32| {
                let s = (src >> shift) & 0xFF;
                let d = (dst >> shift) & 0xFF;
                ((s * sa + d * ia) / 255) << shift
            };
            0xFF00_0000 | ch(16) | ch(8) | ch(0)
        }
    }
}

/// Additive blend: `dst + src·alpha`, saturating per channel.  Overlapping
/// stamps brighten instead of occluding — trails, flares, room light.
#[inline]
pub fn add(dst: Rgba, src: Rgba) -> Rgba {
    let sa = (src >> 24) & 0xFF;
    if sa == 0 {
        return dst;
    }
    let ch = |shift: u32| {
        let s = ((src >> shift) & 0xFF) * sa / 255;
        let d = (dst >> shift) & 0xFF;
        (s + d).min(255) << shift
    };
    0xFF00_0000 | ch(16) | ch(8) | ch(0)
}

/// How fragments combine with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Blend {
    /// Ordinary source-over using the paint's alpha.
    #[default]
    Alpha,
    /// Saturating additive; used by every "glow" overlay.
    Add,
}

/// Fill/stroke paint.  Gradient geometry is world-space, like everything
/// else handed to a surface.
#[derive(Clone, Copy, Debug)]
pub enum Paint {
    Solid(Rgba),
    /// Two-stop linear gradient along `from → to`.
    Linear {
        from: Vec2,
        to: Vec2,
        start: Rgba,
        end: Rgba,
    },
    /// Two-stop radial gradient, `inner` at the center, `outer` at `radius`.
    Radial {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

impl Paint {
    #[inline]
    pub const fn solid(c: Rgba) -> Paint {
        Paint::Solid(c)
    }
}

/// CPU-side RGBA bitmap as decoded from an asset; what [`Surface::blit`]
/// consumes.  Pixels are packed [`Rgba`], row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Single-color bitmap, handy for tests and placeholder fills.
    pub fn solid(w: usize, h: usize, color: Rgba) -> Bitmap {
        Bitmap {
            w,
            h,
            pixels: vec![color; w * h],
        }
    }
}

/// An immediate-mode 2D target for one frame of composition.
///
/// Implementations own whatever scratch they need; `clear` starts a frame
/// and the backend-specific presentation (e.g. [`RasterSurface::present`])
/// ends it.  No call here may panic on out-of-range geometry — everything
/// clips.
pub trait Surface {
    /// Device-pixel extent of the target.
    fn size(&self) -> (usize, usize);

    /// Replace the current world→device transform.
    fn set_transform(&mut self, t: Affine2);
    fn transform(&self) -> Affine2;

    fn set_blend(&mut self, blend: Blend);
    fn blend(&self) -> Blend;

    /// Fill the whole target, ignoring transform, blend and clips.
    fn clear(&mut self, color: Rgba);

    /*──────────────── filled primitives ────────────────*/

    /// Axis-aligned (in world space) rectangle.
    fn fill_rect(&mut self, min: Vec2, max: Vec2, paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    /// Axis-aligned ellipse.
    fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, paint: &Paint);
    /// Simple (non-self-intersecting) polygon, even-odd filled.
    fn fill_polygon(&mut self, pts: &[Vec2], paint: &Paint);

    /*──────────────── stroked primitives ───────────────*/

    /// Line segment with world-space width.
    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba);
    fn stroke_polyline(&mut self, pts: &[Vec2], width: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    /*──────────────── images ───────────────────────────*/

    /// Blit `src` (a pixel rect of `bmp`, `None` = whole bitmap) centered on
    /// `center`, covering `half` world half-extents, rotated by `rotation`
    /// radians, with an extra alpha multiplier.
    fn blit(
        &mut self,
        bmp: &Bitmap,
        src: Option<(usize, usize, usize, usize)>,
        center: Vec2,
        half: Vec2,
        rotation: f32,
        alpha: f32,
    );

    /*──────────────── clipping ─────────────────────────*/

    /// Clip subsequent drawing to a world-space rectangle (intersected with
    /// any active clips).
    fn push_clip_rect(&mut self, min: Vec2, max: Vec2);
    /// Clip subsequent drawing to a world-space disc.
    fn push_clip_circle(&mut self, center: Vec2, radius: f32);
    fn pop_clip(&mut self);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
