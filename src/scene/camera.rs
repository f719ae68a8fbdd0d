use glam::{Affine2, Vec2, vec2};

/// Viewport extent in **logical** pixels.
///
/// Device pixels = logical pixels × pixel density; the density multiplier is
/// applied only when the view transform is built, never stored in the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSize {
    pub w: f32,
    pub h: f32,
}

impl ViewSize {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// World-space focal point and scale, owned by the simulation.
///
/// The compositor only ever reads it: one `Camera` value describes one frame.
/// `zoom` is pixels-per-world-unit at density 1, so bigger zoom = closer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Camera {
    pub const fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self { x, y, zoom }
    }

    /// World → device-pixel affine for this camera.
    ///
    /// A world point `(x, y)` lands on the device pixel
    /// `(density·zoom·x + tx, density·zoom·y + ty)` with the focal point
    /// centered in the viewport:
    ///
    /// ```text
    /// a = d = density · zoom          b = c = 0
    /// tx = density · (w/2 − x·zoom)   ty = density · (h/2 − y·zoom)
    /// ```
    pub fn view_transform(&self, view: ViewSize, density: f32) -> Affine2 {
        let s = density * self.zoom;
        let tx = density * (view.w * 0.5 - self.x * self.zoom);
        let ty = density * (view.h * 0.5 - self.y * self.zoom);
        Affine2::from_cols(vec2(s, 0.0), vec2(0.0, s), vec2(tx, ty))
    }

    /// Camera for a background parallax layer.
    ///
    /// The position (not the zoom) is pre-multiplied by `p ∈ (0, 1)`: the
    /// smaller `p`, the closer the layer's apparent camera sits to the origin
    /// and the slower the layer scrolls — depth without separate geometry.
    pub fn with_parallax(&self, p: f32) -> Camera {
        Camera {
            x: self.x * p,
            y: self.y * p,
            zoom: self.zoom,
        }
    }

    /// World-space rectangle covered by the viewport, as `(min, max)`.
    /// Used for culling and for sizing decoration bands.
    pub fn visible_bounds(&self, view: ViewSize) -> (Vec2, Vec2) {
        let half_w = view.w * 0.5 / self.zoom;
        let half_h = view.h * 0.5 / self.zoom;
        (
            vec2(self.x - half_w, self.y - half_h),
            vec2(self.x + half_w, self.y + half_h),
        )
    }

    /// True if a disc of `radius` around `(x, y)` touches the viewport.
    pub fn sees(&self, view: ViewSize, x: f32, y: f32, radius: f32) -> bool {
        let (min, max) = self.visible_bounds(view);
        x + radius >= min.x && x - radius <= max.x && y + radius >= min.y && y - radius <= max.y
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_transform_components() {
        // camera {10,20,×2}, 800×600 viewport, density 1.5
        let t = Camera::new(10.0, 20.0, 2.0).view_transform(ViewSize::new(800.0, 600.0), 1.5);
        assert!((t.matrix2.x_axis.x - 3.0).abs() < 1e-6); // a
        assert!((t.matrix2.x_axis.y - 0.0).abs() < 1e-6); // b
        assert!((t.matrix2.y_axis.x - 0.0).abs() < 1e-6); // c
        assert!((t.matrix2.y_axis.y - 3.0).abs() < 1e-6); // d
        assert!((t.translation.x - 570.0).abs() < 1e-4); // 1.5·(400 − 20)
        assert!((t.translation.y - 390.0).abs() < 1e-4); // 1.5·(300 − 40)
    }

    #[test]
    fn focal_point_lands_on_viewport_center() {
        let cam = Camera::new(-35.0, 12.5, 1.7);
        let t = cam.view_transform(ViewSize::new(1024.0, 768.0), 2.0);
        let p = t.transform_point2(vec2(cam.x, cam.y));
        assert!((p.x - 1024.0).abs() < 1e-3);
        assert!((p.y - 768.0).abs() < 1e-3);
    }

    #[test]
    fn parallax_scales_position_not_zoom() {
        let cam = Camera::new(100.0, -40.0, 3.0);
        let layer = cam.with_parallax(0.4);
        assert!((layer.x - 40.0).abs() < 1e-6);
        assert!((layer.y + 16.0).abs() < 1e-6);
        assert!((layer.zoom - 3.0).abs() < 1e-6);
    }

    #[test]
    fn visible_bounds_shrink_when_zooming_in() {
        let view = ViewSize::new(800.0, 600.0);
        let wide = Camera::new(0.0, 0.0, 1.0).visible_bounds(view);
        let tight = Camera::new(0.0, 0.0, 2.0).visible_bounds(view);
        assert!((wide.1.x - wide.0.x) > (tight.1.x - tight.0.x));
        assert!(Camera::new(0.0, 0.0, 1.0).sees(view, 0.0, 0.0, 1.0));
        assert!(!Camera::new(0.0, 0.0, 1.0).sees(view, 1000.0, 0.0, 10.0));
    }
}
