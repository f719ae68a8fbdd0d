//! Star-proximity heat overlay.
//!
//! Pure distance query + additive streak drawing.  The same service runs for
//! the player and every enemy; heat is stateless, so unlike trails there is
//! nothing to buffer between frames.

use glam::{Vec2, vec2};

use crate::gfx::{Blend, Paint, Surface, with_alpha};
use crate::scene::StarView;

/// Heat extends to `HEAT_OUTER × radius` beyond the photosphere.
pub const HEAT_OUTER: f32 = 1.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heat {
    /// Direction pointing *away* from the star, radians.
    pub angle: f32,
    /// `0` at the outer boundary, `1` at the star surface (and inside).
    pub intensity: f32,
}

/// Heat at a point from the **nearest** star only; `None` outside every
/// star's outer band.
pub fn heat_at(x: f32, y: f32, stars: &[StarView]) -> Option<Heat> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let nearest = stars.iter().min_by(|a, b| {
        let da = (x - a.x).hypot(y - a.y) - a.radius;
        let db = (x - b.x).hypot(y - b.y) - b.radius;
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })?;
    let d = (x - nearest.x).hypot(y - nearest.y);
    let outer = HEAT_OUTER * nearest.radius;
    if d > outer || outer <= nearest.radius {
        return None;
    }
    Some(Heat {
        angle: (y - nearest.y).atan2(x - nearest.x),
        intensity: ((outer - d) / (outer - nearest.radius)).clamp(0.0, 1.0),
    })
}

/// Additive heat-haze streaks radiating away from the star.
///
/// Streak count, length, and opacity all grow monotonically with intensity;
/// wobble comes from `now_ms` and does not alter the count or ordering.
pub fn draw_heat(s: &mut dyn Surface, x: f32, y: f32, heat: Heat, now_ms: f64) {
    if !x.is_finite() || !y.is_finite() || heat.intensity <= 0.0 {
        return;
    }
    let k = heat.intensity.clamp(0.0, 1.0);
    let origin = vec2(x, y);
    let prev = s.blend();
    s.set_blend(Blend::Add);

    // hot core around the actor
    s.fill_circle(
        origin,
        6.0 + 5.0 * k,
        &Paint::Radial {
            center: origin,
            radius: 6.0 + 5.0 * k,
            inner: with_alpha(0xFFFF9040, 0.35 * k),
            outer: with_alpha(0xFFFF4010, 0.0),
        },
    );

    let count = 6 + (k * 8.0) as usize; // 6..=14
    let base_len = 16.0 + 46.0 * k;
    for i in 0..count {
        // fan the streaks across ~70° centered on the away direction
        let spread = (i as f32 / (count - 1).max(1) as f32 - 0.5) * 1.2;
        let wobble = ((now_ms / 90.0) as f32 + i as f32 * 1.7).sin() * 0.08;
        let a = heat.angle + spread + wobble;
        let dir = vec2(a.cos(), a.sin());
        // inner streaks run longer than the fan edges
        let len = base_len * (1.0 - 0.4 * spread.abs());
        let from = origin + dir * (4.0 + 3.0 * k);
        let to = from + dir * len;
        let n: Vec2 = dir.perp() * 0.9;
        s.fill_polygon(
            &[from + n, to + n * 0.3, to - n * 0.3, from - n],
            &Paint::Linear {
                from,
                to,
                start: with_alpha(0xFFFFB860, (0.25 + 0.45 * k).min(0.7)),
                end: with_alpha(0xFFFF6020, 0.0),
            },
        );
    }
    s.set_blend(prev);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
