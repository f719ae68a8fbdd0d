//! Motion trails and self-expiring burn flares.
//!
//! A trail is a bounded FIFO of timestamped emission samples: the emitter
//! "stamps" its position while thrusting, and the renderer replays recent
//! stamps with a quadratic fade and a backward drift, so exhaust appears to
//! keep traveling after it was emitted.  All timing comes from the per-frame
//! `now_ms` the compositor injects; nothing in here reads a clock.

use std::collections::{HashMap, VecDeque};

use glam::vec2;

use crate::gfx::{Blend, Paint, Rgba, Surface, with_alpha};

/// Hard cap per trail; insertion beyond it drops the oldest stamp.
pub const TRAIL_CAP: usize = 40;
/// Stamps older than this are pruned and never drawn.
pub const TRAIL_LIFE_MS: f64 = 180.0;
/// Thrusters only stamp near full power; low-power flicker reads as stutter.
pub const THRUST_EMIT: f32 = 0.92;
/// Scale-smoothing time constant (boost toggles must not pop).
pub const SMOOTH_TAU_S: f32 = 0.12;

/// One exhaust/projectile stamp.
#[derive(Clone, Copy, Debug)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    /// Emission heading at stamp time, radians.
    pub angle: f32,
    pub t_ms: f64,
    /// Emitter power at stamp time, `0..=1` (boost may exceed 1).
    pub power: f32,
    /// Visual scale of the emitter at stamp time.
    pub scale: f32,
}

/// How fast a stamp drifts along its emission heading, world units/s.
#[inline]
pub fn drift_speed(power: f32) -> f32 {
    55.0 + 85.0 * power.clamp(0.0, 1.5)
}

/// Bounded, age-pruned stamp buffer.  Points are time-ordered by insertion.
#[derive(Debug, Default)]
pub struct Trail {
    pts: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn record(&mut self, p: TrailPoint) {
        if self.pts.len() == TRAIL_CAP {
            self.pts.pop_front();
        }
        self.pts.push_back(p);
    }

    /// Drop expired stamps from the head.
    pub fn prune(&mut self, now_ms: f64) {
        while self
            .pts
            .front()
            .is_some_and(|p| now_ms - p.t_ms > TRAIL_LIFE_MS)
        {
            self.pts.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Newest → oldest.
    pub fn iter_recent(&self) -> impl Iterator<Item = &TrailPoint> {
        self.pts.iter().rev()
    }
}

/// Additively stamp a trail onto `s`.  `base_radius` is the world radius of
/// a fresh full-power stamp.
pub fn draw_trail(s: &mut dyn Surface, trail: &Trail, now_ms: f64, color: Rgba, base_radius: f32) {
    if trail.is_empty() {
        return;
    }
    let prev = s.blend();
    s.set_blend(Blend::Add);
    for p in trail.iter_recent() {
        let age = ((now_ms - p.t_ms) / TRAIL_LIFE_MS) as f32;
        if !(0.0..1.0).contains(&age) {
            continue;
        }
        // quadratic fade: steeper than linear, trails vanish instead of linger
        let alpha = (1.0 - age) * (1.0 - age);
        let age_s = age * (TRAIL_LIFE_MS as f32 / 1000.0);
        // the stored angle is the emission heading (opposite the emitter's
        // travel), so older stamps slide further behind the emitter
        let dir = vec2(p.angle.cos(), p.angle.sin());
        let pos = vec2(p.x, p.y) + dir * drift_speed(p.power) * age_s;
        let r = base_radius * p.scale * (1.0 - 0.45 * age);
        s.fill_circle(pos, r.max(0.3), &Paint::Solid(with_alpha(color, alpha * 0.85)));
    }
    s.set_blend(prev);
}

/// One independent trail per entity identity.
#[derive(Debug, Default)]
pub struct TrailMap {
    map: HashMap<u64, Trail>,
}

impl TrailMap {
    pub fn entry(&mut self, id: u64) -> &mut Trail {
        self.map.entry(id).or_default()
    }

    pub fn get(&self, id: u64) -> Option<&Trail> {
        self.map.get(&id)
    }

    pub fn prune(&mut self, now_ms: f64) {
        for t in self.map.values_mut() {
            t.prune(now_ms);
        }
    }

    /// End-of-frame GC: drop buffers whose owners left the world.
    pub fn retain_live(&mut self, live: &[u64]) {
        self.map.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Exponential moving average with a wall-time constant; smooths the main
/// emitter's visual scale across boost toggles.
#[derive(Clone, Copy, Debug)]
pub struct Smoothed {
    value: f32,
    last_ms: Option<f64>,
}

impl Default for Smoothed {
    fn default() -> Self {
        Smoothed {
            value: 1.0,
            last_ms: None,
        }
    }
}

impl Smoothed {
    /// Advance toward `target` given the frame timestamp; returns the
    /// smoothed value.
    pub fn step(&mut self, target: f32, now_ms: f64) -> f32 {
        match self.last_ms {
            None => self.value = target,
            Some(last) => {
                let dt = ((now_ms - last) / 1000.0).max(0.0) as f32;
                let k = 1.0 - (-dt / SMOOTH_TAU_S).exp();
                self.value += (target - self.value) * k;
            }
        }
        self.last_ms = Some(now_ms);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Self-expiring impact/burn flare.
#[derive(Clone, Copy, Debug)]
pub struct BurnFx {
    pub x: f32,
    pub y: f32,
    pub age_s: f32,
    pub dur_s: f32,
}

impl BurnFx {
    pub fn at(x: f32, y: f32) -> BurnFx {
        BurnFx {
            x,
            y,
            age_s: 0.0,
            dur_s: 0.55,
        }
    }
}

/// Advance burn ages by `dt_s` and drop the expired.
pub fn tick_burns(burns: &mut Vec<BurnFx>, dt_s: f32) {
    for b in burns.iter_mut() {
        b.age_s += dt_s;
    }
    burns.retain(|b| b.age_s < b.dur_s);
}

/// Additive two-ring flare; brightest at birth.
pub fn draw_burn(s: &mut dyn Surface, b: &BurnFx) {
    if !b.x.is_finite() || !b.y.is_finite() {
        return;
    }
    let t = (b.age_s / b.dur_s).clamp(0.0, 1.0);
    let alpha = (1.0 - t) * (1.0 - t);
    let c = vec2(b.x, b.y);
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.fill_circle(
        c,
        4.0 + 14.0 * t,
        &Paint::Radial {
            center: c,
            radius: 4.0 + 14.0 * t,
            inner: with_alpha(0xFFFFD9A0, alpha),
            outer: with_alpha(0xFFFF6020, 0.0),
        },
    );
    s.stroke_circle(c, 6.0 + 20.0 * t, 1.5, with_alpha(0xFFFFB050, alpha * 0.7));
    s.set_blend(prev);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(t_ms: f64) -> TrailPoint {
        TrailPoint {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            t_ms,
            power: 1.0,
            scale: 1.0,
        }
    }

    #[test]
    fn cap_never_exceeded() {
        let mut t = Trail::default();
        for i in 0..500 {
            t.record(stamp(i as f64));
            assert!(t.len() <= TRAIL_CAP);
        }
        assert_eq!(t.len(), TRAIL_CAP);
        // oldest stamps fell off the head
        assert!(t.iter_recent().last().unwrap().t_ms >= (500 - TRAIL_CAP) as f64);
    }

    #[test]
    fn age_prune_drops_expired_from_head() {
        let mut t = Trail::default();
        t.record(stamp(0.0));
        t.record(stamp(100.0));
        t.record(stamp(150.0));
        t.prune(200.0); // 0.0 is 200ms old > 180
        assert_eq!(t.len(), 2);
        t.prune(1000.0);
        assert!(t.is_empty());
    }

    #[test]
    fn expired_points_are_never_drawn() {
        use crate::gfx::{RasterSurface, rgb};
        let mut s = RasterSurface::new(32, 32);
        s.clear(rgb(0, 0, 0));
        s.set_transform(glam::Affine2::from_translation(vec2(16.0, 16.0)));
        let mut t = Trail::default();
        t.record(stamp(0.0));
        // drawn at now=500ms: older than lifetime, even without pruning
        draw_trail(&mut s, &t, 500.0, rgb(255, 255, 255), 4.0);
        assert!(s.frame().iter().all(|&p| p == rgb(0, 0, 0)));
    }

    #[test]
    fn stamps_drift_behind_the_emitter() {
        use crate::gfx::{RasterSurface, rgb};
        let mut s = RasterSurface::new(64, 64);
        s.clear(rgb(0, 0, 0));
        s.set_transform(glam::Affine2::from_translation(vec2(32.0, 32.0)));
        let mut t = Trail::default();
        // emitter travels +x, so its exhaust heading is π
        t.record(TrailPoint {
            angle: std::f32::consts::PI,
            ..stamp(0.0)
        });
        draw_trail(&mut s, &t, 90.0, rgb(255, 255, 255), 3.0);

        let (mut sum_x, mut lit) = (0.0f32, 0usize);
        for y in 0..64 {
            for x in 0..64 {
                if s.pixel(x, y) != rgb(0, 0, 0) {
                    sum_x += x as f32;
                    lit += 1;
                }
            }
        }
        assert!(lit > 0, "mid-life stamp must draw");
        let mean_x = sum_x / lit as f32;
        // half a lifetime at full power: ~12.6 world units toward −x
        assert!(mean_x < 28.0, "stamp drifted ahead of travel: mean x {mean_x}");
    }

    #[test]
    fn trail_map_gc_drops_stale_ids() {
        let mut m = TrailMap::default();
        m.entry(1).record(stamp(0.0));
        m.entry(2).record(stamp(0.0));
        m.retain_live(&[2]);
        assert!(m.get(1).is_none());
        assert!(m.get(2).is_some());
    }

    #[test]
    fn smoothing_approaches_target_at_tau_rate() {
        let mut s = Smoothed::default();
        assert_eq!(s.step(1.0, 0.0), 1.0); // first sample snaps
        // one time constant later: ~63% of the way to the new target
        let v = s.step(2.0, SMOOTH_TAU_S as f64 * 1000.0);
        assert!((v - 1.632).abs() < 0.01, "v = {v}");
        // far future: converged
        let v = s.step(2.0, 10_000.0);
        assert!((v - 2.0).abs() < 1e-3);
    }

    #[test]
    fn burns_expire() {
        let mut burns = vec![BurnFx::at(0.0, 0.0)];
        tick_burns(&mut burns, 0.2);
        assert_eq!(burns.len(), 1);
        tick_burns(&mut burns, 1.0);
        assert!(burns.is_empty());
    }
}
