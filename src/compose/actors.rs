//! Sub-renderers for things that move: ships, characters, creatures,
//! projectiles.  Stateless functions of (surface, view, frame time); every
//! one guards non-finite coordinates so a single bad entity degrades to a
//! skipped draw, never a broken frame.

use glam::{Vec2, vec2};

use crate::gfx::{Blend, Paint, Rgba, Surface, rgb, rgba, with_alpha};
use crate::scene::{ActorView, Ammo, CreatureKind, CreatureView, Faction};
use crate::sprites::SpriteBank;

#[inline]
fn finite(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite()
}

#[inline]
fn rot(p: Vec2, a: f32) -> Vec2 {
    let (s, c) = a.sin_cos();
    vec2(p.x * c - p.y * s, p.x * s + p.y * c)
}

pub fn faction_tint(f: Faction) -> Rgba {
    match f {
        Faction::Pirate => rgb(214, 78, 64),
        Faction::Sentinel => rgb(92, 128, 220),
        Faction::Feral => rgb(168, 150, 72),
    }
}

pub fn ammo_color(a: Ammo) -> Rgba {
    match a {
        Ammo::Kinetic => rgb(255, 224, 150),
        Ammo::Plasma => rgb(120, 220, 255),
        Ammo::Ion => rgb(190, 140, 255),
    }
}

/// Shot + trail color: the ammo palette, shifted toward red for hostile fire
/// so incoming shots read at a glance.
pub fn shot_color(a: Ammo, hostile: bool) -> Rgba {
    let base = ammo_color(a);
    if hostile {
        crate::gfx::lerp(base, rgb(255, 64, 48), 0.45)
    } else {
        base
    }
}

/// Craft hull.  Uses the `ship` sprite when its pixels are in; otherwise a
/// polygon hull in the same silhouette so the frame never shows a hole.
///
/// `size` is the hull half-length in world units, already smoothed by the
/// caller for the player's emitter; `tint` colors enemy hulls per faction.
pub fn draw_ship(
    s: &mut dyn Surface,
    bank: &mut SpriteBank,
    actor: &ActorView,
    size: f32,
    tint: Option<Rgba>,
    now_ms: f64,
) {
    if !finite(actor.x, actor.y) || !actor.angle.is_finite() {
        return;
    }
    let pos = vec2(actor.x, actor.y);

    // thruster flame sits behind the hull
    if actor.thrust > 0.05 {
        let flicker = 0.85 + 0.15 * ((now_ms / 35.0) as f32).sin();
        let len = size * (0.8 + 1.1 * actor.thrust) * flicker;
        let tail = pos + rot(vec2(-size * 0.9, 0.0), actor.angle);
        let tip = pos + rot(vec2(-size * 0.9 - len, 0.0), actor.angle);
        let side = rot(vec2(0.0, size * 0.28), actor.angle);
        let prev = s.blend();
        s.set_blend(Blend::Add);
        let flame = bank.sprite("thruster");
        if let Some(bmp) = bank.bitmap(flame) {
            let mid = (tail + tip) * 0.5;
            s.blit(
                bmp,
                None,
                mid,
                vec2(len * 0.5, size * 0.3),
                actor.angle,
                0.9 * flicker,
            );
        } else {
            s.fill_polygon(
                &[tail + side, tip, tail - side],
                &Paint::Linear {
                    from: tail,
                    to: tip,
                    start: with_alpha(rgb(255, 196, 96), 0.9),
                    end: with_alpha(rgb(255, 80, 16), 0.0),
                },
            );
        }
        if actor.boost {
            s.fill_circle(tail, size * 0.45, &Paint::Solid(rgba(170, 210, 255, 110)));
        }
        s.set_blend(prev);
    }

    let aspect = bank.aspect("ship");
    let hull_sprite = bank.sprite("ship");
    if let Some(bmp) = bank.bitmap(hull_sprite) {
        s.blit(bmp, None, pos, vec2(size, size / aspect.max(0.1)), actor.angle, 1.0);
    } else {
        let hull = [
            pos + rot(vec2(size, 0.0), actor.angle),
            pos + rot(vec2(-size * 0.7, size * 0.6), actor.angle),
            pos + rot(vec2(-size * 0.4, 0.0), actor.angle),
            pos + rot(vec2(-size * 0.7, -size * 0.6), actor.angle),
        ];
        s.fill_polygon(&hull, &Paint::Solid(tint.unwrap_or(rgb(208, 214, 224))));
        // cockpit
        s.fill_circle(
            pos + rot(vec2(size * 0.25, 0.0), actor.angle),
            size * 0.22,
            &Paint::Solid(rgb(90, 160, 200)),
        );
    }

    if actor.health < 1.0 {
        draw_health_arc(s, pos, size * 1.4, actor.health);
    }
}

/// Thin health arc above an actor; green → red as health drops.
pub fn draw_health_arc(s: &mut dyn Surface, pos: Vec2, radius: f32, health: f32) {
    let h = health.clamp(0.0, 1.0);
    let color = crate::gfx::lerp(rgb(220, 60, 50), rgb(90, 200, 90), h);
    let span = std::f32::consts::PI * h;
    let start = -std::f32::consts::FRAC_PI_2 - span * 0.5;
    let mut pts = [Vec2::ZERO; 9];
    for (i, p) in pts.iter_mut().enumerate() {
        let a = start + span * i as f32 / 8.0;
        *p = pos + vec2(a.cos(), a.sin()) * radius;
    }
    s.stroke_polyline(&pts, 1.4, color);
}

/// Hit-flash overlay ring: expands and fades as `progress` runs 0 → 1.
/// Drawn in the foreground pass so geometry never occludes it.
pub fn draw_hit_flash(s: &mut dyn Surface, x: f32, y: f32, progress: f32, base_radius: f32) {
    if !finite(x, y) || !progress.is_finite() {
        return;
    }
    let t = progress.clamp(0.0, 1.0);
    let alpha = (1.0 - t) * (1.0 - t);
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.stroke_circle(
        vec2(x, y),
        base_radius * (1.0 + 1.6 * t),
        2.0,
        with_alpha(rgb(255, 240, 220), alpha),
    );
    s.set_blend(prev);
}

/// On-foot explorer: capsule body, walk-phase legs, optional melee arc.
pub fn draw_character(s: &mut dyn Surface, actor: &ActorView, now_ms: f64) {
    if !finite(actor.x, actor.y) {
        return;
    }
    let pos = vec2(actor.x, actor.y);
    let speed = actor.vx.hypot(actor.vy);
    let walking = speed > 1.0;
    let phase = if walking {
        ((now_ms / 1000.0) as f32 * 9.0).sin()
    } else {
        0.0
    };
    let facing = if actor.vx < -0.5 { -1.0 } else { 1.0 };

    // legs
    let hip = pos + vec2(0.0, 2.0);
    s.stroke_line(hip, hip + vec2(phase * 3.0, 7.0), 1.8, rgb(58, 52, 70));
    s.stroke_line(hip, hip + vec2(-phase * 3.0, 7.0), 1.8, rgb(58, 52, 70));
    // torso + helmet
    s.fill_ellipse(pos - vec2(0.0, 3.0), 3.2, 5.0, &Paint::Solid(rgb(222, 128, 60)));
    s.fill_circle(pos - vec2(0.0, 9.0), 2.8, &Paint::Solid(rgb(235, 238, 245)));
    s.fill_circle(
        pos - vec2(-facing * 0.9, 9.2),
        1.2,
        &Paint::Solid(rgb(70, 110, 150)),
    );

    if let Some(swing) = actor.swing {
        let t = swing.clamp(0.0, 1.0);
        let a0 = actor.angle - 1.2 + 2.4 * t;
        let tip = pos + vec2(a0.cos(), a0.sin()) * 11.0;
        s.stroke_line(pos, tip, 1.6, with_alpha(rgb(240, 240, 255), 1.0 - t * 0.6));
    }
}

/// Surface fauna: bobbing blob with a hostile tint and eye.
pub fn draw_creature(s: &mut dyn Surface, c: &CreatureView, now_ms: f64) {
    if !finite(c.x, c.y) {
        return;
    }
    let bob = ((now_ms / 1000.0) as f32 * 2.4 + c.x * 0.05).sin() * 1.4;
    let pos = vec2(c.x, c.y + bob);
    let (body, r) = match c.kind {
        CreatureKind::Grazer => (rgb(150, 170, 110), 6.0),
        CreatureKind::Stalker => (rgb(120, 96, 132), 5.0),
        CreatureKind::Skimmer => (rgb(96, 150, 168), 4.0),
    };
    let body = if c.hostile {
        crate::gfx::lerp(body, rgb(210, 70, 60), 0.4)
    } else {
        body
    };
    s.fill_ellipse(pos, r * 1.2, r, &Paint::Solid(body));
    let eye = pos + rot(vec2(r * 0.7, -r * 0.3), c.angle);
    s.fill_circle(eye, 1.2, &Paint::Solid(rgb(20, 20, 24)));
    if c.hostile {
        s.stroke_circle(pos, r * 1.6, 0.8, rgba(255, 80, 60, 120));
    }
}

/// Projectile disc with the minimum-size guarantee: the drawn diameter is at
/// least 8 device pixels no matter how small `radius` is, so shots stay
/// visible when zoomed out.  `dev_scale` = zoom × pixel density.
pub fn draw_projectile(
    s: &mut dyn Surface,
    x: f32,
    y: f32,
    radius: f32,
    dev_scale: f32,
    color: Rgba,
) {
    if !finite(x, y) || !radius.is_finite() || dev_scale <= 0.0 {
        return;
    }
    let dev_diam = (radius * 3.0 * dev_scale).max(8.0);
    let world_r = dev_diam * 0.5 / dev_scale;
    let pos = vec2(x, y);
    s.fill_circle(pos, world_r, &Paint::Solid(color));
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.fill_circle(pos, world_r * 1.8, &Paint::Solid(with_alpha(color, 0.25)));
    s.set_blend(prev);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::RasterSurface;
    use crate::scene::{Camera, ViewSize};

    #[test]
    fn projectile_respects_min_device_size() {
        // zoomed way out: r·3·scale would be under a pixel
        let cam = Camera::new(0.0, 0.0, 0.05);
        let view = ViewSize::new(64.0, 64.0);
        let mut s = RasterSurface::new(64, 64);
        s.clear(rgb(0, 0, 0));
        s.set_transform(cam.view_transform(view, 1.0));
        draw_projectile(&mut s, 0.0, 0.0, 1.0, 0.05, rgb(255, 255, 255));

        let lit = (0..64)
            .filter(|&x| s.pixel(x, 32) != rgb(0, 0, 0))
            .count();
        assert!(lit >= 7, "projectile core spans {lit} device px, want ≥ 8ish");
    }

    #[test]
    fn hostile_shots_shift_toward_red() {
        for ammo in [Ammo::Kinetic, Ammo::Plasma, Ammo::Ion] {
            let friendly = shot_color(ammo, false);
            let hostile = shot_color(ammo, true);
            assert_eq!(friendly, ammo_color(ammo));
            assert_ne!(hostile, friendly);
            // redder and less blue than the friendly palette entry
            assert!((hostile >> 16) & 0xFF >= (friendly >> 16) & 0xFF);
            assert!(hostile & 0xFF < friendly & 0xFF);
        }
    }

    #[test]
    fn nan_actor_draws_nothing() {
        let mut s = RasterSurface::new(16, 16);
        s.clear(rgb(0, 0, 0));
        let mut bank = SpriteBank::empty();
        let actor = ActorView {
            x: f32::NAN,
            y: 0.0,
            thrust: 1.0,
            health: 0.5,
            ..ActorView::default()
        };
        draw_ship(&mut s, &mut bank, &actor, 10.0, None, 0.0);
        draw_character(&mut s, &actor, 0.0);
        draw_hit_flash(&mut s, f32::NAN, 0.0, 0.5, 10.0);
        assert!(s.frame().iter().all(|&p| p == rgb(0, 0, 0)));
    }

    #[test]
    fn ship_polygon_fallback_marks_pixels() {
        let mut s = RasterSurface::new(64, 64);
        s.clear(rgb(0, 0, 0));
        s.set_transform(Camera::new(0.0, 0.0, 1.0).view_transform(ViewSize::new(64.0, 64.0), 1.0));
        let mut bank = SpriteBank::empty(); // no sprite: polygon path
        let actor = ActorView {
            health: 1.0,
            ..ActorView::default()
        };
        draw_ship(&mut s, &mut bank, &actor, 10.0, None, 0.0);
        assert!(s.frame().iter().any(|&p| p != rgb(0, 0, 0)));
    }
}
