//! Space mode: deep-space backdrop, parallax starfields, celestial bodies,
//! craft with exhaust trails, projectiles, then the foreground overlay pass.

use crate::compose::{Compositor, actors, bodies};
use crate::decor;
use crate::fx::{self, PLAYER_TRAIL_ID, trails};
use crate::gfx::{Blend, Rgba, Surface, rgb};
use crate::scene::ViewSize;

const BACKDROP: Rgba = rgb(8, 10, 18);
const SHIP_SIZE: f32 = 12.0;
const ENEMY_SIZE: f32 = 10.0;

pub(super) fn compose(
    c: &mut Compositor,
    s: &mut dyn Surface,
    view: ViewSize,
    density: f32,
    now_ms: f64,
) {
    s.set_blend(Blend::Alpha);
    s.clear(BACKDROP);
    let cam = c.frame.camera;

    // distant starfields, slowest layer first
    for (layer, p) in [(0u32, 0.4f32), (1, 0.8)] {
        let pcam = cam.with_parallax(p);
        s.set_transform(pcam.view_transform(view, density));
        let (min, max) = pcam.visible_bounds(view);
        decor::draw_starfield(s, layer, min, max);
    }

    let world = cam.view_transform(view, density);
    s.set_transform(world);

    // cull with a margin covering the widest overlay (ring, corona pulse)
    for p in &c.frame.planets {
        if !cam.sees(view, p.x, p.y, p.radius * 1.3) {
            continue;
        }
        bodies::draw_planet(s, &mut c.bank, p);
    }
    for star in &c.frame.stars {
        if !cam.sees(view, star.x, star.y, star.radius * 1.7) {
            continue;
        }
        bodies::draw_star(s, star, now_ms);
    }

    /*──────── exhaust + laser trails under their emitters ────────*/

    for e in &c.frame.enemies {
        let trail = c.fx.thrusters.entry(e.id);
        if e.actor.thrust >= trails::THRUST_EMIT {
            trail.record(trails::TrailPoint {
                x: e.actor.x,
                y: e.actor.y,
                angle: e.actor.angle + std::f32::consts::PI,
                t_ms: now_ms,
                power: e.actor.thrust,
                scale: 1.0,
            });
        }
        fx::draw_trail(s, trail, now_ms, rgb(255, 150, 70), ENEMY_SIZE * 0.3);
    }

    let player = c.frame.player;
    if let Some(pl) = player {
        // smoothed emitter scale keeps boost toggles from popping
        let target = if pl.actor.boost { 1.45 } else { 1.0 };
        let scale = c.fx.emitter_scale.step(target, now_ms);
        let trail = c.fx.thrusters.entry(PLAYER_TRAIL_ID);
        if pl.actor.thrust >= trails::THRUST_EMIT {
            trail.record(trails::TrailPoint {
                x: pl.actor.x,
                y: pl.actor.y,
                angle: pl.actor.angle + std::f32::consts::PI,
                t_ms: now_ms,
                power: pl.actor.thrust,
                scale,
            });
        }
        fx::draw_trail(s, trail, now_ms, rgb(140, 200, 255), SHIP_SIZE * 0.35);
    }

    if !c.frame.details.is_empty() {
        for d in &c.frame.details {
            let trail = c.fx.shots.entry(d.id);
            trail.record(trails::TrailPoint {
                x: d.x,
                y: d.y,
                angle: d.vy.atan2(d.vx) + std::f32::consts::PI,
                t_ms: now_ms,
                power: 1.0,
                scale: 1.0,
            });
            let color = actors::shot_color(d.ammo, d.hostile);
            fx::draw_trail(s, trail, now_ms, color, d.radius.max(1.0));
        }
    }

    /*──────── craft ────────*/

    for e in &c.frame.enemies {
        actors::draw_ship(
            s,
            &mut c.bank,
            &e.actor,
            ENEMY_SIZE,
            Some(actors::faction_tint(e.faction)),
            now_ms,
        );
    }
    if let Some(pl) = player {
        let scale = c.fx.emitter_scale.value();
        actors::draw_ship(s, &mut c.bank, &pl.actor, SHIP_SIZE * scale, None, now_ms);
    }

    /*──────── projectiles ────────*/

    let dev_scale = cam.zoom * density;
    if c.frame.details.is_empty() {
        for p in &c.frame.projectiles {
            actors::draw_projectile(s, p.x, p.y, p.radius, dev_scale, rgb(255, 240, 200));
        }
    } else {
        for d in &c.frame.details {
            let color = actors::shot_color(d.ammo, d.hostile);
            actors::draw_projectile(s, d.x, d.y, d.radius, dev_scale, color);
        }
    }

    /*──────── foreground overlays, transform re-asserted ────────*/

    s.set_transform(world);
    if let Some(pl) = player {
        if let Some(flash) = pl.actor.hit_flash {
            actors::draw_hit_flash(s, pl.actor.x, pl.actor.y, flash, SHIP_SIZE * 1.3);
        }
        if let Some(heat) = fx::heat_at(pl.actor.x, pl.actor.y, &c.frame.stars) {
            fx::draw_heat(s, pl.actor.x, pl.actor.y, heat, now_ms);
        }
    }
    for e in &c.frame.enemies {
        if let Some(flash) = e.actor.hit_flash {
            actors::draw_hit_flash(s, e.actor.x, e.actor.y, flash, ENEMY_SIZE * 1.3);
        }
        if let Some(heat) = fx::heat_at(e.actor.x, e.actor.y, &c.frame.stars) {
            fx::draw_heat(s, e.actor.x, e.actor.y, heat, now_ms);
        }
    }
    s.set_transform(world);
    for b in &c.fx.burns {
        fx::draw_burn(s, b);
    }
    // overlays may flip blend modes; leave the surface in the default state
    s.set_blend(Blend::Alpha);
}
