//! Planet-surface mode: sky gradient, parallax cloud band, tiled ground,
//! water bodies with shoreline and underwater decoration, then the player as
//! either a landed craft or an on-foot explorer.

use glam::vec2;

use crate::compose::{Compositor, actors, bodies};
use crate::decor::{self, ShoreDecor, SkyDecor};
use crate::fx;
use crate::gfx::{Blend, Paint, Surface, rgb, with_alpha};
use crate::scene::{Biome, ViewSize};

const SHIP_SIZE: f32 = 12.0;

fn sky_colors(biome: Biome) -> (u32, u32) {
    match biome {
        Biome::Fields => (rgb(108, 160, 224), rgb(196, 222, 240)),
        Biome::Desert => (rgb(150, 170, 210), rgb(240, 214, 170)),
        Biome::Rainforest => (rgb(96, 140, 190), rgb(170, 200, 196)),
        Biome::Archipelago => (rgb(92, 156, 220), rgb(210, 232, 244)),
    }
}

pub(super) fn compose(
    c: &mut Compositor,
    s: &mut dyn Surface,
    view: ViewSize,
    density: f32,
    now_ms: f64,
) {
    s.set_blend(Blend::Alpha);
    let cam = c.frame.camera;
    let world = cam.view_transform(view, density);
    let biome = c.frame.surface.as_ref().map(|sv| sv.biome).unwrap_or(Biome::Fields);

    // sky gradient in device space
    let (w, h) = s.size();
    let (zenith, horizon) = sky_colors(biome);
    s.clear(zenith);
    s.set_transform(glam::Affine2::IDENTITY);
    s.fill_rect(
        vec2(0.0, 0.0),
        vec2(w as f32, h as f32),
        &Paint::Linear {
            from: vec2(0.0, 0.0),
            to: vec2(0.0, h as f32),
            start: zenith,
            end: horizon,
        },
    );

    if let Some(surface) = &c.frame.surface {
        // cloud/bird band on its own parallax layer
        let sky = c
            .sky_cache
            .entry(surface.planet_id)
            .or_insert_with(|| SkyDecor::generate(surface.planet_id, surface.biome, c.decor_density));
        let pcam = cam.with_parallax(0.6);
        s.set_transform(pcam.view_transform(view, density));
        decor::draw_sky(s, sky, now_ms);

        s.set_transform(world);
        let (min, max) = cam.visible_bounds(view);
        decor::draw_ground(s, surface.planet_id, surface.biome, min, max);

        for water in &surface.waters {
            let center = vec2(water.x, water.y);
            s.fill_circle(
                center,
                water.radius,
                &Paint::Radial {
                    center,
                    radius: water.radius,
                    inner: rgb(60, 130, 170),
                    outer: rgb(36, 96, 140),
                },
            );
            // sub-surface glints scroll slower than the shoreline
            s.push_clip_circle(center, water.radius);
            let ucam = cam.with_parallax(0.7);
            s.set_transform(ucam.view_transform(view, density));
            decor::draw_underwater(s, water, now_ms);
            s.set_transform(world);
            s.pop_clip();

            let shore = c
                .shore_cache
                .entry(water.id)
                .or_insert_with(|| ShoreDecor::generate(water.id, surface.biome, c.decor_density));
            decor::draw_shore(s, shore, water, now_ms);
        }

        for f in &surface.features {
            bodies::draw_feature(s, f);
        }
    } else {
        s.set_transform(world);
    }

    for item in &c.frame.items {
        bodies::draw_item(s, item, now_ms);
    }
    for creature in &c.frame.creatures {
        actors::draw_creature(s, creature, now_ms);
    }

    let player = c.frame.player;
    if let Some(pl) = player {
        if c.frame.in_planet_ship {
            // landed craft; lift-off progress raises it off the pad
            let lift = c.frame.ship_progress.clamp(0.0, 1.0);
            let mut actor = pl.actor;
            actor.y -= lift * 26.0;
            // shadow shrinks as the craft climbs
            s.fill_ellipse(
                vec2(pl.actor.x, pl.actor.y + 4.0),
                SHIP_SIZE * (1.0 - 0.4 * lift),
                SHIP_SIZE * 0.3 * (1.0 - 0.4 * lift),
                &Paint::Solid(with_alpha(rgb(10, 14, 10), 0.35 * (1.0 - 0.6 * lift))),
            );
            actors::draw_ship(s, &mut c.bank, &actor, SHIP_SIZE, None, now_ms);
        } else {
            actors::draw_character(s, &pl.actor, now_ms);
        }
    }

    let dev_scale = cam.zoom * density;
    for p in &c.frame.projectiles {
        actors::draw_projectile(s, p.x, p.y, p.radius, dev_scale, rgb(255, 236, 180));
    }

    /*──────── foreground overlays, transform re-asserted ────────*/

    s.set_transform(world);
    if let Some(pl) = player {
        if let Some(flash) = pl.actor.hit_flash {
            actors::draw_hit_flash(s, pl.actor.x, pl.actor.y, flash, 10.0);
        }
    }
    for b in &c.fx.burns {
        fx::draw_burn(s, b);
    }
    s.set_blend(Blend::Alpha);
}
