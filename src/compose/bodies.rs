//! Sub-renderers for celestial bodies, terrain features, and dropped items.

use glam::vec2;

use crate::gfx::{Blend, Paint, Surface, rgb, rgba, with_alpha};
use crate::scene::{Biome, DroppedItem, FeatureKind, ItemKind, PlanetView, StarView, TerrainFeature};
use crate::sprites::SpriteBank;

#[inline]
fn finite(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite()
}

fn biome_tint(b: Biome) -> u32 {
    match b {
        Biome::Fields => rgb(98, 146, 86),
        Biome::Desert => rgb(200, 168, 104),
        Biome::Rainforest => rgb(48, 112, 60),
        Biome::Archipelago => rgb(70, 130, 160),
    }
}

/// Planet body seen from space: biome-tinted disc, terminator shading,
/// atmosphere ring, and a pad marker while the player sits landed on it.
pub fn draw_planet(s: &mut dyn Surface, bank: &mut SpriteBank, p: &PlanetView) {
    if !finite(p.x, p.y) || !p.radius.is_finite() || p.radius <= 0.0 {
        return;
    }
    let c = vec2(p.x, p.y);
    let tint = biome_tint(p.biome);

    let sprite = bank.sprite("planet");
    if let Some(bmp) = bank.bitmap(sprite) {
        s.blit(bmp, None, c, vec2(p.radius, p.radius), 0.0, 1.0);
    } else {
        s.fill_circle(
            c,
            p.radius,
            &Paint::Radial {
                center: c - vec2(p.radius * 0.35, p.radius * 0.35),
                radius: p.radius * 1.6,
                inner: tint,
                outer: crate::gfx::lerp(tint, rgb(10, 12, 20), 0.75),
            },
        );
    }
    // thin atmosphere halo
    s.stroke_circle(c, p.radius * 1.06, p.radius * 0.05, rgba(160, 200, 255, 70));

    if p.landed {
        s.stroke_circle(c, p.radius * 1.18, 1.5, rgba(250, 250, 200, 160));
    }
}

/// Star disc with corona pulse; the heat overlay near it is drawn separately
/// in the foreground pass.
pub fn draw_star(s: &mut dyn Surface, star: &StarView, now_ms: f64) {
    if !finite(star.x, star.y) || !star.radius.is_finite() || star.radius <= 0.0 {
        return;
    }
    let c = vec2(star.x, star.y);
    let pulse = 1.0 + 0.04 * ((now_ms / 450.0) as f32).sin();
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.fill_circle(
        c,
        star.radius * 1.5 * pulse,
        &Paint::Radial {
            center: c,
            radius: star.radius * 1.5 * pulse,
            inner: with_alpha(star.color, 0.55),
            outer: with_alpha(star.color, 0.0),
        },
    );
    s.set_blend(prev);
    s.fill_circle(
        c,
        star.radius,
        &Paint::Radial {
            center: c,
            radius: star.radius,
            inner: rgb(255, 252, 240),
            outer: star.color,
        },
    );
}

/// Dropped pickup: small diamond with a traveling glint.
pub fn draw_item(s: &mut dyn Surface, item: &DroppedItem, now_ms: f64) {
    if !finite(item.x, item.y) {
        return;
    }
    let color = match item.kind {
        ItemKind::Scrap => rgb(160, 160, 170),
        ItemKind::Fuel => rgb(240, 170, 70),
        ItemKind::Relic => rgb(170, 120, 240),
    };
    let c = vec2(item.x, item.y);
    let r = 4.0;
    s.fill_polygon(
        &[
            c + vec2(0.0, -r),
            c + vec2(r, 0.0),
            c + vec2(0.0, r),
            c + vec2(-r, 0.0),
        ],
        &Paint::Solid(color),
    );
    let glint = (((now_ms / 1000.0) as f32 * 2.0 + item.x * 0.1).sin() * 0.5 + 0.5) * 0.8;
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.fill_circle(c + vec2(-r * 0.3, -r * 0.3), 1.0, &Paint::Solid(with_alpha(rgb(255, 255, 255), glint)));
    s.set_blend(prev);
}

/// Static terrain decoration on a planet surface.
pub fn draw_feature(s: &mut dyn Surface, f: &TerrainFeature) {
    if !finite(f.x, f.y) || !f.scale.is_finite() || f.scale <= 0.0 {
        return;
    }
    let c = vec2(f.x, f.y);
    let k = f.scale;
    match f.kind {
        FeatureKind::Rock => {
            s.fill_polygon(
                &[
                    c + vec2(-7.0, 0.0) * k,
                    c + vec2(-3.0, -6.0) * k,
                    c + vec2(4.0, -5.0) * k,
                    c + vec2(7.0, 0.0) * k,
                ],
                &Paint::Solid(rgb(120, 116, 110)),
            );
            s.fill_polygon(
                &[c + vec2(-3.0, -6.0) * k, c + vec2(4.0, -5.0) * k, c + vec2(1.0, 0.0) * k],
                &Paint::Solid(rgb(142, 138, 130)),
            );
        }
        FeatureKind::Plant => {
            for i in -1..=1 {
                let base = c + vec2(i as f32 * 2.5 * k, 0.0);
                s.stroke_line(base, base - vec2(-i as f32 * 1.5, 9.0 * k), 1.3, rgb(62, 128, 60));
            }
            s.fill_circle(c - vec2(0.0, 9.0 * k), 2.2 * k, &Paint::Solid(rgb(110, 170, 80)));
        }
        FeatureKind::Ruin => {
            s.fill_rect(
                c + vec2(-6.0, -10.0) * k,
                c + vec2(-3.0, 0.0) * k,
                &Paint::Solid(rgb(150, 142, 128)),
            );
            s.fill_rect(
                c + vec2(2.0, -7.0) * k,
                c + vec2(6.0, 0.0) * k,
                &Paint::Solid(rgb(138, 130, 118)),
            );
        }
        FeatureKind::Crystal => {
            let prev = s.blend();
            s.fill_polygon(
                &[
                    c + vec2(0.0, -11.0) * k,
                    c + vec2(3.5, -3.0) * k,
                    c + vec2(0.0, 0.0) * k,
                    c + vec2(-3.5, -3.0) * k,
                ],
                &Paint::Solid(rgb(140, 200, 230)),
            );
            s.set_blend(Blend::Add);
            s.fill_circle(c - vec2(0.0, 6.0 * k), 4.0 * k, &Paint::Solid(rgba(150, 220, 255, 60)));
            s.set_blend(prev);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
