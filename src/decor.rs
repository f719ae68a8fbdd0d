//! Deterministic ambient decoration.
//!
//! Placement is a pure function of a stable seed key (planet id, water-body
//! id, tile coordinates) — the generators in [`crate::rng`] guarantee the
//! same layout frame after frame and run after run.  Animation (cloud drift,
//! bird flap, foam shimmer) is layered on from the injected frame time and
//! never consumes placement RNG, so it cannot disturb determinism.
//!
//! RNG consumption order is part of each generator's contract and is spelled
//! out next to the draws; reordering them silently re-rolls every world.

use glam::{Vec2, vec2};
use rand::Rng;

use crate::gfx::{Blend, Paint, Rgba, Surface, rgb, rgba, with_alpha};
use crate::rng::seeded;
use crate::scene::{Biome, WaterBody};

/// User decoration multiplier, clamped to `0..=2` wherever it is consumed.
pub fn clamp_density(d: f32) -> f32 {
    if d.is_finite() { d.clamp(0.0, 2.0) } else { 1.0 }
}

/*──────────────────────────── sky ────────────────────────────*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub puffs: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    /// Flap phase offset so a flock doesn't beat in unison.
    pub phase: f32,
}

/// Clouds and birds for one planet's sky band.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkyDecor {
    pub clouds: Vec<Cloud>,
    pub birds: Vec<Bird>,
}

/// Horizontal band decoration spans, world units.
const SKY_SPAN: f32 = 4000.0;

impl SkyDecor {
    fn counts(biome: Biome) -> (usize, usize) {
        match biome {
            Biome::Fields => (8, 4),
            Biome::Desert => (3, 1),
            Biome::Rainforest => (12, 6),
            Biome::Archipelago => (9, 5),
        }
    }

    /// Layout for `sky-<planet_id>`.
    ///
    /// Draw order: per cloud `x, y, scale, puffs`; then per bird
    /// `x, y, phase`.
    pub fn generate(planet_id: u64, biome: Biome, density: f32) -> SkyDecor {
        let d = clamp_density(density);
        let (cloud_base, bird_base) = Self::counts(biome);
        let n_clouds = (cloud_base as f32 * d).round() as usize;
        let n_birds = (bird_base as f32 * d).round() as usize;

        let mut rng = seeded(&format!("sky-{planet_id}"));
        let mut decor = SkyDecor::default();
        for _ in 0..n_clouds {
            decor.clouds.push(Cloud {
                x: rng.gen_range(-SKY_SPAN / 2.0..SKY_SPAN / 2.0),
                y: rng.gen_range(-680.0..-180.0),
                scale: rng.gen_range(0.6..1.6),
                puffs: rng.gen_range(3..6),
            });
        }
        for _ in 0..n_birds {
            decor.birds.push(Bird {
                x: rng.gen_range(-SKY_SPAN / 2.0..SKY_SPAN / 2.0),
                y: rng.gen_range(-560.0..-220.0),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            });
        }
        decor
    }
}

/// Draw the sky band; caller has already set the parallax transform.
pub fn draw_sky(s: &mut dyn Surface, decor: &SkyDecor, now_ms: f64) {
    for c in &decor.clouds {
        // slow eastward drift, wrapped inside the band
        let drift = ((now_ms / 1000.0) as f32 * 6.0 * c.scale) % SKY_SPAN;
        let x = -SKY_SPAN / 2.0 + (c.x + drift + SKY_SPAN / 2.0).rem_euclid(SKY_SPAN);
        for i in 0..c.puffs {
            let off = (i as f32 - c.puffs as f32 / 2.0) * 14.0 * c.scale;
            let r = (16.0 - 2.5 * (i as f32 - c.puffs as f32 / 2.0).abs()) * c.scale;
            s.fill_circle(
                vec2(x + off, c.y + (i as f32 * 1.3).sin() * 3.0),
                r,
                &Paint::Solid(rgba(255, 255, 255, 190)),
            );
        }
    }
    for b in &decor.birds {
        let flap = ((now_ms / 1000.0) as f32 * 7.0 + b.phase).sin();
        let x = b.x + ((now_ms / 1000.0) as f32 * 22.0 + b.phase * 40.0) % SKY_SPAN - SKY_SPAN / 2.0;
        let wing = 5.0;
        let dip = flap * 3.0;
        let c = rgb(40, 40, 48);
        s.stroke_line(vec2(x - wing, b.y - dip), vec2(x, b.y), 1.2, c);
        s.stroke_line(vec2(x, b.y), vec2(x + wing, b.y - dip), 1.2, c);
    }
}

/*──────────────────────────── shoreline ────────────────────────────*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShoreKind {
    Foam,
    Driftwood,
    Reed,
    Palm,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShoreItem {
    pub kind: ShoreKind,
    /// Angle around the water body, radians.
    pub angle: f32,
    /// Radial offset from the waterline, world units (positive = on land).
    pub offset: f32,
    pub scale: f32,
}

/// Clutter ring around one water body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShoreDecor {
    pub items: Vec<ShoreItem>,
    /// Foam dash phases, seeded separately (`foam-<id>`) so tuning clutter
    /// never re-rolls the foam ring.
    pub foam_phases: Vec<f32>,
}

impl ShoreDecor {
    fn counts(biome: Biome) -> (usize, usize) {
        // (clutter items, foam dashes)
        match biome {
            Biome::Fields => (6, 14),
            Biome::Desert => (3, 8),
            Biome::Rainforest => (10, 16),
            Biome::Archipelago => (12, 22),
        }
    }

    fn pick_kind(biome: Biome, roll: f32) -> ShoreKind {
        match biome {
            Biome::Archipelago if roll < 0.45 => ShoreKind::Palm,
            Biome::Rainforest if roll < 0.55 => ShoreKind::Reed,
            _ if roll < 0.35 => ShoreKind::Driftwood,
            _ => ShoreKind::Reed,
        }
    }

    /// Layout for `shore-<water_id>` / `foam-<water_id>`.
    ///
    /// Draw order: per clutter item `angle, offset, scale, kind-roll`; then
    /// per foam dash one phase draw from the foam stream.
    pub fn generate(water_id: u64, biome: Biome, density: f32) -> ShoreDecor {
        let d = clamp_density(density);
        let (item_base, foam_base) = Self::counts(biome);
        let n_items = (item_base as f32 * d).round() as usize;
        let n_foam = (foam_base as f32 * d).round() as usize;

        let mut rng = seeded(&format!("shore-{water_id}"));
        let mut decor = ShoreDecor::default();
        for _ in 0..n_items {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let offset = rng.gen_range(4.0..26.0);
            let scale = rng.gen_range(0.7..1.4);
            let roll: f32 = rng.gen_range(0.0..1.0);
            decor.items.push(ShoreItem {
                kind: Self::pick_kind(biome, roll),
                angle,
                offset,
                scale,
            });
        }
        let mut foam_rng = seeded(&format!("foam-{water_id}"));
        for _ in 0..n_foam {
            decor.foam_phases.push(foam_rng.gen_range(0.0..std::f32::consts::TAU));
        }
        decor
    }
}

/// Draw one water body's shoreline ring; world transform is active.
pub fn draw_shore(s: &mut dyn Surface, decor: &ShoreDecor, water: &WaterBody, now_ms: f64) {
    if !water.x.is_finite() || !water.y.is_finite() || water.radius <= 0.0 {
        return;
    }
    let center = vec2(water.x, water.y);

    // animated foam dashes hugging the waterline
    let n = decor.foam_phases.len().max(1) as f32;
    for (i, &phase) in decor.foam_phases.iter().enumerate() {
        let a = i as f32 / n * std::f32::consts::TAU;
        let shimmer = ((now_ms / 1000.0) as f32 * 1.8 + phase).sin();
        let r = water.radius + 1.5 + shimmer * 1.5;
        let dir = vec2(a.cos(), a.sin());
        let mid = center + dir * r;
        let t = dir.perp() * (4.0 + shimmer * 1.5);
        s.stroke_line(
            mid - t,
            mid + t,
            1.5,
            with_alpha(rgb(235, 245, 250), 0.5 + 0.3 * shimmer),
        );
    }

    for item in &decor.items {
        let dir = vec2(item.angle.cos(), item.angle.sin());
        let p = center + dir * (water.radius + item.offset);
        match item.kind {
            ShoreKind::Foam => {}
            ShoreKind::Driftwood => {
                let along = dir.perp() * 7.0 * item.scale;
                s.stroke_line(p - along, p + along, 2.5 * item.scale, rgb(110, 84, 60));
            }
            ShoreKind::Reed => {
                let sway = ((now_ms / 1000.0) as f32 * 1.3 + item.angle * 5.0).sin() * 2.0;
                for k in -1..=1 {
                    let base = p + dir.perp() * (k as f32 * 2.0 * item.scale);
                    let tip = base - vec2(-sway, 10.0 * item.scale);
                    s.stroke_line(base, tip, 1.2, rgb(60, 120, 58));
                }
            }
            ShoreKind::Palm => {
                let top = p - vec2(0.0, 16.0 * item.scale);
                s.stroke_line(p, top, 2.2 * item.scale, rgb(120, 90, 56));
                let sway = ((now_ms / 1000.0) as f32 + item.angle).sin() * 0.25;
                for k in 0..5 {
                    let a = k as f32 / 4.0 * std::f32::consts::PI + sway;
                    let frond = top + vec2(a.cos(), -0.35 * a.sin()) * 10.0 * item.scale;
                    s.stroke_line(top, frond, 1.6, rgb(52, 128, 62));
                }
            }
        }
    }
}

/// Drifting sub-surface glints inside a water body, drawn on the underwater
/// parallax layer.  Placement is seeded `ripple-<water_id>`; the caller has
/// already clipped to the water circle, so overshoot is harmless.
///
/// Draw order: per glint `angle, dist, length, phase`.
pub fn draw_underwater(s: &mut dyn Surface, water: &WaterBody, now_ms: f64) {
    if !water.x.is_finite() || !water.y.is_finite() || water.radius <= 0.0 {
        return;
    }
    let center = vec2(water.x, water.y);
    let n = (water.radius / 8.0).clamp(4.0, 24.0) as usize;
    let mut rng = seeded(&format!("ripple-{}", water.id));
    for _ in 0..n {
        let a = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(0.0..water.radius * 0.95);
        let len = rng.gen_range(3.0..9.0);
        let phase = rng.gen_range(0.0..std::f32::consts::TAU);
        let shimmer = ((now_ms / 1000.0) as f32 * 1.1 + phase).sin() * 0.5 + 0.5;
        let p = center + vec2(a.cos(), a.sin()) * dist;
        s.stroke_line(
            p - vec2(len * 0.5, 0.0),
            p + vec2(len * 0.5, 0.0),
            1.0,
            with_alpha(rgb(210, 235, 245), 0.15 + 0.3 * shimmer),
        );
    }
}

/*──────────────────────────── ground tiles ────────────────────────────*/

pub const TILE: f32 = 64.0;

/// Base/speckle colors per biome.
fn tile_palette(biome: Biome) -> (Rgba, Rgba) {
    match biome {
        Biome::Fields => (rgb(96, 142, 74), rgb(78, 120, 60)),
        Biome::Desert => (rgb(198, 168, 110), rgb(176, 146, 92)),
        Biome::Rainforest => (rgb(58, 108, 56), rgb(44, 88, 46)),
        Biome::Archipelago => (rgb(188, 178, 132), rgb(120, 150, 96)),
    }
}

/// Tile the ground from `y = 0` downward across the visible bounds.
///
/// Speckle per tile is seeded `tile-<planet_id>-<tx>-<ty>`; draw order is
/// four speckles of `x, y, radius` each.
pub fn draw_ground(
    s: &mut dyn Surface,
    planet_id: u64,
    biome: Biome,
    min: Vec2,
    max: Vec2,
) {
    let (base, speckle) = tile_palette(biome);
    let tx0 = (min.x / TILE).floor() as i32;
    let tx1 = (max.x / TILE).ceil() as i32;
    let ty0 = (min.y.max(0.0) / TILE).floor() as i32;
    let ty1 = (max.y.max(0.0) / TILE).ceil() as i32;
    if max.y < 0.0 {
        return; // ground entirely below the viewport
    }
    for ty in ty0..=ty1 {
        for tx in tx0..=tx1 {
            let origin = vec2(tx as f32 * TILE, ty as f32 * TILE);
            // checker shade keeps tile seams readable without a texture
            let c = if (tx ^ ty) & 1 == 0 {
                base
            } else {
                crate::gfx::lerp(base, speckle, 0.35)
            };
            s.fill_rect(origin, origin + vec2(TILE, TILE), &Paint::Solid(c));

            let mut rng = seeded(&format!("tile-{planet_id}-{tx}-{ty}"));
            for _ in 0..4 {
                let px = origin.x + rng.gen_range(0.0..TILE);
                let py = origin.y + rng.gen_range(0.0..TILE);
                let r = rng.gen_range(1.0..3.5);
                s.fill_circle(vec2(px, py), r, &Paint::Solid(speckle));
            }
        }
    }
}

/*──────────────────────────── starfield ────────────────────────────*/

const STAR_TILE: f32 = 512.0;

/// Distant-star speckle for one parallax layer, covering `min..max` of that
/// layer's camera space.  Seeded `starfield-<layer>-<tx>-<ty>`, five stars
/// per tile drawn as `x, y, radius, alpha`.
pub fn draw_starfield(s: &mut dyn Surface, layer: u32, min: Vec2, max: Vec2) {
    let prev = s.blend();
    s.set_blend(Blend::Add);
    let tx0 = (min.x / STAR_TILE).floor() as i32;
    let tx1 = (max.x / STAR_TILE).ceil() as i32;
    let ty0 = (min.y / STAR_TILE).floor() as i32;
    let ty1 = (max.y / STAR_TILE).ceil() as i32;
    for ty in ty0..=ty1 {
        for tx in tx0..=tx1 {
            let mut rng = seeded(&format!("starfield-{layer}-{tx}-{ty}"));
            for _ in 0..5 {
                let x = tx as f32 * STAR_TILE + rng.gen_range(0.0..STAR_TILE);
                let y = ty as f32 * STAR_TILE + rng.gen_range(0.0..STAR_TILE);
                let r = rng.gen_range(0.4..1.6);
                let a = rng.gen_range(0.25..0.9);
                s.fill_circle(vec2(x, y), r, &Paint::Solid(with_alpha(rgb(220, 228, 255), a)));
            }
        }
    }
    s.set_blend(prev);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_layout_is_deterministic() {
        let a = SkyDecor::generate(42, Biome::Fields, 1.0);
        let b = SkyDecor::generate(42, Biome::Fields, 1.0);
        assert_eq!(a, b);
        assert!(!a.clouds.is_empty());
    }

    #[test]
    fn different_planets_differ() {
        let a = SkyDecor::generate(1, Biome::Fields, 1.0);
        let b = SkyDecor::generate(2, Biome::Fields, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn density_scales_counts_and_clamps() {
        let none = SkyDecor::generate(7, Biome::Rainforest, 0.0);
        assert!(none.clouds.is_empty() && none.birds.is_empty());

        let double = SkyDecor::generate(7, Biome::Rainforest, 2.0);
        let absurd = SkyDecor::generate(7, Biome::Rainforest, 50.0);
        assert_eq!(double.clouds.len(), absurd.clouds.len());
        assert_eq!(double.clouds.len(), 24);
    }

    #[test]
    fn shore_layout_is_deterministic_and_biome_flavored() {
        let a = ShoreDecor::generate(9, Biome::Archipelago, 1.0);
        let b = ShoreDecor::generate(9, Biome::Archipelago, 1.0);
        assert_eq!(a, b);
        assert!(a.items.iter().any(|i| i.kind == ShoreKind::Palm));
        assert_eq!(a.foam_phases.len(), 22);
    }

    #[test]
    fn foam_seed_is_independent_of_clutter() {
        // same foam count regardless of clutter density differences in items
        let a = ShoreDecor::generate(3, Biome::Fields, 1.0);
        let b = ShoreDecor::generate(3, Biome::Fields, 1.0);
        assert_eq!(a.foam_phases, b.foam_phases);
    }

    #[test]
    fn density_clamp_helper() {
        assert_eq!(clamp_density(-1.0), 0.0);
        assert_eq!(clamp_density(9.0), 2.0);
        assert_eq!(clamp_density(f32::NAN), 1.0);
    }

    #[test]
    fn ground_tiling_paints_identically_twice() {
        use crate::gfx::RasterSurface;
        use crate::scene::{Camera, ViewSize};

        let mut a = RasterSurface::new(64, 64);
        let mut b = RasterSurface::new(64, 64);
        let cam = Camera::new(10.0, 30.0, 1.0);
        let t = cam.view_transform(ViewSize::new(64.0, 64.0), 1.0);
        let (min, max) = cam.visible_bounds(ViewSize::new(64.0, 64.0));
        for s in [&mut a, &mut b] {
            s.clear(rgb(0, 0, 0));
            s.set_transform(t);
            draw_ground(s, 5, Biome::Desert, min, max);
        }
        assert_eq!(a.frame(), b.frame());
    }
}
