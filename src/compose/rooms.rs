//! Ship-interior sub-renderers: rooms, walls, doors, crew stations.

use glam::vec2;

use crate::gfx::{Blend, Paint, Surface, rgb, rgba, with_alpha};
use crate::scene::{Door, Room, Station, StationKind, Wall};

#[inline]
fn finite(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite()
}

/// Room floor plus its additive ambient-light pool.  Light uses the room's
/// own color so engineering can glow amber while the bridge glows blue.
pub fn draw_room(s: &mut dyn Surface, room: &Room) {
    if !finite(room.x, room.y) || !room.w.is_finite() || !room.h.is_finite() {
        return;
    }
    let min = vec2(room.x, room.y);
    let max = min + vec2(room.w, room.h);
    s.fill_rect(min, max, &Paint::Solid(rgb(44, 48, 58)));
    // deck plating seams
    let mut x = room.x + 12.0;
    while x < room.x + room.w {
        s.stroke_line(vec2(x, room.y), vec2(x, room.y + room.h), 0.6, rgb(38, 42, 52));
        x += 12.0;
    }

    let center = (min + max) * 0.5;
    let reach = room.w.max(room.h) * 0.75;
    let prev = s.blend();
    s.set_blend(Blend::Add);
    s.fill_rect(
        min,
        max,
        &Paint::Radial {
            center,
            radius: reach,
            inner: with_alpha(room.light, 0.28),
            outer: with_alpha(room.light, 0.0),
        },
    );
    s.set_blend(prev);
}

pub fn draw_wall(s: &mut dyn Surface, wall: &Wall) {
    if !finite(wall.x0, wall.y0) || !finite(wall.x1, wall.y1) {
        return;
    }
    s.stroke_line(
        vec2(wall.x0, wall.y0),
        vec2(wall.x1, wall.y1),
        3.0,
        rgb(96, 104, 122),
    );
}

/// Door gap with slide progress: two leaves retract as `open` → 1.
pub fn draw_door(s: &mut dyn Surface, door: &Door) {
    if !finite(door.x, door.y) || !door.open.is_finite() {
        return;
    }
    let c = vec2(door.x, door.y);
    let half = 6.0;
    let gap = half * door.open.clamp(0.0, 1.0);
    let dir = if door.vertical {
        vec2(0.0, 1.0)
    } else {
        vec2(1.0, 0.0)
    };
    let leaf = rgb(150, 158, 176);
    s.stroke_line(c - dir * half, c - dir * gap, 2.6, leaf);
    s.stroke_line(c + dir * gap, c + dir * half, 2.6, leaf);
    if door.open > 0.02 {
        s.stroke_line(c - dir * gap, c + dir * gap, 1.0, rgba(120, 220, 160, 90));
    }
}

/// Console glyph per station kind; active stations get a blinking cursor.
pub fn draw_station(s: &mut dyn Surface, st: &Station, now_ms: f64) {
    if !finite(st.x, st.y) {
        return;
    }
    let c = vec2(st.x, st.y);
    let (screen, glyph) = match st.kind {
        StationKind::Helm => (rgb(70, 130, 190), rgb(180, 220, 255)),
        StationKind::Engine => (rgb(190, 120, 60), rgb(255, 210, 150)),
        StationKind::Cargo => (rgb(110, 130, 110), rgb(200, 220, 200)),
        StationKind::Bunk => (rgb(90, 80, 110), rgb(190, 180, 210)),
    };
    s.fill_rect(c - vec2(4.0, 3.0), c + vec2(4.0, 3.0), &Paint::Solid(rgb(60, 64, 76)));
    s.fill_rect(c - vec2(3.0, 2.0), c + vec2(3.0, 1.0), &Paint::Solid(screen));
    match st.kind {
        StationKind::Helm => s.stroke_circle(c - vec2(0.0, 0.5), 1.2, 0.6, glyph),
        StationKind::Engine => {
            s.stroke_line(c - vec2(2.0, 0.5), c + vec2(2.0, -0.5), 0.6, glyph)
        }
        StationKind::Cargo => {
            s.stroke_line(c - vec2(1.5, 1.5), c + vec2(1.5, 0.5), 0.6, glyph);
            s.stroke_line(c + vec2(-1.5, 0.5), c + vec2(1.5, -1.5), 0.6, glyph);
        }
        StationKind::Bunk => s.stroke_line(c - vec2(2.0, -0.5), c + vec2(2.0, 0.5), 0.8, glyph),
    }
    if st.active && ((now_ms / 400.0) as u64) % 2 == 0 {
        let prev = s.blend();
        s.set_blend(Blend::Add);
        s.fill_circle(c + vec2(2.5, -1.5), 0.8, &Paint::Solid(with_alpha(glyph, 0.9)));
        s.set_blend(prev);
    }
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
    fn room_light_pools_toward_center() {
        let mut s = RasterSurface::new(80, 80);
        s.clear(rgb(0, 0, 0));
        s.set_transform(Camera::new(0.0, 0.0, 1.0).view_transform(ViewSize::new(80.0, 80.0), 1.0));
        draw_room(
            &mut s,
            &Room {
                x: -30.0,
                y: -30.0,
                w: 60.0,
                h: 60.0,
                light: rgb(120, 170, 255),
            },
        );
        let center_b = s.pixel(40, 40) & 0xFF;
        let corner_b = s.pixel(12, 12) & 0xFF;
        assert!(center_b > corner_b, "light should pool at the room center");
    }

    #[test]
    fn nan_geometry_is_skipped() {
        let mut s = RasterSurface::new(32, 32);
        s.clear(rgb(0, 0, 0));
        draw_wall(
            &mut s,
            &Wall {
                x0: f32::NAN,
                y0: 0.0,
                x1: 10.0,
                y1: 0.0,
            },
        );
        draw_door(
            &mut s,
            &Door {
                x: 0.0,
                y: f32::NAN,
                vertical: false,
                open: 0.5,
            },
        );
        assert!(s.frame().iter().all(|&p| p == rgb(0, 0, 0)));
    }
}
