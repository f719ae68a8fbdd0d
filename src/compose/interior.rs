//! Ship-interior mode: hull backdrop, rooms with ambient light, walls,
//! doors, stations, and the crew character.  Room lighting is built fresh
//! from this frame's interior view, so nothing here can bleed into the
//! other modes.

use crate::compose::{Compositor, actors, rooms};
use crate::fx;
use crate::gfx::{Blend, Surface, rgb};
use crate::scene::ViewSize;

pub(super) fn compose(
    c: &mut Compositor,
    s: &mut dyn Surface,
    view: ViewSize,
    density: f32,
    now_ms: f64,
) {
    s.set_blend(Blend::Alpha);
    s.clear(rgb(18, 20, 26));
    let world = c.frame.camera.view_transform(view, density);
    s.set_transform(world);

    let Some(interior) = &c.frame.interior else {
        // capability present but view absent this frame: empty hull
        return;
    };

    for room in &interior.rooms {
        rooms::draw_room(s, room);
    }
    for wall in &interior.walls {
        rooms::draw_wall(s, wall);
    }
    for door in &interior.doors {
        rooms::draw_door(s, door);
    }
    for station in &interior.stations {
        rooms::draw_station(s, station, now_ms);
    }

    let player = c.frame.player;
    if let Some(pl) = player {
        actors::draw_character(s, &pl.actor, now_ms);
    }

    /*──────── foreground overlays, transform re-asserted ────────*/

    s.set_transform(world);
    if let Some(pl) = player {
        if let Some(flash) = pl.actor.hit_flash {
            actors::draw_hit_flash(s, pl.actor.x, pl.actor.y, flash, 8.0);
        }
    }
    for b in &c.fx.burns {
        fx::draw_burn(s, b);
    }
    s.set_blend(Blend::Alpha);
}
