//! Per-tic systems for the demo world.

use glam::vec2;
use hecs::World;

use crate::scene::{ActorView, FxEvent, FxKind, Mode};
use crate::sim::{Enemy, Heading, InputCmd, Pos, Shot, Vel};

const TURN_RATE: f32 = 3.2; // rad/s
const THRUST_ACCEL: f32 = 260.0; // world units/s²
const BOOST_MULT: f32 = 1.8;
const SPACE_DRAG: f32 = 0.35; // 1/s
const WALK_SPEED: f32 = 90.0;

/// Integrate the player from raw input.  In space the craft thrusts along
/// its heading with light drag; on a surface or inside the ship the same
/// input moves a walker.
pub fn player_motion(p: &mut ActorView, cmd: InputCmd, mode: Mode, dt: f32) {
    match mode {
        Mode::Space => {
            p.angle += cmd.turn * TURN_RATE * dt;
            p.thrust = cmd.thrust.clamp(0.0, 1.0);
            p.boost = cmd.boost;
            let accel = THRUST_ACCEL * p.thrust * if cmd.boost { BOOST_MULT } else { 1.0 };
            p.vx += p.angle.cos() * accel * dt;
            p.vy += p.angle.sin() * accel * dt;
            let drag = (1.0 - SPACE_DRAG * dt).max(0.0);
            p.vx *= drag;
            p.vy *= drag;
        }
        Mode::Planet | Mode::Interior => {
            p.thrust = cmd.thrust.clamp(0.0, 1.0);
            p.boost = false;
            p.vx = cmd.turn * WALK_SPEED;
            p.vy = 0.0;
            if cmd.turn.abs() > 0.1 {
                p.angle = if cmd.turn > 0.0 { 0.0 } else { std::f32::consts::PI };
            }
        }
    }
    p.x += p.vx * dt;
    p.y += p.vy * dt;
}

/// Scripted patrol: each enemy rides a circle around its anchor, heading
/// tangent to the orbit.
pub fn enemy_orbits(world: &mut World, time_s: f32) {
    for (_, (pos, vel, heading, enemy)) in
        &mut world.query::<(&mut Pos, &mut Vel, &mut Heading, &Enemy)>()
    {
        let a = enemy.phase + time_s * 0.6;
        let target = enemy.anchor + vec2(a.cos(), a.sin()) * enemy.orbit_r;
        let tangent = vec2(-a.sin(), a.cos()) * enemy.orbit_r * 0.6;
        vel.0 = tangent;
        pos.0 = target;
        heading.0 = tangent.y.atan2(tangent.x);
    }
}

/// Plain Euler step for shots; enemies are fully scripted by their orbits.
pub fn integrate(world: &mut World, dt: f32) {
    for (_, (pos, vel, _)) in &mut world.query::<(&mut Pos, &Vel, &Shot)>() {
        pos.0 += vel.0 * dt;
    }
}

/// Age shots; despawn the expired and queue a burn flare where they died.
pub fn expire_shots(world: &mut World, dt: f32, fx: &mut Vec<FxEvent>) {
    let mut dead = Vec::new();
    for (e, (pos, shot)) in &mut world.query::<(&Pos, &mut Shot)>() {
        shot.ttl -= dt;
        if shot.ttl <= 0.0 {
            dead.push(e);
            fx.push(FxEvent {
                kind: FxKind::Burn,
                x: pos.0.x,
                y: pos.0.y,
            });
        }
    }
    for e in dead {
        let _ = world.despawn(e);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Ammo;

    #[test]
    fn thrust_accelerates_along_heading() {
        let mut p = ActorView::default();
        let cmd = InputCmd {
            thrust: 1.0,
            ..InputCmd::default()
        };
        for _ in 0..60 {
            player_motion(&mut p, cmd, Mode::Space, 1.0 / 60.0);
        }
        assert!(p.vx > 100.0, "vx = {}", p.vx);
        assert!(p.vy.abs() < 1.0);
    }

    #[test]
    fn shots_move_and_expire() {
        let mut world = World::new();
        world.spawn((
            Pos(vec2(0.0, 0.0)),
            Vel(vec2(100.0, 0.0)),
            Shot {
                id: 1,
                radius: 2.0,
                ammo: Ammo::Kinetic,
                hostile: false,
                ttl: 0.05,
            },
        ));
        let mut fx = Vec::new();
        integrate(&mut world, 0.02);
        expire_shots(&mut world, 0.02, &mut fx);
        assert!(fx.is_empty());
        expire_shots(&mut world, 0.1, &mut fx);
        assert_eq!(fx.len(), 1);
        assert!(fx[0].x > 0.0);
        assert_eq!(world.len(), 0);
    }
}
