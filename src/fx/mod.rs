//! Frame-to-frame visual state owned by one compositor instance.
//!
//! Nothing in here is authoritative game state: trails, flares and the
//! smoothed emitter scale exist only to make motion read well, and all of it
//! can be dropped without the simulation noticing.

pub mod heat;
pub mod trails;

pub use heat::{Heat, draw_heat, heat_at};
pub use trails::{BurnFx, Smoothed, Trail, TrailMap, TrailPoint, draw_burn, draw_trail};

use crate::scene::{FxEvent, FxKind};

/// All temporal buffers for one compositor.
#[derive(Debug, Default)]
pub struct FxState {
    /// Thruster trails, keyed by actor id (player uses [`PLAYER_TRAIL_ID`]).
    pub thrusters: TrailMap,
    /// Projectile trails, keyed by projectile id.
    pub shots: TrailMap,
    /// Player emitter scale smoothing.
    pub emitter_scale: Smoothed,
    pub burns: Vec<BurnFx>,
    last_ms: Option<f64>,
}

/// Trail-map key reserved for the player's own emitter.
pub const PLAYER_TRAIL_ID: u64 = u64::MAX;

impl FxState {
    /// Start a frame: age-prune trails, tick burn ages, return the frame
    /// delta in seconds (zero on the very first frame).
    pub fn begin_frame(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, 0.25) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.thrusters.prune(now_ms);
        self.shots.prune(now_ms);
        trails::tick_burns(&mut self.burns, dt);
        dt
    }

    /// Convert the session's one-shot events into self-expiring FX.
    pub fn absorb_events(&mut self, events: &[FxEvent]) {
        for ev in events {
            match ev.kind {
                FxKind::Burn | FxKind::Spark => self.burns.push(BurnFx::at(ev.x, ev.y)),
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_reports_delta_and_prunes() {
        let mut fx = FxState::default();
        assert_eq!(fx.begin_frame(1000.0), 0.0);
        fx.thrusters.entry(7).record(TrailPoint {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            t_ms: 1000.0,
            power: 1.0,
            scale: 1.0,
        });
        let dt = fx.begin_frame(1016.0);
        assert!((dt - 0.016).abs() < 1e-4);
        // way past the lifetime: the stamp is pruned
        fx.begin_frame(3000.0);
        assert!(fx.thrusters.get(7).unwrap().is_empty());
    }

    #[test]
    fn events_become_expiring_burns() {
        let mut fx = FxState::default();
        fx.absorb_events(&[FxEvent {
            kind: FxKind::Burn,
            x: 5.0,
            y: 6.0,
        }]);
        assert_eq!(fx.burns.len(), 1);
        fx.begin_frame(0.0);
        fx.begin_frame(2000.0); // dt clamps to 0.25 s; repeat to expire
        fx.begin_frame(4000.0);
        fx.begin_frame(6000.0);
        assert!(fx.burns.is_empty());
    }
}
