//! Top-level frame composition.
//!
//! One [`Compositor`] instance serves one game session.  Per frame it polls
//! the session snapshot once, dispatches to the mode pipeline (space /
//! planet / ship interior), and garbage-collects its temporal state so
//! buffers never outlive the entities that fed them.  All visual state —
//! trails, flares, smoothing, sprite and decoration caches — lives on the
//! instance; two compositors never share anything mutable.

use std::collections::HashMap;

use crate::decor::{ShoreDecor, SkyDecor, clamp_density};
use crate::fx::{FxState, PLAYER_TRAIL_ID};
use crate::gfx::Surface;
use crate::scene::{FrameInput, Mode, RenderSession, ViewSize};
use crate::sprites::SpriteBank;

pub mod actors;
pub mod bodies;
pub mod rooms;

mod interior;
mod planet;
mod space;

pub struct Compositor {
    pub(crate) bank: SpriteBank,
    pub(crate) fx: FxState,
    pub(crate) frame: FrameInput,
    /// Per-planet sky decoration, generated once per planet id.
    pub(crate) sky_cache: HashMap<u64, SkyDecor>,
    /// Per-water-body shoreline decoration.
    pub(crate) shore_cache: HashMap<u64, ShoreDecor>,
    pub(crate) decor_density: f32,
    live_scratch: Vec<u64>,
}

impl Compositor {
    pub fn new(bank: SpriteBank) -> Compositor {
        Compositor {
            bank,
            fx: FxState::default(),
            frame: FrameInput::default(),
            sky_cache: HashMap::new(),
            shore_cache: HashMap::new(),
            decor_density: 1.0,
            live_scratch: Vec::new(),
        }
    }

    pub fn bank_mut(&mut self) -> &mut SpriteBank {
        &mut self.bank
    }

    /// Decoration density multiplier, clamped to `0..=2`.  Changing it
    /// re-rolls cached layouts (count is part of the layout).
    pub fn set_decor_density(&mut self, density: f32) {
        let d = clamp_density(density);
        if d != self.decor_density {
            self.decor_density = d;
            self.sky_cache.clear();
            self.shore_cache.clear();
        }
    }

    /// Compose one frame onto `surface`.
    ///
    /// `now_ms` is the single frame timestamp: every fade, drift and sway in
    /// this frame derives from it, so injected time makes whole frames
    /// reproducible in tests.  The session is polled exactly once.
    pub fn render(
        &mut self,
        session: &mut dyn RenderSession,
        surface: &mut dyn Surface,
        view: ViewSize,
        density: f32,
        now_ms: f64,
    ) {
        self.bank.pump();
        self.frame.gather(session);
        self.fx.begin_frame(now_ms);

        let events = std::mem::take(&mut self.frame.fx_events);
        self.fx.absorb_events(&events);
        self.frame.fx_events = events;

        match self.frame.mode {
            Mode::Space => space::compose(self, surface, view, density, now_ms),
            Mode::Planet => planet::compose(self, surface, view, density, now_ms),
            Mode::Interior => interior::compose(self, surface, view, density, now_ms),
        }

        self.end_frame_gc();
    }

    /// Drop state keyed to entities absent from this frame.
    fn end_frame_gc(&mut self) {
        self.live_scratch.clear();
        self.live_scratch.push(PLAYER_TRAIL_ID);
        self.live_scratch.extend(self.frame.enemies.iter().map(|e| e.id));
        self.fx.thrusters.retain_live(&self.live_scratch);

        self.live_scratch.clear();
        self.live_scratch.extend(self.frame.details.iter().map(|d| d.id));
        self.fx.shots.retain_live(&self.live_scratch);

        let planets = &self.frame.planets;
        let surface_planet = self.frame.surface.as_ref().map(|s| s.planet_id);
        self.sky_cache.retain(|id, _| {
            surface_planet == Some(*id) || planets.iter().any(|p| p.id == *id)
        });
        if let Some(surface) = &self.frame.surface {
            self.shore_cache
                .retain(|id, _| surface.waters.iter().any(|w| w.id == *id));
        } else {
            self.shore_cache.clear();
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
