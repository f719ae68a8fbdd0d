//! The one seam between the simulation and the renderer.
//!
//! A [`RenderSession`] is polled exactly once per frame.  Required accessors
//! exist on every session; optional features follow a *capability* pattern:
//! the session advertises what it supports through [`Capabilities`] and the
//! compositor checks those bits **once** at frame start while gathering a
//! [`FrameInput`].  An absent capability means "not applicable this session"
//! — the matching visual feature is skipped, never faked.

use bitflags::bitflags;

use crate::scene::camera::Camera;
use crate::scene::views::{
    CreatureView, DroppedItem, EnemyView, FxEvent, Mode, PlanetView, PlayerView, ProjectileDetail,
    ProjectileView, ShipInterior, StarView, SurfaceView,
};

bitflags! {
    /// Optional session features, advertised once per session.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const PLANET_SURFACE       = 1 << 0;
        const DROPPED_ITEMS        = 1 << 1;
        const SHIP_INTERIOR        = 1 << 2;
        const DETAILED_PROJECTILES = 1 << 3;
        const FX_EVENTS            = 1 << 4;
        const PLANET_SHIP          = 1 << 5;
    }
}

/// Read-only world snapshot provider.
///
/// List accessors fill a caller-owned scratch vector so steady-state frames
/// allocate nothing.  [`RenderSession::take_fx_events`] is the single
/// destructive exception: it drains the session's one-shot FX queue and must
/// be called at most once per frame (the compositor guarantees this).
pub trait RenderSession {
    fn mode(&self) -> Mode;
    fn camera(&self) -> Camera;
    fn player(&self) -> Option<PlayerView>;
    fn enemies(&self, out: &mut Vec<EnemyView>);
    fn projectiles(&self, out: &mut Vec<ProjectileView>);
    fn stars(&self, out: &mut Vec<StarView>);
    fn planets(&self, out: &mut Vec<PlanetView>);

    /// Which optional accessors below are meaningful for this session.
    fn caps(&self) -> Capabilities {
        Capabilities::empty()
    }

    /*──────────── optional, gated by `caps()` ────────────*/

    fn planet_surface(&self) -> Option<SurfaceView> {
        None
    }
    fn creatures(&self, _out: &mut Vec<CreatureView>) {}
    fn dropped_items(&self, _out: &mut Vec<DroppedItem>) {}
    fn in_planet_ship(&self) -> bool {
        false
    }
    /// Lift-off/boarding progress in `0..=1`; only meaningful with
    /// [`Capabilities::PLANET_SHIP`].
    fn in_planet_ship_progress(&self) -> f32 {
        0.0
    }
    fn ship_interior(&self) -> Option<ShipInterior> {
        None
    }
    fn projectiles_detailed(&self, _out: &mut Vec<ProjectileDetail>) {}
    /// Destructively drain queued one-shot FX events into `out`.
    fn take_fx_events(&mut self, _out: &mut Vec<FxEvent>) {}
}

/// Everything the composers read this frame, gathered in one pass.
///
/// Owned by the compositor and reused: `gather` clears and refills the
/// internal vectors, so a warmed-up frame performs no list allocations.
#[derive(Debug)]
pub struct FrameInput {
    pub mode: Mode,
    pub camera: Camera,
    pub caps: Capabilities,

    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Filled only when `DETAILED_PROJECTILES` is advertised.
    pub details: Vec<ProjectileDetail>,
    pub stars: Vec<StarView>,
    pub planets: Vec<PlanetView>,

    pub surface: Option<SurfaceView>,
    pub creatures: Vec<CreatureView>,
    pub items: Vec<DroppedItem>,
    pub interior: Option<ShipInterior>,
    pub in_planet_ship: bool,
    pub ship_progress: f32,
    pub fx_events: Vec<FxEvent>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            mode: Mode::Space,
            camera: Camera::new(0.0, 0.0, 1.0),
            caps: Capabilities::empty(),
            player: None,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            details: Vec::new(),
            stars: Vec::new(),
            planets: Vec::new(),
            surface: None,
            creatures: Vec::new(),
            items: Vec::new(),
            interior: None,
            in_planet_ship: false,
            ship_progress: 0.0,
            fx_events: Vec::new(),
        }
    }
}

impl FrameInput {
    /// Poll `session` once and snapshot this frame's inputs.
    pub fn gather<S: RenderSession + ?Sized>(&mut self, session: &mut S) {
        self.enemies.clear();
        self.projectiles.clear();
        self.details.clear();
        self.stars.clear();
        self.planets.clear();
        self.creatures.clear();
        self.items.clear();
        self.fx_events.clear();
        self.surface = None;
        self.interior = None;

        self.mode = session.mode();
        self.camera = session.camera();
        self.caps = session.caps();

        self.player = session.player();
        session.enemies(&mut self.enemies);
        session.projectiles(&mut self.projectiles);
        session.stars(&mut self.stars);
        session.planets(&mut self.planets);

        if self.caps.contains(Capabilities::PLANET_SURFACE) {
            self.surface = session.planet_surface();
            session.creatures(&mut self.creatures);
        }
        if self.caps.contains(Capabilities::DROPPED_ITEMS) {
            session.dropped_items(&mut self.items);
        }
        if self.caps.contains(Capabilities::SHIP_INTERIOR) {
            self.interior = session.ship_interior();
        }
        if self.caps.contains(Capabilities::DETAILED_PROJECTILES) {
            session.projectiles_detailed(&mut self.details);
        }
        if self.caps.contains(Capabilities::PLANET_SHIP) {
            self.in_planet_ship = session.in_planet_ship();
            self.ship_progress = session.in_planet_ship_progress();
        } else {
            self.in_planet_ship = false;
            self.ship_progress = 0.0;
        }
        // Destructive drain: this is the one and only call per frame.
        if self.caps.contains(Capabilities::FX_EVENTS) {
            session.take_fx_events(&mut self.fx_events);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::views::FxKind;

    /// A session that counts accessor calls and supports only FX events.
    struct Probe {
        fx_polls: u32,
        surface_polls: std::cell::Cell<u32>,
    }

    impl RenderSession for Probe {
        fn mode(&self) -> Mode {
            Mode::Space
        }
        fn camera(&self) -> Camera {
            Camera::new(0.0, 0.0, 1.0)
        }
        fn player(&self) -> Option<PlayerView> {
            None
        }
        fn enemies(&self, _out: &mut Vec<EnemyView>) {}
        fn projectiles(&self, _out: &mut Vec<ProjectileView>) {}
        fn stars(&self, _out: &mut Vec<StarView>) {}
        fn planets(&self, _out: &mut Vec<PlanetView>) {}
        fn caps(&self) -> Capabilities {
            Capabilities::FX_EVENTS
        }
        fn planet_surface(&self) -> Option<SurfaceView> {
            self.surface_polls.set(self.surface_polls.get() + 1);
            None
        }
        fn take_fx_events(&mut self, out: &mut Vec<FxEvent>) {
            self.fx_polls += 1;
            out.push(FxEvent {
                kind: FxKind::Burn,
                x: 1.0,
                y: 2.0,
            });
        }
    }

    #[test]
    fn gather_drains_fx_exactly_once_and_skips_absent_caps() {
        let mut probe = Probe {
            fx_polls: 0,
            surface_polls: std::cell::Cell::new(0),
        };
        let mut frame = FrameInput::default();
        frame.gather(&mut probe);

        assert_eq!(probe.fx_polls, 1);
        assert_eq!(frame.fx_events.len(), 1);
        // PLANET_SURFACE not advertised: accessor never probed.
        assert_eq!(probe.surface_polls.get(), 0);
        assert!(frame.surface.is_none());
    }

    #[test]
    fn gather_clears_previous_frame() {
        let mut probe = Probe {
            fx_polls: 0,
            surface_polls: std::cell::Cell::new(0),
        };
        let mut frame = FrameInput::default();
        frame.gather(&mut probe);
        frame.gather(&mut probe);
        // Events from frame 1 must not accumulate into frame 2.
        assert_eq!(frame.fx_events.len(), 1);
    }
}
