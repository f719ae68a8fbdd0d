//! Full-frame composition properties: the compositor, a configurable test
//! session, and the software raster backend working together.

use stardrift_rs::gfx::rgb;
use stardrift_rs::scene::{
    ActorView, Camera, Capabilities, EnemyView, FxEvent, Mode, PlanetView, PlayerView,
    ProjectileView, RenderSession, Room, ShipInterior, StarView, SurfaceView, ViewSize,
};
use stardrift_rs::sprites::SpriteBank;
use stardrift_rs::{Compositor, RasterSurface};

/// Session with every field scriptable from a test.
struct TestSession {
    mode: Mode,
    camera: Camera,
    caps: Capabilities,
    player: Option<PlayerView>,
    projectiles: Vec<ProjectileView>,
    stars: Vec<StarView>,
    surface: Option<SurfaceView>,
    interior: Option<ShipInterior>,
}

impl Default for TestSession {
    fn default() -> Self {
        TestSession {
            mode: Mode::Space,
            camera: Camera::new(0.0, 0.0, 1.0),
            caps: Capabilities::empty(),
            player: None,
            projectiles: Vec::new(),
            stars: Vec::new(),
            surface: None,
            interior: None,
        }
    }
}

impl RenderSession for TestSession {
    fn mode(&self) -> Mode {
        self.mode
    }
    fn camera(&self) -> Camera {
        self.camera
    }
    fn player(&self) -> Option<PlayerView> {
        self.player
    }
    fn enemies(&self, _out: &mut Vec<EnemyView>) {}
    fn projectiles(&self, out: &mut Vec<ProjectileView>) {
        out.extend_from_slice(&self.projectiles);
    }
    fn stars(&self, out: &mut Vec<StarView>) {
        out.extend_from_slice(&self.stars);
    }
    fn planets(&self, _out: &mut Vec<PlanetView>) {}
    fn caps(&self) -> Capabilities {
        self.caps
    }
    fn planet_surface(&self) -> Option<SurfaceView> {
        self.surface.clone()
    }
    fn ship_interior(&self) -> Option<ShipInterior> {
        self.interior.clone()
    }
}

fn render_once(session: &mut TestSession, size: usize, now_ms: f64) -> RasterSurface {
    let mut compositor = Compositor::new(SpriteBank::empty());
    let mut surface = RasterSurface::new(size, size);
    compositor.render(
        session,
        &mut surface,
        ViewSize::new(size as f32, size as f32),
        1.0,
        now_ms,
    );
    surface
}

#[test]
fn projectile_is_visible_even_when_zoomed_far_out() {
    let mut session = TestSession {
        mode: Mode::Space,
        camera: Camera::new(0.0, 0.0, 0.05),
        projectiles: vec![ProjectileView {
            x: 0.0,
            y: 0.0,
            radius: 1.0, // 3·r·zoom = 0.15 device px without the floor
        }],
        ..TestSession::default()
    };
    let with_shot = render_once(&mut session, 64, 0.0);
    session.projectiles.clear();
    let without = render_once(&mut session, 64, 0.0);
    // diff along the row through the shot's center; starfield pixels cancel
    let lit = (0..64)
        .filter(|&x| with_shot.pixel(x, 32) != without.pixel(x, 32))
        .count();
    assert!(lit >= 7, "projectile spans {lit} px, want the 8 px floor");
}

#[test]
fn mode_switch_leaves_no_interior_residue() {
    // frame 1: interior with a bright-lit room
    let mut session = TestSession {
        mode: Mode::Interior,
        caps: Capabilities::SHIP_INTERIOR,
        interior: Some(ShipInterior {
            rooms: vec![Room {
                x: -30.0,
                y: -30.0,
                w: 60.0,
                h: 60.0,
                light: rgb(255, 255, 255),
            }],
            ..ShipInterior::default()
        }),
        ..TestSession::default()
    };
    let mut compositor = Compositor::new(SpriteBank::empty());
    let mut surface = RasterSurface::new(64, 64);
    let view = ViewSize::new(64.0, 64.0);
    compositor.render(&mut session, &mut surface, view, 1.0, 0.0);

    // frame 2: same compositor, mode flipped to space
    session.mode = Mode::Space;
    compositor.render(&mut session, &mut surface, view, 1.0, 16.0);

    // reference: a fresh compositor that never saw the interior
    let mut fresh = Compositor::new(SpriteBank::empty());
    let mut reference = RasterSurface::new(64, 64);
    fresh.render(&mut session, &mut reference, view, 1.0, 16.0);

    assert_eq!(surface.frame(), reference.frame(), "interior state bled into space");
}

#[test]
fn absent_surface_capability_skips_ground_entirely() {
    let mut session = TestSession {
        mode: Mode::Planet,
        caps: Capabilities::empty(), // surface exists but is not advertised
        surface: Some(SurfaceView {
            planet_id: 1,
            biome: stardrift_rs::scene::Biome::Desert,
            waters: Vec::new(),
            features: Vec::new(),
        }),
        ..TestSession::default()
    };
    let s = render_once(&mut session, 64, 0.0);
    // no ground tiles: the bottom half is still pure sky gradient, which is
    // horizontally uniform — a tile edge or speckle would break that
    for y in [40, 50, 60] {
        let first = s.pixel(1, y);
        assert!(
            (0..64).all(|x| s.pixel(x, y) == first),
            "row {y} is not uniform; ground was drawn without the capability"
        );
    }
}

#[test]
fn planet_frames_are_reproducible_across_compositors() {
    let surface_view = SurfaceView {
        planet_id: 77,
        biome: stardrift_rs::scene::Biome::Archipelago,
        waters: vec![stardrift_rs::scene::WaterBody {
            id: 5,
            x: 10.0,
            y: 30.0,
            radius: 25.0,
        }],
        features: Vec::new(),
    };
    let mut render = || {
        let mut session = TestSession {
            mode: Mode::Planet,
            caps: Capabilities::PLANET_SURFACE,
            camera: Camera::new(0.0, 10.0, 1.0),
            surface: Some(surface_view.clone()),
            ..TestSession::default()
        };
        render_once(&mut session, 96, 1234.0)
    };
    let a = render();
    let b = render();
    assert_eq!(a.frame(), b.frame(), "decoration placement must be deterministic");
}

#[test]
fn heat_overlay_appears_near_a_star_only() {
    let star = StarView {
        id: 1,
        x: -450.0,
        y: 0.0,
        radius: 400.0, // player at x=0: d=450, outer band ends at 500 → k=0.5
        color: rgb(255, 214, 120),
    };
    let player = PlayerView {
        actor: ActorView {
            health: 1.0,
            ..ActorView::default()
        },
        ..PlayerView::default()
    };

    let mut near = TestSession {
        mode: Mode::Space,
        stars: vec![star],
        player: Some(player),
        ..TestSession::default()
    };
    let mut far = TestSession {
        mode: Mode::Space,
        stars: vec![StarView { x: -50_000.0, ..star }],
        player: Some(player),
        ..TestSession::default()
    };
    let hot = render_once(&mut near, 64, 0.0);
    let cold = render_once(&mut far, 64, 0.0);

    // heat streaks are additive: total brightness near the star must exceed
    // the identical scene with the star out of range
    let sum = |s: &RasterSurface| -> u64 {
        s.frame()
            .iter()
            .map(|&p| ((p >> 16) & 0xFF) as u64 + ((p >> 8) & 0xFF) as u64 + (p & 0xFF) as u64)
            .sum()
    };
    assert!(sum(&hot) > sum(&cold), "no visible heat overlay near the star");
}

#[test]
fn fx_events_drain_exactly_once_per_frame() {
    struct FxProbe {
        polls: u32,
    }
    impl RenderSession for FxProbe {
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
        fn take_fx_events(&mut self, out: &mut Vec<FxEvent>) {
            self.polls += 1;
            out.push(FxEvent {
                kind: stardrift_rs::scene::FxKind::Burn,
                x: 0.0,
                y: 0.0,
            });
        }
    }

    let mut probe = FxProbe { polls: 0 };
    let mut compositor = Compositor::new(SpriteBank::empty());
    let mut surface = RasterSurface::new(32, 32);
    let view = ViewSize::new(32.0, 32.0);
    compositor.render(&mut probe, &mut surface, view, 1.0, 0.0);
    compositor.render(&mut probe, &mut surface, view, 1.0, 16.0);
    assert_eq!(probe.polls, 2, "destructive drain must run once per frame");
}
