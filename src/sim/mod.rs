//! Thin scripted simulation.
//!
//! The renderer treats the world as an external authority; this module is
//! the stand-in authority the demo bins and integration tests drive.  A
//! small hecs world holds enemies and shots, fixed-rate tics advance them,
//! and [`DemoSim`] exposes the whole thing through the read-only
//! [`RenderSession`] seam.  No collision resolution, no game rules — just
//! enough motion to exercise every composer path.

use glam::{Vec2, vec2};
use hecs::World;
use rand::Rng;

use crate::rng::seeded;
use crate::scene::{
    ActorView, Ammo, Biome, Camera, Capabilities, CreatureKind, CreatureView, Door, DroppedItem,
    EnemyView, Faction, FeatureKind, FxEvent, ItemKind, Mode, PlanetView, PlayerView,
    ProjectileDetail, ProjectileView, RenderSession, Room, ShipInterior, StarView, Station,
    StationKind, SurfaceView, TerrainFeature, Wall, WaterBody,
};

pub mod systems;

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;

/*──────────────────────── components ────────────────────────*/

#[derive(Debug, Clone, Copy)]
pub struct Pos(pub Vec2);

#[derive(Debug, Clone, Copy, Default)]
pub struct Vel(pub Vec2);

#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub id: u64,
    pub faction: Faction,
    /// Orbit anchor and phase for the scripted patrol.
    pub anchor: Vec2,
    pub orbit_r: f32,
    pub phase: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub id: u64,
    pub radius: f32,
    pub ammo: Ammo,
    pub hostile: bool,
    pub ttl: f32,
}

/// Per-tic control input, mirrored from whatever the bin reads.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub thrust: f32, // 0..=1
    pub turn: f32,   // -1..=1
    pub boost: bool,
    pub fire: bool,
    /// Edge-triggered mode cycle (Tab in the demo bin).
    pub cycle_mode: bool,
}

/*──────────────────────── the sim ────────────────────────*/

pub struct DemoSim {
    pub world: World,
    mode: Mode,
    player: ActorView,
    zoom: f32,

    planets: Vec<PlanetView>,
    stars: Vec<StarView>,
    surface: SurfaceView,
    items: Vec<DroppedItem>,
    creatures: Vec<CreatureView>,
    interior: ShipInterior,

    in_planet_ship: bool,
    ship_progress: f32,
    fx_queue: Vec<FxEvent>,
    next_shot_id: u64,
    shot_cooldown: f32,
    time_s: f32,
}

impl DemoSim {
    /// Deterministic little solar system; `seed_key` rerolls the layout.
    pub fn new(seed_key: &str) -> DemoSim {
        let mut rng = seeded(seed_key);

        let mut planets = Vec::new();
        for i in 0..3u64 {
            let a = rng.gen_range(0.0..std::f32::consts::TAU);
            let d = rng.gen_range(700.0..2200.0);
            planets.push(PlanetView {
                id: 10 + i,
                x: a.cos() * d,
                y: a.sin() * d,
                radius: rng.gen_range(60.0..140.0),
                biome: match i {
                    0 => Biome::Fields,
                    1 => Biome::Archipelago,
                    _ => Biome::Desert,
                },
                landed: false,
            });
        }
        let stars = vec![StarView {
            id: 1,
            x: 0.0,
            y: 0.0,
            radius: 260.0,
            color: 0xFFFFB850,
        }];

        let mut world = World::new();
        for (i, faction) in [Faction::Pirate, Faction::Sentinel, Faction::Feral]
            .into_iter()
            .enumerate()
        {
            let anchor = vec2(rng.gen_range(-900.0..900.0), rng.gen_range(-900.0..900.0));
            world.spawn((
                Pos(anchor),
                Vel::default(),
                Heading(0.0),
                Enemy {
                    id: 100 + i as u64,
                    faction,
                    anchor,
                    orbit_r: rng.gen_range(120.0..260.0),
                    phase: rng.gen_range(0.0..std::f32::consts::TAU),
                },
            ));
        }

        let surface = SurfaceView {
            planet_id: planets[0].id,
            biome: Biome::Archipelago,
            waters: vec![
                WaterBody { id: 500, x: -160.0, y: 120.0, radius: 90.0 },
                WaterBody { id: 501, x: 240.0, y: 180.0, radius: 55.0 },
            ],
            features: vec![
                TerrainFeature { kind: FeatureKind::Rock, x: -40.0, y: 0.0, scale: 1.2 },
                TerrainFeature { kind: FeatureKind::Plant, x: 90.0, y: 0.0, scale: 1.0 },
                TerrainFeature { kind: FeatureKind::Crystal, x: 180.0, y: 0.0, scale: 0.9 },
            ],
        };
        let items = vec![
            DroppedItem { id: 700, x: 30.0, y: -4.0, kind: ItemKind::Fuel },
            DroppedItem { id: 701, x: -110.0, y: -4.0, kind: ItemKind::Relic },
        ];
        let creatures = vec![
            CreatureView {
                id: 800,
                x: 140.0,
                y: -8.0,
                angle: 0.0,
                kind: CreatureKind::Grazer,
                hostile: false,
            },
            CreatureView {
                id: 801,
                x: -220.0,
                y: -8.0,
                angle: std::f32::consts::PI,
                kind: CreatureKind::Stalker,
                hostile: true,
            },
        ];

        DemoSim {
            world,
            mode: Mode::Space,
            player: ActorView {
                x: 400.0,
                y: 0.0,
                health: 1.0,
                ..ActorView::default()
            },
            zoom: 1.0,
            planets,
            stars,
            surface,
            items,
            creatures,
            interior: default_interior(),
            in_planet_ship: false,
            ship_progress: 0.0,
            fx_queue: Vec::new(),
            next_shot_id: 1000,
            shot_cooldown: 0.0,
            time_s: 0.0,
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.1, 4.0);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Advance one fixed tic with the given input.
    pub fn tick(&mut self, cmd: InputCmd) {
        self.time_s += DT;
        if cmd.cycle_mode {
            self.mode = match self.mode {
                Mode::Space => Mode::Planet,
                Mode::Planet => Mode::Interior,
                Mode::Interior => Mode::Space,
            };
        }
        systems::player_motion(&mut self.player, cmd, self.mode, DT);
        systems::enemy_orbits(&mut self.world, self.time_s);
        systems::integrate(&mut self.world, DT);
        systems::expire_shots(&mut self.world, DT, &mut self.fx_queue);

        // demo craft toggles between landed and lifting on the surface
        if self.mode == Mode::Planet {
            self.in_planet_ship = cmd.thrust > 0.2 || self.ship_progress > 0.01;
            let target = if cmd.thrust > 0.2 { 1.0 } else { 0.0 };
            self.ship_progress += (target - self.ship_progress).clamp(-DT, DT);
        }

        self.shot_cooldown -= DT;
        if cmd.fire && self.shot_cooldown <= 0.0 {
            self.shot_cooldown = 0.18;
            let dir = vec2(self.player.angle.cos(), self.player.angle.sin());
            let pos = vec2(self.player.x, self.player.y) + dir * 16.0;
            let vel = vec2(self.player.vx, self.player.vy) + dir * 420.0;
            let id = self.next_shot_id;
            self.next_shot_id += 1;
            self.world.spawn((
                Pos(pos),
                Vel(vel),
                Shot {
                    id,
                    radius: 2.0,
                    ammo: Ammo::Plasma,
                    hostile: false,
                    ttl: 1.4,
                },
            ));
        }
    }
}

fn default_interior() -> ShipInterior {
    ShipInterior {
        rooms: vec![
            Room { x: -80.0, y: -50.0, w: 90.0, h: 100.0, light: 0xFF78AAFF },
            Room { x: 10.0, y: -50.0, w: 70.0, h: 46.0, light: 0xFFFFAA60 },
            Room { x: 10.0, y: 4.0, w: 70.0, h: 46.0, light: 0xFF9ACB8E },
        ],
        walls: vec![
            Wall { x0: -80.0, y0: -50.0, x1: 80.0, y1: -50.0 },
            Wall { x0: -80.0, y0: 50.0, x1: 80.0, y1: 50.0 },
            Wall { x0: -80.0, y0: -50.0, x1: -80.0, y1: 50.0 },
            Wall { x0: 80.0, y0: -50.0, x1: 80.0, y1: 50.0 },
            Wall { x0: 10.0, y0: -50.0, x1: 10.0, y1: 50.0 },
        ],
        doors: vec![Door {
            x: 10.0,
            y: -2.0,
            vertical: true,
            open: 0.6,
        }],
        stations: vec![
            Station { x: -60.0, y: -30.0, kind: StationKind::Helm, active: true },
            Station { x: 40.0, y: -30.0, kind: StationKind::Engine, active: false },
            Station { x: 40.0, y: 30.0, kind: StationKind::Cargo, active: false },
        ],
    }
}

impl RenderSession for DemoSim {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn camera(&self) -> Camera {
        match self.mode {
            Mode::Interior => Camera::new(0.0, 0.0, 3.0),
            _ => Camera::new(self.player.x, self.player.y, self.zoom),
        }
    }

    fn player(&self) -> Option<PlayerView> {
        Some(PlayerView {
            actor: self.player,
            level: 3,
            experience: 420,
            perks: 2,
        })
    }

    fn enemies(&self, out: &mut Vec<EnemyView>) {
        if self.mode != Mode::Space {
            return;
        }
        for (_, (pos, vel, heading, enemy)) in
            &mut self.world.query::<(&Pos, &Vel, &Heading, &Enemy)>()
        {
            out.push(EnemyView {
                id: enemy.id,
                actor: ActorView {
                    x: pos.0.x,
                    y: pos.0.y,
                    vx: vel.0.x,
                    vy: vel.0.y,
                    angle: heading.0,
                    thrust: 1.0,
                    health: 0.8,
                    ..ActorView::default()
                },
                faction: enemy.faction,
            });
        }
    }

    fn projectiles(&self, out: &mut Vec<ProjectileView>) {
        for (_, (pos, shot)) in &mut self.world.query::<(&Pos, &Shot)>() {
            out.push(ProjectileView {
                x: pos.0.x,
                y: pos.0.y,
                radius: shot.radius,
            });
        }
    }

    fn stars(&self, out: &mut Vec<StarView>) {
        if self.mode == Mode::Space {
            out.extend_from_slice(&self.stars);
        }
    }

    fn planets(&self, out: &mut Vec<PlanetView>) {
        if self.mode == Mode::Space {
            out.extend_from_slice(&self.planets);
        }
    }

    fn caps(&self) -> Capabilities {
        Capabilities::PLANET_SURFACE
            | Capabilities::DROPPED_ITEMS
            | Capabilities::SHIP_INTERIOR
            | Capabilities::DETAILED_PROJECTILES
            | Capabilities::FX_EVENTS
            | Capabilities::PLANET_SHIP
    }

    fn planet_surface(&self) -> Option<SurfaceView> {
        (self.mode == Mode::Planet).then(|| self.surface.clone())
    }

    fn creatures(&self, out: &mut Vec<CreatureView>) {
        if self.mode == Mode::Planet {
            out.extend_from_slice(&self.creatures);
        }
    }

    fn dropped_items(&self, out: &mut Vec<DroppedItem>) {
        if self.mode == Mode::Planet {
            out.extend_from_slice(&self.items);
        }
    }

    fn in_planet_ship(&self) -> bool {
        self.in_planet_ship
    }

    fn in_planet_ship_progress(&self) -> f32 {
        self.ship_progress
    }

    fn ship_interior(&self) -> Option<ShipInterior> {
        (self.mode == Mode::Interior).then(|| self.interior.clone())
    }

    fn projectiles_detailed(&self, out: &mut Vec<ProjectileDetail>) {
        for (_, (pos, vel, shot)) in &mut self.world.query::<(&Pos, &Vel, &Shot)>() {
            out.push(ProjectileDetail {
                id: shot.id,
                x: pos.0.x,
                y: pos.0.y,
                vx: vel.0.x,
                vy: vel.0.y,
                radius: shot.radius,
                hostile: shot.hostile,
                ammo: shot.ammo,
            });
        }
    }

    fn take_fx_events(&mut self, out: &mut Vec<FxEvent>) {
        out.append(&mut self.fx_queue);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
