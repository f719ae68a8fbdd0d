//! Read-only snapshot types handed to the compositor.
//!
//! These are *views*: position/velocity values sampled at render time by the
//! owning simulation.  The renderer never integrates motion, never mutates a
//! view, and keeps none of them beyond the frame.

/// Which composition pipeline runs this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Space,
    Planet,
    Interior,
}

impl Mode {
    /// Lenient parse for session/config strings; unknown values fall back to
    /// `Space` rather than failing the frame.
    pub fn parse(s: &str) -> Mode {
        match s {
            "planet" => Mode::Planet,
            "ship" | "interior" => Mode::Interior,
            "space" => Mode::Space,
            other => {
                log::warn!("unknown mode `{other}`, defaulting to space");
                Mode::Space
            }
        }
    }
}

/// Planet surface climate; drives ground tiles and decoration density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Fields,
    Desert,
    Rainforest,
    Archipelago,
}

impl Biome {
    /// Unknown biome strings coerce to `Fields` (the documented default).
    pub fn parse(s: &str) -> Biome {
        match s {
            "fields" => Biome::Fields,
            "desert" => Biome::Desert,
            "rainforest" => Biome::Rainforest,
            "archipelago" => Biome::Archipelago,
            other => {
                log::warn!("unknown biome `{other}`, defaulting to fields");
                Biome::Fields
            }
        }
    }
}

/// Kinematics common to anything that moves and gets drawn.
///
/// `hit_flash` and `swing` are progress values in `0..=1` while the effect is
/// running, `None` otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    /// Current thrust in `0..=1` of rated power (boost may exceed 1).
    pub thrust: f32,
    pub boost: bool,
    /// Health fraction in `0..=1`.
    pub health: f32,
    pub hit_flash: Option<f32>,
    pub swing: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerView {
    pub actor: ActorView,
    pub level: u32,
    pub experience: u32,
    pub perks: u32,
}

/// Hostile faction, used only to pick tint/trail colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Pirate,
    Sentinel,
    Feral,
}

#[derive(Clone, Copy, Debug)]
pub struct EnemyView {
    pub id: u64,
    pub actor: ActorView,
    pub faction: Faction,
}

/// Minimal projectile view every session provides.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Ammunition flavor; colors projectiles and their trails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ammo {
    Kinetic,
    Plasma,
    Ion,
}

/// Extended projectile view for sessions that can attribute shots.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileDetail {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub hostile: bool,
    pub ammo: Ammo,
}

#[derive(Clone, Copy, Debug)]
pub struct StarView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Packed 0xAARRGGBB surface color.
    pub color: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PlanetView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub biome: Biome,
    /// True while the player craft sits on this planet's pad.
    pub landed: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct WaterBody {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Rock,
    Plant,
    Ruin,
    Crystal,
}

#[derive(Clone, Copy, Debug)]
pub struct TerrainFeature {
    pub kind: FeatureKind,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Everything needed to compose one planet surface.
#[derive(Clone, Debug)]
pub struct SurfaceView {
    pub planet_id: u64,
    pub biome: Biome,
    pub waters: Vec<WaterBody>,
    pub features: Vec<TerrainFeature>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Scrap,
    Fuel,
    Relic,
}

#[derive(Clone, Copy, Debug)]
pub struct DroppedItem {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureKind {
    Grazer,
    Stalker,
    Skimmer,
}

#[derive(Clone, Copy, Debug)]
pub struct CreatureView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub kind: CreatureKind,
    pub hostile: bool,
}

/*──────────────────────── ship interior ────────────────────────*/

#[derive(Clone, Copy, Debug)]
pub struct Room {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Packed 0xAARRGGBB ambient light color for the room's glow.
    pub light: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Wall {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Door {
    pub x: f32,
    pub y: f32,
    pub vertical: bool,
    /// 0 = shut, 1 = fully open.
    pub open: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationKind {
    Helm,
    Engine,
    Cargo,
    Bunk,
}

#[derive(Clone, Copy, Debug)]
pub struct Station {
    pub x: f32,
    pub y: f32,
    pub kind: StationKind,
    pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ShipInterior {
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub stations: Vec<Station>,
}

/*──────────────────────── one-shot FX events ────────────────────────*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FxKind {
    Burn,
    Spark,
}

/// One-shot event the simulation queues for the renderer to turn into a
/// self-expiring visual.  Delivered through the destructive session drain.
#[derive(Clone, Copy, Debug)]
pub struct FxEvent {
    pub kind: FxKind,
    pub x: f32,
    pub y: f32,
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strings_coerce_to_defaults() {
        assert_eq!(Mode::parse("space"), Mode::Space);
        assert_eq!(Mode::parse("hyperspace"), Mode::Space);
        assert_eq!(Mode::parse("ship"), Mode::Interior);
        assert_eq!(Biome::parse("desert"), Biome::Desert);
        assert_eq!(Biome::parse("lava"), Biome::Fields);
    }
}
