mod camera;
mod session;
mod views;

pub use camera::{Camera, ViewSize};
pub use session::{Capabilities, FrameInput, RenderSession};
pub use views::{
    ActorView, Ammo, Biome, CreatureKind, CreatureView, Door, DroppedItem, EnemyView, Faction,
    FeatureKind, FxEvent, FxKind, ItemKind, Mode, PlanetView, PlayerView, ProjectileDetail,
    ProjectileView, Room, ShipInterior, StarView, Station, StationKind, SurfaceView,
    TerrainFeature, Wall, WaterBody,
};
