//! stardrift_rs — a space/planet exploration sandbox whose heart is a
//! layered 2D render compositor.
//!
//! The simulation owns world truth; the compositor turns a read-only
//! per-frame snapshot ([`scene::RenderSession`]) into pixels through a
//! backend-agnostic [`gfx::Surface`], keeping only visual state of its own:
//! motion trails, fading flares, smoothed scales, sprite and decoration
//! caches.  See `compose` for the per-mode pipelines.

pub mod compose;
pub mod decor;
pub mod fx;
pub mod gfx;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod sprites;

pub use compose::Compositor;
pub use gfx::{RasterSurface, Surface};
pub use scene::{Camera, RenderSession, ViewSize};
pub use sprites::{SpriteBank, ThemeConfig};
