//! Sprite bank: logical key + theme variant → drawable bitmap.
//!
//! The compositor asks for sprites by *key* (`"ship"`, `"thruster"`,
//! `"creature-hostile"`); the bank picks the file for the active theme via
//! the manifest's fallback chain, hands out a stable [`SpriteId`], and
//! decodes pixels on a background thread.  Everything here is instance
//! state — two compositors never share a bank, so parallel sessions cannot
//! corrupt each other's caches.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod loader;
pub mod manifest;

use crate::gfx::Bitmap;
use loader::Loader;
use manifest::Manifest;

/// Runtime sprite handle, stable for the lifetime of the bank.
pub type SpriteId = u16;

/// Sentinel for "key resolved to nothing"; drawing it is a no-op.
pub const NO_SPRITE: SpriteId = SpriteId::MAX;

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("sprite io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprite decode: {0}")]
    Decode(#[from] image::ImageError),
}

/// Active theme selection, owned by one bank instance.
#[derive(Clone, Debug)]
pub struct ThemeConfig {
    pub default_variant: String,
    pub overrides: HashMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            default_variant: "classic".into(),
            overrides: HashMap::new(),
        }
    }
}

impl ThemeConfig {
    pub fn variant_for<'a>(&'a self, key: &str) -> &'a str {
        self.overrides
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_variant)
    }
}

enum Slot {
    Pending,
    Ready(Bitmap),
    Failed,
}

pub struct SpriteBank {
    manifest: Manifest,
    theme: ThemeConfig,
    loader: Option<Loader>,

    /// resolved path → handle; survives theme changes (pixels don't depend
    /// on how we got to the file).
    by_path: HashMap<PathBuf, SpriteId>,
    slots: Vec<Slot>,

    /// key → handle under the *current* theme.  Derived; cleared on any
    /// theme mutation.
    key_cache: HashMap<String, SpriteId>,
    /// key → width/height of the resolved asset.  Derived; cleared with
    /// `key_cache` because a different variant may be cropped differently.
    aspect_cache: HashMap<String, f32>,
    completions: Vec<(SpriteId, Result<Bitmap, SpriteError>)>,
}

impl SpriteBank {
    /// Bank over an on-disk asset tree, with the background decoder running.
    pub fn new(root: &Path, theme: ThemeConfig) -> SpriteBank {
        SpriteBank {
            manifest: Manifest::scan(root),
            theme,
            loader: Some(Loader::spawn()),
            by_path: HashMap::new(),
            slots: Vec::new(),
            key_cache: HashMap::new(),
            aspect_cache: HashMap::new(),
            completions: Vec::new(),
        }
    }

    /// Bank with no assets and no worker; every resolve misses.  Headless
    /// tests and the snapshot tool's fallback path use this.
    pub fn empty() -> SpriteBank {
        SpriteBank {
            manifest: Manifest::default(),
            theme: ThemeConfig::default(),
            loader: None,
            by_path: HashMap::new(),
            slots: Vec::new(),
            key_cache: HashMap::new(),
            aspect_cache: HashMap::new(),
            completions: Vec::new(),
        }
    }

    #[cfg(test)]
    fn with_manifest(manifest: Manifest) -> SpriteBank {
        SpriteBank {
            manifest,
            ..SpriteBank::empty()
        }
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Swap the whole theme.  Derived caches (key resolution, crop aspect)
    /// are invalidated; decoded pixels are kept.
    pub fn set_theme(&mut self, theme: ThemeConfig) {
        self.theme = theme;
        self.key_cache.clear();
        self.aspect_cache.clear();
    }

    /// Override the variant for one key.
    pub fn set_override(&mut self, key: &str, variant: &str) {
        self.theme.overrides.insert(key.into(), variant.into());
        self.key_cache.clear();
        self.aspect_cache.clear();
    }

    /// Re-scan the asset tree, picking up added or replaced files.  Derived
    /// caches reset; decoded pixels for already-resolved paths are kept.
    pub fn reload(&mut self) {
        if self.loader.is_some() {
            let root = self.manifest.root().to_path_buf();
            self.manifest = Manifest::scan(&root);
        }
        self.key_cache.clear();
        self.aspect_cache.clear();
    }

    /// Handle for `key` under the current theme, requesting a background
    /// decode the first time a path is seen.  Never fails: an unresolvable
    /// key yields [`NO_SPRITE`].
    pub fn sprite(&mut self, key: &str) -> SpriteId {
        if let Some(&id) = self.key_cache.get(key) {
            return id;
        }
        let variant = self.theme.variant_for(key).to_string();
        let id = match self.manifest.resolve(key, &variant) {
            None => NO_SPRITE,
            Some(path) => match self.by_path.get(&path) {
                Some(&id) => id,
                None => {
                    let id = self.slots.len() as SpriteId;
                    self.slots.push(Slot::Pending);
                    if let Some(loader) = &self.loader {
                        loader.request(id, path.clone());
                    }
                    self.by_path.insert(path, id);
                    id
                }
            },
        };
        self.key_cache.insert(key.into(), id);
        id
    }

    /// Decoded pixels for a handle, if they have arrived.
    pub fn bitmap(&self, id: SpriteId) -> Option<&Bitmap> {
        match self.slots.get(id as usize) {
            Some(Slot::Ready(bmp)) => Some(bmp),
            _ => None,
        }
    }

    /// Width/height ratio of the resolved asset for `key`; `1.0` until the
    /// pixels are in.  Cached per key, recomputed lazily after theme changes.
    pub fn aspect(&mut self, key: &str) -> f32 {
        if let Some(&a) = self.aspect_cache.get(key) {
            return a;
        }
        let id = self.sprite(key);
        let Some(bmp) = self.bitmap(id) else {
            return 1.0; // not cached: retry once pixels arrive
        };
        let a = bmp.w as f32 / bmp.h.max(1) as f32;
        self.aspect_cache.insert(key.into(), a);
        a
    }

    /// Drain finished decodes into their slots.  Called once per frame by
    /// the compositor, off the drawing path.
    pub fn pump(&mut self) {
        let Some(loader) = &self.loader else { return };
        self.completions.clear();
        loader.poll(&mut self.completions);
        for (id, res) in self.completions.drain(..) {
            if let Some(slot) = self.slots.get_mut(id as usize) {
                *slot = match res {
                    Ok(bmp) => Slot::Ready(bmp),
                    Err(_) => Slot::Failed,
                };
            }
        }
    }

    /// Ready-or-nothing convenience for draw sites.
    pub fn ready(&mut self, key: &str) -> Option<&Bitmap> {
        let id = self.sprite(key);
        self.bitmap(id)
    }

    #[cfg(test)]
    fn insert_ready(&mut self, key: &str, bmp: Bitmap) {
        let id = self.slots.len() as SpriteId;
        self.slots.push(Slot::Ready(bmp));
        self.key_cache.insert(key.into(), id);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> SpriteBank {
        SpriteBank::with_manifest(Manifest::from_entries([
            ("ship", "classic"),
            ("ship", "art-deco"),
            ("thruster", "classic-1"),
        ]))
    }

    #[test]
    fn unknown_variant_resolves_through_fallback_chain() {
        let mut b = bank();
        // "neon" theme, but ship only ships classic/art-deco assets
        b.set_theme(ThemeConfig {
            default_variant: "neon".into(),
            overrides: HashMap::new(),
        });
        let id = b.sprite("ship");
        assert_ne!(id, NO_SPRITE);
    }

    #[test]
    fn missing_key_degrades_to_no_sprite() {
        let mut b = bank();
        assert_eq!(b.sprite("space-whale"), NO_SPRITE);
        assert!(b.bitmap(NO_SPRITE).is_none());
    }

    #[test]
    fn theme_change_invalidates_derived_caches_only() {
        let mut b = bank();
        b.insert_ready("ship", Bitmap::solid(4, 2, 0xFF00_0000));
        assert!((b.aspect("ship") - 2.0).abs() < 1e-6);
        assert!(!b.aspect_cache.is_empty());

        b.set_override("ship", "art-deco");
        assert!(b.key_cache.is_empty());
        assert!(b.aspect_cache.is_empty());
        // decoded slots survive
        assert!(matches!(b.slots[0], Slot::Ready(_)));
    }

    #[test]
    fn same_path_shares_one_slot() {
        let mut b = bank();
        let a = b.sprite("thruster");
        b.key_cache.clear();
        let c = b.sprite("thruster");
        assert_eq!(a, c);
        assert_eq!(b.slots.len(), 1);
    }

    #[test]
    fn empty_bank_is_all_noops() {
        let mut b = SpriteBank::empty();
        assert_eq!(b.sprite("ship"), NO_SPRITE);
        assert!(b.ready("ship").is_none());
        b.pump(); // no worker: must not panic
    }

    #[test]
    fn reload_resets_key_resolution() {
        let mut b = bank();
        assert_ne!(b.sprite("ship"), NO_SPRITE);
        assert!(!b.key_cache.is_empty());
        b.reload(); // no on-disk root here: manifest untouched, caches reset
        assert!(b.key_cache.is_empty());
        assert_ne!(b.sprite("ship"), NO_SPRITE);
    }
}
