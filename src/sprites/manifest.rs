//! Asset manifest: what sprite files exist, and which file a
//! `(key, variant)` request resolves to.
//!
//! Layout on disk is `<root>/<key>/<variant>.png`, with optional numbered
//! animation frames `<variant>-<N>.png`.  The manifest is built by a single
//! directory scan; resolution afterwards is pure lookup, so the fallback
//! chain is bit-for-bit reproducible for a given scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// `<variant>-<N>` numbered frame stems.
static FRAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)-(\d+)$").unwrap());

/// Sorted file stems per sprite key.
#[derive(Debug, Default)]
pub struct Manifest {
    root: PathBuf,
    /// key → sorted stems (no extension).  Sorted once at build time so
    /// "lexicographically first" is a stable index-0 pick.
    keys: HashMap<String, Vec<String>>,
}

impl Manifest {
    /// Scan `root` once.  Unreadable directories simply contribute no
    /// entries; a missing root yields an empty manifest (every resolve
    /// misses, every draw degrades to fallback geometry).
    pub fn scan(root: &Path) -> Manifest {
        let mut keys: HashMap<String, Vec<String>> = HashMap::new();
        let Ok(dirs) = std::fs::read_dir(root) else {
            log::warn!("sprite root {} not readable, using fallbacks", root.display());
            return Manifest {
                root: root.to_path_buf(),
                keys,
            };
        };
        for dir in dirs.flatten() {
            let key_path = dir.path();
            if !key_path.is_dir() {
                continue;
            }
            let Some(key) = key_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let mut stems = Vec::new();
            if let Ok(files) = std::fs::read_dir(&key_path) {
                for f in files.flatten() {
                    let p = f.path();
                    if p.extension().and_then(|e| e.to_str()) != Some("png") {
                        continue;
                    }
                    if let Some(stem) = p.file_stem().and_then(|s| s.to_str()) {
                        stems.push(stem.to_string());
                    }
                }
            }
            if !stems.is_empty() {
                stems.sort();
                keys.insert(key.to_string(), stems);
            }
        }
        log::debug!("sprite manifest: {} keys under {}", keys.len(), root.display());
        Manifest {
            root: root.to_path_buf(),
            keys,
        }
    }

    /// Build from `(key, stem)` pairs; resolution tests use this to avoid
    /// touching the filesystem.
    pub fn from_entries<'a, I: IntoIterator<Item = (&'a str, &'a str)>>(entries: I) -> Manifest {
        let mut keys: HashMap<String, Vec<String>> = HashMap::new();
        for (key, stem) in entries {
            keys.entry(key.to_string()).or_default().push(stem.to_string());
        }
        for stems in keys.values_mut() {
            stems.sort();
        }
        Manifest {
            root: PathBuf::new(),
            keys,
        }
    }

    /// Resolve `(key, variant)` to a file stem.
    ///
    /// Chain: exact `variant` → first numbered frame `variant-N` → first stem
    /// under the key at all → `None`.  Callers fall back to solid-color
    /// geometry on `None`; resolution never errors.
    pub fn resolve_stem(&self, key: &str, variant: &str) -> Option<&str> {
        let stems = self.keys.get(key)?;
        if let Some(s) = stems.iter().find(|s| s.as_str() == variant) {
            return Some(s);
        }
        if let Some(s) = stems.iter().find(|s| {
            FRAME_RE
                .captures(s)
                .is_some_and(|c| &c[1] == variant)
        }) {
            return Some(s);
        }
        stems.first().map(|s| s.as_str())
    }

    /// Full path for a resolved `(key, variant)`.
    pub fn resolve(&self, key: &str, variant: &str) -> Option<PathBuf> {
        let stem = self.resolve_stem(key, variant)?;
        Some(self.root.join(key).join(format!("{stem}.png")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        Manifest::from_entries([
            ("ship", "classic"),
            ("ship", "art-deco"),
            ("thruster", "classic-2"),
            ("thruster", "classic-10"),
            ("creature-hostile", "zebra"),
        ])
    }

    #[test]
    fn exact_variant_wins() {
        let m = sample();
        assert_eq!(m.resolve_stem("ship", "art-deco"), Some("art-deco"));
    }

    #[test]
    fn numbered_frame_fallback_is_lexicographic_first() {
        let m = sample();
        // "classic-10" sorts before "classic-2"
        assert_eq!(m.resolve_stem("thruster", "classic"), Some("classic-10"));
    }

    #[test]
    fn unknown_variant_falls_back_to_any_asset() {
        let m = sample();
        assert_eq!(m.resolve_stem("ship", "neon"), Some("art-deco"));
        assert_eq!(m.resolve_stem("creature-hostile", "classic"), Some("zebra"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(sample().resolve_stem("station", "classic"), None);
    }

    #[test]
    fn resolution_is_stable_across_rebuilds() {
        let a = sample();
        let b = sample();
        for (key, var) in [("ship", "neon"), ("thruster", "classic")] {
            assert_eq!(a.resolve_stem(key, var), b.resolve_stem(key, var));
        }
    }
}
