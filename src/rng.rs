//! Deterministic seeding for procedural decoration.
//!
//! Every piece of ambient decoration (clouds, birds, shoreline clutter,
//! ground speckle) is placed by a generator seeded from a **stable string
//! key** — planet id, water-body id, tile coordinates — never from the
//! clock or from call order.  Re-rendering the same world object therefore
//! reproduces the same layout, frame after frame and run after run.
//!
//! One hash, one generator, shared by all call sites:
//! * [`fnv1a32`] — FNV-1a, 32-bit (offset 0x811C9DC5, prime 0x01000193).
//! * [`seeded`]  — `ChaCha8Rng` from that hash.  ChaCha8's output stream is
//!   specified by the algorithm, so layouts survive process restarts and
//!   crate upgrades.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 32-bit FNV-1a over the UTF-8 bytes of `key`.
#[inline]
pub fn fnv1a32(key: &str) -> u32 {
    let mut h: u32 = 0x811C_9DC5;
    for &b in key.as_bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}

/// Deterministic generator for the given seed key.
///
/// Callers must consume draws in a fixed, documented order; inserting a new
/// draw in the middle of an existing sequence changes every placement that
/// follows it, which reads as a world-gen change to players.
#[inline]
pub fn seeded(key: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(fnv1a32(key) as u64)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn fnv1a_reference_values() {
        // Published FNV-1a test vectors.
        assert_eq!(fnv1a32(""), 0x811C_9DC5);
        assert_eq!(fnv1a32("a"), 0xE40C_292C);
        assert_eq!(fnv1a32("foobar"), 0xBF9C_F968);
    }

    #[test]
    fn same_key_same_stream() {
        let mut a = seeded("sky-planet-7");
        let mut b = seeded("sky-planet-7");
        for _ in 0..32 {
            assert_eq!(a.r#gen::<u32>(), b.r#gen::<u32>());
        }
    }

    #[test]
    fn different_keys_diverge() {
        let mut a = seeded("shore-12");
        let mut b = seeded("shore-13");
        let same = (0..16)
            .filter(|_| a.r#gen::<u32>() == b.r#gen::<u32>())
            .count();
        assert!(same < 16, "distinct keys should not share a stream");
    }

    #[test]
    fn float_draws_stay_in_unit_range() {
        let mut rng = seeded("tile-3-0-0");
        for _ in 0..64 {
            let v: f32 = rng.gen_range(0.0..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
