use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Per-worker deterministic RNG: splitmix64 mixing of a master seed and the
/// worker index, so parallel sweep rows get independent reproducible streams.
pub fn worker_rng(master: u64, worker_id: usize) -> ChaCha20Rng {
    let mut x = master ^ ((worker_id as u64).wrapping_mul(0x9E3779B97F4A7C15));
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    ChaCha20Rng::seed_from_u64(x)
}
