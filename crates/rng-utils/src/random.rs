use rand::RngCore;
use rand_core::OsRng;

/// Generates `len` cryptographically secure random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generates a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes_fixed<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Samples a uniform value in `[0.0, 1.0)` from the OS RNG.
///
/// Used by stochastic selection strategies (e.g. knapsack coin selection)
/// that decide per-item inclusion against a fixed probability threshold.
pub fn random_unit_interval() -> f64 {
    let mut buf = [0u8; 8];
    OsRng.fill_bytes(&mut buf);
    (u64::from_le_bytes(buf) >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}
