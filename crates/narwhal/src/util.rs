//! Deterministic randomness and small numeric helpers.

/// xorshift64* generator standing in for JS `Math.random` in seeded runs.
///
/// Same constants and 53-bit float mapping as the seeded upstream baselines: a float is
/// `nextU64() >> 11` scaled into `[0, 1)`, and index selection floors `random * upper`.
#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `(-1, 1)`.
    pub fn next_f64_signed(&mut self) -> f64 {
        (self.next_f64_unit() * 2.0) - 1.0
    }
}

/// Seed used when the caller did not pin one. Derived from the clock; the chosen value is
/// stored on the layout engine so a run can be reproduced.
pub fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64 ^ (d.as_secs() << 20))
        .unwrap_or(0x9E3779B9);
    nanos.max(1)
}

/// Deterministic unit vector for coincident points, spread by index so stacked nodes
/// separate in different directions.
pub fn fallback_direction(index: usize) -> (f64, f64) {
    let angle = (index as f64) * 0.618_034 * std::f64::consts::TAU;
    (angle.cos(), angle.sin())
}
