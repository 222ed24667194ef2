use std::f64::consts::TAU;

const MODULUS: u64 = 2_147_483_648;

/// Seeded linear congruential generator. Cheap, deterministic per seed, good
/// enough for scattering particles.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng { state: seed % MODULUS }
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345)) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Uniform value in `[-spread / 2, spread / 2)`.
    pub fn centered(&mut self, spread: f64) -> f64 {
        (self.next_f64() - 0.5) * spread
    }

    pub fn angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.index(items.len())]
    }

    /// Independent generator seeded from this one.
    pub fn fork(&mut self) -> Rng {
        let hi = (self.next_f64() * MODULUS as f64) as u64;
        let lo = (self.next_f64() * MODULUS as f64) as u64;
        Rng::new(hi ^ (lo << 7))
    }
}
