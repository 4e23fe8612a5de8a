//! Mersenne Twister (MT19937) random number generator.
//!
//! Every stochastic decision in the simulation draws from a single [`Mt19937`],
//! so a run is fully determined by its seed.

use anyhow::{Result, bail};
use rand::{RngCore, SeedableRng, rand_core::impls};

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// Seed used when a draw is requested from an unseeded generator.
pub const DEFAULT_SEED: u32 = 5489;

/// 32-bit Mersenne Twister.
///
/// A generator created with [`Mt19937::new`] is unseeded and seeds itself
/// with [`DEFAULT_SEED`] on its first draw.
#[derive(Clone)]
pub struct Mt19937 {
    mt: [u32; N],
    mti: usize,
}

impl Mt19937 {
    /// Create an unseeded generator.
    pub fn new() -> Self {
        Self {
            mt: [0; N],
            mti: N + 1,
        }
    }

    /// Create a generator seeded with a single value.
    pub fn with_seed(seed: u32) -> Self {
        let mut rng = Self::new();
        rng.seed(seed);
        rng
    }

    /// Create a generator seeded with a key.
    pub fn with_key(key: &[u32]) -> Result<Self> {
        let mut rng = Self::new();
        rng.seed_array(key)?;
        Ok(rng)
    }

    pub fn is_seeded(&self) -> bool {
        self.mti <= N
    }

    /// Initialize the state from a single value.
    pub fn seed(&mut self, seed: u32) {
        self.mt[0] = seed;
        for i in 1..N {
            let prev = self.mt[i - 1];
            self.mt[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.mti = N;
    }

    /// Initialize the state from a key of arbitrary length.
    pub fn seed_array(&mut self, key: &[u32]) -> Result<()> {
        if key.is_empty() {
            bail!("seed key must not be empty");
        }

        self.seed(19_650_218);

        let mut i = 1;
        let mut j = 0;
        for _ in 0..N.max(key.len()) {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                self.mt[0] = self.mt[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                self.mt[0] = self.mt[N - 1];
                i = 1;
            }
        }

        // Most significant bit set so the state is never all zeros.
        self.mt[0] = 0x8000_0000;

        Ok(())
    }

    /// Seed with [`DEFAULT_SEED`] unless already seeded.
    pub fn ensure_seeded(&mut self) {
        if !self.is_seeded() {
            self.seed(DEFAULT_SEED);
        }
    }

    /// Next output on the `[0, 0xffffffff]` interval.
    pub fn next_uint32(&mut self) -> u32 {
        if self.mti >= N {
            self.ensure_seeded();
            self.twist();
        }

        let mut y = self.mt[self.mti];
        self.mti += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn twist(&mut self) {
        let mag01 = |y: u32| if y & 1 == 0 { 0 } else { MATRIX_A };
        for kk in 0..N {
            let y = (self.mt[kk] & UPPER_MASK) | (self.mt[(kk + 1) % N] & LOWER_MASK);
            self.mt[kk] = self.mt[(kk + M) % N] ^ (y >> 1) ^ mag01(y);
        }
        self.mti = 0;
    }

    /// Next output on the `[0, 0x7fffffff]` interval.
    pub fn next_int31(&mut self) -> u32 {
        self.next_uint32() >> 1
    }

    /// Uniform draw on `[0, 1]`.
    pub fn next_real_closed(&mut self) -> f64 {
        self.next_uint32() as f64 * (1.0 / 4_294_967_295.0)
    }

    /// Uniform draw on `[0, 1)`.
    pub fn next_real_half_open(&mut self) -> f64 {
        self.next_uint32() as f64 * (1.0 / 4_294_967_296.0)
    }

    /// Uniform draw on `(0, 1)`.
    pub fn next_real_open(&mut self) -> f64 {
        (self.next_uint32() as f64 + 0.5) * (1.0 / 4_294_967_296.0)
    }

    /// Uniform draw on `[0, 1)` with 53-bit resolution, consuming two outputs.
    pub fn next_res53(&mut self) -> f64 {
        let a = (self.next_uint32() >> 5) as f64;
        let b = (self.next_uint32() >> 6) as f64;
        (a * 67_108_864.0 + b) * (1.0 / 9_007_199_254_740_992.0)
    }

    /// Uniform float computed as `a + (b - a) * u` with `u` on `[0, 1]`.
    pub fn uniform_float(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.next_real_closed()
    }

    /// Truncation of [`Mt19937::uniform_float`] towards zero.
    ///
    /// Reaches `b` only when `u` is exactly 1.
    pub fn uniform_int(&mut self, a: i32, b: i32) -> i32 {
        self.uniform_float(a as f64, b as f64) as i32
    }
}

impl Default for Mt19937 {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        self.next_uint32()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Mt19937 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(u32::from_le_bytes(seed))
    }
}
