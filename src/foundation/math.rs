use glam::Vec3;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Stable seed derived from a name, used when a config omits an explicit seed.
pub fn seed_from_name(name: &str) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(name.as_bytes());
    h.finish()
}

/// SplitMix64 generator. Identical seeds always produce identical streams.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator keyed by `(seed, index)`; used for random-access keyframe grids.
    pub fn keyed(seed: u64, index: i64) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_u64(seed);
        h.write_u64(index as u64);
        Self::new(h.finish())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform in `[-1, 1)`.
    pub fn next_signed(&mut self) -> f64 {
        self.next_f64_01() * 2.0 - 1.0
    }

    /// Uniform point inside the unit ball, by rejection from the enclosing cube.
    pub fn next_in_unit_ball(&mut self) -> Vec3 {
        loop {
            let x = self.next_signed() as f32;
            let y = self.next_signed() as f32;
            let z = self.next_signed() as f32;
            let v = Vec3::new(x, y, z);
            if v.length_squared() <= 1.0 {
                return v;
            }
        }
    }
}

pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
