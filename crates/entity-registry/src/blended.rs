//! Blended random number generator.
//!
//! Mixes the unit-interval output of two generators with a fixed blend factor.
//! A factor of 1.0 uses only the first generator, 0.0 only the second.

use rand::RngCore;

use crate::error::SamplingError;

const UNIT_BITS: u32 = 53;

/// Random number generator blending two other generators.
#[derive(Debug, Clone)]
pub struct BlendedRng<A, B> {
    first: A,
    second: B,
    blend: f64,
}

impl<A: RngCore, B: RngCore> BlendedRng<A, B> {
    /// Creates a blended generator. `blend` must lie in `[0, 1]`.
    pub fn new(first: A, second: B, blend: f64) -> Result<Self, SamplingError> {
        if !(0.0..=1.0).contains(&blend) {
            return Err(SamplingError::BlendOutOfRange(blend));
        }
        Ok(Self {
            first,
            second,
            blend,
        })
    }

    pub fn blend(&self) -> f64 {
        self.blend
    }

    /// Returns a value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let a = unit_f64(self.first.next_u64());
        let b = unit_f64(self.second.next_u64());
        (a * self.blend + b * (1.0 - self.blend)) % 1.0
    }

    /// Returns an integer in `[min, max)`. An empty range returns `min`.
    pub fn range(&mut self, min: i32, max: i32) -> Result<i32, SamplingError> {
        if max < min {
            return Err(SamplingError::InvertedRange { min, max });
        }
        let span = i64::from(max) - i64::from(min);
        let value = i64::from(min) + (self.next_f64() * span as f64) as i64;
        Ok(value as i32)
    }

    /// Returns an integer in `[0, max)`.
    pub fn below(&mut self, max: i32) -> Result<i32, SamplingError> {
        if max <= 0 {
            return Err(SamplingError::EmptyRange(max));
        }
        self.range(0, max)
    }
}

/// Same mapping `rand` uses for `gen::<f64>()`.
fn unit_f64(bits: u64) -> f64 {
    (bits >> (64 - UNIT_BITS)) as f64 * (1.0 / (1u64 << UNIT_BITS) as f64)
}

impl<A: RngCore, B: RngCore> RngCore for BlendedRng<A, B> {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    // Encodes the blended value in the high bits so `gen::<f64>()` yields it back
    fn next_u64(&mut self) -> u64 {
        let unit = self.next_f64();
        ((unit * (1u64 << UNIT_BITS) as f64) as u64) << (64 - UNIT_BITS)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
