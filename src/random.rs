//! Randomness sources for share generation.
//!
//! Split draws polynomial coefficients and x-coordinates through the
//! [`RandomSource`] trait so callers can inject their own generator. Only
//! cryptographic generators can be wrapped by [`CryptoSource`]; anything else
//! (fixed byte streams in tests, hardware tokens) implements the trait itself.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::Result;

/// A supplier of unpredictable bytes.
pub trait RandomSource {
    /// Fills `dest` entirely, or fails without a partial guarantee.
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;

    fn random_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    fn random_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.fill(&mut byte)?;
        Ok(byte[0])
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

/// Adapts a `rand` cryptographic generator.
#[derive(Debug, Clone, Default)]
pub struct CryptoSource<R>(pub R);

impl<R: RngCore + CryptoRng> CryptoSource<R> {
    pub fn new(rng: R) -> Self {
        CryptoSource(rng)
    }
}

impl<R: RngCore + CryptoRng> RandomSource for CryptoSource<R> {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.0.try_fill_bytes(dest)?;
        Ok(())
    }
}

/// The operating system's generator; the default for [`crate::sss::split`].
pub type OsRandom = CryptoSource<OsRng>;
