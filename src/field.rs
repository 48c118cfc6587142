//! Arithmetic in GF(2^8).
//!
//! Elements are bytes. Addition is XOR; multiplication is carry-less
//! multiplication reduced by the irreducible polynomial
//! `x^8 + x^4 + x^3 + x^2 + 1` (`0x11d`), with `0x02` as primitive element.
//! This is the field of the `gf256` crate's `gf256` type; products and
//! quotients here match `gf256::gf256` bit for bit.
//!
//! Multiplication and division go through log/exp tables that are built once
//! per process on first use and never written again.

use lazy_static::lazy_static;

use crate::error::{Result, SharingError};

/// Reduction polynomial defining the field.
pub const POLYNOMIAL: u16 = 0x11d;

/// Primitive element the log/exp tables are built over.
pub const GENERATOR: u8 = 0x02;

lazy_static! {
    static ref TABLES: Tables = Tables::build();
}

/// Log/exp lookup tables over [`GENERATOR`].
///
/// `exp` is stored twice over so that `exp[log a + log b]` is always in range
/// without reducing the index modulo 255.
pub struct Tables {
    exp: [u8; 510],
    log: [u8; 256],
}

impl Tables {
    fn build() -> Self {
        let mut exp = [0u8; 510];
        let mut log = [0u8; 256];

        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            exp[i + 255] = x as u8;
            log[x as usize] = i as u8;

            // multiply by the generator and reduce
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= POLYNOMIAL;
            }
        }

        Tables { exp, log }
    }

    /// Returns the process-wide tables, building them on first call.
    pub fn get() -> &'static Tables {
        &TABLES
    }

    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
    }

    pub fn div(&self, a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(SharingError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        Ok(self.exp[self.log[a as usize] as usize + 255 - self.log[b as usize] as usize])
    }

    pub fn inverse(&self, a: u8) -> Result<u8> {
        if a == 0 {
            return Err(SharingError::DivisionByZero);
        }
        Ok(self.exp[255 - self.log[a as usize] as usize])
    }

    pub fn pow(&self, a: u8, e: u32) -> u8 {
        if e == 0 {
            return 1;
        }
        if a == 0 {
            return 0;
        }
        let l = (self.log[a as usize] as u64 * e as u64) % 255;
        self.exp[l as usize]
    }
}

/// Field addition. Also field subtraction, the field has characteristic 2.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

#[inline]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

pub fn mul(a: u8, b: u8) -> u8 {
    Tables::get().mul(a, b)
}

/// Divides `a` by `b`, failing with [`SharingError::DivisionByZero`] when `b` is 0.
pub fn div(a: u8, b: u8) -> Result<u8> {
    Tables::get().div(a, b)
}

/// Multiplicative inverse. 0 has none.
pub fn inverse(a: u8) -> Result<u8> {
    Tables::get().inverse(a)
}

pub fn pow(a: u8, e: u32) -> u8 {
    Tables::get().pow(a, e)
}
