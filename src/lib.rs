//! # Threshold Secret Sharing over GF(2^8)
//!
//! This library splits a secret byte string into `n` shares such that any `t`
//! of them reconstruct it exactly, while `t - 1` shares reveal nothing about
//! it. Shares can also be proactively refreshed without changing the secret.
//!
//! ## Shamir's Secret Sharing (SSS)
//!
//! For every byte `S` of the secret the library picks a random polynomial of
//! degree `t-1` over GF(2^8):
//!
//! ```ignore
//! f(x) = S + a1*x + a2*x^2 + ... + a(t-1)*x^(t-1)
//! ```
//!
//! where `a1, ..., a(t-1)` are uniformly random bytes. A share holds the
//! evaluations `f(x)` of every byte's polynomial at one nonzero x-coordinate.
//! With `t` distinct points each polynomial, and so each secret byte, is
//! recovered by Lagrange interpolation at `x = 0`.
//!
//! Shares carry no integrity tag and do not record the threshold. Combining
//! too few shares, or shares of different splits, returns the wrong bytes
//! rather than an error.
//!
//! ## Share format
//!
//! A share is `secret.len() + 1` bytes: the x-coordinate (`1..=255`) followed
//! by one y-value per secret byte. How shares are stored or transported is up
//! to the caller.
//!
//! ### Example: Splitting and Combining
//!
//! ```rust
//! use threshold_sss::{combine, split};
//!
//! let secret = b"correct horse battery staple";
//! let shares = split(secret, 5, 3).unwrap();
//!
//! // any three shares will do
//! let recovered = combine(&[&shares[0], &shares[2], &shares[4]]).unwrap();
//! assert_eq!(recovered, secret);
//! ```
//!
//! ### Example: Deterministic Randomness
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use threshold_sss::random::CryptoSource;
//! use threshold_sss::{combine, split_with};
//!
//! let mut rng = CryptoSource::new(StdRng::seed_from_u64(7));
//! let shares = split_with(b"HI", 3, 2, &mut rng).unwrap();
//! assert_eq!(combine(&shares[1..]).unwrap(), b"HI");
//! ```
//!
//! ### Example: Refreshing Shares
//!
//! ```rust
//! use threshold_sss::random::OsRandom;
//! use threshold_sss::sss::refresh_shares;
//! use threshold_sss::{combine, split};
//!
//! let mut shares = split(b"rotate me", 4, 2).unwrap();
//! refresh_shares(&mut shares, 2, &mut OsRandom::default()).unwrap();
//! assert_eq!(combine(&shares[..2]).unwrap(), b"rotate me");
//! ```

/// Arithmetic in GF(2^8): XOR addition and table driven multiplication,
/// division and inversion.
pub mod field;

/// The `RandomSource` capability that split and refresh draw from, and its
/// adapters for `rand` generators.
pub mod random;

/// Polynomials over GF(2^8) and their evaluation.
pub mod polynomial;

/// The share wire format and its validation.
pub mod share;

/// Split, combine and proactive refresh.
pub mod sss;

pub mod error;

/// Defaults for the command line front end, loaded from `conf.toml` and the
/// environment.
pub mod config;

pub use error::{Result, SharingError};
pub use share::Share;
pub use sss::{combine, split, split_at, split_with};
