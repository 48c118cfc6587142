use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SharingError};
use crate::field;
use crate::polynomial::{horner, Polynomial};
use crate::random::{OsRandom, RandomSource};
use crate::share::{Share, MIN_SHARE_LEN};

/// Largest share count: there are 255 nonzero x-coordinates.
pub const MAX_SHARES: usize = 255;

/// Smallest threshold and share count accepted by [`split`].
pub const MIN_THRESHOLD: usize = 2;

/// Splits a secret into `shares` shares, any `threshold` of which reconstruct
/// it, drawing randomness from the operating system.
///
/// # Arguments
/// * `secret` - The bytes to protect. Must not be empty.
/// * `shares` - The number of shares to create, in `2..=255`.
/// * `threshold` - The number of shares needed to reconstruct, in `2..=shares`.
///
/// # Errors
/// Returns [`SharingError::Configuration`] for out-of-range parameters, before
/// any randomness is drawn.
///
/// # Examples
/// ```rust
/// use threshold_sss::sss::{combine, split};
///
/// let secret = b"hello world";
/// let shares = split(secret, 5, 3).unwrap();
/// let recovered = combine(&shares[1..4]).unwrap();
/// assert_eq!(recovered, secret);
/// ```
pub fn split(secret: &[u8], shares: usize, threshold: usize) -> Result<Vec<Share>> {
    split_with(secret, shares, threshold, &mut OsRandom::default())
}

/// Like [`split`] but with a caller supplied randomness source.
///
/// x-coordinates are the first `shares` entries of a random permutation of
/// `1..=255`; the polynomial coefficients come from one request of exactly
/// `(threshold - 1) * secret.len()` bytes. If the source fails, nothing is
/// returned.
pub fn split_with<R: RandomSource>(
    secret: &[u8],
    shares: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Share>> {
    check_parameters(secret.len(), shares, threshold)?;
    let xs = random_coordinates(shares, rng)?;
    check_coordinates(&xs)?;
    evaluate_shares(secret, &xs, threshold, rng)
}

/// Splits a secret at caller chosen x-coordinates, one share per entry of `xs`.
///
/// # Errors
/// [`SharingError::Configuration`] for out-of-range parameters,
/// [`SharingError::MalformedShare`] when `xs` contains 0 or a repeated value.
pub fn split_at<R: RandomSource>(
    secret: &[u8],
    xs: &[u8],
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Share>> {
    check_parameters(secret.len(), xs.len(), threshold)?;
    check_coordinates(xs)?;
    evaluate_shares(secret, xs, threshold, rng)
}

fn check_parameters(secret_len: usize, shares: usize, threshold: usize) -> Result<()> {
    if secret_len == 0 {
        return Err(SharingError::Configuration(
            "secret must not be empty".to_string(),
        ));
    }
    if !(MIN_THRESHOLD..=MAX_SHARES).contains(&shares) {
        return Err(SharingError::Configuration(format!(
            "share count must be between {} and {}, got {}",
            MIN_THRESHOLD, MAX_SHARES, shares
        )));
    }
    if !(MIN_THRESHOLD..=MAX_SHARES).contains(&threshold) {
        return Err(SharingError::Configuration(format!(
            "threshold must be between {} and {}, got {}",
            MIN_THRESHOLD, MAX_SHARES, threshold
        )));
    }
    if threshold > shares {
        return Err(SharingError::Configuration(format!(
            "threshold {} exceeds share count {}",
            threshold, shares
        )));
    }
    Ok(())
}

fn check_coordinates(xs: &[u8]) -> Result<()> {
    let mut seen = [false; 256];
    for &x in xs {
        if x == 0 {
            return Err(SharingError::MalformedShare(
                "x-coordinate 0 is reserved for the secret".to_string(),
            ));
        }
        if seen[x as usize] {
            return Err(SharingError::MalformedShare(format!(
                "duplicate x-coordinate {}",
                x
            )));
        }
        seen[x as usize] = true;
    }
    Ok(())
}

/// Draws `count` distinct nonzero x-coordinates with a partial Fisher-Yates
/// shuffle of `1..=255`.
fn random_coordinates<R: RandomSource>(count: usize, rng: &mut R) -> Result<Vec<u8>> {
    let mut pool: Vec<u8> = (1..=255).collect();
    for i in 0..count {
        let j = i + uniform_below(pool.len() - i, rng)?;
        pool.swap(i, j);
    }
    pool.truncate(count);
    Ok(pool)
}

/// Draws rejected by [`uniform_below`] before it settles for a biased index.
const MAX_REJECTIONS: usize = 32;

/// Uniform index in `0..bound` for `1 <= bound <= 256`, rejecting the biased
/// top of the byte range.
///
/// After [`MAX_REJECTIONS`] rejected draws the last byte is reduced modulo
/// `bound` as is, so a degenerate source (a constant stub) still terminates.
fn uniform_below<R: RandomSource>(bound: usize, rng: &mut R) -> Result<usize> {
    if bound <= 1 {
        return Ok(0);
    }
    let limit = 256 - (256 % bound);
    let mut b = 0;
    for _ in 0..MAX_REJECTIONS {
        b = rng.random_byte()? as usize;
        if b < limit {
            return Ok(b % bound);
        }
    }
    trace!(bound, "x-coordinate draw fell back to modulo reduction");
    Ok(b % bound)
}

fn evaluate_shares<R: RandomSource>(
    secret: &[u8],
    xs: &[u8],
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Share>> {
    let degree = threshold - 1;
    let coefficients = rng.random_bytes(degree * secret.len())?;

    let mut outputs: Vec<Vec<u8>> = xs
        .iter()
        .map(|&x| {
            let mut bytes = Vec::with_capacity(secret.len() + 1);
            bytes.push(x);
            bytes
        })
        .collect();

    let mut poly = vec![0u8; threshold];
    for (i, &byte) in secret.iter().enumerate() {
        poly[0] = byte;
        poly[1..].copy_from_slice(&coefficients[i * degree..(i + 1) * degree]);
        for out in outputs.iter_mut() {
            let y = horner(&poly, out[0]);
            out.push(y);
        }
    }
    poly.fill(0);

    debug!(
        shares = xs.len(),
        threshold,
        secret_len = secret.len(),
        "split secret"
    );

    outputs.into_iter().map(Share::from_bytes).collect()
}

/// Reconstructs a secret from shares using Lagrange interpolation at `x = 0`.
///
/// Accepts anything that exposes share wire bytes: [`Share`]s, `Vec<u8>`s or
/// byte slices.
///
/// The threshold used at split time is not recorded in the shares, so it
/// cannot be checked here. Passing fewer shares than that threshold, or shares
/// from different splits, returns a well-formed but wrong secret rather than
/// an error. The scheme has no integrity check.
///
/// # Errors
/// * [`SharingError::Configuration`] for fewer than two shares.
/// * [`SharingError::LengthMismatch`] when a share is shorter than two bytes or
///   the shares differ in length.
/// * [`SharingError::MalformedShare`] for a zero or duplicated x-coordinate.
pub fn combine<S: AsRef<[u8]>>(shares: &[S]) -> Result<Vec<u8>> {
    if shares.len() < MIN_THRESHOLD {
        return Err(SharingError::Configuration(format!(
            "at least {} shares are required, got {}",
            MIN_THRESHOLD,
            shares.len()
        )));
    }

    for share in shares {
        let len = share.as_ref().len();
        if len < MIN_SHARE_LEN {
            return Err(SharingError::LengthMismatch(format!(
                "share must be at least {} bytes, got {}",
                MIN_SHARE_LEN, len
            )));
        }
    }

    let len = shares[0].as_ref().len();
    if let Some(other) = shares.iter().find(|s| s.as_ref().len() != len) {
        return Err(SharingError::LengthMismatch(format!(
            "shares have different lengths: {} and {}",
            len,
            other.as_ref().len()
        )));
    }

    let xs: Vec<u8> = shares.iter().map(|s| s.as_ref()[0]).collect();
    check_coordinates(&xs)?;

    let weights = lagrange_weights(&xs, 0)?;
    let mut secret = vec![0u8; len - 1];
    for (share, &weight) in shares.iter().zip(&weights) {
        for (out, &y) in secret.iter_mut().zip(&share.as_ref()[1..]) {
            *out = field::add(*out, field::mul(weight, y));
        }
    }

    debug!(shares = shares.len(), secret_len = secret.len(), "combined shares");
    Ok(secret)
}

/// Lagrange basis values `l_j(at)` for the points `xs`, which must be
/// distinct.
fn lagrange_weights(xs: &[u8], at: u8) -> Result<Vec<u8>> {
    xs.iter()
        .enumerate()
        .map(|(j, &xj)| {
            xs.iter()
                .enumerate()
                .filter(|&(k, _)| k != j)
                .try_fold(1u8, |acc, (_, &xk)| {
                    let top = field::sub(at, xk);
                    let bottom = field::sub(xj, xk);
                    Ok::<u8, SharingError>(field::mul(acc, field::div(top, bottom)?))
                })
        })
        .collect()
}

/// Evaluates the unique polynomial through `points` at `x`.
///
/// # Errors
/// [`SharingError::MalformedShare`] if two points share an x-coordinate.
///
/// # Examples
/// ```rust
/// use threshold_sss::sss::interpolate;
///
/// // the line through (1, 5) and (2, 5) is constant
/// assert_eq!(interpolate(&[(1, 5), (2, 5)], 0).unwrap(), 5);
/// ```
pub fn interpolate(points: &[(u8, u8)], x: u8) -> Result<u8> {
    let xs: Vec<u8> = points.iter().map(|&(px, _)| px).collect();
    let mut seen = [false; 256];
    for &px in &xs {
        if std::mem::replace(&mut seen[px as usize], true) {
            return Err(SharingError::MalformedShare(format!(
                "duplicate x-coordinate {}",
                px
            )));
        }
    }
    let weights = lagrange_weights(&xs, x)?;
    Ok(points
        .iter()
        .zip(weights)
        .fold(0u8, |acc, (&(_, y), w)| field::add(acc, field::mul(w, y))))
}

/// https://en.wikipedia.org/wiki/Proactive_secret_sharing#Mathematics
///
/// A refresh key: one polynomial with a zero constant term per secret byte.
/// Adding its evaluations to every share of a split re-randomises the shares
/// without changing the secret, so shares leaked before a refresh cannot be
/// combined with shares taken after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshKey {
    polynomials: Vec<Polynomial>,
}

impl RefreshKey {
    pub fn polynomials(&self) -> &[Polynomial] {
        &self.polynomials
    }

    /// Secret length the key applies to.
    pub fn secret_len(&self) -> usize {
        self.polynomials.len()
    }

    fn validate(&self) -> Result<()> {
        if self.polynomials.is_empty() {
            return Err(SharingError::Configuration(
                "refresh key is empty".to_string(),
            ));
        }
        if self
            .polynomials
            .iter()
            .any(|p| p.coefficients().first().map_or(true, |&c| c != 0))
        {
            return Err(SharingError::Configuration(
                "refresh polynomials must have a zero constant term".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generates a refresh key for shares of a `secret_len` byte secret split with
/// `threshold`.
///
/// # Errors
/// [`SharingError::Configuration`] if `threshold` is outside `2..=255` or
/// `secret_len` is 0.
pub fn generate_refresh_key<R: RandomSource>(
    threshold: usize,
    secret_len: usize,
    rng: &mut R,
) -> Result<RefreshKey> {
    if !(MIN_THRESHOLD..=MAX_SHARES).contains(&threshold) {
        return Err(SharingError::Configuration(format!(
            "threshold must be between {} and {}, got {}",
            MIN_THRESHOLD, MAX_SHARES, threshold
        )));
    }
    if secret_len == 0 {
        return Err(SharingError::Configuration(
            "secret length must not be zero".to_string(),
        ));
    }

    let polynomials = (0..secret_len)
        .map(|_| Polynomial::random(threshold - 1, 0, rng))
        .collect::<Result<Vec<_>>>()?;

    trace!(threshold, secret_len, "generated refresh key");
    Ok(RefreshKey { polynomials })
}

/// Refreshes a single share in place with `key`.
///
/// # Errors
/// * [`SharingError::LengthMismatch`] if the key was made for another secret length.
/// * [`SharingError::Configuration`] if a key polynomial has a nonzero constant term.
pub fn refresh_share(share: &mut Share, key: &RefreshKey) -> Result<()> {
    key.validate()?;
    if share.secret_len() != key.secret_len() {
        return Err(SharingError::LengthMismatch(format!(
            "share carries {} bytes but refresh key covers {}",
            share.secret_len(),
            key.secret_len()
        )));
    }

    let x = share.x();
    for (y, poly) in share.ys_mut().iter_mut().zip(&key.polynomials) {
        *y = field::add(*y, poly.evaluate(x));
    }
    Ok(())
}

/// Refreshes a whole share set with a freshly generated key.
///
/// Either every share is refreshed or, on error, none is.
pub fn refresh_shares<R: RandomSource>(
    shares: &mut [Share],
    threshold: usize,
    rng: &mut R,
) -> Result<()> {
    let first = shares.first().ok_or_else(|| {
        SharingError::Configuration("no shares to refresh".to_string())
    })?;
    let secret_len = first.secret_len();
    if shares.iter().any(|s| s.secret_len() != secret_len) {
        return Err(SharingError::LengthMismatch(
            "shares have different lengths".to_string(),
        ));
    }
    let xs: Vec<u8> = shares.iter().map(Share::x).collect();
    check_coordinates(&xs)?;

    let key = generate_refresh_key(threshold, secret_len, rng)?;
    for share in shares.iter_mut() {
        refresh_share(share, &key)?;
    }

    debug!(shares = shares.len(), threshold, "refreshed shares");
    Ok(())
}

/// Decodes and combines hex encoded shares.
pub fn combine_hex<S: AsRef<str>>(shares: &[S]) -> Result<Vec<u8>> {
    let decoded = shares
        .iter()
        .map(|s| s.as_ref().parse::<Share>())
        .collect::<Result<Vec<_>>>()?;
    combine(&decoded)
}
