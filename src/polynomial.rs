use core::fmt;
use serde::{
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::error::Result;
use crate::field;
use crate::random::RandomSource;

/// Represents a polynomial over the Galois field GF(2^8).
///
/// Coefficients are stored constant term first, so `coefficients[0]` is the
/// value of the polynomial at `x = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<u8>,
}

impl Polynomial {
    /// Constructs a polynomial of the given degree with uniformly random
    /// coefficients and `constant` as its constant term.
    ///
    /// # Arguments
    ///
    /// * `degree` - The degree of the polynomial (threshold - 1).
    /// * `constant` - The constant term, the secret byte or 0 for a refresh polynomial.
    /// * `rng` - Source of the `degree` random coefficients.
    pub fn random<R: RandomSource>(degree: usize, constant: u8, rng: &mut R) -> Result<Self> {
        let mut coefficients = vec![constant; degree + 1];
        rng.fill(&mut coefficients[1..])?;
        Ok(Polynomial { coefficients })
    }

    pub fn from_coefficients(coefficients: Vec<u8>) -> Self {
        Polynomial { coefficients }
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Number of coefficients minus one. A polynomial with a zero leading
    /// coefficient still reports its nominal degree.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` with Horner's method.
    pub fn evaluate(&self, x: u8) -> u8 {
        horner(&self.coefficients, x)
    }
}

/// Evaluates the polynomial with the given coefficients (constant term first) at `x`.
pub(crate) fn horner(coefficients: &[u8], x: u8) -> u8 {
    coefficients
        .iter()
        .rev()
        .fold(0u8, |acc, &c| field::add(field::mul(acc, x), c))
}

/// Serializes a `Polynomial` as a sequence of bytes, so refresh keys can be
/// written out and handed to share holders.
impl Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.coefficients.len()))?;
        for &c in &self.coefficients {
            seq.serialize_element(&c)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PolynomialVisitor;

        impl<'de> Visitor<'de> for PolynomialVisitor {
            type Value = Polynomial;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of bytes representing polynomial coefficients")
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Polynomial, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let mut coefficients = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element()? {
                    coefficients.push(byte);
                }
                Ok(Polynomial { coefficients })
            }
        }

        deserializer.deserialize_seq(PolynomialVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::CryptoSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_at_zero_is_constant_term() {
        let mut rng = CryptoSource::new(StdRng::seed_from_u64(42));
        for secret in [0u8, 1, 0x48, 0xff] {
            let poly = Polynomial::random(4, secret, &mut rng).unwrap();
            assert_eq!(poly.degree(), 4);
            assert_eq!(poly.evaluate(0), secret);
        }
    }

    #[test]
    fn test_horner_matches_power_sum() {
        let poly = Polynomial::from_coefficients(vec![0x48, 0x11, 0x22, 0x33]);
        for x in 0..=255u8 {
            let expected = poly
                .coefficients()
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &c)| {
                    field::add(acc, field::mul(c, field::pow(x, i as u32)))
                });
            assert_eq!(poly.evaluate(x), expected);
        }
    }

    #[test]
    fn test_constant_polynomial() {
        let poly = Polynomial::from_coefficients(vec![0x7a]);
        assert_eq!(poly.degree(), 0);
        assert!((0..=255u8).all(|x| poly.evaluate(x) == 0x7a));
    }

    #[test]
    fn test_serde_json() {
        let poly = Polynomial::from_coefficients(vec![0, 1, 2, 255]);
        let json = serde_json::to_string(&poly).unwrap();
        assert_eq!(json, "[0,1,2,255]");
        let back: Polynomial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, poly);
    }
}
