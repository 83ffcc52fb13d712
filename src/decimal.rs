//! Decimal values for the `decimal` logical type
//!
//! The `decimal` logical type annotates a `bytes` or `fixed` slot whose
//! contents are the big-endian two's-complement encoding of an unscaled
//! integer; the scale is declared by the schema. Conversions targeting
//! `"fixed.decimal"` or `"bytes.decimal"` typically go through [`Decimal`],
//! for instance from a decimal string on the way in, and to an `f64` on the
//! way out:
//!
//! ```
//! # use tedium_conv::decimal::Decimal;
//! let d = Decimal::from_str_scaled("346.8", 2).unwrap();
//! assert_eq!(d.to_fixed_bytes(6).unwrap(), vec![0x00, 0x00, 0x00, 0x00, 0x87, 0x78]);
//! assert_eq!(Decimal::from_be_bytes(&[0x87, 0x78], 2).to_string(), "-308.56");
//! assert_eq!(d.to_f64(), 346.8);
//! ```

use std::fmt::Display;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;

use crate::error::DecimalError;

/// Largest scale accepted when parsing or rescaling
///
/// Both operations materialize `scale` digits, so an unchecked scale taken
/// from a schema could exhaust memory.
pub const MAX_SCALE: u32 = 1024;

fn check_scale(scale: u32) -> Result<(), DecimalError> {
    if scale > MAX_SCALE {
        return Err(DecimalError::Scale {
            scale,
            limit: MAX_SCALE,
        });
    }
    Ok(())
}

/// Arbitrary-precision decimal as an unscaled integer and a scale
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    /// Constructs the decimal `unscaled * 10^-scale`.
    #[must_use]
    pub const fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Returns the unscaled integer.
    #[must_use]
    pub const fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Returns the number of fractional decimal digits.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Parses a plain decimal literal (`[+-]digits[.digits]`) at a fixed scale.
    ///
    /// Fractional digits beyond `scale` are rounded half away from zero;
    /// missing ones are taken as zero.
    ///
    /// # Errors
    ///
    /// Returns [`DecimalError::Invalid`] for anything other than a plain
    /// decimal literal (no exponents, no separators, at least one digit), and
    /// [`DecimalError::Scale`] if `scale` exceeds [`MAX_SCALE`].
    pub fn from_str_scaled(s: &str, scale: u32) -> Result<Self, DecimalError> {
        check_scale(scale)?;
        let invalid = || DecimalError::Invalid(s.to_owned());
        let (neg, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let scale_len = scale as usize;
        let (kept, dropped) = if frac_part.len() > scale_len {
            frac_part.split_at(scale_len)
        } else {
            (frac_part, "")
        };
        let mut digits = String::with_capacity(int_part.len() + scale_len);
        digits.push_str(int_part);
        digits.push_str(kept);
        digits.extend(std::iter::repeat('0').take(scale_len - kept.len()));

        let mut unscaled = if digits.is_empty() {
            BigInt::default()
        } else {
            BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?
        };
        if matches!(dropped.as_bytes().first(), Some(b'5'..=b'9')) {
            unscaled += 1u32;
        }
        if neg {
            unscaled = -unscaled;
        }
        Ok(Self { unscaled, scale })
    }

    /// Interprets `bytes` as a big-endian two's-complement unscaled integer.
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8], scale: u32) -> Self {
        Self {
            unscaled: BigInt::from_signed_bytes_be(bytes),
            scale,
        }
    }

    /// Returns the minimal big-endian two's-complement encoding of the
    /// unscaled integer, as used for `bytes.decimal`.
    #[must_use]
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.unscaled.to_signed_bytes_be()
    }

    /// Returns the big-endian two's-complement encoding of the unscaled
    /// integer, sign-extended to exactly `size` bytes, as used for
    /// `fixed.decimal`.
    ///
    /// # Errors
    ///
    /// Returns [`DecimalError::Overflow`] if the value needs more than `size` bytes.
    pub fn to_fixed_bytes(&self, size: usize) -> Result<Vec<u8>, DecimalError> {
        let raw = self.to_be_bytes();
        if raw.len() > size {
            return Err(DecimalError::Overflow {
                limit: size,
                actual: raw.len(),
            });
        }
        let fill = match self.unscaled.sign() {
            Sign::Minus => 0xff,
            _ => 0x00,
        };
        let mut buf = vec![fill; size - raw.len()];
        buf.extend_from_slice(&raw);
        Ok(buf)
    }

    /// Returns the same value at a different scale, rounding half away from
    /// zero when digits are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DecimalError::Scale`] if either scale exceeds [`MAX_SCALE`].
    pub fn rescale(&self, scale: u32) -> Result<Self, DecimalError> {
        check_scale(scale)?;
        check_scale(self.scale)?;
        if scale >= self.scale {
            let factor = BigInt::from(10u32).pow(scale - self.scale);
            return Ok(Self::new(&self.unscaled * factor, scale));
        }
        let divisor = BigInt::from(10u32).pow(self.scale - scale);
        let (mut quot, rem) = self.unscaled.div_rem(&divisor);
        if rem.magnitude() * 2u32 >= *divisor.magnitude() {
            match self.unscaled.sign() {
                Sign::Minus => quot -= 1u32,
                _ => quot += 1u32,
            }
        }
        Ok(Self::new(quot, scale))
    }

    /// Returns the nearest `f64` to this value.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{digits:0>scale$}")
        }
    }
}
