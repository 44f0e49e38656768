use crate::error::TokenError;
use std::fmt;
use std::str::FromStr;

/// Largest numeric duration MEI allows (`data.DURATION.cmn`).
pub const MAX_DURATION: u16 = 2048;

/// Note value written as a power-of-two denominator, with augmentation dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    pub base: u16,
    pub dots: u8,
}

impl Duration {
    pub fn new(base: u16, dots: u8) -> Result<Self, TokenError> {
        if base == 0 || base > MAX_DURATION || !base.is_power_of_two() {
            return Err(TokenError::InvalidDuration(base.to_string()));
        }
        Ok(Self { base, dots })
    }

    /// Parse the MEI `@dur` / `@dots` pair.
    pub fn from_mei(dur: &str, dots: Option<&str>) -> Option<Self> {
        let base: u16 = dur.trim().parse().ok()?;
        let dots: u8 = match dots {
            Some(d) => d.trim().parse().ok()?,
            None => 0,
        };
        Self::new(base, dots).ok()
    }

    pub fn is_dotted(&self) -> bool {
        self.dots > 0
    }
}

impl FromStr for Duration {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, rest) = s.split_at(digits_end);
        if digits.is_empty() {
            return Err(TokenError::MissingDuration);
        }
        if let Some(c) = rest.chars().find(|&c| c != '.') {
            return Err(TokenError::UnexpectedCharacter(c));
        }

        let base: u16 = digits
            .parse()
            .map_err(|_| TokenError::InvalidDuration(digits.to_string()))?;
        let dots = u8::try_from(rest.len())
            .map_err(|_| TokenError::InvalidDuration(s.to_string()))?;
        Self::new(base, dots)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, ".".repeat(self.dots as usize))
    }
}
