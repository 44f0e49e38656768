//! The set of LilyPond features accepted by the converter.
//!
//! Letter-name pitches, absolute octave marks, explicit durations on every
//! note, slurs within one measure and `|` bar separators are always allowed.
//! Everything else is opt-in here; anything outside the whitelist is an error
//! rather than being dropped.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whitelist {
    pub accidentals: bool,
    pub rests: bool,
    pub spacers: bool,
    pub dots: bool,
}

impl Whitelist {
    /// Only the always-allowed core syntax.
    pub const fn strict() -> Self {
        Self {
            accidentals: false,
            rests: false,
            spacers: false,
            dots: false,
        }
    }

    pub const fn extended() -> Self {
        Self {
            accidentals: true,
            rests: true,
            spacers: true,
            dots: true,
        }
    }

    /// Names of the optional features that are enabled.
    pub fn enabled_features(&self) -> Vec<&'static str> {
        [
            (self.accidentals, "accidentals"),
            (self.rests, "rests"),
            (self.spacers, "spacers"),
            (self.dots, "dots"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::extended()
    }
}
