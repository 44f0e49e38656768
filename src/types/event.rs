use crate::types::duration::Duration;
use crate::types::pitch::Pitch;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlurMark {
    Start,
    End,
}

impl SlurMark {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '(' => Some(SlurMark::Start),
            ')' => Some(SlurMark::End),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            SlurMark::Start => '(',
            SlurMark::End => ')',
        }
    }

    /// MEI `@slur` value. Only one slur is open at a time, so it is always number 1.
    pub fn mei_value(&self) -> &'static str {
        match self {
            SlurMark::Start => "i1",
            SlurMark::End => "t1",
        }
    }

    /// Parse an MEI `@slur` value such as `i1` or `t2`. Medial marks yield `None`.
    pub fn from_mei(value: &str) -> Option<Self> {
        match value.trim().chars().next() {
            Some('i') => Some(SlurMark::Start),
            Some('t') => Some(SlurMark::End),
            _ => None,
        }
    }
}

/// Position of a token in the LilyPond source, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyEvent {
    Note {
        pitch: Pitch,
        duration: Duration,
        slur: Option<SlurMark>,
    },
    Rest {
        duration: Duration,
    },
    Space {
        duration: Duration,
    },
    /// Full-measure rest, `R1`.
    MeasureRest {
        duration: Duration,
    },
}

impl LyEvent {
    pub fn duration(&self) -> Duration {
        match self {
            LyEvent::Note { duration, .. }
            | LyEvent::Rest { duration }
            | LyEvent::Space { duration }
            | LyEvent::MeasureRest { duration } => *duration,
        }
    }

    pub fn slur(&self) -> Option<SlurMark> {
        match self {
            LyEvent::Note { slur, .. } => *slur,
            _ => None,
        }
    }

    pub fn set_slur(&mut self, mark: SlurMark) {
        if let LyEvent::Note { slur, .. } = self {
            *slur = Some(mark);
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, LyEvent::Note { .. })
    }

    /// MEI element name this event maps to.
    pub fn mei_name(&self) -> &'static str {
        match self {
            LyEvent::Note { .. } => "note",
            LyEvent::Rest { .. } => "rest",
            LyEvent::Space { .. } => "space",
            LyEvent::MeasureRest { .. } => "mRest",
        }
    }
}

impl fmt::Display for LyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyEvent::Note {
                pitch,
                duration,
                slur,
            } => {
                write!(f, "{}{}", pitch, duration)?;
                if let Some(mark) = slur {
                    write!(f, "{}", mark.as_char())?;
                }
                Ok(())
            }
            LyEvent::Rest { duration } => write!(f, "r{}", duration),
            LyEvent::Space { duration } => write!(f, "s{}", duration),
            LyEvent::MeasureRest { duration } => write!(f, "R{}", duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::{Accidental, PitchName};

    #[test]
    fn test_display() {
        let note = LyEvent::Note {
            pitch: Pitch::new(PitchName::F, Some(Accidental::Sharp), 5),
            duration: Duration { base: 8, dots: 1 },
            slur: Some(SlurMark::Start),
        };
        assert_eq!(note.to_string(), "fis''8.(");

        let rest = LyEvent::Rest {
            duration: Duration { base: 2, dots: 0 },
        };
        assert_eq!(rest.to_string(), "r2");

        let space = LyEvent::Space {
            duration: Duration { base: 1, dots: 0 },
        };
        assert_eq!(space.to_string(), "s1");

        let measure_rest = LyEvent::MeasureRest {
            duration: Duration { base: 2, dots: 1 },
        };
        assert_eq!(measure_rest.to_string(), "R2.");
        assert_eq!(measure_rest.mei_name(), "mRest");
    }

    #[test]
    fn test_slur_mei() {
        assert_eq!(SlurMark::from_mei("i1"), Some(SlurMark::Start));
        assert_eq!(SlurMark::from_mei("t2"), Some(SlurMark::End));
        assert_eq!(SlurMark::from_mei("m1"), None);
        assert_eq!(SlurMark::End.mei_value(), "t1");
    }

    #[test]
    fn test_set_slur_ignores_rests() {
        let mut rest = LyEvent::Rest {
            duration: Duration { base: 4, dots: 0 },
        };
        rest.set_slur(SlurMark::Start);
        assert_eq!(rest.slur(), None);
    }
}
