use crate::error::TokenError;
use std::fmt;
use std::str::FromStr;

/// Octave of an unmarked LilyPond pitch, in MEI numbering (`c'` is C4).
pub const BASE_OCTAVE: i8 = 3;
pub const MIN_OCTAVE: i8 = 0;
pub const MAX_OCTAVE: i8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchName {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(PitchName::C),
            'd' => Some(PitchName::D),
            'e' => Some(PitchName::E),
            'f' => Some(PitchName::F),
            'g' => Some(PitchName::G),
            'a' => Some(PitchName::A),
            'b' => Some(PitchName::B),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            PitchName::C => 'c',
            PitchName::D => 'd',
            PitchName::E => 'e',
            PitchName::F => 'f',
            PitchName::G => 'g',
            PitchName::A => 'a',
            PitchName::B => 'b',
        }
    }

    /// Parse an MEI `@pname` value. Uppercase letters are tolerated.
    pub fn from_mei(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    pub fn from_mei(value: &str) -> Option<Self> {
        match value {
            "s" => Some(Accidental::Sharp),
            "f" => Some(Accidental::Flat),
            "ss" | "x" => Some(Accidental::DoubleSharp),
            "ff" => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }

    pub fn mei_value(&self) -> &'static str {
        match self {
            Accidental::Sharp => "s",
            Accidental::Flat => "f",
            Accidental::DoubleSharp => "ss",
            Accidental::DoubleFlat => "ff",
        }
    }

    /// Parse the Dutch accidental suffix that follows a pitch letter.
    ///
    /// `a` and `e` also take the contracted flats (`as`, `es`, `ases`, `eses`).
    pub fn from_ly_suffix(name: PitchName, suffix: &str) -> Option<Self> {
        let vowel = matches!(name, PitchName::A | PitchName::E);
        match suffix {
            "is" => Some(Accidental::Sharp),
            "isis" => Some(Accidental::DoubleSharp),
            "es" => Some(Accidental::Flat),
            "eses" => Some(Accidental::DoubleFlat),
            "s" if vowel => Some(Accidental::Flat),
            "ses" if vowel => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }

    pub fn ly_suffix(&self, name: PitchName) -> &'static str {
        let vowel = matches!(name, PitchName::A | PitchName::E);
        match self {
            Accidental::Sharp => "is",
            Accidental::DoubleSharp => "isis",
            Accidental::Flat if vowel => "s",
            Accidental::Flat => "es",
            Accidental::DoubleFlat if vowel => "ses",
            Accidental::DoubleFlat => "eses",
        }
    }
}

/// Find the pitch name and accidental of a LilyPond pitch class such as `fis`.
pub fn parse_pitch_class(markup: &str) -> Option<(PitchName, Option<Accidental>)> {
    let mut chars = markup.chars();
    let name = PitchName::from_char(chars.next()?)?;
    let suffix = chars.as_str();
    if suffix.is_empty() {
        return Some((name, None));
    }
    Accidental::from_ly_suffix(name, suffix).map(|accid| (name, Some(accid)))
}

/// Octave reached by applying LilyPond octave marks (`'` and `,`) to [`BASE_OCTAVE`].
pub fn octave_from_marks(marks: &str) -> Result<i8, TokenError> {
    let mut raises = 0i32;
    let mut lowers = 0i32;
    for c in marks.chars() {
        match c {
            '\'' => raises += 1,
            ',' => lowers += 1,
            other => return Err(TokenError::UnexpectedCharacter(other)),
        }
    }
    if raises > 0 && lowers > 0 {
        return Err(TokenError::MixedOctaveMarks);
    }

    let octave = BASE_OCTAVE as i32 + raises - lowers;
    if !(MIN_OCTAVE as i32..=MAX_OCTAVE as i32).contains(&octave) {
        return Err(TokenError::OctaveOutOfRange(octave));
    }
    Ok(octave as i8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: PitchName,
    pub accidental: Option<Accidental>,
    pub octave: i8,
}

impl Pitch {
    pub fn new(name: PitchName, accidental: Option<Accidental>, octave: i8) -> Self {
        Self {
            name,
            accidental,
            octave,
        }
    }
}

impl FromStr for Pitch {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let marks_start = s.find(['\'', ',']).unwrap_or(s.len());
        let (class, marks) = s.split_at(marks_start);
        let (name, accidental) =
            parse_pitch_class(class).ok_or_else(|| TokenError::InvalidPitch(class.to_string()))?;
        let octave = octave_from_marks(marks)?;
        Ok(Self {
            name,
            accidental,
            octave,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(accid) = self.accidental {
            write!(f, "{}", accid.ly_suffix(self.name))?;
        }
        let shift = self.octave - BASE_OCTAVE;
        let mark = if shift > 0 { "'" } else { "," };
        write!(f, "{}", mark.repeat(shift.unsigned_abs() as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class() {
        assert_eq!(parse_pitch_class("f"), Some((PitchName::F, None)));
        assert_eq!(
            parse_pitch_class("fis"),
            Some((PitchName::F, Some(Accidental::Sharp)))
        );
        assert_eq!(
            parse_pitch_class("deses"),
            Some((PitchName::D, Some(Accidental::DoubleFlat)))
        );
        assert_eq!(
            parse_pitch_class("es"),
            Some((PitchName::E, Some(Accidental::Flat)))
        );
        assert_eq!(
            parse_pitch_class("ees"),
            Some((PitchName::E, Some(Accidental::Flat)))
        );
        assert_eq!(
            parse_pitch_class("ases"),
            Some((PitchName::A, Some(Accidental::DoubleFlat)))
        );
        assert_eq!(
            parse_pitch_class("gisis"),
            Some((PitchName::G, Some(Accidental::DoubleSharp)))
        );
    }

    #[test]
    fn test_pitch_class_invalid() {
        assert_eq!(parse_pitch_class(""), None);
        assert_eq!(parse_pitch_class("h"), None);
        assert_eq!(parse_pitch_class("bs"), None);
        assert_eq!(parse_pitch_class("fi"), None);
        assert_eq!(parse_pitch_class("cises"), None);
    }

    #[test]
    fn test_parse_pitch() {
        let pitch: Pitch = "a".parse().unwrap();
        assert_eq!(pitch, Pitch::new(PitchName::A, None, 3));

        let pitch: Pitch = "b'".parse().unwrap();
        assert_eq!(pitch.octave, 4);

        let pitch: Pitch = "c,,".parse().unwrap();
        assert_eq!(pitch.octave, 1);

        let pitch: Pitch = "bes'''".parse().unwrap();
        assert_eq!(
            pitch,
            Pitch::new(PitchName::B, Some(Accidental::Flat), 6)
        );
    }

    #[test]
    fn test_parse_pitch_error() {
        assert_eq!("c',".parse::<Pitch>(), Err(TokenError::MixedOctaveMarks));
        assert_eq!(
            "c,,,,".parse::<Pitch>(),
            Err(TokenError::OctaveOutOfRange(-1))
        );
        assert_eq!(
            "x'".parse::<Pitch>(),
            Err(TokenError::InvalidPitch("x".to_string()))
        );
        assert_eq!(
            "c'~".parse::<Pitch>(),
            Err(TokenError::UnexpectedCharacter('~'))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Pitch::new(PitchName::C, None, 4).to_string(), "c'");
        assert_eq!(Pitch::new(PitchName::C, None, 3).to_string(), "c");
        assert_eq!(
            Pitch::new(PitchName::B, Some(Accidental::Flat), 2).to_string(),
            "bes,"
        );
        assert_eq!(
            Pitch::new(PitchName::E, Some(Accidental::Flat), 3).to_string(),
            "es"
        );
        assert_eq!(
            Pitch::new(PitchName::A, Some(Accidental::DoubleFlat), 5).to_string(),
            "ases''"
        );
        assert_eq!(
            Pitch::new(PitchName::F, Some(Accidental::DoubleSharp), 1).to_string(),
            "fisis,,"
        );
    }

    #[test]
    fn test_mei_values() {
        assert_eq!(PitchName::from_mei("A"), Some(PitchName::A));
        assert_eq!(PitchName::from_mei("g"), Some(PitchName::G));
        assert_eq!(PitchName::from_mei("gg"), None);
        assert_eq!(Accidental::from_mei("ff"), Some(Accidental::DoubleFlat));
        assert_eq!(Accidental::from_mei("n"), None);
        assert_eq!(Accidental::DoubleSharp.mei_value(), "ss");
    }
}
