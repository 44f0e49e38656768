use crate::error::TokenError;
use crate::types::duration::Duration;
use crate::types::event::{LyEvent, SlurMark};
use crate::types::pitch::Pitch;
use crate::whitelist::Whitelist;

fn split_slur(token: &str) -> Result<(&str, Option<SlurMark>), TokenError> {
    let (body, slur) = match token.chars().last().and_then(SlurMark::from_char) {
        Some(mark) => (&token[..token.len() - 1], Some(mark)),
        None => (token, None),
    };

    // only one slur mark, and only at the end
    if let Some(c) = body.chars().find(|&c| SlurMark::from_char(c).is_some()) {
        return Err(TokenError::UnexpectedCharacter(c));
    }
    Ok((body, slur))
}

fn parse_duration(markup: &str, whitelist: &Whitelist) -> Result<Duration, TokenError> {
    let duration: Duration = markup.parse()?;
    if duration.is_dotted() && !whitelist.dots {
        return Err(TokenError::NotWhitelisted("dots"));
    }
    Ok(duration)
}

fn parse_silence(
    pitch_part: &str,
    duration_part: &str,
    slur: Option<SlurMark>,
    whitelist: &Whitelist,
) -> Result<LyEvent, TokenError> {
    let mut chars = pitch_part.chars();
    let kind = chars.next();
    if !chars.as_str().is_empty() {
        if chars.all(|c| c == '\'' || c == ',') {
            return Err(TokenError::OctaveOnRest);
        }
        return Err(TokenError::InvalidPitch(pitch_part.to_string()));
    }
    if let Some(mark) = slur {
        return Err(TokenError::UnexpectedCharacter(mark.as_char()));
    }

    match kind {
        Some('r') | Some('R') => {
            if !whitelist.rests {
                return Err(TokenError::NotWhitelisted("rests"));
            }
            let duration = parse_duration(duration_part, whitelist)?;
            Ok(if kind == Some('R') {
                LyEvent::MeasureRest { duration }
            } else {
                LyEvent::Rest { duration }
            })
        }
        _ => {
            if !whitelist.spacers {
                return Err(TokenError::NotWhitelisted("spacers"));
            }
            Ok(LyEvent::Space {
                duration: parse_duration(duration_part, whitelist)?,
            })
        }
    }
}

/// Parse one whitespace-delimited LilyPond token, e.g. `a4(`, `bes'16`, `r2` or `R1`.
pub fn parse_ly_token(token: &str, whitelist: &Whitelist) -> Result<LyEvent, TokenError> {
    if let Some(command) = token.strip_prefix('\\') {
        return Err(TokenError::UnsupportedCommand(command.to_string()));
    }
    match token.chars().next() {
        Some(c) if c.is_ascii_lowercase() || c == 'R' => {}
        Some(c) => return Err(TokenError::UnexpectedCharacter(c)),
        None => return Err(TokenError::InvalidPitch(String::new())),
    }

    let (body, slur) = split_slur(token)?;
    let duration_start = body
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(body.len());
    let (pitch_part, duration_part) = body.split_at(duration_start);

    if pitch_part.starts_with(['r', 's', 'R']) {
        return parse_silence(pitch_part, duration_part, slur, whitelist);
    }

    let pitch: Pitch = pitch_part.parse()?;
    if pitch.accidental.is_some() && !whitelist.accidentals {
        return Err(TokenError::NotWhitelisted("accidentals"));
    }
    let duration = parse_duration(duration_part, whitelist)?;

    Ok(LyEvent::Note {
        pitch,
        duration,
        slur,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::{Accidental, PitchName};

    fn note(token: &str) -> LyEvent {
        parse_ly_token(token, &Whitelist::extended()).unwrap()
    }

    fn error(token: &str, whitelist: Whitelist) -> TokenError {
        parse_ly_token(token, &whitelist).unwrap_err()
    }

    #[test]
    fn test_notes() {
        assert_eq!(
            note("a4("),
            LyEvent::Note {
                pitch: Pitch::new(PitchName::A, None, 3),
                duration: Duration { base: 4, dots: 0 },
                slur: Some(SlurMark::Start),
            }
        );
        assert_eq!(
            note("b'16"),
            LyEvent::Note {
                pitch: Pitch::new(PitchName::B, None, 4),
                duration: Duration { base: 16, dots: 0 },
                slur: None,
            }
        );
        assert_eq!(
            note("c,,2)"),
            LyEvent::Note {
                pitch: Pitch::new(PitchName::C, None, 1),
                duration: Duration { base: 2, dots: 0 },
                slur: Some(SlurMark::End),
            }
        );
        assert_eq!(
            note("ees''8."),
            LyEvent::Note {
                pitch: Pitch::new(PitchName::E, Some(Accidental::Flat), 5),
                duration: Duration { base: 8, dots: 1 },
                slur: None,
            }
        );
    }

    #[test]
    fn test_rests_and_spacers() {
        assert_eq!(
            note("r4"),
            LyEvent::Rest {
                duration: Duration { base: 4, dots: 0 }
            }
        );
        assert_eq!(
            note("s1"),
            LyEvent::Space {
                duration: Duration { base: 1, dots: 0 }
            }
        );
        assert_eq!(
            note("R1"),
            LyEvent::MeasureRest {
                duration: Duration { base: 1, dots: 0 }
            }
        );
        // "es" is E-flat, not a spacer
        assert!(note("es4").is_note());
    }

    #[test]
    fn test_token_errors() {
        let w = Whitelist::extended();
        assert_eq!(
            error("\\relative", w),
            TokenError::UnsupportedCommand("relative".to_string())
        );
        assert_eq!(error("a", w), TokenError::MissingDuration);
        assert_eq!(error("a'", w), TokenError::MissingDuration);
        assert_eq!(
            error("a3", w),
            TokenError::InvalidDuration("3".to_string())
        );
        assert_eq!(error("a4()", w), TokenError::UnexpectedCharacter('('));
        assert_eq!(error("a4~", w), TokenError::UnexpectedCharacter('~'));
        assert_eq!(error("<c4", w), TokenError::UnexpectedCharacter('<'));
        assert_eq!(error("C4", w), TokenError::UnexpectedCharacter('C'));
        assert_eq!(error("R", w), TokenError::MissingDuration);
        assert_eq!(error("r'4", w), TokenError::OctaveOnRest);
        assert_eq!(error("r4(", w), TokenError::UnexpectedCharacter('('));
        assert_eq!(
            error("h4", w),
            TokenError::InvalidPitch("h".to_string())
        );
        assert_eq!(error("c'',4", w), TokenError::MixedOctaveMarks);
    }

    #[test]
    fn test_strict_whitelist() {
        let w = Whitelist::strict();
        assert_eq!(error("fis4", w), TokenError::NotWhitelisted("accidentals"));
        assert_eq!(error("r4", w), TokenError::NotWhitelisted("rests"));
        assert_eq!(error("R1", w), TokenError::NotWhitelisted("rests"));
        assert_eq!(error("s4", w), TokenError::NotWhitelisted("spacers"));
        assert_eq!(error("c4.", w), TokenError::NotWhitelisted("dots"));
        assert!(parse_ly_token("g''32)", &w).is_ok());
    }
}
