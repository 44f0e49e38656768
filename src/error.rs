//! Error types for LilyPond parsing and MEI conversion.
//!
//! Token-level failures carry the offending token and its position, slur
//! failures carry the measure they occurred in. MEI failures describe the
//! element or attribute that could not be read.

use thiserror::Error;

/// Failure to parse a single LilyPond token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("commands are not supported (\\{0})")]
    UnsupportedCommand(String),

    #[error("invalid pitch \"{0}\"")]
    InvalidPitch(String),

    #[error("cannot mix ' and , in one octave mark")]
    MixedOctaveMarks,

    #[error("octave {0} is out of range (0-9)")]
    OctaveOutOfRange(i32),

    #[error("octave marks are not allowed on rests or spacers")]
    OctaveOnRest,

    #[error("missing duration")]
    MissingDuration,

    #[error("invalid duration \"{0}\"")]
    InvalidDuration(String),

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("{0} are not in the syntax whitelist")]
    NotWhitelisted(&'static str),
}

/// Slur misuse within a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlurError {
    #[error("slur started while another slur is open")]
    AlreadyOpen,

    #[error("slur ended but none is open")]
    NotOpen,

    #[error("slur is not closed before the end of the measure")]
    Unclosed,
}

/// Top-level LilyPond parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LyError {
    #[error("line {line}, column {column}: \"{token}\": {kind}")]
    Token {
        line: usize,
        column: usize,
        token: String,
        kind: TokenError,
    },

    #[error("measure {measure}: {kind}")]
    Slur { measure: u32, kind: SlurError },

    #[error("unterminated block comment starting at line {line}, column {column}")]
    UnterminatedComment { line: usize, column: usize },
}

/// Failure to read an MEI document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeiError {
    /// XML is malformed
    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("missing required element <{0}>")]
    MissingElement(&'static str),

    #[error("<{element}> is missing the @{attribute} attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> has an invalid @{attribute} value \"{value}\"")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
    },

    #[error("reference to unknown xml:id \"{0}\"")]
    UnknownId(String),

    /// Slurs that cannot be written back as LilyPond
    #[error("measure {measure}: {kind}")]
    Slur { measure: u32, kind: SlurError },
}
