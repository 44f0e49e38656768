//! ly2mei - LilyPond to MEI converter
//!
//! This library converts a whitelisted subset of LilyPond note entry into MEI
//! (Music Encoding Initiative) XML, and reads MEI documents back into LilyPond.

pub mod convert;
pub mod error;
pub mod file;
pub mod mei;
pub mod parser;
pub mod token_parser;
pub mod types;
pub mod whitelist;

#[cfg(feature = "python")]
pub mod python;

#[cfg(test)]
pub(crate) mod util;

// Re-export commonly used types
pub use convert::{ConversionSettings, IdStrategy, MeiSettings, convert_ly_to_mei, convert_mei_to_ly};
pub use error::{LyError, MeiError, SlurError, TokenError};
pub use file::{LyFile, LyMeasure};
pub use mei::{MeiElement, XML_ID};
pub use parser::{LyParser, parse_ly};
pub use types::duration::Duration;
pub use types::event::{LyEvent, SlurMark};
pub use types::pitch::{Accidental, Pitch, PitchName};
pub use whitelist::Whitelist;
