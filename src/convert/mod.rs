mod ly_to_mei;
mod mei_to_ly;

pub use ly_to_mei::ly_to_mei;
pub use mei_to_ly::mei_to_ly;

use crate::file::LyFile;
use crate::mei::ids::{IdGenerator, SequentialIds, UuidIds};
use crate::mei::{DEFAULT_MEI_VERSION, read_mei, write_mei};
use crate::parser::LyParser;
use crate::whitelist::Whitelist;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    pub fn generator(&self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Box::new(UuidIds),
            IdStrategy::Sequential => Box::new(SequentialIds::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeiSettings {
    pub mei_version: String,
    pub title: Option<String>,
}

impl Default for MeiSettings {
    fn default() -> Self {
        Self {
            mei_version: DEFAULT_MEI_VERSION.to_string(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSettings {
    pub whitelist: Whitelist,
    pub mei: MeiSettings,
    /// Spaces per nesting level in written MEI, 0 for a single line.
    pub indent: usize,
    pub ids: IdStrategy,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            whitelist: Whitelist::default(),
            mei: MeiSettings::default(),
            indent: 2,
            ids: IdStrategy::default(),
        }
    }
}

/// Parse LilyPond source and write it out as an MEI document.
pub fn convert_ly_to_mei(content: &str, settings: &ConversionSettings) -> Result<String> {
    let ly_file = LyParser::with_whitelist(settings.whitelist)
        .parse(content)
        .context("Failed to parse LilyPond input")?;

    let mut ids = settings.ids.generator();
    let document = ly_to_mei(&ly_file, &settings.mei, ids.as_mut());
    write_mei(&document, settings.indent).context("Failed to write MEI")
}

/// Read an MEI document into LilyPond measures.
pub fn convert_mei_to_ly(xml: &str) -> Result<LyFile> {
    let root = read_mei(xml).context("Failed to read MEI input")?;
    let ly_file = mei_to_ly(&root).context("Failed to convert MEI to LilyPond")?;
    Ok(ly_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LyError, SlurError};
    use crate::parse_ly;
    use pretty_assertions::assert_eq;

    fn sequential() -> ConversionSettings {
        ConversionSettings {
            ids: IdStrategy::Sequential,
            mei: MeiSettings {
                title: Some("Test".to_string()),
                ..MeiSettings::default()
            },
            ..ConversionSettings::default()
        }
    }

    #[test]
    fn test_full_document() {
        let xml = convert_ly_to_mei("a4( b'16 c,,2)", &sequential()).unwrap();
        let expected = r##"<?xml version="1.0" encoding="UTF-8"?>
<mei xmlns="http://www.music-encoding.org/ns/mei" meiversion="2013">
  <meiHead>
    <fileDesc>
      <titleStmt>
        <title>Test</title>
      </titleStmt>
      <pubStmt/>
    </fileDesc>
  </meiHead>
  <music>
    <body>
      <mdiv>
        <score>
          <scoreDef>
            <staffGrp>
              <staffDef n="1" lines="5"/>
            </staffGrp>
          </scoreDef>
          <section>
            <measure xml:id="measure-1" n="1">
              <staff xml:id="staff-2" n="1">
                <layer xml:id="layer-3" n="1">
                  <note xml:id="note-4" pname="a" oct="3" dur="4" slur="i1"/>
                  <note xml:id="note-5" pname="b" oct="4" dur="16"/>
                  <note xml:id="note-6" pname="c" oct="1" dur="2" slur="t1"/>
                </layer>
              </staff>
              <slur xml:id="slur-7" staff="1" startid="#note-4" endid="#note-6" plist="#note-4 #note-5 #note-6"/>
            </measure>
          </section>
        </score>
      </mdiv>
    </body>
  </music>
</mei>
"##;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_back_to_lilypond() {
        let source = "c'4( d'8 e'8) fis'4 r4 |\ng'2.. s8 |\n";
        let xml = convert_ly_to_mei(source, &ConversionSettings::default()).unwrap();
        let ly_file = convert_mei_to_ly(&xml).unwrap();
        assert_eq!(ly_file, parse_ly(source).unwrap());
        assert_eq!(ly_file.to_string(), source);
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let xml = convert_ly_to_mei("c'4 c'4 c'4 c'4", &ConversionSettings::default()).unwrap();
        let root = read_mei(&xml).unwrap();
        let mut ids: Vec<&str> = root
            .descendants("note")
            .iter()
            .filter_map(|n| n.xml_id())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_errors_keep_cause() {
        let err = convert_ly_to_mei("c'4( d'4 | e'4)", &ConversionSettings::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse LilyPond input");
        assert_eq!(
            err.root_cause().downcast_ref::<LyError>(),
            Some(&LyError::Slur {
                measure: 1,
                kind: SlurError::Unclosed
            })
        );

        let err = convert_mei_to_ly("<mei><measure>").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read MEI input");
    }

    #[test]
    fn test_strict_settings() {
        let settings = ConversionSettings {
            whitelist: Whitelist::strict(),
            ..ConversionSettings::default()
        };
        assert!(convert_ly_to_mei("c'4 d'4", &settings).is_ok());
        assert!(convert_ly_to_mei("c'4 r4", &settings).is_err());
    }

    #[test]
    fn test_single_line_output() {
        let settings = ConversionSettings {
            indent: 0,
            ..sequential()
        };
        let xml = convert_ly_to_mei("c'1", &settings).unwrap();
        assert_eq!(xml.lines().count(), 1);
        assert!(xml.contains(
            "<layer xml:id=\"layer-3\" n=\"1\"><note xml:id=\"note-4\" pname=\"c\" oct=\"4\" dur=\"1\"/></layer>"
        ));
    }
}
