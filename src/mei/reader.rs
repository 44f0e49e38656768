use super::MeiElement;
use crate::error::MeiError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

fn xml_error(reader: &Reader<&[u8]>, e: impl std::fmt::Display) -> MeiError {
    MeiError::Xml(format!(
        "XML error at position {}: {}",
        reader.buffer_position(),
        e
    ))
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<MeiElement, MeiError> {
    let mut elem = MeiElement::new(String::from_utf8_lossy(e.local_name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(reader, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| xml_error(reader, err))?
            .into_owned();
        elem.attributes.push((key, value));
    }
    Ok(elem)
}

fn attach(stack: &mut [MeiElement], root: &mut Option<MeiElement>, elem: MeiElement) {
    match stack.last_mut() {
        Some(parent) => parent.push(elem),
        None => {
            if root.is_none() {
                *root = Some(elem);
            }
        }
    }
}

/// Parse an XML document into an element tree. Namespace prefixes are
/// dropped from element names; attribute keys are kept as written.
pub fn read_mei(xml: &str) -> Result<MeiElement, MeiError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<MeiElement> = Vec::new();
    let mut root: Option<MeiElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let elem = start_element(&reader, e)?;
                stack.push(elem);
            }
            Ok(Event::Empty(ref e)) => {
                let elem = start_element(&reader, e)?;
                attach(&mut stack, &mut root, elem);
            }
            Ok(Event::End(_)) => {
                if let Some(elem) = stack.pop() {
                    attach(&mut stack, &mut root, elem);
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().map_err(|err| xml_error(&reader, err))?;
                if let Some(parent) = stack.last_mut() {
                    parent.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(MeiError::Xml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or(MeiError::MissingElement("mei"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mei::XML_ID;

    #[test]
    fn test_read_tree() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<mei:mei xmlns:mei="http://www.music-encoding.org/ns/mei" meiversion="2013">
  <mei:measure n="1">
    <mei:note xml:id="a" pname="c" oct="4" dur="4"/>
    <!-- ignored -->
    <mei:slur startid="#a" endid="#a"/>
  </mei:measure>
</mei:mei>
"##;
        let root = read_mei(xml).unwrap();
        assert_eq!(root.name, "mei");
        assert_eq!(root.attr("meiversion"), Some("2013"));

        let measure = root.child("measure").unwrap();
        assert_eq!(measure.children.len(), 2);
        let note = &measure.children[0];
        assert_eq!(note.name, "note");
        assert_eq!(note.attr(XML_ID), Some("a"));
        assert_eq!(measure.children[1].attr("startid"), Some("#a"));
    }

    #[test]
    fn test_text_and_entities() {
        let root = read_mei("<title>Fr&#233;d&#233;ric &amp; co</title>").unwrap();
        assert_eq!(root.text.as_deref(), Some("Frédéric & co"));
    }

    #[test]
    fn test_malformed() {
        let err = read_mei("<mei><music></mei>").unwrap_err();
        assert!(matches!(err, MeiError::Xml(_)));

        let err = read_mei("<mei><music>").unwrap_err();
        assert!(matches!(err, MeiError::Xml(_)));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(read_mei(""), Err(MeiError::MissingElement("mei")));
    }
}
