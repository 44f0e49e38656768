use super::MeiElement;
use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Serialize a document with an XML declaration. `indent` of 0 writes
/// everything on one line.
pub fn write_mei(root: &MeiElement, indent: usize) -> Result<String> {
    let mut writer = if indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    } else {
        Writer::new(Vec::new())
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn write_element(writer: &mut Writer<Vec<u8>>, elem: &MeiElement) -> quick_xml::Result<()> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() && elem.text.is_none() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &elem.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))
}
