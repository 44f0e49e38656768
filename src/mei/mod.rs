//! A small owned XML tree for MEI documents, with a quick-xml backed
//! reader and writer.

pub mod ids;
mod reader;
mod writer;

pub use reader::read_mei;
pub use writer::write_mei;

pub const MEI_NS: &str = "http://www.music-encoding.org/ns/mei";
pub const XML_ID: &str = "xml:id";
pub const DEFAULT_MEI_VERSION: &str = "2013";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeiElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MeiElement>,
    pub text: Option<String>,
}

impl MeiElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: MeiElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn xml_id(&self) -> Option<&str> {
        self.attr(XML_ID)
    }

    pub fn push(&mut self, child: MeiElement) {
        self.children.push(child);
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&MeiElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All descendants with the given name, in document order. Matches are not
    /// searched for further nested matches.
    pub fn descendants(&self, name: &str) -> Vec<&MeiElement> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.name == name {
                found.push(child);
            } else {
                found.extend(child.descendants(name));
            }
        }
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&MeiElement> {
        if self.xml_id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }
}
