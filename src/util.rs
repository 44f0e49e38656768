use crate::mei::MeiElement;

/// Attributes of an element as borrowed pairs, for comparing in tests.
pub fn attrs(elem: &MeiElement) -> Vec<(&str, &str)> {
    elem.attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
