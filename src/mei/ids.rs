use uuid::Uuid;

/// Source of `xml:id` values.
///
/// Ids are prefixed with the element name so they are always valid XML names.
pub trait IdGenerator {
    fn next_id(&mut self, element: &str) -> String;
}

#[derive(Debug, Default, Clone)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, element: &str) -> String {
        format!("{}-{}", element, Uuid::new_v4().simple())
    }
}

/// Deterministic ids (`note-1`, `layer-2`, ...) with one counter for all elements.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, element: &str) -> String {
        self.counter += 1;
        format!("{}-{}", element, self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("note"), "note-1");
        assert_eq!(ids.next_id("slur"), "slur-2");
        assert_eq!(ids.next_id("note"), "note-3");
    }

    #[test]
    fn test_uuid() {
        let mut ids = UuidIds;
        let a = ids.next_id("measure");
        let b = ids.next_id("measure");
        assert_ne!(a, b);
        assert!(a.starts_with("measure-"));
        assert_eq!(a.len(), "measure-".len() + 32);
    }
}
