use crate::error::SlurError;
use crate::types::event::{LyEvent, SlurMark};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyMeasure {
    pub number: u32,
    pub events: Vec<LyEvent>,
}

impl LyMeasure {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            events: Vec::new(),
        }
    }

    pub fn with_events(number: u32, events: Vec<LyEvent>) -> Self {
        Self { number, events }
    }

    /// Slurs must open and close inside the measure, one at a time.
    pub fn check_slurs(&self) -> Result<(), SlurError> {
        let mut open = false;
        for event in &self.events {
            match (event.slur(), open) {
                (Some(SlurMark::Start), true) => return Err(SlurError::AlreadyOpen),
                (Some(SlurMark::End), false) => return Err(SlurError::NotOpen),
                (Some(SlurMark::Start), false) => open = true,
                (Some(SlurMark::End), true) => open = false,
                (None, _) => {}
            }
        }
        if open {
            return Err(SlurError::Unclosed);
        }
        Ok(())
    }
}

impl fmt::Display for LyMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            write!(f, "{} ", event)?;
        }
        write!(f, "|")
    }
}

/// A parsed LilyPond fragment: a flat sequence of measures on one staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyFile {
    pub measures: Vec<LyMeasure>,
}

impl Default for LyFile {
    fn default() -> Self {
        Self::new()
    }
}

impl LyFile {
    pub fn new() -> Self {
        Self {
            measures: Vec::new(),
        }
    }

    pub fn from_measures(measures: Vec<LyMeasure>) -> Self {
        Self { measures }
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.measures.iter().map(|m| m.events.len()).sum()
    }

    pub fn note_count(&self) -> usize {
        self.events().filter(|e| e.is_note()).count()
    }

    /// All events in order, across measures.
    pub fn events(&self) -> impl Iterator<Item = &LyEvent> {
        self.measures.iter().flat_map(|m| m.events.iter())
    }
}

impl fmt::Display for LyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for measure in &self.measures {
            writeln!(f, "{}", measure)?;
        }
        Ok(())
    }
}
