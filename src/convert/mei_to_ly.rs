use crate::error::MeiError;
use crate::file::{LyFile, LyMeasure};
use crate::mei::MeiElement;
use crate::types::duration::Duration;
use crate::types::event::{LyEvent, SlurMark};
use crate::types::pitch::{Accidental, MAX_OCTAVE, MIN_OCTAVE, Pitch, PitchName};

fn required<'a>(elem: &'a MeiElement, attribute: &'static str) -> Result<&'a str, MeiError> {
    elem.attr(attribute).ok_or_else(|| MeiError::MissingAttribute {
        element: elem.name.clone(),
        attribute,
    })
}

fn invalid(elem: &MeiElement, attribute: &'static str, value: &str) -> MeiError {
    MeiError::InvalidAttribute {
        element: elem.name.clone(),
        attribute,
        value: value.to_string(),
    }
}

fn read_duration(elem: &MeiElement) -> Result<Duration, MeiError> {
    let dur = required(elem, "dur")?;
    let dots = elem.attr("dots");
    Duration::from_mei(dur, dots).ok_or_else(|| match dots {
        Some(d) if Duration::from_mei(dur, None).is_some() => invalid(elem, "dots", d),
        _ => invalid(elem, "dur", dur),
    })
}

/// Written accidental first, then gestural, on the note or a child `<accid>`.
fn read_accidental(note: &MeiElement) -> Result<Option<Accidental>, MeiError> {
    let accid_child = note.child("accid");
    let candidates = [
        (note, "accid"),
        (note, "accid.ges"),
    ]
    .into_iter()
    .chain(accid_child.map(|a| (a, "accid")))
    .chain(accid_child.map(|a| (a, "accid.ges")));

    for (elem, attribute) in candidates {
        if let Some(value) = elem.attr(attribute) {
            if value == "n" {
                return Ok(None);
            }
            return Accidental::from_mei(value)
                .map(Some)
                .ok_or_else(|| invalid(elem, "accid", value));
        }
    }
    Ok(None)
}

fn read_note(note: &MeiElement) -> Result<LyEvent, MeiError> {
    let pname = required(note, "pname")?;
    let name = PitchName::from_mei(pname).ok_or_else(|| invalid(note, "pname", pname))?;

    let oct = required(note, "oct")?;
    let octave: i8 = oct
        .trim()
        .parse()
        .ok()
        .filter(|o| (MIN_OCTAVE..=MAX_OCTAVE).contains(o))
        .ok_or_else(|| invalid(note, "oct", oct))?;

    Ok(LyEvent::Note {
        pitch: Pitch::new(name, read_accidental(note)?, octave),
        duration: read_duration(note)?,
        slur: note.attr("slur").and_then(SlurMark::from_mei),
    })
}

/// Collect events from a layer, descending into beams.
fn collect_events(
    container: &MeiElement,
    measure: u32,
    events: &mut Vec<(Option<String>, LyEvent)>,
) -> Result<(), MeiError> {
    for child in &container.children {
        let event = match child.name.as_str() {
            "note" => read_note(child)?,
            "rest" => LyEvent::Rest {
                duration: read_duration(child)?,
            },
            "space" => LyEvent::Space {
                duration: read_duration(child)?,
            },
            "mRest" => LyEvent::MeasureRest {
                duration: match child.attr("dur") {
                    Some(_) => read_duration(child)?,
                    None => Duration { base: 1, dots: 0 },
                },
            },
            "beam" => {
                collect_events(child, measure, events)?;
                continue;
            }
            other => {
                log::warn!("Measure {}: skipping unsupported <{}>", measure, other);
                continue;
            }
        };
        events.push((child.xml_id().map(str::to_string), event));
    }
    Ok(())
}

fn reference<'a>(slur: &'a MeiElement, attribute: &'static str) -> Result<&'a str, MeiError> {
    let value = required(slur, attribute)?.trim();
    Ok(value.strip_prefix('#').unwrap_or(value))
}

fn position(events: &[(Option<String>, LyEvent)], id: &str) -> Option<usize> {
    events
        .iter()
        .position(|(event_id, _)| event_id.as_deref() == Some(id))
}

/// Apply `<slur>` control events whose ends both lie in the converted layer.
fn apply_slurs(
    root: &MeiElement,
    measure: &MeiElement,
    number: u32,
    events: &mut [(Option<String>, LyEvent)],
) -> Result<(), MeiError> {
    for slur in measure.descendants("slur") {
        let start_id = reference(slur, "startid")?;
        let end_id = reference(slur, "endid")?;
        for id in [start_id, end_id] {
            if root.find_by_id(id).is_none() {
                return Err(MeiError::UnknownId(id.to_string()));
            }
        }

        match (position(events, start_id), position(events, end_id)) {
            (Some(start), Some(end)) if start < end => {
                events[start].1.set_slur(SlurMark::Start);
                events[end].1.set_slur(SlurMark::End);
            }
            (Some(_), Some(_)) => {
                log::warn!(
                    "Measure {}: skipping slur from #{} to #{} that does not run forward",
                    number,
                    start_id,
                    end_id
                );
            }
            _ => {
                log::warn!(
                    "Measure {}: skipping slur from #{} to #{} outside the converted layer",
                    number,
                    start_id,
                    end_id
                );
            }
        }
    }
    Ok(())
}

fn convert_measure(
    root: &MeiElement,
    measure: &MeiElement,
    number: u32,
) -> Result<LyMeasure, MeiError> {
    let staves = measure.descendants("staff");
    let Some(staff) = staves.first() else {
        log::warn!("Measure {}: no <staff>", number);
        return Ok(LyMeasure::new(number));
    };
    if staves.len() > 1 {
        log::warn!(
            "Measure {}: converting the first of {} staves",
            number,
            staves.len()
        );
    }

    let layers = staff.descendants("layer");
    let Some(layer) = layers.first() else {
        log::warn!("Measure {}: no <layer>", number);
        return Ok(LyMeasure::new(number));
    };
    if layers.len() > 1 {
        log::warn!(
            "Measure {}: converting the first of {} layers",
            number,
            layers.len()
        );
    }

    let mut events = Vec::new();
    collect_events(layer, number, &mut events)?;
    apply_slurs(root, measure, number, &mut events)?;

    let ly_measure = LyMeasure::with_events(
        number,
        events.into_iter().map(|(_, event)| event).collect(),
    );
    ly_measure
        .check_slurs()
        .map_err(|kind| MeiError::Slur { measure: number, kind })?;
    Ok(ly_measure)
}

/// Convert an MEI document to LilyPond measures. Only the first layer of the
/// first staff of each measure is read.
pub fn mei_to_ly(root: &MeiElement) -> Result<LyFile, MeiError> {
    let measures = root.descendants("measure");
    if measures.is_empty() {
        log::warn!("No <measure> elements found in <{}>", root.name);
    }

    let mut ly_file = LyFile::new();
    for (idx, measure) in measures.into_iter().enumerate() {
        let number = measure
            .attr("n")
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(idx as u32 + 1);
        ly_file.measures.push(convert_measure(root, measure, number)?);
    }

    log::debug!(
        "Read {} measures with {} events from MEI",
        ly_file.measures.len(),
        ly_file.event_count()
    );
    Ok(ly_file)
}
