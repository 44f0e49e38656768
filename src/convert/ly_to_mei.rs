use super::MeiSettings;
use crate::file::{LyFile, LyMeasure};
use crate::mei::ids::IdGenerator;
use crate::mei::{MEI_NS, MeiElement, XML_ID};
use crate::types::event::{LyEvent, SlurMark};

/// Build a complete MEI document from parsed LilyPond measures.
pub fn ly_to_mei(
    ly_file: &LyFile,
    settings: &MeiSettings,
    ids: &mut dyn IdGenerator,
) -> MeiElement {
    let mut section = MeiElement::new("section");
    for measure in &ly_file.measures {
        section.push(convert_measure(measure, ids));
    }

    let score = MeiElement::new("score")
        .with_child(score_def())
        .with_child(section);
    let music = MeiElement::new("music").with_child(
        MeiElement::new("body").with_child(MeiElement::new("mdiv").with_child(score)),
    );

    MeiElement::new("mei")
        .with_attr("xmlns", MEI_NS)
        .with_attr("meiversion", settings.mei_version.as_str())
        .with_child(mei_head(settings))
        .with_child(music)
}

fn mei_head(settings: &MeiSettings) -> MeiElement {
    let title = MeiElement::new("title").with_text(settings.title.clone().unwrap_or_default());
    MeiElement::new("meiHead").with_child(
        MeiElement::new("fileDesc")
            .with_child(MeiElement::new("titleStmt").with_child(title))
            .with_child(MeiElement::new("pubStmt")),
    )
}

fn score_def() -> MeiElement {
    MeiElement::new("scoreDef").with_child(
        MeiElement::new("staffGrp").with_child(
            MeiElement::new("staffDef")
                .with_attr("n", "1")
                .with_attr("lines", "5"),
        ),
    )
}

fn convert_event(event: &LyEvent, ids: &mut dyn IdGenerator) -> MeiElement {
    let mut elem = MeiElement::new(event.mei_name()).with_attr(XML_ID, ids.next_id(event.mei_name()));

    if let LyEvent::Note { pitch, .. } = event {
        elem.set_attr("pname", pitch.name.as_char().to_string());
        elem.set_attr("oct", pitch.octave.to_string());
    }

    let duration = event.duration();
    elem.set_attr("dur", duration.base.to_string());
    if duration.is_dotted() {
        elem.set_attr("dots", duration.dots.to_string());
    }

    if let LyEvent::Note {
        pitch,
        slur,
        ..
    } = event
    {
        if let Some(accid) = pitch.accidental {
            elem.set_attr("accid", accid.mei_value());
        }
        if let Some(mark) = slur {
            elem.set_attr("slur", mark.mei_value());
        }
    }
    elem
}

fn slur_element(plist: &[String], ids: &mut dyn IdGenerator) -> MeiElement {
    let refs: Vec<String> = plist.iter().map(|id| format!("#{}", id)).collect();
    let mut slur = MeiElement::new("slur")
        .with_attr(XML_ID, ids.next_id("slur"))
        .with_attr("staff", "1");
    if let (Some(first), Some(last)) = (refs.first(), refs.last()) {
        slur.set_attr("startid", first.as_str());
        slur.set_attr("endid", last.as_str());
    }
    slur.set_attr("plist", refs.join(" "));
    slur
}

fn convert_measure(measure: &LyMeasure, ids: &mut dyn IdGenerator) -> MeiElement {
    let mut mei_measure = MeiElement::new("measure")
        .with_attr(XML_ID, ids.next_id("measure"))
        .with_attr("n", measure.number.to_string());
    let staff = MeiElement::new("staff")
        .with_attr(XML_ID, ids.next_id("staff"))
        .with_attr("n", "1");
    let mut layer = MeiElement::new("layer")
        .with_attr(XML_ID, ids.next_id("layer"))
        .with_attr("n", "1");

    let mut slurs = Vec::new();
    // ids of the events under the currently open slur
    let mut open_slur: Option<Vec<String>> = None;

    for event in &measure.events {
        let elem = convert_event(event, ids);
        let id = elem.xml_id().unwrap_or_default().to_string();

        match event.slur() {
            Some(SlurMark::Start) => open_slur = Some(vec![id]),
            Some(SlurMark::End) => match open_slur.take() {
                Some(mut plist) => {
                    plist.push(id);
                    slurs.push(slur_element(&plist, ids));
                }
                None => log::warn!("Measure {}: slur end without start", measure.number),
            },
            None => {
                if let Some(plist) = open_slur.as_mut() {
                    plist.push(id);
                }
            }
        }
        layer.push(elem);
    }

    if open_slur.is_some() {
        log::warn!("Measure {}: dropping unclosed slur", measure.number);
    }

    mei_measure.push(staff.with_child(layer));
    for slur in slurs {
        mei_measure.push(slur);
    }
    mei_measure
}
