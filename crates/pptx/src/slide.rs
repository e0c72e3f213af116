//! A slide being built: placeholder shapes inherited from its layout.

use crate::blank::{NS_DRAWING, NS_PRESENTATION};
use crate::layout::{LayoutInfo, PlaceholderRef};
use crate::package::NS_RELATIONSHIPS;
use crate::text::TextBody;
use outline_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// A placeholder on the slide and the text written into it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderShape {
    pub placeholder: PlaceholderRef,
    pub text: TextBody,
}

impl PlaceholderShape {
    fn new(placeholder: PlaceholderRef) -> Self {
        Self {
            placeholder,
            text: TextBody::new(),
        }
    }
}

/// One new slide. Geometry and inherited styling come from the layout, so
/// only the placeholder binding and the text are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    layout_part: String,
    title: Option<PlaceholderShape>,
    body: Option<PlaceholderShape>,
}

impl Slide {
    pub fn from_layout(layout: &LayoutInfo) -> Self {
        Self {
            layout_part: layout.part.clone(),
            title: layout.title.clone().map(PlaceholderShape::new),
            body: layout.body.clone().map(PlaceholderShape::new),
        }
    }

    pub fn layout_part(&self) -> &str {
        &self.layout_part
    }

    /// The title placeholder's text, if the layout has one.
    pub fn title_mut(&mut self) -> Option<&mut TextBody> {
        self.title.as_mut().map(|s| &mut s.text)
    }

    /// The body placeholder's text, if the layout has one.
    pub fn body_mut(&mut self) -> Option<&mut TextBody> {
        self.body.as_mut().map(|s| &mut s.text)
    }

    pub fn title(&self) -> Option<&PlaceholderShape> {
        self.title.as_ref()
    }

    pub fn body(&self) -> Option<&PlaceholderShape> {
        self.body.as_ref()
    }

    /// Serialize as a `p:sld` part.
    pub fn to_xml(&self) -> Result<String> {
        self.write_xml()
            .map_err(|e| Error::Xml(format!("Failed to write slide: {}", e)))
    }

    fn write_xml(&self) -> quick_xml::Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("p:sld");
        root.push_attribute(("xmlns:a", NS_DRAWING));
        root.push_attribute(("xmlns:r", NS_RELATIONSHIPS));
        root.push_attribute(("xmlns:p", NS_PRESENTATION));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("p:cSld")))?;
        writer.write_event(Event::Start(BytesStart::new("p:spTree")))?;

        writer.write_event(Event::Start(BytesStart::new("p:nvGrpSpPr")))?;
        write_cnvpr(&mut writer, 1, "")?;
        writer.write_event(Event::Empty(BytesStart::new("p:cNvGrpSpPr")))?;
        writer.write_event(Event::Empty(BytesStart::new("p:nvPr")))?;
        writer.write_event(Event::End(BytesEnd::new("p:nvGrpSpPr")))?;
        writer.write_event(Event::Empty(BytesStart::new("p:grpSpPr")))?;

        let shapes = [(&self.title, "Title"), (&self.body, "Content Placeholder")];
        let mut next_id = 2;
        for (shape, fallback_name) in shapes {
            if let Some(shape) = shape {
                let name = if shape.placeholder.name.is_empty() {
                    format!("{} {}", fallback_name, next_id - 1)
                } else {
                    shape.placeholder.name.clone()
                };
                write_placeholder(&mut writer, next_id, &name, shape)?;
                next_id += 1;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("p:spTree")))?;
        writer.write_event(Event::End(BytesEnd::new("p:cSld")))?;
        writer.write_event(Event::Start(BytesStart::new("p:clrMapOvr")))?;
        writer.write_event(Event::Empty(BytesStart::new("a:masterClrMapping")))?;
        writer.write_event(Event::End(BytesEnd::new("p:clrMapOvr")))?;
        writer.write_event(Event::End(BytesEnd::new("p:sld")))?;

        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

fn write_cnvpr(writer: &mut Writer<Vec<u8>>, id: u32, name: &str) -> quick_xml::Result<()> {
    let mut el = BytesStart::new("p:cNvPr");
    el.push_attribute(("id", id.to_string().as_str()));
    el.push_attribute(("name", name));
    writer.write_event(Event::Empty(el))?;
    Ok(())
}

fn write_placeholder(
    writer: &mut Writer<Vec<u8>>,
    id: u32,
    name: &str,
    shape: &PlaceholderShape,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("p:sp")))?;
    writer.write_event(Event::Start(BytesStart::new("p:nvSpPr")))?;
    write_cnvpr(writer, id, name)?;

    writer.write_event(Event::Start(BytesStart::new("p:cNvSpPr")))?;
    let mut locks = BytesStart::new("a:spLocks");
    locks.push_attribute(("noGrp", "1"));
    writer.write_event(Event::Empty(locks))?;
    writer.write_event(Event::End(BytesEnd::new("p:cNvSpPr")))?;

    writer.write_event(Event::Start(BytesStart::new("p:nvPr")))?;
    let mut ph = BytesStart::new("p:ph");
    if let Some(kind) = &shape.placeholder.kind {
        ph.push_attribute(("type", kind.as_str()));
    }
    if let Some(idx) = shape.placeholder.idx {
        ph.push_attribute(("idx", idx.to_string().as_str()));
    }
    writer.write_event(Event::Empty(ph))?;
    writer.write_event(Event::End(BytesEnd::new("p:nvPr")))?;
    writer.write_event(Event::End(BytesEnd::new("p:nvSpPr")))?;

    writer.write_event(Event::Empty(BytesStart::new("p:spPr")))?;
    shape.text.write(writer)?;
    writer.write_event(Event::End(BytesEnd::new("p:sp")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_layout() -> LayoutInfo {
        LayoutInfo {
            part: "ppt/slideLayouts/slideLayout2.xml".into(),
            kind: Some("obj".into()),
            name: None,
            title: Some(PlaceholderRef {
                kind: Some("title".into()),
                idx: None,
                name: "Title 1".into(),
            }),
            body: Some(PlaceholderRef {
                kind: None,
                idx: Some(1),
                name: String::new(),
            }),
        }
    }

    #[test]
    fn test_slide_xml_binds_placeholders() {
        let mut slide = Slide::from_layout(&content_layout());
        slide.title_mut().unwrap().add_paragraph("Chapter & Verse");
        slide.body_mut().unwrap().add_paragraph("point");

        let xml = slide.to_xml().unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld "#));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Title 1"/>"#));
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="3" name="Content Placeholder 2"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:t>Chapter &amp; Verse</a:t>"));
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_missing_body_placeholder() {
        let mut layout = content_layout();
        layout.body = None;

        let mut slide = Slide::from_layout(&layout);
        assert!(slide.body_mut().is_none());
        assert!(slide.title_mut().is_some());
        assert!(!slide.to_xml().unwrap().contains("idx="));
    }

    #[test]
    fn test_untouched_placeholder_keeps_empty_paragraph() {
        let slide = Slide::from_layout(&content_layout());
        let xml = slide.to_xml().unwrap();
        assert_eq!(xml.matches("<a:p/>").count(), 2);
    }
}
