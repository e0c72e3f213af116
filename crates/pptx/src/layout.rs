//! Slide layouts and the placeholders they define.

use crate::package::{attr_value, local_name};
use outline_core::{Error, Result, SlideRole};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// The arrangement a slide is created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayoutRole {
    /// Centered title with a subtitle.
    TitleSubtitle,
    /// Title with a body region.
    TitleBody,
}

impl LayoutRole {
    pub fn for_slide(role: SlideRole) -> Self {
        match role {
            SlideRole::Cover => LayoutRole::TitleSubtitle,
            SlideRole::TableOfContents | SlideRole::Content => LayoutRole::TitleBody,
        }
    }
}

/// A `p:ph` element on a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRef {
    /// `type` attribute; absent means a generic content placeholder.
    pub kind: Option<String>,
    pub idx: Option<u32>,
    /// Shape name from `p:cNvPr`.
    pub name: String,
}

impl PlaceholderRef {
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_deref(), Some("title") | Some("ctrTitle"))
    }

    /// Placeholders that take free text. Date, footer, slide number and
    /// media placeholders do not.
    pub fn takes_body_text(&self) -> bool {
        matches!(
            self.kind.as_deref(),
            None | Some("body") | Some("subTitle") | Some("obj")
        )
    }
}

/// What a layout offers to slides built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part: String,
    /// `type` attribute of `p:sldLayout`.
    pub kind: Option<String>,
    /// Display name from `p:cSld/@name`.
    pub name: Option<String>,
    pub title: Option<PlaceholderRef>,
    pub body: Option<PlaceholderRef>,
}

impl LayoutInfo {
    /// Parse a layout part and pick its title and body placeholders.
    pub fn parse(part: &str, xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut kind = None;
        let mut name = None;
        let mut placeholders = Vec::new();
        let mut root_seen = false;
        let mut current: Option<(String, Option<PlaceholderRef>)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let qname = e.name();
                    let local = local_name(qname.as_ref());

                    if !root_seen {
                        root_seen = true;
                        if local != b"sldLayout" {
                            return Err(Error::Xml(format!("{} is not a slide layout", part)));
                        }
                        kind = attr_value(e, b"type");
                        continue;
                    }

                    match local {
                        b"cSld" => name = attr_value(e, b"name"),
                        b"sp" => current = Some((String::new(), None)),
                        b"cNvPr" => {
                            if let Some((shape_name, _)) = current.as_mut() {
                                *shape_name = attr_value(e, b"name").unwrap_or_default();
                            }
                        }
                        b"ph" => {
                            if let Some((_, ph)) = current.as_mut() {
                                *ph = Some(PlaceholderRef {
                                    kind: attr_value(e, b"type"),
                                    idx: attr_value(e, b"idx").and_then(|v| v.parse().ok()),
                                    name: String::new(),
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sp" => {
                    if let Some((shape_name, Some(mut ph))) = current.take() {
                        ph.name = shape_name;
                        placeholders.push(ph);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing {}: {}", part, e)));
                }
                _ => {}
            }
        }

        let title = placeholders.iter().find(|p| p.is_title()).cloned();
        let body = placeholders
            .iter()
            .filter(|p| !p.is_title() && p.takes_body_text())
            .min_by_key(|p| p.idx.unwrap_or(0))
            .cloned();

        Ok(Self {
            part: part.to_string(),
            kind,
            name,
            title,
            body,
        })
    }
}

/// Pick the layout for each role from a master's layouts, in master order.
///
/// Title+subtitle is the first `type="title"` layout, else the first one.
/// Title+body is the first `type="obj"` layout, else the second, else the
/// first.
pub fn resolve_roles(layouts: &[LayoutInfo]) -> Option<(LayoutInfo, LayoutInfo)> {
    let first = layouts.first()?;
    let of_kind = |kind: &str| layouts.iter().find(|l| l.kind.as_deref() == Some(kind));

    let title_subtitle = of_kind("title").unwrap_or(first);
    let title_body = of_kind("obj").or_else(|| layouts.get(1)).unwrap_or(first);
    Some((title_subtitle.clone(), title_body.clone()))
}
