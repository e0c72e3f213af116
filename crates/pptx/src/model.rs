//! The presentation being generated: a blank or template-derived package
//! plus the slides appended to it.

use crate::blank::blank_package;
use crate::layout::{resolve_roles, LayoutInfo, LayoutRole};
use crate::package::{
    attr_value, local_name, parse_relationships, part_number, prefix_of, relationships_of,
    relative_target, rels_path_for, resolve_target, rewrite_xml, Package, CONTENT_TYPES,
    NS_RELATIONSHIPS, REL_OFFICE_DOCUMENT, REL_SLIDE, REL_SLIDE_LAYOUT, REL_SLIDE_MASTER,
};
use crate::slide::Slide;
use outline_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};

pub(crate) const CT_PRESENTATION_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Main content types that are rewritten so the output opens as a deck.
const REWRITTEN_MAIN_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
];

/// Lowest `p:sldId/@id` the schema allows.
const MIN_SLIDE_ID: u32 = 256;

/// A slide added during this run.
#[derive(Debug, Clone)]
struct AddedSlide {
    part: String,
}

/// An open presentation with its layout roles resolved.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    package: Package,
    presentation_part: String,
    title_subtitle: LayoutInfo,
    title_body: LayoutInfo,
    existing_slides: usize,
    next_slide_number: u32,
    added: Vec<AddedSlide>,
}

impl DocumentModel {
    /// The built-in widescreen presentation.
    pub fn blank() -> Result<Self> {
        Self::from_package(blank_package())
    }

    /// Open a `.pptx`/`.potx` file as the base document.
    pub fn open_template(path: &Path) -> Result<Self> {
        let unreadable = |reason: String| Error::TemplateUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        let model = Self::from_bytes(&bytes).map_err(|e| unreadable(e.to_string()))?;
        log::debug!(
            "Opened template {} ({} existing slides)",
            path.display(),
            model.existing_slides
        );
        Ok(model)
    }

    /// Open template bytes that did not come from a file.
    pub fn from_template_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes).map_err(|e| Error::TemplateUnreadable {
            path: PathBuf::from("<template bytes>"),
            reason: e.to_string(),
        })
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::read(bytes)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let presentation_part = relationships_of(&package, "")?
            .into_iter()
            .find(|r| r.rel_type == REL_OFFICE_DOCUMENT)
            .map(|r| resolve_target("", &r.target))
            .ok_or_else(|| Error::Xml("Package has no main document relationship".into()))?;

        let presentation = package.xml(&presentation_part)?;
        let scan = PresentationScan::read(presentation)?;
        let master_part = first_master(&package, &presentation_part, &scan)?;
        let layouts = master_layouts(&package, &master_part)?;

        let (title_subtitle, title_body) = resolve_roles(&layouts)
            .ok_or_else(|| Error::Xml(format!("{} has no slide layouts", master_part)))?;
        log::debug!(
            "Layout roles: title+subtitle = {}, title+body = {}",
            title_subtitle.part,
            title_body.part
        );

        let slides_dir = slides_dir(&presentation_part);
        let next_slide_number = package
            .part_names()
            .filter(|n| n.starts_with(&slides_dir) && n.ends_with(".xml"))
            .filter(|n| !n[slides_dir.len()..].contains('/'))
            .filter_map(part_number)
            .max()
            .unwrap_or(0)
            + 1;

        Ok(Self {
            package,
            presentation_part,
            title_subtitle,
            title_body,
            existing_slides: scan.slide_ids.len(),
            next_slide_number,
            added: Vec::new(),
        })
    }

    pub fn layout(&self, role: LayoutRole) -> &LayoutInfo {
        match role {
            LayoutRole::TitleSubtitle => &self.title_subtitle,
            LayoutRole::TitleBody => &self.title_body,
        }
    }

    #[cfg(test)]
    pub(crate) fn replace_layout(&mut self, role: LayoutRole, layout: LayoutInfo) {
        match role {
            LayoutRole::TitleSubtitle => self.title_subtitle = layout,
            LayoutRole::TitleBody => self.title_body = layout,
        }
    }

    /// Slides that were already in the base document.
    pub fn existing_slide_count(&self) -> usize {
        self.existing_slides
    }

    /// Slides added with [`DocumentModel::add_slide`].
    pub fn added_slide_count(&self) -> usize {
        self.added.len()
    }

    /// Start a slide from the layout for `role`.
    pub fn new_slide(&self, role: LayoutRole) -> Slide {
        Slide::from_layout(self.layout(role))
    }

    /// Store a finished slide as the next part of the deck.
    pub fn add_slide(&mut self, slide: &Slide) -> Result<()> {
        let part = format!(
            "{}slide{}.xml",
            slides_dir(&self.presentation_part),
            self.next_slide_number
        );

        self.package.set_part(&part, slide.to_xml()?);
        self.package.set_part(
            &rels_path_for(&part),
            relationships_xml(&[(
                "rId1".to_string(),
                REL_SLIDE_LAYOUT,
                relative_target(&part, slide.layout_part()),
            )])?,
        );

        log::debug!("Added {} (layout {})", part, slide.layout_part());
        self.added.push(AddedSlide { part });
        self.next_slide_number += 1;
        Ok(())
    }

    /// Link the added slides into the presentation and serialize the package.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let pres_rels_part = rels_path_for(&self.presentation_part);
        let existing_rels = if self.package.has_part(&pres_rels_part) {
            parse_relationships(self.package.xml(&pres_rels_part)?)?
        } else {
            Vec::new()
        };

        let first_rid = existing_rels
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0)
            + 1;

        let new_rels: Vec<(String, &str, String)> = self
            .added
            .iter()
            .enumerate()
            .map(|(i, slide)| {
                (
                    format!("rId{}", first_rid + i as u32),
                    REL_SLIDE,
                    relative_target(&self.presentation_part, &slide.part),
                )
            })
            .collect();

        if !new_rels.is_empty() {
            let rels = if self.package.has_part(&pres_rels_part) {
                append_relationships(self.package.xml(&pres_rels_part)?, &new_rels)?
            } else {
                relationships_xml(&new_rels)?
            };
            self.package.set_part(&pres_rels_part, rels);

            let presentation = self.package.xml(&self.presentation_part)?;
            let rids: Vec<&str> = new_rels.iter().map(|(id, _, _)| id.as_str()).collect();
            let updated = append_slide_ids(presentation, &rids)?;
            self.package.set_part(&self.presentation_part, updated);
        }

        let new_parts: Vec<String> = self.added.iter().map(|s| format!("/{}", s.part)).collect();
        let content_types = update_content_types(
            self.package.xml(CONTENT_TYPES)?,
            &format!("/{}", self.presentation_part),
            &new_parts,
        )?;
        self.package.set_part(CONTENT_TYPES, content_types);

        self.package.to_bytes()
    }
}

/// Folder new slides go into, with a trailing slash.
fn slides_dir(presentation_part: &str) -> String {
    match presentation_part.rsplit_once('/') {
        Some((dir, _)) => format!("{}/slides/", dir),
        None => "slides/".to_string(),
    }
}

/// What the layout resolution and slide numbering need from presentation.xml.
#[derive(Debug, Default)]
struct PresentationScan {
    master_rids: Vec<String>,
    slide_ids: Vec<u32>,
}

impl PresentationScan {
    fn read(xml: &str) -> Result<Self> {
        let mut scan = Self::default();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match local_name(e.name().as_ref()) {
                        b"sldMasterId" => {
                            if let Some(rid) = relationship_id(e) {
                                scan.master_rids.push(rid);
                            }
                        }
                        b"sldId" => {
                            if let Some(id) = attr_value(e, b"id").and_then(|v| v.parse().ok()) {
                                scan.slide_ids.push(id);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(format!("Error parsing presentation: {}", e))),
                _ => {}
            }
        }

        Ok(scan)
    }
}

/// The prefixed `id` attribute that holds a relationship id.
fn relationship_id(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| {
            let key = attr.key.as_ref();
            prefix_of(key).is_some() && local_name(key) == b"id"
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn first_master(package: &Package, presentation_part: &str, scan: &PresentationScan) -> Result<String> {
    let rels = relationships_of(package, presentation_part)?;

    let listed = scan
        .master_rids
        .iter()
        .find_map(|rid| rels.iter().find(|r| &r.id == rid));
    let master = listed
        .or_else(|| rels.iter().find(|r| r.rel_type == REL_SLIDE_MASTER))
        .ok_or_else(|| Error::Xml("Presentation has no slide master".into()))?;

    Ok(resolve_target(presentation_part, &master.target))
}

/// Layouts of a master, in `sldLayoutIdLst` order.
fn master_layouts(package: &Package, master_part: &str) -> Result<Vec<LayoutInfo>> {
    let master = package.xml(master_part)?;
    let rels = relationships_of(package, master_part)?;

    let mut rids = Vec::new();
    let mut reader = Reader::from_str(master);
    reader.trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                if let Some(rid) = relationship_id(e) {
                    rids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing {}: {}", master_part, e)));
            }
            _ => {}
        }
    }

    let targets: Vec<&str> = if rids.is_empty() {
        rels.iter()
            .filter(|r| r.rel_type == REL_SLIDE_LAYOUT)
            .map(|r| r.target.as_str())
            .collect()
    } else {
        rids.iter()
            .filter_map(|rid| rels.iter().find(|r| &r.id == rid))
            .map(|r| r.target.as_str())
            .collect()
    };

    targets
        .into_iter()
        .map(|target| {
            let part = resolve_target(master_part, target);
            LayoutInfo::parse(&part, package.xml(&part)?)
        })
        .collect()
}

fn write_relationship(
    writer: &mut Writer<Vec<u8>>,
    (id, rel_type, target): &(String, &str, String),
) -> quick_xml::Result<()> {
    let mut el = BytesStart::new("Relationship");
    el.push_attribute(("Id", id.as_str()));
    el.push_attribute(("Type", *rel_type));
    el.push_attribute(("Target", target.as_str()));
    writer.write_event(Event::Empty(el))?;
    Ok(())
}

/// A complete `.rels` part.
fn relationships_xml(rels: &[(String, &str, String)]) -> Result<String> {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    let mut writer = Writer::new(Vec::new());
    for rel in rels {
        write_relationship(&mut writer, rel)
            .map_err(|e| Error::Xml(format!("Error writing relationships: {}", e)))?;
    }
    xml.push_str(&String::from_utf8_lossy(&writer.into_inner()));
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn append_relationships(xml: &str, rels: &[(String, &str, String)]) -> Result<String> {
    rewrite_xml(xml, |event, w| match event {
        Event::End(ref e) if local_name(e.name().as_ref()) == b"Relationships" => {
            for rel in rels {
                write_relationship(w, rel)?;
            }
            w.write_event(event)
        }
        Event::Empty(ref e) if local_name(e.name().as_ref()) == b"Relationships" => {
            let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
            w.write_event(Event::Start(e.clone()))?;
            for rel in rels {
                write_relationship(w, rel)?;
            }
            w.write_event(Event::End(BytesEnd::new(name)))
        }
        other => w.write_event(other),
    })
}

/// Append `p:sldId` entries for `rids` to presentation.xml, creating the
/// list if the presentation has none.
fn append_slide_ids(xml: &str, rids: &[&str]) -> Result<String> {
    let scan = PresentationScan::read(xml)?;
    let first_id = scan
        .slide_ids
        .iter()
        .max()
        .map_or(MIN_SLIDE_ID, |max| (max + 1).max(MIN_SLIDE_ID));

    let mut root_prefix: Option<String> = None;
    let mut r_prefix: Option<String> = None;
    let mut root_seen = false;
    let mut inserted = false;
    let mut in_list = false;

    // Element names depend on the root's prefixes, which are known only once
    // the root has been read.
    let write_ids = |w: &mut Writer<Vec<u8>>,
                     root_prefix: &Option<String>,
                     r_prefix: &Option<String>|
     -> quick_xml::Result<()> {
        let sld_id = qualify(root_prefix, "sldId");
        let r_id = qualify(r_prefix, "id");
        for (i, rid) in rids.iter().enumerate() {
            let mut el = BytesStart::new(sld_id.as_str());
            el.push_attribute(("id", (first_id + i as u32).to_string().as_str()));
            el.push_attribute((r_id.as_str(), *rid));
            w.write_event(Event::Empty(el))?;
        }
        Ok(())
    };

    rewrite_xml(xml, |event, w| {
        match event {
            Event::Start(ref e) if !root_seen => {
                root_seen = true;
                root_prefix = prefix_of(e.name().as_ref());
                r_prefix = e.attributes().flatten().find_map(|attr| {
                    let key = attr.key.as_ref();
                    (key.starts_with(b"xmlns:") && attr.value.as_ref() == NS_RELATIONSHIPS.as_bytes())
                        .then(|| String::from_utf8_lossy(&key[6..]).into_owned())
                });
                if r_prefix.is_none() {
                    let mut root = e.clone();
                    root.push_attribute(("xmlns:r", NS_RELATIONSHIPS));
                    r_prefix = Some("r".to_string());
                    return w.write_event(Event::Start(root));
                }
                w.write_event(event)
            }
            Event::Start(ref e) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = true;
                w.write_event(event)
            }
            Event::End(ref e) if in_list && local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = false;
                inserted = true;
                write_ids(w, &root_prefix, &r_prefix)?;
                w.write_event(event)
            }
            Event::Empty(ref e) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                inserted = true;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                w.write_event(Event::Start(BytesStart::new(name.as_str())))?;
                write_ids(w, &root_prefix, &r_prefix)?;
                w.write_event(Event::End(BytesEnd::new(name)))
            }
            Event::Start(ref e) | Event::Empty(ref e)
                if !inserted
                    && !in_list
                    && matches!(local_name(e.name().as_ref()), b"sldSz" | b"notesSz") =>
            {
                inserted = true;
                let list = qualify(&root_prefix, "sldIdLst");
                w.write_event(Event::Start(BytesStart::new(list.as_str())))?;
                write_ids(w, &root_prefix, &r_prefix)?;
                w.write_event(Event::End(BytesEnd::new(list)))?;
                w.write_event(event)
            }
            other => w.write_event(other),
        }
    })
}

fn qualify(prefix: &Option<String>, local: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.to_string(),
    }
}

/// Add slide overrides and give the main part the presentation type.
fn update_content_types(xml: &str, main_part: &str, slide_parts: &[String]) -> Result<String> {
    let write_override = |w: &mut Writer<Vec<u8>>, part: &str, content_type: &str| {
        let mut el = BytesStart::new("Override");
        el.push_attribute(("PartName", part));
        el.push_attribute(("ContentType", content_type));
        w.write_event(Event::Empty(el))
    };

    rewrite_xml(xml, |event, w| match event {
        Event::Empty(ref e)
            if local_name(e.name().as_ref()) == b"Override"
                && attr_value(e, b"PartName").as_deref() == Some(main_part)
                && attr_value(e, b"ContentType")
                    .map_or(false, |ct| REWRITTEN_MAIN_TYPES.contains(&ct.as_str())) =>
        {
            log::debug!("Rewriting main content type of {}", main_part);
            write_override(w, main_part, CT_PRESENTATION_MAIN)
        }
        Event::End(ref e) if local_name(e.name().as_ref()) == b"Types" => {
            for part in slide_parts {
                write_override(w, part, CT_SLIDE)?;
            }
            w.write_event(event)
        }
        other => w.write_event(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Relationship;

    fn model_with_slides(n: usize) -> DocumentModel {
        let mut model = DocumentModel::blank().unwrap();
        for i in 0..n {
            let role = if i == 0 {
                LayoutRole::TitleSubtitle
            } else {
                LayoutRole::TitleBody
            };
            let mut slide = model.new_slide(role);
            slide.title_mut().unwrap().add_paragraph(&format!("Slide {}", i + 1));
            model.add_slide(&slide).unwrap();
        }
        model
    }

    #[test]
    fn test_blank_model_resolves_roles() {
        let model = DocumentModel::blank().unwrap();
        let cover = model.layout(LayoutRole::TitleSubtitle);
        assert_eq!(cover.kind.as_deref(), Some("title"));
        assert_eq!(cover.title.as_ref().unwrap().kind.as_deref(), Some("ctrTitle"));
        assert_eq!(cover.body.as_ref().unwrap().kind.as_deref(), Some("subTitle"));

        let content = model.layout(LayoutRole::TitleBody);
        assert_eq!(content.kind.as_deref(), Some("obj"));
        assert_eq!(content.body.as_ref().unwrap().idx, Some(1));
        assert_eq!(model.existing_slide_count(), 0);
    }

    #[test]
    fn test_finish_links_slides_in_order() {
        let bytes = model_with_slides(3).finish().unwrap();
        let package = Package::read(&bytes).unwrap();

        let presentation = package.xml("ppt/presentation.xml").unwrap();
        let scan = PresentationScan::read(presentation).unwrap();
        assert_eq!(scan.slide_ids, vec![256, 257, 258]);
        let list_at = presentation.find("<p:sldIdLst>").unwrap();
        assert!(list_at < presentation.find("<p:sldSz").unwrap());
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));

        let rels = parse_relationships(package.xml("ppt/_rels/presentation.xml.rels").unwrap()).unwrap();
        let slides: Vec<&Relationship> = rels.iter().filter(|r| r.rel_type == REL_SLIDE).collect();
        let targets: Vec<&str> = slides.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["slides/slide1.xml", "slides/slide2.xml", "slides/slide3.xml"]);

        let slide_rels = parse_relationships(package.xml("ppt/slides/_rels/slide1.xml.rels").unwrap()).unwrap();
        assert_eq!(slide_rels[0].target, "../slideLayouts/slideLayout1.xml");
        let slide_rels = parse_relationships(package.xml("ppt/slides/_rels/slide2.xml.rels").unwrap()).unwrap();
        assert_eq!(slide_rels[0].target, "../slideLayouts/slideLayout2.xml");

        let types = package.xml(CONTENT_TYPES).unwrap();
        assert_eq!(types.matches(CT_SLIDE).count(), 3);
        assert!(types.contains(r#"<Override PartName="/ppt/slides/slide3.xml""#));
    }

    #[test]
    fn test_reopened_output_appends_after_existing_slides() {
        let first = model_with_slides(2).finish().unwrap();

        let mut model = DocumentModel::from_template_bytes(&first).unwrap();
        assert_eq!(model.existing_slide_count(), 2);
        let mut slide = model.new_slide(LayoutRole::TitleBody);
        slide.title_mut().unwrap().add_paragraph("Appended");
        model.add_slide(&slide).unwrap();
        assert_eq!(model.added_slide_count(), 1);

        let package = Package::read(&model.finish().unwrap()).unwrap();
        assert!(package.xml("ppt/slides/slide1.xml").unwrap().contains("Slide 1"));
        assert!(package.xml("ppt/slides/slide3.xml").unwrap().contains("Appended"));

        let presentation = package.xml("ppt/presentation.xml").unwrap();
        let scan = PresentationScan::read(presentation).unwrap();
        assert_eq!(scan.slide_ids, vec![256, 257, 258]);
        assert_eq!(presentation.matches("<p:sldIdLst>").count(), 1);
    }

    #[test]
    fn test_slide_ids_with_foreign_prefixes() {
        let xml = r#"<pml:presentation xmlns:pml="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><pml:sldIdLst><pml:sldId id="300" rel:id="rId9"/></pml:sldIdLst><pml:sldSz cx="1" cy="1"/><pml:notesSz cx="1" cy="1"/></pml:presentation>"#;
        let out = append_slide_ids(xml, &["rId10"]).unwrap();
        assert!(out.contains(r#"<pml:sldId id="300" rel:id="rId9"/><pml:sldId id="301" rel:id="rId10"/></pml:sldIdLst>"#));
    }

    #[test]
    fn test_slide_ids_declare_missing_namespace() {
        let xml = r#"<presentation xmlns="http://schemas.openxmlformats.org/presentationml/2006/main"><sldIdLst/><sldSz cx="1" cy="1"/></presentation>"#;
        let out = append_slide_ids(xml, &["rId2"]).unwrap();
        assert!(out.contains(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#));
        assert!(out.contains(r#"<sldIdLst><sldId id="256" r:id="rId2"/></sldIdLst>"#));
    }

    #[test]
    fn test_template_main_type_is_rewritten() {
        let xml = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.template.main+xml"/></Types>"#;
        let out = update_content_types(xml, "/ppt/presentation.xml", &[]).unwrap();
        assert!(out.contains(CT_PRESENTATION_MAIN));
        assert!(!out.contains("template.main"));
    }

    #[test]
    fn test_empty_relationships_element_grows() {
        let rels = vec![("rId1".to_string(), REL_SLIDE, "slides/slide1.xml".to_string())];
        let out = append_relationships(r#"<Relationships xmlns="x"/>"#, &rels).unwrap();
        let parsed = parse_relationships(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].target, "slides/slide1.xml");
    }

    #[test]
    fn test_new_relationships_part_parses_back() {
        let rels = vec![
            ("rId1".to_string(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml".to_string()),
            ("rId2".to_string(), REL_SLIDE, "slides/a&b.xml".to_string()),
        ];
        let xml = relationships_xml(&rels).unwrap();
        let parsed = parse_relationships(&xml).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].rel_type, REL_SLIDE_LAYOUT);
        assert_eq!(parsed[1].id, "rId2");
        assert_eq!(parsed[1].target, "slides/a&b.xml");
    }

    #[test]
    fn test_template_errors_are_unreadable() {
        let err = DocumentModel::from_template_bytes(b"PK\x03\x04 broken").unwrap_err();
        assert!(matches!(err, Error::TemplateUnreadable { .. }));

        let missing = std::env::temp_dir().join("outline-pptx-no-such-template.potx");
        let err = DocumentModel::open_template(&missing).unwrap_err();
        match err {
            Error::TemplateUnreadable { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_package_without_layouts_is_rejected() {
        let mut package = blank_package();
        package.set_part(
            "ppt/slideMasters/slideMaster1.xml",
            r#"<p:sldMaster xmlns:p="p"><p:cSld><p:spTree/></p:cSld></p:sldMaster>"#,
        );
        package.set_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            r#"<Relationships xmlns="x"/>"#,
        );
        assert!(DocumentModel::from_package(package).is_err());
    }
}
