//! OPC package access: parts in a ZIP container, relationships, and
//! streaming XML rewrites.

use outline_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

/// Namespace bound to the `r:` prefix in PresentationML parts.
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Name of the content types part.
pub const CONTENT_TYPES: &str = "[Content_Types].xml";

/// An in-memory OPC package. Parts keep the order they were read or added
/// in, so writing the same package twice gives identical bytes.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file entry of a ZIP container.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::Zip(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;
            parts.push((name, data));
        }

        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// A part decoded as UTF-8 XML.
    pub fn xml(&self, name: &str) -> Result<&str> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::Xml(format!("Missing part '{}'", name)))?;
        std::str::from_utf8(data).map_err(|e| Error::Xml(format!("Part '{}' is not UTF-8: {}", name, e)))
    }

    /// Replace a part's content, or append it if it is new.
    pub fn set_part(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        let data = data.into();
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Serialize to a ZIP container with fixed timestamps.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Zip(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(data)
                .map_err(|e| Error::Zip(format!("Failed to write '{}': {}", name, e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Zip(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// One `Relationship` element of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Parse the relationships of a `.rels` part, in document order.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                    external: false,
                };

                for attr in e.attributes().flatten() {
                    let value = match attr.unescape_value() {
                        Ok(value) => value.to_string(),
                        Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
                    };
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value == "External",
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationships of `part`, or none if it has no `.rels` part.
pub fn relationships_of(package: &Package, part: &str) -> Result<Vec<Relationship>> {
    let rels_path = rels_path_for(part);
    if !package.has_part(&rels_path) {
        return Ok(Vec::new());
    }
    parse_relationships(package.xml(&rels_path)?)
}

/// Path of the `.rels` part that belongs to `part`.
///
/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Relative target from `source_part` to `target_part`, as written in the
/// source's `.rels` part.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Prefix of a qualified name, if it has one.
pub fn prefix_of(name: &[u8]) -> Option<String> {
    name.iter()
        .position(|&b| b == b':')
        .map(|pos| String::from_utf8_lossy(&name[..pos]).to_string())
}

/// Unescaped value of an attribute, looked up by its exact key.
pub fn attr_value(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.to_string(),
            Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
        })
}

/// Trailing number of a name like "rId12" or "slide3.xml".
pub fn part_number(name: &str) -> Option<u32> {
    let name = name.rsplit('/').next().unwrap_or(name);
    let stem = name.trim_end_matches(".rels").trim_end_matches(".xml");

    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    stem[stem.len() - digits..].parse().ok()
}

/// Stream `xml` through `on_event`, which writes whatever should replace
/// each event (usually the event itself). Events the callback does not
/// write are dropped.
pub fn rewrite_xml<F>(xml: &str, mut on_event: F) -> Result<String>
where
    F: FnMut(Event<'_>, &mut Writer<Vec<u8>>) -> quick_xml::Result<()>,
{
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => {
                on_event(event, &mut writer).map_err(|e| Error::Xml(e.to_string()))?;
            }
            Err(e) => {
                return Err(Error::Xml(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = parse_relationships(RELS).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].id, "rId2");
        assert_eq!(rels[0].rel_type, REL_SLIDE_LAYOUT);
        assert_eq!(rels[0].target, "../slideLayouts/slideLayout2.xml");
        assert!(!rels[0].external);
        assert!(rels[1].external);
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide3.xml"),
            "ppt/slides/slide3.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "/ppt/slides/slide3.xml"),
            "ppt/slides/slide3.xml"
        );
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("ppt/slides/slide1.xml", "ppt/slideLayouts/slideLayout2.xml"),
            "../slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            relative_target("ppt/presentation.xml", "ppt/slides/slide4.xml"),
            "slides/slide4.xml"
        );
    }

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("rId1"), Some(1));
        assert_eq!(part_number("rId12"), Some(12));
        assert_eq!(part_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(part_number("slide1.xml.rels"), Some(1));
        assert_eq!(part_number("nodigits"), None);
    }

    #[test]
    fn test_local_name_and_prefix() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"sp"), b"sp");
        assert_eq!(prefix_of(b"pml:sld").as_deref(), Some("pml"));
        assert_eq!(prefix_of(b"sld"), None);
    }

    #[test]
    fn test_package_roundtrip_keeps_order() {
        let mut package = Package::new();
        package.set_part(CONTENT_TYPES, "<Types/>");
        package.set_part("ppt/presentation.xml", "<p/>");
        package.set_part(CONTENT_TYPES, "<Types></Types>");

        let bytes = package.to_bytes().unwrap();
        let reread = Package::read(&bytes).unwrap();
        let names: Vec<_> = reread.part_names().collect();
        assert_eq!(names, vec![CONTENT_TYPES, "ppt/presentation.xml"]);
        assert_eq!(reread.xml(CONTENT_TYPES).unwrap(), "<Types></Types>");

        assert_eq!(bytes, package.to_bytes().unwrap());
    }

    #[test]
    fn test_read_rejects_non_zip() {
        assert!(matches!(Package::read(b"not a zip"), Err(Error::Zip(_))));
    }

    #[test]
    fn test_missing_part_is_xml_error() {
        assert!(matches!(Package::new().xml("a.xml"), Err(Error::Xml(_))));
    }

    #[test]
    fn test_rewrite_xml_passthrough_and_insert() {
        let xml = r#"<?xml version="1.0"?><root a="1&amp;2"><x>t &lt; u</x></root>"#;

        let same = rewrite_xml(xml, |event, w| w.write_event(event)).unwrap();
        assert_eq!(same, xml);

        let grown = rewrite_xml(xml, |event, w| {
            if let Event::End(ref e) = event {
                if e.name().as_ref() == b"root" {
                    w.write_event(Event::Empty(BytesStart::new("y")))?;
                }
            }
            w.write_event(event)
        })
        .unwrap();
        assert!(grown.ends_with("<y/></root>"));

        let dropped = rewrite_xml("<r><x/></r>", |event, w| match event {
            Event::Empty(ref e) if e.name().as_ref() == b"x" => Ok(()),
            other => w.write_event(other),
        })
        .unwrap();
        assert_eq!(dropped, "<r></r>");
    }
}
