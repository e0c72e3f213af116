//! The built-in widescreen presentation used when no template is given.
//!
//! One slide master with title and body placeholders, a "Title Slide"
//! layout (`type="title"`) and a "Title and Content" layout (`type="obj"`).
//! The package carries no slides and no timestamps.

use crate::package::{Package, CONTENT_TYPES};

/// Slide width: 13.333 in.
pub const SLIDE_WIDTH_EMU: i64 = 12_191_695;

/// Slide height: 7.5 in.
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

pub(crate) const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_PRESENTATION: &str =
    "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";

/// Build the blank package.
pub fn blank_package() -> Package {
    let mut package = Package::new();
    package.set_part(CONTENT_TYPES, content_types());
    package.set_part("_rels/.rels", root_rels());
    package.set_part("docProps/app.xml", APP_XML);
    package.set_part("docProps/core.xml", CORE_XML);
    package.set_part("ppt/presentation.xml", presentation_xml());
    package.set_part("ppt/_rels/presentation.xml.rels", presentation_rels());
    package.set_part("ppt/presProps.xml", pml_part("p:presentationPr", ""));
    package.set_part("ppt/viewProps.xml", pml_part("p:viewPr", VIEW_PROPS_BODY));
    package.set_part(
        "ppt/tableStyles.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
            NS_DRAWING
        ),
    );
    package.set_part("ppt/theme/theme1.xml", theme_xml());
    package.set_part("ppt/slideMasters/slideMaster1.xml", master_xml());
    package.set_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "slideLayout", "../slideLayouts/slideLayout2.xml"),
            ("rId3", "theme", "../theme/theme1.xml"),
        ]),
    );
    package.set_part("ppt/slideLayouts/slideLayout1.xml", title_layout_xml());
    package.set_part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
    );
    package.set_part("ppt/slideLayouts/slideLayout2.xml", content_layout_xml());
    package.set_part(
        "ppt/slideLayouts/_rels/slideLayout2.xml.rels",
        rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
    );
    package
}

fn content_types() -> String {
    let overrides = [
        ("/ppt/presentation.xml", crate::model::CT_PRESENTATION_MAIN.to_string()),
        ("/ppt/presProps.xml", pml_type("presProps")),
        ("/ppt/viewProps.xml", pml_type("viewProps")),
        ("/ppt/tableStyles.xml", pml_type("tableStyles")),
        (
            "/ppt/theme/theme1.xml",
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
        ("/ppt/slideMasters/slideMaster1.xml", pml_type("slideMaster")),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT.to_string()),
        ("/ppt/slideLayouts/slideLayout2.xml", CT_SLIDE_LAYOUT.to_string()),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
"#,
    );
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
            part, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn pml_type(kind: &str) -> String {
    format!(
        "application/vnd.openxmlformats-officedocument.presentationml.{}+xml",
        kind
    )
}

fn root_rels() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#,
        NS_PACKAGE_RELS
    )
}

/// A `.rels` part of officeDocument relationships: (id, type suffix, target).
fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"{}\">\n",
        NS_PACKAGE_RELS
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            "  <Relationship Id=\"{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}\" Target=\"{}\"/>\n",
            id, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn presentation_rels() -> String {
    rels(&[
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "presProps", "presProps.xml"),
        ("rId3", "viewProps", "viewProps.xml"),
        ("rId4", "theme", "theme/theme1.xml"),
        ("rId5", "tableStyles", "tableStyles.xml"),
    ])
}

/// A PresentationML part with the usual namespace declarations.
fn pml_part(root: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<{root} xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">{body}</{root}>"#,
        root = root,
        a = NS_DRAWING,
        r = crate::package::NS_RELATIONSHIPS,
        p = NS_PRESENTATION,
        body = body
    )
}

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>outline2pptx</Application>
  <PresentationFormat>Widescreen</PresentationFormat>
</Properties>"#;

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>Presentation</dc:title>
  <dc:creator>outline2pptx</dc:creator>
</cp:coreProperties>"#;

fn presentation_xml() -> String {
    pml_part(
        "p:presentation",
        &format!(
            r#"
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
  <p:sldSz cx="{w}" cy="{h}"/>
  <p:notesSz cx="{h}" cy="9144000"/>
"#,
            w = SLIDE_WIDTH_EMU,
            h = SLIDE_HEIGHT_EMU
        ),
    )
}

const VIEW_PROPS_BODY: &str = r#"
  <p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>
  <p:slideViewPr><p:cSldViewPr><p:cViewPr><p:scale><a:sx n="100" d="100"/><a:sy n="100" d="100"/></p:scale><p:origin x="0" y="0"/></p:cViewPr></p:cSldViewPr></p:slideViewPr>
"#;

fn theme_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{}" name="Office Theme">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Office">
      <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
        NS_DRAWING
    )
}

/// A placeholder shape for a master or layout: (id, name, ph attributes, x, y, cx, cy).
fn placeholder_sp(id: u32, name: &str, ph: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        r#"
      <p:sp>
        <p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvSpPr>
        <p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>
        <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="zh-CN"/></a:p></p:txBody>
      </p:sp>"#,
    )
}

const GROUP_PROPS: &str = r#"
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr/>"#;

/// Body text levels: left margin steps of 0.5 in, no bullet glyphs.
fn body_levels() -> String {
    (1..=5)
        .map(|lvl| {
            format!(
                r#"<a:lvl{lvl}pPr marL="{mar}" indent="0"><a:buNone/><a:defRPr sz="{sz}"/></a:lvl{lvl}pPr>"#,
                lvl = lvl,
                mar = (lvl - 1) * 457_200,
                sz = if lvl == 1 { 2400 } else { 2000 }
            )
        })
        .collect()
}

fn master_xml() -> String {
    pml_part(
        "p:sldMaster",
        &format!(
            r#"
  <p:cSld>
    <p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>
    <p:spTree>{group}{title}{body}
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="rId1"/>
    <p:sldLayoutId id="2147483650" r:id="rId2"/>
  </p:sldLayoutIdLst>
  <p:txStyles>
    <p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4400"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>
    <p:bodyStyle>{levels}</p:bodyStyle>
    <p:otherStyle><a:lvl1pPr><a:defRPr/></a:lvl1pPr></p:otherStyle>
  </p:txStyles>
"#,
            group = GROUP_PROPS,
            title = placeholder_sp(2, "Title Placeholder 1", r#"type="title""#, 838_200, 365_125, 10_515_600, 1_325_563),
            body = placeholder_sp(3, "Text Placeholder 2", r#"type="body" idx="1""#, 838_200, 1_825_625, 10_515_600, 4_351_338),
            levels = body_levels()
        ),
    )
}

fn layout_xml(kind: &str, name: &str, shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="{kind}" preserve="1">
  <p:cSld name="{name}">
    <p:spTree>{group}{shapes}
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
        a = NS_DRAWING,
        r = crate::package::NS_RELATIONSHIPS,
        p = NS_PRESENTATION,
        kind = kind,
        name = name,
        group = GROUP_PROPS,
        shapes = shapes
    )
}

fn title_layout_xml() -> String {
    let shapes = [
        placeholder_sp(2, "Title 1", r#"type="ctrTitle""#, 1_524_000, 1_122_363, 9_144_000, 2_387_600),
        placeholder_sp(3, "Subtitle 2", r#"type="subTitle" idx="1""#, 1_524_000, 3_602_038, 9_144_000, 1_655_762),
    ]
    .concat();
    layout_xml("title", "Title Slide", &shapes)
}

fn content_layout_xml() -> String {
    let shapes = [
        placeholder_sp(2, "Title 1", r#"type="title""#, 838_200, 365_125, 10_515_600, 1_325_563),
        placeholder_sp(3, "Content Placeholder 2", r#"idx="1""#, 838_200, 1_825_625, 10_515_600, 4_351_338),
    ]
    .concat();
    layout_xml("obj", "Title and Content", &shapes)
}
