//! Presentation template module.
//!
//! Provides the fixed parts every generated presentation carries: one slide
//! master, one blank layout, one theme and the presentation-level property
//! parts. Document properties are rendered from values.

use super::writer::pres::CoreProperties;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

const NS_DECLS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

const EMPTY_SP_TREE: &str = concat!(
    "<p:spTree>",
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    "<p:grpSpPr><a:xfrm>",
    r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
    "</a:xfrm></p:grpSpPr>",
    "</p:spTree>"
);

/// Slide master with a white background, standard color map and a single
/// layout (`rId1`).
pub fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str("<p:sldMaster ");
    xml.push_str(NS_DECLS);
    xml.push('>');
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(EMPTY_SP_TREE);
    xml.push_str("</p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" "#,
        r#"accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" "#,
        r#"accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("<p:txStyles>");
    xml.push_str(concat!(
        "<p:titleStyle>",
        r#"<a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
        r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/>"#,
        r#"<a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr>"#,
        "</a:lvl1pPr>",
        "</p:titleStyle>"
    ));
    xml.push_str(concat!(
        "<p:bodyStyle>",
        r#"<a:lvl1pPr marL="0" indent="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
        r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef><a:buNone/>"#,
        r#"<a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr>"#,
        "</a:lvl1pPr>",
        "</p:bodyStyle>"
    ));
    xml.push_str(concat!(
        "<p:otherStyle>",
        r#"<a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#,
        r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
        r#"<a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr>"#,
        "</a:lvl1pPr>",
        "</p:otherStyle>"
    ));
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    xml
}

/// Blank slide layout.
pub fn blank_layout_xml() -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str("<p:sldLayout ");
    xml.push_str(NS_DECLS);
    xml.push_str(r#" type="blank" preserve="1">"#);
    xml.push_str(r#"<p:cSld name="Blank">"#);
    xml.push_str(EMPTY_SP_TREE);
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

/// Office-style theme with the standard color, font and format schemes.
pub fn theme_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#);
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ] {
        let _ = write!(xml, r#"<a:{name}><a:srgbClr val="{rgb}"/></a:{name}>"#);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    xml.push_str(r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#);
    xml.push_str(r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#);
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        let _ = write!(
            xml,
            r#"<a:ln w="{width}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#
        );
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/>");
    xml.push_str("<a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    xml
}

/// Generate a minimal valid presProps.xml content.
pub fn pres_props_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentationPr {}/>"#,
        NS_DECLS
    )
}

/// Generate a minimal valid viewProps.xml content.
pub fn view_props_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str("<p:viewPr ");
    xml.push_str(NS_DECLS);
    xml.push('>');
    xml.push_str("<p:normalViewPr/>");
    xml.push_str(concat!(
        "<p:slideViewPr><p:cSldViewPr><p:cViewPr varScale=\"1\">",
        r#"<p:scale><a:sx n="100" d="100"/><a:sy n="100" d="100"/></p:scale>"#,
        r#"<p:origin x="0" y="0"/>"#,
        "</p:cViewPr><p:guideLst/></p:cSldViewPr></p:slideViewPr>"
    ));
    xml.push_str(r#"<p:gridSpacing cx="76200" cy="76200"/>"#);
    xml.push_str("</p:viewPr>");
    xml
}

/// Generate a minimal valid tableStyles.xml content.
pub fn table_styles_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#
    )
    .to_string()
}

/// Render docProps/core.xml.
///
/// This is the only part of the package that carries a timestamp.
pub fn core_props_xml(props: &CoreProperties) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(concat!(
        r#"<cp:coreProperties "#,
        r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
        r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));

    write_opt(&mut xml, "dc:title", props.title.as_deref())?;
    write_opt(&mut xml, "dc:subject", props.subject.as_deref())?;
    write_opt(&mut xml, "dc:creator", props.creator.as_deref())?;
    write_opt(&mut xml, "cp:keywords", props.keywords.as_deref())?;
    write_opt(&mut xml, "dc:description", props.description.as_deref())?;
    write_opt(&mut xml, "cp:category", props.category.as_deref())?;
    write_opt(&mut xml, "cp:lastModifiedBy", props.creator.as_deref())?;
    xml.push_str("<cp:revision>1</cp:revision>");

    let stamp = props.created.format("%Y-%m-%dT%H:%M:%SZ");
    write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#
    )?;
    write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#
    )?;

    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

fn write_opt(xml: &mut String, tag: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        write!(xml, "<{tag}>{}</{tag}>", escape_xml(value))?;
    }
    Ok(())
}

/// Render docProps/app.xml for a presentation with `slide_count` slides.
pub fn app_props_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(768);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    xml.push_str("<TotalTime>0</TotalTime>");
    xml.push_str("<Application>U2P</Application>");
    xml.push_str("<PresentationFormat>Custom</PresentationFormat>");
    write!(xml, "<Slides>{}</Slides>", slide_count)?;
    xml.push_str("<Notes>0</Notes>");
    xml.push_str("<HiddenSlides>0</HiddenSlides>");
    xml.push_str("<MMClips>0</MMClips>");
    xml.push_str("<ScaleCrop>false</ScaleCrop>");
    xml.push_str("<LinksUpToDate>false</LinksUpToDate>");
    xml.push_str("<SharedDoc>false</SharedDoc>");
    xml.push_str("<HyperlinksChanged>false</HyperlinksChanged>");
    xml.push_str("<AppVersion>16.0000</AppVersion>");
    xml.push_str("</Properties>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_master_references_single_layout() {
        let xml = slide_master_xml();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(xml.ends_with("</p:sldMaster>"));
    }

    #[test]
    fn test_theme_has_twelve_colors() {
        let xml = theme_xml();
        assert_eq!(xml.matches("srgbClr").count() + xml.matches("sysClr").count(), 12);
    }

    #[test]
    fn test_core_props_escape_and_timestamp() {
        let props = CoreProperties {
            title: Some("Q1 <draft>".to_string()),
            creator: Some("U2P".to_string()),
            created: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            ..CoreProperties::default()
        };
        let xml = core_props_xml(&props).unwrap();
        assert!(xml.contains("<dc:title>Q1 &lt;draft&gt;</dc:title>"));
        assert!(xml.contains(">2025-03-01T12:00:00Z</dcterms:created>"));
        assert!(!xml.contains("dc:subject"));
    }

    #[test]
    fn test_app_props_slide_count() {
        let xml = app_props_xml(7).unwrap();
        assert!(xml.contains("<Slides>7</Slides>"));
    }
}
