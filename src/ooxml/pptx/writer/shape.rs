/// Shape types and implementation for PPTX presentations.
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use bytes::Bytes;
use std::fmt::Write as FmtWrite;

// Import shared format types
pub use super::super::format::{Alignment, ImageFormat, TextFormat};

/// A shape on a slide (text box or picture).
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID
    pub(crate) shape_id: u32,
    /// Shape type
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    TextBox {
        paragraphs: Vec<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: TextFormat,
    },
    Picture {
        data: Bytes,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: String,
    },
}

impl MutableShape {
    /// Create a new text box shape with one paragraph per entry.
    pub(crate) fn new_text_box(
        shape_id: u32,
        paragraphs: Vec<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::TextBox {
                paragraphs,
                x,
                y,
                width,
                height,
                format: TextFormat::default(),
            },
        }
    }

    /// Create a new picture shape.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_picture(
        shape_id: u32,
        data: Bytes,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: String,
    ) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(OoxmlError::InvalidFormat(format!(
                "picture extent must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            shape_id,
            shape_type: ShapeType::Picture {
                data,
                format,
                x,
                y,
                width,
                height,
                description,
            },
        })
    }

    fn text_format_mut(&mut self) -> Option<&mut TextFormat> {
        match self.shape_type {
            ShapeType::TextBox { ref mut format, .. } => Some(format),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Set text formatting for this shape (only for text boxes).
    pub fn set_text_format(&mut self, format: TextFormat) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            *f = format;
        }
        self
    }

    /// Builder method: set font size.
    pub fn font_size(&mut self, size: f64) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.size = Some(size);
        }
        self
    }

    /// Builder method: set bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.bold = Some(bold);
        }
        self
    }

    /// Builder method: set italic.
    pub fn italic(&mut self, italic: bool) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.italic = Some(italic);
        }
        self
    }

    /// Builder method: set text color.
    pub fn color(&mut self, color: &str) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.color = Some(color.to_string());
        }
        self
    }

    /// Builder method: set paragraph alignment.
    pub fn align(&mut self, align: Alignment) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.align = Some(align);
        }
        self
    }

    /// Builder method: set spacing after each paragraph, in points.
    pub fn space_after(&mut self, points: f64) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.space_after = Some(points);
        }
        self
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn get_image_data(&self) -> Option<(&Bytes, ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data, *format)),
            ShapeType::TextBox { .. } => None,
        }
    }

    /// Paragraph texts if this shape is a text box.
    pub fn paragraphs(&self) -> Option<&[String]> {
        match &self.shape_type {
            ShapeType::TextBox { paragraphs, .. } => Some(paragraphs),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Position and extent in EMUs: `(x, y, width, height)`.
    pub fn bounds(&self) -> (i64, i64, i64, i64) {
        match self.shape_type {
            ShapeType::TextBox {
                x, y, width, height, ..
            }
            | ShapeType::Picture {
                x, y, width, height, ..
            } => (x, y, width, height),
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need the relationship ID of their image part.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::TextBox {
                paragraphs,
                x,
                y,
                width,
                height,
                format,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Text Box {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                write_sp_pr(xml, *x, *y, *width, *height)?;

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0">"#);
                xml.push_str(r#"<a:spAutoFit/>"#);
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                for paragraph in paragraphs {
                    write_paragraph(xml, paragraph, format)?;
                }
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                x,
                y,
                width,
                height,
                description,
                ..
            } => {
                let rid = rel_id.ok_or_else(|| {
                    OoxmlError::Xml(format!(
                        "no image relationship for picture shape {}",
                        self.shape_id
                    ))
                })?;

                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                write_sp_pr(xml, *x, *y, *width, *height)?;
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_sp_pr(xml: &mut String, x: i64, y: i64, width: i64, height: i64) -> Result<()> {
    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    Ok(())
}

fn write_paragraph(xml: &mut String, text: &str, format: &TextFormat) -> Result<()> {
    xml.push_str("<a:p>");

    if format.align.is_some() || format.space_after.is_some() {
        xml.push_str("<a:pPr");
        if let Some(align) = format.align {
            write!(xml, r#" algn="{}""#, align.as_attr())?;
        }
        xml.push('>');
        if let Some(points) = format.space_after {
            write!(
                xml,
                r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
                pt_to_centipoints(points)
            )?;
        }
        xml.push_str("</a:pPr>");
    }

    xml.push_str("<a:r>");
    xml.push_str("<a:rPr lang=\"en-US\" dirty=\"0\"");

    if let Some(size) = format.size {
        write!(xml, " sz=\"{}\"", pt_to_centipoints(size))?;
    }

    if let Some(true) = format.bold {
        xml.push_str(" b=\"1\"");
    }

    if let Some(true) = format.italic {
        xml.push_str(" i=\"1\"");
    }

    xml.push('>');

    // Fill must precede the font elements in CT_TextCharacterProperties
    if let Some(ref color) = format.color {
        write!(
            xml,
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            escape_xml(color)
        )?;
    }

    if let Some(ref font) = format.font {
        write!(xml, "<a:latin typeface=\"{}\"/>", escape_xml(font))?;
    }

    xml.push_str("</a:rPr>");

    write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
    xml.push_str("</a:r>");
    xml.push_str("</a:p>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_box_xml() {
        let mut shape = MutableShape::new_text_box(
            3,
            vec!["First & best".to_string(), "Second".to_string()],
            100,
            200,
            300,
            400,
        );
        shape
            .font_size(16.0)
            .bold(true)
            .color("808080")
            .align(Alignment::Center)
            .space_after(6.0);

        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();

        assert!(xml.contains(r#"<p:cNvPr id="3" name="Text Box 3"/>"#));
        assert!(xml.contains(r#"<a:off x="100" y="200"/>"#));
        assert!(xml.contains(r#"<a:pPr algn="ctr"><a:spcAft><a:spcPts val="600"/></a:spcAft></a:pPr>"#));
        assert!(xml.contains(r#"sz="1600" b="1""#));
        assert!(xml.contains("<a:t>First &amp; best</a:t>"));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }

    #[test]
    fn test_picture_requires_rel_id() {
        let shape = MutableShape::new_picture(
            2,
            Bytes::from_static(b"png"),
            ImageFormat::Png,
            0,
            0,
            10,
            10,
            "a.png".to_string(),
        )
        .unwrap();

        let mut xml = String::new();
        assert!(shape.to_xml(&mut xml, None).is_err());

        let mut xml = String::new();
        shape.to_xml(&mut xml, Some("rId2")).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"descr="a.png""#));
    }

    #[test]
    fn test_picture_rejects_empty_extent() {
        let result = MutableShape::new_picture(
            2,
            Bytes::new(),
            ImageFormat::Png,
            0,
            0,
            0,
            10,
            String::new(),
        );
        assert!(result.is_err());
    }
}
