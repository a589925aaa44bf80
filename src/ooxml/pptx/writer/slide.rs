/// Slide types and implementation for PPTX presentations.
use crate::ooxml::error::Result;
use bytes::Bytes;

// Import shared format types
use super::super::format::ImageFormat;
use super::relmap::RelationshipMapper;
use super::shape::{MutableShape, ShapeType};

/// A mutable slide in a presentation.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier, starts at 256)
    pub(crate) slide_id: u32,
    /// Shapes on the slide, in z-order
    pub(crate) shapes: Vec<MutableShape>,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            shapes: Vec::new(),
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    // IDs: 1=group, 2+=shapes
    fn next_shape_id(&self) -> u32 {
        (self.shapes.len() + 2) as u32
    }

    /// Add a text box with one paragraph per entry.
    ///
    /// Returns the new shape so its text formatting can be chained.
    pub fn add_text_box<S: Into<String>>(
        &mut self,
        paragraphs: impl IntoIterator<Item = S>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let paragraphs = paragraphs.into_iter().map(Into::into).collect();
        self.shapes.push(MutableShape::new_text_box(
            shape_id, paragraphs, x, y, width, height,
        ));
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    /// Add a picture from already-encoded image bytes.
    #[allow(clippy::too_many_arguments)]
    pub fn add_picture(
        &mut self,
        data: Bytes,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: &str,
    ) -> Result<()> {
        let shape_id = self.next_shape_id();
        let shape = MutableShape::new_picture(
            shape_id,
            data,
            format,
            x,
            y,
            width,
            height,
            description.to_string(),
        )?;
        self.shapes.push(shape);
        Ok(())
    }

    /// Get the number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shapes on the slide, in z-order.
    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    /// Collect image data from picture shapes, in z-order.
    pub(crate) fn collect_images(&self) -> Vec<(&Bytes, ImageFormat)> {
        self.shapes
            .iter()
            .filter_map(MutableShape::get_image_data)
            .collect()
    }

    /// Generate slide XML, resolving picture references through `rel_mapper`.
    pub(crate) fn to_xml_with_rels(
        &self,
        slide_index: usize,
        rel_mapper: &RelationshipMapper,
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);

        xml.push_str(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Write group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = match shape.shape_type {
                ShapeType::Picture { .. } => {
                    let rid = rel_mapper.get_image_id(slide_index, image_counter);
                    image_counter += 1;
                    rid
                },
                ShapeType::TextBox { .. } => None,
            };
            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");

        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_ids_start_after_group() {
        let mut slide = MutableSlide::new(256);
        slide.add_text_box(["Heading"], 0, 0, 100, 100).bold(true);
        slide
            .add_picture(
                Bytes::from_static(b"img"),
                ImageFormat::Png,
                0,
                0,
                50,
                50,
                "a.png",
            )
            .unwrap();

        assert_eq!(slide.shape_count(), 2);
        assert_eq!(slide.shapes()[0].shape_id, 2);
        assert_eq!(slide.shapes()[1].shape_id, 3);
        assert_eq!(slide.collect_images().len(), 1);
    }

    #[test]
    fn test_xml_resolves_image_rel_ids() {
        let mut slide = MutableSlide::new(256);
        slide
            .add_picture(
                Bytes::from_static(b"img"),
                ImageFormat::Jpeg,
                10,
                20,
                30,
                40,
                "photo.jpg",
            )
            .unwrap();

        let mut mapper = RelationshipMapper::new();
        mapper.add_image(0, 0, "rId2".to_string());

        let xml = slide.to_xml_with_rels(0, &mapper).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert!(xml.ends_with("</p:sld>"));

        // Unmapped picture is a hard error rather than a dangling reference
        assert!(slide.to_xml_with_rels(1, &mapper).is_err());
    }
}
