//! Serialization of a [`MutablePresentation`] into a `.pptx` package.
//!
//! Part layout:
//!
//! ```text
//! /docProps/core.xml, /docProps/app.xml
//! /ppt/presentation.xml
//! /ppt/slideMasters/slideMaster1.xml -> slideLayouts/slideLayout1.xml, theme/theme1.xml
//! /ppt/slides/slideN.xml             -> slideLayout1.xml, media/imageM.ext
//! /ppt/presProps.xml, viewProps.xml, tableStyles.xml
//! ```
use super::pres::MutablePresentation;
use super::relmap::RelationshipMapper;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackageWriter, Relationships};
use crate::ooxml::pptx::template;

impl MutablePresentation {
    /// Serialize the presentation to `.pptx` bytes.
    ///
    /// Output depends only on the slides and properties, so equal inputs
    /// produce identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let package = self.to_package()?;
        PackageWriter::to_bytes(&package)
    }

    fn to_package(&self) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();

        package
            .rels_mut()
            .add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
        package
            .rels_mut()
            .add(rt::CORE_PROPERTIES, "docProps/core.xml");
        package
            .rels_mut()
            .add(rt::EXTENDED_PROPERTIES, "docProps/app.xml");

        // Presentation relationships: master first, then slides, then the
        // presentation-level property parts.
        let mut pres_rels = Relationships::new();
        let master_rel_id = pres_rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        let slide_rel_ids: Vec<String> = (1..=self.slides.len())
            .map(|n| pres_rels.add(rt::SLIDE, format!("slides/slide{}.xml", n)))
            .collect();
        pres_rels.add(rt::PRES_PROPS, "presProps.xml");
        pres_rels.add(rt::VIEW_PROPS, "viewProps.xml");
        pres_rels.add(rt::THEME, "theme/theme1.xml");
        pres_rels.add(rt::TABLE_STYLES, "tableStyles.xml");

        let pres_xml = self.generate_presentation_xml_with_rels(&master_rel_id, &slide_rel_ids)?;
        package.add_part(
            "/ppt/presentation.xml",
            ct::PML_PRESENTATION_MAIN,
            pres_xml,
            pres_rels,
        )?;

        // Media, one part per picture, numbered across the whole deck
        let mut rel_mapper = RelationshipMapper::new();
        let mut slide_rels: Vec<Relationships> = self
            .slides
            .iter()
            .map(|_| {
                let mut rels = Relationships::new();
                rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
                rels
            })
            .collect();

        let mut image_in_slide = vec![0usize; self.slides.len()];
        for (media_index, (slide_index, data, format)) in
            self.collect_all_images().into_iter().enumerate()
        {
            let filename = format!("image{}.{}", media_index + 1, format.extension());
            package.add_media(
                &format!("/ppt/media/{}", filename),
                format.mime_type(),
                data.to_vec(),
            )?;

            let rid = slide_rels[slide_index].add(rt::IMAGE, format!("../media/{}", filename));
            rel_mapper.add_image(slide_index, image_in_slide[slide_index], rid);
            image_in_slide[slide_index] += 1;
        }

        for (slide_index, (slide, rels)) in self.slides.iter().zip(slide_rels).enumerate() {
            let xml = slide.to_xml_with_rels(slide_index, &rel_mapper)?;
            package.add_part(
                &format!("/ppt/slides/slide{}.xml", slide_index + 1),
                ct::PML_SLIDE,
                xml,
                rels,
            )?;
        }

        let mut master_rels = Relationships::new();
        master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(rt::THEME, "../theme/theme1.xml");
        package.add_part(
            "/ppt/slideMasters/slideMaster1.xml",
            ct::PML_SLIDE_MASTER,
            template::slide_master_xml(),
            master_rels,
        )?;

        let mut layout_rels = Relationships::new();
        layout_rels.add(rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.add_part(
            "/ppt/slideLayouts/slideLayout1.xml",
            ct::PML_SLIDE_LAYOUT,
            template::blank_layout_xml(),
            layout_rels,
        )?;

        package.add_part(
            "/ppt/theme/theme1.xml",
            ct::OFC_THEME,
            template::theme_xml(),
            Relationships::new(),
        )?;
        package.add_part(
            "/ppt/presProps.xml",
            ct::PML_PRES_PROPS,
            template::pres_props_xml(),
            Relationships::new(),
        )?;
        package.add_part(
            "/ppt/viewProps.xml",
            ct::PML_VIEW_PROPS,
            template::view_props_xml(),
            Relationships::new(),
        )?;
        package.add_part(
            "/ppt/tableStyles.xml",
            ct::PML_TABLE_STYLES,
            template::table_styles_xml(),
            Relationships::new(),
        )?;

        package.add_part(
            "/docProps/core.xml",
            ct::OPC_CORE_PROPERTIES,
            template::core_props_xml(&self.properties)?,
            Relationships::new(),
        )?;
        package.add_part(
            "/docProps/app.xml",
            ct::OFC_EXTENDED_PROPERTIES,
            template::app_props_xml(self.slides.len())?,
            Relationships::new(),
        )?;

        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::format::ImageFormat;
    use bytes::Bytes;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_package_parts() {
        let mut pres = MutablePresentation::new();
        pres.add_slide()
            .add_picture(
                Bytes::from_static(b"fake-png"),
                ImageFormat::Png,
                0,
                0,
                100,
                100,
                "a.png",
            )
            .unwrap();
        pres.add_slide().add_text_box(["Attached Files"], 0, 0, 100, 100);

        let bytes = pres.to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide1.xml.rels",
            "ppt/media/image1.png",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }

        let slide_rels = read_entry(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide_rels.contains(r#"Id="rId2""#));
        assert!(slide_rels.contains("../media/image1.png"));

        let slide = read_entry(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"r:embed="rId2""#));

        let content_types = read_entry(&mut archive, "[Content_Types].xml");
        assert!(content_types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(content_types.contains("/ppt/slides/slide2.xml"));

        let app = read_entry(&mut archive, "docProps/app.xml");
        assert!(app.contains("<Slides>2</Slides>"));
    }

    #[test]
    fn test_package_is_reproducible() {
        let build = || {
            let mut pres = MutablePresentation::new();
            pres.add_slide().add_text_box(["No files"], 0, 0, 100, 100);
            pres.to_bytes().unwrap()
        };
        assert_eq!(build(), build());
    }
}
