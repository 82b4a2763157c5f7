//! PDF conversions: document merging and PNG-to-PDF page building.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConvertError;

/// Concatenate the given PDF documents, in input order, into one document.
pub fn merge_pdfs(paths: &[PathBuf]) -> Result<Vec<u8>, ConvertError> {
    let mut max_id = 1;
    // Pages kept as a Vec so output page order follows input order
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in paths {
        let mut doc = Document::load(path)?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        for (_page_number, object_id) in doc.get_pages() {
            let page = doc.get_object(object_id)?.to_owned();
            pages.push((object_id, page));
        }
        objects.extend(std::mem::take(&mut doc.objects));
    }

    let mut document = Document::with_version("1.5");
    let mut catalog_object: Option<(ObjectId, Object)> = None;
    let mut pages_object: Option<(ObjectId, Object)> = None;

    for (object_id, object) in objects.iter() {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" => {
                // First catalog wins; it gets rewired to the merged page tree below
                catalog_object.get_or_insert((*object_id, object.clone()));
            }
            b"Pages" => {
                // Fold every source page tree root into a single one
                if let Ok(dict) = object.as_dict() {
                    let mut dict = dict.clone();
                    if let Some((_, ref existing)) = pages_object {
                        if let Ok(existing) = existing.as_dict() {
                            dict.extend(existing);
                        }
                    }
                    let id = pages_object.map(|(id, _)| id).unwrap_or(*object_id);
                    pages_object = Some((id, Object::Dictionary(dict)));
                }
            }
            // Pages are re-inserted below with the merged parent;
            // outlines are dropped rather than stitched together
            b"Page" | b"Outlines" | b"Outline" => {}
            _ => {
                document.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (pages_id, pages_dict) = pages_object.ok_or(ConvertError::MalformedPdf("no pages found"))?;
    let (catalog_id, catalog_dict) =
        catalog_object.ok_or(ConvertError::MalformedPdf("no catalog found"))?;

    for (object_id, object) in &pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            document.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    if let Ok(dict) = pages_dict.as_dict() {
        let mut dict = dict.clone();
        dict.set("Count", pages.len() as i64);
        dict.set(
            "Kids",
            pages.iter().map(|(id, _)| Object::Reference(*id)).collect::<Vec<_>>(),
        );
        document.objects.insert(pages_id, Object::Dictionary(dict));
    }

    if let Ok(dict) = catalog_dict.as_dict() {
        let mut dict = dict.clone();
        dict.set("Pages", pages_id);
        dict.remove(b"Outlines");
        document.objects.insert(catalog_id, Object::Dictionary(dict));
    }

    document.trailer.set("Root", catalog_id);
    document.max_id = document.objects.len() as u32;
    document.renumber_objects();
    document.compress();
    save_to_vec(document)
}

/// Build a PDF with one page per PNG image, in input order.
///
/// Images are decoded and flattened to RGB (alpha dropped) and embedded as
/// DeviceRGB XObjects. Page size equals the pixel dimensions in points,
/// matching a 72 dpi rendition.
pub fn images_to_pdf(paths: &[PathBuf]) -> Result<Vec<u8>, ConvertError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let (width, height) = (width as i64, height as i64);

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        ));

        let name = format!("Im{}", index);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                // Scale the unit image square up to the full page
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { name.as_str() => image_id },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    save_to_vec(doc)
}

fn save_to_vec(mut doc: Document) -> Result<Vec<u8>, ConvertError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Minimal single-page PDF whose page width identifies it.
    fn one_page_pdf(dir: &TempDir, name: &str, width: i64) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(200),
            ],
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.path().join(name);
        doc.save(&path).unwrap();
        path
    }

    fn page_width(doc: &Document, page_number: u32) -> i64 {
        let pages = doc.get_pages();
        let dict = doc.get_object(pages[&page_number]).unwrap().as_dict().unwrap();
        let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
        media_box[2].as_i64().unwrap()
    }

    #[test]
    fn merge_preserves_page_count_and_order() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            one_page_pdf(&dir, "a.pdf", 100),
            one_page_pdf(&dir, "b.pdf", 200),
            one_page_pdf(&dir, "c.pdf", 300),
        ];

        let bytes = merge_pdfs(&paths).unwrap();
        let merged = Document::load_mem(&bytes).unwrap();
        assert_eq!(merged.get_pages().len(), 3);
        assert_eq!(page_width(&merged, 1), 100);
        assert_eq!(page_width(&merged, 2), 200);
        assert_eq!(page_width(&merged, 3), 300);
    }

    #[test]
    fn merge_of_a_single_pdf_round_trips() {
        let dir = TempDir::new().unwrap();
        let paths = vec![one_page_pdf(&dir, "only.pdf", 150)];

        let bytes = merge_pdfs(&paths).unwrap();
        let merged = Document::load_mem(&bytes).unwrap();
        assert_eq!(merged.get_pages().len(), 1);
        assert_eq!(page_width(&merged, 1), 150);
    }

    #[test]
    fn merge_rejects_non_pdf_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(merge_pdfs(&[path]).is_err());
    }

    fn png_fixture(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn single_png_becomes_one_page() {
        let dir = TempDir::new().unwrap();
        let path = png_fixture(&dir, "img.png", 64, 48);

        let bytes = images_to_pdf(&[path]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(page_width(&doc, 1), 64);
    }

    #[test]
    fn multiple_pngs_become_pages_in_input_order() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            png_fixture(&dir, "a.png", 10, 10),
            png_fixture(&dir, "b.png", 20, 10),
            png_fixture(&dir, "c.png", 30, 10),
        ];

        let bytes = images_to_pdf(&paths).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert_eq!(page_width(&doc, 1), 10);
        assert_eq!(page_width(&doc, 2), 20);
        assert_eq!(page_width(&doc, 3), 30);
    }

    #[test]
    fn alpha_channel_is_flattened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rgba.png");
        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 255, 128]));
        img.save(&path).unwrap();

        let bytes = images_to_pdf(&[path]).unwrap();
        assert!(Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn images_to_pdf_rejects_non_png_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(images_to_pdf(&[path]).is_err());
    }
}
