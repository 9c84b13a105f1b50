//! Single page PDF export of a rendered canvas.
//!
//! The canvas is embedded as a JPEG image XObject that covers the whole page.
//! One pixel maps to one point, so the page size follows the template.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::GeneratorError;

pub const JPEG_QUALITY: u8 = 90;
const IMAGE_NAME: &str = "Im0";

fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, GeneratorError> {
    let (width, height) = image.dimensions();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(GeneratorError::Jpeg)?;
    Ok(jpeg)
}

pub fn encode_pdf(image: &RgbImage) -> Result<Vec<u8>, GeneratorError> {
    let (width, height) = image.dimensions();
    let jpeg = encode_jpeg(image)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| GeneratorError::Pdf(format!("failed to encode content stream: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width as i64),
            Object::Integer(height as i64),
        ],
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

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| GeneratorError::Pdf(format!("failed to serialize document: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn media_box(doc: &Document) -> Vec<i64> {
        let pages = doc.get_pages();
        let page_id = *pages.values().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        page.get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_pdf_has_single_page_sized_like_the_image() {
        let image = RgbImage::from_pixel(240, 320, Rgb([255, 255, 255]));
        let bytes = encode_pdf(&image).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(media_box(&doc), vec![0, 0, 240, 320]);
    }

    #[test]
    fn test_page_image_is_jpeg() {
        let image = RgbImage::from_pixel(16, 16, Rgb([10, 20, 30]));
        let bytes = encode_pdf(&image).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let jpeg_stream = doc
            .objects
            .values()
            .filter_map(|object| object.as_stream().ok())
            .find(|stream| {
                stream
                    .dict
                    .get(b"Filter")
                    .and_then(|f| f.as_name())
                    .map(|name| name == b"DCTDecode")
                    .unwrap_or(false)
            })
            .expect("image stream");
        assert!(jpeg_stream.content.starts_with(&[0xFF, 0xD8, 0xFF]));
        assert_eq!(jpeg_stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 16);
    }
}
