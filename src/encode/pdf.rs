use std::io::Write as _;

use lopdf::{
    Dictionary, Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::foundation::error::{ShotError, ShotResult};

/// Pixel density assumed when sizing the page: PNGs carry no DPI here.
pub const PAGE_DPI: f32 = 96.0;

/// Wrap a PNG buffer as a one-page PDF whose page is exactly the image.
///
/// The PNG is decoded and its RGB samples are stored as a Flate-compressed
/// DeviceRGB image XObject; alpha is dropped.
pub fn wrap_png(png: &[u8]) -> ShotResult<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| ShotError::encoding("pdf", format!("intermediate png unreadable: {e}")))?;
    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ShotError::encoding("pdf", "image has zero width or height"));
    }

    let mut zlib = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    zlib.write_all(rgb.as_raw())
        .map_err(|e| ShotError::encoding("pdf", e))?;
    let samples = zlib.finish().map_err(|e| ShotError::encoding("pdf", e))?;

    let page_w = width as f32 * 72.0 / PAGE_DPI;
    let page_h = height as f32 * 72.0 / PAGE_DPI;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "FlateDecode",
        },
        samples,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(page_w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page_h),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| ShotError::encoding("pdf", e))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_w),
            Object::Real(page_h),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ShotError::encoding("pdf", e))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn output_starts_with_pdf_magic() {
        let pdf = wrap_png(&png(40, 30)).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn single_page_sized_to_image_at_96_dpi() {
        let pdf = wrap_png(&png(96, 192)).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let dims: Vec<f32> = media_box
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(dims, vec![0.0, 0.0, 72.0, 144.0]);
    }

    #[test]
    fn non_png_input_is_an_encoding_error() {
        assert!(matches!(
            wrap_png(b"GIF89a"),
            Err(ShotError::Encoding { format: "pdf", .. })
        ));
    }
}
