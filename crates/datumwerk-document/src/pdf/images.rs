// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedded page image harvest — pulls the image XObjects out of each PDF
// page so the OCR fallback can run on scanned documents.
//
// Coverage: DCTDecode streams decode as JPEG; plain FlateDecode (or
// unfiltered) streams are rebuilt from their pixel geometry for 8-bit
// DeviceRGB / DeviceGray. Anything else — CCITT, JBIG2, JPX, predictor
// parameters, exotic colour spaces — is skipped with a warning rather than
// failing the document.

use datumwerk_core::error::DatumwerkError;
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};
use tracing::{debug, instrument, warn};

use super::reader::PdfReader;

/// Collect the embedded images of every page, in page order.
///
/// Returns an empty vector when the document embeds no decodable images —
/// the caller treats that as "nothing to OCR", not as a failure.
#[instrument(skip(reader))]
pub fn extract_page_images(reader: &PdfReader) -> Vec<DynamicImage> {
    let document = reader.document();
    let pages = document.get_pages();
    let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
    page_numbers.sort_unstable();

    let mut images = Vec::new();

    for page_number in page_numbers {
        let Some(&page_id) = pages.get(&page_number) else {
            continue;
        };
        let Some(page_dict) = document.get_object(page_id).ok().and_then(object_dict) else {
            continue;
        };
        let Some(resources) = page_resources(document, page_dict) else {
            continue;
        };
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .map(|entry| resolve(document, entry))
            .and_then(object_dict)
        else {
            continue;
        };

        for (name, entry) in xobjects.iter() {
            match decode_image_xobject(document, entry) {
                Ok(Some(img)) => {
                    debug!(
                        page_number,
                        name = %String::from_utf8_lossy(name),
                        width = img.width(),
                        height = img.height(),
                        "Embedded image decoded"
                    );
                    images.push(img);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(page_number, %err, "Skipping undecodable embedded image");
                }
            }
        }
    }

    debug!(image_count = images.len(), "Embedded image harvest complete");
    images
}

// -- Object graph helpers -----------------------------------------------------

/// Follow a reference to its target object; non-references pass through.
fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

fn object_dict(object: &Object) -> Option<&Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn object_name(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

fn object_int(object: &Object) -> Option<i64> {
    match object {
        Object::Integer(value) => Some(*value),
        _ => None,
    }
}

/// Find the `/Resources` dictionary for a page, walking up the `/Parent`
/// chain if the page inherits it from an ancestor `/Pages` node.
fn page_resources<'a>(
    document: &'a Document,
    page_dict: &'a Dictionary,
) -> Option<&'a Dictionary> {
    let mut current = page_dict;
    // Bounded walk: malformed documents can have parent cycles.
    for _ in 0..16 {
        if let Ok(resources) = current.get(b"Resources") {
            return object_dict(resolve(document, resources));
        }
        let parent = current.get(b"Parent").ok()?;
        current = object_dict(resolve(document, parent))?;
    }
    None
}

// -- Image decoding -----------------------------------------------------------

/// Decode a single XObject entry if it is an image stream.
///
/// `Ok(None)` means "not an image" (forms, fonts); `Err` means "an image we
/// cannot decode", which the caller logs and skips.
fn decode_image_xobject(
    document: &Document,
    entry: &Object,
) -> Result<Option<DynamicImage>, DatumwerkError> {
    let Object::Stream(stream) = resolve(document, entry) else {
        return Ok(None);
    };

    let subtype = stream.dict.get(b"Subtype").ok().and_then(object_name);
    if subtype != Some(b"Image".as_slice()) {
        return Ok(None);
    }

    match primary_filter(&stream.dict).as_deref() {
        Some(b"DCTDecode") => {
            let img = image::load_from_memory(&stream.content).map_err(|err| {
                DatumwerkError::ImageError(format!("embedded JPEG failed to decode: {err}"))
            })?;
            Ok(Some(img))
        }
        Some(b"FlateDecode") => {
            let data = stream.decompressed_content().map_err(|err| {
                DatumwerkError::ImageError(format!("flate stream failed to inflate: {err}"))
            })?;
            decode_raw_samples(stream, data).map(Some)
        }
        None => decode_raw_samples(stream, stream.content.clone()).map(Some),
        Some(other) => Err(DatumwerkError::ImageError(format!(
            "unsupported image filter {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

/// First entry of `/Filter`, whether it is a single name or an array.
fn primary_filter(dict: &Dictionary) -> Option<Vec<u8>> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.clone()),
        Object::Array(array) => array.first().and_then(object_name).map(<[u8]>::to_vec),
        _ => None,
    }
}

/// Rebuild an image from raw (inflated) samples using the stream's pixel
/// geometry. Supports 8-bit DeviceGray and DeviceRGB without predictors.
fn decode_raw_samples(stream: &Stream, data: Vec<u8>) -> Result<DynamicImage, DatumwerkError> {
    let dict = &stream.dict;

    if dict.get(b"DecodeParms").is_ok() {
        return Err(DatumwerkError::ImageError(
            "raw image stream uses decode parameters (predictor) — unsupported".into(),
        ));
    }

    let width: u32 = dict
        .get(b"Width")
        .ok()
        .and_then(object_int)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DatumwerkError::ImageError("image stream missing /Width".into()))?;
    let height: u32 = dict
        .get(b"Height")
        .ok()
        .and_then(object_int)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DatumwerkError::ImageError("image stream missing /Height".into()))?;

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(object_int)
        .unwrap_or(8);
    if bits != 8 {
        return Err(DatumwerkError::ImageError(format!(
            "unsupported bits per component: {bits}"
        )));
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(object_name)
        .map(<[u8]>::to_vec)
        .unwrap_or_else(|| b"DeviceGray".to_vec());

    match color_space.as_slice() {
        b"DeviceGray" => GrayImage::from_raw(width, height, data)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| {
                DatumwerkError::ImageError("gray sample data does not match geometry".into())
            }),
        b"DeviceRGB" => RgbImage::from_raw(width, height, data)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                DatumwerkError::ImageError("rgb sample data does not match geometry".into())
            }),
        other => Err(DatumwerkError::ImageError(format!(
            "unsupported colour space {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Single-page PDF whose only content is one embedded image XObject.
    fn image_pdf(image_stream: Stream) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(image_stream);
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            b"q 100 0 0 100 0 0 cm /Im0 Do Q".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("pdf serialises");
        bytes
    }

    fn gray_image_stream(width: u32, height: u32) -> Stream {
        let samples = vec![200u8; (width * height) as usize];
        // Leave the samples unfiltered: the harvest handles missing /Filter.
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            samples,
        );
        stream.allows_compression = false;
        stream
    }

    #[test]
    fn harvests_unfiltered_gray_image() {
        let bytes = image_pdf(gray_image_stream(12, 8));
        let reader = PdfReader::from_bytes(&bytes).unwrap();

        let images = extract_page_images(&reader);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].width(), 12);
        assert_eq!(images[0].height(), 8);
    }

    #[test]
    fn text_only_pdf_yields_no_images() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => dictionary! {},
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(extract_page_images(&reader).is_empty());
    }

    #[test]
    fn geometry_mismatch_is_skipped_not_fatal() {
        // Claim 100x100 but provide far fewer samples.
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 100,
                "Height" => 100,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0u8; 16],
        );
        stream.allows_compression = false;
        let bytes = image_pdf(stream);
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert!(extract_page_images(&reader).is_empty());
    }
}
