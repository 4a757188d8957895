use pdf_writer::{Filter, Pdf, Ref};

use crate::imaging::{is_jpeg, jpeg_components};
use crate::model::{ImageFormat, ImageRecord};

/// Write `record` as an image XObject at `xobj_ref`. Returns false when the
/// payload could not be decoded; nothing is written in that case.
pub(super) fn embed_image(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    record: &ImageRecord,
    format: ImageFormat,
    alloc: &mut impl FnMut() -> Ref,
) -> bool {
    if format == ImageFormat::Jpeg && is_jpeg(&record.data) {
        let mut xobj = pdf.image_xobject(xobj_ref, &record.data);
        xobj.filter(Filter::DctDecode);
        xobj.width(record.pixel_width as i32);
        xobj.height(record.pixel_height as i32);
        match jpeg_components(&record.data) {
            Some(1) => {
                xobj.color_space().device_gray();
            }
            Some(4) => {
                xobj.color_space().device_cmyk();
                // Adobe CMYK JPEGs are stored inverted
                xobj.decode([1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
            }
            _ => {
                xobj.color_space().device_rgb();
            }
        }
        xobj.bits_per_component(8);
        return true;
    }

    // PNG, WEBP, and default-format payloads that are not really JPEG are
    // decoded and re-encoded as Flate RGB (+ alpha soft mask).
    let decoded = match image::load_from_memory(&record.data) {
        Ok(img) => img,
        Err(e) => {
            log::warn!(
                "Cannot embed {} ({} {}): {e}",
                record.display_name,
                record.id,
                format.name()
            );
            return false;
        }
    };
    let rgba = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    true
}
