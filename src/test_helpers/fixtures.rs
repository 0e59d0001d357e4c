//! Synthetic image fixtures: gradient JPEG/PNG files and a hand-built EXIF
//! segment.
//!
//! Depends only on `image` and std so the integration tests can include it
//! with `#[path]` as well.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::path::Path;

/// Deterministic test pattern: red follows x, green follows y.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

/// Write a gradient JPEG without metadata.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(&gradient(width, height))).unwrap();
}

/// Write a gradient PNG (lossless, for exact pixel comparisons).
pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// EXIF values to embed. `None` leaves the tag out entirely.
#[derive(Debug, Clone, Default)]
pub struct ExifFixture {
    pub make: Option<String>,
    pub model: Option<String>,
    pub date_time: Option<String>,
    pub exposure_time: Option<(u32, u32)>,
    pub f_number: Option<(u32, u32)>,
    pub iso: Option<u16>,
    pub date_time_original: Option<String>,
    pub focal_length: Option<(u32, u32)>,
    pub lens_model: Option<String>,
}

impl ExifFixture {
    /// Values as written by a Sony A6000 with the 16-50 kit lens.
    pub fn sony_a6000() -> Self {
        Self {
            make: Some("SONY".into()),
            model: Some("ILCE-6000".into()),
            date_time: Some("2019:05:04 12:30:00".into()),
            exposure_time: Some((1, 125)),
            f_number: Some((160, 10)),
            iso: Some(100),
            date_time_original: None,
            focal_length: Some((350, 10)),
            lens_model: Some("E PZ 16-50mm F3.5-5.6 OSS".into()),
        }
    }
}

enum Entry {
    Ascii(u16, String),
    Short(u16, u16),
    Long(u16, u32),
    Rational(u16, u32, u32),
}

const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_EXPOSURE_TIME: u16 = 0x829A;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_ISO: u16 = 0x8827;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_FOCAL_LENGTH: u16 = 0x920A;
const TAG_LENS_MODEL: u16 = 0xA434;

fn ifd_len(entries: usize) -> u32 {
    2 + 12 * entries as u32 + 4
}

/// Serialize one IFD; out-of-line values go to `data`, which starts at
/// `data_offset` in the TIFF block.
fn write_ifd(out: &mut Vec<u8>, entries: &[Entry], data_offset: u32, data: &mut Vec<u8>) {
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        match entry {
            Entry::Ascii(tag, text) => {
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                out.extend_from_slice(&tag.to_le_bytes());
                out.extend_from_slice(&2u16.to_le_bytes());
                out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
                if bytes.len() <= 4 {
                    bytes.resize(4, 0);
                    out.extend_from_slice(&bytes);
                } else {
                    out.extend_from_slice(&(data_offset + data.len() as u32).to_le_bytes());
                    data.extend_from_slice(&bytes);
                    if data.len() % 2 == 1 {
                        data.push(0);
                    }
                }
            }
            Entry::Short(tag, value) => {
                out.extend_from_slice(&tag.to_le_bytes());
                out.extend_from_slice(&3u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&value.to_le_bytes());
                out.extend_from_slice(&[0, 0]);
            }
            Entry::Long(tag, value) => {
                out.extend_from_slice(&tag.to_le_bytes());
                out.extend_from_slice(&4u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&value.to_le_bytes());
            }
            Entry::Rational(tag, num, den) => {
                out.extend_from_slice(&tag.to_le_bytes());
                out.extend_from_slice(&5u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&(data_offset + data.len() as u32).to_le_bytes());
                data.extend_from_slice(&num.to_le_bytes());
                data.extend_from_slice(&den.to_le_bytes());
            }
        }
    }
    // no next IFD
    out.extend_from_slice(&0u32.to_le_bytes());
}

/// Little-endian TIFF block holding IFD0 and, when needed, an Exif sub-IFD.
pub fn exif_tiff_block(fixture: &ExifFixture) -> Vec<u8> {
    let mut ifd0 = Vec::new();
    if let Some(make) = &fixture.make {
        ifd0.push(Entry::Ascii(TAG_MAKE, make.clone()));
    }
    if let Some(model) = &fixture.model {
        ifd0.push(Entry::Ascii(TAG_MODEL, model.clone()));
    }
    if let Some(dt) = &fixture.date_time {
        ifd0.push(Entry::Ascii(TAG_DATE_TIME, dt.clone()));
    }

    let mut exif_ifd = Vec::new();
    if let Some((n, d)) = fixture.exposure_time {
        exif_ifd.push(Entry::Rational(TAG_EXPOSURE_TIME, n, d));
    }
    if let Some((n, d)) = fixture.f_number {
        exif_ifd.push(Entry::Rational(TAG_F_NUMBER, n, d));
    }
    if let Some(iso) = fixture.iso {
        exif_ifd.push(Entry::Short(TAG_ISO, iso));
    }
    if let Some(dt) = &fixture.date_time_original {
        exif_ifd.push(Entry::Ascii(TAG_DATE_TIME_ORIGINAL, dt.clone()));
    }
    if let Some((n, d)) = fixture.focal_length {
        exif_ifd.push(Entry::Rational(TAG_FOCAL_LENGTH, n, d));
    }
    if let Some(lens) = &fixture.lens_model {
        exif_ifd.push(Entry::Ascii(TAG_LENS_MODEL, lens.clone()));
    }

    let has_exif_ifd = !exif_ifd.is_empty();
    let ifd0_entries = ifd0.len() + usize::from(has_exif_ifd);
    let exif_offset = 8 + ifd_len(ifd0_entries);
    if has_exif_ifd {
        ifd0.push(Entry::Long(TAG_EXIF_IFD, exif_offset));
    }
    let data_offset = exif_offset
        + if has_exif_ifd {
            ifd_len(exif_ifd.len())
        } else {
            0
        };

    let mut out = b"II*\0".to_vec();
    out.extend_from_slice(&8u32.to_le_bytes());
    let mut data = Vec::new();
    write_ifd(&mut out, &ifd0, data_offset, &mut data);
    if has_exif_ifd {
        write_ifd(&mut out, &exif_ifd, data_offset, &mut data);
    }
    out.extend_from_slice(&data);
    out
}

/// Write a gradient JPEG carrying an APP1 Exif segment right after SOI.
pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, fixture: &ExifFixture) {
    let jpeg = encode_jpeg(&gradient(width, height));
    let tiff = exif_tiff_block(fixture);
    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}
