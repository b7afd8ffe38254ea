use crate::coords::{split_dms, to_decimal};
use crate::error::AppError;
use crate::metadata::{CaptureMetadata, GeoPoint};
use chrono::NaiveDateTime;
use exif::{Context, Exif, Field, In, Reader, Value};
use std::io::{BufRead, Seek};

const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// The closed set of tags the extractor cares about. Everything else in the
/// tag block is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KnownTag {
    DateTimeOriginal,
    DateTime,
    GpsLatitudeRef,
    GpsLatitude,
    GpsLongitudeRef,
    GpsLongitude,
}

impl KnownTag {
    fn classify(field: &Field) -> Option<Self> {
        match (field.tag.context(), field.tag.number()) {
            (Context::Exif, 0x9003) => Some(KnownTag::DateTimeOriginal),
            (Context::Tiff, 0x0132) => Some(KnownTag::DateTime),
            (Context::Gps, 0x0001) => Some(KnownTag::GpsLatitudeRef),
            (Context::Gps, 0x0002) => Some(KnownTag::GpsLatitude),
            (Context::Gps, 0x0003) => Some(KnownTag::GpsLongitudeRef),
            (Context::Gps, 0x0004) => Some(KnownTag::GpsLongitude),
            _ => None,
        }
    }
}

/// Fields of interest found in one pass over the primary IFD.
#[derive(Default)]
struct TagScan<'a> {
    date_time_original: Option<&'a Value>,
    date_time: Option<&'a Value>,
    lat_ref: Option<&'a Value>,
    lat: Option<&'a Value>,
    lon_ref: Option<&'a Value>,
    lon: Option<&'a Value>,
}

impl<'a> TagScan<'a> {
    fn scan(exif: &'a Exif) -> Self {
        let mut scan = TagScan::default();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            let Some(known) = KnownTag::classify(field) else {
                continue;
            };
            log::trace!("Found tag {:?}: {}", known, field.display_value());
            let slot = match known {
                KnownTag::DateTimeOriginal => &mut scan.date_time_original,
                KnownTag::DateTime => &mut scan.date_time,
                KnownTag::GpsLatitudeRef => &mut scan.lat_ref,
                KnownTag::GpsLatitude => &mut scan.lat,
                KnownTag::GpsLongitudeRef => &mut scan.lon_ref,
                KnownTag::GpsLongitude => &mut scan.lon,
            };
            slot.get_or_insert(&field.value);
        }
        scan
    }
}

/// Reads the tag block out of an image container (JPEG, TIFF, HEIF, PNG, WebP).
pub fn read_tag_block<R: BufRead + Seek>(reader: &mut R) -> Result<Exif, AppError> {
    Ok(Reader::new().read_from_container(reader)?)
}

/// Parses a bare TIFF-structured tag block, as found after the `Exif\0\0`
/// marker of a JPEG APP1 segment.
pub fn read_raw_tag_block(data: Vec<u8>) -> Result<Exif, AppError> {
    Ok(Reader::new().read_raw(data)?)
}

/// Pulls capture time and location out of a tag block. Missing or malformed
/// tags leave the corresponding field empty; this never fails.
pub fn extract(exif: &Exif) -> CaptureMetadata {
    let scan = TagScan::scan(exif);

    let capture_time = scan
        .date_time_original
        .and_then(|v| recover(parse_timestamp(v), "DateTimeOriginal"))
        .or_else(|| scan.date_time.and_then(|v| recover(parse_timestamp(v), "DateTime")));

    let location = match (scan.lat, scan.lat_ref, scan.lon, scan.lon_ref) {
        (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) => {
            recover(decode_location(lat, lat_ref, lon, lon_ref), "GPS")
        }
        (None, None, None, None) => None,
        _ => {
            log::debug!("Incomplete GPS block, leaving location empty");
            None
        }
    };

    CaptureMetadata { capture_time, location }
}

fn recover<T>(result: Result<Option<T>, AppError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring {} tag: {}", what, e);
            None
        }
    }
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(strings) => strings
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Result<Option<NaiveDateTime>, AppError> {
    let Some(text) = ascii(value) else {
        return Err(AppError::MalformedTimestamp(format!("{:?}", value)));
    };
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|_| AppError::MalformedTimestamp(text))
}

fn decode_location(lat: &Value, lat_ref: &Value, lon: &Value, lon_ref: &Value) -> Result<Option<GeoPoint>, AppError> {
    let (Some(latitude), Some(longitude)) = (decode_coordinate(lat, lat_ref)?, decode_coordinate(lon, lon_ref)?) else {
        return Ok(None);
    };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        log::warn!("GPS position ({}, {}) out of range, leaving location empty", latitude, longitude);
        return Ok(None);
    }

    Ok(Some(GeoPoint { latitude, longitude }))
}

fn decode_coordinate(value: &Value, reference: &Value) -> Result<Option<f64>, AppError> {
    let components: Vec<f64> = match value {
        Value::Rational(parts) => parts.iter().map(|r| r.to_f64()).collect(),
        other => {
            log::debug!("Unexpected GPS coordinate type: {:?}", other);
            return Ok(None);
        }
    };
    let Some((degrees, minutes, seconds)) = split_dms(&components) else {
        log::debug!("Unusable GPS coordinate components: {:?}", components);
        return Ok(None);
    };

    let reference = ascii(reference).and_then(|s| s.chars().next()).unwrap_or('\0');
    to_decimal(degrees, minutes, seconds, reference).map(Some)
}
