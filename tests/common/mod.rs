#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use geo_photo_index::geocode::GeocodeResolver;
use geo_photo_index::metadata::Place;
use geo_photo_index::AppError;
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// GPS position as written into a fixture: (deg, min, sec*100) plus reference.
#[derive(Clone, Copy)]
pub struct Dms {
    pub deg: u32,
    pub min: u32,
    pub centisec: u32,
    pub reference: char,
}

impl Dms {
    pub fn decimal(&self) -> f64 {
        let magnitude = self.deg as f64 + self.min as f64 / 60.0 + (self.centisec as f64 / 100.0) / 3600.0;
        match self.reference {
            'S' | 'W' => -magnitude,
            _ => magnitude,
        }
    }

    fn rational(&self) -> Value {
        Value::Rational(vec![
            Rational { num: self.deg, denom: 1 },
            Rational { num: self.min, denom: 1 },
            Rational { num: self.centisec, denom: 100 },
        ])
    }
}

pub const NATAL_LAT: Dms = Dms { deg: 5, min: 47, centisec: 4020, reference: 'S' };
pub const NATAL_LON: Dms = Dms { deg: 35, min: 12, centisec: 3960, reference: 'W' };

#[derive(Default)]
pub struct Fixture {
    pub gps: Option<(Dms, Dms)>,
    pub taken: Option<&'static str>,
    pub width: u32,
    pub height: u32,
}

impl Fixture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn gps(mut self, lat: Dms, lon: Dms) -> Self {
        self.gps = Some((lat, lon));
        self
    }

    pub fn taken(mut self, timestamp: &'static str) -> Self {
        self.taken = Some(timestamp);
        self
    }

    fn tag_block(&self) -> Vec<u8> {
        let ascii = |tag: Tag, text: String| Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.into_bytes()]),
        };

        let mut fields = vec![ascii(Tag::Make, "FixtureCam".to_string())];
        if let Some(taken) = self.taken {
            fields.push(ascii(Tag::DateTimeOriginal, taken.to_string()));
        }
        if let Some((lat, lon)) = self.gps {
            fields.push(ascii(Tag::GPSLatitudeRef, lat.reference.to_string()));
            fields.push(Field { tag: Tag::GPSLatitude, ifd_num: In::PRIMARY, value: lat.rational() });
            fields.push(ascii(Tag::GPSLongitudeRef, lon.reference.to_string()));
            fields.push(Field { tag: Tag::GPSLongitude, ifd_num: In::PRIMARY, value: lon.rational() });
        }

        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    /// Encodes a JPEG and splices an APP1 Exif segment right after SOI.
    pub fn jpeg_bytes(&self) -> Vec<u8> {
        let mut jpeg = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(self.width, self.height))
            .write_to(&mut jpeg, ImageOutputFormat::Jpeg(80))
            .unwrap();
        let jpeg = jpeg.into_inner();

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend(self.tag_block());
        let segment_len = (payload.len() + 2) as u16;

        let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
        out.extend_from_slice(&jpeg[..2]);
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend(payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    pub fn write(&self, dir: &Path, name: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, self.jpeg_bytes()).unwrap();
        path.to_string_lossy().to_string()
    }
}

/// A JPEG with no EXIF segment at all.
pub fn write_plain_jpeg(dir: &Path, name: &str) -> String {
    let path: PathBuf = dir.join(name);
    DynamicImage::ImageRgb8(RgbImage::new(4, 4)).save(&path).unwrap();
    path.to_string_lossy().to_string()
}

/// Answers every lookup with a fixed place and counts calls.
#[derive(Default)]
pub struct FixedResolver {
    pub place: Place,
    pub calls: AtomicUsize,
}

impl FixedResolver {
    pub fn natal() -> Self {
        Self {
            place: Place { city: Some("Natal".into()), country: Some("Brasil".into()) },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeocodeResolver for FixedResolver {
    fn resolve(&self, _latitude: f64, _longitude: f64) -> Result<Place, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.place.clone())
    }
}

pub struct FailingResolver;

impl GeocodeResolver for FailingResolver {
    fn resolve(&self, _latitude: f64, _longitude: f64) -> Result<Place, AppError> {
        Err(AppError::ResolverUnavailable("offline".into()))
    }
}
