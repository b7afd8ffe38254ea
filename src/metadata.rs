// src/metadata.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded coordinate pair. Latitude and longitude only ever travel together.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the extractor pulls out of one tag block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    pub capture_time: Option<NaiveDateTime>,
    pub location: Option<GeoPoint>,
}

/// Result of a reverse geocoding lookup.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Place {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhotoRecord {
    pub file_path: String,
    pub display_name: String,
    pub width: u32,
    pub height: u32,
    pub capture_time: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl PhotoRecord {
    pub fn new(file_path: &str, width: u32, height: u32, metadata: CaptureMetadata, place: Place) -> Self {
        Self {
            file_path: file_path.to_string(),
            display_name: display_name(file_path),
            width,
            height,
            capture_time: metadata.capture_time,
            latitude: metadata.location.map(|p| p.latitude),
            longitude: metadata.location.map(|p| p.longitude),
            city: place.city,
            country: place.country,
        }
    }

    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

/// Final path segment, accepting both separators since manifests are plain text.
fn display_name(file_path: &str) -> String {
    file_path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(file_path)
        .to_string()
}

impl fmt::Display for PhotoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".into())
        }

        writeln!(f, "Name:      {}", self.display_name)?;
        writeln!(f, "Path:      {}", self.file_path)?;
        writeln!(f, "Size:      {}x{}", self.width, self.height)?;
        writeln!(f, "Latitude:  {}", or_dash(&self.latitude))?;
        writeln!(f, "Longitude: {}", or_dash(&self.longitude))?;
        writeln!(f, "City:      {}", or_dash(&self.city))?;
        writeln!(f, "Country:   {}", or_dash(&self.country))?;
        write!(f, "Date:      {}", or_dash(&self.capture_time))
    }
}

/// A manifest entry that could not be ingested.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}
