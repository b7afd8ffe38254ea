//! Geotagged photo index: reads capture time and GPS position from each
//! image's EXIF block, resolves the position to a city and country, and
//! answers name/place/date queries over the result.

pub mod config;
pub mod coords;
pub mod error;
pub mod extractor;
pub mod geocode;
pub mod index;
pub mod manifest;
pub mod metadata;
pub mod processor;
pub mod query;

pub use crate::config::AppConfig;
pub use crate::error::AppError;
pub use crate::index::PhotoIndex;
pub use crate::manifest::Manifest;
pub use crate::metadata::{PhotoRecord, SkippedEntry};
pub use crate::query::{DateFilter, NameMatch, Query};
