use crate::error::AppError;
use crate::extractor;
use crate::geocode::GeocodeResolver;
use crate::metadata::{Place, PhotoRecord};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;

/// Turns one manifest entry into a record. Only failures that make the file
/// unusable come back as errors; missing tags or a failed geocode just leave
/// the matching fields empty.
pub fn process_image(path: &str, resolver: &dyn GeocodeResolver) -> Result<PhotoRecord, AppError> {
    log::trace!("Extracting EXIF data for image: {}", path);
    let file = File::open(path).map_err(|e| AppError::unreadable(path, e))?;
    let mut buf_reader = BufReader::new(file);
    let exif = extractor::read_tag_block(&mut buf_reader).map_err(|e| AppError::unreadable(path, e))?;

    log::trace!("Getting image dimensions for image: {}", path);
    let (width, height) = image::image_dimensions(path).map_err(|e| AppError::unreadable(path, e))?;
    log::debug!("Dimensions for {}: {}x{}", path, width, height);

    let metadata = extractor::extract(&exif);

    let place = match metadata.location {
        Some(point) => resolver.resolve(point.latitude, point.longitude).unwrap_or_else(|e| {
            log::warn!("No place for {}: {}", path, e);
            Place::default()
        }),
        None => Place::default(),
    };

    Ok(PhotoRecord::new(path, width, height, metadata, place))
}

/// Processes every entry on the current rayon pool. The output has one slot
/// per input, in input order, whatever order the workers finish in.
pub fn process_all(paths: &[String], resolver: &dyn GeocodeResolver) -> Vec<Result<PhotoRecord, AppError>> {
    log::info!("Processing {} images", paths.len());

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| {
            log::debug!("Processing image started for: {}", path);
            let result = process_image(path, resolver);
            match &result {
                Ok(record) => log::trace!("Extracted metadata for {}: {:?}", path, record),
                Err(e) => log::warn!("Failed to process image {}: {}", path, e),
            }
            result
        })
        .collect();

    log::info!("All images processed.");
    results
}
