use crate::config::AppConfig;
use crate::error::AppError;
use crate::metadata::Place;
use crossbeam_channel::RecvTimeoutError;
use reverse_geocoder::ReverseGeocoder;
use std::sync::Arc;
use std::time::Duration;

/// Reverse geocoding boundary: decimal coordinates in, city and country out.
pub trait GeocodeResolver: Send + Sync {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Place, AppError>;
}

const EARTH_RADIUS_KM: f64 = 6371.0;
const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Nearest populated place from the GeoNames dataset bundled with
/// `reverse_geocoder`. Works without network access. Points farther than
/// `max_distance_km` from any place (open sea, polar ice) get no match.
pub struct OfflineResolver {
    geocoder: ReverseGeocoder,
    max_distance_km: f64,
}

impl OfflineResolver {
    pub fn new() -> Self {
        Self::with_max_distance(DEFAULT_MAX_DISTANCE_KM)
    }

    pub fn with_max_distance(max_distance_km: f64) -> Self {
        log::debug!("Loading offline reverse geocoding dataset");
        Self {
            geocoder: ReverseGeocoder::new(),
            max_distance_km,
        }
    }
}

/// Great-circle distance in kilometres.
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

impl Default for OfflineResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeResolver for OfflineResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Place, AppError> {
        let result = self.geocoder.search((latitude, longitude));
        let record = result.record;
        let distance = haversine_km(latitude, longitude, record.lat, record.lon);
        if distance > self.max_distance_km {
            log::debug!(
                "Nearest place to ({}, {}) is {} at {:.0} km, treating as no match",
                latitude, longitude, record.name, distance
            );
            return Ok(Place::default());
        }
        let country = rust_iso3166::from_alpha2(&record.cc).map(|c| c.name.to_string());
        log::trace!("Resolved ({}, {}) to {} [{}]", latitude, longitude, record.name, record.cc);

        Ok(Place {
            city: Some(record.name.clone()).filter(|n| !n.is_empty()),
            country,
        })
    }
}

/// Resolver used when geocoding is switched off.
pub struct NoopResolver;

impl GeocodeResolver for NoopResolver {
    fn resolve(&self, _latitude: f64, _longitude: f64) -> Result<Place, AppError> {
        Err(AppError::ResolverUnavailable("geocoding disabled".into()))
    }
}

/// Runs each lookup on a helper thread and gives up after `budget`.
/// A timed-out lookup keeps running in the background; its answer is dropped.
pub struct TimedResolver {
    inner: Arc<dyn GeocodeResolver>,
    budget: Duration,
}

impl TimedResolver {
    pub fn new(inner: Arc<dyn GeocodeResolver>, budget: Duration) -> Self {
        Self { inner, budget }
    }
}

impl GeocodeResolver for TimedResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Place, AppError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        std::thread::spawn(move || {
            // Receiver is gone if we already timed out.
            let _ = tx.send(inner.resolve(latitude, longitude));
        });

        match rx.recv_timeout(self.budget) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(AppError::ResolverUnavailable(format!(
                "lookup for ({}, {}) exceeded {:?}",
                latitude, longitude, self.budget
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(AppError::ResolverUnavailable("resolver thread exited without an answer".into()))
            }
        }
    }
}

/// Puts `inner` behind a per-call budget. A budget of 0 means no timeout.
pub fn with_budget(inner: Arc<dyn GeocodeResolver>, timeout_ms: u64) -> Arc<dyn GeocodeResolver> {
    if timeout_ms == 0 {
        return inner;
    }
    Arc::new(TimedResolver::new(inner, Duration::from_millis(timeout_ms)))
}

/// Picks the resolver named in configuration and wraps it in the per-call budget.
pub fn from_config(app_config: &AppConfig) -> Result<Arc<dyn GeocodeResolver>, AppError> {
    let inner: Arc<dyn GeocodeResolver> = match app_config.geocoder.as_str() {
        "offline" => Arc::new(OfflineResolver::with_max_distance(app_config.geocode_max_distance_km)),
        "none" => return Ok(Arc::new(NoopResolver)),
        other => {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "unknown geocoder {:?}, expected \"offline\" or \"none\"",
                other
            ))))
        }
    };
    Ok(with_budget(inner, app_config.geocode_timeout_ms))
}
