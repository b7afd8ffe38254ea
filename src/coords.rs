use crate::error::AppError;

/// Converts degrees/minutes/seconds plus a hemisphere letter into signed
/// decimal degrees. `N`/`E` are positive, `S`/`W` negative, case-insensitive.
///
/// No range check happens here; the extractor decides what to do with
/// out-of-range results from malformed tags.
pub fn to_decimal(degrees: u32, minutes: u32, seconds: f64, reference: char) -> Result<f64, AppError> {
    let sign = match reference.to_ascii_uppercase() {
        'N' | 'E' => 1.0,
        'S' | 'W' => -1.0,
        other => return Err(AppError::InvalidReference(other)),
    };

    Ok(sign * (degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0))
}

/// Splits an EXIF rational triple into whole degrees, whole minutes and
/// seconds. Fractional degrees or minutes (some cameras write `30.5/1`
/// minutes and zero seconds) are carried into the seconds component.
pub fn split_dms(components: &[f64]) -> Option<(u32, u32, f64)> {
    if components.is_empty() || components.len() > 3 {
        return None;
    }
    if components.iter().any(|c| !c.is_finite() || *c < 0.0) {
        return None;
    }

    let raw_deg = components[0];
    let raw_min = components.get(1).copied().unwrap_or(0.0);
    let raw_sec = components.get(2).copied().unwrap_or(0.0);

    let degrees = raw_deg.trunc();
    let total_minutes = raw_min + raw_deg.fract() * 60.0;
    let minutes = total_minutes.trunc();
    let seconds = raw_sec + total_minutes.fract() * 60.0;

    Some((degrees as u32, minutes as u32, seconds))
}
