use crate::error::GeolocationError;
use crate::types::geo::Coords;

pub trait Geolocation {
    fn request_current_position(&mut self) -> Result<Coords, GeolocationError>;
}

/// A position the browser already resolved and reported. It answers one
/// request; later requests see it as unavailable.
#[derive(Debug, Clone)]
pub struct ReportedPosition(Option<Result<Coords, GeolocationError>>);

impl ReportedPosition {
    pub fn located(coords: Coords) -> Self {
        Self(Some(Ok(coords)))
    }

    pub fn failed(error: GeolocationError) -> Self {
        Self(Some(Err(error)))
    }
}

impl Geolocation for ReportedPosition {
    fn request_current_position(&mut self) -> Result<Coords, GeolocationError> {
        self.0.take().unwrap_or_else(|| {
            Err(GeolocationError::Unavailable(
                "position already consumed".to_string(),
            ))
        })
    }
}
