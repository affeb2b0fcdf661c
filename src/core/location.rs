use crate::services::geocode::{state_abbreviation, GeocodeError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Raw coordinates from the positioning device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reverse-geocode result before state-name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: String,
    pub state_name: String,
}

/// Errors from the positioning device
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("positioning is not supported on this device")]
    Unsupported,
    #[error("position permission denied")]
    Denied,
    #[error("position read failed: {0}")]
    Unavailable(String),
}

/// Tri-state (plus unknown) permission as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unknown,
    Prompt,
    Granted,
    Denied,
}

/// Inner resolution sequence, entered only after a grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Idle,
    Resolving,
    Resolved(String),
    Failed,
}

/// Human-readable notices surfaced alongside terminal states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationNotice {
    CityApplied(String),
    UnrecognizedCity(String),
    ResolutionFailed,
    PermissionDenied,
    Unsupported,
}

impl LocationNotice {
    pub fn message(&self) -> String {
        match self {
            LocationNotice::CityApplied(city) => {
                format!("Showing caregivers near {}", city)
            }
            LocationNotice::UnrecognizedCity(city) => format!(
                "We located you in {}, but no caregivers are registered there yet; showing all cities",
                city
            ),
            LocationNotice::ResolutionFailed => {
                "We couldn't determine your location; you can still pick a city manually".to_string()
            }
            LocationNotice::PermissionDenied => {
                "Location access was denied; you can still pick a city manually".to_string()
            }
            LocationNotice::Unsupported => {
                "This device doesn't support location; you can still pick a city manually".to_string()
            }
        }
    }
}

/// Terminal outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    /// Resolved city is known to the catalog; the caller should apply it as
    /// the selected city
    Applied(String),
    /// Resolved city is not in the catalog; the city filter stays at "any"
    Unrecognized(String),
    Failed,
    Denied,
    Unsupported,
    /// Permission was revoked while a step was pending; the late result was
    /// discarded and nothing may be mutated
    Discarded,
}

impl LocationOutcome {
    pub fn notice(&self) -> Option<LocationNotice> {
        match self {
            LocationOutcome::Applied(city) => Some(LocationNotice::CityApplied(city.clone())),
            LocationOutcome::Unrecognized(city) => {
                Some(LocationNotice::UnrecognizedCity(city.clone()))
            }
            LocationOutcome::Failed => Some(LocationNotice::ResolutionFailed),
            LocationOutcome::Denied => Some(LocationNotice::PermissionDenied),
            LocationOutcome::Unsupported => Some(LocationNotice::Unsupported),
            LocationOutcome::Discarded => None,
        }
    }
}

/// Platform permission query plus one-shot coordinate read
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn permission(&self) -> PermissionState;
    async fn current(&self) -> Result<Coordinates, PositionError>;
}

/// Best-effort external reverse-geocoding service
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coords: Coordinates) -> Result<Place, GeocodeError>;
}

/// One-time interactive location resolution driver.
///
/// State machine: `Unknown -> Prompt -> (Granted | Denied)`; a grant runs the
/// inner sequence `Resolving -> Resolved | Failed`. Every path ends in a
/// terminal outcome plus a notice; no failure propagates to the caller. A
/// permission revocation observed mid-flight bumps the generation counter so
/// that a pending step's result is discarded on arrival.
pub struct LocationResolver {
    position: Arc<dyn PositionSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    known_cities: HashSet<String>,
    permission: Mutex<PermissionState>,
    resolution: Mutex<ResolutionState>,
    generation: AtomicU64,
}

impl LocationResolver {
    pub fn new(
        position: Arc<dyn PositionSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
        known_cities: HashSet<String>,
    ) -> Self {
        Self {
            position,
            geocoder,
            known_cities,
            permission: Mutex::new(PermissionState::Unknown),
            resolution: Mutex::new(ResolutionState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// Query the platform permission. `Unknown` becomes `Prompt`: the caller
    /// must offer an explicit allow/deny choice before any positioning
    /// hardware is engaged.
    pub async fn begin(&self) -> PermissionState {
        let reported = self.position.permission().await;
        let next = match reported {
            PermissionState::Unknown | PermissionState::Prompt => PermissionState::Prompt,
            other => other,
        };
        *self.permission.lock().await = next;
        next
    }

    /// The user declined the prompt (or the platform already denied)
    pub async fn deny(&self) -> LocationOutcome {
        *self.permission.lock().await = PermissionState::Denied;
        LocationOutcome::Denied
    }

    /// The user allowed the prompt: read coordinates, reverse-geocode, map the
    /// state name and check the city against the known catalog set. Always
    /// resolves to a terminal outcome; never panics or propagates.
    pub async fn grant(&self) -> LocationOutcome {
        *self.permission.lock().await = PermissionState::Granted;
        *self.resolution.lock().await = ResolutionState::Resolving;
        let generation = self.generation.load(Ordering::SeqCst);

        let coords = match self.position.current().await {
            Ok(coords) => coords,
            Err(PositionError::Unsupported) => {
                // Capability absent: permission is forced to denied
                *self.permission.lock().await = PermissionState::Denied;
                *self.resolution.lock().await = ResolutionState::Failed;
                return LocationOutcome::Unsupported;
            }
            Err(PositionError::Denied) => {
                *self.permission.lock().await = PermissionState::Denied;
                *self.resolution.lock().await = ResolutionState::Failed;
                return LocationOutcome::Denied;
            }
            Err(e) => {
                tracing::warn!("Coordinate read failed: {}", e);
                *self.resolution.lock().await = ResolutionState::Failed;
                return LocationOutcome::Failed;
            }
        };

        if self.superseded(generation).await {
            return LocationOutcome::Discarded;
        }

        let place = match self.geocoder.reverse(coords).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                *self.resolution.lock().await = ResolutionState::Failed;
                return LocationOutcome::Failed;
            }
        };

        if self.superseded(generation).await {
            return LocationOutcome::Discarded;
        }

        // Unmapped state names are a failed resolution, not a guess
        let Some(abbrev) = state_abbreviation(&place.state_name) else {
            tracing::warn!("Unmapped state name in geocode response: {}", place.state_name);
            *self.resolution.lock().await = ResolutionState::Failed;
            return LocationOutcome::Failed;
        };

        let city = format!("{}, {}", place.city, abbrev);
        *self.resolution.lock().await = ResolutionState::Resolved(city.clone());

        if self.known_cities.contains(&city) {
            LocationOutcome::Applied(city)
        } else {
            LocationOutcome::Unrecognized(city)
        }
    }

    /// Observe a permission revocation: any pending step's result is discarded
    /// on arrival instead of mutating criteria
    pub async fn revoke(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.permission.lock().await = PermissionState::Denied;
    }

    pub async fn permission_state(&self) -> PermissionState {
        *self.permission.lock().await
    }

    pub async fn resolution_state(&self) -> ResolutionState {
        self.resolution.lock().await.clone()
    }

    async fn superseded(&self, generation: u64) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            *self.resolution.lock().await = ResolutionState::Idle;
            tracing::debug!("Discarding location step after permission change");
            return true;
        }
        false
    }
}
