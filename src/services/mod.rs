// Service exports
pub mod catalog;
pub mod geocode;

pub use catalog::{CatalogError, CatalogStore};
pub use geocode::{state_abbreviation, GeocodeError, ReverseGeocodeClient};
