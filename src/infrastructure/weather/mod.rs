pub mod nasa_power;
pub mod nominatim;

pub use nasa_power::NasaPowerClient;
pub use nominatim::NominatimGeocoder;
