pub mod http_client_factory;
pub mod persistence;
pub mod weather;

pub use http_client_factory::HttpClientFactory;
pub use weather::{NasaPowerClient, NominatimGeocoder};
