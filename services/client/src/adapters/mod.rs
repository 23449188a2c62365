pub mod fixture;
pub mod http;
pub mod wire;

pub use fixture::StaticCatalog;
pub use http::HttpBackend;
