pub mod api_client;
pub mod sources;

pub use api_client::ApiClient;
pub use sources::{CollectionShape, HttpCollection};
