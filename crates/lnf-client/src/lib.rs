pub mod client;
pub mod error;
mod found_items;
mod locations;
mod lost_items;
pub mod media;
pub mod payload;
pub mod tokens;

pub use client::ApiClient;
pub use error::{RequestFailure, UNEXPECTED_NETWORK_ERROR};
pub use media::media_url;
pub use payload::{ApiPayload, FilePart, FormPayload, LocationFields, RequestBody, RequestOptions};
pub use tokens::{
    FileTokenStore, ManagementTokens, MemoryTokenStore, TokenSource, TokenStore, TokenStoreError,
};
