//! Value types exchanged with the client: requests, responses, headers and
//! entities, plus the error type every operation reports.
//!
//! - [`Request`]: immutable, built once through [`RequestBuilder`]
//! - [`Response`]: filled in by the execution layer, then handed to decoders
//! - [`Headers`]: ordered, case-insensitive multimap used by both
//! - [`Entity`]: body content with derived length and content type
//! - [`HttpClientError`]: the one error type of the crate

mod entity;
pub use entity::Entity;

mod error;
pub use error::HttpClientError;

mod headers;
pub use headers::Headers;
pub use headers::VALUE_SEPARATOR;

mod message;
pub use message::HttpMessage;

mod request;
pub use request::Request;
pub use request::RequestBuilder;

mod response;
pub use response::Response;
