use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

/// A relay endpoint the client can call
///
/// Each request type lives next to the handler that serves it, so the two
///  sides share one definition of the JSON body.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Append path segments to the relay base URL, percent-encoding each one
pub(crate) fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::BaseUrl(base_url.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            endpoint(&base, &["pubkey", "alice"]).unwrap().as_str(),
            "http://localhost:8000/pubkey/alice"
        );

        let prefixed = Url::parse("https://relay.example.com/filedrop/").unwrap();
        assert_eq!(
            endpoint(&prefixed, &["list", "bob"]).unwrap().as_str(),
            "https://relay.example.com/filedrop/list/bob"
        );
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        let url = endpoint(&base, &["download", "a/b?c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/download/a%2Fb%3Fc");
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let base = Url::parse("mailto:relay@example.com").unwrap();
        assert!(matches!(
            endpoint(&base, &["list"]),
            Err(ApiError::BaseUrl(_))
        ));
    }
}
