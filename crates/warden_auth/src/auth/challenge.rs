use http::{
    header::{HeaderName, WWW_AUTHENTICATE},
    HeaderValue, Response, StatusCode,
};
use tracing::warn;

use crate::server::http_message_types::{empty_body, full_body, HttpBody, HttpResponse};

/// Marker stored in a response's extensions once it has been finalized.
/// Later pipeline stages must not write to a rendered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered;

/// The response operations the challenge needs.
pub trait ResponseWriter {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);
    fn set_status(&mut self, status: StatusCode);
    fn set_body(&mut self, body: HttpBody);
    /// Marks the response as rendered. Leaves status, headers and body as
    /// they are.
    fn finalize(&mut self);
    fn is_rendered(&self) -> bool;
}

impl ResponseWriter for HttpResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().insert(name, value);
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn set_body(&mut self, body: HttpBody) {
        *self.body_mut() = body;
    }

    fn finalize(&mut self) {
        self.extensions_mut().insert(Rendered);
    }

    fn is_rendered(&self) -> bool {
        self.extensions().get::<Rendered>().is_some()
    }
}

pub fn challenge_header(realm: &str) -> HeaderValue {
    // The realm goes in verbatim; a name that is not a valid header value
    // still gets a bare Basic challenge.
    HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm)).unwrap_or_else(|_| {
        warn!(target: "auth::challenge", "Realm name is not a valid header value");
        HeaderValue::from_static("Basic")
    })
}

/// Writes a Basic challenge for `realm` into `response` and seals it.
/// Always returns `false`: the request must not proceed.
pub fn challenge<W: ResponseWriter>(response: &mut W, realm: &str) -> bool {
    response.set_header(WWW_AUTHENTICATE, challenge_header(realm));
    response.set_status(StatusCode::UNAUTHORIZED);
    response.set_body(full_body("Unauthorized"));
    response.finalize();
    false
}

pub fn challenge_response(realm: &str) -> HttpResponse {
    let mut response = Response::new(empty_body());
    challenge(&mut response, realm);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn challenge_sets_header_status_and_seals() {
        let response = challenge_response("Admin Area");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Admin Area\""
        );
        assert!(response.is_rendered());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Unauthorized");
    }

    #[test]
    fn challenge_stops_processing() {
        let mut response = Response::new(empty_body());
        assert!(!response.is_rendered());
        assert!(!challenge(&mut response, "x"));
        assert!(response.is_rendered());
    }

    #[tokio::test]
    async fn finalize_only_seals() {
        let mut response = Response::new(full_body("hello"));
        response.set_status(StatusCode::UNAUTHORIZED);
        response.finalize();
        assert!(response.is_rendered());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[test]
    fn invalid_realm_falls_back_to_bare_scheme() {
        let response = challenge_response("bad\nrealm");
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Basic");
    }
}
