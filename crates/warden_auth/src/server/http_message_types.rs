use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};
use std::convert::Infallible;

use crate::auth::credentials;

pub type HttpBody = BoxBody<Bytes, Infallible>;
pub type HttpRequest = Request<HttpBody>;
pub type HttpResponse = Response<HttpBody>;

pub fn full_body(bytes: impl Into<Bytes>) -> HttpBody {
    Full::new(bytes.into()).boxed()
}

pub fn empty_body() -> HttpBody {
    Empty::new().boxed()
}

pub trait RequestExt {
    /// The decoded `user:pass` Basic credential string, if the client sent one.
    fn basic_credentials(&self) -> Option<String>;
}

impl<B> RequestExt for Request<B> {
    fn basic_credentials(&self) -> Option<String> {
        credentials::raw_credentials(self.headers(), self.uri())
    }
}
