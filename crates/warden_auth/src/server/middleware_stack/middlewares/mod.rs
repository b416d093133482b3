mod auth_basic;

use async_trait::async_trait;
pub use auth_basic::AuthBasic;
use either::Either;
use warden_error::Result;

use super::RequestContext;
use crate::server::http_message_types::{HttpRequest, HttpResponse};

#[async_trait]
pub trait MiddlewareLayer: Send + Sync + 'static {
    /// Called just once, to initialize the middleware state.
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }
    /// The "before" hook. By default, it passes through the request.
    async fn before(
        &self,
        req: HttpRequest,
        _context: &mut RequestContext,
    ) -> Result<Either<HttpRequest, HttpResponse>> {
        Ok(Either::Left(req))
    }

    /// The "after" hook. By default, it passes through the response.
    async fn after(&self, resp: HttpResponse, _context: &mut RequestContext) -> HttpResponse {
        resp
    }
}
