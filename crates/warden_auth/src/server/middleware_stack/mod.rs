mod middlewares;
use crate::server::http_message_types::{HttpRequest, HttpResponse};
use either::Either;
pub use middlewares::*;
use std::{future::Future, sync::Arc};
use tracing::info;
use warden_error::Result;

/// Per-request state shared between layers.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
    /// Set by an auth layer once the client has been authenticated.
    pub authenticated_user: Option<String>,
}

/// An ordered set of layers run in front of an application handler.
#[derive(Default)]
pub struct MiddlewareStack {
    layers: Vec<Arc<dyn MiddlewareLayer>>,
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, layer: impl MiddlewareLayer) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    pub async fn initialize(&self) -> Result<()> {
        for layer in &self.layers {
            layer.initialize().await?;
        }
        info!("Initialized {} middleware layers", self.layers.len());
        Ok(())
    }

    /// Runs `before` hooks in order. The first layer to answer short-circuits
    /// the rest and the handler; otherwise the handler runs. `after` hooks of
    /// the layers that were entered run in reverse.
    pub async fn call<F, Fut>(&self, req: HttpRequest, handler: F) -> Result<HttpResponse>
    where
        F: FnOnce(HttpRequest, RequestContext) -> Fut,
        Fut: Future<Output = HttpResponse>,
    {
        let mut context = RequestContext::default();
        let mut pending = Either::Left(req);
        let mut entered = 0;

        for layer in &self.layers {
            if pending.is_right() {
                break;
            }
            entered += 1;
            pending = match pending {
                Either::Left(req) => layer.before(req, &mut context).await?,
                Either::Right(res) => Either::Right(res),
            };
        }

        let mut response = match pending {
            Either::Left(req) => handler(req, context.clone()).await,
            Either::Right(res) => res,
        };

        for layer in self.layers[..entered].iter().rev() {
            response = layer.after(response, &mut context).await;
        }
        Ok(response)
    }
}
