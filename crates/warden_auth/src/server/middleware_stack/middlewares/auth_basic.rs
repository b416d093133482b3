use async_trait::async_trait;
use either::Either;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error, info, warn};
use warden_error::Result;

use crate::{
    auth::{
        challenge::challenge_response,
        checkers::Collaborators,
        credentials::Credentials,
        gate::{AuthGate, AuthOutcome},
        realm::{Realm, Strategy},
    },
    server::{
        http_message_types::{HttpRequest, HttpResponse, RequestExt},
        middleware_stack::RequestContext,
    },
};

use super::MiddlewareLayer;

/// HTTP Basic authentication for one realm.
///
/// Verification may block on a credential file or directory server, so each
/// decision runs on the blocking pool rather than on the request's task.
#[derive(Debug, Clone)]
pub struct AuthBasic {
    gate: Arc<AuthGate>,
}

impl AuthBasic {
    pub fn new(realm: Realm) -> Self {
        Self::from_gate(AuthGate::new(realm))
    }

    pub fn with_collaborators(realm: Realm, collaborators: Collaborators) -> Self {
        Self::from_gate(AuthGate::with_collaborators(realm, collaborators))
    }

    pub fn from_gate(gate: AuthGate) -> Self {
        AuthBasic {
            gate: Arc::new(gate),
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}

#[async_trait]
impl MiddlewareLayer for AuthBasic {
    async fn initialize(&self) -> Result<()> {
        let strategy = self.gate.strategy();
        info!(
            target: "middleware::auth_basic",
            "Protecting realm {:?} with {} credentials",
            self.gate.realm_name(),
            strategy.name()
        );
        match strategy {
            Strategy::Unconfigured => warn!(
                target: "middleware::auth_basic",
                "Realm {:?} has no usable credentials configured; every request will be challenged",
                self.gate.realm_name()
            ),
            Strategy::FileLookup(params) if !params.path.is_file() => warn!(
                target: "middleware::auth_basic",
                "Credential file {} is not readable yet",
                params.path.display()
            ),
            _ => {}
        }
        Ok(())
    }

    async fn before(
        &self,
        req: HttpRequest,
        context: &mut RequestContext,
    ) -> Result<Either<HttpRequest, HttpResponse>> {
        let raw = req.basic_credentials();
        let gate = self.gate.clone();
        let supplied = raw.clone();
        let outcome = match task::spawn_blocking(move || gate.authenticate(supplied.as_deref())).await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(target: "middleware::auth_basic", "Authentication task failed: {}", err);
                AuthOutcome::Challenge(self.gate.realm_name().to_owned())
            }
        };

        match outcome {
            AuthOutcome::Authenticated => {
                let username = raw
                    .as_deref()
                    .map(Credentials::parse)
                    .map(|credentials| credentials.username)
                    .unwrap_or_default();
                debug!(target: "middleware::auth_basic", "Authenticated {:?}", username);
                context.authenticated_user = Some(username);
                Ok(Either::Left(req))
            }
            AuthOutcome::Challenge(realm) => Ok(Either::Right(challenge_response(&realm))),
        }
    }
}
