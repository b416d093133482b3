use http::Request;
use tracing::debug;

use super::{
    challenge::challenge,
    checkers::{Collaborators, DirectoryChecker, FileChecker, PasswordChecker},
    credentials::Credentials,
    realm::{Realm, Strategy},
};
use crate::server::http_message_types::{HttpResponse, RequestExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    /// Carries the realm name for the `WWW-Authenticate` challenge.
    Challenge(String),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

/// Decides whether a request's Basic credentials satisfy one realm.
///
/// The strategy is resolved once, when the gate is built. The gate holds no
/// per-request state, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct AuthGate {
    realm: String,
    strategy: Strategy,
    collaborators: Collaborators,
}

impl AuthGate {
    pub fn new(realm: Realm) -> Self {
        Self::with_collaborators(realm, Collaborators::default())
    }

    pub fn with_collaborators(realm: Realm, collaborators: Collaborators) -> Self {
        AuthGate {
            strategy: Strategy::resolve(&realm.config),
            realm: realm.name,
            collaborators,
        }
    }

    pub fn realm_name(&self) -> &str {
        &self.realm
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Verifies a decoded `user:pass` string. `None` and `""` both mean the
    /// client sent nothing.
    pub fn authenticate(&self, raw: Option<&str>) -> AuthOutcome {
        let raw = raw.unwrap_or("");

        if raw.is_empty() && !self.strategy.is_configured() {
            return self.deny("no credentials");
        }

        // Callbacks see every request, including ones without credentials.
        if let Strategy::Callback(callback) = &self.strategy {
            let credentials = Credentials::parse(raw);
            return if callback(&credentials.username, &credentials.password) {
                AuthOutcome::Authenticated
            } else {
                self.deny("callback rejected credentials")
            };
        }

        // Verbatim match against the configured pair. This also accepts a
        // client that sends a configured hash as its password.
        if self
            .strategy
            .literal()
            .is_some_and(|literal| literal == raw)
        {
            return AuthOutcome::Authenticated;
        }

        if raw.is_empty() {
            return self.deny("no credentials");
        }

        let credentials = Credentials::parse(raw);
        let verified = match &self.strategy {
            Strategy::InlineCredentials { username, password } => PasswordChecker {
                hasher: self.collaborators.hasher.as_ref(),
                username,
                password,
            }
            .check(&credentials),
            Strategy::FileLookup(params) => FileChecker {
                files: self.collaborators.files.as_ref(),
                params,
            }
            .check(&credentials),
            Strategy::DirectoryLookup(params) => DirectoryChecker {
                directory: self.collaborators.directory.as_ref(),
                params,
            }
            .check(&credentials),
            Strategy::Callback(_) | Strategy::Unconfigured => false,
        };

        if verified {
            AuthOutcome::Authenticated
        } else {
            debug!(
                target: "auth::gate",
                "Rejected {} for realm {:?} via {}",
                credentials.username,
                self.realm,
                self.strategy.name()
            );
            AuthOutcome::Challenge(self.realm.clone())
        }
    }

    pub fn authenticate_request<B>(&self, request: &Request<B>) -> AuthOutcome {
        self.authenticate(request.basic_credentials().as_deref())
    }

    /// Request-handler form: returns `true` when the caller may proceed,
    /// otherwise writes the challenge into `response` and returns `false`.
    pub fn guard<B>(&self, request: &Request<B>, response: &mut HttpResponse) -> bool {
        match self.authenticate_request(request) {
            AuthOutcome::Authenticated => true,
            AuthOutcome::Challenge(realm) => challenge(response, &realm),
        }
    }

    fn deny(&self, reason: &str) -> AuthOutcome {
        debug!(target: "auth::gate", "Challenging for realm {:?}: {}", self.realm, reason);
        AuthOutcome::Challenge(self.realm.clone())
    }
}
