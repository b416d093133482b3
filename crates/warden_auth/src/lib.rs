//! HTTP Basic authentication gate.
//!
//! A [`Realm`] names a protected area and says how credentials are checked:
//! a callback, an inline username/password, a credential file or a
//! directory server. [`AuthGate`] turns a request into an [`AuthOutcome`];
//! [`AuthBasic`] runs that decision as a middleware layer.

pub mod auth;
pub mod server;
pub mod services;

pub use auth::{
    challenge::{challenge, challenge_response, ResponseWriter},
    checkers::{Collaborators, FileAuthenticator, FileOpener, HashChecker},
    credentials::Credentials,
    directory::{DirectoryAuthenticator, DirectoryConnector, DirectoryParams},
    gate::{AuthGate, AuthOutcome},
    passwd_file::PasswdFile,
    realm::{CredentialMap, Realm, RealmConfig, Strategy},
};
pub use server::middleware_stack::{AuthBasic, MiddlewareLayer, MiddlewareStack, RequestContext};
pub use services::password_hasher::{create_password_hash, verify_password_hash, HashAlgorithm};
pub use warden_error::{Result, WardenError};

/// Installs the default log subscriber.
pub fn init_tracing() {
    warden_tracing::init();
}
