//! Thin adapters around the external verification primitives.
//!
//! Every checker returns a plain `bool`: collaborator errors are logged and
//! turned into a denial here, so nothing fallible reaches the gate.

use derive_more::Debug;
use std::sync::Arc;
use tracing::{debug, warn};
use warden_error::{Result, WardenError};

use super::{
    credentials::Credentials,
    directory::{DirectoryConnector, DirectoryParams, SharedConnector, Unavailable},
    passwd_file::PasswdFile,
    realm::FileParams,
};
use crate::services::password_hasher::PasswordHasher;

/// Compares a plaintext password with a configured value, which may be
/// plaintext or a recognised hash encoding.
pub trait HashChecker: Send + Sync {
    fn verify(&self, password: &str, configured: &str) -> bool;
}

/// A credential store loaded from a file.
pub trait FileAuthenticator: Send {
    fn authenticate(&self, username: &str, password: &str) -> Result<bool>;
}

/// Loads a [`FileAuthenticator`] for a realm's file parameters. Called once
/// per verification attempt so edits to the file apply immediately.
pub trait FileOpener: Send + Sync {
    fn open(&self, params: &FileParams) -> Result<Box<dyn FileAuthenticator>>;
}

impl<F> FileOpener for F
where
    F: Fn(&FileParams) -> Result<Box<dyn FileAuthenticator>> + Send + Sync,
{
    fn open(&self, params: &FileParams) -> Result<Box<dyn FileAuthenticator>> {
        self(params)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PasswdFileOpener;

impl FileOpener for PasswdFileOpener {
    fn open(&self, params: &FileParams) -> Result<Box<dyn FileAuthenticator>> {
        Ok(Box::new(PasswdFile::open(params)?))
    }
}

/// The external primitives a gate verifies against.
#[derive(Debug, Clone)]
pub struct Collaborators {
    #[debug(skip)]
    pub hasher: Arc<dyn HashChecker>,
    #[debug(skip)]
    pub files: Arc<dyn FileOpener>,
    #[debug(skip)]
    pub directory: SharedConnector,
}

impl Default for Collaborators {
    fn default() -> Self {
        Collaborators {
            hasher: Arc::new(PasswordHasher),
            files: Arc::new(PasswdFileOpener),
            directory: Arc::new(Unavailable),
        }
    }
}

impl Collaborators {
    pub fn with_hasher(mut self, hasher: impl HashChecker + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    pub fn with_files(mut self, files: impl FileOpener + 'static) -> Self {
        self.files = Arc::new(files);
        self
    }

    pub fn with_directory(mut self, directory: impl DirectoryConnector + 'static) -> Self {
        self.directory = Arc::new(directory);
        self
    }
}

pub struct PasswordChecker<'a> {
    pub hasher: &'a dyn HashChecker,
    pub username: &'a str,
    pub password: &'a str,
}

impl PasswordChecker<'_> {
    pub fn check(&self, credentials: &Credentials) -> bool {
        credentials.username == self.username
            && self.hasher.verify(&credentials.password, self.password)
    }
}

pub struct FileChecker<'a> {
    pub files: &'a dyn FileOpener,
    pub params: &'a FileParams,
}

impl FileChecker<'_> {
    pub fn check(&self, credentials: &Credentials) -> bool {
        let result = self
            .files
            .open(self.params)
            .and_then(|store| store.authenticate(&credentials.username, &credentials.password));
        deny_on_error(result, "file")
    }
}

pub struct DirectoryChecker<'a> {
    pub directory: &'a dyn DirectoryConnector,
    pub params: &'a DirectoryParams,
}

impl DirectoryChecker<'_> {
    pub fn check(&self, credentials: &Credentials) -> bool {
        // Some servers treat a bind with an empty password as an anonymous
        // bind and report success.
        if credentials.password.is_empty() {
            debug!(
                target: "auth::checkers",
                "Refusing directory lookup for {} without a password", credentials.username
            );
            return false;
        }
        let result = self
            .directory
            .connect(self.params)
            .and_then(|mut client| client.authenticate(&credentials.username, &credentials.password))
            .map_err(WardenError::from);
        deny_on_error(result, "directory")
    }
}

fn deny_on_error(result: Result<bool>, checker: &str) -> bool {
    result.unwrap_or_else(|err| {
        warn!(target: "auth::checkers", "{} verification failed: {}", checker, err);
        false
    })
}
