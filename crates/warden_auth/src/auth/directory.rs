//! Directory (LDAP / Active Directory) seam.
//!
//! No protocol client ships with this crate. Deployments plug one in through
//! [`DirectoryConnector`]; without one every directory realm denies access.

use derive_more::Debug;
use std::sync::Arc;

pub const DEFAULT_FILTER: &str = "(uid=%s)";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryParams {
    pub host: String,
    pub base_dn: String,
    pub bind_dn: Option<String>,
    #[debug(skip)]
    pub bind_password: Option<String>,
    /// Search filter template; each `%s` is replaced by the escaped username.
    pub filter: Option<String>,
}

impl DirectoryParams {
    /// Active Directory style: search as a service account before binding as
    /// the user, rather than searching anonymously.
    pub fn is_authenticated_bind(&self) -> bool {
        self.bind_dn.is_some()
    }

    pub fn search_filter(&self, username: &str) -> String {
        self.filter
            .as_deref()
            .unwrap_or(DEFAULT_FILTER)
            .replace("%s", &escape_filter_value(username))
    }
}

/// RFC 4515 value escaping.
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// A bound directory client able to verify one user's password.
pub trait DirectoryAuthenticator: Send {
    fn authenticate(&mut self, username: &str, password: &str) -> anyhow::Result<bool>;
}

/// Opens a [`DirectoryAuthenticator`] for a realm's parameters. Called once
/// per verification attempt.
pub trait DirectoryConnector: Send + Sync {
    fn connect(&self, params: &DirectoryParams) -> anyhow::Result<Box<dyn DirectoryAuthenticator>>;
}

impl<F> DirectoryConnector for F
where
    F: Fn(&DirectoryParams) -> anyhow::Result<Box<dyn DirectoryAuthenticator>> + Send + Sync,
{
    fn connect(&self, params: &DirectoryParams) -> anyhow::Result<Box<dyn DirectoryAuthenticator>> {
        self(params)
    }
}

/// Connector used when no directory client has been wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl DirectoryConnector for Unavailable {
    fn connect(&self, params: &DirectoryParams) -> anyhow::Result<Box<dyn DirectoryAuthenticator>> {
        anyhow::bail!("no directory client configured for {}", params.host)
    }
}

pub type SharedConnector = Arc<dyn DirectoryConnector>;
