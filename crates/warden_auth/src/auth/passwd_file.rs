use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, warn};
use warden_error::{Result, WardenError};

use super::{checkers::FileAuthenticator, realm::FileParams};
use crate::services::password_hasher::verify_password_hash;

pub const ALLOW_EMPTY_PASSWORD: &str = "allow_empty_password";

/// An htpasswd-style credential file: `username:password[:ignored...]` per
/// line, the password in plaintext or any format the password hasher
/// recognises.
#[derive(Clone, Default)]
pub struct PasswdFile {
    entries: HashMap<String, String>,
    allow_empty_password: bool,
}

impl std::fmt::Debug for PasswdFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswdFile")
            .field("entries", &self.entries.len())
            .field("allow_empty_password", &self.allow_empty_password)
            .finish()
    }
}

impl PasswdFile {
    pub fn open(params: &FileParams) -> Result<Self> {
        let contents = fs::read_to_string(&params.path).map_err(|err| {
            WardenError::CredentialStore(format!("{}: {}", params.path.display(), err))
        })?;
        let allow_empty_password = match params.options.get(ALLOW_EMPTY_PASSWORD) {
            None => false,
            Some(flag) => parse_flag(flag)?,
        };
        let file = Self::parse(&contents).allow_empty_password(allow_empty_password);
        debug!(
            target: "auth::passwd_file",
            "Loaded {} entries from {}",
            file.entries.len(),
            params.path.display()
        );
        Ok(file)
    }

    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(&FileParams {
            path: path.as_ref().to_path_buf(),
            options: Default::default(),
        })
    }

    /// Malformed lines (no colon, or an empty username) are logged and
    /// skipped. The remaining records stay usable.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let mut fields = line.splitn(3, ':');
            let username = fields.next().unwrap_or("");
            let Some(password) = fields.next() else {
                warn!(
                    target: "auth::passwd_file",
                    "Skipping line {}: expected username:password",
                    index + 1
                );
                continue;
            };
            if username.is_empty() {
                warn!(
                    target: "auth::passwd_file",
                    "Skipping line {}: empty username",
                    index + 1
                );
                continue;
            }
            entries
                .entry(username.to_owned())
                .or_insert_with(|| password.to_owned());
        }
        PasswdFile {
            entries,
            allow_empty_password: false,
        }
    }

    pub fn allow_empty_password(mut self, allow: bool) -> Self {
        self.allow_empty_password = allow;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FileAuthenticator for PasswdFile {
    fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Some(stored) = self.entries.get(username) else {
            return Ok(false);
        };
        if stored.is_empty() || password.is_empty() {
            return Ok(self.allow_empty_password && stored.is_empty() && password.is_empty());
        }
        verify_password_hash(password, stored)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(WardenError::ArgumentError(format!(
            "invalid boolean option {:?}",
            other
        ))),
    }
}
