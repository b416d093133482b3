use derive_more::Debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf, sync::Arc};
use warden_error::{Result, WardenError};

use super::directory::DirectoryParams;

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const PATH: &str = "path";
pub const HOST: &str = "host";
pub const BASE_DN: &str = "basedn";
pub const BIND_DN: &str = "binddn";
pub const BIND_PASSWORD: &str = "bindpw";
pub const FILTER: &str = "filter";

/// Verification callback. Receives the username and password split from
/// the client's credentials (both possibly empty).
pub type AuthCallback = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// String-keyed realm options, e.g. `{"username": "alice", "password": "..."}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialMap(BTreeMap<String, String>);

// Values may be secrets, so only the keys are shown.
impl std::fmt::Debug for CredentialMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl CredentialMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CredentialMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub enum RealmConfig {
    Callback(#[debug(skip)] AuthCallback),
    CredentialMap(CredentialMap),
}

impl RealmConfig {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        RealmConfig::Callback(Arc::new(f))
    }
}

impl From<CredentialMap> for RealmConfig {
    fn from(map: CredentialMap) -> Self {
        RealmConfig::CredentialMap(map)
    }
}

/// A protected realm: the display name shown in the challenge, plus how to
/// verify credentials for it.
#[derive(Debug, Clone)]
pub struct Realm {
    pub name: String,
    pub config: RealmConfig,
}

impl Realm {
    pub fn new(name: impl Into<String>, config: impl Into<RealmConfig>) -> Self {
        Realm {
            name: name.into(),
            config: config.into(),
        }
    }

    /// Builds a map-configured realm from a JSON object of string values.
    pub fn from_json(name: impl Into<String>, value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(WardenError::InvalidInput(
                "realm configuration must be an object".to_owned(),
            ));
        }
        let map: CredentialMap = serde_json::from_value(value)?;
        Ok(Realm::new(name, map))
    }
}

/// Options handed to a file-backed credential store: the file path plus
/// any keys the realm carried that the resolver does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParams {
    pub path: PathBuf,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub enum Strategy {
    Callback(#[debug(skip)] AuthCallback),
    InlineCredentials {
        username: String,
        #[debug(skip)]
        password: String,
    },
    FileLookup(FileParams),
    DirectoryLookup(DirectoryParams),
    Unconfigured,
}

impl Strategy {
    /// Picks a verification strategy. The order of the checks matters: a
    /// callback beats everything, then an inline username/password pair,
    /// then a credential file, then a directory host.
    pub fn resolve(config: &RealmConfig) -> Self {
        let map = match config {
            RealmConfig::Callback(callback) => return Strategy::Callback(callback.clone()),
            RealmConfig::CredentialMap(map) => map,
        };

        if let (Some(username), Some(password)) =
            (map.non_empty(USERNAME), map.non_empty(PASSWORD))
        {
            return Strategy::InlineCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            };
        }

        if let Some(path) = map.get(PATH) {
            let options = map
                .iter()
                .filter(|(key, _)| *key != PATH)
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Strategy::FileLookup(FileParams {
                path: PathBuf::from(path),
                options,
            });
        }

        if let Some(host) = map.get(HOST) {
            return Strategy::DirectoryLookup(DirectoryParams {
                host: host.to_owned(),
                base_dn: map.get(BASE_DN).unwrap_or_default().to_owned(),
                bind_dn: map.non_empty(BIND_DN).map(str::to_owned),
                bind_password: map.non_empty(BIND_PASSWORD).map(str::to_owned),
                filter: map.non_empty(FILTER).map(str::to_owned),
            });
        }

        Strategy::Unconfigured
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Strategy::Unconfigured)
    }

    /// The literal `username:password` a client may send to match this
    /// strategy verbatim. Only inline credentials have one.
    pub fn literal(&self) -> Option<String> {
        match self {
            Strategy::InlineCredentials { username, password } => {
                Some(format!("{}:{}", username, password))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Callback(_) => "callback",
            Strategy::InlineCredentials { .. } => "inline",
            Strategy::FileLookup(_) => "file",
            Strategy::DirectoryLookup(_) => "directory",
            Strategy::Unconfigured => "unconfigured",
        }
    }
}
