use std::sync::RwLock;

use anyhow::{Context, Result};
use keyring::Entry;

use super::session::UserData;

const SERVICE_NAME: &str = "tokengate";

const ACCESS_TOKEN_KEY: &str = "access-token";
const REFRESH_TOKEN_KEY: &str = "refresh-token";
const TEMPORARY_TOKEN_KEY: &str = "temporary-token";
const USER_KEY: &str = "user";

/// Everything a full login leaves behind.
///
/// The temporary token lives in its own slot (see [`CredentialStore`]):
/// it is only issued when a persistent access token was never granted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredCredentials {
    pub user: Option<UserData>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Reads and writes the persisted credential pair plus the temporary token.
///
/// Empty-string tokens normalize to absent on both read and write.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<StoredCredentials>;
    fn set(&self, user: Option<&UserData>, access_token: &str, refresh_token: &str)
        -> Result<()>;
    fn clear(&self) -> Result<()>;

    fn get_temporary(&self) -> Result<Option<String>>;
    fn set_temporary(&self, token: &str) -> Result<()>;
    fn clear_temporary(&self) -> Result<()>;
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Credential store backed by the OS keychain.
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom keychain service name (one store per application).
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(non_empty(&value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read credential from keychain"),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.delete(key);
        }
        self.entry(key)?
            .set_password(value)
            .context("Failed to store credential in keychain")
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<StoredCredentials> {
        let user = match self.read(USER_KEY)? {
            Some(json) => {
                Some(serde_json::from_str(&json).context("Failed to parse stored user")?)
            }
            None => None,
        };
        Ok(StoredCredentials {
            user,
            access_token: self.read(ACCESS_TOKEN_KEY)?,
            refresh_token: self.read(REFRESH_TOKEN_KEY)?,
        })
    }

    fn set(
        &self,
        user: Option<&UserData>,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()> {
        match user {
            Some(user) => {
                let json = serde_json::to_string(user)?;
                self.write(USER_KEY, &json)?;
            }
            None => self.delete(USER_KEY)?,
        }
        self.write(ACCESS_TOKEN_KEY, access_token)?;
        self.write(REFRESH_TOKEN_KEY, refresh_token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.delete(USER_KEY)?;
        self.delete(ACCESS_TOKEN_KEY)?;
        self.delete(REFRESH_TOKEN_KEY)?;
        Ok(())
    }

    fn get_temporary(&self) -> Result<Option<String>> {
        self.read(TEMPORARY_TOKEN_KEY)
    }

    fn set_temporary(&self, token: &str) -> Result<()> {
        self.write(TEMPORARY_TOKEN_KEY, token)
    }

    fn clear_temporary(&self) -> Result<()> {
        self.delete(TEMPORARY_TOKEN_KEY)
    }
}

/// In-process credential store for embedding and tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    credentials: StoredCredentials,
    temporary: Option<String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> Result<T> {
        let guard = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        Ok(f(&guard))
    }

    fn write_state(&self, f: impl FnOnce(&mut MemoryState)) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        f(&mut guard);
        Ok(())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<StoredCredentials> {
        self.read_state(|state| state.credentials.clone())
    }

    fn set(
        &self,
        user: Option<&UserData>,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()> {
        self.write_state(|state| {
            state.credentials = StoredCredentials {
                user: user.cloned(),
                access_token: non_empty(access_token),
                refresh_token: non_empty(refresh_token),
            };
        })
    }

    fn clear(&self) -> Result<()> {
        self.write_state(|state| state.credentials = StoredCredentials::default())
    }

    fn get_temporary(&self) -> Result<Option<String>> {
        self.read_state(|state| state.temporary.clone())
    }

    fn set_temporary(&self, token: &str) -> Result<()> {
        self.write_state(|state| state.temporary = non_empty(token))
    }

    fn clear_temporary(&self) -> Result<()> {
        self.write_state(|state| state.temporary = None)
    }
}
