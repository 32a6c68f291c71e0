use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Account seeded into a fresh registry file.
pub const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_NAME: &str = "Administrador";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("user {0:?} already exists")]
    DuplicateUser(String),

    #[error("user registry {} is not accessible: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user registry {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One account. Older files use the keys `senha` / `nome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "senha")]
    pub password: String,
    #[serde(alias = "nome")]
    pub name: String,
}

/// Accounts in file order.
pub type Users = Vec<(String, UserRecord)>;

/// The registry file as written on disk. Entries keep their order and any
/// keys this program does not know about.
type Document = Map<String, Value>;

/// JSON-file-backed username → account map.
///
/// Every operation re-reads the file; `register` is read-then-write with no
/// locking, so concurrent writers can lose updates (last writer wins).
#[derive(Debug, Clone)]
pub struct UserRegistry {
    path: PathBuf,
}

impl UserRegistry {
    /// Open the registry at `path`, creating it with the default admin
    /// account if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let registry = Self::at(path);
        if !registry.path.exists() {
            log::info!("creating user registry at {}", registry.path.display());
            let mut doc = Document::new();
            registry.insert(
                &mut doc,
                DEFAULT_ADMIN_USER,
                UserRecord {
                    password: DEFAULT_ADMIN_PASSWORD.to_string(),
                    name: DEFAULT_ADMIN_NAME.to_string(),
                },
            )?;
            registry.save(&doc)?;
        }
        Ok(registry)
    }

    /// Point at `path` without touching the filesystem.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every account from disk, in the order they appear in the file.
    pub fn users(&self) -> Result<Users, RegistryError> {
        self.read_document()?
            .into_iter()
            .map(|(username, value)| {
                serde_json::from_value(value)
                    .map(|record| (username, record))
                    .map_err(|source| self.malformed(source))
            })
            .collect()
    }

    /// `true` only if `username` exists and `password` matches. An unreadable
    /// registry rejects every login.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users() {
            Ok(users) => users
                .iter()
                .any(|(name, record)| name == username && record.password == password),
            Err(e) => {
                log::error!("{e}");
                false
            }
        }
    }

    /// Add a new account after the existing ones. Existing entries are
    /// written back untouched.
    pub fn register(&self, username: &str, password: &str, name: &str) -> Result<(), RegistryError> {
        let mut doc = self.read_document()?;
        if doc.contains_key(username) {
            return Err(RegistryError::DuplicateUser(username.to_string()));
        }
        self.insert(
            &mut doc,
            username,
            UserRecord {
                password: password.to_string(),
                name: name.to_string(),
            },
        )?;
        self.save(&doc)?;
        log::info!("registered user {username:?}");
        Ok(())
    }

    fn insert(&self, doc: &mut Document, username: &str, record: UserRecord) -> Result<(), RegistryError> {
        let value = serde_json::to_value(record).map_err(|source| self.malformed(source))?;
        doc.insert(username.to_string(), value);
        Ok(())
    }

    fn read_document(&self) -> Result<Document, RegistryError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        serde_json::from_str(&text).map_err(|source| self.malformed(source))
    }

    fn save(&self, doc: &Document) -> Result<(), RegistryError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser).map_err(|source| self.malformed(source))?;
        std::fs::write(&self.path, buf).map_err(|source| self.io(source))
    }

    fn io(&self, source: std::io::Error) -> RegistryError {
        RegistryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn malformed(&self, source: serde_json::Error) -> RegistryError {
        RegistryError::Malformed {
            path: self.path.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Registration form
// ---------------------------------------------------------------------------

/// Fields of the admin "new user" form.
#[derive(Debug, Clone, Default)]
pub struct NewUserForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

impl NewUserForm {
    /// Check the form before touching the registry.
    pub fn validate(&self) -> Result<(), &'static str> {
        let fields = [&self.username, &self.password, &self.confirm_password, &self.name];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("Please fill in every field.");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.");
        }
        Ok(())
    }

    /// Validate and register, returning the message to show.
    pub fn submit(&mut self, registry: &UserRegistry) -> Result<String, String> {
        self.validate().map_err(str::to_string)?;
        registry
            .register(self.username.trim(), &self.password, self.name.trim())
            .map_err(|e| e.to_string())?;
        let msg = format!("User {:?} registered.", self.username.trim());
        *self = Self::default();
        Ok(msg)
    }
}
