//! Session management using Key-Value store.

use crate::{cache_key, Cache, CacheError};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Envelope stored under a session key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session data.
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// When this namespace was first written for the session.
    pub created_at: DateTime<Utc>,
    /// When this namespace was last written.
    pub last_accessed: DateTime<Utc>,
}

/// One namespace of per-session state, e.g. the shopping cart.
///
/// Each namespace is stored under its own key, `session:{id}:{namespace}`, so
/// unrelated session values never overwrite each other.
///
/// # Example
///
/// ```rust
/// use storefront_cache::{Cache, Session, SessionId};
///
/// let session = Session::<u32>::new(Cache::in_memory(), "visits");
/// let id = SessionId::from("abc123");
///
/// assert_eq!(session.get_or_create(&id).unwrap(), 0);
/// session.set(&id, &3).unwrap();
/// assert_eq!(session.get(&id).unwrap(), Some(3));
/// ```
pub struct Session<T> {
    cache: Cache,
    namespace: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a session manager for `namespace` on top of `cache`.
    pub fn new(cache: Cache, namespace: impl Into<String>) -> Self {
        Self {
            cache,
            namespace: namespace.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// The namespace this manager reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get session data, or create a new entry if it doesn't exist.
    pub fn get_or_create(&self, id: &SessionId) -> Result<T, CacheError> {
        match self.get(id)? {
            Some(data) => Ok(data),
            None => {
                let data = T::default();
                self.set(id, &data)?;
                Ok(data)
            }
        }
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Get the full envelope including version and timestamps.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Write session data, bumping the version.
    #[tracing::instrument(level = "debug", skip(self, data), fields(namespace = %self.namespace))]
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let key = self.session_key(id);
        let now = Utc::now();
        let previous = self.cache.get::<SessionData<serde_json::Value>>(&key)?;
        let (version, created_at) = match previous {
            Some(prev) => (prev.version + 1, prev.created_at),
            None => (1, now),
        };

        let envelope = SessionData {
            id: id.clone(),
            data,
            version,
            created_at,
            last_accessed: now,
        };
        self.cache.set(&key, &envelope)?;
        tracing::debug!(version, "session written");
        Ok(())
    }

    /// Delete this namespace for the session.
    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.session_key(id))
    }

    /// Check if the session has a value in this namespace.
    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&self.session_key(id))
    }

    fn session_key(&self, id: &SessionId) -> String {
        cache_key!("session", id, self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_session() -> Session<u32> {
        Session::new(Cache::in_memory(), "counter")
    }

    #[test]
    fn test_session_id_new() {
        let id = SessionId::new("abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_session_id_from_str() {
        let id = SessionId::from("test-session");
        assert_eq!(id.as_str(), "test-session");
        assert_eq!(format!("{}", id), "test-session");
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();

        assert!(s.starts_with("sess_"));
        // 18 bytes base64 = 24 chars, plus "sess_"
        assert_eq!(s.len(), 29);
    }

    #[test]
    fn test_session_id_generate_uniqueness() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new("serialize-me");
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, r#""serialize-me""#);

        let deserialized: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_get_or_create_writes_default() {
        let session = counter_session();
        let id = SessionId::new("s1");

        assert!(!session.exists(&id).unwrap());
        assert_eq!(session.get_or_create(&id).unwrap(), 0);
        assert!(session.exists(&id).unwrap());
    }

    #[test]
    fn test_set_bumps_version_and_keeps_created_at() {
        let session = counter_session();
        let id = SessionId::new("s1");

        session.set(&id, &1).unwrap();
        let first = session.get_versioned(&id).unwrap().unwrap();
        session.set(&id, &2).unwrap();
        let second = session.get_versioned(&id).unwrap().unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.data, 2);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.last_accessed >= first.last_accessed);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let cache = Cache::in_memory();
        let cart = Session::<u32>::new(cache.clone(), "cart");
        let wishlist = Session::<u32>::new(cache.clone(), "wishlist");
        let id = SessionId::new("s1");

        cart.set(&id, &5).unwrap();

        assert_eq!(wishlist.get(&id).unwrap(), None);
        assert_eq!(cache.keys().unwrap(), vec!["session:s1:cart".to_string()]);
    }

    #[test]
    fn test_delete() {
        let session = counter_session();
        let id = SessionId::new("s1");
        session.set(&id, &9).unwrap();

        session.delete(&id).unwrap();

        assert_eq!(session.get(&id).unwrap(), None);
    }
}
