use std::collections::HashMap;

use super::CartStorage;
use crate::{Result, StorefrontError};

/// In-process storage with an optional byte quota, the way browser storage
/// refuses writes once its quota is spent.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    records: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_quota(bytes: usize) -> Self { Self { records: HashMap::new(), quota: Some(bytes) } }

    /// Pre-populates a record, bypassing the quota.
    pub fn with_record(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.records.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.records.get(key).map(String::as_str) }

    fn used_except(&self, key: &str) -> usize {
        self.records.iter().filter(|(k, _)| k.as_str() != key).map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> { Ok(self.records.get(key).cloned()) }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_except(key));
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StorefrontError::QuotaExceeded { needed, available });
            }
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("cart").unwrap(), None);
        storage.save("cart", "{}").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_quota_counts_replaced_record_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.save("k", "12345").unwrap();
        storage.save("k", "123456789").unwrap();
        match storage.save("k", "1234567890") {
            Err(StorefrontError::QuotaExceeded { needed, available }) => {
                assert_eq!(needed, 11);
                assert_eq!(available, 10);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        assert_eq!(storage.get("k"), Some("123456789"));
    }
}
