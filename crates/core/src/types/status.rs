//! Store status.

use serde::{Deserialize, Serialize};

/// Whether the store is accepting orders.
///
/// The default is `Closed`: an unreadable or missing status must never
/// open the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Open,
    #[default]
    Closed,
}

impl StoreStatus {
    /// Whether the store is open for orders.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for StoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid store status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&StoreStatus::Open).unwrap(), "\"open\"");
        assert_eq!(
            serde_json::from_str::<StoreStatus>("\"closed\"").unwrap(),
            StoreStatus::Closed
        );
    }

    #[test]
    fn test_default_is_closed() {
        assert_eq!(StoreStatus::default(), StoreStatus::Closed);
        assert!(!StoreStatus::default().is_open());
    }

    #[test]
    fn test_from_str_rejects_unknown_values() {
        assert!("maybe".parse::<StoreStatus>().is_err());
        assert_eq!("open".parse::<StoreStatus>().unwrap(), StoreStatus::Open);
    }
}
