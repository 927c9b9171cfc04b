//! Entity trait shared by every reference record the API serves

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Base trait for reference entities (tours, clients, cities).
///
/// Reference entities are read-only from the booking form's point of view:
/// they are listed in full (`GET /{resource_name}/all`), cached by the form,
/// and looked up by id.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The plural resource name used in URLs (e.g., "tours", "cities")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "tour", "city")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Human-readable name, used for ordering listings
    fn name(&self) -> &str;
}

/// Find an entity by id in a slice
pub fn find_by_id<T: Entity>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Widget {
        id: Uuid,
        name: String,
    }

    impl Entity for Widget {
        fn resource_name() -> &'static str {
            "widgets"
        }

        fn resource_name_singular() -> &'static str {
            "widget"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_find_by_id() {
        let a = Widget {
            id: Uuid::new_v4(),
            name: "a".into(),
        };
        let b = Widget {
            id: Uuid::new_v4(),
            name: "b".into(),
        };
        let items = vec![a.clone(), b.clone()];

        assert_eq!(find_by_id(&items, b.id).map(|w| w.name()), Some("b"));
        assert!(find_by_id(&items, Uuid::new_v4()).is_none());
    }
}
