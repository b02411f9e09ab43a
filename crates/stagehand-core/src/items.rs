use std::collections::HashMap;

use tracing::error;

const EMBEDDED_ITEM_INDEX: &str = include_str!("../../../static/item_index.json");

/// Drop-item identifier → display name. Unknown identifiers fall back to
/// the raw id so hint text stays renderable against a stale index.
#[derive(Debug, Clone, Default)]
pub struct ItemRepository {
    names: HashMap<String, String>,
}

impl ItemRepository {
    pub fn embedded() -> Self {
        match serde_json::from_str::<HashMap<String, String>>(EMBEDDED_ITEM_INDEX) {
            Ok(names) => ItemRepository { names },
            Err(err) => {
                error!(%err, "embedded item index failed to parse");
                ItemRepository::default()
            }
        }
    }

    pub fn item_name(&self, id: &str) -> String {
        self.names.get(id).cloned().unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_items_resolve_to_display_names() {
        let items = ItemRepository::embedded();
        assert_eq!(items.item_name("4001"), "LMD");
    }

    #[test]
    fn unknown_items_fall_back_to_the_raw_id() {
        let items = ItemRepository::embedded();
        assert_eq!(items.item_name("99999"), "99999");
    }
}
