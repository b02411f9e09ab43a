use std::collections::HashMap;

use tracing::error;

const EMBEDDED_LOCALE: &str = include_str!("../../../static/locale_en.json");

/// Fixed-key display strings. Lookup falls back to the key itself, so a
/// missing entry degrades to something visible instead of failing the build.
#[derive(Debug, Clone, Default)]
pub struct Locale {
    strings: HashMap<String, String>,
}

impl Locale {
    pub fn embedded() -> Self {
        match serde_json::from_str::<HashMap<String, String>>(EMBEDDED_LOCALE) {
            Ok(strings) => Locale { strings },
            Err(err) => {
                error!(%err, "embedded locale table failed to parse");
                Locale::default()
            }
        }
    }

    pub fn text(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve a tip key to display text; an empty key means no tip at all.
    pub fn tip(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            None
        } else {
            Some(self.text(key))
        }
    }
}
