use std::sync::Arc;

use chrono::{DateTime, Utc, Weekday};
use tracing::debug;

/// Time-boxed activity window attached to an event or resource stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageActivity {
    pub tip: Option<String>,
    /// Event series label shown in the daily hint summary line.
    pub stage_name: Option<String>,
    pub utc_start_time: Option<DateTime<Utc>>,
    pub utc_expire_time: Option<DateTime<Utc>>,
    /// Always-on bonus window shared by the weekly resource stages, as
    /// opposed to a timed event window.
    pub is_resource_collection: bool,
}

impl StageActivity {
    /// Default shared window for the weekly resource stages. Carries no
    /// start or expiry until the schedule document provides one.
    pub fn resource_collection() -> Self {
        StageActivity {
            is_resource_collection: true,
            ..StageActivity::default()
        }
    }

    /// A window with no expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.utc_expire_time {
            Some(expire) => now > expire,
            None => false,
        }
    }
}

/// One schedule entry: a selectable stage plus its availability metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageInfo {
    pub display: String,
    /// Stable identifier used for navigation. The hint-only entries carry
    /// no value at all; the navigation sentinel carries an empty one.
    pub value: Option<String>,
    /// Drop-item identifier, resolved to a display name when hints are built.
    pub drop: Option<String>,
    pub tip: Option<String>,
    /// Weekdays the stage opens on. Empty means open every day.
    pub open_days: Vec<Weekday>,
    /// Hidden entries are excluded from listings but still feed hint text.
    pub hidden: bool,
    pub activity: Option<Arc<StageActivity>>,
}

impl StageInfo {
    /// Permanent stage: label and value only, open every day.
    pub fn permanent(display: impl Into<String>, value: impl Into<String>) -> Self {
        StageInfo {
            display: display.into(),
            value: Some(value.into()),
            ..StageInfo::default()
        }
    }

    /// Weekly stage sharing an activity window (resource and chip stages).
    pub fn scheduled(
        value: &str,
        tip: Option<String>,
        open_days: &[Weekday],
        activity: Arc<StageActivity>,
    ) -> Self {
        StageInfo {
            display: value.to_string(),
            value: Some(value.to_string()),
            tip,
            open_days: open_days.to_vec(),
            activity: Some(activity),
            ..StageInfo::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn is_open(&self, day: Weekday) -> bool {
        self.open_days.is_empty() || self.open_days.contains(&day)
    }
}

/// Insertion-ordered stage table. Listing order and the first-match-wins
/// rules (single placeholder, single hint summary line) depend on build
/// order, so entries stay in a list and lookups are a linear scan; the
/// table never grows past a few dozen entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTable {
    entries: Vec<(String, StageInfo)>,
}

impl StageTable {
    pub fn new() -> Self {
        StageTable::default()
    }

    /// First write wins: a later entry under an existing key is dropped,
    /// never overwritten.
    pub fn insert(&mut self, key: impl Into<String>, info: StageInfo) {
        let key = key.into();
        if self.contains(&key) {
            debug!(key, "dropping duplicate stage entry");
            return;
        }
        self.entries.push((key, info));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    pub fn get(&self, key: &str) -> Option<&StageInfo> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, info)| info)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageInfo)> {
        self.entries.iter().map(|(key, info)| (key.as_str(), info))
    }

    /// Non-hidden entries open on `day`, in insertion order.
    pub fn open_stages(&self, day: Weekday) -> Vec<StageInfo> {
        self.entries
            .iter()
            .filter(|(_, info)| !info.hidden && info.is_open(day))
            .map(|(_, info)| info.clone())
            .collect()
    }

    /// All non-hidden entries, in insertion order.
    pub fn all_stages(&self) -> Vec<StageInfo> {
        self.entries
            .iter()
            .filter(|(_, info)| !info.hidden)
            .map(|(_, info)| info.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_day_set_is_open_every_day() {
        let stage = StageInfo::permanent("1-7", "1-7");
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert!(stage.is_open(day));
        }
    }

    #[test]
    fn day_set_restricts_openness() {
        let window = Arc::new(StageActivity::resource_collection());
        let stage = StageInfo::scheduled(
            "CE-6",
            None,
            &[Weekday::Tue, Weekday::Thu, Weekday::Sat, Weekday::Sun],
            window,
        );
        assert!(stage.is_open(Weekday::Thu));
        assert!(!stage.is_open(Weekday::Mon));
    }

    #[test]
    fn expiry_is_compared_against_now() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let past = StageActivity {
            utc_expire_time: Some(now - chrono::Duration::hours(1)),
            ..StageActivity::default()
        };
        let future = StageActivity {
            utc_expire_time: Some(now + chrono::Duration::hours(1)),
            ..StageActivity::default()
        };
        assert!(past.is_expired(now));
        assert!(!future.is_expired(now));
    }

    #[test]
    fn resource_window_without_expiry_never_expires() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let window = StageActivity::resource_collection();
        assert!(!window.is_expired(now));
    }

    #[test]
    fn duplicate_keys_keep_the_first_entry() {
        let mut table = StageTable::new();
        table.insert("CE-6", StageInfo::permanent("first", "CE-6"));
        table.insert("CE-6", StageInfo::permanent("second", "CE-6"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("CE-6").map(|info| info.display.as_str()), Some("first"));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut table = StageTable::new();
        table.insert("", StageInfo::permanent("default", ""));
        table.insert("1-7", StageInfo::permanent("1-7", "1-7"));
        table.insert("Annihilation", StageInfo::permanent("Annihilation", "Annihilation"));
        let keys: Vec<&str> = table.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["", "1-7", "Annihilation"]);
    }

    #[test]
    fn hidden_entries_are_excluded_from_listings() {
        let mut table = StageTable::new();
        table.insert("LS-6", StageInfo::permanent("LS-6", "LS-6"));
        table.insert("SK-5", StageInfo::permanent("SK-5", "SK-5").hidden());
        assert_eq!(table.open_stages(Weekday::Mon).len(), 1);
        assert_eq!(table.all_stages().len(), 1);
    }
}
