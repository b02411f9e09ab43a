use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc, Weekday};
use tracing::info;

use crate::builder::build_stage_table;
use crate::gate::CoreVersionProvider;
use crate::items::ItemRepository;
use crate::locale::Locale;
use crate::provider::ScheduleProvider;
use crate::stage::{StageInfo, StageTable};

/// Owns the current stage table. Queries read whichever complete snapshot
/// is published; a refresh builds a whole new table first and then swaps
/// the reference in one step, so readers never observe a partial table.
pub struct StageManager {
    table: RwLock<Arc<StageTable>>,
    provider: ScheduleProvider,
    version: Box<dyn CoreVersionProvider + Send + Sync>,
    locale: Locale,
    items: ItemRepository,
    client_type: String,
}

impl StageManager {
    /// Builds the first snapshot synchronously from the local cache, so no
    /// query is ever served from an empty table. Hosts then call
    /// `refresh(true)` from a background task to pick up remote data.
    pub fn new(
        provider: ScheduleProvider,
        version: Box<dyn CoreVersionProvider + Send + Sync>,
        client_type: impl Into<String>,
    ) -> Self {
        let locale = Locale::embedded();
        let items = ItemRepository::embedded();
        let client_type = client_type.into();
        let doc = provider.load_cached();
        let table = build_stage_table(
            doc.as_ref(),
            &client_type,
            &version.core_version(),
            Utc::now(),
            &locale,
        );
        StageManager {
            table: RwLock::new(Arc::new(table)),
            provider,
            version,
            locale,
            items,
            client_type,
        }
    }

    /// Rebuild the table from fresh remote data (`use_remote`) or the local
    /// cache, then publish it. Failures degrade to fewer entries and are
    /// logged; nothing is surfaced to the caller.
    pub async fn refresh(&self, use_remote: bool) {
        let doc = if use_remote {
            self.provider.fetch().await
        } else {
            self.provider.load_cached()
        };
        let table = build_stage_table(
            doc.as_ref(),
            &self.client_type,
            &self.version.core_version(),
            Utc::now(),
            &self.locale,
        );
        info!(entries = table.len(), use_remote, "publishing stage table");
        let table = Arc::new(table);
        match self.table.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<StageTable> {
        match self.table.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lookup by key; unknown keys yield `None`, never a fault.
    pub fn stage_info(&self, stage: &str) -> Option<StageInfo> {
        self.snapshot().get(stage).cloned()
    }

    /// False for an unknown stage rather than an error.
    pub fn is_stage_open(&self, stage: &str, day: Weekday) -> bool {
        self.snapshot()
            .get(stage)
            .map(|info| info.is_open(day))
            .unwrap_or(false)
    }

    pub fn open_stages(&self, day: Weekday) -> Vec<StageInfo> {
        self.snapshot().open_stages(day)
    }

    pub fn all_stages(&self) -> Vec<StageInfo> {
        self.snapshot().all_stages()
    }

    pub fn stage_tips(&self, day: Weekday) -> String {
        build_stage_tips(&self.snapshot(), day, Utc::now(), &self.locale, &self.items)
    }
}

/// Aggregate the hint text for `day` in table order: at most one event
/// summary line per pass, then each open entry's tip and drop lines.
pub fn build_stage_tips(
    table: &StageTable,
    day: Weekday,
    now: DateTime<Utc>,
    locale: &Locale,
    items: &ItemRepository,
) -> String {
    let mut text = String::new();
    let mut side_story_pending = true;

    for (_, info) in table.iter() {
        if !info.is_open(day) {
            continue;
        }

        if side_story_pending {
            if let Some(stage_name) = info
                .activity
                .as_ref()
                .and_then(|activity| activity.stage_name.as_deref())
                .filter(|name| !name.is_empty())
            {
                let days_left = info
                    .activity
                    .as_ref()
                    .and_then(|activity| activity.utc_expire_time)
                    .map(|expire| (expire - now).num_days())
                    .unwrap_or(0);
                let remaining = if days_left > 0 {
                    days_left.to_string()
                } else {
                    locale.text("LessThanOneDay")
                };
                text.push_str(&format!(
                    "{} {}{}\n",
                    stage_name,
                    locale.text("Daysleftopen"),
                    remaining
                ));
                side_story_pending = false;
            }
        }

        if let Some(tip) = info.tip.as_deref().filter(|tip| !tip.is_empty()) {
            text.push_str(tip);
            text.push('\n');
        }

        if let Some(drop) = info.drop.as_deref().filter(|drop| !drop.is_empty()) {
            text.push_str(&format!("{}: {}\n", info.display, items.item_name(drop)));
        }
    }

    text
}
