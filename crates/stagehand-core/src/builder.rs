use std::sync::Arc;

use chrono::{DateTime, Utc, Weekday};
use tracing::error;

use crate::gate::parse_version;
use crate::locale::Locale;
use crate::schedule::{RegionSchedule, ScheduleDoc, ScheduleError, SideStoryRecord, decode_utc};
use crate::stage::{StageActivity, StageInfo, StageTable};

/// Region whose schedule section is shared by the default and Bilibili
/// clients.
const OFFICIAL_CLIENT: &str = "Official";

/// Weekly openings for the permanent resource and chip stages.
const CE_6_DAYS: [Weekday; 4] = [Weekday::Tue, Weekday::Thu, Weekday::Sat, Weekday::Sun];
const AP_5_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Thu, Weekday::Sat, Weekday::Sun];
const CA_5_DAYS: [Weekday; 4] = [Weekday::Tue, Weekday::Wed, Weekday::Fri, Weekday::Sun];
const SK_5_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Sat];
const PR_A_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Thu, Weekday::Fri, Weekday::Sun];
const PR_B_DAYS: [Weekday; 4] = [Weekday::Mon, Weekday::Tue, Weekday::Fri, Weekday::Sat];
const PR_C_DAYS: [Weekday; 4] = [Weekday::Wed, Weekday::Thu, Weekday::Sat, Weekday::Sun];
const PR_D_DAYS: [Weekday; 4] = [Weekday::Tue, Weekday::Wed, Weekday::Sat, Weekday::Sun];

/// Build a fresh stage table from an optional schedule document and the
/// current version-gate input. Never fails: any document problem degrades
/// to the sentinel plus the static entries.
pub fn build_stage_table(
    doc: Option<&ScheduleDoc>,
    client_type: &str,
    core_version: &str,
    now: DateTime<Utc>,
    locale: &Locale,
) -> StageTable {
    let mut table = StageTable::new();

    // The empty-key entry must come first; current/last stage navigation
    // reuses it.
    table.insert(
        String::new(),
        StageInfo {
            display: locale.text("DefaultStage"),
            value: Some(String::new()),
            ..StageInfo::default()
        },
    );

    let client = normalize_client_type(client_type);

    let mut resource_collection = StageActivity::resource_collection();
    if let Some(region) = doc.and_then(|doc| doc.regions.get(client)) {
        if let Err(err) = apply_region(
            &mut table,
            region,
            &mut resource_collection,
            core_version,
            now,
            locale,
        ) {
            error!(%err, client, "schedule document interpretation failed, keeping static entries");
        }
    }

    append_static_stages(&mut table, &Arc::new(resource_collection), locale);
    table
}

/// The default and Bilibili clients run identical schedules.
fn normalize_client_type(client_type: &str) -> &str {
    if client_type.is_empty() || client_type == "Bilibili" {
        OFFICIAL_CLIENT
    } else {
        client_type
    }
}

fn apply_region(
    table: &mut StageTable,
    region: &RegionSchedule,
    resource_collection: &mut StageActivity,
    core_version: &str,
    now: DateTime<Utc>,
    locale: &Locale,
) -> Result<(), ScheduleError> {
    if let Some(record) = &region.resource_collection {
        // Populated field by field: a timestamp problem further down still
        // leaves the already-assigned fields on the shared window.
        resource_collection.tip = record.tip.clone();
        resource_collection.utc_start_time = Some(decode_utc(
            record.utc_start_time.as_deref(),
            "UtcStartTime",
            record.time_zone.as_deref(),
        )?);
        resource_collection.utc_expire_time = Some(decode_utc(
            record.utc_expire_time.as_deref(),
            "UtcExpireTime",
            record.time_zone.as_deref(),
        )?);
    }

    let gate = parse_version(core_version);

    for record in &region.side_story_stage {
        let minimum = record.minimum_required.as_deref().and_then(parse_version);

        // Without both versions the stage cannot be gated safely; omit it.
        let (Some(gate), Some(minimum)) = (gate.as_ref(), minimum.as_ref()) else {
            continue;
        };

        if gate < minimum {
            let label = locale.text("UnsupportedStages");
            if !table.contains(&label) {
                let activity = decode_activity(record)?;
                if !activity.is_expired(now) {
                    table.insert(
                        label.clone(),
                        StageInfo {
                            display: label.clone(),
                            value: Some(label),
                            drop: Some(locale.text("LowVersion")),
                            activity: Some(Arc::new(activity)),
                            ..StageInfo::default()
                        },
                    );
                }
            }
            continue;
        }

        let activity = decode_activity(record)?;
        let value = record
            .value
            .clone()
            .ok_or(ScheduleError::MissingField("Value"))?;
        if activity.is_expired(now) {
            continue;
        }

        let info = StageInfo {
            display: record.display.clone().unwrap_or_default(),
            value: Some(value),
            drop: record.drop.clone(),
            activity: Some(Arc::new(activity)),
            ..StageInfo::default()
        };
        // Event entries key by display label, not by value.
        table.insert(info.display.clone(), info);
    }

    Ok(())
}

fn decode_activity(record: &SideStoryRecord) -> Result<StageActivity, ScheduleError> {
    let activity = record
        .activity
        .as_ref()
        .ok_or(ScheduleError::MissingField("Activity"))?;
    Ok(StageActivity {
        tip: activity.tip.clone(),
        stage_name: activity.stage_name.clone(),
        utc_start_time: Some(decode_utc(
            activity.utc_start_time.as_deref(),
            "UtcStartTime",
            activity.time_zone.as_deref(),
        )?),
        utc_expire_time: Some(decode_utc(
            activity.utc_expire_time.as_deref(),
            "UtcExpireTime",
            activity.time_zone.as_deref(),
        )?),
        is_resource_collection: false,
    })
}

fn append_static_stages(
    table: &mut StageTable,
    resource_collection: &Arc<StageActivity>,
    locale: &Locale,
) {
    // Main story
    table.insert("1-7", StageInfo::permanent("1-7", "1-7"));

    // Weekly resource stages share the resource-collection window.
    table.insert(
        "CE-6",
        StageInfo::scheduled("CE-6", locale.tip("CETip"), &CE_6_DAYS, resource_collection.clone()),
    );
    table.insert(
        "AP-5",
        StageInfo::scheduled("AP-5", locale.tip("APTip"), &AP_5_DAYS, resource_collection.clone()),
    );
    table.insert(
        "CA-5",
        StageInfo::scheduled("CA-5", locale.tip("CATip"), &CA_5_DAYS, resource_collection.clone()),
    );
    table.insert(
        "LS-6",
        StageInfo::scheduled("LS-6", locale.tip("LSTip"), &[], resource_collection.clone()),
    );

    // No navigation for the carbon stage; it only surfaces its tip.
    table.insert(
        "SK-5",
        StageInfo::scheduled("SK-5", locale.tip("SKTip"), &SK_5_DAYS, resource_collection.clone())
            .hidden(),
    );

    table.insert(
        "Annihilation",
        StageInfo::permanent(locale.text("Annihilation"), "Annihilation"),
    );

    // Chip stages, two per rarity tier; only the first of each pair has a tip.
    table.insert(
        "PR-A-1",
        StageInfo::scheduled("PR-A-1", locale.tip("PR-ATip"), &PR_A_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-A-2",
        StageInfo::scheduled("PR-A-2", None, &PR_A_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-B-1",
        StageInfo::scheduled("PR-B-1", locale.tip("PR-BTip"), &PR_B_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-B-2",
        StageInfo::scheduled("PR-B-2", None, &PR_B_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-C-1",
        StageInfo::scheduled("PR-C-1", locale.tip("PR-CTip"), &PR_C_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-C-2",
        StageInfo::scheduled("PR-C-2", None, &PR_C_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-D-1",
        StageInfo::scheduled("PR-D-1", locale.tip("PR-DTip"), &PR_D_DAYS, resource_collection.clone()),
    );
    table.insert(
        "PR-D-2",
        StageInfo::scheduled("PR-D-2", None, &PR_D_DAYS, resource_collection.clone()),
    );

    // Monday and Sunday hint-only entries; no value, never listed.
    table.insert(
        "Pormpt1",
        StageInfo {
            tip: Some(locale.text("Pormpt1")),
            open_days: vec![Weekday::Mon],
            hidden: true,
            ..StageInfo::default()
        },
    );
    table.insert(
        "Pormpt2",
        StageInfo {
            tip: Some(locale.text("Pormpt2")),
            open_days: vec![Weekday::Sun],
            hidden: true,
            ..StageInfo::default()
        },
    );
}
