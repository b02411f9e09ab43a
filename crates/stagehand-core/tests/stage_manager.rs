use std::fs;
use std::path::PathBuf;

use chrono::Weekday;
use stagehand_core::{Locale, ScheduleProvider, StageManager, StaticVersion};
use tempfile::TempDir;

const SAMPLE_DOCUMENT: &str = r#"{
    "Official": {
        "resourceCollection": {
            "Tip": "Resource stages all open",
            "UtcStartTime": "2025/07/20 04:00:00",
            "UtcExpireTime": "2099/01/01 03:59:59",
            "TimeZone": "8"
        },
        "sideStoryStage": [
            {
                "MinimumRequired": "4.11.0",
                "Display": "SN-8",
                "Value": "SN-8",
                "Drop": "30012",
                "Activity": {
                    "Tip": "Event in progress",
                    "StageName": "Under Tides",
                    "UtcStartTime": "2025/07/20 04:00:00",
                    "UtcExpireTime": "2099/01/01 03:59:59",
                    "TimeZone": "8"
                }
            }
        ]
    }
}"#;

fn seeded_cache(temp: &TempDir) -> PathBuf {
    let cache = temp.path().join("StageActivity.json");
    fs::write(&cache, SAMPLE_DOCUMENT).expect("write cache fixture");
    cache
}

fn manager_with_cache(temp: &TempDir, core_version: &str) -> StageManager {
    // The URL is never contacted in these tests; only the cache is read.
    let provider = ScheduleProvider::new("http://localhost:9/unused", seeded_cache(temp))
        .expect("provider");
    StageManager::new(
        provider,
        Box::new(StaticVersion(core_version.to_string())),
        "",
    )
}

#[tokio::test]
async fn construction_serves_queries_from_the_cache() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.12.0");

    assert!(manager.stage_info("").is_some());
    assert!(manager.stage_info("CE-6").is_some());
    assert!(manager.stage_info("SN-8").is_some());
    assert!(manager.stage_info("no-such-stage").is_none());
}

#[tokio::test]
async fn openness_follows_the_weekday_sets() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.12.0");

    assert!(manager.is_stage_open("CE-6", Weekday::Thu));
    assert!(!manager.is_stage_open("CE-6", Weekday::Mon));
    assert!(manager.is_stage_open("1-7", Weekday::Mon));
    assert!(!manager.is_stage_open("no-such-stage", Weekday::Mon));
}

#[tokio::test]
async fn listings_exclude_hidden_entries() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.12.0");

    let all = manager.all_stages();
    assert!(all.iter().all(|stage| !stage.hidden));
    assert!(all.iter().any(|stage| stage.display == "SN-8"));
    assert!(!all.iter().any(|stage| stage.display == "SK-5"));

    let monday = manager.open_stages(Weekday::Mon);
    assert!(!monday.iter().any(|stage| stage.display == "CE-6"));
    assert!(monday.iter().any(|stage| stage.display == "AP-5"));
}

#[tokio::test]
async fn low_core_version_surfaces_the_placeholder() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.10.0");
    let label = Locale::embedded().text("UnsupportedStages");

    assert!(manager.stage_info(&label).is_some());
    assert!(manager.stage_info("SN-8").is_none());
}

#[tokio::test]
async fn cache_refresh_is_idempotent() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.12.0");

    let initial = manager.snapshot();
    manager.refresh(false).await;
    let second = manager.snapshot();
    manager.refresh(false).await;
    let third = manager.snapshot();

    assert_eq!(*initial, *second);
    assert_eq!(*second, *third);
}

#[tokio::test]
async fn missing_cache_still_yields_the_static_table() {
    let temp = TempDir::new().expect("tempdir");
    let provider =
        ScheduleProvider::new("http://localhost:9/unused", temp.path().join("absent.json"))
            .expect("provider");
    let manager = StageManager::new(
        provider,
        Box::new(StaticVersion("4.12.0".to_string())),
        "",
    );

    assert!(manager.stage_info("").is_some());
    assert!(manager.stage_info("CE-6").is_some());
    assert!(manager.stage_info("SN-8").is_none());
}

#[tokio::test]
async fn tips_include_event_summary_and_drops() {
    let temp = TempDir::new().expect("tempdir");
    let manager = manager_with_cache(&temp, "4.12.0");

    let tips = manager.stage_tips(Weekday::Wed);
    assert!(tips.contains("Under Tides"));
    assert!(tips.contains("SN-8: Orirock Cube"));
}
