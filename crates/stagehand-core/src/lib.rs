//! Core library crate for stagehand: the stage-availability model of a
//! game-automation assistant. Merges the static weekly mission schedule
//! with a remotely published event schedule, applies version gating and
//! expiry filtering, and answers which stages are open, on which weekdays,
//! and with what user-facing hints.

pub mod builder;
pub mod config;
pub mod gate;
pub mod items;
pub mod locale;
pub mod logging;
pub mod manager;
pub mod provider;
pub mod schedule;
pub mod stage;

pub use builder::build_stage_table;
pub use config::{
    ConfigError, ConfigLoadResult, ConfigSource, FileConfig, cache_path, config_directory,
    config_path, load_config, load_config_from, save_config, save_config_to,
};
pub use gate::{CoreVersionProvider, StaticVersion, parse_version};
pub use items::ItemRepository;
pub use locale::Locale;
pub use logging::{LoggingDestination, LoggingError, init_logging};
pub use manager::{StageManager, build_stage_tips};
pub use provider::{DEFAULT_SCHEDULE_URL, ScheduleProvider};
pub use schedule::{ScheduleDoc, ScheduleError, parse_document};
pub use stage::{StageActivity, StageInfo, StageTable};
