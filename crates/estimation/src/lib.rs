pub mod config;
pub mod engine;
pub mod leaderboard;

pub use config::{EmissionFactors, EstimationConfig, LabelRule, PhotoLabelRules};
pub use engine::{
    estimate_electricity, estimate_from_detections, estimate_transport, estimate_waste,
    resolve_entry_emissions, round4, Detection, DetectionDetail,
};
pub use leaderboard::{
    compute_leaderboard, EntrySnapshot, LeaderboardRow, UserSnapshot, DEFAULT_WINDOW_DAYS,
};
