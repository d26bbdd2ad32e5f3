use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::round4;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Minimal view of a stored entry, as fed into the aggregation.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub emissions_kgco2: Option<f64>,
}

/// Minimal view of a known user.
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub user_id: Uuid,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub total_kgco2: f64,
}

/// Rank users by windowed emissions, lowest first.
///
/// Entries with timestamp ≥ `now − window_days` contribute to the totals
/// (absent emissions count as 0.0). Every user with at least one entry
/// ever gets a row — a user whose entries all fall outside the window
/// still appears with a total of 0.0. Totals are rounded to 4 decimals
/// before comparison; ties break on ascending user id so the ordering is
/// deterministic. `now` is injected to keep the function pure.
pub fn compute_leaderboard(
    entries: &[EntrySnapshot],
    users: &[UserSnapshot],
    window_days: i64,
    now: DateTime<Utc>,
) -> Vec<LeaderboardRow> {
    let cutoff = now - Duration::days(window_days);

    let mut has_entries: HashSet<Uuid> = HashSet::new();
    let mut totals: HashMap<Uuid, f64> = HashMap::new();

    for entry in entries {
        has_entries.insert(entry.user_id);
        if entry.timestamp >= cutoff {
            *totals.entry(entry.user_id).or_insert(0.0) += entry.emissions_kgco2.unwrap_or(0.0);
        }
    }

    let mut rows: Vec<LeaderboardRow> = users
        .iter()
        .filter(|user| has_entries.contains(&user.user_id))
        .map(|user| LeaderboardRow {
            user_id: user.user_id,
            display_name: user.display_name.clone(),
            total_kgco2: round4(totals.get(&user.user_id).copied().unwrap_or(0.0)),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.total_kgco2
            .partial_cmp(&b.total_kgco2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    rows
}
