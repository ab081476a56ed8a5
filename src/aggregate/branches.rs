use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::model::{Branch, TrackStats};
use crate::vcs::{LocalRepo, TrackInspector};

/// Drop branches without activity in the last `max_age_days`, most recent first.
///
/// A branch whose last commit sits exactly on the boundary is kept. A window
/// reaching past the representable time range keeps every branch.
pub fn filter_branches(
    mut branches: Vec<Branch>,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Vec<Branch> {
    let cutoff = Duration::try_days(max_age_days).and_then(|age| now.checked_sub_signed(age));
    branches.retain(|b| cutoff.is_none_or(|cutoff| b.last_activity() >= cutoff));
    branches.sort_by(|a, b| {
        b.last_activity()
            .cmp(&a.last_activity())
            .then_with(|| a.name.cmp(&b.name))
    });
    branches
}

/// Attach ahead/behind counts to already filtered branches.
///
/// Stats are an enhancement: without a local clone, or when the inspector
/// fails, the branches come back untouched with an empty map.
pub fn join_track_stats(
    inspector: &dyn TrackInspector,
    local: Option<&LocalRepo>,
    branches: Vec<Branch>,
) -> (Vec<Branch>, TrackStats) {
    let Some(local) = local else {
        return (branches, TrackStats::new());
    };

    match inspector.branch_track_stats(local, &branches) {
        Ok(mut stats) => {
            stats.retain(|name, _| branches.iter().any(|b| &b.name == name));
            (branches, stats)
        }
        Err(err) => {
            debug!(path = %local.path.display(), error = %err, "track stats unavailable");
            (branches, TrackStats::new())
        }
    }
}
