//! Selection of top picks.

use super::project_summary::ProjectSummary;
use serde::Serialize;
use std::cmp::Reverse;

/// Number of quick looks sent to notifications when there are no top picks.
const QUICK_LOOK_NOTIFICATION_LIMIT: usize = 3;

/// Summaries split into top picks and quick looks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummarizationOutcome {
    /// Ordered by score, then by `stars_today`, both descending.
    pub top_picks: Vec<ProjectSummary>,
    /// In acquisition order.
    pub quick_looks: Vec<ProjectSummary>,
}

impl SummarizationOutcome {
    pub fn len(&self) -> usize {
        self.top_picks.len() + self.quick_looks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every summary, top picks first.
    pub fn all(&self) -> impl Iterator<Item = &ProjectSummary> {
        self.top_picks.iter().chain(&self.quick_looks)
    }

    pub fn degraded_count(&self) -> usize {
        self.all().filter(|s| s.is_degraded()).count()
    }

    /// What notifications should carry: the top picks, or the first few quick
    /// looks when nothing was picked.
    pub fn notification_candidates(&self) -> &[ProjectSummary] {
        if self.top_picks.is_empty() {
            let end = self.quick_looks.len().min(QUICK_LOOK_NOTIFICATION_LIMIT);
            &self.quick_looks[..end]
        } else {
            &self.top_picks
        }
    }
}

/// Partitions summaries into top picks and quick looks.
///
/// Repositories with `stars_today > 0` form the growth pool. When the pool is
/// non-empty the `top_pick_count` fastest growing are picked, ties keeping
/// input order. Otherwise the first `top_pick_count` by position are picked.
#[must_use]
pub fn categorize(summaries: Vec<ProjectSummary>, top_pick_count: usize) -> SummarizationOutcome {
    let mut growth: Vec<usize> = summaries
        .iter()
        .enumerate()
        .filter(|(_, s)| s.repo.stars_today() > 0)
        .map(|(i, _)| i)
        .collect();

    let picked: Vec<usize> = if growth.is_empty() {
        (0..summaries.len().min(top_pick_count)).collect()
    } else {
        growth.sort_by_key(|&i| Reverse(summaries[i].repo.stars_today()));
        growth.truncate(top_pick_count);
        growth
    };

    let mut outcome = SummarizationOutcome::default();
    for (index, mut summary) in summaries.into_iter().enumerate() {
        summary.is_top_pick = picked.contains(&index);
        if summary.is_top_pick {
            outcome.top_picks.push(summary);
        } else {
            outcome.quick_looks.push(summary);
        }
    }

    outcome
        .top_picks
        .sort_by_key(|s| (Reverse(s.score), Reverse(s.repo.stars_today())));
    outcome
}
