//! Dashboard and leaderboard aggregation
//!
//! Both views are recomputed from the full project table on every call.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::{Category, ProjectRecord},
};

/// Figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_projects: usize,
    pub active_students: usize,
    pub global_average: Option<f64>,
    #[serde(flatten)]
    pub viewer: ViewerStats,
    pub submissions_per_day: Vec<DayCount>,
    pub categories: Vec<CategoryCount>,
}

/// Role-specific part of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewerStats {
    Student {
        my_projects: usize,
        my_average: Option<f64>,
        /// Own mean minus the global mean
        delta_vs_average: Option<f64>,
    },
    Instructor {
        pending_reviews: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub student_name: String,
    pub projects: usize,
    pub average_grade: f64,
    pub best_grade: f64,
    pub total_likes: usize,
}

/// Stats service
pub struct StatsService;

impl StatsService {
    pub fn dashboard(projects: &[ProjectRecord], viewer: &AuthenticatedUser) -> Dashboard {
        let owners: HashSet<&str> = projects.iter().map(|p| p.owner_username.as_str()).collect();
        let global_average = mean(projects.iter().filter_map(|p| p.grade));

        let viewer_stats = if viewer.is_instructor() {
            ViewerStats::Instructor {
                pending_reviews: projects.iter().filter(|p| !p.is_graded()).count(),
            }
        } else {
            let mine: Vec<&ProjectRecord> = projects
                .iter()
                .filter(|p| p.is_owned_by(&viewer.username))
                .collect();
            let my_average = mean(mine.iter().filter_map(|p| p.grade));

            ViewerStats::Student {
                my_projects: mine.len(),
                my_average: my_average.map(round1),
                delta_vs_average: my_average
                    .zip(global_average)
                    .map(|(mine, all)| round1(mine - all)),
            }
        };

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut per_category: BTreeMap<Category, usize> = BTreeMap::new();
        for project in projects {
            *per_day.entry(project.submitted_at.date()).or_default() += 1;
            *per_category.entry(project.category).or_default() += 1;
        }

        let mut categories: Vec<CategoryCount> = per_category
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        // Most used first; the sort is stable so ties keep category order
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        Dashboard {
            total_projects: projects.len(),
            active_students: owners.len(),
            global_average: global_average.map(round1),
            viewer: viewer_stats,
            submissions_per_day: per_day
                .into_iter()
                .map(|(date, count)| DayCount { date, count })
                .collect(),
            categories,
        }
    }

    /// Rank students by graded project count, then by mean grade
    ///
    /// Ranks are dense: lines with the same (count, rounded mean) share a rank
    /// and the next distinct pair gets the following integer.
    pub fn leaderboard(projects: &[ProjectRecord]) -> Vec<LeaderboardRow> {
        #[derive(Default)]
        struct Tally {
            grades: Vec<f64>,
            likes: usize,
        }

        let mut groups: BTreeMap<&str, Tally> = BTreeMap::new();
        for project in projects {
            let Some(grade) = project.grade else { continue };
            let tally = groups.entry(project.owner_name.as_str()).or_default();
            tally.grades.push(grade);
            tally.likes += project.likes.len();
        }

        let mut rows: Vec<LeaderboardRow> = groups
            .into_iter()
            .map(|(name, tally)| LeaderboardRow {
                rank: 0,
                student_name: name.to_string(),
                projects: tally.grades.len(),
                average_grade: mean(tally.grades.iter().copied()).map(round1).unwrap_or_default(),
                best_grade: tally.grades.iter().copied().fold(f64::MIN, f64::max),
                total_likes: tally.likes,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.projects
                .cmp(&a.projects)
                .then_with(|| b.average_grade.total_cmp(&a.average_grade))
                .then_with(|| a.student_name.cmp(&b.student_name))
        });

        let mut rank = 0;
        let mut previous: Option<(usize, f64)> = None;
        for row in &mut rows {
            let key = (row.projects, row.average_grade);
            if previous != Some(key) {
                rank += 1;
                previous = Some(key);
            }
            row.rank = rank;
        }

        rows
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
