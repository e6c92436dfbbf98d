//! Goal tracking against the global aggregates.

use crate::budget::GlobalSummary;
use adalloc_core::{Goal, GoalStatus, GoalType};
use chrono::NaiveDate;
use tracing::info;

/// The live figure a goal of `goal_type` is measured against.
pub fn actual_value(goal_type: GoalType, summary: &GlobalSummary) -> f64 {
    match goal_type {
        GoalType::Revenue => summary.total_revenue,
        GoalType::Spend => summary.total_spend,
        GoalType::Customers => summary.total_customers as f64,
        GoalType::Roas => summary.blended_roas,
    }
}

/// Overwrite each goal's current value from `summary` and mark goals that
/// reached their target as completed. Completed goals stay completed.
///
/// Returns `true` if any goal changed.
pub fn sync_goals(goals: &mut [Goal], summary: &GlobalSummary) -> bool {
    let mut changed = false;
    for goal in goals.iter_mut() {
        let actual = actual_value(goal.goal_type, summary);
        if actual != goal.current_value {
            goal.current_value = actual;
            changed = true;
        }
        if goal.status != GoalStatus::Completed && goal.current_value >= goal.target_value {
            info!(
                goal_id = %goal.id,
                goal_type = goal.goal_type.as_str(),
                target = goal.target_value,
                "Goal reached"
            );
            goal.status = GoalStatus::Completed;
            changed = true;
        }
    }
    changed
}

/// Flag active goals whose deadline passed before `today`.
pub fn refresh_overdue(goals: &mut [Goal], today: NaiveDate) -> bool {
    let mut changed = false;
    for goal in goals.iter_mut() {
        if goal.status == GoalStatus::Active && goal.deadline < today {
            goal.status = GoalStatus::Overdue;
            changed = true;
        }
    }
    changed
}

/// Progress towards the target in percent, capped at 100.
pub fn goal_progress(goal: &Goal) -> f64 {
    if goal.target_value > 0.0 {
        (goal.current_value / goal.target_value * 100.0).min(100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn goal(goal_type: GoalType, target: f64) -> Goal {
        Goal {
            id: "goal-1".into(),
            name: "Target".into(),
            target_value: target,
            current_value: 0.0,
            deadline: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
            status: GoalStatus::Active,
            goal_type,
            created_at: Utc::now(),
        }
    }

    fn summary(spend: f64, revenue: f64, customers: usize) -> GlobalSummary {
        GlobalSummary {
            total_spend: spend,
            total_revenue: revenue,
            blended_roas: if spend > 0.0 { revenue / spend } else { 0.0 },
            total_customers: customers,
            total_campaigns: 0,
        }
    }

    #[test]
    fn test_revenue_goal_tracks_and_completes() {
        let mut goals = vec![goal(GoalType::Revenue, 100_000.0)];

        assert!(sync_goals(&mut goals, &summary(10_000.0, 42_000.0, 1)));
        assert!((goals[0].current_value - 42_000.0).abs() < 1e-9);
        assert_eq!(goals[0].status, GoalStatus::Active);

        sync_goals(&mut goals, &summary(20_000.0, 100_500.0, 1));
        assert_eq!(goals[0].status, GoalStatus::Completed);
    }

    #[test]
    fn test_completed_is_sticky() {
        let mut goals = vec![goal(GoalType::Spend, 1_000.0)];
        sync_goals(&mut goals, &summary(1_500.0, 0.0, 0));
        assert_eq!(goals[0].status, GoalStatus::Completed);

        sync_goals(&mut goals, &summary(500.0, 0.0, 0));
        assert!((goals[0].current_value - 500.0).abs() < 1e-9);
        assert_eq!(goals[0].status, GoalStatus::Completed);
    }

    #[test]
    fn test_each_type_reads_its_aggregate() {
        let s = summary(8_000.0, 29_000.0, 3);
        assert!((actual_value(GoalType::Roas, &s) - 3.625).abs() < 1e-9);
        assert!((actual_value(GoalType::Customers, &s) - 3.0).abs() < 1e-9);
        assert!((actual_value(GoalType::Spend, &s) - 8_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_change_reports_false() {
        let mut goals = vec![goal(GoalType::Customers, 10.0)];
        sync_goals(&mut goals, &summary(0.0, 0.0, 2));
        assert!(!sync_goals(&mut goals, &summary(0.0, 0.0, 2)));
    }

    #[test]
    fn test_overdue_only_flags_active_goals() {
        let mut goals = vec![goal(GoalType::Revenue, 10.0), goal(GoalType::Revenue, 10.0)];
        goals[0].deadline = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        goals[1].deadline = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        goals[1].status = GoalStatus::Completed;

        assert!(refresh_overdue(&mut goals, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert_eq!(goals[0].status, GoalStatus::Overdue);
        assert_eq!(goals[1].status, GoalStatus::Completed);
    }

    #[test]
    fn test_progress_is_capped() {
        let mut g = goal(GoalType::Revenue, 200.0);
        g.current_value = 50.0;
        assert!((goal_progress(&g) - 25.0).abs() < 1e-9);
        g.current_value = 500.0;
        assert!((goal_progress(&g) - 100.0).abs() < 1e-9);
        g.target_value = 0.0;
        assert_eq!(goal_progress(&g), 0.0);
    }
}
