//! Emit-or-suppress decision for a single reminder fire.

use chrono::NaiveTime;

use super::window::is_within_window;
use crate::core::UserConfig;

/// Why a reminder fire was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The daily goal is already met. Takes precedence over the window, so
    /// a finished user is never pinged no matter the time of day.
    GoalMet,
    /// The local time is outside the user's reminder window.
    OutsideWindow,
}

/// Outcome of evaluating one reminder fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Send a reminder proposing `suggested_ml`.
    Emit { suggested_ml: u32 },
    /// Stay silent.
    Suppress(SuppressReason),
}

/// Decide whether a reminder should go out right now.
///
/// The suggestion never exceeds what remains to reach the goal, and never
/// exceeds the user's standard serving.
pub fn evaluate(cfg: &UserConfig, local_time: NaiveTime, intake_today_ml: u32) -> Decision {
    if intake_today_ml >= cfg.goal_ml {
        return Decision::Suppress(SuppressReason::GoalMet);
    }
    if !is_within_window(cfg.start_hm, cfg.end_hm, local_time) {
        return Decision::Suppress(SuppressReason::OutsideWindow);
    }
    let suggested_ml = cfg.cup_ml.min(cfg.goal_ml - intake_today_ml);
    Decision::Emit { suggested_ml }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dublin_cfg() -> UserConfig {
        let mut cfg = UserConfig::with_defaults(1);
        cfg.goal_ml = 2000;
        cfg.cup_ml = 250;
        cfg.set_window(t(9, 0), t(21, 0));
        cfg.tz = chrono_tz::Europe::Dublin;
        cfg
    }

    #[test]
    fn test_emit_caps_at_remaining() {
        // 1800 of 2000 ml at 14:00 local: suggest the 200 ml left, not a cup
        let cfg = dublin_cfg();
        assert_eq!(
            evaluate(&cfg, t(14, 0), 1800),
            Decision::Emit { suggested_ml: 200 }
        );
    }

    #[test]
    fn test_emit_caps_at_cup() {
        let cfg = dublin_cfg();
        assert_eq!(
            evaluate(&cfg, t(14, 0), 100),
            Decision::Emit { suggested_ml: 250 }
        );
    }

    #[test]
    fn test_goal_met_suppresses() {
        let cfg = dublin_cfg();
        assert_eq!(
            evaluate(&cfg, t(14, 0), 2000),
            Decision::Suppress(SuppressReason::GoalMet)
        );
        assert_eq!(
            evaluate(&cfg, t(14, 0), 2600),
            Decision::Suppress(SuppressReason::GoalMet)
        );
    }

    #[test]
    fn test_goal_met_wins_over_window() {
        // Outside the window and over goal: GoalMet, regardless of window
        let cfg = dublin_cfg();
        assert_eq!(
            evaluate(&cfg, t(23, 0), 2100),
            Decision::Suppress(SuppressReason::GoalMet)
        );
    }

    #[test]
    fn test_outside_window_suppresses() {
        let cfg = dublin_cfg();
        assert_eq!(
            evaluate(&cfg, t(23, 0), 500),
            Decision::Suppress(SuppressReason::OutsideWindow)
        );
        assert_eq!(
            evaluate(&cfg, t(8, 59), 0),
            Decision::Suppress(SuppressReason::OutsideWindow)
        );
    }

    #[test]
    fn test_suggestion_never_exceeds_bounds() {
        let cfg = dublin_cfg();
        for intake in (0..2000).step_by(37) {
            if let Decision::Emit { suggested_ml } = evaluate(&cfg, t(12, 0), intake) {
                assert!(suggested_ml <= cfg.cup_ml);
                assert!(suggested_ml <= cfg.goal_ml - intake);
                assert!(suggested_ml > 0);
            } else {
                panic!("expected emit at intake {intake}");
            }
        }
    }

    #[test]
    fn test_wrap_window_emit() {
        let mut cfg = dublin_cfg();
        cfg.set_window(t(22, 0), t(6, 0));
        assert!(matches!(evaluate(&cfg, t(23, 30), 0), Decision::Emit { .. }));
        assert_eq!(
            evaluate(&cfg, t(10, 0), 0),
            Decision::Suppress(SuppressReason::OutsideWindow)
        );
    }
}
