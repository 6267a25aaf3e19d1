//! User actions that move the valuation.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::tax::DeltaKind;

const GOAL_COMPLETE_UC: i64 = 400;
const GOAL_FAILED_UC: i64 = -200;
const HABIT_HOLD_UC: i64 = 100;
const HABIT_SOLD_UC: i64 = -50;
const ADDICTION_HOLD_UC: i64 = 200;
const ADDICTION_SOLD_UC: i64 = -100;
const BUY_UC: i64 = 25;

/// A category event raised by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerEvent {
    GoalComplete,
    GoalFailed,
    GoodHabitHold,
    GoodHabitSold,
    BadHabitHold,
    BadHabitSold,
    AddictionHold,
    AddictionSold,
    Buy { activity: String },
}

impl LedgerEvent {
    pub fn kind(&self) -> DeltaKind {
        match self {
            LedgerEvent::GoalComplete | LedgerEvent::GoalFailed => DeltaKind::Goal,
            LedgerEvent::GoodHabitHold | LedgerEvent::GoodHabitSold => DeltaKind::Good,
            LedgerEvent::BadHabitHold | LedgerEvent::BadHabitSold => DeltaKind::Bad,
            LedgerEvent::AddictionHold | LedgerEvent::AddictionSold => DeltaKind::Addiction,
            LedgerEvent::Buy { .. } => DeltaKind::Buy,
        }
    }

    /// Untaxed delta proposed by the event.
    pub fn delta(&self) -> i64 {
        match self {
            LedgerEvent::GoalComplete => GOAL_COMPLETE_UC,
            LedgerEvent::GoalFailed => GOAL_FAILED_UC,
            LedgerEvent::GoodHabitHold | LedgerEvent::BadHabitHold => HABIT_HOLD_UC,
            LedgerEvent::GoodHabitSold | LedgerEvent::BadHabitSold => HABIT_SOLD_UC,
            LedgerEvent::AddictionHold => ADDICTION_HOLD_UC,
            LedgerEvent::AddictionSold => ADDICTION_SOLD_UC,
            LedgerEvent::Buy { .. } => BUY_UC,
        }
    }

    pub fn label(&self) -> String {
        match self {
            LedgerEvent::GoalComplete => "Goal complete".to_string(),
            LedgerEvent::GoalFailed => "Goal failed".to_string(),
            LedgerEvent::GoodHabitHold => "Good habit hold".to_string(),
            LedgerEvent::GoodHabitSold => "Good habit sold".to_string(),
            LedgerEvent::BadHabitHold => "Bad habit hold".to_string(),
            LedgerEvent::BadHabitSold => "Bad habit sold".to_string(),
            LedgerEvent::AddictionHold => "Addiction hold".to_string(),
            LedgerEvent::AddictionSold => "Addiction sold".to_string(),
            LedgerEvent::Buy { activity } => format!("BUY: {}", activity.trim()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let LedgerEvent::Buy { activity } = self {
            if activity.trim().is_empty() {
                return Err(ValidationError::MissingField("activity".to_string()).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_kind_delta_and_label() {
        let cases = [
            (LedgerEvent::GoalComplete, DeltaKind::Goal, 400, "Goal complete"),
            (LedgerEvent::GoalFailed, DeltaKind::Goal, -200, "Goal failed"),
            (LedgerEvent::GoodHabitHold, DeltaKind::Good, 100, "Good habit hold"),
            (LedgerEvent::BadHabitSold, DeltaKind::Bad, -50, "Bad habit sold"),
            (LedgerEvent::AddictionHold, DeltaKind::Addiction, 200, "Addiction hold"),
            (LedgerEvent::AddictionSold, DeltaKind::Addiction, -100, "Addiction sold"),
        ];
        for (event, kind, delta, label) in cases {
            assert_eq!(event.kind(), kind);
            assert_eq!(event.delta(), delta);
            assert_eq!(event.label(), label);
        }
    }

    #[test]
    fn buy_requires_an_activity() {
        let buy = LedgerEvent::Buy {
            activity: "  coffee ".to_string(),
        };
        assert!(buy.validate().is_ok());
        assert_eq!(buy.label(), "BUY: coffee");
        assert_eq!(buy.delta(), 25);

        let empty = LedgerEvent::Buy {
            activity: "   ".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: LedgerEvent =
            serde_json::from_str(r#"{"type":"buy","activity":"gym pass"}"#).unwrap();
        assert_eq!(
            event,
            LedgerEvent::Buy {
                activity: "gym pass".to_string()
            }
        );
        let event: LedgerEvent = serde_json::from_str(r#"{"type":"addictionHold"}"#).unwrap();
        assert_eq!(event, LedgerEvent::AddictionHold);
    }
}
