//! Structured snapshots for save and restore.
//!
//! A snapshot is a JSON value tree: field names map to primitives or nested values.
//! Restoring a snapshot rebuilds the entity exactly. Rosters are re-validated on the way
//! in so a hand-edited snapshot cannot smuggle in a malformed roster.

use alloc::string::{String, ToString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::battle::{BattleOutcome, BattleReport};
use crate::error::{BattleError, Invariant};
use crate::roster::{Roster, ROSTER_CAPACITY};
use crate::unit::Unit;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(String),
    #[error("snapshot holds an invalid roster: {0}")]
    InvalidRoster(BattleError),
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err.to_string())
    }
}

pub trait Snapshot: Sized {
    fn to_snapshot(&self) -> Result<Value, SnapshotError>;
    fn from_snapshot(value: Value) -> Result<Self, SnapshotError>;
}

fn encode<T: Serialize>(entity: &T) -> Result<Value, SnapshotError> {
    Ok(serde_json::to_value(entity)?)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SnapshotError> {
    Ok(serde_json::from_value(value)?)
}

impl Snapshot for Unit {
    fn to_snapshot(&self) -> Result<Value, SnapshotError> {
        encode(self)
    }

    fn from_snapshot(value: Value) -> Result<Self, SnapshotError> {
        decode(value)
    }
}

impl Snapshot for Roster {
    fn to_snapshot(&self) -> Result<Value, SnapshotError> {
        encode(self)
    }

    fn from_snapshot(value: Value) -> Result<Self, SnapshotError> {
        let roster: Roster = decode(value)?;
        if roster.capacity() == 0 {
            return Err(SnapshotError::InvalidRoster(BattleError::InvariantViolation {
                invariant: Invariant::RosterSize {
                    expected: ROSTER_CAPACITY as u32,
                    found: 0,
                },
            }));
        }
        Ok(roster)
    }
}

/// Restore a roster and check it fits a battle with `capacity` slots.
pub fn restore_roster(value: Value, capacity: usize) -> Result<Roster, SnapshotError> {
    let roster = Roster::from_snapshot(value)?;
    roster.validate(capacity).map_err(SnapshotError::InvalidRoster)?;
    Ok(roster)
}

impl Snapshot for BattleOutcome {
    fn to_snapshot(&self) -> Result<Value, SnapshotError> {
        encode(self)
    }

    fn from_snapshot(value: Value) -> Result<Self, SnapshotError> {
        decode(value)
    }
}

impl Snapshot for BattleReport {
    fn to_snapshot(&self) -> Result<Value, SnapshotError> {
        encode(self)
    }

    fn from_snapshot(value: Value) -> Result<Self, SnapshotError> {
        let report: BattleReport = decode(value)?;
        let capacity = report.first.capacity();
        report
            .second
            .validate(capacity)
            .map_err(SnapshotError::InvalidRoster)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::pet;
    use crate::types::Status;
    use alloc::vec;
    use serde_json::json;

    #[test]
    fn test_roster_snapshot_restores_exactly() {
        let roster = Roster::from_slots(
            vec![
                pet("ant"),
                None,
                pet("sheep").map(|u| u.with_experience(3).with_status(Status::Garlic)),
                None,
                pet("dolphin"),
            ],
            5,
        )
        .unwrap();

        let snapshot = roster.to_snapshot().unwrap();
        assert_eq!(snapshot["slots"][1], Value::Null);
        assert_eq!(snapshot["slots"][2]["experience"], json!(3));
        assert_eq!(Roster::from_snapshot(snapshot).unwrap(), roster);
    }

    #[test]
    fn test_outcome_snapshot_shape() {
        let outcome = BattleOutcome::Win {
            side: crate::types::Side::Second,
        };
        let snapshot = outcome.to_snapshot().unwrap();
        assert_eq!(snapshot, json!({"type": "win", "side": "second"}));
        assert_eq!(BattleOutcome::from_snapshot(snapshot).unwrap(), outcome);
    }

    #[test]
    fn test_unit_snapshot_fills_defaults() {
        let unit = Unit::from_snapshot(json!({"name": "fish", "attack": 2, "health": 3})).unwrap();
        assert_eq!(unit, Unit::new("fish", 2, 3));
    }

    #[test]
    fn test_restore_checks_capacity() {
        let snapshot = Roster::with_capacity(3).to_snapshot().unwrap();
        assert!(restore_roster(snapshot.clone(), 3).is_ok());
        assert!(matches!(
            restore_roster(snapshot, 5),
            Err(SnapshotError::InvalidRoster(BattleError::InvariantViolation {
                invariant: Invariant::RosterSize { expected: 5, found: 3 }
            }))
        ));
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(matches!(
            Unit::from_snapshot(json!({"name": 4})),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            Roster::from_snapshot(json!({"slots": []})),
            Err(SnapshotError::InvalidRoster(_))
        ));
    }
}
