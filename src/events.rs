//! Discrete gameplay events for the scoring/stats collaborator.

use crate::asteroid::VelocityTier;
use crate::objective::ObjectiveKind;
use bevy::prelude::*;

/// Something the score keeper cares about happened during a tick.
///
/// `AsteroidDestroyed` carries the speed tier of the asteroid at the moment it
/// was shot, using the same thresholds as its fill colour.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ShipDestroyed,
    AsteroidDestroyed { tier: VelocityTier },
    ObjectiveCollected { kind: ObjectiveKind },
    ShotFired,
}

/// Request a fresh run on the next fixed tick.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestartRequested;
