//! Health states and therapies
//!
//! Both are closed sets. Transition behavior is data-driven: a state is only an
//! index into the therapy's transition table and its cost/utility rows.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Health state of a patient during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Well,
    Stroke,
    PostStroke,
    StrokeDeath,
    NaturalDeath,
}

impl HealthState {
    pub const COUNT: usize = 5;

    /// All states in table order
    pub const ALL: [HealthState; Self::COUNT] = [
        HealthState::Well,
        HealthState::Stroke,
        HealthState::PostStroke,
        HealthState::StrokeDeath,
        HealthState::NaturalDeath,
    ];

    /// Row/column of this state in transition and value tables
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Absorbing states end a patient's trajectory
    #[must_use]
    #[inline]
    pub const fn is_absorbing(self) -> bool {
        matches!(self, HealthState::StrokeDeath | HealthState::NaturalDeath)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HealthState::Well => "Well",
            HealthState::Stroke => "Stroke",
            HealthState::PostStroke => "Post-Stroke",
            HealthState::StrokeDeath => "Stroke Death",
            HealthState::NaturalDeath => "Natural Death",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Treatment strategy a cohort is simulated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Therapy {
    None,
    Anticoagulation,
}

impl Therapy {
    pub const ALL: [Therapy; 2] = [Therapy::None, Therapy::Anticoagulation];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Therapy::None => "No Treatment",
            Therapy::Anticoagulation => "Anticoagulation",
        }
    }
}

impl fmt::Display for Therapy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per health state (per-cycle cost or utility), in table order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateValues(pub [f64; HealthState::COUNT]);

impl StateValues {
    #[must_use]
    pub fn get(&self, state: HealthState) -> f64 {
        self.0[state.index()]
    }

    /// Whether every value is finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Index<HealthState> for StateValues {
    type Output = f64;

    fn index(&self, state: HealthState) -> &f64 {
        &self.0[state.index()]
    }
}

impl IndexMut<HealthState> for StateValues {
    fn index_mut(&mut self, state: HealthState) -> &mut f64 {
        &mut self.0[state.index()]
    }
}
