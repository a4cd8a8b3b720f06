use serde::{Deserialize, Serialize};

/// Outcome of one content checker.
///
/// A checker has either not run, or run and reached a verdict. There is no
/// way to express "valid but unchecked".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

impl CheckState {
    /// Build from a `(checked, valid)` pair. `valid` is ignored unless
    /// `checked` is set.
    pub fn from_pair(checked: bool, valid: bool) -> Self {
        match (checked, valid) {
            (false, _) => Self::Unchecked,
            (true, true) => Self::Valid,
            (true, false) => Self::Invalid,
        }
    }

    /// The `(checked, valid)` pair for this state.
    pub fn as_pair(&self) -> (bool, bool) {
        match self {
            Self::Unchecked => (false, false),
            Self::Valid => (true, true),
            Self::Invalid => (true, false),
        }
    }

    pub fn is_checked(&self) -> bool {
        !matches!(self, Self::Unchecked)
    }

    /// `Some(verdict)` once checked.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            Self::Unchecked => None,
            Self::Valid => Some(true),
            Self::Invalid => Some(false),
        }
    }
}

/// Recorded checker outcomes for a stored object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckFlags {
    /// Media type check.
    #[serde(rename = "type")]
    pub media_type: CheckState,
    pub charset: CheckState,
    pub encoding: CheckState,
    pub syntax: CheckState,
}

impl CheckFlags {
    /// All four checkers unrun.
    pub fn unchecked() -> Self {
        Self::default()
    }

    /// Whether every checker has run and passed.
    pub fn all_valid(&self) -> bool {
        [self.media_type, self.charset, self.encoding, self.syntax]
            .iter()
            .all(|s| *s == CheckState::Valid)
    }

    /// Overlay `other` on top of `self`: checked states in `other` win,
    /// unchecked ones leave the existing state in place.
    pub fn merge(&self, other: &Self) -> Self {
        let pick = |old: CheckState, new: CheckState| {
            if new.is_checked() {
                new
            } else {
                old
            }
        };
        Self {
            media_type: pick(self.media_type, other.media_type),
            charset: pick(self.charset, other.charset),
            encoding: pick(self.encoding, other.encoding),
            syntax: pick(self.syntax, other.syntax),
        }
    }
}
