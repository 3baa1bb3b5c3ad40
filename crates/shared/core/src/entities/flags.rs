use serde::{Deserialize, Serialize};

/// What an active agent's decision amounted to this tick
///
/// At most one outcome is recorded per agent per tick, which makes the
/// borrow / startup / move / thwart flags mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Took out a loan to fund a move or startup
    Borrow,
    /// Founded a new firm from savings
    Startup,
    /// Joined another firm from savings
    Move,
    /// Wanted to move or start up but could not pay for it
    Thwart,
}

/// Per-tick transient flags, reset at the start of every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFlags {
    /// Agent passed its churn trial and reconsidered its position
    pub go: bool,
    /// Result of the decision, if it was anything other than staying put
    pub outcome: Option<Outcome>,
}

impl TickFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn borrow(&self) -> bool {
        self.outcome == Some(Outcome::Borrow)
    }

    pub fn startup(&self) -> bool {
        self.outcome == Some(Outcome::Startup)
    }

    pub fn moved(&self) -> bool {
        self.outcome == Some(Outcome::Move)
    }

    pub fn thwart(&self) -> bool {
        self.outcome == Some(Outcome::Thwart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_exclusive() {
        let flags = TickFlags {
            go: true,
            outcome: Some(Outcome::Borrow),
        };
        assert!(flags.borrow());
        assert!(!flags.startup());
        assert!(!flags.moved());
        assert!(!flags.thwart());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut flags = TickFlags {
            go: true,
            outcome: Some(Outcome::Thwart),
        };
        flags.reset();
        assert_eq!(flags, TickFlags::default());
    }
}
