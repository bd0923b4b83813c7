// =============================================================================
// EXECUTION STATE
// =============================================================================

use crate::subst::Substitution;

/// The execution state a goal runs against: the current substitution plus
/// the counter used to name fresh variables.
///
/// States are immutable. Goals produce successor states through the
/// `with_*` constructors; the counter increases monotonically along every
/// derivation path and is never reset, so fresh variables that are alive
/// together carry distinct names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    sub: Substitution,
    next_id: usize,
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    /// A state seeded with an existing substitution and a zeroed counter.
    pub fn with_substitution(sub: Substitution) -> State {
        State { sub, next_id: 0 }
    }

    pub fn substitution(&self) -> &Substitution {
        &self.sub
    }

    /// The next fresh display name, derived from the counter.
    pub fn next_unused_name(&self) -> String {
        format!("${}", self.next_id)
    }

    /// Successor with a replacement substitution and the same counter.
    pub fn with_new_substitution(&self, sub: Substitution) -> State {
        State {
            sub,
            next_id: self.next_id,
        }
    }

    /// Successor with the counter advanced past the name just taken.
    pub fn with_next_new_name(&self) -> State {
        State {
            sub: self.sub.clone(),
            next_id: self.next_id + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_the_counter() {
        let state = State::new();
        assert_eq!(state.next_unused_name(), "$0");
        let state = state.with_next_new_name();
        assert_eq!(state.next_unused_name(), "$1");
        let state = state.with_next_new_name();
        assert_eq!(state.next_unused_name(), "$2");
    }

    #[test]
    fn replacing_the_substitution_keeps_the_counter() {
        let state = State::new().with_next_new_name();
        let successor = state.with_new_substitution(Substitution::new());
        assert_eq!(successor.next_unused_name(), state.next_unused_name());
    }
}
