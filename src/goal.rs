// =============================================================================
// GOAL COMBINATORS
// =============================================================================
// A goal is a pure function from a state to a stream of states. Programs
// are built by composing the primitive goals below; nothing here owns
// mutable state, and the fresh-name counter travels inside the state.

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::rc::Rc;

use crate::state::State;
use crate::stream::{States, Stream};
use crate::subst::Substitution;
use crate::term::{AtomKind, Term, Var};

/// A relational program: a pure function `State -> Stream`.
#[derive(Clone)]
pub struct Goal(Rc<dyn Fn(State) -> Stream>);

impl Goal {
    pub fn new(f: impl Fn(State) -> Stream + 'static) -> Goal {
        Goal(Rc::new(f))
    }

    /// Apply the goal to a state.
    pub fn call(&self, state: State) -> Stream {
        (self.0)(state)
    }

    /// Conjunction: this goal, then `other` over every answer.
    pub fn and(self, other: Goal) -> Goal {
        Goal::new(move |state| self.call(state).bind(&other))
    }

    /// Disjunction: both goals against the same state, streams interleaved.
    pub fn or(self, other: Goal) -> Goal {
        Goal::new(move |state| self.call(state.clone()).mplus(other.call(state)))
    }

    /// Suspend this goal behind an immature stream.
    pub fn delay(self) -> Goal {
        delayed(move || self.clone())
    }
}

impl BitAnd for Goal {
    type Output = Goal;

    fn bitand(self, rhs: Goal) -> Goal {
        self.and(rhs)
    }
}

impl BitOr for Goal {
    type Output = Goal;

    fn bitor(self, rhs: Goal) -> Goal {
        self.or(rhs)
    }
}

impl fmt::Debug for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Goal(..)")
    }
}

// =============================================================================
// PRIMITIVE GOALS
// =============================================================================

/// The unification goal. Succeeds with one answer when the terms unify
/// under the incoming substitution, otherwise produces no answers.
pub fn eq(u: impl Into<Term>, v: impl Into<Term>) -> Goal {
    let u = u.into();
    let v = v.into();
    Goal::new(move |state| match state.substitution().unifying(&u, &v) {
        Some(sub) => Stream::unit(state.with_new_substitution(sub)),
        None => Stream::empty(),
    })
}

pub fn disj(g: Goal, h: Goal) -> Goal {
    g.or(h)
}

pub fn conj(g: Goal, h: Goal) -> Goal {
    g.and(h)
}

/// Introduce one fresh variable, named from the state's counter.
pub fn fresh<F>(constructor: F) -> Goal
where
    F: Fn(Term) -> Goal + 'static,
{
    Goal::new(move |state| {
        let var = Term::Var(Var::new(state.next_unused_name()));
        constructor(var).call(state.with_next_new_name())
    })
}

/// Introduce two fresh variables, allocated in order.
pub fn fresh2<F>(constructor: F) -> Goal
where
    F: Fn(Term, Term) -> Goal + 'static,
{
    Goal::new(move |state| {
        let a = Term::Var(Var::new(state.next_unused_name()));
        let state = state.with_next_new_name();
        let b = Term::Var(Var::new(state.next_unused_name()));
        constructor(a, b).call(state.with_next_new_name())
    })
}

/// Introduce three fresh variables, allocated in order.
pub fn fresh3<F>(constructor: F) -> Goal
where
    F: Fn(Term, Term, Term) -> Goal + 'static,
{
    Goal::new(move |state| {
        let a = Term::Var(Var::new(state.next_unused_name()));
        let state = state.with_next_new_name();
        let b = Term::Var(Var::new(state.next_unused_name()));
        let state = state.with_next_new_name();
        let c = Term::Var(Var::new(state.next_unused_name()));
        constructor(a, b, c).call(state.with_next_new_name())
    })
}

/// Defer construction of a goal until the search schedules it.
///
/// The constructor runs inside an immature stream, so a recursive relation
/// that re-enters itself through `delayed` builds one search frame per
/// scheduling step instead of recursing without bound at construction time.
pub fn delayed<F>(constructor: F) -> Goal
where
    F: Fn() -> Goal + 'static,
{
    let constructor = Rc::new(constructor);
    Goal::new(move |state| {
        let constructor = Rc::clone(&constructor);
        Stream::immature(move || constructor().call(state))
    })
}

/// The goal that always succeeds once.
pub fn succeed() -> Goal {
    eq(true, true)
}

/// The goal that never succeeds.
pub fn fail() -> Goal {
    eq(false, true)
}

/// Hand the reified form of the current substitution to a goal constructor.
pub fn in_environment<F>(constructor: F) -> Goal
where
    F: Fn(Substitution) -> Goal + 'static,
{
    Goal::new(move |state| constructor(state.substitution().reified()).call(state))
}

// =============================================================================
// TYPE-TEST GOALS
// =============================================================================
// Each test resolves the term in the reified environment and decides by
// runtime variant. A variable that is still unconstrained shows up either
// as itself or as a reified marker.

pub fn is_variable(term: impl Into<Term>) -> Goal {
    let term = term.into();
    in_environment(move |sub| match sub.walk(&term) {
        Term::Var(_) | Term::Reified(_) => succeed(),
        _ => fail(),
    })
}

pub fn is_atom(term: impl Into<Term>) -> Goal {
    let term = term.into();
    in_environment(move |sub| match sub.walk(&term) {
        Term::Atom(_) => succeed(),
        _ => fail(),
    })
}

/// Succeeds when the term resolves to an atom of the given kind.
pub fn is_atom_of(term: impl Into<Term>, kind: AtomKind) -> Goal {
    let term = term.into();
    in_environment(move |sub| match sub.walk(&term) {
        Term::Atom(a) if a.kind() == kind => succeed(),
        _ => fail(),
    })
}

pub fn is_list(term: impl Into<Term>) -> Goal {
    let term = term.into();
    in_environment(move |sub| match sub.walk(&term) {
        Term::Nil | Term::Cons(_, _) => succeed(),
        _ => fail(),
    })
}

pub fn is_map(term: impl Into<Term>) -> Goal {
    let term = term.into();
    in_environment(move |sub| match sub.walk(&term) {
        Term::Map(_) => succeed(),
        _ => fail(),
    })
}

// =============================================================================
// TOP-LEVEL DRIVER
// =============================================================================

/// Run a goal against the initial state.
pub fn run(goal: &Goal) -> Query {
    run_from(goal, State::new())
}

/// Run a goal against a caller-supplied state.
pub fn run_from(goal: &Goal, state: State) -> Query {
    Query {
        states: goal.call(state).into_states(),
    }
}

/// The answers of a run, as an iterator of substitutions.
///
/// Each step realizes the underlying stream once. A divergent program
/// diverges here too; callers bound it with `take`.
#[derive(Debug)]
pub struct Query {
    states: States,
}

impl Iterator for Query {
    type Item = Substitution;

    fn next(&mut self) -> Option<Substitution> {
        self.states.next().map(|state| state.substitution().clone())
    }
}
