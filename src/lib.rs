//! A relational programming engine in the miniKanren tradition.
//!
//! Programs are goals composed from unification, disjunction, conjunction,
//! and fresh-variable introduction. Running a goal enumerates every
//! substitution under which it holds, through a lazy answer stream whose
//! interleaving merge keeps the search complete in the presence of
//! divergent recursive branches.

pub mod goal;
pub mod state;
pub mod stream;
pub mod subst;
pub mod term;

pub use goal::{
    conj, delayed, disj, eq, fail, fresh, fresh2, fresh3, in_environment, is_atom, is_atom_of,
    is_list, is_map, is_variable, run, run_from, succeed, Goal, Query,
};
pub use state::State;
pub use stream::{States, Stream, Thunk};
pub use subst::Substitution;
pub use term::{Atom, AtomKind, Composite, Term, Var};
