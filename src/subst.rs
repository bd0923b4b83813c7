// =============================================================================
// SUBSTITUTION - WALKING, UNIFICATION, REIFICATION
// =============================================================================
// A substitution is a finite mapping from variable identity to term. It is
// value-semantic: every extension produces a successor map and shares the
// bound terms structurally.
//
// The mapping must stay acyclic. There is no occurs check; a caller that
// binds a variable into a term containing itself leaves `walk` and
// reification with no defined result.

use std::collections::HashMap;

use crate::term::{Term, Var};

/// A finite mapping from variables to terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: HashMap<Var, Term>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution {
            bindings: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over the `(variable, term)` pairs of this substitution.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// The representative of `term` under this substitution.
    ///
    /// Follows variable bindings one step at a time until an unbound
    /// variable or a non-variable is reached. Does not recurse into the
    /// children of lists, maps, or composites; a bound composite comes back
    /// with its inner variables untouched.
    pub fn walk(&self, term: &Term) -> Term {
        let mut current = term;
        loop {
            match current {
                Term::Var(v) => match self.bindings.get(v) {
                    Some(next) => current = next,
                    None => return current.clone(),
                },
                other => return other.clone(),
            }
        }
    }

    /// A successor substitution with the additional binding `var -> term`.
    ///
    /// The trivial binding of a variable to itself is dropped. An existing
    /// binding for `var` is overwritten; `unifying` never rebinds because it
    /// walks both sides first.
    pub fn extended(&self, var: Var, term: Term) -> Substitution {
        if let Term::Var(v) = &term {
            if *v == var {
                return self.clone();
            }
        }
        let mut bindings = self.bindings.clone();
        bindings.insert(var, term);
        Substitution { bindings }
    }

    /// Unify two terms under this substitution.
    ///
    /// Returns the extended substitution on success and `None` on failure.
    /// Failure is an ordinary value here, not an error: disjunction recovers
    /// from it and the top level reports it as an exhausted answer stream.
    pub fn unifying(&self, u: &Term, v: &Term) -> Option<Substitution> {
        let u = self.walk(u);
        let v = self.walk(v);
        if u.equals(&v) {
            return Some(self.clone());
        }
        match (u, v) {
            (Term::Var(x), t) | (t, Term::Var(x)) => Some(self.extended(x, t)),
            (Term::Cons(uh, ut), Term::Cons(vh, vt)) => {
                self.unifying(&uh, &vh)?.unifying(&ut, &vt)
            }
            (Term::Map(us), Term::Map(vs)) => {
                if us.len() != vs.len() || !us.keys().eq(vs.keys()) {
                    return None;
                }
                // Key sets coincide; fold over the value pairs in the key
                // order fixed by the ordered map.
                let mut sub = self.clone();
                for ((_, uval), vval) in us.iter().zip(vs.values()) {
                    sub = sub.unifying(uval, vval)?;
                }
                Some(sub)
            }
            (Term::Composite(uc), Term::Composite(vc)) => {
                if uc.as_any().type_id() != vc.as_any().type_id() {
                    return None;
                }
                let uch = uc.children();
                let vch = vc.children();
                if uch.len() != vch.len() {
                    return None;
                }
                let mut sub = self.clone();
                for (a, b) in uch.iter().zip(vch.iter()) {
                    sub = sub.unifying(a, b)?;
                }
                Some(sub)
            }
            _ => None,
        }
    }

    /// Like `walk`, but also resolves the children of lists, maps, and
    /// composites, producing a term with no remaining indirections. Free
    /// variables stay in place.
    pub fn deep_walk(&self, term: &Term) -> Term {
        match self.walk(term) {
            Term::Cons(head, tail) => Term::cons(self.deep_walk(&head), self.deep_walk(&tail)),
            Term::Map(entries) => Term::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.deep_walk(v)))
                    .collect(),
            ),
            Term::Composite(c) => {
                let children = c.children().iter().map(|t| self.deep_walk(t)).collect();
                c.rebuild(children)
            }
            resolved => resolved,
        }
    }

    /// The answer form of this substitution.
    ///
    /// Every bound variable maps to its deep resolution, and every free
    /// variable reachable from a binding is replaced by a reified marker.
    /// Marker indices are handed out on first encounter, with bindings
    /// visited in ascending variable identity, so numbering is stable for a
    /// given substitution. Each free variable is itself bound to its marker
    /// in the result, so walking either end of an unconstrained equation
    /// reaches the same marker. The marker table lives and dies with this
    /// call.
    pub fn reified(&self) -> Substitution {
        let mut table = ReifyTable::default();
        let mut out = Substitution::new();
        let mut vars: Vec<Var> = self.bindings.keys().cloned().collect();
        vars.sort_by_key(Var::id);
        for var in vars {
            let resolved = self.reify_term(&Term::Var(var.clone()), &mut table, &mut out);
            out.bindings.insert(var, resolved);
        }
        out
    }

    fn reify_term(&self, term: &Term, table: &mut ReifyTable, out: &mut Substitution) -> Term {
        match self.walk(term) {
            Term::Var(v) => {
                let marker = Term::Reified(table.index_for(&v));
                out.bindings.insert(v, marker.clone());
                marker
            }
            Term::Cons(head, tail) => Term::cons(
                self.reify_term(&head, table, out),
                self.reify_term(&tail, table, out),
            ),
            Term::Map(entries) => Term::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.reify_term(v, table, out)))
                    .collect(),
            ),
            Term::Composite(c) => {
                let children = c
                    .children()
                    .iter()
                    .map(|t| self.reify_term(t, table, out))
                    .collect();
                c.rebuild(children)
            }
            ground => ground,
        }
    }
}

/// Marker numbering for a single reification pass.
#[derive(Debug, Default)]
struct ReifyTable {
    indices: HashMap<Var, usize>,
}

impl ReifyTable {
    fn index_for(&mut self, var: &Var) -> usize {
        let next = self.indices.len();
        *self.indices.entry(var.clone()).or_insert(next)
    }
}
