// =============================================================================
// COMPOSITE TERMS - THE EXTENSION HOOK
// =============================================================================
// A user-defined composite participates in equality, unification, deep
// walking, and reification through the `Composite` trait.

use std::any::Any;
use std::fmt;

use kanren::{eq, run, Composite, Substitution, Term};

/// A directed edge between two terms.
#[derive(Debug, Clone)]
struct Edge {
    from: Term,
    to: Term,
}

impl Edge {
    fn term(from: Term, to: Term) -> Term {
        Term::composite(Edge { from, to })
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl Composite for Edge {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_composite(&self, other: &dyn Composite) -> bool {
        other
            .as_any()
            .downcast_ref::<Edge>()
            .map_or(false, |o| self.from.equals(&o.from) && self.to.equals(&o.to))
    }

    fn children(&self) -> Vec<Term> {
        vec![self.from.clone(), self.to.clone()]
    }

    fn rebuild(&self, children: Vec<Term>) -> Term {
        let mut children = children.into_iter();
        match (children.next(), children.next()) {
            (Some(from), Some(to)) => Edge::term(from, to),
            _ => Term::composite(self.clone()),
        }
    }
}

/// A differently-typed composite with the same child count as `Edge`.
#[derive(Debug, Clone)]
struct Interval {
    low: Term,
    high: Term,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

impl Composite for Interval {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_composite(&self, other: &dyn Composite) -> bool {
        other
            .as_any()
            .downcast_ref::<Interval>()
            .map_or(false, |o| self.low.equals(&o.low) && self.high.equals(&o.high))
    }

    fn children(&self) -> Vec<Term> {
        vec![self.low.clone(), self.high.clone()]
    }

    fn rebuild(&self, children: Vec<Term>) -> Term {
        let mut children = children.into_iter();
        match (children.next(), children.next()) {
            (Some(low), Some(high)) => Term::composite(Interval { low, high }),
            _ => Term::composite(self.clone()),
        }
    }
}

#[test]
fn composite_equality_is_structural() {
    let a = Edge::term(Term::from(1), Term::from(2));
    let b = Edge::term(Term::from(1), Term::from(2));
    let c = Edge::term(Term::from(2), Term::from(1));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn composites_of_different_types_never_unify() {
    let edge = Edge::term(Term::from(1), Term::from(2));
    let interval = Term::composite(Interval {
        low: Term::from(1),
        high: Term::from(2),
    });
    assert_ne!(edge, interval);
    assert_eq!(run(&eq(edge, interval)).count(), 0);
}

#[test]
fn unification_recurses_into_composite_children() {
    let x = Term::var("x");
    let y = Term::var("y");
    let left = Edge::term(Term::from(1), x.clone());
    let right = Edge::term(y.clone(), Term::from(2));

    let answers: Vec<Substitution> = run(&eq(left, right)).collect();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].walk(&x), Term::from(2));
    assert_eq!(answers[0].walk(&y), Term::from(1));
}

#[test]
fn deep_walk_rebuilds_composites() {
    let x = Term::var("x");
    let out = Term::var("out");
    let goal = eq(out.clone(), Edge::term(x.clone(), Term::from(2))) & eq(x, 1);

    let answers: Vec<Substitution> = run(&goal).collect();
    let resolved = answers[0].deep_walk(&out);
    assert_eq!(resolved, Edge::term(Term::from(1), Term::from(2)));
    assert_eq!(resolved.to_string(), "1 -> 2");
}

#[test]
fn reification_reaches_composite_children() {
    let out = Term::var("out");
    let w = Term::var("w");
    let goal = eq(out.clone(), Edge::term(Term::from(1), w));

    let answers: Vec<Substitution> = run(&goal).collect();
    let reified = answers[0].reified();
    assert_eq!(reified.walk(&out).to_string(), "1 -> _₀");
}
