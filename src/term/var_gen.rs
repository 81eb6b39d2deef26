use std::cell::Cell;

use crate::term::Term;

/// Hands out lambda variable ids for one compilation.
///
/// A fresh generator per compilation keeps output deterministic: the same
/// query and parameters always number their variables the same way.
#[derive(Debug)]
pub struct VarGen {
    next: Cell<u32>,
}

impl Default for VarGen {
    fn default() -> Self {
        Self { next: Cell::new(1) }
    }
}

impl VarGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&self) -> u32 {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }

    /// Build a one-argument function term from a body builder.
    pub fn lambda<E>(&self, body: impl FnOnce(Term) -> Result<Term, E>) -> Result<Term, E> {
        let id = self.fresh();
        let body = body(Term::Var(id))?;
        Ok(Term::func(vec![id], body))
    }

    pub fn lambda2<E>(&self, body: impl FnOnce(Term, Term) -> Result<Term, E>) -> Result<Term, E> {
        let a = self.fresh();
        let b = self.fresh();
        let body = body(Term::Var(a), Term::Var(b))?;
        Ok(Term::func(vec![a, b], body))
    }
}
