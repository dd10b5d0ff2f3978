//! Normalization by evaluation for the untyped lambda calculus: terms are
//! evaluated into a domain where application is native, then the resulting
//! value is quoted back into syntax, freshening binder names to avoid
//! capture. Both directions run as trampolined machines so recursion depth
//! stays constant regardless of term size.

pub mod church;
pub mod eval;
pub mod quote;
pub mod term;

pub use eval::{eval, Env, EvalError, Value, ValueRef};
pub use quote::{fresh, quote, Names};
pub use term::{app, lam, render, var, Name, Term, TermRef};

/// Project the name column of an environment, innermost binding first.
pub fn names_of(env: &Env) -> Names {
  env.iter().map(|(name, _)| name.clone()).collect()
}

/// Beta-normalize `term` against `env`, seeding read-back with the names
/// bound by `env` so quoting cannot collide with them.
pub fn normalize(term: TermRef, env: Env) -> Result<TermRef, EvalError> {
  let names = names_of(&env);
  let value = eval::eval(term, env)?;
  quote::quote(value, names)
}
