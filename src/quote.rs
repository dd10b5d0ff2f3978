use std::rc::Rc;

use im::Vector;
use tailcall::trampoline;

use crate::eval::{eval, vvar, EvalError, Value, ValueRef};
use crate::term::{Name, Term, TermRef};

/// Names in scope during read-back, innermost first.
pub type Names = Vector<Name>;

/// Pick a name derived from `name` that does not occur in `used`, appending
/// one apostrophe per retry. The wildcard `"_"` is exempt: it denotes a
/// don't-care binder, is never looked up, and is returned unchanged. The scan
/// walks the whole list per retry, so pathological inputs are slow but the
/// search always terminates (each retry strictly lengthens the candidate).
pub fn fresh(used: &Names, name: &Name) -> Name {
  if name.as_ref() == "_" {
    return name.clone();
  }
  let mut candidate = name.clone();
  while used.iter().any(|used_name| *used_name == candidate) {
    candidate = Name::from(format!("{candidate}'"));
  }
  candidate
}

pub type Continuation = Option<Box<Frame>>;

pub enum Frame {
  // function side quoted: quote the argument next
  Arg(ValueRef, Names, Continuation),
  // argument side quoted: assemble the application
  App(TermRef, Continuation),
  // body quoted: wrap it in its freshened binder
  Bind(Name, Continuation),
}

type Step = (ValueRef, Names, Continuation);
type Outcome = Result<TermRef, EvalError>;

#[inline(always)]
fn cont_or_ret(mut term: TermRef, mut cont: Continuation) -> trampoline::Next<Step, Outcome> {
  loop {
    match cont {
      None => return trampoline::Finish(Ok(term)),
      Some(frame) => match *frame {
        Frame::Arg(arg, names, next) => {
          let cont = Some(Box::new(Frame::App(term, next)));
          return trampoline::Recurse((arg, names, cont));
        },
        Frame::App(fun, next) => {
          term = Rc::new(Term::App(fun, term));
          cont = next;
        },
        Frame::Bind(name, next) => {
          term = Rc::new(Term::Lam(name, term));
          cont = next;
        },
      },
    }
  }
}

#[inline(always)]
pub fn quote_step((value, names, cont): Step) -> trampoline::Next<Step, Outcome> {
  match &*value {
    Value::VVar(name) => cont_or_ret(Rc::new(Term::Var(name.clone())), cont),
    Value::VApp(fun, arg) => {
      let cont = Some(Box::new(Frame::Arg(arg.clone(), names.clone(), cont)));
      trampoline::Recurse((fun.clone(), names, cont))
    },
    Value::VLam(name, body, captured) => {
      // Read back under the binder by running the closure on a fresh opaque
      // variable. Note the asymmetry with `fresh`: a `"_"` binder is pushed
      // onto the used list but never consulted, so nested `"_"` binders are
      // never renamed.
      let picked = fresh(&names, name);
      let mut env = captured.clone();
      env.push_front((name.clone(), vvar(picked.clone())));
      let body = match eval(body.clone(), env) {
        Ok(body) => body,
        Err(err) => return trampoline::Finish(Err(err)),
      };
      let mut names = names;
      names.push_front(picked.clone());
      let cont = Some(Box::new(Frame::Bind(picked, cont)));
      trampoline::Recurse((body, names, cont))
    },
  }
}

/// Read a value back into a beta-normal term, choosing binder names that
/// avoid everything in `names`.
pub fn quote(value: ValueRef, names: Names) -> Result<TermRef, EvalError> {
  trampoline::run(quote_step, (value, names, None))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::eval::Env;
  use crate::term::{app, lam, render, var};
  use crate::normalize;

  #[test]
  fn fresh_primes_until_unused() {
    let used: Names = ["x", "x'", "y"].into_iter().map(Name::from).collect();
    assert_eq!(fresh(&used, &Name::from("x")).as_ref(), "x''");
    assert_eq!(fresh(&used, &Name::from("y")).as_ref(), "y'");
    assert_eq!(fresh(&used, &Name::from("z")).as_ref(), "z");
  }

  #[test]
  fn fresh_never_returns_a_used_name() {
    let used: Names = ["a", "a'", "a''", "b"].into_iter().map(Name::from).collect();
    let picked = fresh(&used, &Name::from("a"));
    assert!(used.iter().all(|name| *name != picked));
  }

  #[test]
  fn wildcard_is_exempt_from_freshening() {
    let used: Names = ["_"].into_iter().map(Name::from).collect();
    assert_eq!(fresh(&used, &Name::from("_")).as_ref(), "_");
  }

  #[test]
  fn quoting_freshens_shadowed_binders() {
    let tm = lam("x", lam("x", var("x")));
    let nf = normalize(tm, Env::new()).unwrap();
    assert_eq!(render(&nf), "(fun x -> (fun x' -> x'))");
  }

  #[test]
  fn environment_names_seed_the_used_list() {
    let mut env = Env::new();
    env.push_front((Name::from("f"), vvar(Name::from("f"))));
    let nf = normalize(lam("f", var("f")), env).unwrap();
    assert_eq!(render(&nf), "(fun f' -> f')");
  }

  #[test]
  fn wildcard_binders_are_never_renamed() {
    let mut env = Env::new();
    env.push_front((Name::from("y"), vvar(Name::from("y"))));
    let nf = normalize(lam("_", lam("_", var("y"))), env).unwrap();
    assert_eq!(render(&nf), "(fun _ -> (fun _ -> y))");
  }

  #[test]
  fn neutral_applications_quote_structurally() {
    let mut env = Env::new();
    env.push_front((Name::from("g"), vvar(Name::from("g"))));
    let nf = normalize(app(var("g"), lam("x", var("x"))), env).unwrap();
    assert_eq!(render(&nf), "(g (fun x -> x))");
  }
}
