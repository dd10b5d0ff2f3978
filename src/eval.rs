use std::mem;
use std::rc::Rc;

use im::Vector;
use tailcall::trampoline;
use thiserror::Error;

use crate::term::{Name, Term, TermRef};

/// Semantic domain. `VLam` is a closure as data: the unevaluated body plus
/// the environment it captured, entered on demand by the machine.
#[derive(Debug, Clone)]
pub enum Value {
  VVar(Name),
  VApp(ValueRef, ValueRef),
  VLam(Name, TermRef, Env),
}

pub type ValueRef = Rc<Value>;

/// Persistent association list, innermost binding first. Extending by
/// `push_front` shares the tail with every environment forked off it, so a
/// closure captures its defining chain without copying.
pub type Env = Vector<(Name, ValueRef)>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
  #[error("unbound variable `{0}`")]
  Unbound(Name),
}

#[inline(always)]
pub fn vvar(name: Name) -> ValueRef {
  Rc::new(Value::VVar(name))
}
#[inline(always)]
pub fn vapp(fun: ValueRef, arg: ValueRef) -> ValueRef {
  Rc::new(Value::VApp(fun, arg))
}
#[inline(always)]
pub fn vlam(name: Name, body: TermRef, env: Env) -> ValueRef {
  Rc::new(Value::VLam(name, body, env))
}

#[inline(always)]
fn lookup(env: &Env, name: &Name) -> Option<ValueRef> {
  env.iter().find(|(bound, _)| bound == name).map(|(_, val)| val.clone())
}

pub type Continuation = Option<Box<Frame>>;

pub enum Frame {
  // function value ready: evaluate the argument next
  Arg(TermRef, Env, Continuation),
  // argument value ready: apply the function value to it
  Apply(ValueRef, Continuation),
}

type Step = (TermRef, Env, Continuation);
type Outcome = Result<ValueRef, EvalError>;

#[inline(always)]
fn cont_or_ret(mut val: ValueRef, mut cont: Continuation) -> trampoline::Next<Step, Outcome> {
  loop {
    match cont {
      None => return trampoline::Finish(Ok(val)),
      Some(frame) => match *frame {
        Frame::Arg(arg, env, next) => {
          let cont = Some(Box::new(Frame::Apply(val, next)));
          return trampoline::Recurse((arg, env, cont));
        },
        Frame::Apply(fun, next) => {
          // The beta step: entering the closure is a machine transition, not
          // a nested call. A `VApp` is only built when the head is not a
          // `VLam`, which keeps the domain neutral and ready for quoting.
          if let Value::VLam(name, body, captured) = &*fun {
            let mut env = captured.clone();
            env.push_front((name.clone(), val));
            return trampoline::Recurse((body.clone(), env, next));
          }
          val = vapp(fun, val);
          cont = next;
        },
      },
    }
  }
}

#[inline(always)]
pub fn eval_step((term, env, cont): Step) -> trampoline::Next<Step, Outcome> {
  match &*term {
    Term::Var(name) => match lookup(&env, name) {
      Some(val) => cont_or_ret(val, cont),
      None => trampoline::Finish(Err(EvalError::Unbound(name.clone()))),
    },
    Term::Lam(name, body) => {
      let val = vlam(name.clone(), body.clone(), env);
      cont_or_ret(val, cont)
    },
    Term::App(fun, arg) => {
      let cont = Some(Box::new(Frame::Arg(arg.clone(), env.clone(), cont)));
      trampoline::Recurse((fun.clone(), env, cont))
    },
  }
}

/// Evaluate `term` against `env`. Referencing a name absent from `env` is a
/// contract violation reported as `EvalError::Unbound`, never defaulted.
pub fn eval(term: TermRef, env: Env) -> Result<ValueRef, EvalError> {
  trampoline::run(eval_step, (term, env, None))
}

impl Value {
  fn take_children(&mut self, out: &mut Vec<ValueRef>) {
    match self {
      Value::VVar(_) => (),
      Value::VApp(fun, arg) => {
        out.push(mem::replace(fun, hole()));
        out.push(mem::replace(arg, hole()));
      },
      Value::VLam(_, _, env) => {
        for (_, val) in mem::take(env) {
          out.push(val);
        }
      },
    }
  }
}

#[inline(always)]
fn hole() -> ValueRef {
  Rc::new(Value::VVar(Name::from("")))
}

// Neutral application spines grow as deep as the term being normalized.
impl Drop for Value {
  fn drop(&mut self) {
    let mut stack = Vec::new();
    self.take_children(&mut stack);
    while let Some(val) = stack.pop() {
      if let Ok(mut val) = Rc::try_unwrap(val) {
        val.take_children(&mut stack);
      }
    }
  }
}
