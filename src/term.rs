use std::fmt;
use std::mem;
use std::rc::Rc;

pub type Name = Rc<str>;
pub type TermRef = Rc<Term>;

/// Lambda calculus syntax. Subterms are shared, never mutated, so repeated
/// wrapping builds a DAG rather than a tree.
#[derive(Debug, Clone)]
pub enum Term {
  Var(Name),
  Lam(Name, TermRef),
  App(TermRef, TermRef),
}

#[inline(always)]
pub fn var(name: &str) -> TermRef {
  Rc::new(Term::Var(Name::from(name)))
}
#[inline(always)]
pub fn lam(name: &str, body: TermRef) -> TermRef {
  Rc::new(Term::Lam(Name::from(name), body))
}
#[inline(always)]
pub fn app(fun: TermRef, arg: TermRef) -> TermRef {
  Rc::new(Term::App(fun, arg))
}

/// Canonical fully parenthesized rendering. Driven by an explicit work stack
/// so application spines thousands of nodes deep render without unwinding a
/// call per node.
pub fn render(term: &Term) -> String {
  enum Piece<'a> {
    Term(&'a Term),
    Text(&'a str),
  }

  let mut out = String::new();
  let mut stack = vec![Piece::Term(term)];
  while let Some(piece) = stack.pop() {
    match piece {
      Piece::Text(text) => out.push_str(text),
      Piece::Term(term) => match term {
        Term::Var(name) => out.push_str(name),
        Term::Lam(name, body) => {
          out.push_str("(fun ");
          out.push_str(name);
          out.push_str(" -> ");
          stack.push(Piece::Text(")"));
          stack.push(Piece::Term(body.as_ref()));
        },
        Term::App(fun, arg) => {
          out.push('(');
          stack.push(Piece::Text(")"));
          stack.push(Piece::Term(arg.as_ref()));
          stack.push(Piece::Text(" "));
          stack.push(Piece::Term(fun.as_ref()));
        },
      },
    }
  }
  out
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&render(self))
  }
}

impl Term {
  fn take_children(&mut self, out: &mut Vec<TermRef>) {
    match self {
      Term::Var(_) => (),
      Term::Lam(_, body) => out.push(mem::replace(body, hole())),
      Term::App(fun, arg) => {
        out.push(mem::replace(fun, hole()));
        out.push(mem::replace(arg, hole()));
      },
    }
  }
}

#[inline(always)]
fn hole() -> TermRef {
  Rc::new(Term::Var(Name::from("")))
}

// Deep application spines would otherwise drop with one call frame per node.
impl Drop for Term {
  fn drop(&mut self) {
    let mut stack = Vec::new();
    self.take_children(&mut stack);
    while let Some(term) = stack.pop() {
      if let Ok(mut term) = Rc::try_unwrap(term) {
        term.take_children(&mut stack);
      }
    }
  }
}
