use normalizer::church::{add, five};
use normalizer::term::{app, Term};
use normalizer::{normalize, Env};

const TIMES: usize = 8192;

fn main() {
  let add5 = app(add(), five());

  let mut tm = five();
  for _ in 0..TIMES {
    tm = app(add5.clone(), tm);
  }

  let nf = normalize(tm, Env::new()).expect("term is closed");
  let tag = match &*nf {
    Term::Lam(..) => "lam",
    Term::Var(..) => "var",
    Term::App(..) => "app",
  };
  println!("{tag}");
}
