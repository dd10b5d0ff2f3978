use expect_test::expect;

use normalizer::church::{add, five, mult, numeral};
use normalizer::term::{app, render, Term};
use normalizer::{normalize, Env};

#[test]
fn addition_of_church_numerals() {
  let ten = normalize(app(app(add(), five()), five()), Env::new()).unwrap();
  let expected = expect!["(fun f -> (fun x -> (f (f (f (f (f (f (f (f (f (f x))))))))))))"];
  expected.assert_eq(&render(&ten));
}

#[test]
fn multiplication_of_church_numerals() {
  let twenty_five = normalize(app(app(mult(), five()), five()), Env::new()).unwrap();
  let expected = expect![
    "(fun f -> (fun x -> (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f (f x)))))))))))))))))))))))))))"
  ];
  expected.assert_eq(&render(&twenty_five));
}

#[test]
fn normal_forms_are_already_normal() {
  let ten = normalize(app(app(add(), five()), five()), Env::new()).unwrap();
  let again = normalize(ten.clone(), Env::new()).unwrap();
  assert_eq!(render(&ten), render(&again));
}

#[test]
fn normalizing_agrees_with_direct_numerals() {
  let sum = normalize(app(app(add(), numeral(3)), numeral(4)), Env::new()).unwrap();
  assert_eq!(render(&sum), render(&numeral(7)));
}

// Stress for the stack-depth requirement: the driver-sized chain of 8192
// additions must normalize without overflowing on evaluation, read-back,
// rendering, or teardown.
#[test]
fn deep_application_chains_normalize() {
  let add5 = app(add(), five());
  let mut tm = five();
  for _ in 0..8192 {
    tm = app(add5.clone(), tm);
  }
  let nf = normalize(tm, Env::new()).unwrap();
  assert!(matches!(&*nf, Term::Lam(..)));
  let rendered = render(&nf);
  // 5 + 5 * 8192 applications of `f`
  assert_eq!(rendered.matches("(f ").count(), 40965);
}
