//! Church numeral builders shared by the driver and the scenario tests.

use crate::term::{app, lam, var, TermRef};

/// `fun f -> fun x -> f (f (... (f x)))` with `f` applied `n` times.
pub fn numeral(n: u32) -> TermRef {
  let mut body = var("x");
  for _ in 0..n {
    body = app(var("f"), body);
  }
  lam("f", lam("x", body))
}

pub fn five() -> TermRef {
  numeral(5)
}

/// `fun m -> fun n -> fun f -> fun x -> m f (n f x)`
pub fn add() -> TermRef {
  lam(
    "m",
    lam(
      "n",
      lam(
        "f",
        lam(
          "x",
          app(
            app(var("m"), var("f")),
            app(app(var("n"), var("f")), var("x")),
          ),
        ),
      ),
    ),
  )
}

/// `fun m -> fun n -> fun f -> m (n f)`
pub fn mult() -> TermRef {
  lam(
    "m",
    lam("n", lam("f", app(var("m"), app(var("n"), var("f"))))),
  )
}
