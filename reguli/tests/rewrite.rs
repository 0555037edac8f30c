//! Rewriting: rule admissibility, matching, and evaluation.

mod util;

use reguli::error::RuleError;
use reguli::Error;
use util::{process, universe};

const NAT: &str = r#"
    nat : Type.
    zero : nat.
    succ : nat -> nat.
"#;

#[test]
fn higher_order_argument() {
    let mut uni = universe("id");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def id : (nat -> nat) -> nat -> nat.
        [n] id (x => x) n --> n.
        #ASSERT id (y => y) (succ (succ zero)) == succ (succ zero).
    "#;
    process(&mut uni, cmds).unwrap();
    // a non-identity argument does not match
    process(&mut uni, "#ASSERTNOT id (y => succ y) zero == zero.").unwrap();
}

#[test]
fn miller_pattern() {
    let mut uni = universe("diff");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def peel : (nat -> nat) -> nat -> nat.
        [f, n] peel (x => succ (f x)) n --> f n.
        #ASSERT peel (x => succ (succ x)) zero == succ zero.
    "#;
    process(&mut uni, cmds).unwrap();
}

#[test]
fn nonlinear_convertible_instances() {
    let mut uni = universe("eqn");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def add : nat -> nat -> nat.
        [n] add n zero --> n.
        def eqn : nat -> nat -> nat.
        [x] eqn x x --> x.
        #ASSERT eqn zero zero == zero.
        #ASSERT eqn (add zero zero) zero == zero.
        #ASSERTNOT eqn zero (succ zero) == zero.
    "#;
    process(&mut uni, cmds).unwrap();
}

#[test]
fn nonlinear_not_admissible() {
    let mut uni = universe("bad");
    process(&mut uni, NAT).unwrap();
    process(&mut uni, "bool : Type. def g : nat -> bool -> nat.").unwrap();
    match process(&mut uni, "[x] g x x --> zero.") {
        Err(Error::Rule(RuleError::TypeMismatch(_))) => (),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn ill_typed_rhs_not_admissible() {
    let mut uni = universe("bad");
    process(&mut uni, NAT).unwrap();
    process(&mut uni, "bool : Type. tt : bool. def f : nat -> nat.").unwrap();
    match process(&mut uni, "[x] f x --> tt.") {
        Err(Error::Rule(RuleError::Typing(_))) => (),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn unused_context_variable_rejected() {
    let mut uni = universe("bad");
    process(&mut uni, NAT).unwrap();
    process(&mut uni, "def f : nat -> nat.").unwrap();
    match process(&mut uni, "[x, y] f x --> x.") {
        Err(Error::Scope(reguli::error::ScopeError::MillerUnused)) => (),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn rule_on_static_symbol_rejected() {
    let mut uni = universe("bad");
    process(&mut uni, NAT).unwrap();
    match process(&mut uni, "[n] succ n --> n.") {
        Err(Error::Signature(reguli::error::SignatureError::NonRewritable)) => (),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn first_matching_rule_fires() {
    let mut uni = universe("order");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def h : nat -> nat.
        [x] h x --> zero.
        [x] h x --> succ zero.
        #ASSERT h (succ zero) == zero.
        #ASSERTNOT h (succ zero) == succ zero.
    "#;
    process(&mut uni, cmds).unwrap();
}

#[test]
fn jokers_match_anything() {
    let mut uni = universe("joker");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def fst : nat -> nat -> nat.
        [x] fst x _ --> x.
        #ASSERT fst zero (succ zero) == zero.
    "#;
    process(&mut uni, cmds).unwrap();
}

#[test]
fn step_budget_recoverable() {
    let mut uni = universe("loop");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def loop : nat.
        [] loop --> loop.
    "#;
    process(&mut uni, cmds).unwrap();
    match process(&mut uni, "#EVAL[SNF,100] loop.") {
        Err(Error::Budget) => (),
        r => panic!("unexpected result: {:?}", r),
    }
    // the universe stays usable after an exhausted evaluation
    process(&mut uni, "#ASSERT zero == zero.").unwrap();
}

#[test]
fn whnf_does_not_reduce_arguments() {
    let mut uni = universe("lazy");
    process(&mut uni, NAT).unwrap();
    let cmds = r#"
        def loop : nat.
        [] loop --> loop.
        def fst : nat -> nat -> nat.
        [x] fst x _ --> x.
    "#;
    process(&mut uni, cmds).unwrap();
    // the diverging argument is discarded without being evaluated
    process(&mut uni, "#EVAL[SNF,100] fst zero loop.").unwrap();
}
