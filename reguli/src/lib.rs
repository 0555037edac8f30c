#![forbid(unsafe_code)]

//! Type checking for the lambda-Pi calculus modulo rewriting.
//!
//! Users communicate with this library using *commands*.
//! A command introduces a new name (by declaration, definition, or theorem),
//! adds rewrite rules to previously introduced names, or
//! issues a directive: infer a type, evaluate a term,
//! check or assert a property, or load a compiled module.
//!
//! The state of a checking session is a [`Universe`]:
//! it owns the table of [`Symbols`], the [`Signature`]
//! (recording types and rewrite rules attached to symbols), and
//! the records of all processed modules.
//!
//! How is a user command processed?
//! A command is parsed from a string to yield a [`parse::Command`],
//! whose names are then resolved against the symbol table
//! by [`scope`](parse::Command::scope)-ing it.
//! The scoped command is then executed on the universe:
//! introductions are type-checked and inserted into the signature, and
//! rewrite rules are admitted only after verifying that
//! rewriting with them preserves typing.
//!
//! The following example checks a few commands on a fresh universe:
//!
//! ~~~
//! use reguli::{parse, Universe};
//!
//! let cmds = r#"
//!     (; natural numbers ;)
//!     nat : Type.
//!     zero : nat.
//!     succ : nat -> nat.
//!
//!     (; definable symbol with rewrite rules ;)
//!     def add : nat -> nat -> nat.
//!     [n] add n zero --> n.
//!     [n, m] add n (succ m) --> succ (add n m).
//!
//!     #ASSERT add (succ zero) (succ zero) == succ (succ zero).
//! "#;
//!
//! let mut uni = Universe::new();
//! uni.open(vec!["example".to_string()])?;
//!
//! let mut input = cmds.as_bytes();
//! while !input.is_empty() {
//!     let (rest, cmd) = parse::parse_toplevel(input)?;
//!     input = rest;
//!     if let Some(cmd) = cmd {
//!         let cmd = cmd.scope(&uni.syms)?;
//!         uni.handle(cmd)?;
//!     }
//! }
//! uni.close();
//! # Ok::<_, reguli::Error>(())
//! ~~~

#[macro_use]
extern crate log;

pub mod arg;
pub mod command;
pub mod error;
pub mod ofile;
pub mod parse;
pub mod pattern;
pub mod reduce;
pub mod rule;
pub mod scope;
pub mod signature;
pub mod symbol;
pub mod symbols;
pub mod term;
pub mod universe;

mod convertible;
mod matching;
mod rulecheck;
mod stack;
mod state;
mod subst;
mod typing;

pub use command::Command;
pub use error::Error;
pub use pattern::Pattern;
pub use reduce::{Config, Target};
pub use rule::Rule;
pub use signature::Signature;
pub use symbol::{ModPath, Symbol};
pub use symbols::Symbols;
pub use term::{RTerm, Term};
pub use universe::Universe;
