//! Scoping of parsed structures to kernel structures.
//!
//! Scoping resolves symbol references through a [`Symbols`] table,
//! turns bound names into de Bruijn indices, and
//! separates rule left-hand sides into the pattern grammar.

use crate::command::{Command as GCommand, Intro as GIntro};
use crate::error::ScopeError as Error;
use crate::parse;
use crate::pattern::{Pattern, TopPattern};
use crate::rule::Rule;
use crate::stack::Stack;
use crate::symbol::Symbol;
use crate::symbols::Symbols;
use crate::term::{Arg, OptArg, RTerm, Term};
use std::convert::TryFrom;

/// Scoped introduction.
pub type Intro = GIntro<RTerm, RTerm>;

/// Scoped command.
pub type Command = GCommand<String, Intro, Rule, RTerm>;

type Bound = Stack<String>;

impl parse::Symbol {
    fn scope(self, syms: &Symbols) -> Result<Symbol, Error> {
        syms.get(&self.path, &self.name)
            .ok_or_else(|| Error::UndeclaredSymbol(self.to_string()))
    }
}

impl parse::Term {
    fn scoper(self, syms: &Symbols, bnd: &mut Bound) -> Result<RTerm, Error> {
        Ok(RTerm::new(self.scopen(syms, bnd)?))
    }

    /// Scope an open term using supplied bound variables.
    fn scopen(self, syms: &Symbols, bnd: &mut Bound) -> Result<Term, Error> {
        match self {
            Self::Symb(sym) if sym.path.is_empty() => {
                if sym.name == "_" {
                    Err(Error::Underscore)
                } else if sym.name == "Type" {
                    Ok(Term::Type)
                } else if let Some(idx) = bnd.iter().position(|id| *id == sym.name) {
                    Ok(Term::BVar(idx))
                } else {
                    Ok(Term::Symb(sym.scope(syms)?))
                }
            }
            Self::Symb(sym) => Ok(Term::Symb(sym.scope(syms)?)),
            Self::Appl(head, tail) => {
                let tail: Result<Vec<_>, _> =
                    tail.into_iter().map(|tm| tm.scoper(syms, bnd)).collect();
                Ok(Term::Appl(head.scoper(syms, bnd)?, tail?))
            }
            Self::Abst(arg, tm) => {
                let ty = arg.ty.clone().map(|ty| ty.scoper(syms, bnd)).transpose()?;
                bnd.with_pushed(arg.id.clone(), |bnd| {
                    let arg = OptArg { id: arg.id, ty };
                    Ok(Term::Abst(arg, tm.scoper(syms, bnd)?))
                })
            }
            Self::Prod(arg, tm) => {
                let ty = arg.ty.clone().scoper(syms, bnd)?;
                bnd.with_pushed(arg.id.clone(), |bnd| {
                    let arg = Arg { id: arg.id, ty };
                    Ok(Term::Prod(arg, tm.scoper(syms, bnd)?))
                })
            }
        }
    }

    /// Scope a closed term.
    pub fn scope(self, syms: &Symbols) -> Result<RTerm, Error> {
        self.scoper(syms, &mut Stack::new())
    }

    /// Scope a rule left-hand side argument into a pattern.
    ///
    /// Names of the rule context become meta-variables,
    /// names bound by pattern abstractions become bound variables, and
    /// the underscore becomes a joker.
    fn scope_pattern(self, syms: &Symbols, mvar: &Bound, bnd: &mut Bound) -> Result<Pattern, Error> {
        match self {
            Self::Symb(sym) if sym.path.is_empty() => {
                if sym.name == "_" {
                    Ok(Pattern::Joker)
                } else if let Some(idx) = bnd.iter().position(|id| *id == sym.name) {
                    Ok(Pattern::BVar(idx, Vec::new()))
                } else if let Some(m) = mvar.iter().position(|id| *id == sym.name) {
                    Ok(Pattern::MVar(m, Vec::new()))
                } else {
                    Ok(Pattern::Symb(sym.scope(syms)?, Vec::new()))
                }
            }
            Self::Symb(sym) => Ok(Pattern::Symb(sym.scope(syms)?, Vec::new())),
            Self::Appl(head, args) => {
                let args: Result<Vec<_>, _> = args
                    .into_iter()
                    .map(|a| a.scope_pattern(syms, mvar, bnd))
                    .collect();
                let args = args?;
                match head.scope_pattern(syms, mvar, bnd)? {
                    Pattern::Symb(s, mut pats) => {
                        pats.extend(args);
                        Ok(Pattern::Symb(s, pats))
                    }
                    Pattern::BVar(n, mut pats) => {
                        pats.extend(args);
                        Ok(Pattern::BVar(n, pats))
                    }
                    Pattern::MVar(m, dbs) if dbs.is_empty() => {
                        // a meta-variable applies only to distinct bound variables
                        let dbs: Option<Vec<_>> = args
                            .iter()
                            .map(|p| match p {
                                Pattern::BVar(n, ps) if ps.is_empty() => Some(*n),
                                _ => None,
                            })
                            .collect();
                        Ok(Pattern::MVar(m, dbs.ok_or(Error::MillerPattern)?))
                    }
                    Pattern::Joker => Err(Error::PatternArguments),
                    _ => Err(Error::NoPrepattern),
                }
            }
            Self::Abst(arg, tm) => bnd.with_pushed(arg.id.clone(), |bnd| {
                let pat = tm.scope_pattern(syms, mvar, bnd)?;
                Ok(Pattern::Abst(arg.id, Box::new(pat)))
            }),
            Self::Prod(..) => Err(Error::NoPrepattern),
        }
    }
}

impl parse::Rule {
    pub fn scope(self, syms: &Symbols) -> Result<Rule, Error> {
        let mut ctx = Vec::new();
        let mut bnd = Stack::new();
        // a context entry's annotation may refer to the entries before it
        for (id, ty) in self.ctx {
            let ty = ty.map(|ty| ty.scoper(syms, &mut bnd)).transpose()?;
            bnd.push(id.clone());
            ctx.push((id, ty));
        }
        let pat = self.lhs.scope_pattern(syms, &bnd, &mut Stack::new())?;
        let lhs = TopPattern::try_from(pat)?;
        let rhs = self.rhs.scoper(syms, &mut bnd)?;
        Ok(Rule { ctx, lhs, rhs })
    }
}

impl parse::Intro {
    pub fn scope(self, syms: &Symbols) -> Result<Intro, Error> {
        self.map_type_err(|tm| tm.scope(syms))?
            .map_term_err(|tm| tm.scope(syms))
    }
}

impl parse::Command {
    pub fn scope(self, syms: &Symbols) -> Result<Command, Error> {
        match self {
            Self::Intro(id, it) => Ok(Command::Intro(id, it.scope(syms)?)),
            Self::Rules(rules) => {
                let rules: Result<_, _> = rules.into_iter().map(|r| r.scope(syms)).collect();
                Ok(Command::Rules(rules?))
            }
            Self::Infer(tm) => Ok(Command::Infer(tm.scope(syms)?)),
            Self::Eval(cfg, tm) => Ok(Command::Eval(cfg, tm.scope(syms)?)),
            Self::Check(prop, mode) => {
                Ok(Command::Check(prop.map_err(|tm| tm.scope(syms))?, mode))
            }
            Self::Require(path) => Ok(Command::Require(path)),
        }
    }
}
