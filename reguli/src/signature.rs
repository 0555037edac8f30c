//! Map from symbols to their types and associated rewrite rules.

use crate::command::Intro;
use crate::error::{SignatureError as Error, TypingError};
use crate::pattern::TopPattern;
use crate::rule::Rule;
use crate::symbol::Symbol;
use crate::term::{RTerm, Term};
use fnv::FnvHashMap;

/// Map from symbols to their types and rewrite rules.
///
/// A symbol is *static* iff it has no entry in the rules map;
/// such a symbol acts as a rigid constructor during matching.
/// A *definable* symbol has an entry whose rule list only ever grows.
///
/// Furthermore, set whether convertibility is checked modulo eta.
pub struct Signature {
    pub types: FnvHashMap<Symbol, RTerm>,
    pub rules: FnvHashMap<Symbol, Vec<Rule>>,
    pub eta: bool,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            types: Default::default(),
            rules: Default::default(),
            eta: true,
        }
    }
}

impl Signature {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the type of a symbol.
    pub fn get_type(&self, sym: &Symbol) -> Option<&RTerm> {
        self.types.get(sym)
    }

    /// Return the rewrite rules whose left-hand side head is the given symbol.
    pub fn get_rules(&self, sym: &Symbol) -> Option<&[Rule]> {
        self.rules.get(sym).map(|rules| rules.as_slice())
    }

    /// Return true if the symbol admits no rewrite rules.
    pub fn is_static(&self, sym: &Symbol) -> bool {
        !self.rules.contains_key(sym)
    }

    fn intro_type(&mut self, sym: Symbol, typ: RTerm) -> Result<(), Error> {
        if self.types.insert(sym, typ).is_some() {
            return Err(Error::Reintroduction);
        }
        Ok(())
    }

    fn intro_rules(&mut self, sym: Symbol, rules: Vec<Rule>) -> Result<(), Error> {
        if self.rules.insert(sym, rules).is_some() {
            return Err(Error::Reintroduction);
        }
        Ok(())
    }

    /// Declare a static symbol of the given type.
    pub fn declare_static(&mut self, sym: Symbol, typ: RTerm) -> Result<(), Error> {
        self.intro_type(sym, typ)
    }

    /// Declare a definable symbol of the given type, without rules.
    pub fn declare_definable(&mut self, sym: Symbol, typ: RTerm) -> Result<(), Error> {
        self.intro_type(sym.clone(), typ)?;
        self.intro_rules(sym, Vec::new())
    }

    /// Add a rewrite rule to an existing definable symbol.
    ///
    /// This performs no admissibility check;
    /// see [`Universe::admit_rule`](crate::Universe::admit_rule) for the gated version.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), Error> {
        self.rules
            .get_mut(&rule.lhs.symbol)
            .ok_or(Error::NonRewritable)?
            .push(rule);
        Ok(())
    }

    /// Introduce a new symbol with the given entry.
    pub fn insert(&mut self, sym: &Symbol, e: Entry) -> Result<(), Error> {
        self.intro_type(sym.clone(), e.typ)?;
        if e.rewritable {
            let rules = match e.term {
                None => Vec::new(),
                Some((tm, _check)) => vec![Rule {
                    ctx: Vec::new(),
                    lhs: TopPattern::from(sym.clone()),
                    rhs: tm,
                }],
            };
            self.intro_rules(sym.clone(), rules)?;
        }
        Ok(())
    }
}

/// Have we assured that a given term matches a given type?
enum Check {
    Checked,
    Unchecked,
}

/// Typed signature entry constructed from an introduction command.
///
/// An introduction command can have many shapes, such as
/// `x: A`, `x := t`, `x: A := t`, ...
/// The type of the newly introduced symbol is
/// inferred from its defining term if not given, and
/// verified to be of a proper sort.
pub struct Entry {
    typ: RTerm,
    term: Option<(RTerm, Check)>,
    rewritable: bool,
}

impl Entry {
    pub fn declare(typ: RTerm, rewritable: bool, sig: &Signature) -> Result<Self, TypingError> {
        match &*typ.infer(sig)? {
            Term::Kind | Term::Type => Ok(Self {
                rewritable,
                typ,
                term: None,
            }),
            _ => Err(TypingError::SortExpected),
        }
    }

    pub fn define(
        oty: Option<RTerm>,
        term: RTerm,
        rewritable: bool,
        sig: &Signature,
    ) -> Result<Self, TypingError> {
        let (typ, check) = match oty {
            None => (term.infer(sig)?, Check::Checked),
            Some(ty) => {
                let _ = ty.infer(sig)?;
                (ty, Check::Unchecked)
            }
        };
        match &*typ {
            Term::Kind => Err(TypingError::UnexpectedKind),
            _ => Ok(Self {
                typ,
                term: Some((term, check)),
                rewritable,
            }),
        }
    }

    /// Verify whether `t: A` if this was not previously checked.
    pub fn check(mut self, sig: &Signature) -> Result<Self, TypingError> {
        match self.term.take() {
            Some((term, Check::Unchecked)) => {
                term.check(sig, self.typ.clone())?;
                self.term = Some((term, Check::Checked));
            }
            other => self.term = other,
        }
        Ok(self)
    }

    /// Construct an entry from an introduction command.
    ///
    /// Constructing an entry from a command of the shape `x: A := t`
    /// does *not* check whether `t: A`; for this, use [`Entry::check`].
    pub fn new(it: Intro<RTerm>, sig: &Signature) -> Result<Self, TypingError> {
        match it {
            Intro::Declaration(ty) => Self::declare(ty, false, sig),
            Intro::Definition(oty, otm) => match (oty, otm) {
                (Some(ty), None) => Self::declare(ty, true, sig),
                (oty, Some(tm)) => Self::define(oty, tm, true, sig),
                (None, None) => Err(TypingError::TypeAndTermEmpty),
            },
            Intro::Theorem(ty, tm) => Self::define(Some(ty), tm, false, sig),
        }
    }

    /// Type of the introduced symbol.
    pub fn typ(&self) -> &RTerm {
        &self.typ
    }

    /// Defining term of the introduced symbol, if any.
    pub fn body(&self) -> Option<&RTerm> {
        self.term.as_ref().map(|(tm, _)| tm)
    }

    /// Return true if the introduced symbol may receive rewrite rules.
    pub fn rewritable(&self) -> bool {
        self.rewritable
    }
}
