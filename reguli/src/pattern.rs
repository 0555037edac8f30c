//! Rewrite patterns.

use crate::symbol::Symbol;
use crate::term::{fmt_appl, DeBruijn};
use std::fmt::{self, Display};

/// Index of a meta-variable bound by a rewrite rule's context.
///
/// Meta-variables are numbered like de Bruijn indices:
/// the last context entry has index 0.
/// This makes a rule's right-hand side a plain term
/// whose meta-variables are bound variables.
pub type Miller = usize;

/// Rewrite pattern.
///
/// Patterns may be nonlinear; e.g. `eq X X` is a valid pattern.
/// Matching such a pattern requires the terms matched by
/// the repeated meta-variable to be convertible.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// symbol applied to patterns
    Symb(Symbol, Vec<Pattern>),
    /// meta-variable applied to distinct lambda-bound variables
    MVar(Miller, Vec<DeBruijn>),
    /// lambda-bound variable applied to patterns
    BVar(DeBruijn, Vec<Pattern>),
    /// abstraction inside a pattern argument
    Abst(String, Box<Pattern>),
    /// matches any term
    Joker,
}

/// Pattern at the left-hand side of a rewrite rule.
///
/// The top pattern of a rule must be an application of patterns to a symbol.
/// This is to exclude rules matching any term, such as `[X] X --> f`.
#[derive(Clone, Debug)]
pub struct TopPattern {
    pub symbol: Symbol,
    pub args: Vec<Pattern>,
}

impl From<Symbol> for TopPattern {
    fn from(symbol: Symbol) -> Self {
        let args = Vec::new();
        Self { symbol, args }
    }
}

impl std::convert::TryFrom<Pattern> for TopPattern {
    type Error = crate::error::ScopeError;

    fn try_from(p: Pattern) -> Result<Self, Self::Error> {
        match p {
            Pattern::Symb(symbol, args) => Ok(TopPattern { symbol, args }),
            _ => Err(crate::error::ScopeError::NoTopPattern),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symb(s, pats) => fmt_appl(s, pats, f),
            Self::MVar(m, dbs) => {
                let dbs: Vec<_> = dbs.iter().map(|v| format!("β{}", v)).collect();
                fmt_appl(&format!("μ{}", m), &dbs, f)
            }
            Self::BVar(n, pats) => fmt_appl(&format!("β{}", n), pats, f),
            Self::Abst(id, pat) => write!(f, "(λ {}. {})", id, pat),
            Self::Joker => write!(f, "_"),
        }
    }
}

impl Display for TopPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_appl(&self.symbol, &self.args, f)
    }
}
