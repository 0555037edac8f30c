//! Commands that drive a universe.

use crate::reduce;
use crate::symbol::ModPath;
use std::fmt::{self, Display};

/// Command that changes or queries the universe.
#[derive(Clone, Debug)]
pub enum Command<Id, It, Ru, Tm> {
    /// Introduce a new name
    Intro(Id, It),
    /// Add rewrite rules
    Rules(Vec<Ru>),
    /// Infer the type of a term
    Infer(Tm),
    /// Evaluate a term
    Eval(reduce::Config, Tm),
    /// Check or assert a property of terms
    Check(Prop<Tm>, Mode),
    /// Load a previously compiled module
    Require(ModPath),
}

/// The way we introduce a new name.
#[derive(Clone, Debug)]
pub enum Intro<Ty, Tm = Ty> {
    Definition(Option<Ty>, Option<Tm>),
    Theorem(Ty, Tm),
    Declaration(Ty),
}

impl<Ty, Tm> Intro<Ty, Tm> {
    /// Only constants introduced by definitions are rewritable.
    pub fn rewritable(&self) -> bool {
        match self {
            Self::Definition(..) => true,
            Self::Declaration(_) | Self::Theorem(..) => false,
        }
    }

    /// Apply a function to the type of the introduced constant, if given.
    pub fn map_type_err<U, E>(self, f: impl FnOnce(Ty) -> Result<U, E>) -> Result<Intro<U, Tm>, E> {
        Ok(match self {
            Self::Definition(ty, tm) => Intro::Definition(ty.map(f).transpose()?, tm),
            Self::Theorem(ty, tm) => Intro::Theorem(f(ty)?, tm),
            Self::Declaration(ty) => Intro::Declaration(f(ty)?),
        })
    }

    /// Apply a function to the term of the introduced constant, if given.
    pub fn map_term_err<U, E>(self, f: impl FnOnce(Tm) -> Result<U, E>) -> Result<Intro<Ty, U>, E> {
        Ok(match self {
            Self::Definition(ty, tm) => Intro::Definition(ty, tm.map(f).transpose()?),
            Self::Theorem(ty, tm) => Intro::Theorem(ty, f(tm)?),
            Self::Declaration(ty) => Intro::Declaration(ty),
        })
    }
}

/// Property of terms that a directive checks.
#[derive(Clone, Debug)]
pub enum Prop<Tm> {
    /// the two terms are convertible
    Conv(Tm, Tm),
    /// the first term has the second as type
    Typed(Tm, Tm),
}

impl<Tm> Prop<Tm> {
    pub fn map_err<U, E>(self, f: impl Fn(Tm) -> Result<U, E>) -> Result<Prop<U>, E> {
        Ok(match self {
            Self::Conv(t, u) => Prop::Conv(f(t)?, f(u)?),
            Self::Typed(t, a) => Prop::Typed(f(t)?, f(a)?),
        })
    }
}

/// The way a property check reports failure.
#[derive(Clone, Copy, Debug)]
pub struct Mode {
    /// abort on failure instead of merely warning
    pub fatal: bool,
    /// expect the property *not* to hold
    pub negated: bool,
}

impl<Ty: Display, Tm: Display> Display for Intro<Ty, Tm> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Definition(Some(ty), Some(tm)) | Self::Theorem(ty, tm) => {
                write!(f, ": {} := {}", ty, tm)
            }
            Self::Definition(Some(ty), None) | Self::Declaration(ty) => write!(f, ": {}", ty),
            Self::Definition(None, tm) => tm.iter().try_for_each(|tm| write!(f, ":= {}", tm)),
        }
    }
}

impl<Tm: Display> Display for Prop<Tm> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Conv(t, u) => write!(f, "{} == {}", t, u),
            Self::Typed(t, a) => write!(f, "{} : {}", t, a),
        }
    }
}
