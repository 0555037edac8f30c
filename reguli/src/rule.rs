//! Rewrite rules.

use crate::error::ScopeError as Error;
use crate::pattern::{Pattern, TopPattern};
use crate::term::RTerm;
use std::fmt::{self, Display};

/// Rewrite rule.
///
/// The context binds one entry per meta-variable;
/// an entry consists of an identifier and an optional type annotation.
/// The right-hand side refers to the meta-variables as bound variables,
/// the innermost index denoting the last context entry.
#[derive(Clone, Debug)]
pub struct Rule {
    /// context (meta-variables)
    pub ctx: Vec<(String, Option<RTerm>)>,
    /// left-hand side (pattern to match with)
    pub lhs: TopPattern,
    /// right-hand side (term to replace with)
    pub rhs: RTerm,
}

fn all_distinct(dbs: &[usize]) -> bool {
    dbs.iter()
        .enumerate()
        .all(|(i, v)| dbs[..i].iter().all(|w| w != v))
}

fn collect(pat: &Pattern, arities: &mut [Option<usize>]) -> Result<(), Error> {
    match pat {
        Pattern::MVar(m, dbs) => {
            if !all_distinct(dbs) {
                return Err(Error::MillerPattern);
            }
            match arities.get_mut(*m).ok_or(Error::MillerPattern)? {
                Some(a) if *a != dbs.len() => Err(Error::MillerArity),
                Some(_) => Ok(()),
                a => {
                    *a = Some(dbs.len());
                    Ok(())
                }
            }
        }
        Pattern::Symb(_, pats) | Pattern::BVar(_, pats) => {
            pats.iter().try_for_each(|p| collect(p, arities))
        }
        Pattern::Abst(_, pat) => collect(pat, arities),
        Pattern::Joker => Ok(()),
    }
}

impl Rule {
    /// Number of meta-variables bound by the rule.
    pub fn arity(&self) -> usize {
        self.ctx.len()
    }

    /// Validate the left-hand side:
    /// arguments of a meta-variable must be distinct,
    /// its occurrences must agree on their argument count, and
    /// every context entry must occur at least once.
    pub fn check_patterns(&self) -> Result<(), Error> {
        let mut arities = vec![None; self.ctx.len()];
        for pat in &self.lhs.args {
            collect(pat, &mut arities)?;
        }
        if arities.iter().any(|a| a.is_none()) {
            return Err(Error::MillerUnused);
        }
        Ok(())
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}
