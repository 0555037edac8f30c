//! Admissibility checking for rewrite rules.
//!
//! Before a rule is admitted to its head symbol, this pass verifies that
//! rewriting with the rule preserves typing:
//! the left-hand side is typed against the head symbol's type,
//! determining the types of the rule's meta-variables along the way, and
//! the right-hand side is then checked against the left-hand side's type.
//! A rule failing any part of this leaves the signature untouched.

use crate::error::{RuleError as Error, TypingError};
use crate::pattern::{Pattern, TopPattern};
use crate::rule::Rule;
use crate::signature::Signature;
use crate::stack::Stack;
use crate::term::{Arg, DeBruijn, OptArg, RTerm, Term};
use crate::typing::LCtx;

type Result<T> = std::result::Result<T, Error>;

/// Types of the rule's meta-variables, in rule scope, as far as known.
type Metas = Vec<Option<RTerm>>;

/// Verify that a candidate rule preserves typing.
pub fn check(rule: &Rule, sig: &Signature) -> std::result::Result<(), crate::error::Error> {
    rule.check_patterns()?;
    let arity = rule.arity();
    let (lhs, full) = elaborate(&rule.lhs, arity);

    let mut metas: Metas = vec![None; full];
    // annotated context entries seed the solution
    for (i, (_id, ty)) in rule.ctx.iter().enumerate() {
        if let Some(ty) = ty {
            metas[arity - 1 - i] = Some(ty.clone() << (arity - i));
        }
    }

    // fold the head symbol's type through the pattern arguments
    let head_ty = sig
        .get_type(&lhs.symbol)
        .cloned()
        .ok_or(Error::Typing(TypingError::TypeNotFound))?;
    let mut lctx = Stack::new();
    let mut ty = head_ty;
    for pat in &lhs.args {
        let whnf = ty.whnf(sig);
        let (a, b) = match &*whnf {
            Term::Prod(Arg { ty, .. }, tm) => (ty.clone(), tm.clone()),
            _ => return Err(Error::Typing(TypingError::ProductExpected).into()),
        };
        check_pat(pat, a, &mut lctx, 0, &mut metas, sig)?;
        ty = b.subst(&pat_term(pat, 0));
    }
    let lhs_ty = ty;

    // the solved meta-variable types must form a well-ordered context
    let mut lc = LCtx::new();
    for m in (0..full).rev() {
        let ty = metas[m].take().ok_or(Error::Untyped(m))?;
        let ty = ty.try_unshift(m + 1).ok_or(Error::ContextOrder(m))?;
        match &*ty.infern(sig, &mut lc).map_err(Error::Typing)? {
            Term::Kind | Term::Type => (),
            _ => return Err(Error::Typing(TypingError::SortExpected).into()),
        }
        lc.push(ty);
    }

    rule.rhs.checkn(sig, &mut lc, lhs_ty).map_err(Error::Typing)?;
    Ok(())
}

/// Replace each joker by a fresh meta-variable
/// applied to every pattern binder in scope.
///
/// The fresh meta-variables extend the context at its outer end,
/// so all existing indices remain valid.
/// Return the elaborated pattern and the extended context size.
fn elaborate(lhs: &TopPattern, arity: usize) -> (TopPattern, usize) {
    let mut next = arity;
    let args = lhs.args.iter().map(|p| elab(p, 0, &mut next)).collect();
    let lhs = TopPattern {
        symbol: lhs.symbol.clone(),
        args,
    };
    (lhs, next)
}

fn elab(pat: &Pattern, k: usize, next: &mut usize) -> Pattern {
    match pat {
        Pattern::Joker => {
            let m = *next;
            *next += 1;
            Pattern::MVar(m, (0..k).rev().collect())
        }
        Pattern::Symb(s, pats) => {
            Pattern::Symb(s.clone(), pats.iter().map(|p| elab(p, k, next)).collect())
        }
        Pattern::BVar(n, pats) => {
            Pattern::BVar(*n, pats.iter().map(|p| elab(p, k, next)).collect())
        }
        Pattern::MVar(m, dbs) => Pattern::MVar(*m, dbs.clone()),
        Pattern::Abst(id, p) => Pattern::Abst(id.clone(), Box::new(elab(p, k + 1, next))),
    }
}

/// Check a pattern against its expected type under `k` pattern binders,
/// recording or verifying the types of the meta-variables it contains.
fn check_pat(
    pat: &Pattern,
    expected: RTerm,
    lctx: &mut Stack<RTerm>,
    k: usize,
    metas: &mut Metas,
    sig: &Signature,
) -> Result<()> {
    match pat {
        Pattern::Joker => Ok(()),
        Pattern::MVar(m, dbs) => {
            let ty = meta_type(&expected, dbs, lctx, k).ok_or(Error::HoleType(*m))?;
            match &metas[*m] {
                None => {
                    metas[*m] = Some(ty);
                    Ok(())
                }
                Some(prev) => {
                    if RTerm::convertible(prev.clone(), ty.clone(), sig) {
                        Ok(())
                    } else {
                        Err(Error::TypeMismatch(Box::new((prev.clone(), ty))))
                    }
                }
            }
        }
        Pattern::Symb(s, pats) => {
            let head_ty = sig
                .get_type(s)
                .cloned()
                .ok_or(Error::Typing(TypingError::TypeNotFound))?;
            let ty = fold_args(head_ty, pats, lctx, k, metas, sig)?;
            require_conv(ty, expected, sig)
        }
        Pattern::BVar(n, pats) => {
            let head_ty = lctx
                .get(*n)
                .map(|ty| ty.clone() << (n + 1))
                .ok_or(Error::Typing(TypingError::TypeNotFound))?;
            let ty = fold_args(head_ty, pats, lctx, k, metas, sig)?;
            require_conv(ty, expected, sig)
        }
        Pattern::Abst(_, p) => {
            let whnf = expected.whnf(sig);
            match &*whnf {
                Term::Prod(Arg { ty: a, .. }, b) => {
                    let (a, b) = (a.clone(), b.clone());
                    lctx.with_pushed(a, |lctx| check_pat(p, b, lctx, k + 1, metas, sig))
                }
                _ => Err(Error::Typing(TypingError::ProductExpected)),
            }
        }
    }
}

fn require_conv(found: RTerm, expected: RTerm, sig: &Signature) -> Result<()> {
    if RTerm::convertible(found.clone(), expected.clone(), sig) {
        Ok(())
    } else {
        Err(Error::Typing(TypingError::Unconvertible(Box::new((
            expected, found,
        )))))
    }
}

/// Fold the head's type through the argument patterns,
/// yielding the type of the whole application.
fn fold_args(
    head_ty: RTerm,
    pats: &[Pattern],
    lctx: &mut Stack<RTerm>,
    k: usize,
    metas: &mut Metas,
    sig: &Signature,
) -> Result<RTerm> {
    let mut ty = head_ty;
    for p in pats {
        let whnf = ty.whnf(sig);
        let (a, b) = match &*whnf {
            Term::Prod(Arg { ty, .. }, tm) => (ty.clone(), tm.clone()),
            _ => return Err(Error::Typing(TypingError::ProductExpected)),
        };
        check_pat(p, a, lctx, k, metas, sig)?;
        ty = b.subst(&pat_term(p, k));
    }
    Ok(ty)
}

/// Read a pattern back as a term, under `k` pattern binders.
fn pat_term(pat: &Pattern, k: usize) -> RTerm {
    match pat {
        Pattern::MVar(m, dbs) => {
            let args = dbs.iter().map(|v| RTerm::new(Term::BVar(*v))).collect();
            RTerm::new(Term::BVar(k + m)).apply(args)
        }
        Pattern::Symb(s, pats) => {
            let args = pats.iter().map(|p| pat_term(p, k)).collect();
            RTerm::new(Term::Symb(s.clone())).apply(args)
        }
        Pattern::BVar(n, pats) => {
            let args = pats.iter().map(|p| pat_term(p, k)).collect();
            RTerm::new(Term::BVar(*n)).apply(args)
        }
        Pattern::Abst(id, p) => {
            let arg = OptArg { id: id.clone(), ty: None };
            RTerm::new(Term::Abst(arg, pat_term(p, k + 1)))
        }
        Pattern::Joker => unreachable!("jokers are elaborated before typing"),
    }
}

/// Compute the type of a meta-variable applied to the pattern variables `dbs`:
/// the expected type of the application, abstracted over the variables' types.
///
/// Return `None` if the result would mention a pattern binder outside `dbs`.
fn meta_type(expected: &RTerm, dbs: &[DeBruijn], lctx: &Stack<RTerm>, k: usize) -> Option<RTerm> {
    let mut ty = expected.clone().prune(k, dbs)?;
    for (i, v) in dbs.iter().enumerate().rev() {
        let dom = lctx.get(*v)?.clone() << (v + 1);
        let dom = dom.prune(k, &dbs[..i])?;
        let arg = Arg { id: "_".to_string(), ty: dom };
        ty = RTerm::new(Term::Prod(arg, ty));
    }
    Some(ty)
}
