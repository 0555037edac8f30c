//! Pattern matching for rewriting.

use crate::pattern::Pattern;
use crate::rule::Rule;
use crate::signature::Signature;
use crate::state::{Context, RState, RTTerm, Stack, State, WState};
use crate::term::{Arg, DeBruijn, OptArg, RTerm, Term};

/// Candidate bindings per meta-variable.
///
/// A meta-variable that occurs more than once in a pattern
/// accumulates one candidate per occurrence.
type Candidates = Vec<Vec<RState>>;

/// For a sequence of states,
/// return the term corresponding to its first state
/// if it is convertible with all other states.
///
/// This is used for checking nonlinear pattern matches, because there
/// we want to ensure that all states that were
/// matched with the same variable are convertible.
fn all_convertible<I>(mut iter: I, sig: &Signature) -> Option<RTTerm>
where
    I: Iterator<Item = RState>,
{
    // assure that we have at least one term
    let tm = RTTerm::new(iter.next()?);
    for stn in iter {
        // the first term is only evaluated if we have some other terms
        if !RTerm::convertible(tm.force().clone(), RTerm::from(stn), sig) {
            return None;
        }
    }
    Some(tm)
}

impl Stack {
    /// Determine whether the stack of an abstract machine matches the rule's LHS.
    ///
    /// Return a new machine context containing variable assignments in case of a match.
    pub fn match_flatten(&self, rule: &Rule, sig: &Signature) -> Option<Context> {
        self.match_rule(rule, sig)?
            .into_iter()
            .map(|s| all_convertible(s.into_iter(), sig))
            .rev()
            .collect()
    }

    fn match_rule(&self, rule: &Rule, sig: &Signature) -> Option<Candidates> {
        if self.len() < rule.lhs.args.len() {
            // we do not have enough arguments on the stack to match against
            return None;
        }
        let mut subst = vec![Vec::new(); rule.ctx.len()];
        for (rstate, pat) in self.iter().zip(&rule.lhs.args) {
            rstate.clone().match_pat(pat, sig, &mut subst)?;
        }
        Some(subst)
    }
}

impl RState {
    fn match_pat(self, pat: &Pattern, sig: &Signature, subst: &mut Candidates) -> Option<()> {
        match pat {
            Pattern::Joker => Some(()),
            Pattern::MVar(m, dbs) if dbs.is_empty() => {
                // the state is bound unevaluated
                subst.get_mut(*m)?.push(self);
                Some(())
            }
            Pattern::Symb(sp, pats) => {
                self.whnf(sig);
                let stack = {
                    let state = self.borrow_state();
                    match &*state.term {
                        // The stack and pattern length have to be equal,
                        // to exclude pattern matches like `f (g a) ~ f g`.
                        Term::Symb(st) if sp == st && state.stack.len() == pats.len() => {
                            state.stack.clone()
                        }
                        _ => return None,
                    }
                };
                for (rst, p) in stack.into_iter().zip(pats) {
                    rst.match_pat(p, sig, subst)?;
                }
                Some(())
            }
            // patterns that look under binders operate on the evaluated term
            _ => match_term(pat, RTerm::from(self).whnf(sig), 0, sig, subst),
        }
    }
}

/// Match a pattern against a term under `k` pattern binders.
///
/// The term must be in WHNF whenever the pattern inspects its head;
/// meta-variable patterns bind the term as given.
fn match_term(
    pat: &Pattern,
    tm: RTerm,
    k: usize,
    sig: &Signature,
    subst: &mut Candidates,
) -> Option<()> {
    match pat {
        Pattern::Joker => Some(()),
        Pattern::MVar(m, dbs) => {
            let solved = tm.prune(k, dbs)?.add_lambdas(dbs.len());
            let st = RState::new(WState::new(State::new(solved)));
            subst.get_mut(*m)?.push(st);
            Some(())
        }
        Pattern::Symb(sp, pats) => {
            let whnf = tm.whnf(sig);
            let (head, args) = whnf.head_spine();
            match head {
                Term::Symb(st) if st == sp && args.len() == pats.len() => {
                    for (a, p) in args.iter().zip(pats) {
                        match_term(p, a.clone(), k, sig, subst)?;
                    }
                    Some(())
                }
                _ => None,
            }
        }
        Pattern::BVar(n, pats) => {
            let whnf = tm.whnf(sig);
            let (head, args) = whnf.head_spine();
            match head {
                Term::BVar(n2) if n2 == n && args.len() == pats.len() => {
                    for (a, p) in args.iter().zip(pats) {
                        match_term(p, a.clone(), k, sig, subst)?;
                    }
                    Some(())
                }
                _ => None,
            }
        }
        Pattern::Abst(_, pat) => {
            let whnf = tm.whnf(sig);
            match &*whnf {
                Term::Abst(_, tm) => match_term(pat, tm.clone(), k + 1, sig, subst),
                _ => None,
            }
        }
    }
}

impl RTerm {
    /// Rename the pattern variables `args` to the innermost indices and
    /// rebase all variables free beyond `depth` pattern binders.
    ///
    /// Return `None` if the term mentions a pattern variable outside `args`;
    /// such a term has no representation once the binders are stripped.
    pub(crate) fn prune(self, depth: usize, args: &[DeBruijn]) -> Option<RTerm> {
        self.prune_at(0, depth, args)
    }

    fn prune_at(self, k: usize, depth: usize, args: &[DeBruijn]) -> Option<RTerm> {
        match &*self {
            Term::Type | Term::Kind | Term::Symb(_) => Some(self),
            Term::BVar(n) => {
                if *n < k {
                    // var bound in term
                    return Some(self);
                }
                let v = n - k;
                let n2 = if v < depth {
                    // variable bound by a pattern binder
                    let pos = args.iter().position(|a| *a == v)?;
                    args.len() - 1 - pos + k
                } else {
                    // var free in term
                    n - depth + args.len()
                };
                Some(Self::new(Term::BVar(n2)))
            }
            Term::Abst(arg, tm) => {
                let ty = match arg.ty.clone() {
                    Some(ty) => Some(ty.prune_at(k, depth, args)?),
                    None => None,
                };
                let tm = tm.clone().prune_at(k + 1, depth, args)?;
                let arg = OptArg { id: arg.id.clone(), ty };
                Some(Self::new(Term::Abst(arg, tm)))
            }
            Term::Prod(arg, tm) => {
                let ty = arg.ty.clone().prune_at(k, depth, args)?;
                let tm = tm.clone().prune_at(k + 1, depth, args)?;
                let arg = Arg { id: arg.id.clone(), ty };
                Some(Self::new(Term::Prod(arg, tm)))
            }
            Term::Appl(f, fargs) => {
                let f = f.clone().prune_at(k, depth, args)?;
                let fargs: Option<Vec<_>> = fargs
                    .iter()
                    .map(|a| a.clone().prune_at(k, depth, args))
                    .collect();
                Some(Self::new(Term::Appl(f, fargs?)))
            }
        }
    }

    /// Wrap the term in `n` unannotated abstractions.
    pub(crate) fn add_lambdas(self, n: usize) -> RTerm {
        (0..n).fold(self, |acc, _| {
            let arg = OptArg { id: "_".to_string(), ty: None };
            RTerm::new(Term::Abst(arg, acc))
        })
    }
}
