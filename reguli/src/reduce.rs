//! Reduction to weak head normal form (WHNF), including rewriting.

use crate::error::Error;
use crate::signature::Signature;
use crate::state::{RState, RTTerm, Stack, State, WState};
use crate::term::{Arg, OptArg, RTerm, Term};

/// Normal form targeted by an evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
    Whnf,
    Snf,
}

/// Configuration of an evaluation directive.
#[derive(Clone, Debug)]
pub struct Config {
    pub target: Target,
    /// maximal number of beta steps and rule firings, if any
    pub steps: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: Target::Snf,
            steps: None,
        }
    }
}

/// Counter of remaining reduction steps.
///
/// When the counter runs out, the machine stops reducing and
/// records that it did, leaving the term only partially evaluated.
/// Only evaluation directives consult the counter;
/// convertibility always reduces without bounds.
pub struct Budget {
    steps: Option<usize>,
    exhausted: bool,
}

impl Budget {
    pub fn new(steps: Option<usize>) -> Self {
        Self {
            steps,
            exhausted: false,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Account for one reduction step; return false if none is left.
    fn tick(&mut self) -> bool {
        match &mut self.steps {
            None => true,
            Some(0) => {
                self.exhausted = true;
                false
            }
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}

impl State {
    /// Evaluate the state to its weak head normal form.
    pub fn whnf(&mut self, sig: &Signature, bdg: &mut Budget) {
        loop {
            trace!("whnf: {}", self.term);
            let term = self.term.clone();
            match &*term {
                Term::Type | Term::Kind | Term::Prod(_, _) => break,
                Term::BVar(x) => match self.ctx.get(*x) {
                    Some(ctm) => {
                        self.term = ctm.force().clone();
                        self.ctx.clear()
                    }
                    None => {
                        if !self.ctx.is_empty() {
                            self.term = RTerm::new(Term::BVar(x - self.ctx.len()));
                            self.ctx.clear();
                        }
                        break;
                    }
                },
                Term::Abst(_, tm) => match self.stack.pop() {
                    None => break,
                    Some(p) => {
                        if !bdg.tick() {
                            self.stack.push(p);
                            break;
                        }
                        self.term = tm.clone();
                        self.ctx.push(RTTerm::new(p));
                    }
                },
                Term::Appl(head, tail) => {
                    for t in tail.iter().rev() {
                        let st = State {
                            ctx: self.ctx.clone(),
                            term: t.clone(),
                            stack: Stack::new(),
                        };
                        self.stack.push(RState::new(WState::new(st)))
                    }
                    self.term = head.clone();
                }
                Term::Symb(s) => match sig.get_rules(s) {
                    None => break,
                    Some(rules) => {
                        match rules
                            .iter()
                            .filter_map(|r| Some((self.stack.match_flatten(r, sig)?, r)))
                            .next()
                        {
                            None => break,
                            Some((subst, rule)) => {
                                if !bdg.tick() {
                                    break;
                                }
                                trace!("rewrite: {} ... ⟶ {}", s, rule);
                                self.ctx = subst;
                                self.term = rule.rhs.clone();
                                self.stack.pop_many(rule.lhs.args.len());
                            }
                        }
                    }
                },
            }
        }
    }
}

impl WState {
    /// Replace the state with its WHNF if it was not in WHNF before.
    fn whnf(&mut self, sig: &Signature) {
        if !self.whnfed {
            self.state.whnf(sig, &mut Budget::unlimited());
            self.whnfed = true
        }
    }
}

impl RState {
    /// Replace the state with its WHNF if it was not in WHNF before.
    pub fn whnf(&self, sig: &Signature) {
        self.borrow_mut().whnf(sig)
    }
}

impl RTerm {
    /// Return the weak head normal form of the term.
    pub fn whnf(self, sig: &Signature) -> Self {
        trace!("whnf of {}", self);
        let mut state = State::new(self);
        state.whnf(sig, &mut Budget::unlimited());
        Self::from(state)
    }

    /// Return the strong normal form of the term.
    pub fn snf(self, sig: &Signature) -> Self {
        self.snf_bdg(sig, &mut Budget::unlimited())
    }

    fn whnf_bdg(self, sig: &Signature, bdg: &mut Budget) -> Self {
        let mut state = State::new(self);
        state.whnf(sig, bdg);
        Self::from(state)
    }

    fn snf_bdg(self, sig: &Signature, bdg: &mut Budget) -> Self {
        let tm = self.whnf_bdg(sig, bdg);
        if bdg.exhausted() {
            return tm;
        }
        match &*tm {
            Term::Kind | Term::Type | Term::Symb(_) | Term::BVar(_) => tm,
            Term::Appl(head, args) => {
                let head = head.clone().snf_bdg(sig, bdg);
                let args = args.iter().map(|a| a.clone().snf_bdg(sig, bdg)).collect();
                Self::new(Term::Appl(head, args))
            }
            Term::Abst(arg, tm) => {
                let ty = arg.ty.clone().map(|ty| ty.snf_bdg(sig, bdg));
                let arg = OptArg { id: arg.id.clone(), ty };
                Self::new(Term::Abst(arg, tm.clone().snf_bdg(sig, bdg)))
            }
            Term::Prod(arg, tm) => {
                let ty = arg.ty.clone().snf_bdg(sig, bdg);
                let arg = Arg { id: arg.id.clone(), ty };
                Self::new(Term::Prod(arg, tm.clone().snf_bdg(sig, bdg)))
            }
        }
    }

    /// Reduce the term according to an evaluation configuration.
    ///
    /// Exceeding the configured step budget aborts with [`Error::Budget`].
    pub fn reduce(self, sig: &Signature, cfg: &Config) -> Result<Self, Error> {
        let mut bdg = Budget::new(cfg.steps);
        let tm = match cfg.target {
            Target::Whnf => self.whnf_bdg(sig, &mut bdg),
            Target::Snf => self.snf_bdg(sig, &mut bdg),
        };
        if bdg.exhausted() {
            Err(Error::Budget)
        } else {
            Ok(tm)
        }
    }
}
