//! Type inference and checking for terms.

use crate::error::TypingError as Error;
use crate::signature::Signature;
use crate::stack::Stack;
use crate::term::{Arg, RTerm, Term};
use std::fmt;

type Result<T> = std::result::Result<T, Error>;

/// Map from de Bruijn indices to associated types.
pub(crate) type LCtx = Stack<RTerm>;

impl LCtx {
    fn get_type(&self, n: usize) -> Option<RTerm> {
        Some(self.get(n)?.clone() << (n + 1))
    }

    fn bind<A, F>(&mut self, arg: RTerm, f: F) -> Result<A>
    where
        F: FnOnce(&mut LCtx) -> Result<A>,
    {
        self.with_pushed(arg, f)
    }

    fn bind_of_type<A, F>(&mut self, sig: &Signature, arg: RTerm, f: F) -> Result<A>
    where
        F: FnOnce(&mut LCtx) -> Result<A>,
    {
        match &*arg.clone().infern(sig, self)? {
            Term::Type => self.bind(arg, f),
            _ => Err(Error::BindNoType),
        }
    }
}

impl fmt::Display for LCtx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.iter().enumerate() {
            write!(f, "{} : {}, ", Term::BVar(i), x.clone() << (i + 1))?;
        }
        write!(f, "]")
    }
}

impl RTerm {
    /// Infer the type of a closed term.
    pub fn infer(&self, sig: &Signature) -> Result<RTerm> {
        self.infern(sig, &mut LCtx::new())
    }

    /// Check whether a closed term is of a given type.
    pub fn check(&self, sig: &Signature, ty_exp: RTerm) -> Result<()> {
        self.checkn(sig, &mut LCtx::new(), ty_exp)
    }

    /// Infer the type of an open term using supplied types of bound variables.
    pub(crate) fn infern(&self, sig: &Signature, lc: &mut LCtx) -> Result<RTerm> {
        debug!("infer type of {}", self);
        match &**self {
            Term::Kind => Err(Error::KindNotTypable),
            Term::Type => Ok(RTerm::new(Term::Kind)),
            Term::Symb(s) => sig.get_type(s).cloned().ok_or(Error::TypeNotFound),
            Term::BVar(x) => lc.get_type(*x).ok_or(Error::TypeNotFound),
            Term::Appl(f, args) => {
                args.iter().try_fold(f.infern(sig, lc)?, |ty, arg| {
                    let whnf = ty.whnf(sig);
                    match &*whnf {
                        Term::Prod(Arg { ty: a, .. }, b) => {
                            arg.checkn(sig, lc, a.clone())?;
                            Ok(b.clone().subst(arg))
                        }
                        _ => Err(Error::ProductExpected),
                    }
                })
            }
            Term::Abst(arg, tm) => match &arg.ty {
                Some(ty) => {
                    let tm_ty = lc.bind_of_type(sig, ty.clone(), |lc| tm.infern(sig, lc))?;
                    match &*tm_ty {
                        Term::Kind => Err(Error::UnexpectedKind),
                        _ => {
                            let arg = Arg { id: arg.id.clone(), ty: ty.clone() };
                            Ok(RTerm::new(Term::Prod(arg, tm_ty)))
                        }
                    }
                }
                None => Err(Error::DomainFreeAbstraction),
            },
            Term::Prod(arg, tm) => {
                let tm_ty = lc.bind_of_type(sig, arg.ty.clone(), |lc| tm.infern(sig, lc))?;
                match &*tm_ty {
                    Term::Kind | Term::Type => Ok(tm_ty),
                    _ => Err(Error::SortExpected),
                }
            }
        }
    }

    /// Check whether an open term is of the given type,
    /// using supplied types of bound variables.
    pub(crate) fn checkn(&self, sig: &Signature, lc: &mut LCtx, ty_exp: RTerm) -> Result<()> {
        debug!("check {} is of type {} when {}", self, ty_exp, lc);
        match &**self {
            Term::Abst(arg, tm) => {
                let whnf = ty_exp.whnf(sig);
                let (ty_a, ty_b) = match &*whnf {
                    Term::Prod(Arg { ty, .. }, tm_b) => (ty.clone(), tm_b.clone()),
                    _ => return Err(Error::ProductExpected),
                };
                if let Some(ty) = &arg.ty {
                    let _ = ty.infern(sig, lc)?;
                    if !RTerm::convertible(ty.clone(), ty_a.clone(), sig) {
                        return Err(Error::Unconvertible(Box::new((ty_a, ty.clone()))));
                    }
                }
                lc.bind(ty_a, |lc| tm.checkn(sig, lc, ty_b))
            }
            _ => {
                let ty_inf = self.infern(sig, lc)?;
                debug!("checking convertibility: {} ~ {}", ty_inf, ty_exp);
                if RTerm::convertible(ty_inf.clone(), ty_exp.clone(), sig) {
                    Ok(())
                } else {
                    Err(Error::Unconvertible(Box::new((ty_exp, ty_inf))))
                }
            }
        }
    }
}
