//! Substitution and shifting for terms.

use crate::term::{Arg, OptArg, RTerm, Term};

fn opt_ptr_eq(a: &Option<RTerm>, b: &Option<RTerm>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.ptr_eq(b),
        _ => false,
    }
}

impl RTerm {
    /// Apply a substitution to all variables free at depth `k` or beyond.
    ///
    /// The substitution receives the variable's index and the current depth.
    /// Terms that the substitution leaves unchanged are returned as-is,
    /// without any reallocation.
    pub fn apply_subst<S>(self, subst: &S, k: usize) -> Self
    where
        S: Fn(usize, usize) -> RTerm,
    {
        match &*self {
            Term::BVar(n) if *n >= k => subst(*n, k),
            Term::Appl(f, args) => {
                let f2 = f.clone().apply_subst(subst, k);
                let args2: Vec<RTerm> = args
                    .iter()
                    .map(|a| a.clone().apply_subst(subst, k))
                    .collect();
                if f.ptr_eq(&f2) && args.iter().zip(&args2).all(|(a, a2)| a.ptr_eq(a2)) {
                    self
                } else {
                    Self::new(Term::Appl(f2, args2))
                }
            }
            Term::Abst(arg, tm) => {
                let ty2 = arg.ty.clone().map(|ty| ty.apply_subst(subst, k));
                let tm2 = tm.clone().apply_subst(subst, k + 1);
                if opt_ptr_eq(&arg.ty, &ty2) && tm.ptr_eq(&tm2) {
                    self
                } else {
                    let arg = OptArg { id: arg.id.clone(), ty: ty2 };
                    Self::new(Term::Abst(arg, tm2))
                }
            }
            Term::Prod(arg, tm) => {
                let ty2 = arg.ty.clone().apply_subst(subst, k);
                let tm2 = tm.clone().apply_subst(subst, k + 1);
                if arg.ty.ptr_eq(&ty2) && tm.ptr_eq(&tm2) {
                    self
                } else {
                    let arg = Arg { id: arg.id.clone(), ty: ty2 };
                    Self::new(Term::Prod(arg, tm2))
                }
            }
            _ => self,
        }
    }

    /// Substitute the variable bound at the term's outermost level.
    pub fn subst(self, u: &RTerm) -> Self {
        self.apply_subst(&psubst_single(u), 0)
    }

    /// Return true if the term has no variables free at depth `k` or beyond.
    pub fn closed_under(&self, k: usize) -> bool {
        match &**self {
            Term::BVar(n) => *n < k,
            Term::Appl(f, args) => {
                f.closed_under(k) && args.iter().all(|a| a.closed_under(k))
            }
            Term::Abst(arg, tm) => {
                arg.ty.as_ref().map_or(true, |ty| ty.closed_under(k)) && tm.closed_under(k + 1)
            }
            Term::Prod(arg, tm) => arg.ty.closed_under(k) && tm.closed_under(k + 1),
            _ => true,
        }
    }

    /// Return true if the term has no free variables.
    pub fn closed(&self) -> bool {
        self.closed_under(0)
    }

    /// Remove `rhs` binders from the term's scope.
    ///
    /// Return `None` if the term mentions one of the removed variables.
    pub(crate) fn try_unshift(self, rhs: usize) -> Option<Self> {
        if rhs == 0 {
            return Some(self);
        }
        self.unshift_at(0, rhs)
    }

    fn unshift_at(self, k: usize, rhs: usize) -> Option<Self> {
        match &*self {
            Term::BVar(n) => {
                if *n < k {
                    Some(self)
                } else if *n >= k + rhs {
                    Some(Self::new(Term::BVar(n - rhs)))
                } else {
                    None
                }
            }
            Term::Appl(f, args) => {
                let f = f.clone().unshift_at(k, rhs)?;
                let args: Option<Vec<_>> = args
                    .iter()
                    .map(|a| a.clone().unshift_at(k, rhs))
                    .collect();
                Some(Self::new(Term::Appl(f, args?)))
            }
            Term::Abst(arg, tm) => {
                let ty = match arg.ty.clone() {
                    Some(ty) => Some(ty.unshift_at(k, rhs)?),
                    None => None,
                };
                let tm = tm.clone().unshift_at(k + 1, rhs)?;
                let arg = OptArg { id: arg.id.clone(), ty };
                Some(Self::new(Term::Abst(arg, tm)))
            }
            Term::Prod(arg, tm) => {
                let ty = arg.ty.clone().unshift_at(k, rhs)?;
                let tm = tm.clone().unshift_at(k + 1, rhs)?;
                let arg = Arg { id: arg.id.clone(), ty };
                Some(Self::new(Term::Prod(arg, tm)))
            }
            _ => Some(self),
        }
    }
}

fn psubst_single(u: &RTerm) -> impl Fn(usize, usize) -> RTerm + '_ {
    move |n: usize, k: usize| {
        if n == k {
            u.clone() << k
        } else {
            RTerm::new(Term::BVar(n - 1))
        }
    }
}

/// Definition of `<<` for terms.
#[allow(clippy::suspicious_arithmetic_impl)]
impl std::ops::Shl<usize> for RTerm {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        if rhs == 0 {
            self
        } else {
            self.apply_subst(&|n, _k| RTerm::new(Term::BVar(n + rhs)), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::term::{OptArg, RTerm, Term};

    fn var(n: usize) -> RTerm {
        RTerm::new(Term::BVar(n))
    }

    fn abst(tm: RTerm) -> RTerm {
        let arg = OptArg { id: "x".to_string(), ty: None };
        RTerm::new(Term::Abst(arg, tm))
    }

    #[test]
    fn beta() {
        // (λ x. λ y. x) β0  ~>  λ y. β1
        let body = abst(var(1));
        assert_eq!(body.subst(&var(0)), abst(var(1)));
        // (λ x. λ y. y) β0  ~>  λ y. y
        let body = abst(var(0));
        assert_eq!(body.clone().subst(&var(0)), body);
    }

    #[test]
    fn shift() {
        assert_eq!(abst(var(0)) << 2, abst(var(0)));
        assert_eq!(abst(var(1)) << 2, abst(var(3)));
    }

    #[test]
    fn closed() {
        assert!(abst(var(0)).closed());
        assert!(!abst(var(1)).closed());
        assert!(abst(var(1)).closed_under(1));
    }

    #[test]
    fn unshift() {
        assert_eq!(abst(var(2)).try_unshift(1), Some(abst(var(1))));
        assert_eq!(abst(var(1)).try_unshift(1), None);
        assert_eq!(abst(var(0)).try_unshift(1), Some(abst(var(0))));
    }
}
