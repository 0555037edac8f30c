//! Terms for the lambda-Pi calculus.

use crate::symbol::Symbol;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::rc::Rc;

/// De Bruijn variable.
pub type DeBruijn = usize;

/// Argument of a product; its type is mandatory.
pub type Arg = crate::arg::Arg<RTerm>;

/// Argument of an abstraction; its type may be omitted.
pub type OptArg = crate::arg::Arg<Option<RTerm>>;

/// Term for the lambda-Pi calculus.
///
/// Applications are kept in a left-leaning spine shape:
/// the head of an `Appl` is never an `Appl` itself, so that
/// head and arguments can be recovered by a single match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Term {
    Kind,
    Type,
    Symb(Symbol),
    BVar(DeBruijn),
    Appl(RTerm, Vec<RTerm>),
    Abst(OptArg, RTerm),
    Prod(Arg, RTerm),
}

/// Pointer to a shared term.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RTerm(Rc<Term>);

impl RTerm {
    /// Create a term pointer from a term.
    pub fn new(tm: Term) -> Self {
        Self(Rc::new(tm))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Apply some terms to the term, preserving the spine shape.
    pub fn apply(self, mut args: Vec<RTerm>) -> Self {
        if args.is_empty() {
            return self;
        }
        if let Term::Appl(f, args1) = &*self {
            let mut args1 = args1.clone();
            args1.append(&mut args);
            return Self::new(Term::Appl(f.clone(), args1));
        }
        Self::new(Term::Appl(self, args))
    }
}

impl Term {
    /// Split a term into its head and its spine arguments.
    pub fn head_spine(&self) -> (&Term, &[RTerm]) {
        match self {
            Self::Appl(head, args) => (&**head, args),
            _ => (self, &[]),
        }
    }
}

impl Deref for RTerm {
    type Target = Term;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Term> for RTerm {
    fn from(tm: Term) -> Self {
        Self::new(tm)
    }
}

pub(crate) fn fmt_appl<H, T>(head: &H, tail: &[T], f: &mut fmt::Formatter) -> fmt::Result
where
    H: Display,
    T: Display,
{
    let parens = !tail.is_empty();
    if parens {
        write!(f, "(")?;
    };
    write!(f, "{}", head)?;
    for t in tail {
        write!(f, " {}", t)?;
    }
    if parens {
        write!(f, ")")?;
    };
    Ok(())
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Kind => write!(f, "Kind"),
            Self::Type => write!(f, "Type"),
            Self::Symb(s) => s.fmt(f),
            Self::BVar(x) => write!(f, "β{}", x),
            Self::Appl(head, tail) => fmt_appl(head, tail, f),
            Self::Abst(arg, tm) => match &arg.ty {
                Some(ty) => write!(f, "(λ {} : {}. {})", arg.id, ty, tm),
                None => write!(f, "(λ {}. {})", arg.id, tm),
            },
            Self::Prod(arg, tm) => write!(f, "(Π {} : {}. {})", arg.id, arg.ty, tm),
        }
    }
}

impl Display for RTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (**self).fmt(f)
    }
}
