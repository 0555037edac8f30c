//! Abstract machines for the lazy evaluation of terms.

use crate::stack;
use crate::term::{RTerm, Term};
use lazy_st::Thunk;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// An abstract machine representing arguments applied to a substituted term.
///
/// This representation allows for the lazy evaluation of terms.
///
/// See section 5.1 of the following reference:
/// Asperti, A.; Ricciotti, W.; Sacerdoti Coen, C.; Tassi, E. (2009).
/// "A compact kernel for the calculus of inductive constructions".
/// *Sadhana*. **34**: 71–144.
/// doi: [10.1007/s12046-009-0003-3](https://doi.org/10.1007%2Fs12046-009-0003-3).
#[derive(Clone)]
pub struct State {
    pub ctx: Context,
    pub term: RTerm,
    pub stack: Stack,
}

impl State {
    /// Construct a new state from a term.
    ///
    /// This does not yet evaluate anything.
    pub fn new(term: RTerm) -> Self {
        Self {
            ctx: Context::new(),
            term,
            stack: Stack::new(),
        }
    }
}

/// Map from de Bruijn indices in the term of the abstract machine to lazy terms.
pub type Context = stack::Stack<RTTerm>;

/// Arguments to the abstract machine term.
pub type Stack = stack::Stack<RState>;

/// A shared lazy term constructed from a shared mutable state.
#[derive(Clone)]
pub struct RTTerm(Rc<Thunk<RState, RTerm>>);

impl RTTerm {
    pub fn new(st: RState) -> Self {
        Self(Rc::new(Thunk::new(st)))
    }

    /// Force evaluation of the lazy term.
    pub fn force(&self) -> &RTerm {
        &**self.0
    }
}

/// A shared mutable state.
///
/// We use `RefCell` instead of `Thunk` here
/// because evaluation requires a signature and
/// because we sometimes wish to access the original state.
#[derive(Clone)]
pub struct RState(Rc<RefCell<WState>>);

impl RState {
    pub fn new(wst: WState) -> Self {
        Self(Rc::new(RefCell::new(wst)))
    }

    pub fn borrow(&self) -> Ref<WState> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<WState> {
        self.0.borrow_mut()
    }

    /// Obtain a reference to the state.
    pub fn borrow_state(&self) -> Ref<State> {
        Ref::map(self.borrow(), |wst| &wst.state)
    }
}

/// A state that tracks whether it was reduced to WHNF yet.
pub struct WState {
    pub(crate) state: State,
    pub(crate) whnfed: bool,
}

impl WState {
    pub fn new(state: State) -> Self {
        let whnfed = false;
        Self { state, whnfed }
    }
}

impl lazy_st::Evaluate<RTerm> for RState {
    fn evaluate(self) -> RTerm {
        RTerm::from(self)
    }
}

impl From<RState> for RTerm {
    fn from(s: RState) -> Self {
        RTerm::from(s.borrow_state().clone())
    }
}

impl From<State> for RTerm {
    fn from(state: State) -> Self {
        state
            .term
            .psubst(&state.ctx)
            .apply(state.stack.into_iter().map(Self::from).collect())
    }
}

impl RTerm {
    fn psubst(self, args: &Context) -> Self {
        if args.is_empty() {
            self
        } else {
            self.apply_subst(&psubst(args), 0)
        }
    }
}

fn psubst(args: &Context) -> impl Fn(usize, usize) -> RTerm + '_ {
    move |n: usize, k: usize| match args.get(n - k) {
        Some(arg) => arg.force().clone() << k,
        None => RTerm::new(Term::BVar(n - args.len())),
    }
}
