/// Argument of a binder.
/// For example, the `x` and `A` in the term `\ x : A => t`.
///
/// Binder identifiers serve only for printing;
/// equality therefore ignores them, making
/// structural equality of terms alpha-equivalence.
#[derive(Clone, Debug)]
pub struct Arg<Ty> {
    pub id: String,
    pub ty: Ty,
}

impl<Ty: PartialEq> PartialEq for Arg<Ty> {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl<Ty: Eq> Eq for Arg<Ty> {}
