//! Shared symbols carrying their module path.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Path of a module, e.g. `nat` or `lists.sorted`.
pub type ModPath = Vec<String>;

#[derive(Debug, PartialEq, Eq, Hash)]
struct Owned {
    path: ModPath,
    name: String,
}

/// Shared symbol with fast cloning.
///
/// Two symbols are equal iff their module paths and names coincide.
/// Symbols handed out by the same [`Symbols`] table share one allocation,
/// so the common case of comparing such symbols
/// is decided by a pointer comparison.
///
/// [`Symbols`]: crate::symbols::Symbols
#[derive(Clone, Debug)]
pub struct Symbol(Rc<Owned>);

impl Symbol {
    pub fn new(path: ModPath, name: String) -> Self {
        Self(Rc::new(Owned { path, name }))
    }

    pub fn path(&self) -> &[String] {
        &self.0.path
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for p in self.path() {
            write!(f, "{}.", p)?;
        }
        write!(f, "{}", self.name())
    }
}
