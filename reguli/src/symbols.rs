//! Maps from module paths and names to shared symbols.

use crate::error::SymbolsError as Error;
use crate::symbol::{ModPath, Symbol};
use fnv::FnvHashMap;

/// Map from module paths and names to shared symbols.
///
/// The table distinguishes a *current* module:
/// freshly introduced names go there, and
/// unqualified references resolve there.
/// Names of any other module are referenced fully qualified.
#[derive(Default)]
pub struct Symbols {
    modules: FnvHashMap<ModPath, FnvHashMap<String, Symbol>>,
    current: ModPath,
}

impl Symbols {
    pub fn new() -> Self {
        Default::default()
    }

    /// Make the given module the current one.
    pub fn set_path(&mut self, path: ModPath) {
        self.modules.entry(path.clone()).or_default();
        self.current = path;
    }

    /// Resolve a possibly qualified name to a symbol.
    pub fn get(&self, path: &[String], name: &str) -> Option<Symbol> {
        let path: &[String] = if path.is_empty() { &self.current } else { path };
        self.modules.get(path)?.get(name).cloned()
    }

    /// Introduce a new name in the current module.
    pub fn insert(&mut self, name: String) -> Result<Symbol, Error> {
        let path = self.current.clone();
        self.insert_in(path, name)
    }

    /// Introduce a new name in the given module.
    pub fn insert_in(&mut self, path: ModPath, name: String) -> Result<Symbol, Error> {
        let module = self.modules.entry(path.clone()).or_default();
        if module.contains_key(&name) {
            return Err(Error::Reinsertion);
        }
        let sym = Symbol::new(path, name.clone());
        module.insert(name, sym.clone());
        Ok(sym)
    }
}
