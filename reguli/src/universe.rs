//! The universe: symbols, signature, and loaded modules.

use crate::command::{Mode, Prop};
use crate::error::{Error, ModuleError, SymbolsError};
use crate::ofile;
use crate::rule::Rule;
use crate::rulecheck;
use crate::scope::{Command, Intro};
use crate::signature::{Entry, Signature};
use crate::symbol::{ModPath, Symbol};
use crate::symbols::Symbols;
use crate::term::RTerm;
use fnv::FnvHashMap;

/// Record of a symbol introduction.
pub struct IntroRecord {
    pub sym: Symbol,
    pub rewritable: bool,
    pub typ: RTerm,
    /// defining term of a definition; it acts as the symbol's first rule
    pub body: Option<RTerm>,
}

/// Record of a module's own declarations and rules.
///
/// A rule declared here may have a head symbol owned by another module;
/// serialisation keeps it in the declaring module, and
/// loading replays it onto the head symbol's live rule list.
#[derive(Default)]
pub struct Module {
    pub deps: Vec<ModPath>,
    pub intros: Vec<IntroRecord>,
    pub rules: Vec<Rule>,
}

/// Global state threaded through the command dispatcher.
///
/// The universe owns the symbol table, the signature, and
/// the records of all processed and loaded modules.
/// All mutation goes through [`Universe::handle`] and [`Universe::require`];
/// reduction and type checking only ever read from it.
pub struct Universe {
    pub syms: Symbols,
    pub sig: Signature,
    modules: FnvHashMap<ModPath, Module>,
    loading: Vec<ModPath>,
    current: ModPath,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            syms: Symbols::new(),
            sig: Signature::new(),
            modules: Default::default(),
            loading: Vec::new(),
            current: Vec::new(),
        }
    }
}

impl Universe {
    pub fn new() -> Self {
        Default::default()
    }

    /// Begin processing a module from source.
    pub fn open(&mut self, path: ModPath) -> Result<(), Error> {
        if self.loading.contains(&path) {
            return Err(ModuleError::Cycle(path.join(".")).into());
        }
        self.loading.push(path.clone());
        self.syms.set_path(path.clone());
        self.modules.entry(path.clone()).or_default();
        self.current = path;
        Ok(())
    }

    /// Finish processing the module opened last.
    pub fn close(&mut self) {
        self.loading.pop();
    }

    /// Process a single scoped command.
    ///
    /// Return the term that the command evaluates to, if any.
    pub fn handle(&mut self, cmd: Command) -> Result<Option<RTerm>, Error> {
        match cmd {
            Command::Intro(id, it) => {
                self.intro(id, it)?;
                Ok(None)
            }
            Command::Rules(rules) => {
                rules.into_iter().try_for_each(|r| self.admit_rule(r))?;
                Ok(None)
            }
            Command::Infer(tm) => {
                let ty = tm.infer(&self.sig)?;
                Ok(Some(ty.snf(&self.sig)))
            }
            Command::Eval(cfg, tm) => {
                // the term is typed first, so evaluation only sees valid terms
                let _ = tm.infer(&self.sig)?;
                Ok(Some(tm.reduce(&self.sig, &cfg)?))
            }
            Command::Check(prop, mode) => {
                self.check(prop, mode)?;
                Ok(None)
            }
            Command::Require(path) => {
                if self.modules.contains_key(&path) {
                    Ok(None)
                } else {
                    Err(ModuleError::NotLoaded(path.join(".")).into())
                }
            }
        }
    }

    fn intro(&mut self, id: String, it: Intro) -> Result<(), Error> {
        let rewritable = it.rewritable();
        let sym = match self.syms.insert(id.clone()) {
            Ok(sym) => sym,
            Err(SymbolsError::Reinsertion) => {
                // redeclarations keep the first declaration and carry on
                warn!("redeclaration of {}", id);
                return Ok(());
            }
        };
        let entry = Entry::new(it, &self.sig)?.check(&self.sig)?;
        if let Some(m) = self.modules.get_mut(&self.current) {
            m.intros.push(IntroRecord {
                sym: sym.clone(),
                rewritable,
                typ: entry.typ().clone(),
                body: if rewritable { entry.body().cloned() } else { None },
            });
        }
        self.sig.insert(&sym, entry)?;
        Ok(())
    }

    /// Verify a candidate rule and append it to its head symbol.
    pub fn admit_rule(&mut self, rule: Rule) -> Result<(), Error> {
        rulecheck::check(&rule, &self.sig)?;
        self.sig.add_rule(rule.clone())?;
        if let Some(m) = self.modules.get_mut(&self.current) {
            m.rules.push(rule);
        }
        Ok(())
    }

    fn check(&self, prop: Prop<RTerm>, mode: Mode) -> Result<(), Error> {
        let holds = match &prop {
            Prop::Conv(t, u) => RTerm::convertible(t.clone(), u.clone(), &self.sig),
            Prop::Typed(t, a) => t.check(&self.sig, a.clone()).is_ok(),
        };
        if holds != mode.negated {
            Ok(())
        } else if mode.fatal {
            Err(Error::Assertion(prop))
        } else {
            warn!("check failed: {}", prop);
            Ok(())
        }
    }

    /// Load a previously compiled module, along with its dependencies,
    /// and record it as a dependency of the current module.
    ///
    /// The reader function maps a module path to the module's object file.
    pub fn require<F>(&mut self, path: &ModPath, read: &mut F) -> Result<(), Error>
    where
        F: FnMut(&ModPath) -> Result<Vec<u8>, Error>,
    {
        self.ensure_loaded(path, read)?;
        if let Some(m) = self.modules.get_mut(&self.current) {
            if !m.deps.contains(path) {
                m.deps.push(path.clone());
            }
        }
        Ok(())
    }

    fn ensure_loaded<F>(&mut self, path: &ModPath, read: &mut F) -> Result<(), Error>
    where
        F: FnMut(&ModPath) -> Result<Vec<u8>, Error>,
    {
        if self.modules.contains_key(path) {
            return Ok(());
        }
        if self.loading.contains(path) {
            return Err(ModuleError::Cycle(path.join(".")).into());
        }
        self.loading.push(path.clone());
        let bytes = read(path)?;
        let result = self.load(path, &bytes, read);
        self.loading.pop();
        result
    }

    /// Re-materialise a module from its object file:
    /// load its dependencies, re-declare its symbols, and
    /// re-attach its rules to their head symbols.
    ///
    /// Rules are replayed without another admissibility check;
    /// they were checked when the module was compiled.
    fn load<F>(&mut self, path: &ModPath, bytes: &[u8], read: &mut F) -> Result<(), Error>
    where
        F: FnMut(&ModPath) -> Result<Vec<u8>, Error>,
    {
        let mut rd = ofile::Reader::new(bytes)?;
        let stored = rd.path()?;
        if stored != *path {
            return Err(ModuleError::NotLoaded(path.join(".")).into());
        }
        let deps = rd.deps()?;
        for dep in &deps {
            self.ensure_loaded(dep, read)?;
        }

        let mut module = Module { deps, ..Default::default() };
        for _ in 0..rd.count()? {
            let (name, rewritable, typ, body) = rd.intro(&self.syms)?;
            let sym = self.syms.insert_in(path.clone(), name)?;
            if rewritable {
                self.sig.declare_definable(sym.clone(), typ.clone())?;
            } else {
                self.sig.declare_static(sym.clone(), typ.clone())?;
            }
            if let Some(body) = body.clone() {
                self.sig.add_rule(Rule {
                    ctx: Vec::new(),
                    lhs: crate::pattern::TopPattern::from(sym.clone()),
                    rhs: body,
                })?;
            }
            module.intros.push(IntroRecord { sym, rewritable, typ, body });
        }
        for _ in 0..rd.count()? {
            let rule = rd.rule(&self.syms)?;
            self.sig.add_rule(rule.clone())?;
            module.rules.push(rule);
        }
        self.modules.insert(path.clone(), module);
        Ok(())
    }

    /// Serialise the record of the current module.
    pub fn compiled(&self) -> Option<Vec<u8>> {
        let m = self.modules.get(&self.current)?;
        let mut w = ofile::Writer::new(&self.current);
        w.deps(&m.deps);
        w.begin_intros(m.intros.len());
        for it in &m.intros {
            w.intro(it.sym.name(), it.rewritable, &it.typ, it.body.as_ref());
        }
        w.begin_rules(m.rules.len());
        for rule in &m.rules {
            w.rule(rule);
        }
        Some(w.finish())
    }
}
