//! Binary object files for compiled modules.
//!
//! An object file records a module's dependencies, its declarations
//! (name, staticity, type) and the rewrite rules it declared,
//! including rules whose head symbol lives in another module.
//! Binders are stored as de Bruijn indices;
//! symbol references are stored as (module path, name) pairs and
//! relinked through the symbol table on load.

use crate::error::DecodeError as Error;
use crate::pattern::{Pattern, TopPattern};
use crate::rule::Rule;
use crate::symbol::{ModPath, Symbol};
use crate::symbols::Symbols;
use crate::term::{Arg, OptArg, RTerm, Term};

const MAGIC: &[u8; 4] = b"rgo\0";
const VERSION: u8 = 1;

/// Encoder for one module.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new(path: &ModPath) -> Self {
        let mut w = Self { buf: Vec::new() };
        w.buf.extend_from_slice(MAGIC);
        w.u8(VERSION);
        w.path(path);
        w
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn u8(&mut self, x: u8) {
        self.buf.push(x)
    }

    fn u32(&mut self, x: u32) {
        self.buf.extend_from_slice(&x.to_le_bytes())
    }

    fn str(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes())
    }

    fn path(&mut self, path: &[String]) {
        self.u32(path.len() as u32);
        path.iter().for_each(|p| self.str(p))
    }

    fn symbol(&mut self, sym: &Symbol) {
        self.path(sym.path());
        self.str(sym.name())
    }

    pub fn deps(&mut self, deps: &[ModPath]) {
        self.u32(deps.len() as u32);
        deps.iter().for_each(|d| self.path(d))
    }

    pub fn begin_intros(&mut self, count: usize) {
        self.u32(count as u32)
    }

    pub fn intro(&mut self, name: &str, rewritable: bool, typ: &RTerm, body: Option<&RTerm>) {
        self.str(name);
        self.u8(rewritable as u8);
        self.term(typ);
        match body {
            None => self.u8(0),
            Some(body) => {
                self.u8(1);
                self.term(body)
            }
        }
    }

    pub fn begin_rules(&mut self, count: usize) {
        self.u32(count as u32)
    }

    pub fn rule(&mut self, rule: &Rule) {
        self.u32(rule.ctx.len() as u32);
        rule.ctx.iter().for_each(|(id, _ty)| self.str(id));
        self.symbol(&rule.lhs.symbol);
        self.u32(rule.lhs.args.len() as u32);
        rule.lhs.args.iter().for_each(|p| self.pattern(p));
        self.term(&rule.rhs)
    }

    fn term(&mut self, tm: &RTerm) {
        match &**tm {
            Term::Kind => self.u8(0),
            Term::Type => self.u8(1),
            Term::BVar(x) => {
                self.u8(2);
                self.u32(*x as u32)
            }
            Term::Symb(s) => {
                self.u8(3);
                self.symbol(s)
            }
            Term::Appl(head, args) => {
                self.u8(4);
                self.term(head);
                self.u32(args.len() as u32);
                args.iter().for_each(|a| self.term(a))
            }
            Term::Abst(arg, tm) => {
                self.u8(5);
                self.str(&arg.id);
                match &arg.ty {
                    None => self.u8(0),
                    Some(ty) => {
                        self.u8(1);
                        self.term(ty)
                    }
                }
                self.term(tm)
            }
            Term::Prod(arg, tm) => {
                self.u8(6);
                self.str(&arg.id);
                self.term(&arg.ty);
                self.term(tm)
            }
        }
    }

    fn pattern(&mut self, pat: &Pattern) {
        match pat {
            Pattern::Symb(s, pats) => {
                self.u8(0);
                self.symbol(s);
                self.u32(pats.len() as u32);
                pats.iter().for_each(|p| self.pattern(p))
            }
            Pattern::MVar(m, dbs) => {
                self.u8(1);
                self.u32(*m as u32);
                self.u32(dbs.len() as u32);
                dbs.iter().for_each(|v| self.u32(*v as u32))
            }
            Pattern::BVar(n, pats) => {
                self.u8(2);
                self.u32(*n as u32);
                self.u32(pats.len() as u32);
                pats.iter().for_each(|p| self.pattern(p))
            }
            Pattern::Abst(id, p) => {
                self.u8(3);
                self.str(id);
                self.pattern(p)
            }
            Pattern::Joker => self.u8(4),
        }
    }
}

/// Decoder for one module.
///
/// The caller drives the decoding in the order the sections were written;
/// this allows it to register symbols between the entries it reads,
/// so that later entries can refer to earlier ones.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, Error> {
        let mut r = Self { buf };
        if r.take(MAGIC.len())? != &MAGIC[..] || r.u8()? != VERSION {
            return Err(Error::BadMagic);
        }
        Ok(r)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.buf.len() < n {
            return Err(Error::UnexpectedEnd);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<usize, Error> {
        let mut le = [0; 4];
        le.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(le) as usize)
    }

    fn str(&mut self) -> Result<String, Error> {
        let len = self.u32()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::Utf8)
    }

    pub fn path(&mut self) -> Result<ModPath, Error> {
        let len = self.u32()?;
        (0..len).map(|_| self.str()).collect()
    }

    pub fn deps(&mut self) -> Result<Vec<ModPath>, Error> {
        let len = self.u32()?;
        (0..len).map(|_| self.path()).collect()
    }

    /// Number of entries in the section that follows.
    pub fn count(&mut self) -> Result<usize, Error> {
        self.u32()
    }

    fn symbol(&mut self, syms: &Symbols) -> Result<Symbol, Error> {
        let path = self.path()?;
        let name = self.str()?;
        syms.get(&path, &name).ok_or_else(|| {
            let mut s = path.join(".");
            if !s.is_empty() {
                s.push('.');
            }
            s.push_str(&name);
            Error::UnknownSymbol(s)
        })
    }

    pub fn intro(&mut self, syms: &Symbols) -> Result<(String, bool, RTerm, Option<RTerm>), Error> {
        let name = self.str()?;
        let rewritable = self.u8()? != 0;
        let typ = self.term(syms)?;
        let body = match self.u8()? {
            0 => None,
            _ => Some(self.term(syms)?),
        };
        Ok((name, rewritable, typ, body))
    }

    pub fn rule(&mut self, syms: &Symbols) -> Result<Rule, Error> {
        let ctx_len = self.u32()?;
        let ctx = (0..ctx_len)
            .map(|_| Ok((self.str()?, None)))
            .collect::<Result<_, Error>>()?;
        let symbol = self.symbol(syms)?;
        let args_len = self.u32()?;
        let args = (0..args_len)
            .map(|_| self.pattern(syms))
            .collect::<Result<_, Error>>()?;
        let rhs = self.term(syms)?;
        let lhs = TopPattern { symbol, args };
        Ok(Rule { ctx, lhs, rhs })
    }

    fn term(&mut self, syms: &Symbols) -> Result<RTerm, Error> {
        let tm = match self.u8()? {
            0 => Term::Kind,
            1 => Term::Type,
            2 => Term::BVar(self.u32()?),
            3 => Term::Symb(self.symbol(syms)?),
            4 => {
                let head = self.term(syms)?;
                let len = self.u32()?;
                let args = (0..len)
                    .map(|_| self.term(syms))
                    .collect::<Result<_, Error>>()?;
                Term::Appl(head, args)
            }
            5 => {
                let id = self.str()?;
                let ty = match self.u8()? {
                    0 => None,
                    _ => Some(self.term(syms)?),
                };
                Term::Abst(OptArg { id, ty }, self.term(syms)?)
            }
            6 => {
                let id = self.str()?;
                let ty = self.term(syms)?;
                Term::Prod(Arg { id, ty }, self.term(syms)?)
            }
            tag => return Err(Error::BadTag(tag)),
        };
        Ok(RTerm::new(tm))
    }

    fn pattern(&mut self, syms: &Symbols) -> Result<Pattern, Error> {
        Ok(match self.u8()? {
            0 => {
                let s = self.symbol(syms)?;
                let len = self.u32()?;
                let pats = (0..len)
                    .map(|_| self.pattern(syms))
                    .collect::<Result<_, Error>>()?;
                Pattern::Symb(s, pats)
            }
            1 => {
                let m = self.u32()?;
                let len = self.u32()?;
                let dbs = (0..len)
                    .map(|_| self.u32())
                    .collect::<Result<_, Error>>()?;
                Pattern::MVar(m, dbs)
            }
            2 => {
                let n = self.u32()?;
                let len = self.u32()?;
                let pats = (0..len)
                    .map(|_| self.pattern(syms))
                    .collect::<Result<_, Error>>()?;
                Pattern::BVar(n, pats)
            }
            3 => Pattern::Abst(self.str()?, Box::new(self.pattern(syms)?)),
            4 => Pattern::Joker,
            tag => return Err(Error::BadTag(tag)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbols;

    #[test]
    fn term_roundtrip() {
        let mut syms = Symbols::new();
        syms.set_path(vec!["nat".to_string()]);
        let zero = syms.insert("zero".to_string()).unwrap();
        let succ = syms.insert("succ".to_string()).unwrap();

        let one = RTerm::new(Term::Symb(succ)).apply(vec![RTerm::new(Term::Symb(zero))]);
        let arg = Arg { id: "x".to_string(), ty: RTerm::new(Term::Type) };
        let tm = RTerm::new(Term::Prod(arg, one));

        let path = vec!["nat".to_string()];
        let mut w = Writer::new(&path);
        w.term(&tm);
        let bytes = w.finish();

        let mut r = Reader::new(&bytes).unwrap();
        assert_eq!(r.path().unwrap(), path);
        assert_eq!(r.term(&syms).unwrap(), tm);
        assert!(r.u8().is_err());
    }
}
