//! Parsing to unshared, reference-free data structures.
//!
//! All basic parsers operate on byte slices (`&[u8]`) instead of strings.
//! The parsers for all primitives in this file assume that
//! they are being given input that has been lexed;
//! that is, leading whitespace has been removed.

use crate::command::{self, Mode, Prop};
use crate::reduce::{Config, Target};
use crate::symbol::ModPath;
use std::fmt::{self, Display};

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_until, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    character::is_alphanumeric,
    combinator::{map, map_opt, map_res, not, opt, recognize, value},
    error::VerboseError,
    multi::{many0, many1, separated_list, separated_nonempty_list},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

/// Result of a parser.
pub type Parse<'a, A> = IResult<&'a [u8], A, VerboseError<&'a [u8]>>;

/// A trait similar to `FromStr`, but for byte slices instead of strings.
pub trait Parser: Sized {
    fn parse(i: &[u8]) -> Parse<Self>;
}

/// Parse a string phrase and discard remaining input.
pub fn parse<'a, P: Parser>(i: &'a str) -> Result<P, nom::Err<VerboseError<&'a [u8]>>> {
    phrase(P::parse)(i.as_bytes()).map(|(_i, o)| o)
}

/// Symbol consisting of a relative module path and a symbol name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub path: Vec<String>,
    pub name: String,
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self {
            path: Vec::new(),
            name: name.to_string(),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for p in &self.path {
            write!(f, "{}.", p)?;
        }
        write!(f, "{}", self.name)
    }
}

pub type BTerm = Box<Term>;

/// Argument of a product.
pub type Arg = crate::arg::Arg<BTerm>;

/// Argument of an abstraction.
pub type OptArg = crate::arg::Arg<Option<BTerm>>;

/// Unshared term, not distinguishing bound and unbound symbols.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Term {
    Symb(Symbol),
    Appl(BTerm, Vec<Term>),
    Abst(OptArg, BTerm),
    Prod(Arg, BTerm),
}

impl Term {
    pub fn apply(mut self, mut args: Vec<Self>) -> Self {
        if args.is_empty() {
            self
        } else {
            match self {
                Self::Appl(_, ref mut args1) => {
                    args1.append(&mut args);
                    self
                }
                _ => Self::Appl(Box::new(self), args),
            }
        }
    }

    fn absts(self, args: Vec<Arg>) -> Self {
        args.into_iter().rev().fold(self, |acc, arg| {
            let arg = OptArg { id: arg.id, ty: Some(arg.ty) };
            Self::Abst(arg, Box::new(acc))
        })
    }

    fn prods(self, args: Vec<Arg>) -> Self {
        args.into_iter()
            .rev()
            .fold(self, |acc, arg| Self::Prod(arg, Box::new(acc)))
    }
}

/// Rewrite rule with unshared terms as left- and right-hand sides.
///
/// This is a vast overapproximation of rules, because
/// not every term is a valid rule left-hand side.
/// Scoping takes care to separate the wheat from the chaff.
#[derive(Clone, Debug)]
pub struct Rule {
    pub ctx: Vec<(String, Option<Term>)>,
    pub lhs: Term,
    pub rhs: Term,
}

/// The way we introduce a new name.
pub type Intro = command::Intro<Term, Term>;

impl Intro {
    /// Distribute preceding arguments over type and term,
    /// e.g. turning `def f (x : A) : B := t` into `def f : ! x : A -> B := x : A => t`.
    fn parametrise(self, args: Vec<Arg>) -> Self {
        match self {
            Self::Definition(ty, tm) => Self::Definition(
                ty.map(|ty| ty.prods(args.clone())),
                tm.map(|tm| tm.absts(args)),
            ),
            Self::Theorem(ty, tm) => Self::Theorem(ty.prods(args.clone()), tm.absts(args)),
            Self::Declaration(ty) => Self::Declaration(ty.prods(args)),
        }
    }
}

/// Command as given by the user.
pub type Command = command::Command<String, Intro, Rule, Term>;

/// Parse a (potentially nested) comment.
pub fn comment(i: &[u8]) -> Parse<&[u8]> {
    recognize(delimited(tag("(;"), comment_inner, tag(";)")))(i)
}

fn comment_inner(i: &[u8]) -> Parse<&[u8]> {
    let other = recognize(pair(not(alt((tag("(;"), tag(";)")))), take(1usize)));
    recognize(many0(alt((comment, other))))(i)
}

fn space0(i: &[u8]) -> Parse<Vec<&[u8]>> {
    preceded(multispace0, many0(terminated(comment, multispace0)))(i)
}

fn space1(i: &[u8]) -> Parse<Vec<&[u8]>> {
    many1(alt((multispace1, comment)))(i)
}

/// Strip away optional space before parsing with the given function.
fn lex<'a, O1, F>(inner: F) -> impl Fn(&'a [u8]) -> Parse<O1>
where
    F: Fn(&'a [u8]) -> Parse<'a, O1>,
{
    preceded(space0, inner)
}

fn parens<'a, O1, F>(inner: F) -> impl Fn(&'a [u8]) -> Parse<O1>
where
    F: Fn(&'a [u8]) -> Parse<'a, O1>,
{
    delimited(char('('), lex(inner), lex(char(')')))
}

/// Parse a phrase, i.e. a given function terminated by a dot.
///
/// For example, this line is a phrase.
pub fn phrase<'a, O1, F>(inner: F) -> impl Fn(&'a [u8]) -> Parse<O1>
where
    F: Fn(&'a [u8]) -> Parse<'a, O1>,
{
    terminated(inner, lex(char('.')))
}

/// Parse whitespace or comments to `None` and a command phrase to `Some`.
pub fn parse_toplevel(i: &[u8]) -> Parse<Option<Command>> {
    alt((
        value(None, multispace1),
        value(None, comment),
        map(phrase(Command::parse), Some),
    ))(i)
}

/// Parse bracket-surrounded identifier, like `{| anything \o/ goes |}`.
fn bracket_ident(i: &[u8]) -> Parse<&[u8]> {
    recognize(delimited(tag("{|"), take_until("|}"), tag("|}")))(i)
}

fn normal_ident(i: &[u8]) -> Parse<&[u8]> {
    // 0x27 is: '
    // 0x5F is: _
    take_while1(|c| is_alphanumeric(c) || c == 0x5F || c == 0x27)(i)
}

fn ident(i: &[u8]) -> Parse<String> {
    let ident_u8 = alt((bracket_ident, normal_ident));
    map_res(ident_u8, |i| std::str::from_utf8(i).map(String::from))(i)
}

fn modpath(i: &[u8]) -> Parse<ModPath> {
    separated_nonempty_list(char('.'), ident)(i)
}

impl Parser for Symbol {
    fn parse(i: &[u8]) -> Parse<Self> {
        map_opt(modpath, |mut path| {
            // this should always succeed, because the parsed list must be non-empty
            let name = path.pop()?;
            Some(Self { path, name })
        })(i)
    }
}

impl Parser for Arg {
    fn parse(i: &[u8]) -> Parse<Self> {
        map(pair(ident, lex(Term::of)), |(id, ty)| Self { id, ty })(i)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Binder {
    Lam,
    Pi,
}

impl Binder {
    fn lam(i: &[u8]) -> Parse<Self> {
        value(Self::Lam, tag("=>"))(i)
    }

    fn pi(i: &[u8]) -> Parse<Self> {
        value(Self::Pi, tag("->"))(i)
    }
}

impl Parser for Binder {
    fn parse(i: &[u8]) -> Parse<Self> {
        alt((Self::lam, Self::pi))(i)
    }
}

impl Term {
    fn of(i: &[u8]) -> Parse<BTerm> {
        preceded(char(':'), map(lex(Self::parse), Box::new))(i)
    }

    fn of_appl(i: &[u8]) -> Parse<BTerm> {
        preceded(char(':'), map(lex(Self::appl), Box::new))(i)
    }

    fn is(i: &[u8]) -> Parse<BTerm> {
        preceded(tag(":="), map(lex(Self::parse), Box::new))(i)
    }

    fn sterm(i: &[u8]) -> Parse<Self> {
        alt((parens(Self::parse), map(Symbol::parse, Self::Symb)))(i)
    }

    fn appl(i: &[u8]) -> Parse<Self> {
        let app = |(head, tail)| Self::apply(head, tail);
        map(pair(Self::sterm, many0(lex(Self::sterm))), app)(i)
    }

    fn appl_or_bind_unnamed(i: &[u8]) -> Parse<Self> {
        let bind = preceded(Binder::pi, lex(Self::parse));
        map(pair(Self::appl, opt(lex(bind))), |(app, bind)| match bind {
            None => app,
            Some(bound) => {
                let arg = Arg { id: "_".to_string(), ty: Box::new(app) };
                Self::Prod(arg, Box::new(bound))
            }
        })(i)
    }

    fn bind_named(i: &[u8]) -> Parse<Self> {
        let untyped = value(None, Binder::lam);
        let typed = map(pair(Term::of_appl, lex(Binder::parse)), Some);
        let binder = alt((untyped, typed));
        let bind = |(id, binder, tm): (String, _, Self)| match binder {
            None => Self::Abst(OptArg { id, ty: None }, Box::new(tm)),
            Some((ty, Binder::Lam)) => Self::Abst(OptArg { id, ty: Some(ty) }, Box::new(tm)),
            Some((ty, Binder::Pi)) => Self::Prod(Arg { id, ty }, Box::new(tm)),
        };
        map(tuple((ident, lex(binder), lex(Self::parse))), bind)(i)
    }
}

impl Parser for Term {
    /// ~~~
    /// # use reguli::parse::{phrase, Parser, Term};
    /// let pt = phrase(Term::parse);
    /// assert!(pt(b"x.").is_ok());
    /// assert!(pt(b"N -> N -> N.").is_ok());
    /// assert!(pt(b"vec n -> vec (succ n).").is_ok());
    /// assert!(pt(br"x => x.").is_ok());
    /// assert!(pt(b"A : eta {|prop|type|} -> eps A.").is_ok());
    /// ~~~
    fn parse(i: &[u8]) -> Parse<Self> {
        alt((Self::bind_named, Self::appl_or_bind_unnamed))(i)
    }
}

impl Parser for Rule {
    /// ~~~
    /// # use reguli::parse::{phrase, Parser, Rule};
    /// let pr = phrase(Rule::parse);
    /// assert!(pr(b"[x] id x --> x.").is_ok());
    /// assert!(pr(b"[x : A, y] fst x y --> x.").is_ok());
    /// assert!(pr(b"[] plain --> simple.").is_ok());
    /// ~~~
    fn parse(i: &[u8]) -> Parse<Self> {
        let entry = pair(ident, opt(lex(Term::of)));
        let entry = map(entry, |(id, ty)| (id, ty.map(|ty| *ty)));
        let args = separated_list(lex(char(',')), lex(entry));
        let ctxt = delimited(char('['), lex(args), lex(char(']')));
        map(
            tuple((ctxt, lex(Term::parse), lex(tag("-->")), lex(Term::parse))),
            |(ctx, lhs, _, rhs)| Rule { ctx, lhs, rhs },
        )(i)
    }
}

/// Parse an identifier followed by an arbitrary number of arguments.
fn ident_args(i: &[u8]) -> Parse<(String, Vec<Arg>)> {
    pair(ident, many0(lex(parens(Arg::parse))))(i)
}

fn eval_config(i: &[u8]) -> Parse<Config> {
    #[derive(Clone)]
    enum Item {
        Target(Target),
        Steps(usize),
    }
    let steps = map_res(digit1, |s| {
        std::str::from_utf8(s)
            .map_err(|_| ())
            .and_then(|s| s.parse().map_err(|_| ()))
            .map(Item::Steps)
    });
    let item = alt((
        value(Item::Target(Target::Whnf), tag("WHNF")),
        value(Item::Target(Target::Snf), tag("SNF")),
        steps,
    ));
    let items = separated_nonempty_list(lex(char(',')), lex(item));
    map(
        delimited(char('['), items, lex(char(']'))),
        |items| {
            let mut cfg = Config::default();
            for item in items {
                match item {
                    Item::Target(t) => cfg.target = t,
                    Item::Steps(n) => cfg.steps = Some(n),
                }
            }
            cfg
        },
    )(i)
}

fn prop(i: &[u8]) -> Parse<Prop<Term>> {
    let conv = preceded(tag("=="), map(lex(Term::parse), |u| (true, u)));
    let typed = preceded(char(':'), map(lex(Term::parse), |a| (false, a)));
    map(
        pair(Term::appl, lex(alt((conv, typed)))),
        |(t, (is_conv, u))| {
            if is_conv {
                Prop::Conv(t, u)
            } else {
                Prop::Typed(t, u)
            }
        },
    )(i)
}

impl Command {
    fn definition(i: &[u8]) -> Parse<Self> {
        preceded(
            terminated(tag("def"), space1),
            map(
                tuple((ident_args, opt(lex(Term::of)), opt(lex(Term::is)))),
                |((id, args), ty, tm)| {
                    let it = Intro::Definition(ty.map(|ty| *ty), tm.map(|tm| *tm));
                    Self::Intro(id, it.parametrise(args))
                },
            ),
        )(i)
    }

    fn theorem(i: &[u8]) -> Parse<Self> {
        preceded(
            terminated(tag("thm"), space1),
            map(
                tuple((ident_args, lex(Term::of), lex(Term::is))),
                |((id, args), ty, tm)| {
                    let it = Intro::Theorem(*ty, *tm);
                    Self::Intro(id, it.parametrise(args))
                },
            ),
        )(i)
    }

    fn declaration(i: &[u8]) -> Parse<Self> {
        map(tuple((ident_args, lex(Term::of))), |((id, args), ty)| {
            Self::Intro(id, Intro::Declaration(*ty).parametrise(args))
        })(i)
    }

    fn intro(i: &[u8]) -> Parse<Self> {
        alt((Self::definition, Self::theorem, Self::declaration))(i)
    }

    fn check(mode: Mode) -> impl Fn(&[u8]) -> Parse<Self> {
        move |i| map(lex(prop), |p| Self::Check(p, mode))(i)
    }

    fn pragma(i: &[u8]) -> Parse<Self> {
        let assert = Mode { fatal: true, negated: false };
        let assert_not = Mode { fatal: true, negated: true };
        let check = Mode { fatal: false, negated: false };
        let check_not = Mode { fatal: false, negated: true };
        preceded(
            char('#'),
            alt((
                preceded(tag("REQUIRE"), map(lex(modpath), Self::Require)),
                preceded(tag("INFER"), map(lex(Term::parse), Self::Infer)),
                preceded(
                    tag("EVAL"),
                    map(
                        pair(opt(eval_config), lex(Term::parse)),
                        |(cfg, tm)| Self::Eval(cfg.unwrap_or_default(), tm),
                    ),
                ),
                preceded(tag("ASSERTNOT"), Self::check(assert_not)),
                preceded(tag("ASSERT"), Self::check(assert)),
                preceded(tag("CHECKNOT"), Self::check(check_not)),
                preceded(tag("CHECK"), Self::check(check)),
            )),
        )(i)
    }
}

impl Parser for Command {
    /// ~~~
    /// # use reguli::parse::{phrase, Parser, Command};
    /// let pc = phrase(Command::parse);
    /// assert!(pc(b"imp : prop -> prop -> prop.").is_ok());
    /// assert!(pc(b"def add : nat -> nat -> nat.").is_ok());
    /// assert!(pc(b"thm {|Pure.prop_def|thm|} : A := A.").is_ok());
    /// assert!(pc(br"[X] id X --> X.").is_ok());
    /// assert!(pc(b"#ASSERT x == y.").is_ok());
    /// assert!(pc(b"#EVAL[SNF,100] add one one.").is_ok());
    /// ~~~
    fn parse(i: &[u8]) -> Parse<Self> {
        alt((
            Self::pragma,
            Self::intro,
            map(many1(lex(Rule::parse)), Self::Rules),
        ))(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms() {
        let pt = phrase(Term::parse);
        assert!(pt(b"x.").is_ok());
        assert!(pt(b"! x -> x.").is_err());
        assert!(pt(br"\ x => x.").is_err());
        assert!(pt(b"x => x.").is_ok());
        assert!(pt(b"x : A => x.").is_ok());
        assert!(pt(b"A : eta {|prop|type|} -> eps ({|Pure.eq|const|} A A).").is_ok());
        assert!(pt(b"(x => x) (x => x).").is_ok());
    }

    #[test]
    fn qualified() {
        let tm = parse::<Term>("nat.add x y.").unwrap();
        let head = Term::Symb(Symbol {
            path: vec!["nat".to_string()],
            name: "add".to_string(),
        });
        let args = vec![Term::Symb(Symbol::from("x")), Term::Symb(Symbol::from("y"))];
        assert_eq!(tm, Term::Appl(Box::new(head), args));
    }

    #[test]
    fn commands() {
        let pc = phrase(Command::parse);
        assert!(pc(b"nat : Type.").is_ok());
        assert!(pc(b"def x : (;test;)(Type).").is_ok());
        assert!(pc(br"def x := y : Type => {|x|}.").is_ok());
        assert!(pc(b"def fst (x : A) (y : B) : A := x.").is_ok());
        assert!(pc(b"[X] pred (succ X) --> X [] pred zero --> zero.").is_ok());
        assert!(pc(b"#REQUIRE lists.sorted.").is_ok());
        assert!(pc(b"#CHECKNOT zero == succ zero.").is_ok());
        assert!(pc(b"#INFER x => x.").is_ok());
        assert!(pc(b"#EVAL[WHNF] add one one.").is_ok());
    }

    #[test]
    fn comments() {
        assert!(comment(b"(; a normal comment ;)").is_ok());
        assert!(comment(b"(; nested (; comment ;) here ;)").is_ok());
        assert!(comment(r"(;💖;)".as_bytes()).is_ok());
        assert!(comment(b"(; open").is_err());
    }
}
