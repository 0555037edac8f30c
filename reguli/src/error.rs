//! Common error types.

use crate::command::Prop;
use crate::pattern::Miller;
use crate::term::RTerm;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Parse,
    Scope(ScopeError),
    Symbols(SymbolsError),
    Signature(SignatureError),
    Typing(TypingError),
    Rule(RuleError),
    Module(ModuleError),
    Decode(DecodeError),
    /// a failed `#ASSERT` or `#ASSERTNOT` directive
    Assertion(Prop<RTerm>),
    /// rewrite-step budget of an evaluation exhausted
    Budget,
}

/// Error during the scoping of a parsed structure.
#[derive(Debug, Eq, PartialEq)]
pub enum ScopeError {
    UndeclaredSymbol(String),
    Underscore,
    NoPrepattern,
    NoTopPattern,
    PatternArguments,
    /// a meta-variable applied to something that is not a distinct bound variable
    MillerPattern,
    /// occurrences of a meta-variable disagree on their argument count
    MillerArity,
    /// a context entry that occurs nowhere in the left-hand side
    MillerUnused,
}

#[derive(Debug)]
pub enum SymbolsError {
    Reinsertion,
}

#[derive(Debug)]
pub enum SignatureError {
    Reintroduction,
    NonRewritable,
}

/// Error during type inference or checking.
#[derive(Debug)]
pub enum TypingError {
    ProductExpected,
    SortExpected,
    BindNoType,
    /// expected and inferred type, in that order
    Unconvertible(Box<(RTerm, RTerm)>),
    KindNotTypable,
    UnexpectedKind,
    DomainFreeAbstraction,
    TypeAndTermEmpty,
    TypeNotFound,
}

/// Reason for which a rewrite rule was not admitted.
#[derive(Debug)]
pub enum RuleError {
    /// no left-hand side occurrence determined the meta-variable's type
    Untyped(Miller),
    /// the meta-variable's type cannot be expressed outside its binders
    HoleType(Miller),
    /// conflicting types for one meta-variable, e.g. from a nonlinear pattern
    TypeMismatch(Box<(RTerm, RTerm)>),
    /// the solved meta-variable types admit no context ordering
    ContextOrder(Miller),
    /// the left- or right-hand side does not type
    Typing(TypingError),
}

#[derive(Debug)]
pub enum ModuleError {
    /// circular module requirement
    Cycle(String),
    /// reference to a module that has not been loaded
    NotLoaded(String),
}

/// Error during the decoding of an object file.
#[derive(Debug)]
pub enum DecodeError {
    BadMagic,
    BadTag(u8),
    UnexpectedEnd,
    Utf8,
    UnknownSymbol(String),
}

impl<'a> From<nom::Err<nom::error::VerboseError<&'a [u8]>>> for Error {
    fn from(_: nom::Err<nom::error::VerboseError<&'a [u8]>>) -> Self {
        Self::Parse
    }
}

impl From<ScopeError> for Error {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}

impl From<SymbolsError> for Error {
    fn from(err: SymbolsError) -> Self {
        Self::Symbols(err)
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err)
    }
}

impl From<TypingError> for Error {
    fn from(err: TypingError) -> Self {
        Self::Typing(err)
    }
}

impl From<RuleError> for Error {
    fn from(err: RuleError) -> Self {
        Self::Rule(err)
    }
}

impl From<TypingError> for RuleError {
    fn from(err: TypingError) -> Self {
        Self::Typing(err)
    }
}

impl From<ModuleError> for Error {
    fn from(err: ModuleError) -> Self {
        Self::Module(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}
