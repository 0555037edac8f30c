use std::path::PathBuf;
use structopt::StructOpt;

/// A typechecker for the lambda-Pi calculus modulo rewriting
#[derive(Clone, Debug, StructOpt)]
pub struct Opt {
    /// Do not reduce terms modulo eta
    ///
    /// When this flag is enabled, checking whether
    /// `x => t` and `u` are convertible will no longer succeed if
    /// `x => t` and `x => u x` are convertible.
    #[structopt(long)]
    pub no_eta: bool,

    /// Rewrite-step budget for #EVAL directives that give none
    ///
    /// Directives such as `#EVAL[SNF,100] t` carry their own budget;
    /// this option bounds all remaining evaluations.
    #[structopt(long)]
    pub steps: Option<usize>,

    /// Write an object file next to each processed file
    ///
    /// The object file of `foo.rg` is called `foo.rgo`;
    /// it can be loaded from other modules via `#REQUIRE foo`.
    #[structopt(long, short = "e")]
    pub emit: bool,

    /// Files to process (cumulative)
    ///
    /// Every file is wrapped in a module corresponding to its file stem.
    #[structopt(name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}
