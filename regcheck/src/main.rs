//! A typechecker for the lambda-Pi calculus modulo rewriting.

mod error;
mod opt;

use error::Error;
use log::error;
use opt::Opt;
use reguli::{parse, scope, ModPath, Universe};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// Derive a module path from a file path, using the file stem.
fn module_path(file: &Path) -> Result<ModPath, Error> {
    let stem = file.file_stem().and_then(|s| s.to_str()).ok_or(Error::Module)?;
    Ok(vec![stem.to_string()])
}

/// File containing the object code of a module.
fn object_file(dir: &Path, path: &[String]) -> PathBuf {
    dir.join(format!("{}.rgo", path.join(".")))
}

/// Line of the position where `rest` starts within `all`.
fn line_of(all: &[u8], rest: &[u8]) -> usize {
    let offset = all.len() - rest.len();
    1 + all[..offset].iter().filter(|c| **c == b'\n').count()
}

fn handle(cmd: scope::Command, dir: &Path, opt: &Opt, uni: &mut Universe) -> Result<(), Error> {
    use reguli::Command;
    match cmd {
        Command::Require(path) => {
            let mut read = |p: &ModPath| -> Result<Vec<u8>, reguli::Error> {
                std::fs::read(object_file(dir, p)).map_err(|_| {
                    reguli::error::ModuleError::NotLoaded(p.join(".")).into()
                })
            };
            uni.require(&path, &mut read)?;
        }
        Command::Eval(mut cfg, tm) => {
            if cfg.steps.is_none() {
                cfg.steps = opt.steps;
            }
            if let Some(tm) = uni.handle(Command::Eval(cfg, tm))? {
                println!("{}", tm);
            }
        }
        cmd => {
            if let Some(tm) = uni.handle(cmd)? {
                println!("{}", tm);
            }
        }
    }
    Ok(())
}

fn process(file: &Path, opt: &Opt, uni: &mut Universe) -> Result<(), Error> {
    let text = std::fs::read(file)?;
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let path = module_path(file)?;
    uni.open(path.clone())?;

    let mut input: &[u8] = &text;
    while !input.is_empty() {
        let line = line_of(&text, input);
        match parse::parse_toplevel(input) {
            Ok((rest, cmd)) => {
                input = rest;
                let result = match cmd {
                    None => Ok(()),
                    Some(cmd) => cmd
                        .scope(&uni.syms)
                        .map_err(|e| Error::Reguli(e.into()))
                        .and_then(|cmd| handle(cmd, dir, opt, uni)),
                };
                if let Err(err) = result {
                    error!("{}:{}: {:?}", file.display(), line, err);
                    return Err(err);
                }
            }
            Err(_) => {
                error!("{}:{}: syntax error", file.display(), line);
                return Err(Error::Reguli(reguli::Error::Parse));
            }
        }
    }

    if opt.emit {
        if let Some(bytes) = uni.compiled() {
            std::fs::write(object_file(dir, &path), bytes)?;
        }
    }
    uni.close();
    Ok(())
}

fn main() -> Result<(), Error> {
    use env_logger::Env;
    // log warnings and errors by default
    // allow setting the logging level by using the environment variable "LOG"
    // e.g. `LOG=trace regcheck ...`
    env_logger::Builder::from_env(Env::default().filter_or("LOG", "warn")).init();

    let opt = Opt::from_args();
    let mut uni = Universe::new();
    uni.sig.eta = !opt.no_eta;

    for file in &opt.files {
        process(file, &opt, &mut uni)?;
    }
    Ok(())
}
