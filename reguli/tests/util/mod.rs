use reguli::{parse, Error, RTerm, Universe};

/// Fresh universe processing a module of the given name.
pub fn universe(module: &str) -> Universe {
    let mut uni = Universe::new();
    uni.open(vec![module.to_string()]).unwrap();
    uni
}

/// Parse, scope, and execute all commands in the given text.
///
/// Return the result of the last directive that evaluated to a term.
pub fn process(uni: &mut Universe, text: &str) -> Result<Option<RTerm>, Error> {
    let mut last = None;
    let mut input = text.as_bytes();
    while !input.is_empty() {
        let (rest, cmd) = parse::parse_toplevel(input).map_err(|_| Error::Parse)?;
        input = rest;
        if let Some(cmd) = cmd {
            let cmd = cmd.scope(&uni.syms)?;
            if let Some(tm) = uni.handle(cmd)? {
                last = Some(tm);
            }
        }
    }
    Ok(last)
}

/// Parse and scope a single term.
#[allow(dead_code)]
pub fn term(uni: &Universe, text: &str) -> RTerm {
    let tm: parse::Term = parse::parse(text).unwrap();
    tm.scope(&uni.syms).unwrap()
}
