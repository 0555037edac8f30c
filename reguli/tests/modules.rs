//! Object files, module loading, and cross-module rules.

mod util;

use reguli::error::ModuleError;
use reguli::{ofile, Error, ModPath, Universe};
use std::collections::HashMap;
use util::{process, universe};

fn path(name: &str) -> ModPath {
    vec![name.to_string()]
}

/// Reader over an in-memory store of object files.
fn read_from(store: &HashMap<ModPath, Vec<u8>>) -> impl FnMut(&ModPath) -> Result<Vec<u8>, Error> + '_ {
    move |p: &ModPath| {
        store
            .get(p)
            .cloned()
            .ok_or_else(|| ModuleError::NotLoaded(p.join(".")).into())
    }
}

const LIBA: &str = r#"
    nat : Type.
    zero : nat.
    succ : nat -> nat.
    def add : nat -> nat -> nat.
    [n] add n zero --> n.
    [n, m] add n (succ m) --> succ (add n m).
    def one : nat := succ zero.
"#;

#[test]
fn object_file_roundtrip() {
    let mut a = universe("liba");
    process(&mut a, LIBA).unwrap();
    let bytes = a.compiled().unwrap();

    let mut store = HashMap::new();
    store.insert(path("liba"), bytes);

    let mut uni = universe("main");
    uni.require(&path("liba"), &mut read_from(&store)).unwrap();
    let cmds = r#"
        #REQUIRE liba.
        #ASSERT liba.add liba.one liba.one == liba.succ (liba.succ liba.zero).
    "#;
    process(&mut uni, cmds).unwrap();
}

#[test]
fn require_unloaded_module_fails() {
    let mut uni = universe("main");
    match process(&mut uni, "#REQUIRE nowhere.") {
        Err(Error::Module(ModuleError::NotLoaded(_))) => (),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn cross_module_rule_reattached() {
    // module A declares `add` with a single rule
    let mut a = universe("liba");
    process(&mut a, LIBA).unwrap();
    let mut store = HashMap::new();
    store.insert(path("liba"), a.compiled().unwrap());

    // module B requires A and adds a rule to A's symbol
    let mut b = universe("libb");
    b.require(&path("liba"), &mut read_from(&store)).unwrap();
    process(&mut b, "[m] liba.add liba.zero m --> m.").unwrap();
    store.insert(path("libb"), b.compiled().unwrap());

    // a third module sees B's rule on A's symbol after loading B
    let mut uni = universe("main");
    uni.require(&path("libb"), &mut read_from(&store)).unwrap();
    process(&mut uni, "#ASSERT liba.add liba.zero liba.zero == liba.zero.").unwrap();
}

#[test]
fn circular_requirement_rejected() {
    let mut wa = ofile::Writer::new(&path("a"));
    wa.deps(&[path("b")]);
    wa.begin_intros(0);
    wa.begin_rules(0);
    let mut wb = ofile::Writer::new(&path("b"));
    wb.deps(&[path("a")]);
    wb.begin_intros(0);
    wb.begin_rules(0);

    let mut store = HashMap::new();
    store.insert(path("a"), wa.finish());
    store.insert(path("b"), wb.finish());

    let mut uni = universe("main");
    match uni.require(&path("a"), &mut read_from(&store)) {
        Err(Error::Module(ModuleError::Cycle(_))) => (),
        r => panic!("unexpected result: {:?}", r),
    };
}

#[test]
fn modules_load_once() {
    let mut a = universe("liba");
    process(&mut a, LIBA).unwrap();
    let mut store = HashMap::new();
    store.insert(path("liba"), a.compiled().unwrap());

    let mut uni = universe("main");
    let mut reads = 0;
    let mut read = |p: &ModPath| {
        reads += 1;
        store
            .get(p)
            .cloned()
            .ok_or_else(|| Error::from(ModuleError::NotLoaded(p.join("."))))
    };
    uni.require(&path("liba"), &mut read).unwrap();
    uni.require(&path("liba"), &mut read).unwrap();
    assert_eq!(reads, 1);
}

#[test]
fn definitions_survive_reload() {
    let mut a = universe("liba");
    process(&mut a, LIBA).unwrap();
    let mut store = HashMap::new();
    store.insert(path("liba"), a.compiled().unwrap());

    let mut uni = universe("main");
    uni.require(&path("liba"), &mut read_from(&store)).unwrap();
    // `one` unfolds to its body in the reloaded module
    process(&mut uni, "#ASSERT liba.one == liba.succ liba.zero.").unwrap();
}

fn fresh_universe_with(store: &HashMap<ModPath, Vec<u8>>, dep: &str) -> Universe {
    let mut uni = universe("main");
    uni.require(&path(dep), &mut read_from(store)).unwrap();
    uni
}

#[test]
fn reloaded_rules_keep_order() {
    let mut a = universe("order");
    let cmds = r#"
        nat : Type.
        zero : nat.
        succ : nat -> nat.
        def h : nat -> nat.
        [x] h x --> zero.
        [x] h x --> succ zero.
    "#;
    process(&mut a, cmds).unwrap();
    let mut store = HashMap::new();
    store.insert(path("order"), a.compiled().unwrap());

    let mut uni = fresh_universe_with(&store, "order");
    process(&mut uni, "#ASSERT order.h order.zero == order.zero.").unwrap();
}
