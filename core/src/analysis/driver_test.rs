use super::*;
use crate::bytecode::{
    AppDump, DumpMethod, MethodCode, MethodSignature, PartialSignature, PathEntry, PathEnds, PathFinder,
};
use crate::config::TraceConfig;
use crate::test_util::{ins, lit, method, reg, string, type_ref};

const MAIN: &str = "Lcom/example/Main;";
const DELETE_DB: &str = "Landroid/content/Context;->deleteDatabase(Ljava/lang/String;)Z";

fn main_sig(name: &str) -> MethodSignature {
    MethodSignature::new(MAIN, name, "()V")
}

fn sink_path(name: &str, idx: i64) -> PathEntry {
    PathEntry {
        src: main_sig(name).into(),
        dst: PartialSignature::from(MethodSignature::new(
            "Landroid/content/Context;",
            "deleteDatabase",
            "(Ljava/lang/String;)Z",
        )),
        idx: Some(idx),
    }
}

/// `const-string v1, 'name'` (4 bytes) followed by `invoke-virtual v0, v1, deleteDatabase` (6 bytes).
fn delete_db_code(name: &str) -> MethodCode {
    MethodCode::new(vec![
        ins(0x1a, 4, vec![reg(1), string(10, &format!("'{}'", name))]),
        ins(0x6e, 6, vec![reg(0), reg(1), method(20, DELETE_DB)]),
        ins(0x0a, 2, vec![reg(2)]),
        ins(0x0e, 2, vec![]),
    ])
}

fn sample_dump() -> AppDump {
    let mut dump = AppDump::default();
    dump.push_method(DumpMethod {
        signature: main_sig("first"),
        code: Some(delete_db_code("first.db")),
    });
    dump.push_method(DumpMethod {
        signature: main_sig("second"),
        code: Some(delete_db_code("second.db")),
    });
    dump.push_method(DumpMethod {
        signature: main_sig("external"),
        code: None,
    });
    dump
}

#[test]
fn traces_each_resolved_path_up_to_its_call_site() {
    let mut dump = sample_dump();
    dump.push_path(sink_path("first", 4));
    dump.push_path(sink_path("second", 4));
    let paths = dump.path_ids();

    let results = trace_source_paths(&dump, &dump, &paths);
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.path().src.method.as_deref(), Some("first"));
    assert_eq!(first.path().call_site, Some(4));
    assert!(first.is_string(1));
    assert_eq!(first.value(1).and_then(|v| v.as_str()), Some("first.db"));
    assert!(!first.is_string(0));
    assert!(!first.is_string(2));
    assert!(!first.is_string(9));

    assert_eq!(results[1].value(1).and_then(|v| v.as_str()), Some("second.db"));
}

#[test]
fn unresolved_paths_are_dropped_and_order_is_kept() {
    let mut dump = sample_dump();
    dump.push_path(sink_path("second", 4));
    dump.push_path(PathEntry {
        src: PartialSignature {
            class: Some(MAIN.into()),
            method: None,
            descriptor: Some("()V".into()),
        },
        ..sink_path("first", 4)
    });
    dump.push_path(PathEntry {
        idx: None,
        ..sink_path("first", 4)
    });
    dump.push_path(sink_path("missing", 4));
    dump.push_path(sink_path("external", 4));
    dump.push_path(sink_path("first", 4));
    let paths = dump.path_ids();

    let results = Driver::new(&dump, &dump).run(&paths);
    let order: Vec<_> = results.iter().map(|r| r.path().path).collect();
    assert_eq!(order, vec![paths[0], paths[5]]);
    assert_eq!(results[0].value(1).and_then(|v| v.as_str()), Some("second.db"));
    assert_eq!(results[1].value(1).and_then(|v| v.as_str()), Some("first.db"));

    let described = describe_paths(&dump, &paths);
    assert_eq!(described.len(), 6);
    assert_eq!(described[1].src.method, None);
    assert_eq!(described[2].call_site, None);
}

#[test]
fn first_overload_wins() {
    let mut dump = AppDump::default();
    dump.push_method(DumpMethod {
        signature: main_sig("dup"),
        code: Some(delete_db_code("winner.db")),
    });
    dump.push_method(DumpMethod {
        signature: main_sig("dup"),
        code: Some(delete_db_code("loser.db")),
    });
    let id = dump.push_path(sink_path("dup", 4));

    let results = trace_source_paths(&dump, &dump, &[id]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value(1).and_then(|v| v.as_str()), Some("winner.db"));
}

#[test]
fn config_overrides_ceiling_and_lookahead() {
    let mut dump = sample_dump();
    let id = dump.push_path(sink_path("first", 0));

    // Ceiling 0 stops right after the const-string; one extra instruction reaches the invoke.
    let plain = Driver::new(&dump, &dump).trace_path(&id).expect("resolved");
    assert_eq!(plain.operands().map(|o| o.len()), Some(2));
    assert!(plain.is_string(0));
    assert!(!plain.is_string(1));

    let lookahead = Driver::new(&dump, &dump)
        .with_config(TraceConfig {
            extra_offset: 1,
            max_trace: None,
        })
        .trace_path(&id)
        .expect("resolved");
    assert_eq!(lookahead.operands().map(|o| o.len()), Some(3));
    assert!(lookahead.is_string(1));

    let unbounded = Driver::new(&dump, &dump)
        .with_config(TraceConfig {
            extra_offset: 0,
            max_trace: Some(-1),
        })
        .trace_path(&id)
        .expect("resolved");
    // return-void has no operands
    assert_eq!(unbounded.operands().map(|o| o.len()), Some(0));
}

struct Allocating {
    code: MethodCode,
}

impl crate::bytecode::BytecodeUnit for Allocating {
    type Method = MethodCode;

    fn find_methods(&self, _sig: &MethodSignature) -> Vec<Option<&MethodCode>> {
        vec![Some(&self.code)]
    }
}

struct FixedPaths;

impl PathFinder for FixedPaths {
    type Path = &'static str;

    fn describe(&self, path: &&'static str) -> PathEnds {
        PathEnds {
            src: main_sig(path).into(),
            dst: PartialSignature::default(),
            call_site: Some(100),
        }
    }
}

#[test]
fn object_handle_results_expose_invoked_methods() {
    let unit = Allocating {
        code: MethodCode::new(vec![
            ins(0x22, 4, vec![reg(0), type_ref(5, "Ljavax/crypto/spec/SecretKeySpec;")]),
            ins(0x12, 2, vec![reg(1), lit(0)]),
            ins(
                0x6e,
                6,
                vec![reg(0), method(9, "Ljavax/crypto/spec/SecretKeySpec;->getEncoded()[B")],
            ),
            ins(0x71, 6, vec![reg(0), reg(1), method(11, "Lcom/example/Sink;->use(Ljava/lang/Object; I)V")]),
        ]),
    };

    let results = Driver::new(&unit, &FixedPaths).run(&["anything"]);
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.path().path, "anything");
    assert!(result.is_object_handle(0));
    assert!(!result.is_object_handle(1));
    assert!(!result.is_object_handle(2));
    let handle = result.object_handle(0).expect("handle");
    assert_eq!(handle.class_name(), "Ljavax/crypto/spec/SecretKeySpec;");
    assert_eq!(
        handle.invoked_methods(),
        vec!["Ljavax/crypto/spec/SecretKeySpec;->getEncoded()[B".to_string()]
    );
    assert_eq!(result.value(1).and_then(|v| v.as_int()), Some(0));
}
