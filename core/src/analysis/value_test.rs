use super::*;

#[test]
fn string_constant_strips_one_quote_each_side() {
    assert_eq!(SymbolicValue::string_constant("'test.db'"), SymbolicValue::Str("test.db".into()));
    assert_eq!(SymbolicValue::string_constant("\"x\""), SymbolicValue::Str("x".into()));
    assert_eq!(SymbolicValue::string_constant("''nested''"), SymbolicValue::Str("'nested'".into()));
    assert_eq!(SymbolicValue::string_constant("plain"), SymbolicValue::Str("plain".into()));
    assert_eq!(SymbolicValue::string_constant("'"), SymbolicValue::Str(String::new()));
    assert_eq!(SymbolicValue::string_constant(""), SymbolicValue::Str(String::new()));
}

#[test]
fn predicates_and_accessors() {
    let handle = ObjectHandle::new("Lcom/example/Foo;", 3);
    let object = SymbolicValue::Object(handle.clone());
    assert!(object.is_object_handle());
    assert!(!object.is_string());
    assert_eq!(object.as_object(), Some(&handle));

    let s = SymbolicValue::Str("a".into());
    assert!(s.is_string());
    assert_eq!(s.as_int(), None);

    assert!(SymbolicValue::default().is_unknown());
    assert_eq!(SymbolicValue::Int(9).as_int(), Some(9));
}

#[test]
fn handles_compare_by_identity() {
    let a = ObjectHandle::new("Lcom/example/Foo;", 1);
    let b = ObjectHandle::new("Lcom/example/Foo;", 1);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn aliased_registers_share_invocations() {
    let handle = ObjectHandle::new("Ljava/security/SecureRandom;", 12);
    let mut regs = RegisterFile::new();
    regs.set(0, SymbolicValue::Object(handle.clone()));
    regs.set(5, SymbolicValue::Object(handle));

    regs.get(5)
        .as_object()
        .expect("alias")
        .record_invocation("Ljava/security/SecureRandom;->setSeed([B)V");

    let through_first = regs.get(0);
    let first = through_first.as_object().expect("object");
    assert_eq!(first.invoked_methods(), vec!["Ljava/security/SecureRandom;->setSeed([B)V".to_string()]);
    assert!(first.was_invoked("Ljava/security/SecureRandom;->setSeed([B)V"));
    assert!(!first.was_invoked("Ljava/security/SecureRandom;->nextBytes([B)V"));
}

#[test]
fn register_file_dump_is_sorted() {
    let mut regs = RegisterFile::new();
    assert_eq!(regs.to_string(), "\t(no registers)\n");
    regs.set(4, SymbolicValue::Int(1));
    regs.set(1, SymbolicValue::Str("k".into()));
    regs.set(2, SymbolicValue::Unknown);
    assert_eq!(regs.to_string(), "\tv1 = \"k\"\n\tv2 = ?\n\tv4 = 1\n");
}
