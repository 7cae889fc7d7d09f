use pixelmap::variable::*;
use pixelmap::MapError;

#[test]
fn new_is_read_only_and_not_persistent() {
    let v = Variable::new(5);
    assert_eq!(v.mode(), RuntimeMode::ReadOnly);
    assert_eq!(v.persistence(), Persistence::None);
    assert_eq!(*v.get(), 5);
}

#[test]
fn read_only_rejects_set() {
    let mut v = Variable::new(5);
    assert!(matches!(v.set(6), Err(MapError::ReadOnly)));
    assert_eq!(*v.get(), 5);
}

#[test]
fn read_write_sets_runtime_only() {
    let mut v = Variable::new(5).with_mode(RuntimeMode::ReadWrite);
    v.set(6).unwrap();
    assert_eq!(*v.get(), 6);
    assert_eq!(*v.initial(), 5);
}

#[test]
fn persistent_reads_and_writes_initial() {
    let mut v = Variable::new(5)
        .with_mode(RuntimeMode::ReadWrite)
        .with_persistence(Persistence::Persist);
    v.set(9).unwrap();
    assert_eq!(*v.initial(), 9);
    assert_eq!(*v.get(), 9);

    v.toggle_persistence();
    // runtime copy was never written
    assert_eq!(*v.get(), 5);
}

#[test]
fn after_load_resets_non_persistent_runtime() {
    let mut v = Variable::new("a".to_string()).with_mode(RuntimeMode::ReadWrite);
    v.set("b".to_string()).unwrap();
    v.after_load();
    assert_eq!(v.get(), "a");
}

#[test]
fn after_load_keeps_persistent_state() {
    let mut v = Variable::new(1).with_mode(RuntimeMode::ReadWrite);
    v.set(2).unwrap();
    v.toggle_persistence();
    v.after_load();
    v.toggle_persistence();
    assert_eq!(*v.get(), 2);
}

#[test]
fn save_to_initial_copies_runtime() {
    let mut v = Variable::new(1).with_mode(RuntimeMode::ReadWrite);
    v.set(3).unwrap();
    v.save_to_initial();
    assert_eq!(*v.initial(), 3);
}

#[test]
fn toggles_flip_back_and_forth() {
    let mut v = Variable::new(0u8);
    v.toggle_mode();
    assert_eq!(v.mode(), RuntimeMode::ReadWrite);
    v.toggle_mode();
    assert_eq!(v.mode(), RuntimeMode::ReadOnly);
    v.toggle_persistence();
    assert!(v.is_persistent());
}

#[test]
fn serde_round_trip_preserves_flags() {
    let v = Variable::new(vec![1, 2]).with_persistence(Persistence::Persist);
    let json = serde_json::to_string(&v).unwrap();
    let back: Variable<Vec<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
}

#[test]
fn constant_reference_reads_and_writes_inline() {
    let mut r = Reference::from(4);
    assert!(r.is_constant());
    assert_eq!(*r.get(), 4);
    r.set(7).unwrap();
    assert_eq!(*r.get(), 7);
    assert!(r.as_variable().is_none());
}

#[test]
fn variable_reference_reads_through_variable() {
    let var = Variable::new(2).with_mode(RuntimeMode::ReadWrite).with_persistence(Persistence::Persist);
    let mut r = Reference::from(var);
    assert!(!r.is_constant());
    assert_eq!(*r.get(), 2);

    r.set(8).unwrap();
    assert_eq!(*r.get(), 8);
    assert_eq!(*r.as_variable().unwrap().initial(), 8);
}

#[test]
fn variable_reference_keeps_read_only_rule() {
    let mut r = Reference::Variable(Variable::new("x".to_string()));
    assert!(matches!(r.set("y".to_string()), Err(MapError::ReadOnly)));
    assert_eq!(r.get(), "x");
}

#[test]
fn to_constant_detaches_current_value() {
    let mut var = Variable::new(1).with_mode(RuntimeMode::ReadWrite);
    var.set(5).unwrap();
    let r = Reference::from(var).to_constant();
    assert_eq!(r, Reference::Constant(5));
}

#[test]
fn reference_serde_round_trip() {
    let r: Reference<f32> = Reference::Variable(Variable::new(0.5));
    let json = serde_json::to_string(&r).unwrap();
    let back: Reference<f32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
    assert!(serde_json::to_string(&Reference::Constant(1u8)).unwrap().contains("Constant"));
}
