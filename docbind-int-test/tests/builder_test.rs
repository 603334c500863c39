use docbind::common::Value;
use docbind::doc;
use docbind::mapping::build;
use docbind_int_test::test_util::fixture_registry;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_plain_selector_builds_matching_instance() {
    let registry = fixture_registry().unwrap();
    let person = registry.get("Person").unwrap();
    let selector = doc!("title": "Sir", "version": 2);

    let model = build(&selector, &person).unwrap();
    assert!(model.is_new());
    assert_eq!(model.get("title"), Value::from("Sir"));
    assert_eq!(model.get("version"), Value::I32(2));
}

#[test]
fn test_operator_and_nested_conditions_are_dropped() {
    let registry = fixture_registry().unwrap();
    let person = registry.get("Person").unwrap();
    let selector = doc!(
        "title": "Sir",
        "age.$gt": 5,
        "version": { "$in": [1, 2, 3] }
    );

    let model = build(&selector, &person).unwrap();
    assert_eq!(model.get("title"), Value::from("Sir"));
    assert_eq!(model.get("version"), Value::Null);
    // the age default still applies; the operator condition does not
    assert_eq!(model.get("age"), Value::I32(100));
}

#[test]
fn test_all_operator_selector_builds_default_instance() {
    let registry = fixture_registry().unwrap();
    let reg = registry.get("Reg").unwrap();
    let selector = doc!("title.$ne": "Sir", "age": { "$gt": 5 });

    let model = build(&selector, &reg).unwrap();
    assert!(model.is_new());
    assert!(model.attributes().is_empty());
}

#[test]
fn test_undeclared_conditions_follow_dynamic_capability() {
    let registry = fixture_registry().unwrap();

    let reg = registry.get("Reg").unwrap();
    let model = build(&doc!("title": "Sir", "banned": true), &reg).unwrap();
    assert_eq!(model.get("title"), Value::from("Sir"));
    assert!(model.attribute("banned").is_none());

    let dynamic = registry.get("Dyn").unwrap();
    let model = build(&doc!("title": "Sir", "banned": true), &dynamic).unwrap();
    assert_eq!(model.get("banned"), Value::Bool(true));
}

#[test]
fn test_built_instance_can_be_copied() {
    let registry = fixture_registry().unwrap();
    let person = registry.get("Person").unwrap();
    let model = build(&doc!("title": "Sir"), &person).unwrap();

    let copy = model.dup().unwrap();
    assert_ne!(copy.id(), model.id());
    assert_eq!(copy, model);
}
