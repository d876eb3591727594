use eloquent::common::Value;
use eloquent::errors::ErrorKind;
use eloquent::model::Model;
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_custom_test_context, create_test_context, run_test};
use serde_json::json;

#[test]
fn test_path_reads_and_writes() {
    run_test(
        || create_test_context(),
        |ctx| {
            let mut ada = ctx.person(0);
            assert_eq!(ada.get("address.city"), Some(&val!("London")));
            assert_eq!(ada.get_or("address.country", "UK"), val!("UK"));
            assert!(!ada.has("address.country"));

            ada.set("address.country", "UK")?.set("links.home.url", "https://example.org")?;
            assert!(ada.has("address.country"));
            assert_eq!(ada.get("links.home.url"), Some(&val!("https://example.org")));

            assert_eq!(ada.pull("address.zip"), Some(val!("W1")));
            assert!(!ada.unset("address.zip"));
            assert_eq!(ada.pull_or("address.zip", "none"), val!("none"));
            Ok(())
        },
    )
}

#[test]
fn test_set_rejects_empty_segments() {
    let mut model = Model::new(doc! {});
    let err = model.set("a..b", 1).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
    let err = model.set("", 1).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
}

#[test]
fn test_array_elements_by_index() {
    let mut model = Model::from_json(json!({ "tags": ["a", "b", "c"] })).unwrap();
    assert_eq!(model.get("tags.1"), Some(&val!("b")));
    model.set("tags.1", "B").unwrap();
    assert_eq!(model.get("tags"), Some(&val!(vec!["a", "B", "c"])));
    assert_eq!(model.pull("tags.0"), Some(val!("a")));
    assert_eq!(model.get("tags"), Some(&val!(vec!["B", "c"])));
}

#[test]
fn test_custom_separator() {
    run_test(
        || create_custom_test_context(),
        |ctx| {
            let mut ada = ctx.person(0);
            assert_eq!(ada.get("address/city"), Some(&val!("London")));
            assert_eq!(ada.get("address.city"), None);
            ada.set("address/city", "Paris")?;
            assert!(ada.matches(doc! { "@address/city": { eq: "Paris" } })?);
            Ok(())
        },
    )
}

#[test]
fn test_paths_and_each_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let ada = ctx.person(0);
            assert_eq!(
                ada.paths().to_vec(),
                vec!["name", "age", "role", "skills", "address.city", "address.zip", "salary"]
            );

            let mut shallow = Vec::new();
            ada.each_path(|path, _, _| shallow.push(path.to_string()), Some(0));
            assert_eq!(shallow, vec!["name", "age", "role", "skills", "address", "salary"]);

            let mut parents = 0;
            ada.each_path(
                |_, _, parent| {
                    if parent.contains_key("city") {
                        parents += 1;
                    }
                },
                None,
            );
            assert_eq!(parents, 2);
            Ok(())
        },
    )
}

#[test]
fn test_matches_query() {
    run_test(
        || create_test_context(),
        |ctx| {
            let grace = ctx.person(2);
            assert!(grace.matches(doc! { role: "intern", "$$age": { lt: 18 } })?);
            assert!(!grace.matches(doc! { address: { city: "London" } })?);
            let err = grace.matches(doc! { "$$age": { near: 1 } }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownOperator);
            Ok(())
        },
    )
}

#[test]
fn test_diff_and_merge() {
    let model = Model::new(doc! { name: "Ada", address: { city: "London", zip: "W1" } });
    let diff = model.diff(&doc! { name: "Ada", address: { city: "Paris", zip: "W1" }, age: 36 });
    assert_eq!(diff.to_document(), doc! { address: { city: "Paris" }, age: 36 });

    let merged = model.merge(&[doc! { address: { city: "Paris" } }, doc! { age: 36 }]);
    assert_eq!(merged.to_document(), doc! { name: "Ada", address: { city: "Paris" }, age: 36 });

    let deep = model.merge_deep(&[doc! { address: { city: "Paris" } }]);
    assert_eq!(deep.get("address.zip"), Some(&val!("W1")));
    assert_eq!(deep.get("address.city"), Some(&val!("Paris")));
    assert_eq!(model.get("address.city"), Some(&val!("London")));
}

#[test]
fn test_map_and_except() {
    let model = Model::new(doc! { a: 1, b: 2, c: "three" });
    let doubled = model.map(|value, _| match value.as_i64() {
        Some(n) => val!(n * 2),
        None => value.clone(),
    });
    assert_eq!(doubled.to_document(), doc! { a: 2, b: 4, c: "three" });

    let renamed = model.map_with_keys(|value, key| (value.clone(), Some(key.to_uppercase())));
    assert_eq!(renamed.keys(), vec!["A", "B", "C"]);

    assert_eq!(model.except(&["b"]).keys(), vec!["a", "c"]);
    assert_eq!(model.except_by(|value, _| value.is_string()).keys(), vec!["a", "b"]);

    let total = model.reduce(|acc, _, value| acc + value.as_i64().unwrap_or(0), 0);
    assert_eq!(total, 3);
}

#[test]
fn test_conditionals_and_output() {
    let empty = Model::new(doc! {}).when_empty(|m| m.create(doc! { placeholder: true }));
    assert_eq!(empty.get("placeholder"), Some(&val!(true)));

    let kept = Model::new(doc! { a: 1 }).when_not_empty(|m| m.except(&["a"]));
    assert!(kept.is_empty());

    let model = Model::new(doc! { name: "Ada", tags: ["x"], missing: null });
    assert_eq!(model.to_json(), json!({ "name": "Ada", "tags": ["x"], "missing": null }));
    assert_eq!(model.values().len(), 3);
    assert_eq!(model.clone().pipe(|m| m.len()), 3);
    assert_eq!(Value::from(model.clone()), val!(model.into_document()));
}
