use eloquent::common::{Pattern, Value};
use eloquent::errors::ErrorKind;
use eloquent::query::{is_match, QuerySpec};
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_test_context, pluck_strings, run_test};

#[test]
fn test_custom_operator() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx
                .people()
                .add_operator("startsWith", |operand, field| {
                    match (operand.as_str(), field.as_str()) {
                        (Some(prefix), Some(text)) => text.starts_with(prefix),
                        _ => false,
                    }
                })?;
            let found = people.where_op("name", "startsWith", "Ed")?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Edsger"]);

            // derived collections keep the operator
            let derived = found.find(doc! { "$$address.city": { startsWith: "Aus" } })?;
            assert_eq!(derived.count(), 1);
            Ok(())
        },
    )
}

#[test]
fn test_custom_operator_does_not_leak() {
    run_test(
        || create_test_context(),
        |ctx| {
            let _extended = ctx.people().add_operator("always", |_, _| true)?;
            let err = ctx.people().where_op("name", "always", 1).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownOperator);
            Ok(())
        },
    )
}

#[test]
fn test_comparison_aliases() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            assert_eq!(pluck_strings(&people.where_op("age", ">", 40)?, "name"), vec!["Alan", "Edsger"]);
            assert_eq!(pluck_strings(&people.where_op("age", "<=", 36)?, "name"), vec!["Ada", "Grace"]);
            assert_eq!(pluck_strings(&people.where_op("role", "!=", "engineer")?, "name"), vec!["Grace", "Edsger"]);
            assert_eq!(pluck_strings(&people.where_op("role", "==", "intern")?, "name"), vec!["Grace"]);
            Ok(())
        },
    )
}

#[test]
fn test_ordering_requires_matching_kinds() {
    run_test(
        || create_test_context(),
        |ctx| {
            // zip codes are strings, so a numeric bound matches nothing
            assert!(ctx.people().where_op("address.zip", ">", 0)?.is_empty());
            assert_eq!(ctx.people().where_op("address.zip", ">", "A")?.count(), 2);
            Ok(())
        },
    )
}

#[test]
fn test_regexp_operator() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            let found = people.where_op("address.city", "regexp", Pattern::new("^(London|Austin)$")?)?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada", "Edsger"]);

            let found = people.where_op("skills", "regexp", "crypto")?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Alan"]);
            Ok(())
        },
    )
}

#[test]
fn test_pattern_literal_in_spec() {
    let spec = QuerySpec::new().eq("name", Pattern::new("^gr").unwrap()).op("age", "lt", 18);
    assert!(!is_match(&spec, &doc! { name: "Grace", age: 17 }).unwrap());

    let spec = QuerySpec::new().eq("name", Pattern::new("(?i)^gr").unwrap()).op("age", "lt", 18);
    assert!(is_match(&spec, &doc! { name: "Grace", age: 17 }).unwrap());
}

#[test]
fn test_contains_on_strings_and_arrays() {
    let doc = doc! { title: "Liberty Leading the People", tags: ["art", "france"] };
    let spec = QuerySpec::new().op("title", "contains", "Leading");
    assert!(is_match(&spec, &doc).unwrap());

    let spec = QuerySpec::new().op("tags", "contains", "france");
    assert!(is_match(&spec, &doc).unwrap());

    let spec = QuerySpec::new().op("tags", "contains", val!(vec!["france"]));
    assert!(!is_match(&spec, &doc).unwrap());

    let spec = QuerySpec::new().op("missing", "notContains", Value::Null);
    assert!(is_match(&spec, &doc).unwrap());
}
