use eloquent::common::Pattern;
use eloquent::errors::ErrorKind;
use eloquent::query::{QueryBuilder, QuerySpec, Triple};
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_custom_test_context, create_test_context, pluck_strings, run_test};

#[test]
fn test_find_by_nested_literal() {
    run_test(
        || create_test_context(),
        |ctx| {
            let found = ctx.people().find(doc! { address: { city: "London" } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada"]);
            Ok(())
        },
    )
}

#[test]
fn test_find_by_pattern() {
    run_test(
        || create_test_context(),
        |ctx| {
            let spec = QuerySpec::new().matches("name", Pattern::new("^A")?);
            let found = ctx.people().find(spec)?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada", "Alan"]);
            Ok(())
        },
    )
}

#[test]
fn test_find_by_operator_range() {
    run_test(
        || create_test_context(),
        |ctx| {
            let found = ctx.people().find(doc! { "$$age": { gte: 18, lt: 50 } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada", "Alan"]);
            Ok(())
        },
    )
}

#[test]
fn test_find_combines_literal_and_operator_entries() {
    run_test(
        || create_test_context(),
        |ctx| {
            let found = ctx.people().find(doc! {
                role: "engineer",
                "$$address.city": { not: "London" },
            })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Alan"]);
            Ok(())
        },
    )
}

#[test]
fn test_find_with_membership_operators() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            let found = people.find(doc! { "$$role": { in: ["intern", "professor"] } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Grace", "Edsger"]);

            let found = people.find(doc! { "$$role": { notIn: ["intern", "professor"] } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada", "Alan"]);

            let found = people.find(doc! { "$$skills": { notContains: "math" } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Grace"]);
            Ok(())
        },
    )
}

#[test]
fn test_missing_field_compares_as_null() {
    run_test(
        || create_test_context(),
        |ctx| {
            let found = ctx.people().find(doc! { "$$salary": { eq: null } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Edsger"]);

            let found = ctx.people().find(doc! { address: { zip: null } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Edsger"]);
            Ok(())
        },
    )
}

#[test]
fn test_not_is_complement_of_find() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            let query = doc! { "$$age": { gt: 40 } };
            let found = people.find(&query)?;
            let rest = people.not(&query)?;
            assert_eq!(found.count() + rest.count(), people.count());
            assert_eq!(pluck_strings(&rest, "name"), vec!["Ada", "Grace"]);
            Ok(())
        },
    )
}

#[test]
fn test_empty_query_matches_everything() {
    run_test(
        || create_test_context(),
        |ctx| {
            assert_eq!(ctx.people().find(doc! {})?.count(), 4);
            assert!(ctx.people().not(doc! {})?.is_empty());
            Ok(())
        },
    )
}

#[test]
fn test_find_one() {
    run_test(
        || create_test_context(),
        |ctx| {
            let first = ctx.people().find_one(doc! { role: "engineer" })?;
            let name = first.as_ref().and_then(|v| v.as_document()).and_then(|d| d.get("name"));
            assert_eq!(name, Some(&val!("Ada")));
            assert_eq!(ctx.people().find_one(doc! { role: "astronaut" })?, None);
            Ok(())
        },
    )
}

#[test]
fn test_unknown_operator_fails() {
    run_test(
        || create_test_context(),
        |ctx| {
            let err = ctx.people().find(doc! { "$$age": { between: [1, 2] } }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownOperator);

            let err = ctx.people().collect(Vec::<i32>::new()).where_op("age", "between", 1).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownOperator);
            Ok(())
        },
    )
}

#[test]
fn test_malformed_operator_form_fails() {
    run_test(
        || create_test_context(),
        |ctx| {
            let err = ctx.people().find(doc! { "$$age": 18 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidQuery);
            Ok(())
        },
    )
}

#[test]
fn test_custom_separator_and_marker() {
    run_test(
        || create_custom_test_context(),
        |ctx| {
            let people = ctx.people();
            let found = people.find(doc! { "@age": { gt: 40 } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Alan", "Edsger"]);

            let found = people.where_eq("address/city", "London")?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Ada"]);

            let found = people.find(doc! { address: { city: "Austin" } })?;
            assert_eq!(pluck_strings(&found, "name"), vec!["Edsger"]);
            Ok(())
        },
    )
}

#[test]
fn test_compiled_triples_are_sorted_by_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let builder = QueryBuilder::new(&ctx.config());
            let triples = builder.compile_document(&doc! {
                name: "Ada",
                "$$age": { gte: 18 },
                address: { city: "London" },
            })?;
            assert_eq!(
                triples,
                vec![
                    Triple::new("address.city", "eq", val!("London")),
                    Triple::new("age", "gte", val!(18)),
                    Triple::new("name", "eq", val!("Ada")),
                ]
            );
            Ok(())
        },
    )
}
