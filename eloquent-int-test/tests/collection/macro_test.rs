use eloquent::collection::Collection;
use eloquent::common::Value;
use eloquent::errors::{EloquentError, ErrorKind};
use eloquent::model::Model;
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_test_context, run_test};

fn average_age(collection: &Collection, _: &[Value]) -> Result<Value, EloquentError> {
    if collection.is_empty() {
        return Ok(Value::Null);
    }
    let total = collection.sum("age").as_f64().unwrap_or(0.0);
    Ok(val!(total / collection.count() as f64))
}

#[test]
fn test_macro_reaches_every_derived_collection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people().add_macro("averageAge", average_age)?;

            let engineers = people.where_eq("role", "engineer")?;
            assert_eq!(engineers.call("averageAge", &[])?, val!(38.5));

            let sorted = {
                let mut copy = engineers.clone();
                copy.sort_by_key("age", Default::default());
                copy
            };
            assert!(sorted.has_macro("averageAge"));

            let fresh = people.collect(vec![doc! { age: 10 }]);
            assert_eq!(fresh.call("averageAge", &[])?, val!(10.0));

            let (young, _) = people.partition(|p| {
                p.as_document().and_then(|d| d.get("age")).and_then(Value::as_i64).unwrap_or(0) < 40
            });
            assert_eq!(young.call("averageAge", &[])?, val!(26.5));
            Ok(())
        },
    )
}

#[test]
fn test_macro_receives_arguments() {
    let numbers = Collection::new(vec![1, 2, 3])
        .add_macro("scaled_sum", |c, args| {
            let factor = args.first().and_then(Value::as_i64).ok_or_else(|| {
                EloquentError::new("scaled_sum needs a factor", ErrorKind::InvalidArgument)
            })?;
            Ok(val!(c.sum("").as_i64().unwrap_or(0) * factor))
        })
        .unwrap();

    assert_eq!(numbers.call("scaled_sum", &[val!(10)]).unwrap(), val!(60));
    let err = numbers.call("scaled_sum", &[]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
}

#[test]
fn test_unknown_and_blank_macros() {
    let numbers = Collection::new(vec![1]);
    let err = numbers.call("nothing", &[]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownMacro);

    let err = Collection::new(vec![1]).add_macro("  ", |_, _| Ok(Value::Null)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
}

#[test]
fn test_macros_stay_on_their_lineage() {
    let extended = Collection::new(vec![1]).add_macro("one", |_, _| Ok(val!(1))).unwrap();
    let unrelated = Collection::new(vec![1]);
    assert!(extended.has_macro("one"));
    assert!(!unrelated.has_macro("one"));
}

#[test]
fn test_model_macro_reaches_created_models() {
    let base = Model::new(doc! {})
        .add_macro("fullName", |m, _| {
            let first = m.get_or("name.first", "").to_plain_string();
            let last = m.get_or("name.last", "").to_plain_string();
            Ok(val!(format!("{} {}", first, last).trim().to_string()))
        })
        .unwrap();

    let ada = base.create(doc! { name: { first: "Ada", last: "Lovelace" } });
    assert_eq!(ada.call("fullName", &[]).unwrap(), val!("Ada Lovelace"));

    let merged = ada.merge(&[doc! { name: { last: "King" } }]);
    assert_eq!(merged.call("fullName", &[]).unwrap(), val!("King"));

    let deep = ada.merge_deep(&[doc! { name: { last: "King" } }]);
    assert_eq!(deep.call("fullName", &[]).unwrap(), val!("Ada King"));
}
