use eloquent::common::{SortOrder, Value};
use eloquent::eloquent::Eloquent;
use eloquent::errors::{EloquentError, ErrorKind};
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_test_context, create_test_docs, pluck_strings};
use std::time::Duration;

async fn load_people() -> Result<Vec<Value>, EloquentError> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    Ok(create_test_docs()?.into_iter().map(Value::from).collect())
}

#[tokio::test]
async fn test_deferred_matches_eager_results() {
    let ctx = create_test_context().unwrap();
    let eager = ctx.people().find(doc! { "$$age": { gte: 18 } }).unwrap();
    let mut eager_sorted = eager.clone();
    eager_sorted.sort_by_key("age", SortOrder::Descending);

    let deferred = Eloquent::from_future(load_people())
        .find(doc! { "$$age": { gte: 18 } })
        .sort_by_key("age", SortOrder::Descending)
        .collection()
        .await
        .unwrap();

    assert_eq!(deferred, eager_sorted);
    assert_eq!(pluck_strings(&deferred, "name"), vec!["Edsger", "Alan", "Ada"]);
}

#[tokio::test]
async fn test_deferred_terminals() {
    let people = || Eloquent::from_future(load_people());

    assert_eq!(people().count().await.unwrap(), 4);
    assert_eq!(people().sum("age").await.unwrap(), val!(166));
    assert_eq!(people().max("age").await.unwrap(), Some(val!(72)));
    assert_eq!(people().join("name", ", ", " and ").await.unwrap(), "Ada, Alan, Grace and Edsger");
    assert_eq!(people().where_eq("role", "intern").count().await.unwrap(), 1);
    assert!(people().where_eq("role", "astronaut").is_empty().await.unwrap());

    let groups = people().group_by("role").await.unwrap();
    assert_eq!(groups["engineer"].len(), 2);

    let page = people().pluck("name").paginate(2, Some(3)).await.unwrap();
    assert_eq!(page.items, vec![val!("Edsger")]);

    let names = people().pluck("name").sort().all().await.unwrap();
    assert_eq!(names, vec![val!("Ada"), val!("Alan"), val!("Edsger"), val!("Grace")]);
}

#[tokio::test]
async fn test_deferred_failure_reaches_caller() {
    let failing = async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Err(EloquentError::new("upstream unavailable", ErrorKind::DeferredError))
    };
    let err = Eloquent::from_future(failing)
        .where_op("age", ">", 18)
        .pluck("name")
        .join("", ", ", " and ")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DeferredError);
    assert_eq!(err.message(), "upstream unavailable");
}

#[tokio::test]
async fn test_deferred_macros_follow_the_chain() {
    let people = Eloquent::from_future(load_people())
        .add_macro("names", |c, _| Ok(val!(c.join("name", ",", ","))))
        .unwrap();

    let adults = people.where_op("age", ">=", 18).filter(|p| {
        p.as_document().and_then(|d| d.get("role")) != Some(&val!("professor"))
    });
    assert!(adults.has_macro("names"));
    assert_eq!(adults.call("names", vec![]).await.unwrap(), val!("Ada,Alan"));

    let resolved = Eloquent::from_future(load_people())
        .add_macro("size", |c, _| Ok(val!(c.count())))
        .unwrap()
        .collection()
        .await
        .unwrap();
    assert_eq!(resolved.slice(0, Some(2)).call("size", &[]).unwrap(), val!(2));
}

#[tokio::test]
async fn test_deferred_runs_on_spawned_tasks() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            tokio::spawn(async move {
                Eloquent::from_future(load_people())
                    .slice(i, Some(i + 1))
                    .pluck("name")
                    .first()
                    .await
            })
        })
        .collect();

    let mut names = Vec::new();
    for handle in handles {
        names.push(handle.await.unwrap().unwrap().unwrap_or_default());
    }
    assert_eq!(names, vec![val!("Ada"), val!("Alan"), val!("Grace"), val!("Edsger")]);
}
