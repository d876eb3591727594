use eloquent::collection::{Collection, PadDirection};
use eloquent::common::{SortOrder, Value};
use eloquent::{doc, val};
use eloquent_int_test::test_util::{create_test_context, is_sorted, pluck_strings, run_test};

#[test]
fn test_sort_by_key_both_directions() {
    run_test(
        || create_test_context(),
        |ctx| {
            let mut people = ctx.people();
            people.sort_by_key("age", SortOrder::Ascending);
            let ages: Vec<i64> = people.pluck("age").iter().filter_map(Value::as_i64).collect();
            assert!(is_sorted(ages.iter(), true));

            people.sort_by_key("salary", SortOrder::Descending);
            assert_eq!(pluck_strings(&people, "name"), vec!["Edsger", "Ada", "Alan", "Grace"]);
            Ok(())
        },
    )
}

#[test]
fn test_projection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people().slice(0, Some(2));
            let only = people.only(&["name", "address.city"])?;
            assert_eq!(
                only.all(),
                &[
                    val!(doc! { name: "Ada", address: { city: "London" } }),
                    val!(doc! { name: "Alan", address: { city: "Wilmslow" } }),
                ]
            );

            let forgotten = people.forget(&["skills", "salary", "address.zip", "age", "role"]);
            assert_eq!(forgotten.first(), Some(&val!(doc! { name: "Ada", address: { city: "London" } })));
            assert_eq!(people.except(&["skills"]).keys(), vec!["name", "age", "role", "address", "salary"]);
            Ok(())
        },
    )
}

#[test]
fn test_pluck_and_unique() {
    run_test(
        || create_test_context(),
        |ctx| {
            let roles = ctx.people().pluck("role").unique();
            assert_eq!(roles.all(), &[val!("engineer"), val!("intern"), val!("professor")]);

            let by_role = ctx.people().unique_by("role");
            assert_eq!(pluck_strings(&by_role, "name"), vec!["Ada", "Grace", "Edsger"]);
            Ok(())
        },
    )
}

#[test]
fn test_map_reduce_and_predicates() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            let labels = people.map(|p, i| {
                let name = p.as_document().and_then(|d| d.get("name")).map(Value::to_plain_string);
                format!("{}:{}", i, name.unwrap_or_default())
            });
            assert_eq!(labels.first(), Some(&val!("0:Ada")));

            let skills = people.reduce(
                |acc, p, _| {
                    acc + p
                        .as_document()
                        .and_then(|d| d.get("skills"))
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len)
                },
                0,
            );
            assert_eq!(skills, 7);

            let has_age = |p: &Value| p.as_document().map_or(false, |d| d.contains_key("age"));
            assert!(people.every(has_age));
            assert!(people.some(|p| p.as_document().map_or(false, |d| !d.contains_key("salary"))));
            assert_eq!(people.index_of(|p| p.as_document().and_then(|d| d.get("name")) == Some(&val!("Grace"))), Some(2));
            Ok(())
        },
    )
}

#[test]
fn test_each_stops_early() {
    run_test(
        || create_test_context(),
        |ctx| {
            let mut seen = Vec::new();
            ctx.people().each(|p, i| {
                seen.push(p.as_document().and_then(|d| d.get("name")).cloned().unwrap_or_default());
                i < 1
            });
            assert_eq!(seen, vec![val!("Ada"), val!("Alan")]);
            Ok(())
        },
    )
}

#[test]
fn test_chunk_pad_compact() {
    let letters = Collection::new(vec!["a", "b", "c", "d", "e"]);
    let chunks = letters.chunk(2);
    assert_eq!(chunks.count(), 3);
    assert_eq!(chunks.last(), Some(&val!(vec!["e"])));

    let padded = letters.slice(0, Some(2)).pad(4, "-", PadDirection::Left);
    assert_eq!(padded.all(), &[val!("-"), val!("-"), val!("a"), val!("b")]);
    assert_eq!(letters.pad(2, "-", PadDirection::Right).count(), 5);

    let messy = Collection::new(vec![val!(1), Value::Null, val!("  "), val!(doc! {}), val!("x")]);
    assert_eq!(messy.compact().all(), &[val!(1), val!("x")]);
}

#[test]
fn test_mutating_methods() {
    let mut numbers = Collection::new(vec![1, 2, 3, 4]);
    numbers.push(5).unshift(0);
    assert_eq!(numbers.count(), 6);
    assert_eq!(numbers.pop(), Some(val!(5)));
    assert_eq!(numbers.shift(), Some(val!(0)));

    let removed = numbers.splice(1, 2, vec![20, 30, 35]);
    assert_eq!(removed.all(), &[val!(2), val!(3)]);
    assert_eq!(numbers.all(), &[val!(1), val!(20), val!(30), val!(35), val!(4)]);

    numbers.shuffle();
    numbers.sort();
    assert_eq!(numbers.all(), &[val!(1), val!(4), val!(20), val!(30), val!(35)]);

    let picked = numbers.random(3);
    assert_eq!(picked.count(), 3);
    assert_eq!(picked.unique().count(), 3);
    assert!(picked.every(|v| numbers.all().contains(v)));
}

#[test]
fn test_conditional_transforms() {
    run_test(
        || create_test_context(),
        |ctx| {
            let only_adults = true;
            let adults = ctx
                .people()
                .when(only_adults, |c| c.where_op("age", ">=", 18).unwrap_or_default())
                .when_empty(|c| c.collect(vec![doc! { name: "nobody" }]));
            assert_eq!(adults.count(), 3);

            let empty = ctx
                .people()
                .when_else(false, |c| c, |c| c.filter(|_| false))
                .when_empty(|c| c.collect(vec![doc! { name: "nobody" }]));
            assert_eq!(pluck_strings(&empty, "name"), vec!["nobody"]);

            let total = ctx.people().pipe(|c| c.count() * 10);
            assert_eq!(total, 40);
            Ok(())
        },
    )
}
