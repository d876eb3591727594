use eloquent::collection::{Collection, Selector};
use eloquent::val;
use eloquent_int_test::test_util::{create_custom_test_context, create_test_context, run_test};

#[test]
fn test_sum_mixes_integers_and_floats() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            assert_eq!(people.sum("age"), val!(166));
            assert_eq!(people.sum("salary"), val!(11200.5));
            assert_eq!(people.sum("missing"), val!(0));
            Ok(())
        },
    )
}

#[test]
fn test_max_and_min_skip_missing_values() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            assert_eq!(people.max("salary"), Some(val!(5200.5)));
            assert_eq!(people.min("salary"), Some(val!(1200)));
            assert_eq!(people.min("age"), Some(val!(17)));
            assert_eq!(people.max("missing"), None);
            Ok(())
        },
    )
}

#[test]
fn test_aggregates_over_scalars() {
    let numbers = Collection::new(vec![4, 8, 15, 16, 23, 42]);
    assert_eq!(numbers.sum(""), val!(108));
    assert_eq!(numbers.max(""), Some(val!(42)));
    assert_eq!(numbers.min(""), Some(val!(4)));
    assert_eq!(numbers.join("", ", ", " and "), "4, 8, 15, 16, 23 and 42");
}

#[test]
fn test_join_names() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            assert_eq!(people.join("name", ", ", " & "), "Ada, Alan, Grace & Edsger");
            assert_eq!(people.slice(0, Some(1)).join("name", ", ", " & "), "Ada");
            assert_eq!(people.slice(4, None).join("name", ", ", " & "), "");
            Ok(())
        },
    )
}

#[test]
fn test_group_by_and_count_by() {
    run_test(
        || create_test_context(),
        |ctx| {
            let people = ctx.people();
            let groups = people.group_by("role");
            assert_eq!(
                groups.keys().cloned().collect::<Vec<_>>(),
                vec!["engineer", "intern", "professor"]
            );
            assert_eq!(groups["engineer"].len(), 2);

            let counts = people.count_by("address.zip");
            assert_eq!(counts.get("null"), Some(&1));

            let decades = people.count_by(Selector::by(|item| {
                let age = item.as_document().and_then(|d| d.get("age")).and_then(|v| v.as_i64());
                val!(age.map(|a| a / 10 * 10))
            }));
            assert_eq!(decades.get("30"), Some(&1));
            assert_eq!(decades.get("40"), Some(&1));
            assert_eq!(decades.get("10"), Some(&1));
            assert_eq!(decades.get("70"), Some(&1));
            Ok(())
        },
    )
}

#[test]
fn test_paginate_uses_configured_page_size() {
    run_test(
        || create_custom_test_context(),
        |ctx| {
            let people = ctx.people();
            let first = people.paginate(1, None);
            assert_eq!(first.per_page, 2);
            assert_eq!(first.items.len(), 2);
            assert_eq!(first.prev, None);
            assert_eq!(first.next, Some(2));

            let last = people.paginate(2, None);
            assert_eq!(last.prev, Some(1));
            assert_eq!(last.next, None);

            let beyond = people.paginate(5, None);
            assert!(beyond.items.is_empty());
            assert_eq!(beyond.next, None);
            Ok(())
        },
    )
}

#[test]
fn test_paginate_default_page_size() {
    let numbers = Collection::new(0..45);
    let page = numbers.paginate(0, None);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 20);
    assert_eq!(page.items.first(), Some(&val!(0)));
    assert_eq!(page.next, Some(2));

    let page = numbers.paginate(3, None);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.next, None);
}
