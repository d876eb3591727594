use eloquent::collection::Collection;
use eloquent::common::SortOrder;
use eloquent::doc;
use eloquent::errors::EloquentResult;
use rand::Rng;

const ROLES: [&str; 4] = ["engineer", "intern", "manager", "professor"];

fn main() -> EloquentResult<()> {
    colog::init();
    println!("Starting stress test...");

    let count = 200000;
    let mut rng = rand::rng();

    let start = std::time::Instant::now();
    let records = (0..count)
        .map(|i| {
            doc! {
                id: i,
                age: (rng.random_range(0..100)),
                role: (ROLES[rng.random_range(0..ROLES.len())]),
                address: { zip: (rng.random_range(10000..99999)) },
            }
        })
        .collect::<Vec<_>>();
    let people = Collection::new(records);
    println!("Built {} records in {:?}", people.count(), start.elapsed());

    let start = std::time::Instant::now();
    let adults = people.find(doc! { "$$age": { gte: 18 }, role: "engineer" })?;
    println!("Found {} adult engineers in {:?}", adults.count(), start.elapsed());

    let start = std::time::Instant::now();
    let groups = people.count_by("role");
    println!("Grouped by role in {:?}: {:?}", start.elapsed(), groups);

    let start = std::time::Instant::now();
    let mut sorted = people.clone();
    sorted.sort_by_key("address.zip", SortOrder::Descending);
    println!("Sorted by zip in {:?}", start.elapsed());

    let start = std::time::Instant::now();
    let page = sorted.paginate(100, Some(50));
    println!(
        "Paginated to page {} ({} items) in {:?}",
        page.page,
        page.items.len(),
        start.elapsed()
    );

    let start = std::time::Instant::now();
    let total = people.sum("age");
    println!("Summed ages to {} in {:?}", total, start.elapsed());

    Ok(())
}
