use eloquent::collection::Collection;
use eloquent::common::Value;
use eloquent::config::EloquentConfig;
use eloquent::document::Document;
use eloquent::errors::EloquentResult;
use eloquent::model::Model;
use serde_json::json;
use std::backtrace::Backtrace;
use std::time::Instant;

/// Runs a test against a fresh context and reports failures with a backtrace.
pub fn run_test<T, B>(before: B, test: T)
where
    T: Fn(TestContext) -> EloquentResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> EloquentResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();
    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => test(ctx).map_err(|e| (format!("Test failed: {:?}", e), backtrace.to_string())),
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });
    let elapsed = start_time.elapsed();

    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("{}", error);
}

/// Fixtures shared by a single test.
#[derive(Clone, Debug)]
pub struct TestContext {
    config: EloquentConfig,
    people: Vec<Document>,
}

impl TestContext {
    pub fn new(config: EloquentConfig, people: Vec<Document>) -> Self {
        TestContext { config, people }
    }

    pub fn config(&self) -> EloquentConfig {
        self.config.clone()
    }

    pub fn people(&self) -> Collection {
        Collection::with_config(self.people.clone(), self.config.clone())
    }

    pub fn person(&self, index: usize) -> Model {
        let document = self.people.get(index).cloned().unwrap_or_default();
        Model::with_config(document, self.config.clone())
    }
}

pub fn create_test_context() -> EloquentResult<TestContext> {
    Ok(TestContext::new(EloquentConfig::new(), create_test_docs()?))
}

/// Same fixtures, addressed with `/` paths and a `@` operator marker.
pub fn create_custom_test_context() -> EloquentResult<TestContext> {
    let config = EloquentConfig::builder()
        .field_separator("/")
        .operator_marker("@")
        .per_page(2)
        .build()?;
    Ok(TestContext::new(config, create_test_docs()?))
}

pub fn create_test_docs() -> EloquentResult<Vec<Document>> {
    let people = json!([
        {
            "name": "Ada",
            "age": 36,
            "role": "engineer",
            "skills": ["math", "poetry"],
            "address": { "city": "London", "zip": "W1" },
            "salary": 5200.5
        },
        {
            "name": "Alan",
            "age": 41,
            "role": "engineer",
            "skills": ["math", "cryptography"],
            "address": { "city": "Wilmslow", "zip": "SK9" },
            "salary": 4800
        },
        {
            "name": "Grace",
            "age": 17,
            "role": "intern",
            "skills": ["compilers"],
            "address": { "city": "New York", "zip": "10001" },
            "salary": 1200
        },
        {
            "name": "Edsger",
            "age": 72,
            "role": "professor",
            "skills": ["algorithms", "math"],
            "address": { "city": "Austin", "zip": null }
        }
    ]);

    let mut docs = Vec::new();
    if let serde_json::Value::Array(items) = people {
        for item in items {
            docs.push(Document::from_json(item)?);
        }
    }
    Ok(docs)
}

/// Projects `path` of every item, for terse assertions.
pub fn pluck_strings(collection: &Collection, path: &str) -> Vec<String> {
    collection
        .pluck(path)
        .iter()
        .map(Value::to_plain_string)
        .collect()
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else if prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}
