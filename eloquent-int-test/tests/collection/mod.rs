mod aggregate_test;
mod macro_test;
mod reshape_test;
