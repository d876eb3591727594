mod find_test;
mod operator_test;
