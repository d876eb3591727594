mod deferred_test;
