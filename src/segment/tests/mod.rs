mod test_utils;
mod predicate_tests;
mod relabel_tests;
mod overlap_tests;
