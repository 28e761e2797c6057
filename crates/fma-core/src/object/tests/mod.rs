#[cfg(test)]
mod tree_tests;
