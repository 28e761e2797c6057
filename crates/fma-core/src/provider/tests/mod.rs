#[cfg(test)]
mod migration_tests;
#[cfg(test)]
mod status_tests;
