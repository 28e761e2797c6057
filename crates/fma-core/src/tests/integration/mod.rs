#![cfg(test)]

pub mod common;
mod duplication_tests;
mod migration_tests;
mod registry_tests;
mod roundtrip_tests;
mod validity_tests;
