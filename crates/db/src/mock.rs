//! Mockall doubles of the repository functions, for handler tests that run
//! without a database.

pub mod repositories;
