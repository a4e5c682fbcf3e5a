pub mod errors;
pub mod generator;
pub mod models;
pub mod providers;
pub mod retriever;
pub mod tools;
