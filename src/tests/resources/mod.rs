mod client_tests;
mod collection_tests;
mod health_tests;
