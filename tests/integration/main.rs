//! Integration tests against local wiremock servers

mod common;
mod crawl_tests;
mod discovery_tests;
mod fetch_tests;
