mod connection_tests;
mod error_handling_tests;
