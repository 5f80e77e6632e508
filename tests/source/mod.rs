//! Document store tests
