//! integrated tests

mod converter;
mod filter;
mod parsing;
