//! REST backend for classified advertisements: registration and login,
//! user profiles, and advertisements that only their owner may change.

pub mod adverts;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;
pub mod store;
pub mod users;
pub mod validation;

#[cfg(test)]
mod test_support;
