pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod payments;
pub mod state;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;
