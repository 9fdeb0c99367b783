pub extern crate actix_web;

pub mod config;
pub mod connection;
mod connection_tx_storage;
pub mod handlers;
pub mod presentation;
mod room;
pub mod server;
mod server_state;
