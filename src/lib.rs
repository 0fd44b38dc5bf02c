//! Reqres Client Library
//!
//! A layered client for the reqres user-directory API: a retrying HTTP
//! transport, an API client that pages through and maps users, a service
//! trait, and a caching decorator over that trait.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod service;
pub mod transport;
