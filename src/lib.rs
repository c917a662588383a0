pub mod config;
pub mod error;
pub mod guard;
pub mod guard_server;
pub mod middleware;
pub mod routes;
