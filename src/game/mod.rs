pub mod acceptor;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payload;
pub mod resolver;
pub mod service;
pub mod validation;
