pub mod adapters;
pub mod api;
pub mod application;
pub mod demo;
pub mod domain;
pub mod ports;
