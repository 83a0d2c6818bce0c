//! Capacitive touch controllers

pub mod gt911;

pub use gt911::Gt911;
