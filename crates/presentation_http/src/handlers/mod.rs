//! HTTP request handlers

pub mod failure;
pub mod health;
