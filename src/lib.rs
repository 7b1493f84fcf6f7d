pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod mealplans;
pub mod recipes;
pub mod shopping;
pub mod state;
