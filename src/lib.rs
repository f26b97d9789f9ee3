pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod operations;
pub mod pipeline;
pub mod recipe;
pub mod shared;
pub mod workbench;
