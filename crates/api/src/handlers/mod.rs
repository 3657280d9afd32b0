pub mod activity;
pub mod ads;
pub mod auth;
pub mod board;
pub mod client;
pub mod contract;
pub mod health;
pub mod project;
pub mod proposal;
pub mod share;
pub mod storage;
pub mod task;
pub mod template;
pub mod transaction;
pub mod user;
pub mod webhooks;
