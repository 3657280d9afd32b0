pub mod activity;
pub mod ads;
pub mod board;
pub mod client;
pub mod contract;
pub mod project;
pub mod proposal;
pub mod session;
pub mod task;
pub mod template;
pub mod transaction;
pub mod user;
