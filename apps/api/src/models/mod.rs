pub mod audit;
pub mod post;
pub mod user;
