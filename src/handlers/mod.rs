pub mod answers;
pub mod applications;
pub mod candidates;
pub mod companies;
pub mod jobs;
pub mod questions;
pub mod tests;
pub mod users;
