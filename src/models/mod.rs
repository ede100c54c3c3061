pub mod answer;
pub mod application;
pub mod candidate;
pub mod company;
pub mod job;
pub mod question;
pub mod test;
pub mod user;
