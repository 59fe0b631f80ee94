pub mod applications;
pub mod catalog;
pub mod properties;
pub mod schemas;
pub mod search;
pub mod users;
