pub mod features;
pub mod routes;
pub mod services;
pub mod utilities;
