pub mod artifact;
pub mod config;
pub mod error;
pub mod inspect;
pub mod model;
pub mod preprocess;
pub mod result;
pub mod routes;
pub mod session;
pub mod validation;
