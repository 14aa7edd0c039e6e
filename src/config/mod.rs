pub mod service;

pub use service::ServiceConfig;
