pub mod brand;
pub mod call;
pub mod completions;
pub mod config;
pub mod functions;
pub mod session;
