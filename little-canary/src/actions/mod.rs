pub mod exec;
pub mod files;
pub mod net;
