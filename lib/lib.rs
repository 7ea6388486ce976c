pub(crate) mod util;

pub mod alerts;
pub mod community;
pub mod config;
pub mod descriptor;
pub mod identity;
pub mod releases;
pub mod repo;
pub mod result;
pub mod sources;
pub mod status;
pub mod validate;
pub mod view;
