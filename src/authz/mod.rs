pub mod permissions;
pub mod policy;
pub mod rpt_cache;
pub mod service;
