pub mod enrich;
pub mod identity;
pub mod session_refresh;
