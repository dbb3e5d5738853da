//! HTTP API handlers for bookrec-api

pub mod buildinfo;
pub mod health;
pub mod popular;
pub mod recommend;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use popular::get_popular;
pub use recommend::post_recommend;
