pub mod auth;
pub mod checkpoint;
pub mod children;
pub mod incidents;
pub mod parents;
