pub mod api;
pub mod coordinator;
pub mod delivery;
pub mod headless;
pub mod runtime;
pub mod vapid;
