pub mod common;
pub mod notification;
pub mod subscription;
