pub mod dispatch;
pub mod info;
pub mod install;
pub mod uninstall;
pub mod verify;
