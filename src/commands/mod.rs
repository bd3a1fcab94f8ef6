pub mod check;
pub mod edit;
pub mod init;
pub mod layout;
pub mod show;
pub mod view;
