pub mod chat;
pub mod clue;
pub mod enquire;
pub mod init;
pub mod speak;
