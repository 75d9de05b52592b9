pub mod add;
pub mod delete;
pub mod due;
pub mod init;
pub mod list;
pub mod review;
pub mod serve;
