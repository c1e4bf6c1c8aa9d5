pub mod network;
pub mod scanner;
pub mod system;
pub mod vendors;
