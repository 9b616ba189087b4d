//! Plain data types shared by the actors, the gateway and the controller.

pub mod student;
pub mod user;

pub use student::*;
pub use user::*;
