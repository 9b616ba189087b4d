//! # Persistence Gateway
//!
//! The server side of the system: [`GatewayService`] executes the operations named in
//! [`GatewayRequest`] against the student and user actors and answers with a
//! [`GatewayResponse`].

pub mod api;
pub mod service;

pub use api::*;
pub use service::GatewayService;
