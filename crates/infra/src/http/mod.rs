//! HTTP transport shared by the upstream adapters

pub mod client;
pub mod cookies;

pub use client::{HttpClient, HttpClientBuilder};
pub use cookies::{find_cookie, SessionCookie};
