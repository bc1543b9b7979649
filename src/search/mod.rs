//! News search providers
//!
//! [`SearchProvider`] is the seam between the gateway and whatever service
//! answers keyword searches; [`NewsApiProvider`] talks to a NewsAPI-compatible
//! `/v2/everything` endpoint.

mod newsapi;
mod provider;

pub use newsapi::NewsApiProvider;
pub use provider::SearchProvider;
