//! Lazarova Wiki - Wikipedia retrieval
//!
//! Looks up the top search hit for a term and the page summary for a
//! title, using the public MediaWiki action API and the REST summary
//! endpoint. Snippets come back as HTML fragments and are cleaned with
//! [`strip_html`].

pub mod client;
pub mod sanitize;

pub use client::WikipediaClient;
pub use sanitize::{strip_html, strip_html_opt};
