//! HERE Artifact Service client.
//!
//! Resolves the Artifact Service URL for a token endpoint through a
//! memory/file/network resolver chain, authorizes requests with a bearer token
//! minted once per client, and executes them with rate-limit aware retries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod artifact;
pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod layout;
pub mod models;
pub mod resolver;

pub use artifact::{Artifact, PathResolution};
pub use auth::{AuthorizationCache, HereAccountMinter, TokenMinter};
pub use client::ArtifactWagon;
pub use config::WagonConfig;
pub use credentials::{Credentials, CredentialsSource};
pub use error::{ResolveError, WagonError, WagonResult};
pub use layout::{HereLayout, Maven2Layout, RepositoryLayout};
pub use resolver::{FileResolver, InMemoryResolver, LookupResolver, ResolverChain, ServiceUrlResolver};
