//! Shared integration-test infrastructure: containerized Postgres,
//! per-test databases, and a wired-up service context.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
