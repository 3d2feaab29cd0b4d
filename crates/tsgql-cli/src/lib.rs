//! Command line front end for tsgql.
//!
//! `ts2gql schema.ts Schema` loads `schema.ts` and everything it imports,
//! collects the type graph reachable from `Schema` (plus any interface
//! tagged `@graphql schema`) and prints it as GraphQL SDL.

pub mod args;
pub mod config;
pub mod driver;
pub mod tracing_config;
