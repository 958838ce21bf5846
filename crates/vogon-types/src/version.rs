//! Name and version of this build, shared by the server and the client.

/// Program name.
pub const NAME: &str = "vogon";

/// Version of the workspace crates.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `"vogon <version>"`, compared verbatim by clients connecting to a server.
pub fn name_and_version() -> String {
    format!("{NAME} {VERSION}")
}
