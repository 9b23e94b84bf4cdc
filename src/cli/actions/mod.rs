pub mod server;

/// Actions the CLI can dispatch.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        locale: String,
    },
}
