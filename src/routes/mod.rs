pub mod janitor;
pub mod server;
pub mod settings;

use log::debug;

pub async fn healthcheck() -> String {
    debug!("Health check endpoint hit");

    "ok".to_string()
}
