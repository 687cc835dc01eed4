use backend::impl_http::BackendHttp;
use config::Config;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::sync::Arc;
use upload_client::main::UploadClient;

mod backend;
mod config;
mod display;
mod library;
mod upload_client;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let backend = Arc::new(BackendHttp::new(config.clone(), logger.clone())?);

    let mut client = UploadClient::new(config, logger, backend);

    client.start();

    display::gui::run(client)?;

    Ok(())
}
