use anyhow::Result;
use mcpulse_config::Config;
use mcpulse_events::{AppEvent, EventBus};
use std::sync::Arc;

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    events.emit(AppEvent::ConfigLoading {
        path: config_path.to_string(),
    });

    let config_exists = std::path::Path::new(config_path).exists();
    let config = Config::from_file(config_path).await?;

    if !config_exists {
        events.emit(AppEvent::ConfigCreated {
            path: config_path.to_string(),
        });
    }

    events.emit(AppEvent::ConfigLoaded {
        path: config_path.to_string(),
    });

    Ok(config)
}
