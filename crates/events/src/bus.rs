use super::models::{AppEvent, EventBus, EvictionReason};
use colored::Colorize;
use std::sync::Arc;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn emit(&self, event: AppEvent) {
        match event {
            // Application lifecycle
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "MCPulse - Minecraft Server Status API".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Ready { addr } => {
                println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
                println!("  {} {}", "Listening".white(), addr.cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
            }
            AppEvent::Shutdown => {
                println!("\n{}", "Server shutting down".red());
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { .. } => {
                println!("  {} Configuration loaded", "✓".green());
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }

            // Persistence
            AppEvent::StorageLoaded { ping, query } => {
                println!(
                    "  {} {} ping / {} query server(s) restored",
                    "✓".green(),
                    ping.to_string().cyan(),
                    query.to_string().cyan()
                );
            }
            AppEvent::StorageDisabled => {
                // Silent - in-memory only is the default
            }

            // Refresh scheduling
            AppEvent::RefreshEnabled { interval } => {
                println!("  {} Refresh every {}s", "↻".blue(), interval.to_string().cyan());
            }
            AppEvent::RefreshDisabled => {
                println!("  {} Background refresh disabled", "⚠".yellow());
            }
            AppEvent::SweepStarted { .. } => {
                // Silent during sweeps
            }
            AppEvent::SweepCompleted { kind, duration } => {
                tracing::debug!("{} sweep finished in {:.2}s", kind, duration.as_secs_f64());
            }

            // Probe / cache outcomes
            AppEvent::CacheNew { kind, addr } => {
                tracing::debug!("new {} entry for {}", kind, addr);
            }
            AppEvent::CacheEvicted { kind, addr, reason } => match reason {
                EvictionReason::Fatal => {
                    tracing::debug!("dropped unreachable {} entry for {}", kind, addr);
                }
                EvictionReason::VeryOld => {
                    tracing::info!("very old server {} left the {} refresh set", addr, kind);
                }
            },
            AppEvent::ProbeTimeout { kind, addr } => {
                tracing::warn!("{} probe for {} hit the job deadline", kind, addr);
            }

            // Abuse
            AppEvent::RateLimited { client, count } => {
                tracing::info!("rate limited {} ({} offenses)", client, count);
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}
