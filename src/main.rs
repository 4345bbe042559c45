use eframe::egui;
use egui::ViewportBuilder;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod app;
mod config;
mod error;
mod hn_client;
mod models;
mod orchestrator;
mod reducer;
mod search;
mod storage;
mod theme;

#[cfg(test)]
mod test_support;

use crate::app::HackerStoriesApp;
use crate::config::AppConfig;
use crate::hn_client::HackerNewsClient;
use crate::orchestrator::FetchOrchestrator;

/// RUST_LOG wins when set; otherwise log this crate at info.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hacker_stories=info"));

    let _ = tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish(),
    );
}

fn main() -> Result<(), eframe::Error> {
    init_tracing();

    let config = AppConfig::load();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            std::process::exit(1);
        }
    };

    let client = match HackerNewsClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("My Hacker Stories"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();

    eframe::run_native(
        "Hacker Stories",
        options,
        Box::new(move |cc| {
            let mut orchestrator = FetchOrchestrator::new(
                client,
                handle,
                config.endpoint.clone(),
                config.stale_policy,
            );

            // Finished round-trips wake the UI so it can pump their outcomes
            let ctx = cc.egui_ctx.clone();
            orchestrator.set_notify(Arc::new(move || ctx.request_repaint()));

            let app = HackerStoriesApp::new(&config, cc.storage, orchestrator);
            Ok(Box::new(app))
        }),
    )
}
