use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, Resource};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

/// Set once the OTLP pipeline is installed.
static OTLP_EXPORTER: OnceCell<String> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub otlp_endpoint: Option<String>,
    pub enable_tracing: bool,
    pub export_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            enable_tracing: std::env::var("OTEL_TRACES_ENABLED")
                .map(|v| v.parse().unwrap_or(true))
                .unwrap_or(true),
            export_timeout: Duration::from_secs(30),
        }
    }
}

impl TelemetryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            environment: config.app.environment.as_str().to_string(),
            ..Self::default()
        }
    }
}

/// Telemetry handles for graceful shutdown
pub struct TelemetryHandles {
    _config: TelemetryConfig,
}

impl TelemetryHandles {
    /// Flushes pending spans and shuts the tracer provider down.
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down telemetry providers...");
        global::shutdown_tracer_provider();
        info!("Telemetry providers shutdown completed");
        Ok(())
    }
}

pub async fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryHandles> {
    setup_tracing_subscriber()?;

    info!(
        "Initializing telemetry for service: {} v{} in environment: {}",
        config.service_name, config.service_version, config.environment
    );

    if config.enable_tracing {
        init_tracing(&config)?;
    }

    Ok(TelemetryHandles { _config: config })
}

fn create_resource(config: &TelemetryConfig) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    let Some(endpoint) = &config.otlp_endpoint else {
        info!("No OTLP endpoint configured, using console-only tracing");
        return Ok(());
    };

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint)
                .with_timeout(config.export_timeout),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::config()
                .with_resource(create_resource(config))
                .with_sampler(opentelemetry_sdk::trace::Sampler::AlwaysOn),
        )
        .install_batch(runtime::Tokio)
        .context("Failed to initialize OTLP tracer")?;

    let _ = OTLP_EXPORTER.set(endpoint.clone());
    info!("Distributed tracing initialized with OTLP exporter at {}", endpoint);
    Ok(())
}

fn setup_tracing_subscriber() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}=debug,tower_http=info", env!("CARGO_CRATE_NAME")).into());

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Request counters and latencies, emitted as debug events until a metrics
/// exporter is wired in.
#[derive(Debug, Clone)]
pub struct RequestMeter {
    name: &'static str,
}

impl RequestMeter {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn record(&self, duration: Duration, attributes: &[KeyValue]) {
        let labels: Vec<String> = attributes
            .iter()
            .map(|kv| format!("{}={}", kv.key.as_str(), kv.value.as_str()))
            .collect();
        tracing::debug!(
            meter = self.name,
            duration_ms = duration.as_millis() as u64,
            labels = %labels.join(","),
            "Request recorded"
        );
    }
}

pub fn telemetry_health_check() -> HashMap<String, bool> {
    let mut health = HashMap::new();
    health.insert("tracing_subscriber".to_string(), true);
    health.insert("otlp_exporter".to_string(), OTLP_EXPORTER.get().is_some());
    health
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_exporter_state() {
        let health = telemetry_health_check();
        assert_eq!(health.get("tracing_subscriber"), Some(&true));
        assert!(health.contains_key("otlp_exporter"));
    }

    #[test]
    fn default_config_names_this_service() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "dm-training-backend");
        assert_eq!(config.environment, "development");
    }
}
