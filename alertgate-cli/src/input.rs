//! Input loading for stream commands -- frame lines, resolver files, config fallback
//!
//! Frame files carry one JSON object per line. `category` and `element` are the
//! wire ids; every other key belongs to the event payload, so the whole line is
//! kept as the frame payload and decoders simply ignore keys they do not know:
//!
//! ```json
//! {"category": 1, "element": 24, "host_id": 12, "service_id": 31, "state": 2}
//! ```
//!
//! Resolver files map raw monitoring ids to display names:
//!
//! ```json
//! {"hosts": [{"id": 12, "name": "web01"}],
//!  "services": [{"host_id": 12, "service_id": 31, "description": "http"}]}
//! ```

use std::path::Path;

use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use alertgate_classifier::MapResolver;
use alertgate_core::config::AlertgateConfig;
use alertgate_core::event::RawFrame;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Load configuration for the stream commands.
///
/// A missing file at the default location is not an error: `run` and
/// `classify` fall back to built-in defaults plus environment overrides so
/// they work without a config file on disk. An explicitly given path that
/// does not exist still fails.
pub async fn load_config(path: &Path) -> Result<AlertgateConfig, CliError> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        info!("no alertgate.toml found, using built-in defaults");
        let mut config = AlertgateConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        return Ok(config);
    }
    Ok(AlertgateConfig::load(path).await?)
}

/// Header fields of one frame line.
#[derive(Debug, Deserialize)]
struct FrameHeader {
    category: u16,
    element: u16,
}

/// Parse one line of a frame file into a wire frame.
///
/// The full line becomes the frame payload; only `category` and `element`
/// are read here.
pub fn parse_frame_line(line: &str) -> Result<RawFrame, serde_json::Error> {
    let header: FrameHeader = serde_json::from_str(line)?;
    Ok(RawFrame::new(
        header.category,
        header.element,
        Bytes::copy_from_slice(line.as_bytes()),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResolverFile {
    hosts: Vec<HostEntry>,
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct HostEntry {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    host_id: u64,
    service_id: u64,
    description: String,
}

/// Load a name resolver from an optional JSON mapping file.
///
/// Without a file the resolver is empty, which means service events are
/// anonymous and will be rejected while `skip_anon_events` is on.
pub fn load_resolver(path: Option<&Path>) -> Result<MapResolver, CliError> {
    let mut resolver = MapResolver::new();
    let Some(path) = path else {
        return Ok(resolver);
    };

    let content = std::fs::read_to_string(path)?;
    let file: ResolverFile = serde_json::from_str(&content)
        .map_err(|e| CliError::Input(format!("resolver file {}: {}", path.display(), e)))?;

    for host in file.hosts {
        resolver.insert_host(host.id, host.name);
    }
    for service in file.services {
        resolver.insert_service(service.host_id, service.service_id, service.description);
    }

    info!(
        hosts = resolver.host_count(),
        services = resolver.service_count(),
        "name resolver loaded"
    );
    Ok(resolver)
}
