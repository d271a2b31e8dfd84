//! Device identity and environment report.

use std::net::IpAddr;
use std::path::Path;

use chrono::Utc;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::debug;

use crate::access::Requester;
use crate::errors::ServiceError;
use crate::{freespace, instance};

const DOCKER_MARKER: &str = "/.dockerenv";

#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    pub content_storage_free_space: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,
}

/// URLs the server listens on. An unspecified bind address expands to every
/// IPv4 interface address.
pub fn listening_urls(host: &str, port: u16, prefix: &str) -> Vec<String> {
    match host.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() => match local_ip_address::list_afinet_netifas() {
            Ok(ifaces) => ifaces
                .into_iter()
                .filter_map(|(_, addr)| match addr {
                    IpAddr::V4(v4) => Some(format!("http://{}:{}{}", v4, port, prefix)),
                    IpAddr::V6(_) => None,
                })
                .collect(),
            Err(e) => {
                debug!(err = %e, "interface listing failed");
                Vec::new()
            }
        },
        _ => vec![format!("http://{}:{}{}", host, port, prefix)],
    }
}

/// Drop loopback URLs unless nothing else would remain.
pub fn filter_loopback(urls: Vec<String>) -> Vec<String> {
    let filtered: Vec<String> = urls
        .iter()
        .filter(|u| !u.contains("127.0.0.1") && !u.contains("localhost"))
        .cloned()
        .collect();
    if filtered.is_empty() { urls } else { filtered }
}

/// Listening URLs, falling back to the request's own `Host` when discovery finds none.
pub fn device_urls(cfg: &AppConfig, request_host: Option<&str>) -> Vec<String> {
    let prefix = &cfg.deployment.url_path_prefix;
    let mut urls = listening_urls(&cfg.server.host, cfg.server.port, prefix);
    if urls.is_empty() {
        if let Some(host) = request_host {
            urls.push(format!("http://{}{}", host, prefix));
        }
    }
    filter_loopback(urls)
}

pub fn installation_type(configured: Option<&str>, docker_marker: &Path) -> String {
    if let Some(kind) = configured {
        return kind.to_string();
    }
    if docker_marker.exists() { "Docker".into() } else { "Unknown".into() }
}

/// Current time in the configured zone, RFC 3339 with offset.
pub fn server_time(time_zone: &str) -> String {
    match time_zone.parse::<chrono_tz::Tz>() {
        Ok(tz) => Utc::now().with_timezone(&tz).to_rfc3339(),
        Err(_) => Utc::now().to_rfc3339(),
    }
}

/// Build the report. Non-superusers only learn the version and content free space.
pub async fn device_info(
    db: &DatabaseConnection,
    cfg: &AppConfig,
    request_host: Option<&str>,
    requester: &Requester,
) -> Result<DeviceInfo, ServiceError> {
    let content_storage_free_space = freespace::free_space_nearest(&cfg.paths.content_dir())?;
    let mut info = DeviceInfo {
        version: crate::VERSION.to_string(),
        urls: None,
        database_path: None,
        device_id: None,
        os: None,
        content_storage_free_space,
        server_time: None,
        server_timezone: None,
        installer: None,
    };
    if !requester.is_superuser() {
        return Ok(info);
    }

    let (instance, _) = instance::get_or_create_current_instance(db).await?;
    info.urls = Some(device_urls(cfg, request_host));
    info.database_path = Some(models::db::database_path(&cfg.database.url));
    info.device_id = Some(instance.id);
    info.os = Some(instance.platform);
    info.server_time = Some(server_time(&cfg.deployment.time_zone));
    info.server_timezone = Some(cfg.deployment.time_zone.clone());
    info.installer = Some(installation_type(cfg.deployment.installer.as_deref(), Path::new(DOCKER_MARKER)));
    Ok(info)
}
