//! HTML status page
//!
//! Configured values are substituted verbatim, without HTML escaping, so
//! the page always contains the literal app name and version.

use crate::config::Config;
use crate::runtime::RuntimeSnapshot;
use askama::Template;
use tracing::warn;

#[derive(Template)]
#[template(path = "status.html", escape = "none")]
struct StatusPage<'a> {
    app_name: &'a str,
    app_version: &'a str,
    hostname: &'a str,
    platform: &'a str,
    runtime: &'a str,
    uptime_secs: u64,
}

/// Render the status page for the current configuration and snapshot
///
/// Uptime is shown in whole seconds.
pub fn render(config: &Config, snapshot: &RuntimeSnapshot) -> String {
    let page = StatusPage {
        app_name: &config.app_name,
        app_version: &config.app_version,
        hostname: &snapshot.hostname,
        platform: snapshot.platform,
        runtime: snapshot.runtime_version,
        uptime_secs: snapshot.uptime.as_secs(),
    };

    page.render().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to render status page");
        format!("{} v{}", config.app_name, config.app_version)
    })
}
