//! Portal entry-point: loads configuration, wires the upstream client and
//! serves the action endpoints, health probes and OpenAPI docs.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use department_portal::inbound::http::cookie_config::cookie_policy_from_env;
use department_portal::inbound::http::health::HealthState;
use department_portal::inbound::http::state::HttpStatePorts;
use department_portal::outbound::cache::RevisionTracker;
use department_portal::outbound::upstream::HttpDepartmentApi;
use department_portal::settings::PortalSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = PortalSettings::load_from_iter(args).context("load portal settings")?;
    let api_base_url = settings.api_base_url()?;
    let bind_addr = settings.bind_addr()?;
    let cookies = cookie_policy_from_env(&mockable::DefaultEnv::new())?;

    let api = HttpDepartmentApi::new(api_base_url, settings.upstream_timeout())
        .context("build upstream client")?;
    info!(upstream = %api.base_url(), "upstream departments API configured");

    let ports = HttpStatePorts {
        api: Arc::new(api),
        refresh: Arc::new(RevisionTracker::new()),
    };
    let config = ServerConfig::new(ports, cookies, bind_addr).with_origins(settings.origin_policy());
    info!(
        addr = %config.bind_addr(),
        secure_cookies = config.cookies.secure,
        "starting department portal"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
