//! Service entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use course_lists::domain::{CourseListKind, CourseListService};
use course_lists::inbound::http::health::HealthState;
use course_lists::inbound::http::state::{CourseListPorts, HttpState};
use course_lists::outbound::catalogue::HttpCourseCatalogue;
use course_lists::outbound::persistence::{
    DbPool, DieselCourseListRepository, PoolConfig, run_pending_migrations,
};
use course_lists::settings::ServiceSettings;
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

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?.to_owned();
    let endpoint = settings.catalogue_endpoint()?;
    let bind_addr = settings.bind_addr()?;

    if settings.run_migrations() {
        let applied = run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(
        PoolConfig::new(&database_url).with_max_size(settings.db_max_connections),
    )
    .await
    .map_err(|err| eyre!("failed to build database pool: {err}"))?;

    let catalogue = HttpCourseCatalogue::new(&endpoint.host, endpoint.port, endpoint.timeout)
        .wrap_err("invalid course catalogue address")?;
    catalogue.probe().await.wrap_err_with(|| {
        format!(
            "course catalogue unreachable at {}:{}",
            endpoint.host, endpoint.port
        )
    })?;
    info!(url = %catalogue.base_url(), "course catalogue reachable");

    let http_state = build_http_state(pool, Arc::new(catalogue));
    let config = ServerConfig::new(bind_addr, http_state);
    info!(addr = %config.bind_addr(), "starting HTTP server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

fn build_http_state(pool: DbPool, catalogue: Arc<HttpCourseCatalogue>) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = |kind| {
        Arc::new(DieselCourseListRepository::new(
            kind,
            pool.clone(),
            clock.clone(),
        ))
    };

    let bookmarks = CourseListService::bookmarks(
        repository(CourseListKind::Bookmark),
        catalogue.clone(),
        clock.clone(),
    );
    let carts = CourseListService::carts(repository(CourseListKind::Cart), catalogue, clock.clone());

    HttpState::new(
        CourseListPorts::from_service(Arc::new(bookmarks)),
        CourseListPorts::from_service(Arc::new(carts)),
    )
}
