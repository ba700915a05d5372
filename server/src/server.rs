use serde::{de, Deserialize, Deserializer, Serialize};
use shared::MapStyle;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use super::regions;
use super::snapshots::{ServiceError, SnapshotService};

pub async fn run(address: std::net::SocketAddr, service: Arc<SnapshotService>) {
    log::info!("Listening on {}", address);
    warp::serve(routes(service)).run(address).await
}

pub fn routes(
    service: Arc<SnapshotService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health_route = warp::path!("health")
        .and(warp::get())
        .map(|| StatusCode::OK);

    let regions_route = warp::path!("regions")
        .and(warp::get())
        .map(|| warp::reply::json(&regions::all()));

    let snapshot_route = warp::path!("regions" / String / "snapshot")
        .and(warp::get())
        .and(warp::query::<SnapshotQuery>())
        .and(with_service(service.clone()))
        .and_then(snapshot);

    let refresh_route = warp::path!("regions" / String / "refresh")
        .and(warp::post())
        .and(with_service(service))
        .and_then(refresh);

    health_route
        .or(regions_route)
        .or(snapshot_route)
        .or(refresh_route)
        .recover(rejection)
}

fn with_service(
    service: Arc<SnapshotService>,
) -> impl Filter<Extract = (Arc<SnapshotService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    #[serde(default, deserialize_with = "parse_style")]
    pub style: Option<MapStyle>,
    pub hour: Option<u32>,
}

/// Style keys go through `MapStyle::from_str`, so `?style=Dark` works like the CLI.
fn parse_style<'de, D>(deserializer: D) -> Result<Option<MapStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|key| key.parse().map_err(de::Error::custom))
        .transpose()
}

pub async fn snapshot(
    region: String,
    query: SnapshotQuery,
    service: Arc<SnapshotService>,
) -> Result<impl Reply, Rejection> {
    if let Some(hour) = query.hour.filter(|h| *h > 23) {
        return Err(warp::reject::custom(BadRequest(format!(
            "hour out of range: {}",
            hour
        ))));
    }

    service
        .snapshot(&region, query.style, query.hour)
        .await
        .map(|snapshot| warp::reply::json(&snapshot))
        .map_err(|e| warp::reject::custom(Error(e)))
}

pub async fn refresh(region: String, service: Arc<SnapshotService>) -> Result<impl Reply, Rejection> {
    service
        .refresh(&region)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| warp::reject::custom(Error(e)))
}

#[derive(Debug)]
struct Error(ServiceError);
impl warp::reject::Reject for Error {}

#[derive(Debug)]
struct BadRequest(String);
impl warp::reject::Reject for BadRequest {}

#[derive(Serialize)]
struct ErrorMessage {
    code: u16,
    message: String,
}

pub async fn rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found.".to_string())
    } else if let Some(Error(e)) = err.find::<Error>() {
        match e {
            ServiceError::UnknownRegion(_) => (StatusCode::NOT_FOUND, e.to_string()),
        }
    } else if let Some(BadRequest(message)) = err.find::<BadRequest>() {
        (StatusCode::BAD_REQUEST, message.clone())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.".to_string())
    } else {
        log::error!("Error: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error.".to_string(),
        )
    };

    let json = warp::reply::json(&ErrorMessage {
        code: code.as_u16(),
        message,
    });

    Ok(warp::reply::with_status(json, code))
}
