use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use actix_cors::Cors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use log::{error, info};

use linkedin_scraper_lib::{logger, view};
use linkedin_scraper_lib::{JobFetcher, JobView, LinkedinScraper, ScraperConfig, SearchOptions};

mod session_store;
use session_store::SessionStore;

// Each Search / Load more click asks for this many more jobs than are
// currently showing.
const RESULTS_PER_PAGE: usize = 3;

struct AppState {
    sessions: SessionStore,
    fetcher: Arc<dyn JobFetcher>,
}

fn requested_limit(currently_showing: usize) -> usize {
    currently_showing + RESULTS_PER_PAGE
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(flatten)]
    options: SearchOptions,
}

#[derive(Serialize)]
struct SearchResponse {
    session_id: String,
    showing: String,
    total: usize,
    jobs: Vec<JobView>,
}

fn result_response(session_id: String, jobs: Vec<JobView>) -> SearchResponse {
    SearchResponse {
        session_id,
        showing: view::showing_line(jobs.len()),
        total: jobs.len(),
        jobs,
    }
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

#[post("/api/search")]
async fn search_jobs(payload: web::Json<SearchRequest>, data: web::Data<AppState>) -> impl Responder {
    let request = payload.into_inner();

    if let Err(warning) = request.options.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "warning": warning }));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let currently_showing = data.sessions.count(&session_id);
    let limit = requested_limit(currently_showing);
    info!(
        "Session {}: fetching up to {} jobs ('{}' in {})",
        session_id, limit, request.options.job_title, request.options.location
    );

    // Scraping is blocking I/O; hand it to the worker pool and wait for it.
    let query = request.options.to_query(limit);
    let fetcher = data.fetcher.clone();
    let fetched = web::block(move || fetcher.fetch(&query)).await;

    match fetched {
        Ok(Ok(records)) => {
            let jobs = view::views(&records);
            data.sessions.replace(&session_id, records);
            HttpResponse::Ok().json(result_response(session_id, jobs))
        }
        Ok(Err(e)) => {
            error!("Fetch failed for session {}: {}", session_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            error!("Fetch worker failed for session {}: {}", session_id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "fetch worker failed" }))
        }
    }
}

#[get("/api/results/{session_id}")]
async fn get_results(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let session_id = path.into_inner();
    match data.sessions.get(&session_id) {
        Some(records) => {
            let jobs = view::views(&records);
            HttpResponse::Ok().json(result_response(session_id, jobs))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "Session not found" })),
    }
}

fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(search_jobs)
        .service(get_results);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init();

    let state = web::Data::new(AppState {
        sessions: SessionStore::new(),
        fetcher: Arc::new(LinkedinScraper::new(ScraperConfig::default())),
    });

    log::info!("Starting Web Server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure_api)
            .service(actix_files::Files::new("/", "./static").index_file("index.html"))
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
