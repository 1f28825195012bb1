//! HTTP handler functions for the CPS dashboard API.

use actix_web::{HttpResponse, web};
use cps_dashboard_server_models::{
    ApiError, ApiHealth, ApiSchool, ApiSchoolList, ApiSummary, SchoolQueryParams,
    SummaryQueryParams,
};
use cps_dashboard_view::{ViewState, load_dashboard, load_detail, load_list};
use serde::Serialize;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/summary`
///
/// Landing dashboard: counts, averages and top rankings over the first
/// `summary_limit` records.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<SummaryQueryParams>,
) -> HttpResponse {
    let view = load_dashboard(state.source.as_ref(), state.config.summary_limit).await;
    let view = view.map(|dashboard| match params.preview {
        Some(n) => dashboard.with_preview_len(n),
        None => dashboard,
    });

    respond(view, "summary", |dashboard| {
        ApiSummary::from_summary(&dashboard.summary, dashboard.preview_len)
    })
}

/// `GET /api/schools`
///
/// Filters the first `list_limit` records by `type`, `rating` and `search`.
pub async fn schools(
    state: web::Data<AppState>,
    params: web::Query<SchoolQueryParams>,
) -> HttpResponse {
    let criteria = match params.criteria() {
        Ok(criteria) => criteria,
        Err(e) => return HttpResponse::BadRequest().json(ApiError::new(e.to_string())),
    };

    let view = load_list(state.source.as_ref(), state.config.list_limit).await;

    respond(view, "school list", |list| {
        let list = list.with_criteria(criteria);
        ApiSchoolList {
            fetched_count: list.records().len(),
            schools: list.visible().into_iter().map(ApiSchool::from).collect(),
            criteria: list.criteria().clone(),
        }
    })
}

/// `GET /api/schools/{id}`
pub async fn school(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    respond(
        load_detail(state.source.as_ref(), &id).await,
        "school",
        |detail| detail,
    )
}

fn respond<T, B: Serialize>(
    state: ViewState<T>,
    what: &str,
    body: impl FnOnce(T) -> B,
) -> HttpResponse {
    match state {
        ViewState::Ready(value) => HttpResponse::Ok().json(body(value)),
        ViewState::NotFound => {
            HttpResponse::NotFound().json(ApiError::new(format!("{what} not found")))
        }
        ViewState::Unavailable { reason } => HttpResponse::ServiceUnavailable()
            .json(ApiError::new(format!("Failed to load {what}: {reason}"))),
        ViewState::Loading => HttpResponse::ServiceUnavailable()
            .json(ApiError::new(format!("{what} is still loading"))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use cps_dashboard_school_models::{SafetyRating, SchoolRecord, SchoolType, Score};
    use cps_dashboard_source::config::SourceConfig;
    use cps_dashboard_source::memory::InMemorySource;
    use cps_dashboard_source::{FetchError, SchoolSource};
    use serde_json::Value;

    use crate::{AppState, configure};

    struct DownSource;

    #[async_trait]
    impl SchoolSource for DownSource {
        fn label(&self) -> &str {
            "down"
        }

        async fn fetch_collection(
            &self,
            _limit: Option<u64>,
        ) -> Result<Vec<SchoolRecord>, FetchError> {
            Err(FetchError::Status {
                url: "http://localhost/schools.json".to_string(),
                status: 500,
            })
        }

        async fn fetch_by_id(&self, _id: &str) -> Result<Option<SchoolRecord>, FetchError> {
            Err(FetchError::Status {
                url: "http://localhost/schools.json".to_string(),
                status: 500,
            })
        }
    }

    fn sample() -> Vec<SchoolRecord> {
        vec![
            SchoolRecord {
                school_type: Some(SchoolType::Es),
                safety_score: Score::Value(90),
                safety_rating: Some(SafetyRating::Strong),
                long_name: Some("Lincoln Park Elementary".to_string()),
                city: Some("Chicago".to_string()),
                ..SchoolRecord::new("1")
            },
            SchoolRecord {
                school_type: Some(SchoolType::Hs),
                safety_score: Score::Invalid("abc".to_string()),
                name_of_school: Some("Lane Tech".to_string()),
                ..SchoolRecord::new("2")
            },
            SchoolRecord {
                school_type: Some(SchoolType::Es),
                safety_score: Score::Value(70),
                school_name: Some("Hyde Park".to_string()),
                ..SchoolRecord::new("3")
            },
        ]
    }

    fn state_with(source: Arc<dyn SchoolSource>) -> actix_web::web::Data<AppState> {
        actix_web::web::Data::new(AppState::new(source, SourceConfig::default()))
    }

    async fn get(source: Arc<dyn SchoolSource>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state_with(source))
                .configure(configure),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    fn memory() -> Arc<dyn SchoolSource> {
        Arc::new(InMemorySource::new(sample()))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, body) = get(memory(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn summary_counts_and_ranks() {
        let (status, body) = get(memory(), "/api/summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["elementaryCount"], 2);
        assert_eq!(body["highSchoolCount"], 1);
        assert_eq!(body["avgSafety"], 80.0);
        assert_eq!(body["topSafety"][0]["id"], "1");
        assert_eq!(body["topSafety"][1]["id"], "3");
    }

    #[actix_web::test]
    async fn summary_preview_is_applied() {
        let (status, body) = get(memory(), "/api/summary?preview=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topSafety"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn malformed_query_is_json_bad_request() {
        let (status, body) = get(memory(), "/api/summary?preview=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn schools_apply_criteria() {
        let (status, body) = get(memory(), "/api/schools?type=ES&search=park").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fetchedCount"], 3);
        let ids: Vec<&str> = body["schools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(body["criteria"]["typeFilter"], "ES");
    }

    #[actix_web::test]
    async fn schools_filter_by_rating_label() {
        let (status, body) = get(memory(), "/api/schools?rating=Strong").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schools"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["schools"][0]["name"], "Lincoln Park Elementary");
    }

    #[actix_web::test]
    async fn unknown_type_is_bad_request() {
        let (status, body) = get(memory(), "/api/schools?type=MS").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("MS"));
    }

    #[actix_web::test]
    async fn school_detail_found_and_not_found() {
        let (status, body) = get(memory(), "/api/schools/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Lane Tech");
        assert_eq!(body["typeLabel"], "High School");

        let (status, body) = get(memory(), "/api/schools/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "school not found");
    }

    #[actix_web::test]
    async fn fetch_failure_is_service_unavailable() {
        for uri in ["/api/summary", "/api/schools", "/api/schools/1"] {
            let (status, body) = get(Arc::new(DownSource), uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("500"));
        }
    }
}
