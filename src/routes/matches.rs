use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{rank_results, MatchError, Matcher};
use crate::models::{
    BusinessProfile, ErrorResponse, HealthResponse, MatchResult, Opportunity, QuestionnaireResponses,
    RankRequest, RankResponse, ScoreRequest, ScoringConfigResponse, ScoringWeights, TierSummary,
};
use crate::services::ResultCache;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub cache: Option<Arc<ResultCache>>,
}

impl AppState {
    async fn score(&self, matcher: &Matcher, profile: &BusinessProfile, opportunity: &Opportunity) -> MatchResult {
        match &self.cache {
            Some(cache) => cache.get_or_score(matcher, profile, opportunity).await,
            None => matcher.score(profile, opportunity),
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/scoring/config", web::get().to(scoring_config))
        .route("/matches/score", web::post().to(score_opportunity))
        .route("/matches/rank", web::post().to(rank_opportunities))
        .route("/profiles/from-questionnaire", web::post().to(profile_from_questionnaire));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Active weights and tier thresholds
async fn scoring_config(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ScoringConfigResponse {
        weights: *state.matcher.weights(),
        thresholds: *state.matcher.thresholds(),
    })
}

/// Score a single opportunity
///
/// POST /api/v1/matches/score
async fn score_opportunity(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    let result = state.score(&state.matcher, &req.profile, &req.opportunity).await;
    HttpResponse::Ok().json(result)
}

/// Rank opportunities endpoint
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "profile": { "primaryTechAreas": ["ai_ml"], "riskTolerance": "moderate" },
///   "opportunities": [{ "id": "A24-001", "agency": "Army", "keywords": ["ai"] }],
///   "limit": 20,
///   "weights": { "technicalAlignment": 0.35, "experienceMatch": 0.25, ... }
/// }
/// ```
async fn rank_opportunities(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    let matcher = match &req.weights {
        Some(map) => match ScoringWeights::from_map(map.iter().map(|(name, weight)| (name, *weight)))
            .map_err(MatchError::from)
            .and_then(|weights| state.matcher.with_weights(weights))
        {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!("Rejected weight override: {}", e);
                return bad_request("Invalid weights", e.to_string());
            }
        },
        None => state.matcher.clone(),
    };

    tracing::info!(
        "Ranking {} opportunities for {}",
        req.opportunities.len(),
        req.profile.company_name.as_deref().unwrap_or("company")
    );

    let mut matches = Vec::with_capacity(req.opportunities.len());
    for opportunity in &req.opportunities {
        matches.push(state.score(&matcher, &req.profile, opportunity).await);
    }
    rank_results(&mut matches);

    if let Some(cache) = &state.cache {
        tracing::debug!("Result cache holds {} entries", cache.stats().entries);
    }

    let summary = TierSummary::from_results(&matches);
    let total_results = matches.len();
    if let Some(limit) = req.limit {
        matches.truncate(limit as usize);
    }

    let response = RankResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        matches,
        summary,
        total_results,
        generated_at: chrono::Utc::now(),
    };

    tracing::info!(
        "Returning {} matches (from {} opportunities), top score: {:.3}",
        response.matches.len(),
        total_results,
        response.matches.first().map(|m| m.total_score).unwrap_or(0.0)
    );

    HttpResponse::Ok().json(response)
}

/// Convert onboarding questionnaire answers into a profile
///
/// POST /api/v1/profiles/from-questionnaire
async fn profile_from_questionnaire(req: web::Json<QuestionnaireResponses>) -> impl Responder {
    HttpResponse::Ok().json(BusinessProfile::from(req.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{configure_routes, handle_json_payload_error};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn app_state(with_cache: bool) -> AppState {
        AppState {
            matcher: Matcher::with_default_weights(),
            cache: with_cache.then(|| Arc::new(ResultCache::new(100, 60))),
        }
    }

    fn tech_defense_profile() -> Value {
        json!({
            "companyName": "TechDefense Corp",
            "primaryTechAreas": ["ai_ml", "cybersecurity", "autonomy"],
            "secondaryTechAreas": ["sensors", "data_analytics"],
            "agenciesWorkedWith": ["army", "darpa", "air_force"],
            "contractTypes": ["sbir_phase1", "sbir_phase2"],
            "preferredContractSize": "250k_plus",
            "riskTolerance": "aggressive",
            "clearanceLevel": "secret",
            "innovationAreas": ["novel_algorithms", "proprietary_tech"]
        })
    }

    fn opportunities() -> Value {
        json!([
            {
                "id": "AF24-087",
                "title": "Advanced Nanomaterials for Hypersonic Applications",
                "agency": "Air Force",
                "budget": 250000,
                "keywords": ["materials", "nanomaterials", "hypersonic"]
            },
            {
                "id": "A24-001",
                "title": "AI-Powered Threat Detection for Autonomous Systems",
                "agency": "Army",
                "budget": 275000,
                "keywords": ["ai", "ml", "cybersecurity", "autonomous", "threat detection"]
            }
        ])
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_check_response() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "healthy");
    }

    #[actix_web::test]
    async fn test_rank_orders_and_summarizes() {
        let app = test_app!(app_state(true));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/rank")
            .set_json(json!({ "profile": tech_defense_profile(), "opportunities": opportunities() }))
            .to_request();

        let body: RankResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.total_results, 2);
        assert_eq!(body.summary.total, 2);
        assert_eq!(body.matches[0].opportunity_id, "A24-001");
        assert!(body.matches[0].total_score >= body.matches[1].total_score);
    }

    #[actix_web::test]
    async fn test_rank_limit_truncates_after_summary() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/rank")
            .set_json(json!({
                "profile": tech_defense_profile(),
                "opportunities": opportunities(),
                "limit": 1
            }))
            .to_request();

        let body: RankResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.matches.len(), 1);
        assert_eq!(body.total_results, 2);
        assert_eq!(body.summary.total, 2);
    }

    #[actix_web::test]
    async fn test_rank_rejects_bad_weight_override() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/rank")
            .set_json(json!({
                "profile": tech_defense_profile(),
                "opportunities": opportunities(),
                "weights": {
                    "technicalAlignment": 0.5,
                    "experienceMatch": 0.25,
                    "riskTolerance": 0.15,
                    "budgetFit": 0.10,
                    "strategicValue": 0.10,
                    "competitiveAdvantage": 0.05
                }
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid weights");
    }

    #[actix_web::test]
    async fn test_rank_accepts_valid_weight_override() {
        let app = test_app!(app_state(true));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/rank")
            .set_json(json!({
                "profile": tech_defense_profile(),
                "opportunities": opportunities(),
                "weights": {
                    "technical_alignment": 1.0,
                    "experience_match": 0.0,
                    "risk_tolerance": 0.0,
                    "budget_fit": 0.0,
                    "strategic_value": 0.0,
                    "competitive_advantage": 0.0
                }
            }))
            .to_request();

        let body: RankResponse = test::call_and_read_body_json(&app, req).await;
        let top = &body.matches[0];
        assert_eq!(top.opportunity_id, "A24-001");
        assert!((top.total_score - top.factor_scores.technical_alignment).abs() < 1e-12);
    }

    #[actix_web::test]
    async fn test_score_single_opportunity() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/score")
            .set_json(json!({
                "profile": tech_defense_profile(),
                "opportunity": { "id": "A24-001", "agency": "Army", "keywords": ["cybersecurity"] }
            }))
            .to_request();

        let body: MatchResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.factor_scores.experience_match, 0.8);
        // No budget given, so the 250000 default misses the 250k_plus bucket
        assert_eq!(body.factor_scores.budget_fit, 0.5);
        assert!(body.risk_factors.is_empty());
        assert_eq!(body.opportunities, vec!["Leverage existing Army relationship"]);
    }

    #[actix_web::test]
    async fn test_invalid_json_is_bad_request() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/rank")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_json");
    }

    #[actix_web::test]
    async fn test_profile_from_questionnaire() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::post()
            .uri("/api/v1/profiles/from-questionnaire")
            .set_json(json!({
                "company": "StartupRobotics",
                "agency_experience": { "agencies_worked_with": ["none"] },
                "business_preferences": { "risk_tolerance": "conservative" }
            }))
            .to_request();

        let profile: BusinessProfile = test::call_and_read_body_json(&app, req).await;
        assert_eq!(profile.company_name.as_deref(), Some("StartupRobotics"));
        assert!(!profile.has_agency_experience());
    }

    #[actix_web::test]
    async fn test_scoring_config_reports_defaults() {
        let app = test_app!(app_state(false));
        let req = test::TestRequest::get().uri("/api/v1/scoring/config").to_request();
        let body: ScoringConfigResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.weights, ScoringWeights::default());
    }
}
