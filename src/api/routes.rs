// ============================================================
// Layer 7 — Routes
// ============================================================

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::{
    handlers::{health, predict},
    state::AppState,
};

/// Create the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Landmarks are posted from a browser front-end on another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::PredictResponse;
    use crate::data::label_encoder::LabelEncoder;
    use crate::domain::emotion::{is_servable_label, Prediction, KNOWN_EMOTIONS};
    use crate::domain::landmarks::{LandmarkVector, LANDMARK_FEATURES};
    use crate::domain::traits::EmotionPredictor;
    use crate::ml::backend::{default_device, InferBackend};
    use crate::ml::inferencer::Inferencer;
    use crate::ml::model::EmotionClassifierConfig;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    struct AlwaysHappy;

    impl EmotionPredictor for AlwaysHappy {
        fn predict(&self, _: &LandmarkVector) -> anyhow::Result<Prediction> {
            Ok(Prediction { class_index: 3, emotion: "happy".into(), logits: vec![0.0; 7] })
        }
    }

    fn model_state() -> AppState {
        let model = EmotionClassifierConfig::new(LANDMARK_FEATURES)
            .with_embed_dim(16)
            .with_num_heads(2)
            .with_ff_dim(32)
            .with_num_layers(1)
            .with_max_len(4)
            .init::<InferBackend>(&default_device());
        let encoder = LabelEncoder::fit(&KNOWN_EMOTIONS).unwrap();
        AppState::new(Inferencer::from_parts(model, encoder, None))
    }

    async fn post_predict(state: AppState, body: impl Into<Body>) -> (StatusCode, PredictResponse) {
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes  = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn emotion(label: &str) -> PredictResponse {
        PredictResponse { emotion: label.to_string() }
    }

    #[tokio::test]
    async fn test_valid_landmarks_reach_the_predictor() {
        let body = json!({ "landmarks": vec![0.1; 1404] }).to_string();
        let (status, resp) = post_predict(AppState::new(AlwaysHappy), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp, emotion("happy"));
    }

    #[tokio::test]
    async fn test_short_landmarks_answer_neutral() {
        let body = json!({ "landmarks": vec![0.1; 10] }).to_string();
        let (status, resp) = post_predict(AppState::new(AlwaysHappy), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp, emotion("neutral"));
    }

    #[tokio::test]
    async fn test_missing_landmarks_answer_neutral() {
        let (status, resp) = post_predict(AppState::new(AlwaysHappy), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp, emotion("neutral"));
    }

    #[tokio::test]
    async fn test_null_landmarks_answer_neutral() {
        let (_, resp) = post_predict(AppState::new(AlwaysHappy), r#"{"landmarks": null}"#).await;
        assert_eq!(resp, emotion("neutral"));
    }

    #[tokio::test]
    async fn test_non_json_body_answers_neutral() {
        let (status, resp) = post_predict(AppState::new(AlwaysHappy), "not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp, emotion("neutral"));
    }

    #[tokio::test]
    async fn test_zero_landmarks_give_a_known_label_from_the_model() {
        let body = json!({ "landmarks": vec![0.0; 1404] }).to_string();
        let (status, resp) = post_predict(model_state(), body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(KNOWN_EMOTIONS.contains(&resp.emotion.as_str()));
    }

    #[tokio::test]
    async fn test_model_answers_are_deterministic_and_servable() {
        let state = model_state();
        let values: Vec<f32> = (0..1404).map(|i| (i as f32 * 0.013).sin()).collect();
        let body = json!({ "landmarks": values }).to_string();

        let (_, first)  = post_predict(state.clone(), body.clone()).await;
        let (_, second) = post_predict(state, body).await;
        assert!(is_servable_label(&first.emotion));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router(AppState::new(AlwaysHappy))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
