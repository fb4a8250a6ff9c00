use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Json, Router, routing::{delete, get}};

use checkin_core::types::{markers, CheckinRecord, MapMarker};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{
    ClearCheckinsResponse, CreateCheckinRequest, CreateCheckinResponse, DeleteCheckinResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/checkins",
            get(list_checkins).post(create_checkin).delete(clear_checkins),
        )
        .route("/checkins/markers", get(list_markers))
        .route("/checkins/{id}", delete(delete_checkin))
}

async fn list_checkins(
    State(state): State<AppState>,
) -> Result<Json<Vec<CheckinRecord>>, AppError> {
    Ok(Json(state.store.try_list().await?))
}

async fn list_markers(State(state): State<AppState>) -> Result<Json<Vec<MapMarker>>, AppError> {
    let records = state.store.try_list().await?;
    Ok(Json(markers(&records)))
}

async fn create_checkin(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckinRequest>, JsonRejection>,
) -> Result<Json<CreateCheckinResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let checkin = state.store.try_create(req.into_new_checkin()).await?;
    tracing::info!(id = %checkin.id, "check-in saved");
    Ok(Json(CreateCheckinResponse {
        success: true,
        checkin,
    }))
}

async fn delete_checkin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCheckinResponse>, AppError> {
    let deleted = state.store.try_delete_one(&id).await?;
    Ok(Json(DeleteCheckinResponse {
        success: true,
        deleted,
    }))
}

async fn clear_checkins(
    State(state): State<AppState>,
) -> Result<Json<ClearCheckinsResponse>, AppError> {
    state.store.try_delete_all().await?;
    tracing::info!("check-in history cleared");
    Ok(Json(ClearCheckinsResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(state: &AppState) -> Router {
        Router::new().nest("/api", routes().with_state(state.clone()))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_checkin(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/checkins")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_and_list_checkins() {
        let state = AppState::in_memory();

        let resp = test_app(&state)
            .oneshot(post_checkin(serde_json::json!({
                "lat": 10.8231,
                "lng": 106.6297,
                "note": "Office",
                "time": "2024-01-01T08:00:00.000Z",
                "timestamp": 1704096000000i64
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let created: CreateCheckinResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert!(created.success);
        assert_eq!(created.checkin.note, "Office");

        let req = Request::builder()
            .method("GET")
            .uri("/api/checkins")
            .body(Body::empty())
            .unwrap();
        let resp = test_app(&state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list: Vec<CheckinRecord> = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(list, vec![created.checkin]);
    }

    #[tokio::test]
    async fn create_blank_note_returns_400() {
        let state = AppState::in_memory();
        let resp = test_app(&state)
            .oneshot(post_checkin(serde_json::json!({
                "lat": 1.0,
                "lng": 2.0,
                "note": "   "
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(state.store.list().await.is_empty());
    }

    #[tokio::test]
    async fn client_time_must_be_iso_and_match_timestamp() {
        let state = AppState::in_memory();
        for (time, timestamp) in [
            ("yesterday-ish", -5i64),
            ("2024-01-01T08:00:00.000Z", 1704096000001i64),
        ] {
            let resp = test_app(&state)
                .oneshot(post_checkin(serde_json::json!({
                    "lat": 1.0,
                    "lng": 2.0,
                    "note": "Office",
                    "time": time,
                    "timestamp": timestamp
                })))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
        assert!(state.store.list().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_returns_400() {
        let state = AppState::in_memory();
        let resp = test_app(&state)
            .oneshot(post_checkin(serde_json::json!({ "note": "no coordinates" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn markers_follow_history() {
        let state = AppState::in_memory();
        for note in ["Home", "Cafe"] {
            let resp = test_app(&state)
                .oneshot(post_checkin(serde_json::json!({
                    "lat": 1.0, "lng": 2.0, "note": note
                })))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = Request::builder()
            .method("GET")
            .uri("/api/checkins/markers")
            .body(Body::empty())
            .unwrap();
        let resp = test_app(&state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let pins: Vec<MapMarker> = serde_json::from_value(body_json(resp).await).unwrap();
        let titles: Vec<&str> = pins.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Cafe", "Home"]);
    }

    #[tokio::test]
    async fn delete_one_and_unknown() {
        let state = AppState::in_memory();
        let resp = test_app(&state)
            .oneshot(post_checkin(serde_json::json!({
                "lat": 1.0, "lng": 2.0, "note": "to delete"
            })))
            .await
            .unwrap();
        let created: CreateCheckinResponse = serde_json::from_value(body_json(resp).await).unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/checkins/{}", created.checkin.id))
            .body(Body::empty())
            .unwrap();
        let resp = test_app(&state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted: DeleteCheckinResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert!(deleted.success && deleted.deleted);
        assert!(state.store.list().await.is_empty());

        // Deleting again is still a success
        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/checkins/{}", created.checkin.id))
            .body(Body::empty())
            .unwrap();
        let resp = test_app(&state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted: DeleteCheckinResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert!(deleted.success);
        assert!(!deleted.deleted);
    }

    #[tokio::test]
    async fn clear_all() {
        let state = AppState::in_memory();
        for note in ["a", "b", "c"] {
            test_app(&state)
                .oneshot(post_checkin(serde_json::json!({
                    "lat": 0.0, "lng": 0.0, "note": note
                })))
                .await
                .unwrap();
        }
        assert_eq!(state.store.list().await.len(), 3);

        for _ in 0..2 {
            let req = Request::builder()
                .method("DELETE")
                .uri("/api/checkins")
                .body(Body::empty())
                .unwrap();
            let resp = test_app(&state).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let cleared: ClearCheckinsResponse =
                serde_json::from_value(body_json(resp).await).unwrap();
            assert!(cleared.success);
        }
        assert!(state.store.list().await.is_empty());
    }
}
