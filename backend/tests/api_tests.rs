//! Router-level tests: requests go through the full axum stack with a
//! scripted model behind it.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{test_state, ChatScript, ScriptedModel};
use krishi_server::create_app;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn onboarding(name: &str, crop: &str, language: &str) -> Value {
    json!({
        "profile": {
            "name": name,
            "email": "",
            "district": "Kottayam",
            "landSize": "3 acres",
            "crop": crop,
            "soilType": "Laterite",
            "irrigation": "Well"
        },
        "language": language
    })
}

async fn onboard(app: &Router, crop: &str) -> String {
    let (status, body) = call(app, Method::POST, "/api/v1/sessions", Some(onboarding("Ravi", crop, "en"))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Health and sessions
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_configured"], false);
    assert_eq!(body["history_records"], 0);
}

#[tokio::test]
async fn test_onboarding_requires_a_name() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let (status, body) = call(&app, Method::POST, "/api/v1/sessions", Some(onboarding("  ", "", "ml"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "name");
    assert_eq!(body["error"]["message_local"], "ഈ ഫീൽഡ് നിർബന്ധമാണ്.");
}

#[tokio::test]
async fn test_onboarding_rejects_unknown_district() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let mut request = onboarding("Ravi", "", "en");
    request["profile"]["district"] = json!("Chennai");
    let (status, body) = call(&app, Method::POST, "/api/v1/sessions", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "district");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let id = onboard(&app, "").await;

    let (status, body) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "en");
    assert_eq!(body["message_count"], 1);
    assert!(body["profile"].get("email").is_none());

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_language_switch_resets_transcript() {
    let model = ScriptedModel::new();
    model.chat(ChatScript::Reply(vec!["Hello Ravi!"]));
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "").await;

    call(&app, Method::POST, &format!("/api/v1/sessions/{id}/chat"), Some(json!({"text": "hi"}))).await;
    let (_, messages) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/chat/messages"), None).await;
    assert_eq!(messages.as_array().unwrap().len(), 3);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/sessions/{id}/language"),
        Some(json!({"language": "ta"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "ta");

    let (_, messages) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/chat/messages"), None).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "ai");
    assert!(messages[0]["text"].as_str().unwrap().starts_with("வணக்கம்"));
}

// ============================================================================
// Dashboard and tasks
// ============================================================================

#[tokio::test]
async fn test_dashboard_and_task_toggle() {
    let model = ScriptedModel::new();
    model.with_dashboard_answers();
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "Rice").await;

    let (status, dashboard) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/dashboard"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(dashboard["market_price"]["cropName"], "Rice");
    assert_eq!(dashboard["advice"]["advice"][1], "Drain standing water");

    let task_id = dashboard["tasks"][0]["id"].as_str().unwrap();
    let (status, task) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/tasks/{task_id}/toggle"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["completed"], true);

    let (_, tasks) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/tasks"), None).await;
    assert_eq!(tasks[0]["completed"], true);
    assert_eq!(tasks[0]["dueDate"], "Morning");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/tasks/unknown/toggle"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upcoming_tasks_right_after_onboarding() {
    let model = ScriptedModel::new();
    model.with_dashboard_answers();
    model.answer(
        "weekly",
        r#"{"day1": [{"text": "Irrigate", "time": "Morning", "priority": "high"}],
            "day2": [], "day3": [], "day4": [], "day5": [], "day6": [], "day7": []}"#,
    );
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "Rice").await;

    let (status, body) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/tasks/upcoming"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["today"].as_array().unwrap().len(), 3);
    assert_eq!(body["weekly"]["day1"][0]["text"], "Irrigate");
}

#[tokio::test]
async fn test_crop_selection() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let id = onboard(&app, "").await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/crop"),
        Some(json!({"cropName": "Banana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["crop"], "Banana");
    assert_eq!(body["active_crops"], 1);
    assert!(body["message"].as_str().unwrap().starts_with("Banana"));

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/crop"),
        Some(json!({"cropName": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_tool_call_over_http() {
    let model = ScriptedModel::new();
    model.chat(ChatScript::Reply(vec![
        r#"{"action":"addTask","task":{"text":"Spray Bordeaux mixture","priority":"high","time":"Morning"}}"#,
    ]));
    model.with_dashboard_answers();
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "Pepper").await;

    let (_, tasks) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/tasks"), None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 3);

    let (status, reply) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/chat"),
        Some(json!({"text": "Add a task to spray Bordeaux mixture"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["failed"], false);
    assert_eq!(reply["task"]["text"], "Spray Bordeaux mixture");

    // Added on top of today's generated tasks, which are not regenerated
    let (_, tasks) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/tasks"), None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 4);
    assert_eq!(tasks[0]["text"], "Spray Bordeaux mixture");
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let id = onboard(&app, "").await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/chat"),
        Some(json!({"text": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "text");
}

#[tokio::test]
async fn test_chat_stream_emits_events() {
    let model = ScriptedModel::new();
    model.chat(ChatScript::Reply(vec!["Harvest ", "in the morning."]));
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "Rice").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/sessions/{id}/chat/stream"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"text": "When to harvest?"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("event: delta"));
    assert!(body.contains("event: done"));
    assert!(body.contains("Harvest in the morning."));
}

// ============================================================================
// Soil analysis and history
// ============================================================================

#[tokio::test]
async fn test_soil_analysis_is_recorded() {
    let model = ScriptedModel::new();
    model.answer(
        "soil",
        r#"{"recommendations": [
            {"cropName": "Rice", "suitability": "Best", "yield": "2.5 t/acre", "duration": "90-100 days", "reasons": ["Good water retention"], "plantingTips": ["Transplant at 21 days"]},
            {"cropName": "Banana", "suitability": "Excellent", "yield": "12 t/acre", "duration": "Approx. 200 days", "reasons": [], "plantingTips": []},
            {"cropName": "Cowpea", "suitability": "Good", "yield": "0.6 t/acre", "duration": "60-70 days", "reasons": [], "plantingTips": []}
        ]}"#,
    );
    let app = create_app(test_state(model).await);
    let id = onboard(&app, "").await;

    let soil = json!({
        "ph": "5.2", "ec": "1", "oc": "0.5", "soilType": "Laterite",
        "n": "50", "p": "20", "k": "100", "ca": "1000", "mg": "200", "s": "10"
    });
    let (status, analysis) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/soil-analysis"), Some(soil)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analysis["warnings"][0], "ph_out_of_range");
    assert!(analysis["warning_message"].is_string());
    assert_eq!(analysis["record"]["recommendations"][0]["yield"], "2.5 t/acre");

    let record_id = analysis["record"]["id"].as_str().unwrap();
    let (_, history) = call(&app, Method::GET, "/api/v1/history", None).await;
    assert_eq!(history[0]["id"], record_id);

    let (_, health) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(health["history_records"], 1);

    let (status, record) = call(&app, Method::GET, &format!("/api/v1/history/{record_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["soilData"]["ph"], "5.2");

    let (status, _) = call(&app, Method::GET, "/api/v1/history/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soil_analysis_failure() {
    let app = create_app(test_state(ScriptedModel::new()).await);
    let id = onboard(&app, "").await;

    let soil = json!({
        "ph": "7", "ec": "1", "oc": "0.5", "soilType": "Loamy",
        "n": "50", "p": "20", "k": "100", "ca": "1000", "mg": "200", "s": "10"
    });
    let (status, body) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/soil-analysis"), Some(soil)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "RECOMMENDATION_FAILED");

    let (_, history) = call(&app, Method::GET, "/api/v1/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}
