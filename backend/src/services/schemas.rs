//! Response schemas declared to the model for structured answers

use serde_json::{json, Value};
use shared::{Suitability, WeeklyTasks};

fn task_object() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING" },
            "time": { "type": "STRING" },
            "priority": { "type": "STRING", "enum": ["high", "medium", "low"] }
        },
        "required": ["text", "time", "priority"]
    })
}

pub fn daily_tasks() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tasks": { "type": "ARRAY", "items": task_object() }
        },
        "required": ["tasks"]
    })
}

pub fn weekly_tasks() -> Value {
    let properties: serde_json::Map<String, Value> = WeeklyTasks::DAY_KEYS
        .iter()
        .map(|day| {
            (
                day.to_string(),
                json!({ "type": "ARRAY", "items": task_object() }),
            )
        })
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": WeeklyTasks::DAY_KEYS,
    })
}

pub fn dashboard_advice() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "advice": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "advice"]
    })
}

pub fn market_price() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cropName": { "type": "STRING" },
            "price": { "type": "STRING" },
            "unit": { "type": "STRING" },
            "market": { "type": "STRING" },
            "trend": { "type": "STRING" }
        },
        "required": ["cropName", "price", "unit", "market", "trend"]
    })
}

pub fn soil_recommendations() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "cropName": { "type": "STRING" },
                        "suitability": { "type": "STRING", "enum": Suitability::schema_labels() },
                        "yield": { "type": "STRING" },
                        "duration": { "type": "STRING" },
                        "reasons": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "plantingTips": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["cropName", "suitability", "yield", "duration", "reasons", "plantingTips"]
                }
            }
        },
        "required": ["recommendations"]
    })
}
