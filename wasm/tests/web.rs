//! Browser tests for the localStorage-backed analysis history.
//!
//! Run with `wasm-pack test --headless --chrome wasm`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use krishi_sakhi_wasm::{clear_history, load_history, save_history_record};
use shared::{AnalysisRecord, SoilData, HISTORY_STORAGE_KEY};

wasm_bindgen_test_configure!(run_in_browser);

fn storage() -> web_sys::Storage {
    web_sys::window().unwrap().local_storage().unwrap().unwrap()
}

#[wasm_bindgen_test]
fn newest_record_comes_first() {
    clear_history().unwrap();
    let first = AnalysisRecord::new(SoilData::default(), vec![]);
    let second = AnalysisRecord::new(SoilData::default(), vec![]);
    save_history_record(&serde_json::to_string(&first).unwrap()).unwrap();
    save_history_record(&serde_json::to_string(&second).unwrap()).unwrap();

    let stored: Vec<AnalysisRecord> = serde_json::from_str(&load_history().unwrap()).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, second.id);
}

#[wasm_bindgen_test]
fn corrupt_storage_reads_as_empty() {
    storage().set_item(HISTORY_STORAGE_KEY, "not json").unwrap();
    assert_eq!(load_history().unwrap(), "[]");

    let record = AnalysisRecord::new(SoilData::default(), vec![]);
    save_history_record(&serde_json::to_string(&record).unwrap()).unwrap();
    let stored: Vec<AnalysisRecord> = serde_json::from_str(&load_history().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[wasm_bindgen_test]
fn invalid_record_is_rejected() {
    assert!(save_history_record("{\"id\": 1}").is_err());
}
