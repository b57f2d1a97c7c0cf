//! Per-question session store shared by the coordinator, agents and tools.
//!
//! [`SessionState`] holds a JSON object behind a mutex. Clones share the same
//! underlying state, so a tool handed a clone writes where the coordinator
//! reads.
//!
//! # Examples
//!
//! ```
//! use agrocam::context::SessionState;
//! use serde_json::json;
//!
//! let session = SessionState::default();
//! session.set("agriculture_settings", json!({"default_region": "Centre"}));
//! session.merge(json!({"agriculture_settings": {"language": "fr"}}));
//!
//! let settings = session.get("agriculture_settings").unwrap();
//! assert_eq!(settings["default_region"], "Centre");
//! assert_eq!(settings["language"], "fr");
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub struct SessionState {
    state: Arc<Mutex<Value>>,
}

impl SessionState {
    /// Create a session from an initial JSON object.
    pub fn new(initial: Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
        }
    }

    // A panicking writer cannot leave a half-merged value behind, so a
    // poisoned lock still holds usable state.
    fn lock(&self) -> MutexGuard<'_, Value> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// Store `value` under `key`, replacing whatever was there.
    pub fn set(&self, key: &str, value: Value) {
        let mut state = self.lock();
        if !state.is_object() {
            *state = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut *state {
            map.insert(key.to_string(), value);
        }
    }

    /// Serialize `value` and store it under `key`.
    pub fn record<T: Serialize>(&self, key: &str, value: &T) -> crate::Result<()> {
        self.set(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Deep-merge `update` into the session.
    ///
    /// Objects merge key by key; arrays and scalars replace.
    pub fn merge(&self, update: Value) {
        deep_merge(&mut self.lock(), update);
    }

    /// Copy of the whole session.
    pub fn snapshot(&self) -> Value {
        self.lock().clone()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

fn deep_merge(dest: &mut Value, src: Value) {
    match (dest, src) {
        (Value::Object(dest_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                match dest_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        dest_map.insert(key, value);
                    }
                }
            }
        }
        (dest_value, src_value) => {
            *dest_value = src_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_empty_object() {
        let session = SessionState::default();
        assert_eq!(session.snapshot(), json!({}));
        assert!(session.get("anything").is_none());
    }

    #[test]
    fn test_set_replaces_value() {
        let session = SessionState::default();
        session.set("crops_response", json!("premier avis"));
        session.set("crops_response", json!("second avis"));
        assert_eq!(session.get("crops_response"), Some(json!("second avis")));
    }

    #[test]
    fn test_record_serializes() {
        #[derive(Serialize)]
        struct Quote {
            crop: &'static str,
            price: f64,
        }

        let session = SessionState::default();
        session.record("last_quote", &Quote { crop: "cacao", price: 1400.0 }).unwrap();
        assert_eq!(session.get("last_quote").unwrap()["price"], 1400.0);
    }

    #[test]
    fn test_merge_is_deep() {
        let session = SessionState::new(json!({
            "agriculture_settings": {
                "default_region": "Centre",
                "language": "fr"
            }
        }));

        session.merge(json!({
            "agriculture_settings": {"default_region": "Ouest", "season": "saison_des_pluies"}
        }));

        let settings = session.get("agriculture_settings").unwrap();
        assert_eq!(settings["default_region"], "Ouest");
        assert_eq!(settings["language"], "fr");
        assert_eq!(settings["season"], "saison_des_pluies");
    }

    #[test]
    fn test_merge_replaces_arrays() {
        let session = SessionState::new(json!({"crops": ["maïs", "manioc"]}));
        session.merge(json!({"crops": ["cacao"]}));
        assert_eq!(session.get("crops"), Some(json!(["cacao"])));
    }

    #[test]
    fn test_set_on_non_object_state_resets_it() {
        let session = SessionState::new(json!(null));
        session.set("weather_response", json!("sec"));
        assert_eq!(session.snapshot(), json!({"weather_response": "sec"}));
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionState::default();
        let tool_view = session.clone();
        tool_view.set("last_diagnosis", json!({"most_likely": "Pourriture brune"}));
        assert_eq!(session.get("last_diagnosis").unwrap()["most_likely"], "Pourriture brune");
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let session = SessionState::default();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let session = session.clone();
                tokio::spawn(async move {
                    session.merge(json!({ "counts": { format!("k{i}"): i } }));
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let counts = session.get("counts").unwrap();
        assert_eq!(counts.as_object().unwrap().len(), 10);
    }
}
