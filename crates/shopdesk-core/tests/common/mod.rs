// In-memory backend implementing `Transport` for controller and cart tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use shopdesk_api::{Error, Method, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
}

/// One collection served the way the real backend serves it:
/// `POST {c}/paginate`, `GET {c}/{id}`, `POST|PATCH|DELETE {c}`.
pub struct FakeBackend {
    collection: String,
    records: Mutex<Vec<Value>>,
    calls: Mutex<Vec<Call>>,
    gates: Mutex<HashMap<u32, Arc<Notify>>>,
    fail_lists: AtomicBool,
    reject_writes: Mutex<Option<(u16, Option<String>)>>,
}

impl FakeBackend {
    pub fn new(collection: &str, records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            collection: collection.to_owned(),
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            fail_lists: AtomicBool::new(false),
            reject_writes: Mutex::new(None),
        })
    }

    /// `count` roles with ids `r1..=rN`.
    pub fn roles(count: u32) -> Arc<Self> {
        let records = (1..=count)
            .map(|i| json!({ "_id": format!("r{i}"), "roleId": i, "roleName": format!("Role {i}") }))
            .collect();
        Self::new("roles", records)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn list_calls(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint.ends_with("/paginate"))
            .filter_map(|c| c.body.and_then(|b| b["page"].as_u64()))
            .collect()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == self.collection)
            .collect()
    }

    /// Hold list responses for `page` until the returned gate is notified.
    pub fn gate_page(&self, page: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(page, Arc::clone(&gate));
        gate
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn reject_writes(&self, status: u16, message: Option<&str>) {
        *self.reject_writes.lock().unwrap() = Some((status, message.map(str::to_owned)));
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Wait until a list request for `page` has been issued.
    pub async fn wait_for_list(&self, page: u64) {
        while !self.list_calls().contains(&page) {
            tokio::task::yield_now().await;
        }
    }

    fn list(&self, body: Option<&Value>) -> Value {
        let body = body.cloned().unwrap_or(Value::Null);
        let per_page = usize::try_from(body["perPage"].as_u64().unwrap_or(10)).unwrap();
        let page = usize::try_from(body["page"].as_u64().unwrap_or(1)).unwrap();
        let records = self.records.lock().unwrap();
        let items: Vec<Value> = records
            .iter()
            .skip(page.saturating_sub(1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        let mut envelope = serde_json::Map::new();
        envelope.insert(self.collection.clone(), Value::Array(items));
        envelope.insert("count".into(), json!(records.len()));
        Value::Object(envelope)
    }

    fn write(&self, method: Method, body: Option<Value>) -> Result<Value, Error> {
        if let Some((status, message)) = self.reject_writes.lock().unwrap().clone() {
            return Err(Error::Api { status, message });
        }
        let body = body.unwrap_or(Value::Null);
        let mut records = self.records.lock().unwrap();
        let id = body["id"].as_str().map(str::to_owned);
        let position = |records: &Vec<Value>| {
            id.as_deref()
                .and_then(|id| records.iter().position(|r| r["_id"] == id))
        };
        match method {
            Method::Post => {
                let mut record = body.clone();
                record["_id"] = json!(format!("r{}", records.len() + 1));
                records.push(record.clone());
                Ok(record)
            }
            Method::Patch => {
                let Some(idx) = position(&records) else {
                    return Err(not_found());
                };
                for (k, v) in body.as_object().unwrap() {
                    if k != "id" {
                        records[idx][k] = v.clone();
                    }
                }
                Ok(records[idx].clone())
            }
            Method::Delete => {
                let Some(idx) = position(&records) else {
                    return Err(not_found());
                };
                records.remove(idx);
                Ok(json!({ "deleted": true }))
            }
            Method::Get => Err(not_found()),
        }
    }

    fn get(&self, id: &str) -> Result<Value, Error> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r["_id"] == id)
            .cloned()
            .ok_or_else(not_found)
    }
}

fn not_found() -> Error {
    Error::Api {
        status: 404,
        message: Some("Not found".into()),
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_owned(),
            method,
            body: body.clone(),
        });

        if endpoint.ends_with("/paginate") {
            let page = body
                .as_ref()
                .and_then(|b| b["page"].as_u64())
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(1);
            let gate = self.gates.lock().unwrap().remove(&page);
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Error::Api {
                    status: 500,
                    message: None,
                });
            }
            return Ok(self.list(body.as_ref()));
        }

        if endpoint == self.collection {
            return self.write(method, body);
        }

        match endpoint.strip_prefix(&format!("{}/", self.collection)) {
            Some(id) if method == Method::Get => self.get(id),
            _ => Err(not_found()),
        }
    }
}
