//! Scripted provider used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cloudprobe_core::{ClientFactory, Kwargs, ProviderClient, ProviderError, Value};
use serde_json::json;

/// Route engine logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub service: String,
    pub method: String,
    pub paginated: bool,
}

#[derive(Default)]
struct Script {
    responses: HashMap<(String, String), serde_json::Value>,
    failures: HashMap<(String, String), String>,
    paginated: Vec<(String, String)>,
    regions: Vec<String>,
    refuse_profiles: Vec<String>,
    calls: Vec<Call>,
    connects: usize,
}

/// Cloneable handle; clones share the script and the call log.
#[derive(Clone, Default)]
pub struct FakeProvider {
    script: Rc<RefCell<Script>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        let provider = Self::default();
        provider.script.borrow_mut().regions = vec!["us-east-1".to_string(), "eu-west-1".to_string()];
        provider
    }

    pub fn with_regions(self, regions: &[&str]) -> Self {
        self.script.borrow_mut().regions = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Respond to `service.method` with `body`, plus the caller's profile/region.
    pub fn respond(self, service: &str, method: &str, body: serde_json::Value) -> Self {
        self.script
            .borrow_mut()
            .responses
            .insert((service.to_string(), method.to_string()), body);
        self
    }

    pub fn fail(self, service: &str, method: &str, code: &str) -> Self {
        self.script
            .borrow_mut()
            .failures
            .insert((service.to_string(), method.to_string()), code.to_string());
        self
    }

    pub fn paginated(self, service: &str, method: &str) -> Self {
        self.script
            .borrow_mut()
            .paginated
            .push((service.to_string(), method.to_string()));
        self
    }

    pub fn refuse_profile(self, profile: &str) -> Self {
        self.script.borrow_mut().refuse_profiles.push(profile.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.borrow().calls.clone()
    }

    pub fn connects(&self) -> usize {
        self.script.borrow().connects
    }
}

struct FakeClient {
    script: Rc<RefCell<Script>>,
    profile: Option<String>,
    region: Option<String>,
    service: String,
}

impl FakeClient {
    fn respond(&self, method: &str, paginated: bool) -> Result<Value, ProviderError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call {
            profile: self.profile.clone(),
            region: self.region.clone(),
            service: self.service.clone(),
            method: method.to_string(),
            paginated,
        });

        let key = (self.service.clone(), method.to_string());
        if let Some(code) = script.failures.get(&key) {
            return Err(ProviderError::new(
                &self.service,
                method,
                code.clone(),
                "scripted failure",
            ));
        }

        let mut body = script.responses.get(&key).cloned().unwrap_or_else(|| json!({}));
        if let Some(map) = body.as_object_mut() {
            map.insert("CalledProfile".to_string(), json!(self.profile));
            map.insert("CalledRegion".to_string(), json!(self.region));
        }
        Ok(Value::from(body))
    }
}

impl ProviderClient for FakeClient {
    fn call(&self, method: &str, _args: &[String], _kwargs: &Kwargs) -> Result<Value, ProviderError> {
        self.respond(method, false)
    }

    fn supports_pagination(&self, method: &str) -> bool {
        self.script
            .borrow()
            .paginated
            .contains(&(self.service.clone(), method.to_string()))
    }

    fn paginate(
        &self,
        method: &str,
        _args: &[String],
        _kwargs: &Kwargs,
    ) -> Result<Value, ProviderError> {
        self.respond(method, true)
    }
}

impl ClientFactory for FakeProvider {
    fn connect(
        &self,
        profile: Option<&str>,
        region: Option<&str>,
        service: &str,
    ) -> Result<Box<dyn ProviderClient>, ProviderError> {
        let mut script = self.script.borrow_mut();
        if let Some(p) = profile {
            if script.refuse_profiles.iter().any(|r| r == p) {
                return Err(ProviderError::new(
                    service,
                    "connect",
                    "ProfileNotFound",
                    format!("profile {} is not configured", p),
                ));
            }
        }
        script.connects += 1;
        Ok(Box::new(FakeClient {
            script: self.script.clone(),
            profile: profile.map(String::from),
            region: region.map(String::from),
            service: service.to_string(),
        }))
    }

    fn available_regions(&self, _service: &str) -> Result<Vec<String>, ProviderError> {
        Ok(self.script.borrow().regions.clone())
    }
}
