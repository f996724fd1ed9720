//! In-memory fakes shared by unit tests.

use crate::models::{AddUserRequest, SetReferralCodeRequest, SetReferralCodeResponse};
use crate::services::{Clipboard, CodeGenerator, ReferralApi};
use crate::utils::{ApiError, ClipboardError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    UserData(String),
    ReferralCodeData(String),
    AddUser(AddUserRequest),
    SetReferralCode(SetReferralCodeRequest),
}

/// Scripted `ReferralApi` that records every call it receives
pub struct RecordingApi {
    user_data: Result<Value, ApiError>,
    referral_code: Result<String, ApiError>,
    add_user: Result<Value, ApiError>,
    set_code: Result<Option<String>, ApiError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            user_data: Ok(json!({})),
            referral_code: Err(ApiError::NotFound),
            add_user: Ok(json!({"message": "User added"})),
            set_code: Ok(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user_data(mut self, response: Result<Value, ApiError>) -> Self {
        self.user_data = response;
        self
    }

    pub fn with_referral_code(mut self, response: Result<String, ApiError>) -> Self {
        self.referral_code = response;
        self
    }

    pub fn with_add_user(mut self, response: Result<Value, ApiError>) -> Self {
        self.add_user = response;
        self
    }

    pub fn with_set_code(mut self, response: Result<Option<String>, ApiError>) -> Self {
        self.set_code = response;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&RecordedCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn add_user_calls(&self) -> Vec<AddUserRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::AddUser(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn set_code_calls(&self) -> Vec<SetReferralCodeRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::SetReferralCode(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReferralApi for RecordingApi {
    async fn user_data(&self, user_id: &str) -> Result<Value, ApiError> {
        self.record(RecordedCall::UserData(user_id.to_string()));
        self.user_data.clone()
    }

    async fn referral_code_data(&self, user_id: &str) -> Result<String, ApiError> {
        self.record(RecordedCall::ReferralCodeData(user_id.to_string()));
        self.referral_code.clone()
    }

    async fn add_user(&self, request: &AddUserRequest) -> Result<Value, ApiError> {
        self.record(RecordedCall::AddUser(request.clone()));
        self.add_user.clone()
    }

    async fn set_referral_code(
        &self,
        request: &SetReferralCodeRequest,
    ) -> Result<SetReferralCodeResponse, ApiError> {
        self.record(RecordedCall::SetReferralCode(request.clone()));
        self.set_code.clone().map(|referral_code| SetReferralCodeResponse { referral_code })
    }
}

/// Hands out the given codes in order, repeating the last one
pub struct FixedCodes {
    codes: Vec<String>,
    next: Mutex<usize>,
}

impl FixedCodes {
    pub fn new(codes: &[&str]) -> Self {
        assert!(!codes.is_empty());
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: Mutex::new(0),
        }
    }
}

impl CodeGenerator for FixedCodes {
    fn generate(&self) -> String {
        let mut next = self.next.lock().unwrap();
        let idx = (*next).min(self.codes.len() - 1);
        *next += 1;
        self.codes[idx].clone()
    }
}

/// Clipboard that keeps what was written, or fails on demand
#[derive(Default)]
pub struct MemoryClipboard {
    pub fail: bool,
    contents: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn contents(&self) -> Vec<String> {
        self.contents.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.contents.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
