use serde::{Deserialize, Serialize};

/// Query parameter carrying a referral code, both inbound (page URL) and
/// outbound (referral link)
pub const REFERRAL_CODE_PARAM: &str = "referralCode";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddUserRequest {
    pub id: String,
    #[serde(rename = "referralCode")]
    pub referral_code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SetReferralCodeRequest {
    pub id: String,
    #[serde(rename = "oldReferralCode")]
    pub old_referral_code: String,
    #[serde(rename = "newReferralCode")]
    pub new_referral_code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SetReferralCodeResponse {
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ReferralCodeData {
    #[serde(default)]
    pub referral_code: Option<String>,
}

/// Builds the shareable link for `code`. An empty code has no link.
pub fn referral_link(base: &str, code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    format!("{}?{}={}", base, REFERRAL_CODE_PARAM, urlencoding::encode(code))
}

/// Reads the inbound `referralCode` from a page URL; empty when absent
pub fn extract_referral_code(page_url: &str) -> String {
    reqwest::Url::parse(page_url)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == REFERRAL_CODE_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// Current code and the link derived from it. Only `set` mutates either.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferralState {
    link_base: String,
    code: String,
    link: String,
}

impl ReferralState {
    pub fn new(link_base: impl Into<String>) -> Self {
        Self {
            link_base: link_base.into(),
            code: String::new(),
            link: String::new(),
        }
    }

    pub fn set(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.link = referral_link(&self.link_base, &self.code);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}
