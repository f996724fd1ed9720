use serde::{Deserialize, Serialize};

/// What the widget shows: identity fields verbatim plus the referral code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserInfoView {
    /// "<first name> <last name>"
    pub name: String,
    /// "@<username>"
    pub username: String,
    pub email: String,
    pub referral_code: String,
    /// Omitted while no code is known yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct CopyLinkResponse {
    pub copied: bool,
    pub referral_link: String,
}
