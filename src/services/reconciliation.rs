//! Registration / referral-code reconciliation.
//!
//! Runs once per widget mount, right after the user becomes authenticated:
//! make sure the backend knows the user, then make sure the user has a
//! referral code. Every backend failure falls back to the same branch as a
//! "not found" answer and is recorded in the returned report.

use crate::models::{extract_referral_code, AddUserRequest, SetReferralCodeRequest};
use crate::services::{CodeGenerator, ReferralApi};
use crate::utils::ApiError;
use serde_json::Value;

/// What the backend said about a code we asked it to store
#[derive(Debug, Clone, PartialEq)]
pub enum PersistResult {
    /// Backend answered with the code it actually stored
    Confirmed(String),
    /// Backend accepted the call but returned no code
    Unconfirmed,
    Failed(ApiError),
    /// No identified user, nothing was sent
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub old_code: String,
    pub generated: String,
    pub persisted: PersistResult,
}

impl RefreshOutcome {
    /// Server-confirmed code when there is one, otherwise the local one
    pub fn adopted_code(&self) -> &str {
        match &self.persisted {
            PersistResult::Confirmed(code) => code,
            _ => &self.generated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeOutcome {
    Fetched(String),
    Minted {
        lookup_error: ApiError,
        refresh: RefreshOutcome,
    },
}

impl CodeOutcome {
    pub fn code(&self) -> &str {
        match self {
            CodeOutcome::Fetched(code) => code,
            CodeOutcome::Minted { refresh, .. } => refresh.adopted_code(),
        }
    }

    fn errors(&self) -> Vec<&ApiError> {
        match self {
            CodeOutcome::Fetched(_) => Vec::new(),
            CodeOutcome::Minted {
                lookup_error,
                refresh,
            } => {
                let mut errors = vec![lookup_error];
                if let PersistResult::Failed(err) = &refresh.persisted {
                    errors.push(err);
                }
                errors
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExistenceOutcome {
    Known,
    Registered {
        lookup_error: ApiError,
        /// Inbound referral code taken from the page URL ("" when absent)
        used_code: String,
        registration: Result<Value, ApiError>,
        /// Referral fetch issued again after registering
        referral: CodeOutcome,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub user_id: String,
    pub existence: ExistenceOutcome,
    pub referral: CodeOutcome,
}

impl ReconciliationReport {
    /// Codes to apply to the widget, oldest first. The registration branch
    /// re-fetches after the direct fetch, so its code comes last.
    pub fn codes_in_order(&self) -> Vec<&str> {
        let mut codes = vec![self.referral.code()];
        if let ExistenceOutcome::Registered { referral, .. } = &self.existence {
            codes.push(referral.code());
        }
        codes
    }

    pub fn final_code(&self) -> &str {
        match &self.existence {
            ExistenceOutcome::Registered { referral, .. } => referral.code(),
            ExistenceOutcome::Known => self.referral.code(),
        }
    }

    pub fn registered(&self) -> bool {
        matches!(self.existence, ExistenceOutcome::Registered { .. })
    }

    /// Every backend failure seen during the run
    pub fn errors(&self) -> Vec<&ApiError> {
        let mut errors = self.referral.errors();
        if let ExistenceOutcome::Registered {
            lookup_error,
            registration,
            referral,
            ..
        } = &self.existence
        {
            errors.push(lookup_error);
            if let Err(err) = registration {
                errors.push(err);
            }
            errors.extend(referral.errors());
        }
        errors
    }
}

/// Stores `new_code` as the replacement for `old_code`
pub async fn persist_new_code(
    api: &dyn ReferralApi,
    user_id: &str,
    old_code: &str,
    new_code: &str,
) -> PersistResult {
    let request = SetReferralCodeRequest {
        id: user_id.to_string(),
        old_referral_code: old_code.to_string(),
        new_referral_code: new_code.to_string(),
    };

    match api.set_referral_code(&request).await {
        Ok(response) => {
            log::info!("🔁 Referral code set for {}: {:?}", user_id, response);
            match response.referral_code.filter(|code| !code.is_empty()) {
                Some(code) => PersistResult::Confirmed(code),
                None => PersistResult::Unconfirmed,
            }
        }
        Err(e) => {
            log::error!("❌ Failed to set referral code for {}: {}", user_id, e);
            PersistResult::Failed(e)
        }
    }
}

/// Mints a code and, when a user is identified, asks the backend to store it
pub async fn refresh_code(
    api: &dyn ReferralApi,
    generator: &dyn CodeGenerator,
    user_id: Option<&str>,
    old_code: &str,
) -> RefreshOutcome {
    let generated = generator.generate();
    let persisted = match user_id {
        Some(id) => persist_new_code(api, id, old_code, &generated).await,
        None => PersistResult::Skipped,
    };

    RefreshOutcome {
        old_code: old_code.to_string(),
        generated,
        persisted,
    }
}

/// Adopts the stored code, or mints and stores a new one
pub async fn fetch_or_mint(
    api: &dyn ReferralApi,
    generator: &dyn CodeGenerator,
    user_id: &str,
    current_code: &str,
) -> CodeOutcome {
    match api.referral_code_data(user_id).await {
        Ok(code) => {
            log::info!("🎟️ Referral code found for {}: {}", user_id, code);
            CodeOutcome::Fetched(code)
        }
        Err(lookup_error) => {
            log::warn!(
                "⚠️ No referral code for {} ({}), minting a new one",
                user_id,
                lookup_error
            );
            let refresh = refresh_code(api, generator, Some(user_id), current_code).await;
            CodeOutcome::Minted {
                lookup_error,
                refresh,
            }
        }
    }
}

/// Registers the user unless the backend already knows them
pub async fn ensure_registered(
    api: &dyn ReferralApi,
    generator: &dyn CodeGenerator,
    user_id: &str,
    page_url: &str,
    current_code: &str,
) -> ExistenceOutcome {
    let lookup_error = match api.user_data(user_id).await {
        Ok(_) => {
            log::info!("👤 User data found for {}", user_id);
            return ExistenceOutcome::Known;
        }
        Err(e) => e,
    };

    log::warn!("⚠️ User {} not known to backend ({}), registering", user_id, lookup_error);

    let used_code = extract_referral_code(page_url);
    let request = AddUserRequest {
        id: user_id.to_string(),
        referral_code: used_code.clone(),
    };

    let registration = api.add_user(&request).await;
    match &registration {
        Ok(body) => log::info!("✅ User {} registered: {}", user_id, body),
        Err(e) => log::error!("❌ Failed to register {}: {}", user_id, e),
    }

    let referral = fetch_or_mint(api, generator, user_id, current_code).await;

    ExistenceOutcome::Registered {
        lookup_error,
        used_code,
        registration,
        referral,
    }
}

/// Existence check and referral fetch, issued together
pub async fn reconcile(
    api: &dyn ReferralApi,
    generator: &dyn CodeGenerator,
    user_id: &str,
    page_url: &str,
    current_code: &str,
) -> ReconciliationReport {
    log::info!("🔄 Reconciling user {}", user_id);

    let (existence, referral) = futures::join!(
        ensure_registered(api, generator, user_id, page_url, current_code),
        fetch_or_mint(api, generator, user_id, current_code),
    );

    let report = ReconciliationReport {
        user_id: user_id.to_string(),
        existence,
        referral,
    };

    log::info!(
        "✅ Reconciled {}: code={}, registered={}, failures={}",
        user_id,
        report.final_code(),
        report.registered(),
        report.errors().len()
    );

    report
}
