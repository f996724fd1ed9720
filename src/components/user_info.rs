use crate::models::{AuthState, ReferralState, UserInfoView};
use crate::services::{
    persist_new_code, reconcile, Clipboard, CodeGenerator, PersistResult, ReconciliationReport,
    ReferralApi, RefreshOutcome,
};
use crate::utils::ClipboardError;
use std::sync::Arc;

/// Profile snippet plus referral code/link for the signed-in user.
///
/// One instance per mount. The login flag makes reconciliation run at most
/// once per instance; dropping the instance is the only way to reset it.
pub struct UserInfoWidget {
    api: Arc<dyn ReferralApi>,
    generator: Arc<dyn CodeGenerator>,
    clipboard: Arc<dyn Clipboard>,
    is_logged_in: bool,
    referral: ReferralState,
}

impl UserInfoWidget {
    pub fn new(
        api: Arc<dyn ReferralApi>,
        generator: Arc<dyn CodeGenerator>,
        clipboard: Arc<dyn Clipboard>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            api,
            generator,
            clipboard,
            is_logged_in: false,
            referral: ReferralState::new(link_base),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn referral_code(&self) -> &str {
        self.referral.code()
    }

    pub fn referral_link(&self) -> &str {
        self.referral.link()
    }

    /// Runs reconciliation the first time the user shows up authenticated.
    /// Returns `None` when nothing was run.
    pub async fn on_auth_changed(
        &mut self,
        auth: &AuthState,
        page_url: &str,
    ) -> Option<ReconciliationReport> {
        let user_id = auth.user_id()?.to_string();
        if self.is_logged_in {
            return None;
        }
        self.is_logged_in = true;

        let report = reconcile(
            self.api.as_ref(),
            self.generator.as_ref(),
            &user_id,
            page_url,
            self.referral.code(),
        )
        .await;

        for code in report.codes_in_order() {
            self.referral.set(code);
        }

        Some(report)
    }

    /// Replaces the current code with a fresh one. The new code is shown
    /// right away; a code confirmed by the backend replaces it.
    pub async fn refresh(&mut self, auth: &AuthState) -> RefreshOutcome {
        let generated = self.generator.generate();
        let old_code = self.referral.code().to_string();
        self.referral.set(generated.as_str());

        let persisted = match auth.user_id() {
            Some(user_id) => {
                persist_new_code(self.api.as_ref(), user_id, &old_code, &generated).await
            }
            None => PersistResult::Skipped,
        };

        if let PersistResult::Confirmed(code) = &persisted {
            self.referral.set(code.as_str());
        }

        RefreshOutcome {
            old_code,
            generated,
            persisted,
        }
    }

    /// Puts the referral link on the clipboard. Failures are only logged.
    pub async fn copy_link(&self) -> Result<(), ClipboardError> {
        match self.clipboard.write_text(self.referral.link()).await {
            Ok(()) => {
                log::info!("📋 Copied to clipboard: {}", self.referral.link());
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Failed to copy: {}", e);
                Err(e)
            }
        }
    }

    /// Nothing is rendered without an authenticated, identified user.
    pub fn render(&self, auth: &AuthState) -> Option<UserInfoView> {
        auth.user_id()?;
        let user = auth.user.as_ref()?;

        let link = self.referral.link();
        Some(UserInfoView {
            name: format!("{} {}", user.first_name, user.last_name),
            username: format!("@{}", user.username),
            email: user.email.clone(),
            referral_code: self.referral.code().to_string(),
            referral_link: (!link.is_empty()).then(|| link.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthUser;
    use crate::testing::{FixedCodes, MemoryClipboard, RecordedCall, RecordingApi};
    use crate::utils::{ApiError, DEFAULT_REFERRAL_LINK_BASE};
    use serde_json::json;

    fn user(id: Option<&str>) -> AuthUser {
        AuthUser {
            user_id: id.map(str::to_string),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn widget_with(
        api: Arc<RecordingApi>,
        codes: &[&str],
        clipboard: Arc<MemoryClipboard>,
    ) -> UserInfoWidget {
        UserInfoWidget::new(
            api,
            Arc::new(FixedCodes::new(codes)),
            clipboard,
            DEFAULT_REFERRAL_LINK_BASE,
        )
    }

    #[tokio::test]
    async fn test_fetched_code_is_displayed_with_link() {
        let api = Arc::new(
            RecordingApi::new()
                .with_user_data(Ok(json!({"id": "u1"})))
                .with_referral_code(Ok("Brave123".to_string())),
        );
        let mut widget = widget_with(api, &["Unused100"], Arc::new(MemoryClipboard::default()));
        let auth = AuthState::authenticated(user(Some("u1")));

        assert!(widget.on_auth_changed(&auth, "https://app.test/").await.is_some());

        let view = widget.render(&auth).unwrap();
        assert_eq!(view.referral_code, "Brave123");
        assert_eq!(
            view.referral_link.as_deref(),
            Some("https://ref.bloxsolutions.app/?referralCode=Brave123")
        );
        assert_eq!(view.name, "Ada Lovelace");
        assert_eq!(view.username, "@ada");
        assert_eq!(view.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_reconciliation_runs_once_per_mount() {
        let api = Arc::new(
            RecordingApi::new()
                .with_user_data(Err(ApiError::Backend("true".to_string())))
                .with_referral_code(Ok("Brave123".to_string())),
        );
        let mut widget =
            widget_with(api.clone(), &["Unused100"], Arc::new(MemoryClipboard::default()));
        let auth = AuthState::authenticated(user(Some("u1")));

        widget.on_auth_changed(&auth, "https://app.test/?referralCode=Happy321").await;
        let calls_after_first = api.calls().len();
        assert!(widget.on_auth_changed(&auth, "https://app.test/").await.is_none());

        assert_eq!(api.calls().len(), calls_after_first);
        assert_eq!(api.count(|c| matches!(c, RecordedCall::AddUser(_))), 1);
        assert_eq!(api.add_user_calls()[0].referral_code, "Happy321");
    }

    #[tokio::test]
    async fn test_guard_not_met_does_not_set_flag() {
        let api = Arc::new(RecordingApi::new());
        let mut widget =
            widget_with(api.clone(), &["Unused100"], Arc::new(MemoryClipboard::default()));

        assert!(widget
            .on_auth_changed(&AuthState::anonymous(), "https://app.test/")
            .await
            .is_none());
        assert!(widget
            .on_auth_changed(&AuthState::authenticated(user(None)), "https://app.test/")
            .await
            .is_none());

        assert!(!widget.is_logged_in());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_sends_old_and_new_and_adopts_server_code() {
        let api = Arc::new(
            RecordingApi::new()
                .with_user_data(Ok(json!({"id": "u1"})))
                .with_referral_code(Ok("OldCode111".to_string()))
                .with_set_code(Ok(Some("Server999".to_string()))),
        );
        let mut widget =
            widget_with(api.clone(), &["Swift555"], Arc::new(MemoryClipboard::default()));
        let auth = AuthState::authenticated(user(Some("u1")));
        widget.on_auth_changed(&auth, "https://app.test/").await;
        assert_eq!(widget.referral_code(), "OldCode111");

        let outcome = widget.refresh(&auth).await;

        let sets = api.set_code_calls();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].old_referral_code, "OldCode111");
        assert_eq!(sets[0].new_referral_code, "Swift555");
        assert_eq!(outcome.generated, "Swift555");
        assert_eq!(widget.referral_code(), "Server999");
        assert_eq!(
            widget.referral_link(),
            "https://ref.bloxsolutions.app/?referralCode=Server999"
        );
    }

    #[tokio::test]
    async fn test_refresh_keeps_local_code_without_confirmation() {
        let api = Arc::new(RecordingApi::new().with_set_code(Err(ApiError::Status(500))));
        let mut widget = widget_with(api, &["Swift555"], Arc::new(MemoryClipboard::default()));
        let auth = AuthState::authenticated(user(Some("u1")));

        let outcome = widget.refresh(&auth).await;

        assert_eq!(outcome.persisted, PersistResult::Failed(ApiError::Status(500)));
        assert_eq!(widget.referral_code(), "Swift555");
    }

    #[tokio::test]
    async fn test_refresh_when_signed_out_stays_local() {
        let api = Arc::new(RecordingApi::new());
        let mut widget =
            widget_with(api.clone(), &["Swift555"], Arc::new(MemoryClipboard::default()));

        let outcome = widget.refresh(&AuthState::anonymous()).await;

        assert_eq!(outcome.persisted, PersistResult::Skipped);
        assert_eq!(widget.referral_code(), "Swift555");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_copy_link_writes_current_link() {
        let api = Arc::new(RecordingApi::new().with_referral_code(Ok("Brave123".to_string())));
        let clipboard = Arc::new(MemoryClipboard::default());
        let mut widget = widget_with(api, &["Unused100"], clipboard.clone());
        let auth = AuthState::authenticated(user(Some("u1")));
        widget.on_auth_changed(&auth, "https://app.test/").await;

        widget.copy_link().await.unwrap();

        assert_eq!(
            clipboard.contents(),
            vec!["https://ref.bloxsolutions.app/?referralCode=Brave123".to_string()]
        );
    }

    #[tokio::test]
    async fn test_copy_failure_is_returned_not_rendered() {
        let api = Arc::new(RecordingApi::new().with_referral_code(Ok("Brave123".to_string())));
        let mut widget = widget_with(api, &["Unused100"], Arc::new(MemoryClipboard::failing()));
        let auth = AuthState::authenticated(user(Some("u1")));
        widget.on_auth_changed(&auth, "https://app.test/").await;

        assert!(widget.copy_link().await.is_err());
        assert_eq!(widget.render(&auth).unwrap().referral_code, "Brave123");
    }

    #[test]
    fn test_render_requires_auth_and_user_id() {
        let widget = widget_with(
            Arc::new(RecordingApi::new()),
            &["Unused100"],
            Arc::new(MemoryClipboard::default()),
        );

        assert!(widget.render(&AuthState::anonymous()).is_none());
        assert!(widget
            .render(&AuthState {
                is_authenticated: false,
                user: Some(user(Some("u1"))),
            })
            .is_none());
        assert!(widget.render(&AuthState::authenticated(user(None))).is_none());

        let view = widget.render(&AuthState::authenticated(user(Some("u1")))).unwrap();
        assert_eq!(view.referral_code, "");
        assert!(view.referral_link.is_none());
    }
}
