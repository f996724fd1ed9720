use crate::components::UserInfoWidget;
use crate::services::{
    AdjectiveCodeGenerator, Clipboard, CodeGenerator, HttpReferralApi, ReferralApi,
    SystemClipboard,
};
use crate::utils::WidgetConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type SharedWidget = Arc<tokio::sync::Mutex<UserInfoWidget>>;

/// Mounted widgets, one per user id, sharing a single backend client.
///
/// A widget stays mounted until `unmount`; nothing evicts idle entries, so
/// the map holds one entry per user seen since the last unmount.
pub struct WidgetHost {
    api: Arc<dyn ReferralApi>,
    generator: Arc<dyn CodeGenerator>,
    clipboard: Arc<dyn Clipboard>,
    link_base: String,
    widgets: Mutex<HashMap<String, SharedWidget>>,
}

impl WidgetHost {
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
            link_base: link_base.into(),
            widgets: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(
            Arc::new(HttpReferralApi::from_config(config)),
            Arc::new(AdjectiveCodeGenerator),
            Arc::new(SystemClipboard::default()),
            config.referral_link_base.clone(),
        )
    }

    fn widgets(&self) -> std::sync::MutexGuard<'_, HashMap<String, SharedWidget>> {
        self.widgets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Existing widget for `user_id`, or a freshly mounted one
    pub fn mount(&self, user_id: &str) -> SharedWidget {
        self.widgets()
            .entry(user_id.to_string())
            .or_insert_with(|| {
                log::debug!("🧩 Mounting widget for {}", user_id);
                Arc::new(tokio::sync::Mutex::new(UserInfoWidget::new(
                    self.api.clone(),
                    self.generator.clone(),
                    self.clipboard.clone(),
                    self.link_base.clone(),
                )))
            })
            .clone()
    }

    /// Widget already mounted for `user_id`, without mounting one
    pub fn get(&self, user_id: &str) -> Option<SharedWidget> {
        self.widgets().get(user_id).cloned()
    }

    /// Drops the widget; the next mount starts with a cleared login flag
    pub fn unmount(&self, user_id: &str) -> bool {
        let removed = self.widgets().remove(user_id).is_some();
        if removed {
            log::debug!("🧩 Unmounted widget for {}", user_id);
        }
        removed
    }

    pub fn mounted(&self) -> usize {
        self.widgets().len()
    }
}
