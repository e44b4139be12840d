//! Per-user preferences, kept in memory for the lifetime of the process.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use poise::serenity_prelude::UserId;

use crate::persona::Style;

/// Everything the bot remembers about a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    pub style: Style,
    pub persona: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
}

impl UserPreferences {
    pub fn text_model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.text_model.as_deref().unwrap_or(default)
    }

    pub fn image_model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.image_model.as_deref().unwrap_or(default)
    }
}

/// Storage for user preferences.
///
/// Writes from concurrent messages of the same user are not ordered: the last
/// write to land wins.
pub trait UserStateStore: Send + Sync {
    /// Current preferences, or the defaults for a user never seen before.
    fn preferences(&self, user_id: UserId) -> UserPreferences;

    fn set_style(&self, user_id: UserId, style: Style);

    fn set_persona(&self, user_id: UserId, persona: &str);

    fn set_text_model(&self, user_id: UserId, model: &str);

    fn set_image_model(&self, user_id: UserId, model: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserPreferences>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, user_id: UserId, apply: impl FnOnce(&mut UserPreferences)) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        apply(users.entry(user_id).or_default());
    }
}

impl UserStateStore for InMemoryUserStore {
    fn preferences(&self, user_id: UserId) -> UserPreferences {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, user_id: UserId, style: Style) {
        self.update(user_id, |prefs| prefs.style = style);
    }

    fn set_persona(&self, user_id: UserId, persona: &str) {
        self.update(user_id, |prefs| prefs.persona = Some(persona.to_string()));
    }

    fn set_text_model(&self, user_id: UserId, model: &str) {
        self.update(user_id, |prefs| prefs.text_model = Some(model.to_string()));
    }

    fn set_image_model(&self, user_id: UserId, model: &str) {
        self.update(user_id, |prefs| prefs.image_model = Some(model.to_string()));
    }
}
