//! Classification of mention messages into commands, and the state changes
//! and replies they produce.

use log::debug;
use poise::serenity_prelude::UserId;

use crate::config::ModelDefaults;
use crate::persona::{CHARACTERS, Style, find_character};
use crate::prompt::build_prompt;
use crate::user_state::UserStateStore;

const MODE_PREFIX: &str = "mode ";
const CHARACTER_PREFIX: &str = "ch ";
const CREATE_PREFIX: &str = "create ";

/// Reply label used when no persona is active.
pub const ASSISTANT_LABEL: &str = "Gemini";
/// Substituted when the text model produced nothing.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "エラー";

pub const IMAGE_FAILED_REPLY: &str = "画像生成失敗。モデルが対応してないかも";
pub const IMAGE_DONE_REPLY: &str = "画像生成完了";
pub const IMAGE_SEND_FAILED_REPLY: &str = "画像送信に失敗した";

const INVALID_MODE_REPLY: &str =
    "⚠無効なモードだンゴ！使えるモードは normal (n) と kyemode (k) だけだンゴ。";

/// A mention message after the bot's own mention has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `mode <style>`, argument trimmed
    Mode(&'a str),
    /// `ch <persona>`, argument trimmed
    Character(&'a str),
    /// `create <prompt>`
    Create(&'a str),
    /// Anything else
    Chat(&'a str),
}

impl<'a> Command<'a> {
    #[must_use]
    pub fn parse(content: &'a str) -> Self {
        if let Some(arg) = content.strip_prefix(MODE_PREFIX) {
            Command::Mode(arg.trim())
        } else if let Some(arg) = content.strip_prefix(CHARACTER_PREFIX) {
            Command::Character(arg.trim())
        } else if let Some(prompt) = content.strip_prefix(CREATE_PREFIX) {
            Command::Create(prompt)
        } else {
            Command::Chat(content)
        }
    }
}

/// Everything needed to run the chat path for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
    pub model: String,
    pub persona: Option<String>,
}

/// What the bot should do in response to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reply immediately with this text
    Reply(String),
    GenerateImage { prompt: String, model: String },
    Chat(ChatRequest),
}

/// Only human-authored messages that mention the bot are handled. An
/// `@everyone` mention counts as mentioning the bot.
#[must_use]
pub fn should_handle(author_is_bot: bool, mentions_bot: bool, mentions_everyone: bool) -> bool {
    !author_is_bot && (mentions_bot || mentions_everyone)
}

/// Remove both mention forms of the bot from `content` and trim the result.
#[must_use]
pub fn strip_mentions(content: &str, bot_id: UserId) -> String {
    content
        .replace(&format!("<@{bot_id}>"), "")
        .replace(&format!("<@!{bot_id}>"), "")
        .trim()
        .to_string()
}

/// Classify `content` and apply any state change it requests.
pub fn dispatch<S>(
    store: &S,
    models: &ModelDefaults,
    user_id: UserId,
    user_name: &str,
    content: &str,
) -> Action
where
    S: UserStateStore + ?Sized,
{
    let command = Command::parse(content);
    debug!("Dispatching {command:?} for user {user_id}");

    match command {
        Command::Mode(arg) => Action::Reply(switch_style(store, user_id, arg)),
        Command::Character(name) => Action::Reply(switch_character(store, user_id, name)),
        Command::Create(prompt) => {
            let prefs = store.preferences(user_id);
            Action::GenerateImage {
                prompt: prompt.to_string(),
                model: prefs.image_model_or(&models.image).to_string(),
            }
        }
        Command::Chat(text) => {
            let prefs = store.preferences(user_id);
            let persona = prefs.persona.as_deref();
            Action::Chat(ChatRequest {
                prompt: build_prompt(prefs.style, persona, user_name, text),
                model: prefs.text_model_or(&models.text).to_string(),
                persona: prefs.persona.clone(),
            })
        }
    }
}

fn switch_style<S>(store: &S, user_id: UserId, arg: &str) -> String
where
    S: UserStateStore + ?Sized,
{
    let Ok(style) = arg.parse::<Style>() else {
        return INVALID_MODE_REPLY.to_string();
    };

    store.set_style(user_id, style);
    match style {
        Style::Normal => "通常モードに切り替えたンゴ！".to_string(),
        Style::Kyemode => "きぇさばモードに切り替えたンゴ！".to_string(),
    }
}

fn switch_character<S>(store: &S, user_id: UserId, name: &str) -> String
where
    S: UserStateStore + ?Sized,
{
    match find_character(name) {
        Some(character) => {
            store.set_persona(user_id, character);
            format!("キャラを **{character}** に切り替えたンゴ！")
        }
        None => format!(
            "キャラ **{name}** は存在しないンゴ！\n使えるキャラ一覧: {}",
            CHARACTERS.join(", ")
        ),
    }
}

/// Turn the model output into the message posted back to the channel.
///
/// A leading `"{persona}:"` echoed by the model is dropped; any other
/// delimiter is left alone.
#[must_use]
pub fn format_chat_reply(persona: Option<&str>, reply: Option<String>) -> String {
    let reply = reply.unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string());

    let body = persona
        .and_then(|persona| {
            reply
                .strip_prefix(persona)
                .and_then(|rest| rest.strip_prefix(':'))
        })
        .map_or(reply.as_str(), str::trim);

    format!("**{}**: {body}", persona.unwrap_or(ASSISTANT_LABEL))
}
