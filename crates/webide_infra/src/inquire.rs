use colored::Colorize;
use inquire::ui::{RenderConfig, Styled};
use inquire::{InquireError, Select, Text};
use webide_app::{NotificationLevel, UserInfra};

/// Terminal prompts. Escape and Ctrl+C dismiss a prompt instead of failing.
#[derive(Default, Debug, Clone)]
pub struct WebIdeInquire;

impl WebIdeInquire {
    pub fn new() -> Self {
        Self
    }

    fn render_config() -> RenderConfig<'static> {
        RenderConfig::default()
            .with_scroll_up_prefix(Styled::new("⇡"))
            .with_scroll_down_prefix(Styled::new("⇣"))
            .with_highlighted_option_prefix(Styled::new("➤"))
    }

    async fn prompt<T, F>(&self, f: F) -> anyhow::Result<Option<T>>
    where
        F: FnOnce() -> Result<T, InquireError> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::task::spawn_blocking(f).await? {
            Ok(value) => Ok(Some(value)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

#[async_trait::async_trait]
impl UserInfra for WebIdeInquire {
    async fn prompt_question(
        &self,
        question: &str,
        placeholder: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        let question = question.to_string();
        let placeholder = placeholder.map(str::to_string);
        self.prompt(move || {
            let mut text = Text::new(&question).with_render_config(Self::render_config());
            if let Some(placeholder) = &placeholder {
                text = text.with_placeholder(placeholder);
            }
            text.prompt()
        })
        .await
    }

    async fn select_one(
        &self,
        message: &str,
        detail: Option<&str>,
        options: Vec<String>,
    ) -> anyhow::Result<Option<String>> {
        if options.is_empty() {
            return Ok(None);
        }

        let message = message.to_string();
        let detail = detail.map(str::to_string);
        self.prompt(move || {
            let help = detail
                .as_deref()
                .unwrap_or("Use arrow keys to navigate, Enter to select, Esc to dismiss");
            Select::new(&message, options)
                .with_render_config(Self::render_config())
                .with_help_message(help)
                .prompt()
        })
        .await
    }

    async fn notify(&self, level: NotificationLevel, message: &str) -> anyhow::Result<()> {
        let message = match level {
            NotificationLevel::Info => message.cyan(),
            NotificationLevel::Warning => message.yellow(),
            NotificationLevel::Error => message.red().bold(),
        };
        eprintln!("{message}");
        Ok(())
    }
}
