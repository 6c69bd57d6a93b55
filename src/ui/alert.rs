/// Titled alert dialog
///
/// Failures and save confirmations are shown through this; dismissing it
/// returns the app to idle.

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new("Failure", message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message)
    }

    /// Translate a writer completion into the alert shown to the user
    pub fn from_save_result(result: &Result<impl AsRef<Path>, String>) -> Self {
        match result {
            Ok(path) => Self::success(format!(
                "Your image was saved to {}",
                path.as_ref().display()
            )),
            Err(reason) => Self::failure(reason.clone()),
        }
    }

    pub fn view<'a, Message: Clone + 'a>(&'a self, on_dismiss: Message) -> Element<'a, Message> {
        let card = column![
            text(&self.title).size(22),
            text(&self.message).size(16),
            button("OK").on_press(on_dismiss).padding([6, 24]),
        ]
        .spacing(16)
        .align_x(Alignment::Center);

        container(card)
            .padding(24)
            .max_width(360)
            .width(Length::Shrink)
            .style(container::rounded_box)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaveError;
    use std::path::PathBuf;

    #[test]
    fn test_no_image_alert() {
        let alert = Alert::failure(SaveError::NoImage.to_string());
        assert_eq!(alert.title, "Failure");
        assert_eq!(alert.message, "Select an image to save!");
    }

    #[test]
    fn test_writer_failure_keeps_reason() {
        let result: Result<PathBuf, String> = Err("disk full".to_string());
        let alert = Alert::from_save_result(&result);
        assert_eq!(alert, Alert::failure("disk full"));
    }

    #[test]
    fn test_writer_success_mentions_path() {
        let result: Result<PathBuf, String> = Ok(PathBuf::from("/photos/a.png"));
        let alert = Alert::from_save_result(&result);
        assert_eq!(alert.title, "Success");
        assert!(alert.message.contains("/photos/a.png"));
    }
}
