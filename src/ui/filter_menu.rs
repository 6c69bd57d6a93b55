/// "Change Filter" menu
///
/// Lists every filter in menu order with the active one highlighted.

use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Element, Length, Theme};

use crate::filter::FilterKind;

pub fn view<'a, Message: Clone + 'a>(
    current: FilterKind,
    on_select: impl Fn(FilterKind) -> Message,
    on_cancel: Message,
) -> Element<'a, Message> {
    let mut entries: Column<Message> = column![text("Select a filter").size(20)]
        .spacing(8)
        .align_x(Alignment::Center);

    for kind in FilterKind::ALL {
        let style: fn(&Theme, button::Status) -> button::Style = if kind == current {
            button::primary
        } else {
            button::secondary
        };

        entries = entries.push(
            button(text(kind.display_name()).width(Length::Fill).center())
                .on_press(on_select(kind))
                .style(style)
                .width(Length::Fill),
        );
    }

    entries = entries.push(
        button(text("Cancel").width(Length::Fill).center())
            .on_press(on_cancel)
            .style(button::text)
            .width(Length::Fill),
    );

    container(entries)
        .padding(20)
        .width(280)
        .style(container::rounded_box)
        .into()
}
