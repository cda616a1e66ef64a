use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;
use crate::card::{CardField, OptionCard};
use crate::controller::Phase;
use crate::intro;

const GOLD: Color = Color::Rgb(212, 175, 55);

pub fn ui(f: &mut Frame, app: &App) {
    match app.phase() {
        Phase::Intro => draw_intro(f, app),
        Phase::Passport => draw_passport(f, app),
        Phase::Selection => draw_selection(f, app),
        Phase::Comments => draw_comments(f, app),
        Phase::Ticket => draw_ticket(f, app),
        Phase::Sent => draw_sent(f, app),
    }
}

/// Header, body and footer rows shared by every screen.
fn frame_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(area)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(format!("✈ LOVE AIRLINES ✈    {}", app.phase().display()))
        .block(Block::default().borders(Borders::ALL).style(Style::default().fg(Color::White)))
        .style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// Footer with key hints, replaced by the newest notice when there is one.
fn draw_footer(f: &mut Frame, area: Rect, app: &App, hints: &str) {
    let (text, color) = match app.notices.first() {
        Some(notice) => (notice.as_str(), Color::Yellow),
        None => (hints, Color::Gray),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).style(Style::default().fg(Color::White)))
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn field(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<17}"), Style::default().fg(Color::Gray)),
        Span::styled(value.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

fn draw_intro(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let lines = if app.intro.is_revealed() {
        vec![
            Line::from(""),
            field("PASSENGER", &app.settings.passenger),
            field("FLIGHT", intro::FLIGHT),
            field("DATE", intro::FLIGHT_DATE),
            field("FROM", intro::ORIGIN),
            field("CLASS", intro::CLASS),
            Line::from(""),
            Line::from(Span::styled("Are you ready for departure?", Style::default().fg(GOLD))),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from("You have received a special invitation."),
            Line::from(""),
            Line::from(Span::styled("♥", Style::default().fg(Color::Red))),
        ]
    };

    let body = Paragraph::new(lines)
        .block(Block::default().title("Invitation").borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(body, chunks[1]);

    let hints = if app.intro.is_revealed() {
        "Enter Board Flight ✈  Q Quit"
    } else {
        "Enter Open Invitation ✈  Q Quit"
    };
    draw_footer(f, chunks[2], app, hints);
}

fn draw_passport(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let photo = match app.passport.photo() {
        Some(photo) => photo.describe(),
        None => "(no photo)".to_string(),
    };
    let status = if app.passport.is_approving() {
        "APPROVING VISA..."
    } else if app.passport.can_approve() {
        "READY - APPROVE VISA & PROCEED"
    } else {
        "Photo required"
    };

    let lines = vec![
        Line::from(Span::styled("PASSPORT", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))),
        Line::from(""),
        field("SURNAME / NOM", &app.settings.passenger),
        field("FROM / DE", intro::ORIGIN),
        field("PHOTO", &photo),
        Line::from(""),
        field("PHOTO FILE", &format!("{}▏", app.passport.photo_path)),
        Line::from(""),
        Line::from(Span::styled(status, Style::default().fg(Color::Cyan))),
    ];

    let body = Paragraph::new(lines)
        .block(Block::default().title("Passport Control").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    draw_footer(f, chunks[2], app, "Type photo path + Enter to attach  Enter Approve  Ctrl-C Quit");
}

fn draw_selection(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Departures board
            Constraint::Percentage(55), // Expanded card
        ])
        .split(chunks[1]);

    let items: Vec<ListItem> = app
        .selector
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let option = card.option();
            let reported = app
                .selector
                .ledger()
                .get(card.id())
                .is_some_and(|s| !s.location.is_empty());
            let style = if app.selector.is_expanded(card.id()) {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else if i == app.selector.cursor {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == app.selector.cursor { "► " } else { "  " };
            let mark = if reported { " ✓" } else { "" };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}  {}{}", prefix, option.flight_code(), option.title, mark),
                style,
            )))
        })
        .collect();

    let board = List::new(items).block(
        Block::default()
            .title("DEPARTURES · STATUS: ON TIME")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(board, main_chunks[0]);

    let expanded = app
        .selector
        .expanded()
        .and_then(|id| app.selector.cards().iter().find(|card| card.id() == id));
    match expanded {
        Some(card) => draw_card(f, main_chunks[1], card),
        None => {
            let hint = Paragraph::new("Select a flight and press Enter to open it.")
                .block(Block::default().title("Flight Details").borders(Borders::ALL))
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center);
            f.render_widget(hint, main_chunks[1]);
        }
    }

    let hints = if app.selector.expanded().is_some() {
        "Tab/↑↓ Field  ←→ Choose  Space Toggle  Enter/Esc Close"
    } else {
        "↑↓ Navigate  Enter Open  C Confirm Booking ✈  Q Quit"
    };
    draw_footer(f, chunks[2], app, hints);
}

fn card_field_value(card: &OptionCard, field: CardField) -> String {
    match field {
        CardField::Date => card.date().to_string(),
        CardField::Location => {
            if card.location().is_empty() {
                "Select Destination Sector...".to_string()
            } else {
                format!("◄ {} ►", card.location())
            }
        }
        CardField::CustomLocation => card.custom_location().to_string(),
        CardField::Plan => card.plan().to_string(),
        CardField::Image => match card.custom_image() {
            Some(image) if card.image_path.is_empty() => image.describe(),
            _ => card.image_path.clone(),
        },
        CardField::OwnFood => {
            let mark = if card.bring_own_food() { "[x]" } else { "[ ]" };
            mark.to_string()
        }
        CardField::Activity(index) => {
            let tag = card.option().activities.get(index).cloned().unwrap_or_default();
            let checked = card.activities().contains(&tag);
            format!("[{}] {}", if checked { "x" } else { " " }, tag)
        }
        CardField::Food => {
            if card.food_option().is_empty() {
                "Select Meal Service...".to_string()
            } else {
                format!("◄ {} ►", card.food_option())
            }
        }
    }
}

fn draw_card(f: &mut Frame, area: Rect, card: &OptionCard) {
    let focused = card.focused_field();
    let mut lines = vec![
        Line::from(Span::styled(
            card.option().title.clone(),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.custom_image()
                .map(|image| image.describe())
                .unwrap_or_else(|| card.option().image.clone()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for field in card.fields() {
        let style = if field == focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let prefix = if field == focused { "► " } else { "  " };
        let mut value = card_field_value(card, field);
        if field == focused && field.is_text() {
            value.push('▏');
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<30}", prefix, field.label()), Style::default().fg(Color::Gray)),
            Span::styled(value, style),
        ]));
    }

    let details = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!("Flight {}", card.option().flight_code()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::White)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(details, area);
}

fn draw_comments(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let mut lines = vec![
        Line::from(Span::styled(
            "Any special requests or ideas? 💭",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Let me know what would make this perfect for you!",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    let comments = &app.controller.selection().comments;
    if comments.is_empty() {
        lines.push(Line::from(Span::styled("Share your thoughts here...▏", Style::default().fg(Color::DarkGray))));
    } else {
        lines.push(Line::from(format!("{comments}▏")));
    }

    let body = Paragraph::new(lines)
        .block(Block::default().title("Special Requests").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    draw_footer(f, chunks[2], app, "Type your request  Enter See Summary ✨  Esc Go Back");
}

fn draw_ticket(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let lines: Vec<Line> = app
        .ticket()
        .render_lines()
        .into_iter()
        .map(Line::from)
        .collect();

    let ticket = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Boarding Pass")
                .borders(Borders::ALL)
                .style(Style::default().fg(GOLD)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(ticket, chunks[1]);

    draw_footer(f, chunks[2], app, "Enter Confirm & Print Boarding Pass  Q Quit");
}

fn draw_sent(f: &mut Frame, app: &App) {
    let chunks = frame_chunks(f.area());
    draw_header(f, chunks[0], app);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("♥", Style::default().fg(GOLD))),
        Line::from(Span::styled("PASSPORT STAMPED!", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Your flight to our special day is officially confirmed."),
        Line::from(format!("I can't wait to make these memories with you, {}!", app.settings.passenger)),
        Line::from("See you at the gate, Valentine! 💕"),
    ];
    if let Some(path) = &app.exported_to {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Boarding pass saved to {}", path.display()),
            Style::default().fg(Color::Gray),
        )));
    }

    let body = Paragraph::new(lines)
        .block(Block::default().title("Confirmed").borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    draw_footer(f, chunks[2], app, "Enter Quit");
}
