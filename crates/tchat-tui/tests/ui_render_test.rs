//! Render tests against ratatui's `TestBackend`.

use ratatui::{Terminal, backend::TestBackend};
use tchat_app::ConnectionState;
use tchat_proto::Message;
use tchat_tui::{App, AppEvent, KeyInput, ui};

fn draw(app: &App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
        .collect()
}

fn screen(rows: &[String]) -> String {
    rows.join("\n")
}

fn submit(app: &mut App, text: &str) {
    for c in text.chars() {
        let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
    }
    let _ = app.handle(AppEvent::Key(KeyInput::Enter));
}

fn joined(width: u16, height: u16) -> App {
    let mut app = App::new(false);
    let _ = app.handle(AppEvent::Resize(width, height));
    submit(&mut app, "nina");
    let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Connected));
    app
}

fn incoming(sender: &str, content: &str) -> AppEvent {
    AppEvent::MessageReceived(Message {
        sender: sender.into(),
        content: content.into(),
        ..Message::default()
    })
}

#[test]
fn identity_screen() {
    let app = App::new(false);
    let out = screen(&draw(&app, 60, 12));

    assert!(out.contains("Your Username"));
    assert!(out.contains("Welcome to the chat room!"));
    assert!(out.contains("Type a message and press Enter to send."));
    assert!(out.contains("Disconnected"));
    assert!(out.contains("(esc or ctrl+c to quit)"));
}

#[test]
fn chat_screen_shows_messages_and_status() {
    let mut app = joined(60, 12);
    let _ = app.handle(incoming("omar", "hi nina"));
    submit(&mut app, "hello");

    let out = screen(&draw(&app, 60, 12));
    assert!(out.contains("tchat: nina"));
    assert!(out.contains("omar: hi nina"));
    assert!(out.contains("You: hello"));
    assert!(out.contains("Connected"));
    assert!(!out.contains("Welcome to the chat room!"));
}

#[test]
fn wrapped_lines_take_several_rows() {
    let mut app = joined(14, 12);
    let _ = app.handle(incoming("al", "pha beta gamma"));

    let rows = draw(&app, 14, 12);
    let first = rows.iter().position(|row| row.contains("al: pha beta")).unwrap();
    assert!(rows[first + 1].contains("gamma"));
}

#[test]
fn wrap_width_matches_chat_interior() {
    let mut app = joined(14, 12);
    let _ = app.handle(incoming("al", "pha beta gamma"));

    let rows = draw(&app, 14, 12);
    assert!(rows.iter().any(|row| row == "│al: pha beta│"));
}

#[test]
fn overlong_sender_starts_on_a_fresh_row() {
    let mut app = joined(12, 12);
    let _ = app.handle(incoming("extraordinary", "hi"));

    let rows = draw(&app, 12, 12);
    let name = rows.iter().position(|row| row.contains("extraordin")).unwrap();
    assert_eq!(rows[name - 1].trim_matches('│').trim(), "");
    assert!(rows[name + 1].contains("hi"));
}

#[test]
fn newest_lines_stay_visible() {
    let mut app = joined(40, 10);
    for i in 0..30 {
        let _ = app.handle(incoming("omar", &format!("line {i:02}")));
    }

    let out = screen(&draw(&app, 40, 10));
    assert!(out.contains("line 29"));
    assert!(!out.contains("line 00"));
}

#[test]
fn errors_render_inline() {
    let mut app = joined(60, 12);
    let _ = app.handle(AppEvent::Disconnected {
        summary: "Disconnected!".into(),
        cause: "connection closed by peer".into(),
    });

    let out = screen(&draw(&app, 60, 12));
    assert!(out.contains("Disconnected!"));
    assert!(!out.contains("connection closed by peer"));
}
