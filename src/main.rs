use std::cell::RefCell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    layout::{Constraint, Layout},
    prelude::*,
    text::{Line, Span},
    widgets::Paragraph,
};

use formkit::{
    CommandMap, Config, FormWidget, Pile, Selector, log,
    tui::theme,
    widgets::{
        EmailEditor, IntegerEditor, OptionSpec, PasswordEditor, RealnameEditor, Text,
        UsernameEditor,
    },
};

/// Sample installer identity form.
struct Demo {
    pile: Pile,
    realname: Rc<RefCell<RealnameEditor>>,
    username: Rc<RefCell<UsernameEditor>>,
    email: Rc<RefCell<EmailEditor>>,
    password: Rc<RefCell<PasswordEditor>>,
    swap_size: Rc<RefCell<IntegerEditor>>,
    status: Rc<RefCell<String>>,
    command_map: CommandMap,
    done: bool,
}

impl Demo {
    fn new(config: &Config) -> Result<Self> {
        let command_map = config.command_map()?;
        let status = Rc::new(RefCell::new(String::from("Nothing selected yet")));

        let realname = Rc::new(RefCell::new(RealnameEditor::new("Your name:      ")));
        let username = Rc::new(RefCell::new(UsernameEditor::new("Pick a username: ")));
        let email = Rc::new(RefCell::new(EmailEditor::new("Email:          ")));
        let password = Rc::new(RefCell::new(PasswordEditor::new(
            "Password:       ",
            config.mask(),
        )));
        let swap_size = Rc::new(RefCell::new(IntegerEditor::new("Swap (MiB):     ", 2048)));

        let mut layout: Selector<String> = Selector::new(
            vec![
                OptionSpec::from(("Guided", false)),
                OptionSpec::from("Use entire disk"),
                OptionSpec::from(("Use entire disk with LVM", true, "lvm".to_string())),
                OptionSpec::from(("Expert", false)),
                OptionSpec::from(("Manual", true, "manual".to_string())),
            ],
            1,
        )?
        .with_command_map(command_map.clone());
        connect_status(&mut layout, &status, "Disk layout");

        let mut ssh = Selector::<String>::yes_no().with_command_map(command_map.clone());
        connect_status(&mut ssh, &status, "Install OpenSSH");

        let mut children: Vec<Box<dyn FormWidget>> = vec![
            Box::new(realname.clone()),
            Box::new(username.clone()),
            Box::new(email.clone()),
            Box::new(password.clone()),
            Box::new(swap_size.clone()),
            Box::new(Text::styled("Disk layout:", theme::caption())),
            Box::new(layout),
            Box::new(Text::styled("Install OpenSSH server?", theme::caption())),
            Box::new(ssh),
        ];

        for (name, mut selector) in config.selectors(&command_map)? {
            let label = name.clone();
            let sink = status.clone();
            selector.on_select(move |value: &toml::Value| {
                *sink.borrow_mut() = format!("{}: {}", label, value);
            });
            children.push(Box::new(Text::styled(format!("{}:", name), theme::caption())));
            children.push(Box::new(selector));
        }

        Ok(Self {
            pile: Pile::new(children, command_map.clone()),
            realname,
            username,
            email,
            password,
            swap_size,
            status,
            command_map,
            done: false,
        })
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.done = true;
            return;
        }

        // An open pop-up swallows everything, so Tab cannot leave it dangling
        let Some(unhandled) = self.pile.keypress(key) else {
            return;
        };

        match unhandled.code {
            KeyCode::Tab => {
                self.pile.focus_next();
            }
            KeyCode::BackTab => {
                self.pile.focus_prev();
            }
            _ if self.command_map.is(&unhandled, formkit::Command::Activate) => self.submit(),
            _ => {}
        }
    }

    /// Validate required fields; finish when they are filled in.
    fn submit(&mut self) {
        let mut ok = true;
        if self.realname.borrow().value().is_empty() {
            self.realname.borrow_mut().set_error("Real name is required");
            ok = false;
        }
        if self.username.borrow().value().is_empty() {
            self.username.borrow_mut().set_error("username is required");
            ok = false;
        }
        if ok {
            log::log_event("form submitted");
            self.done = true;
        }
    }

    fn summary(&self) -> String {
        format!(
            "name={:?} username={:?} email={:?} password_len={} swap={} | {}",
            self.realname.borrow().value(),
            self.username.borrow().value(),
            self.email.borrow().value(),
            self.password.borrow().value().chars().count(),
            self.swap_size.borrow().value(),
            self.status.borrow(),
        )
    }
}

fn connect_status(selector: &mut Selector<String>, status: &Rc<RefCell<String>>, label: &'static str) {
    let sink = status.clone();
    selector.on_select(move |value: &String| {
        *sink.borrow_mut() = format!("{}: {}", label, value);
    });
}

fn render(frame: &mut Frame, demo: &mut Demo) {
    let area = frame.area();

    let layout = Layout::vertical([
        Constraint::Length(2), // Title + spacing
        Constraint::Min(0),    // Form
        Constraint::Length(1), // Status
        Constraint::Length(1), // Hotkeys
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::styled(
            "Profile setup",
            Style::new().fg(theme::ACCENT_GOLD).bold(),
        )),
        layout[0],
    );

    demo.pile.render(frame, layout[1], true);

    frame.render_widget(
        Paragraph::new(Line::styled(demo.status.borrow().clone(), theme::info_minor())),
        layout[2],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Tab/↑/↓]", Style::new().fg(theme::TEXT_WHITE)),
            Span::styled(" move · ", Style::new().fg(theme::TEXT_DIM)),
            Span::styled("[Enter]", Style::new().fg(theme::TEXT_WHITE)),
            Span::styled(" select/done · ", Style::new().fg(theme::TEXT_DIM)),
            Span::styled("[Esc]", Style::new().fg(theme::TEXT_WHITE)),
            Span::styled(" close menu · ", Style::new().fg(theme::TEXT_DIM)),
            Span::styled("[Ctrl+C]", Style::new().fg(theme::TEXT_WHITE)),
            Span::styled(" quit", Style::new().fg(theme::TEXT_DIM)),
        ])),
        layout[3],
    );

    // Pop-ups go on top of everything else
    demo.pile.render_overlay(frame, area);
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Ok(log_path) = log::init() {
        log::log(&format!("Log file: {}", log_path.display()));
    }

    let config = Config::load();
    let mut demo = Demo::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut demo).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if result.is_ok() {
        println!("{}", demo.summary());
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, demo: &mut Demo) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    while !demo.done {
        terminal.draw(|frame| render(frame, demo))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        demo.handle_key(key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                            demo.pile.mouse_click(mouse.column, mouse.row);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            // Periodic redraw keeps the screen right after terminal resizes
            _ = tokio::time::sleep(Duration::from_millis(250)) => {}
        }
    }

    Ok(())
}
