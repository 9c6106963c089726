//! Drawing of the table, modals, and the loading spinner.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use rowdeck_lib::error::ValidationError;
use rowdeck_lib::form::{Field, FormMode, FormSession};
use rowdeck_lib::model::{LoadStatus, Row};

use crate::app::{App, Modal};

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Fields rendered inside a form modal, in display order. Version and
/// creation date are part of the payload but stay hidden, prefilled.
const FORM_FIELDS: [Field; 4] = [Field::Id, Field::Language, Field::Name, Field::Bio];

const MODAL_WIDTH: u16 = 56;

const NO_WIDTH: usize = 4;
const ID_WIDTH: usize = 18;
const NAME_WIDTH: usize = 20;
const LANGUAGE_WIDTH: usize = 12;
const VERSION_WIDTH: usize = 9;
const DATE_WIDTH: usize = 12;

fn spinner(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Full-screen loading indicator shown while the seed fetch is pending.
pub fn draw_loading(out: &mut impl Write, tick: usize) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let message = format!("{} Loading...", spinner(tick));
    let x = width.saturating_sub(message.chars().count() as u16) / 2;
    queue!(out, Clear(ClearType::All), MoveTo(x, height / 2), Print(message))?;
    out.flush()
}

/// Renders one frame: title, table, status bar, and any modal on top.
pub fn draw(out: &mut impl Write, app: &App) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    queue!(out, Clear(ClearType::All))?;

    let title = "Rowdeck";
    let x = width.saturating_sub(title.chars().count() as u16) / 2;
    queue!(
        out,
        MoveTo(x, 0),
        SetAttribute(Attribute::Bold),
        Print(title),
        SetAttribute(Attribute::Reset)
    )?;

    draw_table(out, app, width, height)?;
    draw_status_bar(out, app, width, height)?;

    match &app.modal {
        Some(Modal::Form { session, active, errors }) => {
            draw_form(out, app, session, *active, errors.as_ref(), width, height)?;
        }
        Some(Modal::ConfirmDelete { name, .. }) => {
            draw_confirm(out, app, name, width, height)?;
        }
        None => {}
    }

    out.flush()
}

fn bio_width(total: u16) -> usize {
    (total as usize)
        .saturating_sub(NO_WIDTH + ID_WIDTH + NAME_WIDTH + LANGUAGE_WIDTH + VERSION_WIDTH + DATE_WIDTH + 8)
        .max(10)
}

/// Truncates to `width` chars (with an ellipsis) and pads to exactly `width`.
fn fit(text: &str, width: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() > width {
        chars.truncate(width.saturating_sub(1));
        chars.push('…');
    }
    let mut fitted: String = chars.into_iter().collect();
    while fitted.chars().count() < width {
        fitted.push(' ');
    }
    fitted
}

fn format_row(row: &Row, bio: usize) -> String {
    format!(
        "{} {} {} {} {} {} {}",
        fit(&row.no.to_string(), NO_WIDTH),
        fit(&row.id, ID_WIDTH),
        fit(&row.name, NAME_WIDTH),
        fit(&row.language, LANGUAGE_WIDTH),
        fit(&row.bio, bio),
        fit(&row.version, VERSION_WIDTH),
        fit(&row.created_date.format("%Y-%m-%d").to_string(), DATE_WIDTH),
    )
}

fn draw_table(out: &mut impl Write, app: &App, width: u16, height: u16) -> io::Result<()> {
    let rows = app.window.visible_slice(app.store.rows());
    let bio = bio_width(width);

    let header = format!(
        "{} {} {} {} {} {} {}",
        fit("No", NO_WIDTH),
        fit("ID", ID_WIDTH),
        fit("Name", NAME_WIDTH),
        fit("Language", LANGUAGE_WIDTH),
        fit("Bio", bio),
        fit("Version", VERSION_WIDTH),
        fit("Created", DATE_WIDTH),
    );
    queue!(
        out,
        MoveTo(1, 2),
        SetAttribute(Attribute::Bold),
        Print(header),
        SetAttribute(Attribute::Reset)
    )?;

    if rows.is_empty() {
        let message = if app.store.status() == LoadStatus::Failed {
            "Seed load failed — no rows"
        } else {
            "No rows"
        };
        queue!(
            out,
            MoveTo(1, 4),
            SetForegroundColor(Color::DarkGrey),
            Print(message),
            ResetColor
        )?;
        return Ok(());
    }

    // Keep the selection on screen when the window outgrows the viewport.
    let viewport = height.saturating_sub(6) as usize;
    let viewport = viewport.max(1);
    let first = app.selected.saturating_sub(viewport - 1);
    let drawn = rows.len().saturating_sub(first).min(viewport);

    for (offset, row) in rows.iter().enumerate().skip(first).take(viewport) {
        let y = 3 + (offset - first) as u16;
        let line = format_row(row, bio);
        if offset == app.selected {
            queue!(
                out,
                MoveTo(1, y),
                SetAttribute(Attribute::Reverse),
                Print(line),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, MoveTo(1, y), Print(line))?;
        }
    }

    if app.window.has_more(app.store.len()) {
        let y = 3 + drawn as u16;
        if y < height.saturating_sub(1) {
            queue!(
                out,
                MoveTo(1, y),
                SetForegroundColor(Color::DarkGrey),
                Print(format!("{} scroll down for more", spinner(app.spinner_tick))),
                ResetColor
            )?;
        }
    }
    Ok(())
}

fn draw_status_bar(out: &mut impl Write, app: &App, width: u16, height: u16) -> io::Result<()> {
    let visible = app.window.visible_slice(app.store.rows()).len();
    let text = match &app.status_line {
        Some(line) => line.clone(),
        None => format!(
            "a add  e edit  d delete  ↑/↓ move  q quit   {}/{} rows",
            visible,
            app.store.len()
        ),
    };
    queue!(
        out,
        MoveTo(1, height.saturating_sub(1)),
        SetForegroundColor(Color::DarkGrey),
        Print(fit(&text, (width as usize).saturating_sub(2))),
        ResetColor
    )
}

fn draw_box(out: &mut impl Write, x: u16, y: u16, width: u16, height: u16) -> io::Result<()> {
    let inner = (width.saturating_sub(2)) as usize;
    queue!(out, MoveTo(x, y), Print(format!("┌{}┐", "─".repeat(inner))))?;
    for row in 1..height.saturating_sub(1) {
        queue!(out, MoveTo(x, y + row), Print(format!("│{}│", " ".repeat(inner))))?;
    }
    queue!(
        out,
        MoveTo(x, y + height.saturating_sub(1)),
        Print(format!("└{}┘", "─".repeat(inner)))
    )
}

fn print_centered(out: &mut impl Write, x: u16, y: u16, width: u16, text: &str) -> io::Result<()> {
    let offset = width.saturating_sub(text.chars().count() as u16) / 2;
    queue!(out, MoveTo(x + offset, y), Print(text.to_string()))
}

fn draw_form(
    out: &mut impl Write,
    app: &App,
    session: &FormSession,
    active: Field,
    errors: Option<&ValidationError>,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let inner = (MODAL_WIDTH as usize).saturating_sub(4);

    let mut body: u16 = 2; // title + blank line
    for field in FORM_FIELDS {
        body += 2;
        if errors.is_some_and(|e| e.message_for(field.name()).is_some()) {
            body += 1;
        }
    }
    body += 2; // blank line + footer

    let box_height = body + 2;
    let x = width.saturating_sub(MODAL_WIDTH) / 2;
    let y = height.saturating_sub(box_height) / 2;
    draw_box(out, x, y, MODAL_WIDTH, box_height)?;

    let title = match session.mode() {
        FormMode::Add => "Add Row",
        FormMode::Edit => "Edit Row",
    };
    queue!(out, SetAttribute(Attribute::Bold), SetForegroundColor(Color::Blue))?;
    print_centered(out, x, y + 1, MODAL_WIDTH, title)?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;

    let mut line = y + 3;
    for field in FORM_FIELDS {
        let editable = session.is_editable(field);
        let marker = if field == active { '>' } else { ' ' };
        queue!(
            out,
            MoveTo(x + 2, line),
            Print(format!("{marker} {}", field.label()))
        )?;
        line += 1;

        let value = fit(session.value(field), inner.saturating_sub(2));
        if field == active {
            queue!(
                out,
                MoveTo(x + 4, line),
                SetAttribute(Attribute::Reverse),
                Print(value),
                SetAttribute(Attribute::Reset)
            )?;
        } else if editable {
            queue!(out, MoveTo(x + 4, line), Print(value))?;
        } else {
            queue!(
                out,
                MoveTo(x + 4, line),
                SetForegroundColor(Color::DarkGrey),
                Print(value),
                ResetColor
            )?;
        }
        line += 1;

        if let Some(message) = errors.and_then(|e| e.message_for(field.name())) {
            queue!(
                out,
                MoveTo(x + 4, line),
                SetForegroundColor(Color::Red),
                Print(fit(message, inner.saturating_sub(2))),
                ResetColor
            )?;
            line += 1;
        }
    }

    let footer = if app.pending.is_some() {
        format!("{} Saving...", spinner(app.spinner_tick))
    } else {
        "Enter save   Esc cancel   Tab next field".to_string()
    };
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    print_centered(out, x, y + box_height - 2, MODAL_WIDTH, &footer)?;
    queue!(out, ResetColor)?;
    Ok(())
}

fn draw_confirm(
    out: &mut impl Write,
    app: &App,
    name: &str,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let box_height: u16 = 7;
    let x = width.saturating_sub(MODAL_WIDTH) / 2;
    let y = height.saturating_sub(box_height) / 2;
    draw_box(out, x, y, MODAL_WIDTH, box_height)?;

    queue!(out, SetAttribute(Attribute::Bold), SetForegroundColor(Color::Red))?;
    print_centered(out, x, y + 1, MODAL_WIDTH, "Delete Row")?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;

    let message = format!("Are you sure to delete {name}?");
    let message = fit(&message, (MODAL_WIDTH as usize).saturating_sub(4));
    print_centered(out, x, y + 3, MODAL_WIDTH, message.trim_end())?;

    let footer = if app.pending.is_some() {
        format!("{} Deleting...", spinner(app.spinner_tick))
    } else {
        "Enter delete   Esc cancel".to_string()
    };
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    print_centered(out, x, y + 5, MODAL_WIDTH, &footer)?;
    queue!(out, ResetColor)?;
    Ok(())
}
