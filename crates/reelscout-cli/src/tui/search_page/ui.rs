//! TUI rendering logic for the search page.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};
use reelscout_core::{EntityKind, SortOrder, age_from_birthday};

use super::state::{InputMode, PersonDetail, ResultRow, SearchPageState};

/// Placeholder for missing values.
const DASH: &str = "--";

/// Draws the search page. Returns the result area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut SearchPageState, today: chrono::NaiveDate) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box + controls
            Constraint::Length(1), // banner
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_banner(frame, chunks[1], state);

    let main_area = chunks[2];
    if let Some(detail) = state.detail.clone() {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_area);
        draw_results(frame, panes[0], state);
        draw_detail(frame, panes[1], &detail, today);
    } else {
        draw_results(frame, main_area, state);
    }

    draw_footer(frame, chunks[3], state);

    main_area.height
}

/// Draws the search box and the filter controls.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &SearchPageState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(state.session.draft().to_owned())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let session = &state.session;
    let kind = match session.kind() {
        EntityKind::Movies => "Movies",
        EntityKind::People => "People",
    };
    let sort = session.sort_by().unwrap_or("none");
    let arrow = match session.order() {
        SortOrder::Asc => "\u{2191}",
        SortOrder::Desc => "\u{2193}",
    };
    let pages = session
        .total_pages()
        .map_or_else(|| String::from("?"), |t| t.to_string());

    let mut spans = vec![
        Span::styled(kind, Style::default().fg(Color::Cyan)),
        Span::raw(format!("  sort: {sort} {arrow}")),
    ];
    if session.kind() == EntityKind::Movies {
        spans.push(Span::raw(format!("  genre: {}", state.genre_label())));
    }
    spans.push(Span::raw(format!(
        "  page {}/{pages}  ({} results)",
        session.page(),
        state.total_results()
    )));

    let controls =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" reelscout "));
    frame.render_widget(controls, header_chunks[1]);
}

/// Draws the loading / error banner line.
fn draw_banner(frame: &mut Frame, area: Rect, state: &SearchPageState) {
    let line = if let Some(error) = &state.error {
        Line::from(Span::styled(
            format!(" Error: {error}  (R: retry)"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if state.loading {
        Line::from(Span::styled(" Loading...", Style::default().fg(Color::Yellow)))
    } else if state.ages_loading {
        Line::from(Span::styled(
            " Loading ages...",
            Style::default().fg(Color::Yellow),
        ))
    } else if state.session.query().is_empty() {
        Line::from(Span::styled(
            " Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else if state.rows().is_empty() {
        Line::from(" No results")
    } else {
        Line::from(String::new())
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the result table.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut SearchPageState) {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let (header, widths, title) = match state.session.kind() {
        EntityKind::Movies => (
            Row::new(vec!["\u{2605}", "ID", "Title", "Released", "Rating", "Popularity"]),
            vec![
                Constraint::Length(2),
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(11),
                Constraint::Length(7),
                Constraint::Length(10),
            ],
            " Movies ",
        ),
        EntityKind::People => (
            Row::new(vec!["ID", "Name", "Popularity", "Movies", "Age", "Known for"]),
            vec![
                Constraint::Length(8),
                Constraint::Length(24),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Min(20),
            ],
            " People ",
        ),
    };

    let rows: Vec<Row> = state
        .rows()
        .iter()
        .map(|row| match row {
            ResultRow::Movie(m) => {
                let favorite = state.is_favorite(m.id);
                let style = if favorite {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    String::from(if favorite { "\u{2605}" } else { " " }),
                    m.id.to_string(),
                    m.title.clone(),
                    m.release_date
                        .clone()
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| String::from(DASH)),
                    format!("{:.1}", m.vote_average),
                    format!("{:.1}", m.popularity),
                ])
                .style(style)
            }
            ResultRow::Person(p, age) => Row::new(vec![
                p.id.to_string(),
                p.name.clone(),
                format!("{:.1}", p.popularity),
                p.known_for.len().to_string(),
                age.map_or_else(|| String::from(DASH), |a| a.to_string()),
                p.known_for
                    .iter()
                    .filter_map(|k| k.display_title())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]),
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header.style(header_style).bottom_margin(1))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the person detail pane.
fn draw_detail(frame: &mut Frame, area: Rect, detail: &PersonDetail, today: chrono::NaiveDate) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = &detail.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(person) = &detail.details {
        let label = Style::default().fg(Color::Yellow);
        let age = age_from_birthday(person.birthday.as_deref(), today)
            .map_or_else(|| String::from(DASH), |a| a.to_string());
        lines.push(Line::from(Span::styled(
            person.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (name, value) in [
            ("Born", person.birthday.as_deref()),
            ("Died", person.deathday.as_deref()),
            ("Place", person.place_of_birth.as_deref()),
            ("Known for", person.known_for_department.as_deref()),
        ] {
            lines.push(Line::from(vec![
                Span::styled(format!("{name:<10}"), label),
                Span::raw(value.unwrap_or(DASH).to_owned()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", "Age"), label),
            Span::raw(age),
        ]));
        lines.push(Line::from(String::new()));
        if let Some(bio) = person.biography.as_deref().filter(|b| !b.is_empty()) {
            lines.push(Line::from(bio.to_owned()));
            lines.push(Line::from(String::new()));
        }
        if let Some(credits) = &detail.credits {
            lines.push(Line::from(Span::styled(
                format!("Movies ({})", credits.cast.len()),
                label,
            )));
            for credit in &credits.cast {
                let year = credit
                    .movie
                    .release_date
                    .as_deref()
                    .and_then(|d| d.get(..4))
                    .unwrap_or(DASH);
                let role = credit
                    .character
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .map_or_else(String::new, |c| format!(" as {c}"));
                lines.push(Line::from(format!("{year}  {}{role}", credit.movie.title)));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Person {} ", detail.person_id)),
        );
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &SearchPageState) {
    let help_text = match (state.input_mode, state.session.kind()) {
        (InputMode::Search, _) => Line::from("Type to search | Enter: search | Esc: cancel"),
        (InputMode::Normal, EntityKind::Movies) => Line::from(vec![Span::raw(
            "/: search  t: type  g: genre  s: sort  r: order  \u{2190}\u{2192}: page  \u{2191}\u{2193}/j/k: move  f: favorite  o: open  q: quit",
        )]),
        (InputMode::Normal, EntityKind::People) => Line::from(vec![Span::raw(
            "/: search  t: type  s: sort  r: order  \u{2190}\u{2192}: page  \u{2191}\u{2193}/j/k: move  Enter: details  Esc: close  o: open  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
