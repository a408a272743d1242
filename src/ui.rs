//! Layout and drawing: splash, playfield with side boxes, next preview, endings.

use crate::app::Screen;
use crate::piece::Piece;
use crate::playfield::{HEIGHT, WIDTH};
use crate::session::{CellView, Session, Status};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Each grid cell renders as two terminal columns.
const CELL_COLS: u16 = 2;
/// Playfield box: grid plus one border cell on each side.
const PLAYFIELD_BOX_W: u16 = WIDTH as u16 * CELL_COLS + 2;
const PLAYFIELD_BOX_H: u16 = HEIGHT as u16 + 2;
/// Side boxes (score, level, blocks, next preview).
const SIDE_BOX_W: u16 = 16;
const STAT_BOX_H: u16 = 5;
const NEXT_BOX_H: u16 = 7;
/// Gap between the playfield and the side columns.
const GUTTER: u16 = 2;

/// Splash title: six 12-column letters with one column between them.
const TITLE_COLS: u16 = 6 * 13;

/// Minimum terminal size. The splash title is the widest screen; the game
/// layout (playfield box plus both side columns) is narrower than that.
pub const MIN_COLS: u16 = TITLE_COLS + 2;
pub const MIN_ROWS: u16 = PLAYFIELD_BOX_H + 2;

/// Big block letters for the splash title, 12 columns x 10 rows each.
const TITLE_T: [&str; 10] = [
    "111111111111",
    "111111111111",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
];

const TITLE_E: [&str; 10] = [
    "111111111111",
    "111111111111",
    "111100000000",
    "111100000000",
    "111111111111",
    "111111111111",
    "111100000000",
    "111100000000",
    "111111111111",
    "111111111111",
];

const TITLE_R: [&str; 10] = [
    "111111111100",
    "111111111110",
    "111100001111",
    "111100000111",
    "111100001111",
    "111111111110",
    "111111111111",
    "111100001111",
    "111100000111",
    "111100000111",
];

const TITLE_I: [&str; 10] = [
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
    "000011110000",
];

const TITLE_S: [&str; 10] = [
    "000111111000",
    "011111111110",
    "111100000111",
    "011110000000",
    "000111111000",
    "000000111110",
    "000000001111",
    "111000001111",
    "011111111110",
    "000111111000",
];

/// Digits for the bonus screen, 8 columns x 7 rows.
const DIGIT_1: [&str; 7] = [
    "00011000",
    "00111000",
    "00011000",
    "00011000",
    "00011000",
    "00011000",
    "00111100",
];

const DIGIT_0: [&str; 7] = [
    "00111100",
    "01100110",
    "11000011",
    "11000011",
    "11000011",
    "01100110",
    "00111100",
];

const DIGIT_2: [&str; 7] = [
    "00111100",
    "01100110",
    "00000011",
    "00000110",
    "00011000",
    "01100000",
    "11111111",
];

const DIGIT_4: [&str; 7] = [
    "00001100",
    "00111100",
    "11001100",
    "11001100",
    "11111111",
    "00001100",
    "00011110",
];

const HEART: [&str; 8] = [
    "0000111001110000",
    "0011111111111100",
    "0111111111111110",
    "1111111111111111",
    "0111111111111110",
    "0001111111111000",
    "0000011111100000",
    "0000000110000000",
];

const GRIN: [&str; 10] = [
    "0000011111111111100000",
    "0011111111111111111100",
    "1110011001111001100111",
    "1111100111111110011111",
    "1110011001111001100111",
    "1111111111111111111111",
    "1111110000000000111111",
    "0011100111111110011100",
    "0001111111111111111000",
    "0000001111111111000000",
];

/// One row of a bitmap glyph as block characters.
fn glyph_row(glyph: &[&str], row: usize) -> String {
    glyph.get(row).map_or_else(String::new, |r| {
        r.chars().map(|c| if c == '0' { ' ' } else { '█' }).collect()
    })
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Draw the current screen.
pub fn draw(frame: &mut Frame, screen: Screen, session: &Session, theme: &Theme) {
    let area = frame.area();
    match screen {
        Screen::Splash => draw_splash(frame, theme, area),
        Screen::Topic => draw_topic(frame, theme, area),
        Screen::Playing => draw_game(frame, session, theme, area),
        Screen::Over => draw_over(frame, theme, area),
        Screen::Bonus => draw_bonus(frame, theme, area),
        Screen::Farewell => draw_farewell(frame, theme, area),
    }
}

fn draw_splash(frame: &mut Frame, theme: &Theme, area: Rect) {
    let letters: [(&[&str], Color); 6] = [
        (&TITLE_T, theme.pieces[2]),
        (&TITLE_E, theme.pieces[1]),
        (&TITLE_T, theme.pieces[2]),
        (&TITLE_R, theme.pieces[0]),
        (&TITLE_I, theme.pieces[5]),
        (&TITLE_S, theme.pieces[4]),
    ];

    let mut lines = Vec::new();
    for row in 0..10 {
        let mut spans = Vec::new();
        for (glyph, color) in letters {
            spans.push(Span::styled(glyph_row(glyph, row), Style::default().fg(color).bold()));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from("Tetromino console game")
            .style(Style::default().fg(theme.main_fg).bold()),
    );
    lines.push(
        Line::from(concat!("Version ", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(theme.main_fg)),
    );
    lines.push(Line::from(""));
    lines.push(
        Line::from("Any key to continue ...").style(Style::default().fg(theme.title).bold()),
    );

    let rect = centered(area, TITLE_COLS, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_topic(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from("<Left> / 'a'   move left").style(text),
        Line::from("<Right> / 'd'  move right").style(text),
        Line::from("<Down> / 's'   move down").style(text),
        Line::from("j / k          rotate").style(text),
        Line::from("<Space>/<Enter> drop").style(text),
        Line::from("<Esc> / 'q'    quit").style(text),
        Line::from(""),
        Line::from("Any key to start ...").style(Style::default().fg(theme.title).bold()),
    ];
    let rect = centered(area, 40, lines.len() as u16 + 2);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), rect);
}

fn draw_game(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let total_w = PLAYFIELD_BOX_W + 2 * (SIDE_BOX_W + GUTTER);
    let origin = centered(area, total_w, PLAYFIELD_BOX_H);

    let left_x = origin.x;
    let field_x = origin.x + SIDE_BOX_W + GUTTER;
    let right_x = field_x + PLAYFIELD_BOX_W + GUTTER;

    draw_stat_box(
        frame,
        Rect::new(left_x, origin.y + 1, SIDE_BOX_W, STAT_BOX_H),
        "SCORE",
        &format!("{:07}", session.score),
        theme,
        theme.pieces[1],
    );
    draw_stat_box(
        frame,
        Rect::new(left_x, origin.y + 2 + STAT_BOX_H, SIDE_BOX_W, STAT_BOX_H),
        "LEVEL",
        &format!("{:7}", session.level),
        theme,
        theme.pieces[5],
    );
    draw_stat_box(
        frame,
        Rect::new(left_x, origin.y + 3 + STAT_BOX_H * 2, SIDE_BOX_W, STAT_BOX_H),
        "BLOCKS",
        &format!("{:07}", session.blocks),
        theme,
        theme.pieces[4],
    );

    draw_playfield(
        frame,
        Rect::new(field_x, origin.y, PLAYFIELD_BOX_W, PLAYFIELD_BOX_H),
        session,
        theme,
    );

    draw_next_box(
        frame,
        Rect::new(right_x, origin.y + 1, SIDE_BOX_W, NEXT_BOX_H),
        session.next.as_ref(),
        theme,
    );
}

fn draw_stat_box(
    frame: &mut Frame,
    rect: Rect,
    label: &str,
    value: &str,
    theme: &Theme,
    value_color: Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(label, Style::default().fg(theme.title).bold()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(value_color).bold(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), rect);
}

/// The board, top row first. The falling piece is overlaid by
/// `Session::cell_view`; nothing here keeps its own copy of piece state.
fn draw_playfield(frame: &mut Frame, rect: Rect, session: &Session, theme: &Theme) {
    let mut lines = Vec::with_capacity(HEIGHT);
    for row in (0..HEIGHT).rev() {
        let mut spans = Vec::with_capacity(WIDTH);
        for col in 0..WIDTH {
            spans.push(match session.cell_view(row, col) {
                CellView::Empty => Span::styled(" ·", Style::default().fg(theme.bg)),
                CellView::Settled(crate::playfield::Tone::Pale) => {
                    Span::styled("▒▒", Style::default().fg(theme.settled))
                }
                CellView::Settled(crate::playfield::Tone::Azure) => {
                    Span::styled("▒▒", Style::default().fg(theme.settled_alt))
                }
                CellView::Falling(color) => Span::styled(
                    "▓▓",
                    Style::default().fg(theme.piece_color(color)).bold(),
                ),
            });
        }
        lines.push(Line::from(spans));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            status_label(session.status),
            Style::default().fg(theme.title),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// 4x4 preview of the next piece, window top row first.
fn draw_next_box(frame: &mut Frame, rect: Rect, next: Option<&Piece>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled("NEXT", Style::default().fg(theme.title).bold()));
    let mut lines = vec![Line::from("")];
    for ty in (0..4).rev() {
        let mut spans = Vec::with_capacity(4);
        for tx in 0..4 {
            let filled = next.is_some_and(|p| p.tile & (1 << (ty * 4 + (3 - tx))) != 0);
            spans.push(match (filled, next) {
                (true, Some(p)) => Span::styled(
                    "▓▓",
                    Style::default().fg(theme.piece_color(p.color)).bold(),
                ),
                _ => Span::styled(" ·", Style::default().fg(theme.bg)),
            });
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), rect);
}

fn draw_over(frame: &mut Frame, theme: &Theme, area: Rect) {
    let mut lines: Vec<Line> = (0..10)
        .map(|row| {
            Line::from(Span::styled(
                glyph_row(&GRIN, row),
                Style::default().fg(theme.pieces[0]).bold(),
            ))
        })
        .collect();
    lines.push(Line::from(""));
    let text = Style::default().fg(theme.main_fg).bold();
    lines.push(Line::from("You did perfect!").style(text));
    lines.push(Line::from("The compiler wishes you").style(text));
    lines.push(Line::from("0 warning(s), 0 error(s).").style(text));
    lines.push(Line::from(""));
    lines.push(Line::from("Any key to leave ...").style(Style::default().fg(theme.title)));

    let rect = centered(area, 40, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_bonus(frame: &mut Frame, theme: &Theme, area: Rect) {
    let mut lines: Vec<Line> = (0..8)
        .map(|row| {
            Line::from(Span::styled(
                glyph_row(&HEART, row),
                Style::default().fg(theme.pieces[0]).bold(),
            ))
        })
        .collect();
    lines.push(Line::from(""));

    let digits: [(&[&str], Color); 4] = [
        (&DIGIT_1, theme.pieces[1]),
        (&DIGIT_0, theme.pieces[2]),
        (&DIGIT_2, theme.pieces[5]),
        (&DIGIT_4, theme.pieces[4]),
    ];
    for row in 0..7 {
        let mut spans = Vec::new();
        for (glyph, color) in digits {
            spans.push(Span::styled(glyph_row(glyph, row), Style::default().fg(color).bold()));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from("Romanticism of programmers")
            .style(Style::default().fg(theme.title).bold()),
    );
    lines.push(Line::from("Any key to leave ...").style(Style::default().fg(theme.main_fg)));

    let rect = centered(area, 40, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_farewell(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from("The stack is empty,").style(text),
        Line::from("the rows are clear,").style(text),
        Line::from("the terminal is yours again.").style(text),
        Line::from(""),
        Line::from("GOODBYE ...").style(Style::default().fg(theme.pieces[5]).bold()),
    ];
    let rect = centered(area, 40, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

/// Playfield box title.
fn status_label(status: Status) -> &'static str {
    match status {
        Status::Preparing => "get ready",
        Status::Playing => "playing",
        Status::Over => "game over",
        Status::BonusEnding => "1024!",
    }
}
