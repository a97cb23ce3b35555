use crate::coordinator::LocalMatch;
use crate::eval::WinningLine;
use crate::game::{Cell, CellPos, Player};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, game: &LocalMatch, selected_column: usize, message: &Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),  // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, game, chunks[0]);
    render_board(frame, game, selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, game: &LocalMatch, area: ratatui::layout::Rect) {
    let opponent = game.opponent_name().unwrap_or("Hot seat");
    let status = format!("{}  |  vs {}", game.status(), opponent);

    let header = Paragraph::new(status)
        .style(
            Style::default()
                .fg(player_color(game.turn()))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(game.variant().name()),
        );

    frame.render_widget(header, area);
}

/// Cells covered by a winning line, walking from one endpoint to the other.
fn line_cells(line: &WinningLine) -> Vec<CellPos> {
    let d_row = (line.end.row as isize - line.start.row as isize).signum();
    let d_col = (line.end.col as isize - line.start.col as isize).signum();
    let mut cells = vec![line.start];
    let mut pos = line.start;
    while pos != line.end {
        pos = CellPos::new(
            (pos.row as isize + d_row) as usize,
            (pos.col as isize + d_col) as usize,
        );
        cells.push(pos);
    }
    cells
}

fn render_board(
    frame: &mut Frame,
    game: &LocalMatch,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let board = game.board();
    let falling = game.in_flight().map(|anim| (CellPos::new(anim.row, anim.column), anim.player));
    let winning = game
        .state()
        .outcome
        .and_then(|outcome| outcome.line().map(line_cells))
        .unwrap_or_default();

    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..board.cols() {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    let rule = "═".repeat(board.cols() * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..board.rows() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..board.cols() {
            let pos = CellPos::new(row, col);
            let span = match (board.get(row, col), falling) {
                (Cell::Empty, Some((at, player))) if at == pos => {
                    Span::styled(" ○ ", Style::default().fg(player_color(player)))
                }
                (Cell::Empty, _) => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                (cell, _) => {
                    let color = match cell {
                        Cell::Red => Color::Red,
                        _ => Color::Yellow,
                    };
                    let mut style = Style::default().fg(color);
                    if winning.contains(&pos) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(" ● ", style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..board.cols() {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let controls = Paragraph::new(Line::from(
        "←/→: Move  |  Enter: Drop  |  R: Restart  |  Q: Quit",
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cells_diagonal() {
        let line = WinningLine {
            start: CellPos::new(2, 3),
            end: CellPos::new(5, 0),
            winner: Player::Red,
        };
        assert_eq!(
            line_cells(&line),
            vec![
                CellPos::new(2, 3),
                CellPos::new(3, 2),
                CellPos::new(4, 1),
                CellPos::new(5, 0)
            ]
        );
    }

    #[test]
    fn test_line_cells_vertical() {
        let line = WinningLine {
            start: CellPos::new(2, 6),
            end: CellPos::new(5, 6),
            winner: Player::Yellow,
        };
        assert_eq!(line_cells(&line).len(), 4);
    }
}
