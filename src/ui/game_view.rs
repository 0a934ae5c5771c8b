use crate::game::{Cell, GameOutcome, Move, Player, COLS, ROWS};
use crate::session::SessionSnapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What one frame shows.
pub(super) struct Screen<'a> {
    pub snapshot: &'a SessionSnapshot,
    /// Computer move still "thinking": drawn as empty.
    pub hidden: Option<Move>,
    pub outcome: Option<GameOutcome>,
    pub selected_column: usize,
    pub message: Option<&'a str>,
}

impl Screen<'_> {
    fn cell(&self, row: usize, col: usize) -> Cell {
        match self.hidden {
            Some(mv) if mv.row == row && mv.column == col => Cell::Empty,
            _ => self.snapshot.game.grid[row][col],
        }
    }

    /// Whose turn it looks like on screen.
    fn to_move(&self) -> Player {
        self.hidden
            .map(|mv| mv.player)
            .unwrap_or(self.snapshot.game.current_player)
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

pub(super) fn render(frame: &mut Frame, screen: &Screen<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Scores
            Constraint::Min(11),   // Board + moves
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(24)])
        .split(chunks[2]);

    render_header(frame, screen, chunks[0]);
    render_scores(frame, screen.snapshot, chunks[1]);
    render_board(frame, screen, body[0]);
    render_moves(frame, screen, body[1]);
    render_message(frame, screen.message, chunks[3]);
    render_controls(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, screen: &Screen<'_>, area: Rect) {
    let game = &screen.snapshot.game;
    let mode = screen.snapshot.opponent.label();

    let (status, color) = match screen.outcome {
        Some(GameOutcome::Winner(player)) => (
            format!("{} wins!  |  {}", game.player_name(player), mode),
            player_color(player),
        ),
        Some(GameOutcome::Draw) => (format!("Draw  |  {}", mode), Color::White),
        None => {
            let player = screen.to_move();
            let verb = if screen.hidden.is_some() {
                "is thinking"
            } else {
                "to move"
            };
            (
                format!("{} {}  |  {}", game.player_name(player), verb, mode),
                player_color(player),
            )
        }
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Power Four"));

    frame.render_widget(header, area);
}

fn render_scores(frame: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let game = &snapshot.game;
    let scores = snapshot.scores;

    let line = Line::from(vec![
        Span::styled(
            game.player_name(Player::Red).to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {} - {}  ", scores.red_wins, scores.yellow_wins)),
        Span::styled(
            game.player_name(Player::Yellow).to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   |   games {}  draws {}",
            scores.games_played,
            scores.draws()
        )),
    ]);

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Score"));
    frame.render_widget(widget, area);
}

fn render_board(frame: &mut Frame, screen: &Screen<'_>, area: Rect) {
    let selected_column = screen.selected_column;
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔═════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let (symbol, color) = match screen.cell(row, col) {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::Red => (" ● ", Color::Red),
                Cell::Yellow => (" ● ", Color::Yellow),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw("║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚═════════════════════╝"));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
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

/// Most recent moves first, as many as fit.
fn render_moves(frame: &mut Frame, screen: &Screen<'_>, area: Rect) {
    let game = &screen.snapshot.game;
    let shown = game.history.len() - usize::from(screen.hidden.is_some());
    let room = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = game.history[..shown]
        .iter()
        .enumerate()
        .rev()
        .take(room)
        .map(|(i, mv)| {
            Line::from(vec![
                Span::raw(format!("{:>2}. ", i + 1)),
                Span::styled(
                    game.player_name(mv.player).to_string(),
                    Style::default().fg(player_color(mv.player)),
                ),
                Span::raw(format!(" → {}", mv.column + 1)),
            ])
        })
        .collect();

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from(
        "←/→: Move  |  Enter or 1-7: Drop  |  N: Next round  |  S: Reset scores  |  Q: Quit",
    );

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
