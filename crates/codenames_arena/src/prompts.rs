//! Prompt construction for spymasters and operatives.

use codenames_rules::{CardCategory, Game, Team};

/// How many history lines a prompt shows.
const HISTORY_WINDOW: usize = 6;

/// What a prompt builder may look at.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// The game being played.
    pub game: &'a Game,
    /// Team being prompted.
    pub team: Team,
    /// Past turn summaries, oldest first.
    pub history: &'a [String],
    /// Why the previous attempt was refused, if it was.
    pub feedback: Option<&'a str>,
}

/// Produces system instructions and per-attempt context text.
pub trait PromptBuilder: Send + Sync {
    /// Standing instructions for `team`'s spymaster.
    fn spymaster_system(&self, team: Team) -> String;
    /// Standing instructions for `team`'s operatives.
    fn operative_system(&self, team: Team) -> String;
    /// The key card from the spymaster's side of the table.
    fn spymaster_context(&self, ctx: &TurnContext<'_>) -> String;
    /// The public board plus the clue being worked on.
    fn operative_context(&self, ctx: &TurnContext<'_>) -> String;
}

/// Plain prompts asking for a single JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPrompts;

fn render_history(history: &[String]) -> String {
    if history.is_empty() {
        return "No previous turns.".to_string();
    }
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let lines: Vec<String> = history[start..].iter().map(|h| format!("- {h}")).collect();
    format!("Recent turns:\n{}", lines.join("\n"))
}

fn listing(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl PromptBuilder for StandardPrompts {
    fn spymaster_system(&self, team: Team) -> String {
        format!(
            "You are the {team} spymaster in Codenames. Give one-word clues that lead your \
             operatives to your team's cards and away from neutral, opponent and assassin cards.\n\
             Reply with ONLY a JSON object:\n\
             {{\"clue\": \"WORD\", \"number\": 2, \"reasoning\": \"one sentence\"}}\n\
             The clue is a single alphabetic word that is not on the board. \
             The number is an integer from 0 to 4."
        )
    }

    fn operative_system(&self, team: Team) -> String {
        format!(
            "You are the {team} operatives in Codenames. Guess the unrevealed cards that match \
             your spymaster's clue, or end the turn when the risk is too high.\n\
             Reply with ONLY a JSON object:\n\
             {{\"action\": \"guess\", \"word\": \"BATTERY\", \"reasoning\": \"one sentence\"}}\n\
             or {{\"action\": \"end\", \"word\": null, \"reasoning\": \"one sentence\"}}\n\
             Use the exact word shown on the board."
        )
    }

    fn spymaster_context(&self, ctx: &TurnContext<'_>) -> String {
        let team = ctx.team;
        let mut hidden = Vec::new();
        let mut found = Vec::new();
        let mut opponent = Vec::new();
        let mut neutral = Vec::new();
        let mut assassin = "?".to_string();

        for (position, card) in ctx.game.board().cells() {
            let label = position.label();
            let word = card.word().to_uppercase();
            let state = if card.is_revealed() { "REVEALED" } else { "HIDDEN" };
            let described = format!("{label} {word} ({state})");
            match card.category() {
                CardCategory::Assassin => assassin = described,
                CardCategory::Agent(owner) if owner == team => {
                    if card.is_revealed() {
                        found.push(described);
                    } else {
                        hidden.push(format!("{label} {word}"));
                    }
                }
                CardCategory::Agent(_) => opponent.push(described),
                CardCategory::Neutral => neutral.push(described),
            }
        }

        let remaining = ctx.game.remaining();
        let mut sections = vec![
            format!("Team {team} unrevealed cards: {}.", listing(&hidden)),
            format!("Team {team} already revealed: {}.", listing(&found)),
            format!("Opponent cards (some may be revealed): {}.", listing(&opponent)),
            format!("Neutral cards (some may be revealed): {}.", listing(&neutral)),
            format!("Assassin word: {assassin}."),
            format!(
                "Remaining cards counts: {team}: {}, {}: {}",
                remaining.get(team),
                team.opponent(),
                remaining.get(team.opponent())
            ),
            render_history(ctx.history),
        ];
        if let Some(feedback) = ctx.feedback {
            sections.push(format!("Feedback: {feedback}"));
        }
        sections.push(
            "Provide a new clue now: a single word not on the board and a number between 0 and 4."
                .to_string(),
        );
        sections.join("\n")
    }

    fn operative_context(&self, ctx: &TurnContext<'_>) -> String {
        let game = ctx.game;
        let team = ctx.team;
        let cells: Vec<String> = game
            .board()
            .cells()
            .map(|(position, card)| {
                let label = position.label();
                let word = card.word().to_uppercase();
                if card.is_revealed() {
                    format!("{label} {word} ({})", card.category())
                } else {
                    format!("{label} {word}")
                }
            })
            .collect();

        let clue = game
            .current_clue()
            .map(|c| format!("{} {}", c.word(), c.number()))
            .unwrap_or_else(|| "None".to_string());
        let remaining = game.remaining();

        let mut sections = vec!["Current board:".to_string()];
        sections.extend(cells.chunks(codenames_rules::BOARD_SIZE).map(|row| row.join(", ")));
        sections.extend([
            format!("Last clue: {clue}"),
            format!("Guesses remaining this turn: {}", game.guesses_left()),
            format!("Team {team} cards still hidden: {}", remaining.get(team)),
            format!("Opponent cards still hidden: {}", remaining.get(team.opponent())),
            render_history(ctx.history),
        ]);
        if let Some(feedback) = ctx.feedback {
            sections.push(format!("Feedback: {feedback}"));
        }
        sections.push(
            "Decide whether to guess or end. If guessing, give the EXACT UPPERCASE WORD as shown on the board."
                .to_string(),
        );
        sections.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_last_six() {
        let history: Vec<String> = (1..=8).map(|i| format!("turn {i}")).collect();
        let rendered = render_history(&history);
        assert!(!rendered.contains("turn 2\n"));
        assert!(rendered.starts_with("Recent turns:\n- turn 3"));
        assert!(rendered.ends_with("- turn 8"));
        assert_eq!(render_history(&[]), "No previous turns.");
    }
}
