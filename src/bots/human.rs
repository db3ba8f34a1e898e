use std::io::{self, BufRead, Write};

use crate::action::Action;
use crate::bot::Bot;
use crate::card::Color;
use crate::state::GameStateView;
use crate::visualize::{describe_action, render_state};

/// Interactive bot that reads choices from standard input.
///
/// Besides the numbered list it accepts `d` to draw, `u` to call UNO and a
/// color name while a color prompt is open.
pub struct HumanBot {
    name: String,
}

/// Outcome of reading one input line.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Pick(Action),
    Help,
    Quit,
    Invalid(String),
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn parse(input: &str, legal_actions: &[Action]) -> Selection {
        let input = input.trim().to_ascii_lowercase();
        let shortcut = match input.as_str() {
            "q" | "quit" => return Selection::Quit,
            "?" | "help" => return Selection::Help,
            "d" | "draw" => Some(Action::Draw),
            "u" | "uno" => Some(Action::CallUno),
            other => Color::ALL
                .into_iter()
                .find(|color| color.name() == other)
                .map(Action::ChooseColor),
        };
        if let Some(action) = shortcut {
            return if legal_actions.contains(&action) {
                Selection::Pick(action)
            } else {
                Selection::Invalid(format!("'{input}' is not available right now"))
            };
        }
        match input.parse::<usize>() {
            Ok(choice) => legal_actions
                .get(choice)
                .cloned()
                .map(Selection::Pick)
                .unwrap_or_else(|| Selection::Invalid(format!("no action numbered {choice}"))),
            Err(_) => Selection::Invalid(format!("unrecognized input '{input}'")),
        }
    }

    fn prompt(&self, state: &GameStateView, legal_actions: &[Action]) {
        println!("\n=== {} (seat {}) ===", self.name, state.self_player);
        println!("{}", render_state(state));
        for (index, action) in legal_actions.iter().enumerate() {
            println!("  [{index}] {}", describe_action(state, action));
        }
        print!("> ");
        if io::stdout().flush().is_err() {
            eprintln!("failed to flush stdout");
        }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

impl Bot for HumanBot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action {
        if legal_actions.is_empty() {
            return Action::Draw;
        }
        let stdin = io::stdin();
        loop {
            self.prompt(state, legal_actions);
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => {
                    println!("\nInput closed, leaving the game.");
                    std::process::exit(0);
                }
                Ok(_) => {}
                Err(err) => {
                    eprintln!("failed to read input: {err}");
                    continue;
                }
            }
            match Self::parse(&line, legal_actions) {
                Selection::Pick(action) => return action,
                Selection::Help => {
                    println!("Enter an action number, 'd' to draw, 'u' to call UNO,");
                    println!("or a color name when asked for one. Call UNO before");
                    println!("playing down to your last card or you draw two.");
                }
                Selection::Quit => {
                    println!("Exiting game at user's request.");
                    std::process::exit(0);
                }
                Selection::Invalid(reason) => println!("{reason}"),
            }
        }
    }
}
