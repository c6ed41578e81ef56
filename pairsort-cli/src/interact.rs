/// Terminal interaction: present one pair, read one decision.
use pairsort_core::{ComparisonPair, Item};
use std::io::{self, BufRead, Write};

/// What the user asked for at a comparison prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Left,
    Right,
    Undo,
    Quit,
}

/// Map one line of input to a choice. Empty input re-prompts (None).
pub fn parse_choice(line: &str) -> Option<Choice> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "l" => Some(Choice::Left),
        "2" | "r" => Some(Choice::Right),
        "u" | "undo" => Some(Choice::Undo),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

pub fn describe(item: &Item) -> String {
    match &item.detail {
        Some(detail) => format!("{} — {}", item.name, detail),
        None => item.name.clone(),
    }
}

/// Show the pair and block until the user picks a side (or undo/quit).
/// EOF on stdin behaves like quit: the session is already on disk.
pub fn prompt_choice(pair: &ComparisonPair, asked: usize, bound: usize) -> Choice {
    println!();
    println!("Which do you prefer?  (comparison {} of at most {})", asked + 1, bound);
    println!("  1) {}", describe(&pair.left));
    println!("  2) {}", describe(&pair.right));

    let stdin = io::stdin();
    loop {
        print!("1/2 (u = undo, q = quit): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return Choice::Quit,
            Ok(_) => {}
        }
        if let Some(choice) = parse_choice(&line) {
            return choice;
        }
        println!("Please answer 1, 2, u, or q.");
    }
}
