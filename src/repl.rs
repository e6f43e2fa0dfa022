// ABOUTME: Interactive chat loop over the bundled ecosystem agents.
// ABOUTME: Supports clearing, dumping, saving, and loading the conversation blackboard.

use std::io::{self, BufRead, Write};
use std::path::Path;

use conclave_agent::{GeneratorConfig, LlmClient, run_turn};
use conclave_core::{Blackboard, MessageRole, persist};

use crate::sim_life;

const MIN_USER_PROMPT_LENGTH: usize = 3;

#[derive(Debug, PartialEq)]
enum ReplCommand<'a> {
    Quit,
    Help,
    Clear,
    Dump,
    List,
    Save(&'a str),
    Load(&'a str),
    Prompt(&'a str),
    TooShort,
}

fn parse_command(input: &str) -> ReplCommand<'_> {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "quit" | "bye" | "exit" | "stop" => return ReplCommand::Quit,
        "help" => return ReplCommand::Help,
        "clear" | "reset" => return ReplCommand::Clear,
        "dump" | "show" => return ReplCommand::Dump,
        "list" => return ReplCommand::List,
        _ => {}
    }
    if let Some(name) = trimmed.strip_prefix("save ") {
        return ReplCommand::Save(name.trim());
    }
    if let Some(name) = trimmed.strip_prefix("load ") {
        return ReplCommand::Load(name.trim());
    }
    if trimmed.len() < MIN_USER_PROMPT_LENGTH {
        ReplCommand::TooShort
    } else {
        ReplCommand::Prompt(trimmed)
    }
}

fn print_help() {
    println!("Commands:");
    println!("  help              show this help");
    println!("  clear | reset     start a fresh conversation");
    println!("  dump | show       print the blackboard as JSON");
    println!("  save <name>       save the conversation");
    println!("  load <name>       load a saved conversation");
    println!("  list              list saved conversations");
    println!("  quit | bye        leave");
    println!("Anything else is sent to the agents.");
}

/// Run one interactive session. Blocks on stdin between turns.
pub async fn run(
    client: &dyn LlmClient,
    config: &GeneratorConfig,
    data_dir: &Path,
) -> anyhow::Result<()> {
    let agents = sim_life::agents();
    let mut board = Blackboard::new_function_call();

    println!(
        "conclave ecosystem chat ({} via {})",
        client.model_name(),
        client.provider_name()
    );
    print_help();

    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help | ReplCommand::TooShort => print_help(),
            ReplCommand::Clear => {
                board.reset_all();
                println!("Conversation cleared.");
            }
            ReplCommand::Dump => println!("{}", serde_json::to_string_pretty(&board)?),
            ReplCommand::List => {
                let names = persist::list_saved(data_dir)?;
                if names.is_empty() {
                    println!("No saved conversations.");
                } else {
                    for name in names {
                        println!("  {name}");
                    }
                }
            }
            ReplCommand::Save(name) => {
                let path = persist::save_blackboard(data_dir, name, &board)?;
                println!("Saved to {}", path.display());
            }
            ReplCommand::Load(name) => match persist::load_blackboard(data_dir, name) {
                Ok(loaded) => {
                    board = loaded;
                    println!("Loaded '{name}'.");
                }
                Err(e) => println!("Could not load '{name}': {e}"),
            },
            ReplCommand::Prompt(prompt) => {
                match run_turn(
                    client,
                    config,
                    &agents,
                    sim_life::CHAT_AGENT_DESCRIPTION,
                    prompt,
                    Some(board.clone()),
                    None,
                )
                .await
                {
                    Ok(updated) => {
                        board = updated;
                        report_turn(&board);
                    }
                    Err(e) => println!("Turn failed: {e}"),
                }
            }
        }
    }

    Ok(())
}

fn report_turn(board: &Blackboard) {
    for message in board.new_messages() {
        if message.role == MessageRole::Assistant {
            println!("Agent: {}", message.message);
        }
    }
    if let Ok(inner) = board.as_function_call() {
        for call in inner.new_function_calls() {
            match serde_json::to_string(call) {
                Ok(json) => println!("  -> {json}"),
                Err(_) => println!("  -> {}", call.function_name),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quit_aliases() {
        for alias in ["quit", "bye", "exit", "stop", "  QUIT  "] {
            assert_eq!(parse_command(alias), ReplCommand::Quit);
        }
    }

    #[test]
    fn parses_state_commands() {
        assert_eq!(parse_command("clear"), ReplCommand::Clear);
        assert_eq!(parse_command("reset"), ReplCommand::Clear);
        assert_eq!(parse_command("dump"), ReplCommand::Dump);
        assert_eq!(parse_command("show"), ReplCommand::Dump);
        assert_eq!(parse_command("save session1"), ReplCommand::Save("session1"));
        assert_eq!(parse_command("load session1"), ReplCommand::Load("session1"));
        assert_eq!(parse_command("list"), ReplCommand::List);
    }

    #[test]
    fn short_inputs_show_help_instead_of_routing() {
        assert_eq!(parse_command("hi"), ReplCommand::TooShort);
        assert_eq!(parse_command("a"), ReplCommand::TooShort);
        assert_eq!(
            parse_command("Add a sheep"),
            ReplCommand::Prompt("Add a sheep")
        );
    }
}
