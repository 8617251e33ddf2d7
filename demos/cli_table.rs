//! Hot-seat table on the terminal.
//!
//! Between rounds: `play <name> <bet>` for a solo round, `join <name> <bet>`
//! and `deal` for a shared one, `balance <name>`, `top`, `reset <name>`, and
//! `quit`. During a round each line is `<name> <action>`
//! where the action is `h`, `s`, `d`, or `p`.

use std::sync::Arc;
use std::time::Duration;

use bjtable::hand::render;
use bjtable::{ChannelInteraction, GuildId, Ledger, LedgerOptions, Prompt, Registry, Round, TableOptions};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{Level, debug};

const GUILD: GuildId = 1;
const SNAPSHOT: &str = "balances.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let ledger = Arc::new(Ledger::open(SNAPSHOT, LedgerOptions::default())?);
    let autosave = ledger.spawn_autosave();
    let options = TableOptions::default().with_action_timeout(Duration::from_secs(30));
    let registry = Arc::new(Registry::new(Arc::clone(&ledger), options));

    println!("Blackjack table (type 'quit' to leave)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["play" | "join", user, bet] => {
                let Ok(bet) = bet.parse::<usize>() else {
                    println!("Bet must be a whole number.");
                    continue;
                };
                let solo = words[0] == "play";
                let table = registry.get_or_create(GUILD);
                let joined = {
                    let mut table = table.lock();
                    if !solo {
                        table.set_multiplayer(true);
                    }
                    table.add_player(user, bet)
                };
                match joined {
                    Ok(joined) => {
                        println!(
                            "{user} joined with ${bet}. Your cards: {} | Balance: ${}",
                            render(&joined.cards),
                            ledger.balance(user)
                        );
                        if !table.lock().is_multiplayer() {
                            play_round(&registry, &mut lines).await?;
                        }
                    }
                    Err(err) => println!("{user}: {err}."),
                }
            }
            ["deal"] => play_round(&registry, &mut lines).await?,
            ["balance", user] => println!("{user} has ${}.", ledger.balance(user)),
            ["top"] => {
                for (rank, (user, record)) in ledger.top(10).iter().enumerate() {
                    println!("{}. {user}: ${}", rank + 1, record.historical_high);
                }
            }
            ["reset", user] => {
                ledger.reset(user);
                println!("{user}'s balance reset to ${}.", ledger.balance(user));
            }
            ["quit" | "q"] => break,
            [] => {}
            _ => println!("Unknown command."),
        }
    }

    autosave.abort();
    ledger.save()?;
    Ok(())
}

async fn play_round(
    registry: &Arc<Registry>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> std::io::Result<()> {
    let (input, inputs) = mpsc::unbounded_channel();
    let (events, mut output) = mpsc::unbounded_channel();

    let round = match Round::begin(
        Arc::clone(registry),
        GUILD,
        ChannelInteraction::new(inputs, events),
    ) {
        Ok(round) => round,
        Err(err) => {
            println!("Cannot deal: {err}.");
            return Ok(());
        }
    };
    let table = registry.get(GUILD);
    let mut handle = round.spawn();
    let mut input = Some(input);
    let mut shown: Option<Prompt> = None;
    let mut ticker = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            Some(event) = output.recv() => println!("{event}"),
            line = lines.next_line(), if input.is_some() => match line? {
                Some(line) => match line.trim().split_once(' ') {
                    Some((user, action)) => {
                        if let Some(input) = &input {
                            if input.send((user.to_owned(), action.to_owned())).is_err() {
                                debug!("round input closed");
                            }
                        }
                    }
                    None => println!("Type `<name> <action>`."),
                },
                // Stdin closed; remaining hands stand.
                None => input = None,
            },
            outcome = &mut handle => {
                while let Ok(event) = output.try_recv() {
                    println!("{event}");
                }
                if let Ok(Ok(result)) = outcome {
                    for player in &result.players {
                        println!("{}: net {:+}", player.user, player.net);
                    }
                }
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let prompt = table.as_ref().and_then(|t| t.lock().prompt());
        if let Some(current) = &prompt {
            if shown.as_ref() != Some(current) {
                print_prompt(current);
            }
        }
        shown = prompt;
    }
}

fn print_prompt(prompt: &Prompt) {
    let mut actions = vec!["[h]it", "[s]tand"];
    if prompt.can_double {
        actions.push("[d]ouble");
    }
    if prompt.can_split {
        actions.push("s[p]lit");
    }
    println!(
        "{}, hand {} of {}: {} ({}) vs dealer {} | {}",
        prompt.user,
        prompt.hand_index + 1,
        prompt.hand_count,
        render(&prompt.cards),
        prompt.value,
        prompt.dealer_up,
        actions.join(" ")
    );
}
