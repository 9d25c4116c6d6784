use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::ValueEnum;
use rental_assistant::chat::{ChatSession, ChatState, HttpSearchClient, SearchBackend, SubmitOutcome};
use rental_assistant::config::Config;
use rental_assistant::models::{Attachment, ChatMessage, Sender};
use rental_assistant::pricing::{
    AcChoice, BedChoice, BookingSummary, FloorTier, Orientation, Parking, Step, UpsellWizard,
};
use rental_assistant::render;
use tokio::sync::watch;
use tracing::debug;

use super::{ask, stdin_lines, Input};

const HELP: &str = "Commandes : /book N réserver le N-ième logement, /recap récapitulatif, \
/history historique, /clear recommencer, /quit quitter. Un numéro choisit une réponse rapide, \
Ctrl-C interrompt la réponse en cours.";

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Empty,
    Quit,
    Help,
    Clear,
    History,
    Recap,
    Book(usize),
    Number(usize),
    Text(String),
    Unknown(String),
}

fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return Line::Number(n);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Line::Text(line.to_string());
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("quit"), None) => Line::Quit,
        (Some("help"), None) => Line::Help,
        (Some("clear"), None) => Line::Clear,
        (Some("history"), None) => Line::History,
        (Some("recap"), None) => Line::Recap,
        (Some("book"), Some(n)) => match n.parse() {
            Ok(n) if words.next().is_none() => Line::Book(n),
            _ => Line::Unknown(line.to_string()),
        },
        _ => Line::Unknown(line.to_string()),
    }
}

pub async fn run(config: &Config, search_type: Option<String>) -> Result<ExitCode> {
    let chat_config = config.chat(search_type);
    let backend = HttpSearchClient::new(&chat_config, config.timeout)?;
    debug!("Chatting with {}", backend.endpoint());

    let session = ChatSession::new(backend, &chat_config);
    let mut updates = session.subscribe();
    let mut echo = Echo::default();
    echo.show(&updates.borrow_and_update());
    println!("\n{}", HELP);

    let mut lines = stdin_lines();
    loop {
        let Some(line) = ask(&mut lines, "\n>").await? else {
            break;
        };

        match parse_line(&line) {
            Line::Empty => {}
            Line::Quit => break,
            Line::Help => println!("{}", HELP),
            Line::Clear => {
                session.clear();
                echo.show(&updates.borrow_and_update());
            }
            Line::History => {
                for message in session.snapshot().messages {
                    println!("{}\n", render::render_message(&message));
                }
            }
            Line::Recap => match session.booking() {
                Some(summary) => println!("{}", render::render_booking_summary(&summary)),
                None => println!("Aucune réservation en cours."),
            },
            Line::Book(n) => {
                let apartments = session.latest_apartments();
                let Some(apartment) = n.checked_sub(1).and_then(|i| apartments.get(i)) else {
                    println!("Aucun logement n°{} dans la dernière liste.", n);
                    continue;
                };
                let Some(wizard) = session.open_upsell(&apartment.id) else {
                    continue;
                };
                if let Some(summary) = configure(wizard, &mut lines).await? {
                    session.confirm_booking(summary);
                    if let Some(summary) = session.booking() {
                        println!("\n{}", render::render_booking_summary(&summary));
                    }
                }
            }
            Line::Number(n) => {
                let state = session.snapshot();
                let reply = state
                    .messages
                    .last()
                    .and_then(|message| n.checked_sub(1).and_then(|i| message.quick_replies().get(i)))
                    .cloned();
                let outcome = match reply {
                    Some(reply) => {
                        follow(&session, session.submit_quick_reply(&reply), &mut updates, &mut echo)
                            .await
                    }
                    None => follow(&session, session.submit(&line), &mut updates, &mut echo).await,
                };
                debug!("{:?}", outcome);
            }
            Line::Text(text) => {
                session.set_input(text);
                let outcome =
                    follow(&session, session.submit_input(), &mut updates, &mut echo).await;
                debug!("{:?}", outcome);
            }
            Line::Unknown(command) => println!("Commande inconnue : {}. {}", command, HELP),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Drive one exchange, echoing every state change; Ctrl-C stops the reveal
async fn follow<B, F>(
    session: &ChatSession<B>,
    submit: F,
    updates: &mut watch::Receiver<ChatState>,
    echo: &mut Echo,
) -> SubmitOutcome
where
    B: SearchBackend,
    F: Future<Output = SubmitOutcome>,
{
    tokio::pin!(submit);
    let outcome = loop {
        let changed = tokio::select! {
            outcome = &mut submit => break outcome,
            changed = updates.changed() => changed.is_ok(),
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                false
            }
        };
        if changed {
            echo.show(&updates.borrow_and_update());
        }
    };
    echo.show(&updates.borrow_and_update());
    outcome
}

/// Prints the conversation incrementally: new text as it is revealed, then
/// the cards once they are attached
#[derive(Default)]
struct Echo {
    printed: HashMap<String, usize>,
    closed: HashSet<String>,
    attached: HashSet<String>,
}

impl Echo {
    fn show(&mut self, state: &ChatState) {
        for message in &state.messages {
            if message.sender == Sender::Assistant {
                self.update(message);
            }
        }
    }

    fn update(&mut self, message: &ChatMessage) {
        if self.attached.contains(&message.id) {
            return;
        }

        if !self.closed.contains(&message.id) {
            let printed = match self.printed.get(&message.id) {
                Some(printed) => *printed,
                None => {
                    println!("\nSarah · {}", render::format_time(&message.timestamp));
                    0
                }
            };
            let total = message.content.chars().count();
            if total > printed {
                let fresh: String = message.content.chars().skip(printed).collect();
                print!("{}", fresh);
                let _ = std::io::stdout().flush();
            }
            self.printed.insert(message.id.clone(), total.max(printed));

            if message.streaming {
                return;
            }
            println!();
            self.closed.insert(message.id.clone());
        }

        match &message.attachment {
            Some(Attachment::Apartments(apartments)) => {
                println!();
                for (i, apartment) in apartments.iter().enumerate() {
                    println!("{}", render::render_apartment_card(i + 1, apartment));
                }
                println!("Tapez /book N pour personnaliser et réserver un logement.");
            }
            Some(Attachment::QuickReplies(replies)) => {
                println!("\n{}", render::render_quick_replies(replies));
            }
            None => return,
        }
        self.attached.insert(message.id.clone());
    }
}

/// Walk the customer through both configurator steps
async fn configure(mut wizard: UpsellWizard, lines: &mut Input) -> Result<Option<BookingSummary>> {
    println!(
        "\nPersonnalisez votre {} à {}",
        wizard.typology().display_name(),
        wizard.typology().city
    );

    loop {
        println!("\n{}", render::render_quote(&wizard.quote()));
        match wizard.step() {
            Step::Apartment => {
                let Some(floor) =
                    choose::<FloorTier>(lines, "Étage souhaité (préférence)", wizard.options().floor)
                        .await?
                else {
                    return Ok(None);
                };
                wizard.set_floor(floor);
                let Some(orientation) =
                    choose::<Orientation>(lines, "Orientation (préférence)", wizard.options().orientation)
                        .await?
                else {
                    return Ok(None);
                };
                wizard.set_orientation(orientation);
                let Some(bed) = choose::<BedChoice>(lines, "Lit", wizard.options().bed).await?
                else {
                    return Ok(None);
                };
                wizard.set_bed(bed);
                let Some(ac) = choose::<AcChoice>(lines, "Climatisation", wizard.options().ac).await?
                else {
                    return Ok(None);
                };
                wizard.set_ac(ac);
                wizard.next();
            }
            Step::Services => {
                print_services(&wizard);
                let Some(answer) = ask(
                    lines,
                    "Option (tv, linge, interieur, exterieur), retour, valider ou annuler :",
                )
                .await?
                else {
                    return Ok(None);
                };
                let result = match answer.to_lowercase().as_str() {
                    "tv" => wizard.toggle_tv(),
                    "linge" => wizard.toggle_linen_pack(),
                    "interieur" => wizard.toggle_parking(Parking::Indoor),
                    "exterieur" => wizard.toggle_parking(Parking::Outdoor),
                    "retour" => {
                        wizard.previous();
                        Ok(())
                    }
                    "valider" => return Ok(Some(wizard.validate())),
                    "annuler" => return Ok(None),
                    other => {
                        println!("Choix inconnu : {}", other);
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    println!("⚠️  {}", e);
                }
            }
        }
    }
}

fn print_services(wizard: &UpsellWizard) {
    let services = wizard.services();
    let mark = |on: bool| if on { "[x]" } else { "[ ]" };
    let parking = |kind: Parking, on: bool| {
        if wizard.parking_enabled(kind) {
            mark(on).to_string()
        } else {
            "[-] (indisponible)".to_string()
        }
    };

    println!("  {} tv        Télévision", mark(services.tv));
    println!("  {} linge     Pack linge", mark(services.linen_pack));
    println!(
        "  {} interieur Parking sous-sol",
        parking(Parking::Indoor, services.parking_indoor())
    );
    println!(
        "  {} exterieur Parking extérieur",
        parking(Parking::Outdoor, services.parking_outdoor())
    );
}

/// Ask for one of the values of `T`; an empty answer keeps `current`
async fn choose<T: ValueEnum + Copy>(lines: &mut Input, label: &str, current: T) -> Result<Option<T>> {
    let name = |value: &T| {
        value
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    };
    let names: Vec<String> = T::value_variants().iter().map(name).collect();
    let question = format!("{} [{}] ({}) :", label, names.join("/"), name(&current));

    loop {
        let Some(answer) = ask(lines, &question).await? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(current));
        }
        match T::from_str(&answer, true) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("{}", e),
        }
    }
}
