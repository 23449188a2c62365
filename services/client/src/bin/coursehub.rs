//! services/client/src/bin/coursehub.rs

use client_lib::{
    commands::{self, Command, HELP},
    config::Config,
    error::ClientError,
    session::{state::Services, Session},
    view,
};
use coursehub_core::workflow::Workflow;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting client...");

    // --- 2. Initialize Service Adapters & the Session ---
    let services = Services::from_config(&config)?;
    let mut session = Session::new(services, config.context_shape);

    println!("{}", view::render(session.workflow()));
    println!("{HELP}");

    // --- 3. Event Loop: terminal input and request completions ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed.");
                    break;
                };
                match commands::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Courses)) => {
                        print!("{}", view::render_courses(session.workflow()));
                        continue;
                    }
                    Ok(Some(command)) => run(&mut session, command),
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
            Some(completion) = session.next_completion(), if session.in_flight() > 0 => {
                session.apply(completion);
            }
        }
        println!("{}", view::render(session.workflow()));
    }

    info!("Client stopped.");
    Ok(())
}

fn run(session: &mut Session, command: Command) {
    let outcome = match command {
        Command::Setup(form) => session.try_update(|wf| wf.complete_setup(&form)),
        Command::Show => Ok(()),
        Command::Open(target) => {
            let id = resolve_course(session.workflow(), &target);
            if !session.select_course_by_id(&id) {
                println!("No course '{target}' in the list.");
            }
            Ok(())
        }
        Command::Category(category) => {
            session.update(|wf| wf.select_category(category));
            Ok(())
        }
        Command::Switch => {
            session.update(|wf| {
                wf.open_category_gate();
                Vec::new()
            });
            Ok(())
        }
        Command::Close => {
            session.update(|wf| {
                wf.dismiss_category_gate();
                Vec::new()
            });
            Ok(())
        }
        Command::Back => {
            session.update(Workflow::back_to_courses);
            Ok(())
        }
        Command::Chat => {
            session.update(|wf| {
                wf.toggle_chat();
                Vec::new()
            });
            Ok(())
        }
        Command::Draft(text) => {
            session.update(|wf| {
                wf.set_question(text);
                Vec::new()
            });
            Ok(())
        }
        Command::Ask(question) => session.try_update(|wf| {
            let question = question.unwrap_or_else(|| wf.pending_question().to_string());
            wf.ask(question)
        }),
        Command::Dismiss => {
            session.update(|wf| {
                wf.dismiss_notice();
                Vec::new()
            });
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        // Handled by the event loop.
        Command::Courses | Command::Quit => Ok(()),
    };
    if let Err(e) = outcome {
        warn!("{e}");
    }
}

/// Accepts either a course id or its 1-based position in the list.
fn resolve_course(wf: &Workflow, target: &str) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| wf.courses().get(i))
        .filter(|_| wf.find_course(target).is_none())
        .map(|course| course.id.clone())
        .unwrap_or_else(|| target.to_string())
}
