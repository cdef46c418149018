//! prepexam - timed multi-subject practice exams in the terminal.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prepexam::auth::CachedUser;
use prepexam::cli::commands::HELP;
use prepexam::cli::{
    parse_args, parse_command, version_line, CliCommand, CommandError, RunOptions, SessionCommand,
    USAGE,
};
use prepexam::cli_output::{icons, outcome_message, progress_lines, question_screen};
use prepexam::error::SyncError;
use prepexam::selection::ExamLimits;
use prepexam::session::{SessionDriver, SessionEngine, SessionOutcome, SessionStatus};
use prepexam::startup::{
    ensure_signed_in, AppContext, ClientConfig, LoginInput, LoginPrompt, SignIn,
};

/// Reads the email from stdin and the password without echo.
struct TerminalPrompt;

impl LoginPrompt for TerminalPrompt {
    fn ask(&mut self, attempt: u32, previous: Option<&SyncError>) -> Option<LoginInput> {
        match previous {
            Some(err) => eprintln!("{} {}", icons::FAILURE, err.user_message()),
            None if attempt == 1 => println!("Sign in to continue."),
            None => {}
        }

        print!("Email: ");
        io::stdout().flush().ok();
        let mut email = String::new();
        match io::stdin().read_line(&mut email) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let email = email.trim().to_string();
        if email.is_empty() {
            return None;
        }

        let password = rpassword::prompt_password("Password: ").ok()?;
        Some(LoginInput { email, password })
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prepexam=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args())?;
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    init_tracing();

    let config = ClientConfig::from_env().wrap_err("Invalid configuration")?;
    let ctx = AppContext::from_config(config)?;

    match command {
        CliCommand::Logout => {
            ctx.auth.logout().await;
            println!("{} Signed out", icons::SUCCESS);
            Ok(())
        }
        CliCommand::Run(options) => run(ctx, options).await,
        CliCommand::Version | CliCommand::Help => Ok(()),
    }
}

async fn run(ctx: AppContext, options: RunOptions) -> Result<()> {
    let session_lost = Arc::new(Notify::new());
    let notify = Arc::clone(&session_lost);
    let handler = ctx.logout.register(move |reason| {
        tracing::warn!("Signed out: {}", reason);
        notify.notify_one();
    });

    let result = sign_in_and_take_exam(&ctx, options, &session_lost).await;
    ctx.logout.unregister(handler);
    result
}

async fn sign_in_and_take_exam(
    ctx: &AppContext,
    options: RunOptions,
    session_lost: &Notify,
) -> Result<()> {
    match ensure_signed_in(&ctx.auth, &mut TerminalPrompt).await? {
        SignIn::Restored(user) => greet(user.as_ref()),
        SignIn::LoggedIn(user) => greet(Some(&user)),
        SignIn::Cancelled => {
            println!("Sign-in cancelled.");
            return Ok(());
        }
    }

    if options.subjects.is_empty() {
        return Err(eyre!(
            "No subjects given; add at least one --subject NAME[:COUNT]\n\n{}",
            USAGE
        ));
    }
    let config = options.to_selection(ExamLimits::default()).validate()?;

    println!("Starting exam...");
    let attempt = ctx.exams.start_attempt(&config).await?;
    let engine = SessionEngine::from_attempt(attempt, &config)?;
    let driver = SessionDriver::start(engine, ctx.exams.clone(), ctx.config.tick);

    exam_loop(&driver, session_lost).await
}

fn greet(user: Option<&CachedUser>) {
    match user.and_then(|u| u.name.as_deref()) {
        Some(name) => println!("{} Signed in as {}", icons::SUCCESS, name),
        None => println!("{} Signed in", icons::SUCCESS),
    }
}

fn prompt() {
    print!("> ");
    io::stdout().flush().ok();
}

async fn exam_loop(driver: &SessionDriver, session_lost: &Notify) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut outcomes = driver.subscribe();

    println!("{}\n", HELP);
    println!("{}", question_screen(&*driver.engine().await));

    loop {
        prompt();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nInput closed; leaving without submitting.");
                    return Ok(());
                };
                match parse_command(&line) {
                    Ok(SessionCommand::Quit) => {
                        println!("Leaving without submitting.");
                        return Ok(());
                    }
                    Ok(command) => {
                        if let Some(outcome) = handle_command(driver, command).await? {
                            println!("{}", outcome_message(&outcome));
                            return Ok(());
                        }
                    }
                    Err(CommandError::Empty) => {}
                    Err(e) => eprintln!("{}", e),
                }
            }
            changed = outcomes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let outcome = outcomes.borrow_and_update().clone();
                if let Some(outcome) = outcome {
                    println!("\nTime is up.");
                    println!("{}", outcome_message(&outcome));
                    return Ok(());
                }
            }
            _ = session_lost.notified() => {
                println!("\n{} Your session has expired. Please sign in again.", icons::WARNING);
                return Ok(());
            }
        }
    }
}

async fn handle_command(
    driver: &SessionDriver,
    command: SessionCommand,
) -> Result<Option<SessionOutcome>> {
    match command {
        SessionCommand::Submit => return submit(driver).await,
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Progress => {
            let engine = driver.engine().await;
            println!("{}", progress_lines(&engine.progress()));
        }
        command => {
            let mut engine = driver.engine().await;
            let changed = match command {
                SessionCommand::Answer(index) => engine.select_option(index).map(|_| true),
                SessionCommand::Next => Ok(engine.next_question()),
                SessionCommand::Previous => Ok(engine.previous_question()),
                SessionCommand::Jump(number) => Ok(engine.jump_to_question(number - 1)),
                SessionCommand::Switch(subject) => Ok(engine.switch_subject(&subject)),
                _ => Ok(false),
            };
            match changed {
                Ok(true) => println!("{}", question_screen(&engine)),
                Ok(false) if engine.status() != SessionStatus::Active => {
                    eprintln!("The exam is being submitted; type 'submit' to retry.")
                }
                Ok(false) => eprintln!("Nothing to move to."),
                Err(e) => eprintln!("{}", e),
            }
        }
    }
    Ok(None)
}

async fn submit(driver: &SessionDriver) -> Result<Option<SessionOutcome>> {
    {
        let engine = driver.engine().await;
        let missing = engine.total_questions() - engine.answered_count();
        if missing > 0 && engine.status() == SessionStatus::Active {
            println!("{} {} question(s) unanswered.", icons::WARNING, missing);
        }
    }

    println!("Submitting...");
    match driver.submit().await {
        Ok(outcome) => Ok(Some(outcome)),
        Err(e) if driver.status() == SessionStatus::Submitting => {
            eprintln!("{} {} Type 'submit' to retry.", icons::WARNING, e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
