#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for the onebox inbox

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use onebox_client::{
    AuthError, ComposeContext, FileStore, Inbox, KeyValueStore, Lead, LocalMirror, OneboxConfig,
    RemoteClient, ReplyDraft, SortOrder, SyncOutcome, TemplateCategory, Thread, ThreadFlow,
    ThreadStatus, TokenStore, complete, complete_login, expand, find_template, login_url,
    templates_in, unresolved,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_REDIRECT: &str = "http://localhost:3000/google-login";

#[derive(Parser)]
#[command(name = "onebox-cli")]
#[command(about = "Command-line onebox client with offline fallback")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Log in through Google and store the credential
    Login {
        /// Redirect URL received after login (read from stdin if omitted)
        #[arg(long)]
        callback: Option<String>,

        /// Where the API should redirect after login
        #[arg(long, default_value = DEFAULT_REDIRECT)]
        redirect_to: String,
    },

    /// Forget the stored credential
    Logout,

    /// Show login state and configuration
    Status,

    /// List threads
    List {
        /// Only threads whose subject or sender contains this text
        #[arg(long, default_value = "")]
        query: String,

        /// Sort order: newest or oldest
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        /// Maximum number of threads to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show a thread with all its messages
    Show {
        /// Thread id
        id: String,
    },

    /// Delete a thread
    Delete {
        /// Thread id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Reply to a thread
    Reply(ReplyArgs),

    /// List reply templates
    Templates {
        /// Only templates in this category (follow-up, meeting, pricing, demo)
        #[arg(long)]
        category: Option<TemplateCategory>,
    },
}

#[derive(clap::Args)]
struct ReplyArgs {
    /// Thread id
    id: String,

    /// Reply text, placed before the template when both are given
    #[arg(long, required_unless_present = "template")]
    body: Option<String>,

    /// Template id (see `onebox-cli templates`)
    #[arg(long)]
    template: Option<String>,

    /// Value for {{DATE}}
    #[arg(long)]
    date: Option<String>,

    /// Value for {{TIME}}
    #[arg(long)]
    time: Option<String>,

    /// Finish the last phrase of --body with its suggested completion
    #[arg(long)]
    complete: bool,

    /// Sender address (default: the thread's recipient)
    #[arg(long)]
    from: Option<String>,

    /// Recipient address (default: the thread's sender)
    #[arg(long)]
    to: Option<String>,

    /// Subject (default: the thread's subject)
    #[arg(long)]
    subject: Option<String>,
}

struct App {
    config: OneboxConfig,
    tokens: TokenStore,
    inbox: Inbox,
}

impl App {
    fn open(config: OneboxConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(&config.state_dir)
                .with_context(|| format!("opening {}", config.state_dir.display()))?,
        );
        let tokens = TokenStore::new(store.clone());
        let remote = RemoteClient::new(config.api_base.clone(), tokens.clone());
        let inbox = Inbox::new(remote, LocalMirror::new(store), config.list_fallback);
        Ok(Self {
            config,
            tokens,
            inbox,
        })
    }

    async fn loaded_inbox(&mut self) -> anyhow::Result<&mut Inbox> {
        if self.tokens.ensure_authenticated().is_err() {
            bail!("Not logged in; run `onebox-cli login` first");
        }
        self.inbox.load().await?;
        Ok(&mut self.inbox)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = OneboxConfig::from_env()?;
    let mut app = App::open(config)?;

    match &args.command {
        Command::Login {
            callback,
            redirect_to,
        } => {
            cmd_login(&app, callback.clone(), redirect_to).await?;
        }
        Command::Logout => {
            app.tokens.clear_token()?;
            println!("Logged out.");
        }
        Command::Status => {
            cmd_status(&app, &args)?;
        }
        Command::List { query, sort, limit } => {
            cmd_list(&mut app, &args, query, *sort, *limit).await?;
        }
        Command::Show { id } => {
            cmd_show(&mut app, &args, id).await?;
        }
        Command::Delete { id, yes } => {
            cmd_delete(&mut app, &args, id, *yes).await?;
        }
        Command::Reply(reply) => {
            cmd_reply(&mut app, &args, reply).await?;
        }
        Command::Templates { category } => {
            cmd_templates(&args, *category)?;
        }
    }

    Ok(())
}

async fn cmd_login(
    app: &App,
    callback: Option<String>,
    redirect_to: &str,
) -> anyhow::Result<()> {
    let result = if let Some(url) = callback {
        complete_login(&app.tokens, async move { Some(url) }, app.config.login_timeout).await
    } else {
        let url = login_url(&app.config.api_base, redirect_to)?;
        println!("Open this URL in a browser to log in:\n\n  {url}\n");
        println!("Then paste the URL you were redirected to:");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let pasted = async move { lines.next_line().await.ok().flatten() };
        complete_login(&app.tokens, pasted, app.config.login_timeout).await
    };

    match result {
        Ok(_) => {
            println!("Logged in.");
            Ok(())
        }
        Err(e) => report_auth_error(&e),
    }
}

fn report_auth_error(e: &AuthError) -> anyhow::Result<()> {
    eprintln!("Authentication Error");
    eprintln!("{e}");
    bail!("login failed; run `onebox-cli login` to try again")
}

fn cmd_status(app: &App, args: &Args) -> anyhow::Result<()> {
    let logged_in = app.tokens.is_authenticated();

    if args.json {
        let status = serde_json::json!({
            "authenticated": logged_in,
            "api_base": app.config.api_base.as_str(),
            "state_dir": app.config.state_dir,
            "list_fallback": app.config.list_fallback.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "Login:     {}",
            if logged_in { "logged in" } else { "not logged in" }
        );
        println!("API:       {}", app.config.api_base);
        println!("State dir: {}", app.config.state_dir.display());
        println!("Fallback:  {}", app.config.list_fallback);
    }

    Ok(())
}

async fn cmd_list(
    app: &mut App,
    args: &Args,
    query: &str,
    order: SortOrder,
    limit: usize,
) -> anyhow::Result<()> {
    let inbox = app.loaded_inbox().await?;
    let threads = inbox.view(query, order);
    let display: Vec<&Thread> = threads.iter().take(limit).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        print_thread_table(&display);
    }

    Ok(())
}

async fn cmd_show(app: &mut App, args: &Args, id: &str) -> anyhow::Result<()> {
    let inbox = app.loaded_inbox().await?;
    let Some(thread) = inbox.open(id).await else {
        bail!("Thread {id} not found");
    };
    let lead = Lead::for_thread(&thread);

    if args.json {
        let detail = serde_json::json!({ "thread": thread, "lead": lead });
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print_thread_detail(&thread);
        print_lead(&lead);
    }

    Ok(())
}

async fn cmd_delete(app: &mut App, args: &Args, id: &str, yes: bool) -> anyhow::Result<()> {
    let inbox = app.loaded_inbox().await?;
    if inbox.thread(id).is_none() {
        bail!("Thread {id} not found");
    }

    let mut flow = ThreadFlow::new(id);
    flow.request_delete()?;

    if !yes && !confirm(&format!("Delete thread {id}? [y/N] ")).await? {
        flow.cancel_delete()?;
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = flow.confirm_delete(inbox).await?;
    report_outcome(args, id, "Email deleted successfully.", &outcome)
}

/// Body text from `--body`, `--complete` and `--template`, with every
/// placeholder filled in.
fn reply_body(reply: &ReplyArgs, thread: &Thread) -> anyhow::Result<String> {
    let mut parts = Vec::new();
    if let Some(body) = &reply.body {
        parts.push(if reply.complete {
            complete(body)
        } else {
            body.clone()
        });
    }
    if let Some(id) = &reply.template {
        parts.push(find_template(id)?.content.to_string());
    }

    let mut context = ComposeContext::for_lead(&Lead::for_thread(thread));
    context.date.clone_from(&reply.date);
    context.time.clone_from(&reply.time);

    let text = expand(&parts.join("\n\n"), &context);
    let missing = unresolved(&text);
    if !missing.is_empty() {
        bail!(
            "Unfilled placeholders in reply: {} (use --date and --time)",
            missing.join(", ")
        );
    }
    Ok(text)
}

async fn cmd_reply(app: &mut App, args: &Args, reply: &ReplyArgs) -> anyhow::Result<()> {
    let id = reply.id.as_str();
    let inbox = app.loaded_inbox().await?;
    let Some(thread) = inbox.thread(id) else {
        bail!("Thread {id} not found");
    };

    let mut draft = ReplyDraft::for_thread(thread, reply_body(reply, thread)?);
    if let Some(from) = &reply.from {
        draft.from.clone_from(from);
    }
    if let Some(to) = &reply.to {
        draft.to.clone_from(to);
    }
    if let Some(subject) = &reply.subject {
        draft.subject.clone_from(subject);
    }

    let mut flow = ThreadFlow::new(id);
    flow.begin_reply()?;
    let (message, outcome) = flow.send_reply(inbox, draft).await?;

    if args.json {
        let result = serde_json::json!({ "message": message, "outcome": outcome });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return ensure_applied(&outcome);
    }

    println!("Message: {}", message.id);
    report_outcome(args, id, "Reply sent successfully.", &outcome)
}

fn cmd_templates(args: &Args, category: Option<TemplateCategory>) -> anyhow::Result<()> {
    let templates = templates_in(category);

    if args.json {
        let list: Vec<serde_json::Value> = templates
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "category": t.category.as_str(),
                    "content": t.content,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for template in templates {
        println!(
            "{:<3} {:<22} {:<10} {}",
            template.id,
            template.title,
            template.category.as_str(),
            truncate(template.content, 50)
        );
    }
    Ok(())
}

fn report_outcome(
    args: &Args,
    id: &str,
    success: &str,
    outcome: &SyncOutcome,
) -> anyhow::Result<()> {
    if args.json {
        let result = serde_json::json!({ "id": id, "outcome": outcome });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return ensure_applied(outcome);
    }

    match outcome {
        SyncOutcome::ConfirmedRemote => println!("{success}"),
        SyncOutcome::AppliedLocalOnly { reason } => {
            println!("{success} (saved locally only; server said: {reason})");
        }
        SyncOutcome::Failed { .. } => {}
    }
    ensure_applied(outcome)
}

fn ensure_applied(outcome: &SyncOutcome) -> anyhow::Result<()> {
    if let SyncOutcome::Failed { reason } = outcome {
        bail!("Could not save the change locally: {reason}");
    }
    Ok(())
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    println!("{prompt}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_thread_table(threads: &[&Thread]) {
    if threads.is_empty() {
        println!("No emails found");
        return;
    }

    let header = format!(
        "{:<6} {:<2} {:<17} {:<30} {}",
        "ID", "", "Date", "From", "Subject"
    );
    println!("{header}");
    println!("{}", "-".repeat(100));

    for thread in threads {
        let marker = match thread.status {
            ThreadStatus::Unread => "*",
            ThreadStatus::Read => "",
        };
        println!(
            "{:<6} {:<2} {:<17} {:<30} {}",
            truncate(&thread.id, 6),
            marker,
            thread.date.format("%Y-%m-%d %H:%M"),
            truncate(&thread.from.to_string(), 28),
            truncate(&thread.subject, 40),
        );
    }

    println!("\n{} thread(s)", threads.len());
}

fn print_thread_detail(thread: &Thread) {
    println!("Thread:  {}", thread.id);
    println!("Subject: {}", thread.subject);
    println!("Status:  {}", thread.status);
    println!(
        "Updated: {}",
        thread.last_activity().format("%Y-%m-%d %H:%M:%S")
    );
    if !thread.labels.is_empty() {
        println!("Labels:  {}", thread.labels.join(", "));
    }

    for message in &thread.messages {
        println!("\n--- {} ---", message.id);
        println!("Date:    {}", message.date.format("%Y-%m-%d %H:%M:%S"));
        println!("From:    {}", message.from);
        println!("To:      {}", message.to);
        if let Some(cc) = message.cc.as_deref().filter(|cc| !cc.is_empty()) {
            println!("CC:      {cc}");
        }
        println!();
        println!("{}", message.body);
    }
}

fn print_lead(lead: &Lead) {
    println!("\n--- Lead ---");
    println!("Name:     {}", lead.name);
    println!("Email:    {}", lead.email);
    println!("Phone:    {}", lead.phone);
    println!("LinkedIn: {}", lead.linkedin);
    println!("Company:  {}", lead.company);
    println!(
        "Campaign: {} (step {}/{}, {} days in sequence)",
        lead.campaign.name,
        lead.campaign.current_step,
        lead.campaign.steps,
        lead.campaign.days_in_sequence
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
