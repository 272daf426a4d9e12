use clap::{Parser, Subcommand};
use engine::{
    AddPayeeFlow, DisplayRecord, NewPayee, PayIdKind, PayIdResolver, PayeeBook,
    PayeeStore,
};
use server::ServerState;
use settings::{Backend, Settings};

mod seed;
mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "payees", version, about = "PayID payee address book")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the configured backend.
    #[arg(long, value_enum)]
    backend: Option<Backend>,
    /// Override the remote base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every payee sorted by name.
    List,
    /// Print the payees matching QUERY.
    Search { query: String },
    /// Check a PayID against the resolver.
    Validate {
        #[arg(long)]
        kind: PayIdKind,
        pay_id: String,
    },
    /// Validate a PayID, then save it as a new payee.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        kind: PayIdKind,
        pay_id: String,
        /// Confirm the resolved payee details.
        #[arg(long)]
        yes: bool,
    },
    /// Run the REST server over the seed data.
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let mut settings = Settings::new(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    if let Some(base_url) = cli.base_url {
        settings.remote.base_url = base_url;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "payees={level},engine={level},client={level},server={level}",
            level = settings.app.level
        ))
        .init();

    if let Err(err) = run(cli.command, &settings).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, settings: &Settings) -> Result<(), BoxError> {
    match (command, settings.backend) {
        (Command::Serve, _) => serve(settings).await,
        (command, Backend::Mock) => {
            let (store, directory) = load_seed(settings)?;
            let store = store.latency(settings.mock.latency());
            run_command(PayeeBook::new(store, directory), command, settings).await
        }
        (command, Backend::Remote) => {
            tracing::debug!("using remote backend at {}", settings.remote.base_url);
            let client = client::Client::new(&settings.remote.base_url)?;
            run_command(PayeeBook::new(client.clone(), client), command, settings).await
        }
    }
}

fn load_seed(
    settings: &Settings,
) -> Result<(engine::MemoryStore, engine::MemoryDirectory), BoxError> {
    let seed = match &settings.mock.seed {
        Some(path) => seed::Seed::load(path)?,
        None => seed::Seed::default(),
    };
    Ok(seed.into_backend())
}

async fn serve(settings: &Settings) -> Result<(), BoxError> {
    let (store, directory) = load_seed(settings)?;
    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(ServerState::new(store, directory), listener).await?;
    Ok(())
}

async fn run_command<S, R>(
    book: PayeeBook<S, R>,
    command: Command,
    settings: &Settings,
) -> Result<(), BoxError>
where
    S: PayeeStore,
    R: PayIdResolver,
{
    match command {
        Command::List => print_payees(&book.all_payees().await?),
        Command::Search { query } => print_payees(&book.search_payees(&query).await?),
        Command::Validate { kind, pay_id } => {
            let outcome = book.validate_pay_id(&pay_id, kind).await;
            if let Some(payee) = &outcome.payee {
                println!(
                    "{} ({:?}, NPP reachable: {})",
                    payee.owner_name, payee.status, payee.npp_reachable
                );
            }
            if let Some(message) = outcome.message() {
                return Err(message.into());
            }
        }
        Command::Add {
            name,
            nickname,
            kind,
            pay_id,
            yes,
        } => {
            let mut payee = NewPayee::new(&name, &pay_id, kind);
            if let Some(nickname) = &nickname {
                payee = payee.with_nickname(nickname);
            }
            add(&book, payee, yes).await?;
            if let Some(note) = persistence_note(settings.backend, yes) {
                println!("{note}");
            }
        }
        Command::Serve => return serve(settings).await,
    }
    Ok(())
}

async fn add<S, R>(
    book: &PayeeBook<S, R>,
    payee: NewPayee,
    yes: bool,
) -> Result<(), BoxError>
where
    S: PayeeStore,
    R: PayIdResolver,
{
    let mut flow = AddPayeeFlow::new();
    flow.set_name(&payee.name);
    flow.set_nickname(payee.nickname.as_deref().unwrap_or_default());
    flow.set_kind(payee.kind);
    flow.set_pay_id(&payee.pay_id);

    flow.validate(book).await?;
    if let Some(owner) = flow.outcome().and_then(|outcome| outcome.payee.as_ref()) {
        println!("PayID {} belongs to {}", flow.pay_id(), owner.owner_name);
    }
    if !yes {
        println!("Re-run with --yes to add this payee");
        return Ok(());
    }

    flow.confirm(true)?;
    let stored = flow.submit(book).await?;
    println!("Added {} ({})", stored.display_name(), stored.id);
    Ok(())
}

/// Warn that an added payee does not outlive a mock-backed process.
fn persistence_note(backend: Backend, added: bool) -> Option<&'static str> {
    (added && backend == Backend::Mock).then_some(
        "Note: the mock backend keeps payees in memory only; run `payees serve` and use \
         `--backend remote` to keep them",
    )
}

fn print_payees(payees: &[DisplayRecord]) {
    for payee in payees {
        println!(
            "{:<32} {:<28} {}",
            payee.display_name, payee.formatted_pay_id, payee.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use engine::{MemoryDirectory, MemoryStore, PayeeRecord};
    use tokio::time::{Duration, Instant};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn one_shot_search_does_not_wait_for_a_debounce() {
        let book = PayeeBook::new(
            MemoryStore::with_payees(vec![PayeeRecord {
                id: "1".to_string(),
                name: "Alice Brown".to_string(),
                nickname: None,
                pay_id: "alice@x.com".to_string(),
                kind: PayIdKind::Email,
            }]),
            MemoryDirectory::new(),
        );

        let start = Instant::now();
        run_command(
            book,
            Command::Search {
                query: "alice".to_string(),
            },
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn only_mock_adds_get_a_persistence_note() {
        assert!(persistence_note(Backend::Mock, true).is_some());
        assert!(persistence_note(Backend::Mock, false).is_none());
        assert!(persistence_note(Backend::Remote, true).is_none());
    }
}
