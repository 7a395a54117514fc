//! Quizstate CLI: quiz-progress HTTP service and record inspection.
//!
//! Usage:
//!   quizstate serve [--bind addr] [--db path | --memory] [--cors-origin origin]...
//!   quizstate show --experience E (--user U | --session S) --chapter C [--quiz Q] [--db path]
//!   quizstate chapters --experience E (--user U | --session S) [--db path]

use clap::{Args, Parser, Subcommand};
use quizstate::config::{DEFAULT_BIND, DEFAULT_LOG_FILTER};
use quizstate::quiz::{quiz_map, quiz_state};
use quizstate::{
    Config, CorsPolicy, Database, Identity, IdentityTuple, QuizId, QuizService, QuizState, StateLookup,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quizstate",
    version,
    about = "Quiz-progress state service"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, env = "QUIZSTATE_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
        #[command(flatten)]
        db: DbArgs,
        /// Allowed CORS origin (repeatable); any origin is mirrored when unset
        #[arg(long = "cors-origin", env = "QUIZSTATE_CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
        /// Tracing filter used when RUST_LOG is unset
        #[arg(long, env = "QUIZSTATE_LOG", default_value = DEFAULT_LOG_FILTER)]
        log: String,
    },
    /// Print a stored chapter record, or one quiz state within it
    Show {
        #[command(flatten)]
        target: ChapterArgs,
        /// Only print this quiz
        #[arg(long)]
        quiz: Option<String>,
        #[command(flatten)]
        db: DbArgs,
    },
    /// List chapters stored for a user or session
    Chapters {
        /// Experience id
        #[arg(long)]
        experience: String,
        #[command(flatten)]
        identity: IdentityArgs,
        #[command(flatten)]
        db: DbArgs,
    },
}

#[derive(Args)]
struct DbArgs {
    /// Path to SQLite database file
    #[arg(long, env = "QUIZSTATE_DB", conflicts_with = "memory")]
    db: Option<PathBuf>,
    /// Keep records in memory only (nothing survives exit)
    #[arg(long)]
    memory: bool,
}

impl DbArgs {
    fn database(&self) -> Database {
        if self.memory {
            Database::Memory
        } else {
            Database::Sqlite(self.db.clone().unwrap_or_else(Config::default_db_path))
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct IdentityArgs {
    /// Authenticated user id
    #[arg(long)]
    user: Option<String>,
    /// Anonymous session id
    #[arg(long)]
    session: Option<String>,
}

impl IdentityArgs {
    fn identity(&self) -> Option<Identity> {
        Identity::from_parts(self.user.as_deref(), self.session.as_deref())
    }
}

#[derive(Args)]
struct ChapterArgs {
    /// Experience id
    #[arg(long)]
    experience: String,
    #[command(flatten)]
    identity: IdentityArgs,
    /// Chapter id
    #[arg(long)]
    chapter: String,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("failed to create tokio runtime: {}", e))
}

fn open_service(database: &Database) -> Result<QuizService, String> {
    let store = database
        .open()
        .map_err(|e| format!("Failed to open database {}: {}", database, e))?;
    Ok(QuizService::new(store))
}

/// One-line description of a stored quiz state
fn summarize(quiz_id: &str, state: &QuizState) -> String {
    match state.report() {
        Ok(report) => {
            let score = report
                .score()
                .map(|(correct, total)| format!(", {}/{} correct", correct, total))
                .unwrap_or_default();
            let status = match &report.completed_at {
                Some(at) => format!("completed at {}", at),
                None => "in progress".to_string(),
            };
            format!("{}: {} answered{}, {}", quiz_id, report.answered(), score, status)
        }
        Err(_) => format!("{}: {} fields (not a quiz report)", quiz_id, state.as_document().len()),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn cmd_serve(config: Config) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let service = match open_service(&config.database) {
            Ok(service) => service,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        tracing::info!(database = %config.database, "chapter store opened");

        let listener = match tokio::net::TcpListener::bind(config.bind).await {
            Ok(listener) => listener,
            Err(e) => {
                eprintln!("Error: cannot bind {}: {}", config.bind, e);
                return 1;
            }
        };

        let app = quizstate::http::router(service, config.cors);
        match quizstate::http::serve(listener, app).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    })
}

fn cmd_show(database: &Database, tuple: IdentityTuple, quiz: Option<String>) -> i32 {
    let result = runtime().and_then(|rt| {
        rt.block_on(async {
            let service = open_service(database)?;
            match quiz {
                Some(quiz_id) => {
                    let lookup = service
                        .quiz_state(&tuple, &QuizId::from(quiz_id.as_str()))
                        .await
                        .map_err(|e| e.to_string())?;
                    match lookup {
                        StateLookup::Found(state) => {
                            print_json(&state)?;
                            println!("{}", summarize(&quiz_id, &state));
                        }
                        StateLookup::NoRecord => println!("No quiz state found"),
                        StateLookup::NoQuiz => println!("No quiz state found for this quiz ID"),
                    }
                }
                None => {
                    let record = service.chapter_record(&tuple).await.map_err(|e| e.to_string())?;
                    match record {
                        Some(record) => {
                            print_json(&record)?;
                            for quiz_id in quiz_map(&record).keys() {
                                if let Some(state) = quiz_state(&record, quiz_id) {
                                    println!("{}", summarize(quiz_id, &state));
                                }
                            }
                        }
                        None => println!("No chapter record found"),
                    }
                }
            }
            Ok::<(), String>(())
        })
    });

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_chapters(database: &Database, experience: &str, identity: &Identity) -> i32 {
    let result = runtime().and_then(|rt| {
        rt.block_on(async {
            let service = open_service(database)?;
            service
                .chapters(experience, identity)
                .await
                .map_err(|e| e.to_string())
        })
    });

    match result {
        Ok(chapters) if chapters.is_empty() => {
            println!("No chapters stored for {}.", identity);
            0
        }
        Ok(chapters) => {
            for chapter in chapters {
                println!("{}", chapter);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn require_identity(args: &IdentityArgs) -> Identity {
    match args.identity() {
        Some(identity) => identity,
        None => {
            eprintln!("Error: --user or --session must be non-empty");
            std::process::exit(2);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Serve { bind, db, cors_origins, log } => {
            init_tracing(&log);
            let config = Config {
                bind,
                database: db.database(),
                cors: CorsPolicy::from_origins(cors_origins),
                log_filter: log,
            };
            cmd_serve(config)
        }
        Commands::Show { target, quiz, db } => {
            init_tracing("warn");
            let identity = require_identity(&target.identity);
            let tuple = IdentityTuple::new(target.experience, identity, target.chapter);
            cmd_show(&db.database(), tuple, quiz)
        }
        Commands::Chapters { experience, identity, db } => {
            init_tracing("warn");
            let identity = require_identity(&identity);
            cmd_chapters(&db.database(), &experience, &identity)
        }
    };
    std::process::exit(code);
}
