use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Select};
use dotenvy::dotenv;
use meritboard::cli::{add_person, clear_seeded_people, seed_people};
use meritboard::modules::people::model::PersonIdentity;

#[derive(Parser)]
#[command(name = "meritboard-cli")]
#[command(about = "Meritboard CLI - Administrative tools for Meritboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a single person to the roster
    AddPerson {
        /// Externally assigned roster id
        #[arg(short = 'i', long)]
        id: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Membership stage: applicant, activist, or member
        #[arg(long)]
        identity: Option<String>,
    },
    /// Seed the roster with fake people
    Seed {
        /// Number of people to create
        #[arg(short = 'p', long, default_value = "50")]
        people: usize,
    },
    /// Clear all seeded people (keeps hand-entered ones)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::AddPerson { id, name, identity } => {
            handle_add_person(&pool, id, name, identity).await
        }
        Commands::Seed { people } => handle_seed(&pool, people).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

const IDENTITY_CHOICES: [&str; 3] = ["applicant", "activist", "member"];

fn parse_identity(value: &str) -> Option<PersonIdentity> {
    match value {
        "applicant" => Some(PersonIdentity::Applicant),
        "activist" => Some(PersonIdentity::Activist),
        "member" => Some(PersonIdentity::Member),
        _ => None,
    }
}

async fn handle_add_person(
    pool: &sqlx::postgres::PgPool,
    id: Option<String>,
    name: Option<String>,
    identity: Option<String>,
) {
    let id = id.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Roster id")
            .interact_text()
            .expect("Failed to read roster id")
    });

    let name = name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Display name")
            .interact_text()
            .expect("Failed to read display name")
    });

    let identity = match identity {
        Some(value) => parse_identity(&value).unwrap_or_else(|| {
            eprintln!(
                "❌ Invalid identity '{}'. Expected one of: {}",
                value,
                IDENTITY_CHOICES.join(", ")
            );
            std::process::exit(1);
        }),
        None => {
            let selection = Select::new()
                .with_prompt("Membership stage")
                .items(&IDENTITY_CHOICES)
                .default(0)
                .interact()
                .expect("Failed to read membership stage");
            parse_identity(IDENTITY_CHOICES[selection]).unwrap()
        }
    };

    match add_person(pool, &id, &name, identity).await {
        Ok(_) => {
            println!("\n✅ Person added to the roster!");
            println!("   Id: {}", id);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error adding person: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, people: usize) {
    match seed_people(pool, people).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n❌ Error seeding roster: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    let confirmed = Confirm::new()
        .with_prompt("Delete every seeded person and their score history?")
        .default(false)
        .interact()
        .expect("Failed to read confirmation");

    if !confirmed {
        println!("Aborted.");
        return;
    }

    match clear_seeded_people(pool).await {
        Ok(removed) => println!("✅ Removed {} seeded people", removed),
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded people: {}", e);
            std::process::exit(1);
        }
    }
}
