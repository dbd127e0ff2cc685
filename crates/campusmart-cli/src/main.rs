use campusmart_cli::admin::create_admin;
use campusmart_cli::seeder::{self, ContentPerStudent, SeedConfig};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "campusmart-cli")]
#[command(about = "Campusmart CLI - Administrative tools for Campusmart", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Display name of the admin
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with demo students and marketplace content
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "20")]
        students: usize,

        /// Listings per student
        #[arg(long, default_value = "3")]
        listings: usize,

        /// Borrow requests per student
        #[arg(long, default_value = "1")]
        borrow_requests: usize,

        /// Night market posts per student
        #[arg(long, default_value = "1")]
        night_market_posts: usize,
    },
    /// Remove all seeded data (hard delete)
    Clear,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pool = campusmart_db::init_db_pool().await?;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            students,
            listings,
            borrow_requests,
            night_market_posts,
        } => {
            campusmart_db::run_migrations(&pool).await?;
            let config = SeedConfig::new(students).with_content(ContentPerStudent {
                listings,
                borrow_requests,
                night_market_posts,
            });
            seeder::seed_all(&pool, config).await
        }
        Commands::Clear => seeder::clear_all(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let admin = create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", admin.email);
    println!("   Name: {}", admin.display_name());
    Ok(())
}
