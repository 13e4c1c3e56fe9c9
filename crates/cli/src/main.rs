//! Bazaar CLI - storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bazaar products list --query tea
//! bazaar products show 12
//!
//! # Manage the cart
//! bazaar cart add 12 --quantity 2
//! bazaar cart show
//!
//! # Sign in and check a page's guards
//! bazaar auth login -e shopper@example.com -p hunter2hunter2
//! bazaar route /admin
//!
//! # Switch language
//! bazaar locale set en
//! ```
//!
//! # Commands
//!
//! - `products`, `categories` - Browse the catalog
//! - `cart` - Show and change the cart
//! - `auth` - Sign in, register, sign out
//! - `locale` - Show or switch the display language
//! - `admin` - Manage users, categories and products (admins only)
//! - `route` - Evaluate navigation guards for a path
//!
//! Client state (session, cart, language) is kept in
//! `$BAZAAR_STATE_DIR/storage.json` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use bazaar_core::{CategoryId, ProductId, UserId, UserRole};
use bazaar_storefront::AppState;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::storage::{FileStorage, Storage};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List categories
    Categories,
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in, register and sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show or switch the display language
    Locale {
        #[command(subcommand)]
        action: LocaleAction,
    },
    /// Admin panel operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Evaluate navigation guards for a path
    Route {
        /// Path to navigate to, e.g. `/admin?tab=users`
        path: String,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Search query
        #[arg(short, long)]
        query: Option<String>,

        /// Only show products of this category
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the priced cart
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a product's quantity (0 removes it)
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in with a Google ID token
    Google {
        /// ID token issued by Google Identity Services
        id_token: String,
    },
    /// Load the Google sign-in client for the current language
    Identity,
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
}

#[derive(Subcommand)]
enum LocaleAction {
    /// Show the current language
    Show,
    /// Switch language (`ru`, `en`)
    Set {
        /// Language tag
        locale: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List users
    Users,
    /// Change a user's role
    SetRole {
        /// User ID
        id: UserId,

        /// New role (`user`, `admin`)
        role: UserRole,
    },
    /// Delete a user
    DeleteUser {
        /// User ID
        id: UserId,
    },
    /// List categories
    Categories,
    /// Create a category
    CreateCategory {
        /// Category name
        #[arg(short, long)]
        name: String,

        /// URL slug
        #[arg(short, long)]
        slug: String,
    },
    /// Rename a category
    UpdateCategory {
        /// Category ID
        id: CategoryId,

        /// Category name
        #[arg(short, long)]
        name: String,

        /// URL slug
        #[arg(short, long)]
        slug: String,
    },
    /// Delete a category
    DeleteCategory {
        /// Category ID
        id: CategoryId,
    },
    /// List products
    Products,
    /// Create a product
    CreateProduct {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Replace a product
    UpdateProduct {
        /// Product ID
        id: ProductId,

        #[command(flatten)]
        product: ProductArgs,

        /// Existing image URL to keep (repeatable); omit to keep all
        #[arg(long = "keep-image")]
        keep_images: Option<Vec<String>>,
    },
    /// Delete a product
    DeleteProduct {
        /// Product ID
        id: ProductId,
    },
}

#[derive(clap::Args)]
struct ProductArgs {
    /// Product name
    #[arg(short, long)]
    name: String,

    /// Unit price
    #[arg(short, long)]
    price: Decimal,

    /// Category ID
    #[arg(short, long)]
    category: CategoryId,

    /// Description
    #[arg(short, long)]
    description: Option<String>,

    /// Image file to upload (repeatable)
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=info,bazaar_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(config.storage_path())?);
    let state = AppState::new(config, storage)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { query, category } => {
                commands::products::list(&state, query.as_deref(), category).await?;
            }
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
        },
        Commands::Categories => commands::products::categories(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(&state, id, quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&state, id).await?,
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&state, email, password).await?;
            }
            AuthAction::Register {
                email,
                name,
                password,
            } => commands::auth::register(&state, email, name, password).await?,
            AuthAction::Google { id_token } => commands::auth::google(&state, &id_token).await?,
            AuthAction::Identity => commands::auth::identity(&state).await?,
            AuthAction::Logout => commands::auth::logout(&state),
            AuthAction::Whoami => commands::auth::whoami(&state).await,
        },
        Commands::Locale { action } => match action {
            LocaleAction::Show => commands::locale::show(&state),
            LocaleAction::Set { locale } => commands::locale::set(&state, &locale),
        },
        Commands::Admin { action } => run_admin(&state, action).await?,
        Commands::Route { path } => commands::route::evaluate(&state, &path).await,
    }
    Ok(())
}

async fn run_admin(state: &AppState, action: AdminAction) -> Result<(), commands::CommandError> {
    use commands::admin;

    match action {
        AdminAction::Users => admin::users(state).await,
        AdminAction::SetRole { id, role } => admin::set_role(state, id, role).await,
        AdminAction::DeleteUser { id } => admin::delete_user(state, id).await,
        AdminAction::Categories => admin::categories(state).await,
        AdminAction::CreateCategory { name, slug } => {
            admin::create_category(state, name, slug).await
        }
        AdminAction::UpdateCategory { id, name, slug } => {
            admin::update_category(state, id, name, slug).await
        }
        AdminAction::DeleteCategory { id } => admin::delete_category(state, id).await,
        AdminAction::Products => admin::products(state).await,
        AdminAction::CreateProduct { product } => {
            let form = admin::product_form(product.into(), None)?;
            admin::create_product(state, &form).await
        }
        AdminAction::UpdateProduct {
            id,
            product,
            keep_images,
        } => {
            let form = admin::product_form(product.into(), keep_images)?;
            admin::update_product(state, id, &form).await
        }
        AdminAction::DeleteProduct { id } => admin::delete_product(state, id).await,
    }
}

impl From<ProductArgs> for commands::admin::ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            price: args.price,
            category_id: args.category,
            description: args.description,
            images: args.images,
        }
    }
}
