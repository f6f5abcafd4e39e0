use std::sync::Arc;

use {
    anyhow::Result,
    clap::{Parser, Subcommand},
    tracing::error,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    helpdesk_config::HelpdeskConfig,
    helpdesk_discord::{SerenityDirectory, bot},
    helpdesk_tickets::{EngineOptions, RoutingTable, TicketEngine},
};

#[derive(Parser)]
#[command(name = "helpdesk", about = "Helpdesk — ticket bot for Discord communities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot and dashboard (default when no subcommand is provided).
    Run,
    /// Validate configuration and print the routing table.
    Doctor,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        Some(Commands::Doctor) => doctor(),
        Some(Commands::Run) | None => run().await,
    }
}

async fn run() -> Result<()> {
    // Missing or malformed required configuration is the only fatal error:
    // the process stops here, before any connection is made.
    let config = HelpdeskConfig::from_env()?;
    let routes = RoutingTable::from_config(config.routing_json.as_deref(), &config.staff_role_id);

    let directory = Arc::new(SerenityDirectory::from_config(&config)?);
    let engine = Arc::new(TicketEngine::new(directory, routes, EngineOptions {
        staff_role_id: config.staff_role_id.clone(),
        ticket_category_id: config.categories.ticket.clone(),
        staff_category_id: config.categories.staff_private.clone(),
        panel_channel_id: config.panel.channel_id.clone(),
        panel_message_id: config.panel.message_id.clone(),
    }));

    let dashboard = config.dashboard.clone();
    tokio::spawn(async move {
        if let Err(e) = helpdesk_web::serve(dashboard).await {
            error!(error = %e, "dashboard stopped");
        }
    });

    bot::run(&config, engine).await
}

fn doctor() -> Result<()> {
    let config = match HelpdeskConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("configuration: FAILED");
            println!("  {e}");
            return Err(e.into());
        },
    };

    println!("configuration: ok");
    println!("  guild:               {}", config.discord.guild_id);
    println!("  default staff role:  {}", config.staff_role_id);
    println!("  panel channel:       {}", config.panel.channel_id);
    println!(
        "  panel message:       {}",
        config.panel.message_id.as_deref().unwrap_or("(none — a fresh panel will be sent)")
    );
    println!(
        "  ticket category:     {}",
        config.categories.ticket.as_deref().unwrap_or("(none)")
    );
    println!(
        "  staff category:      {}",
        config
            .categories
            .staff_private
            .as_deref()
            .unwrap_or("(falls back to ticket category)")
    );
    println!(
        "  dashboard:           {}:{} ({})",
        config.dashboard.bind,
        config.dashboard.port,
        if config.dashboard.credentials.is_some() {
            "basic auth"
        } else {
            "UNAUTHENTICATED"
        }
    );

    match &config.routing_json {
        Some(raw) => match RoutingTable::parse(raw, &config.staff_role_id) {
            Ok(table) => {
                println!("routing: {} route(s)", table.routes().len());
                print_routes(&table);
            },
            Err(e) => {
                println!("routing: INVALID — {e}");
                println!("  the fallback route will be used at runtime:");
                print_routes(&RoutingTable::fallback(&config.staff_role_id));
            },
        },
        None => {
            println!("routing: not configured, using the fallback route");
            print_routes(&RoutingTable::fallback(&config.staff_role_id));
        },
    }

    Ok(())
}

fn print_routes(table: &RoutingTable) {
    for route in table.routes() {
        println!(
            "  {:<12} {:<20} staff role {}",
            route.key, route.label, route.staff_role_id
        );
    }
}
