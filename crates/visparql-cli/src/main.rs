mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use visparql_core::config::DEFAULT_SERVE_PORT;
use visparql_core::graph::classify_node_content;
use visparql_core::{Config, Point, QuerySession};

#[derive(Parser)]
#[command(name = "visparql")]
#[command(about = "Visual SPARQL query builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default configuration
    Config,
    /// Load the ontology and list its facts
    Ontology,
    /// List edge suggestions for a node
    Suggest {
        /// Node content, e.g. `Person` or a full IRI
        class: String,
    },
    /// Start the graph editor server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_SERVE_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
        Commands::Ontology => {
            let config = Config::load()?;
            let mut session = QuerySession::from_config(&config);
            let report = session.load_ontology().await?;

            for fact in session.ontology().facts() {
                println!(
                    "{}  {} -> {}",
                    fact.property.qualified_name(),
                    fact.domain.qualified_name(),
                    fact.range.qualified_name()
                );
            }
            println!("\n{} facts loaded, {} bindings skipped", report.loaded, report.skipped.len());
            for skipped in &report.skipped {
                println!("  skipped: {}", skipped);
            }
        }
        Commands::Suggest { class } => {
            let config = Config::load()?;
            let mut session = QuerySession::from_config(&config);
            session.load_ontology().await?;

            let kind = classify_node_content(&class);
            session.edit(|g| g.create_node(Point::new(0.0, 0.0), kind, class.as_str()));

            if session.suggestions().is_empty() {
                println!("No suggestions for '{}'.", class);
            }
            for suggestion in session.suggestions() {
                println!("  [{}] {}", suggestion.index(), suggestion.label());
            }
        }
        Commands::Serve { port } => {
            let config = Config::load()?;
            serve::start_server(serve::ServeConfig { port, config }).await?;
        }
    }

    Ok(())
}
