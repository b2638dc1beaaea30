//! oslc — command-line interface for OSLC servers
//!
//! Uses the oslc-client library for discovery, query and link discovery.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use oslc_client::rdf::Namespaces;
use oslc_client::{
    ClientConfig, Document, Domain, IncomingLinkResolver, OslcClient, PropertyValue, QueryParams,
    Resource,
};

#[derive(Parser)]
#[command(name = "oslc", version, about = "OSLC lifecycle server client")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "OSLC_CONFIG")]
    config: Option<String>,

    /// User id
    #[arg(long, short, global = true, env = "OSLC_USER")]
    user: Option<String>,

    /// Password
    #[arg(long, short, global = true, env = "OSLC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Global configuration context URL
    #[arg(long, global = true, env = "OSLC_CONFIGURATION_CONTEXT")]
    configuration_context: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Verbose logging of authentication and link discovery
    #[arg(long, global = true, env = "OSLC_DEBUG")]
    debug: bool,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one resource and print its properties
    Get {
        /// Resource URL
        url: String,
    },
    /// Run an OSLC query through a service provider's query capability
    Query {
        /// Server base URL, e.g. https://jazz.example.com/ccm
        #[arg(long)]
        server: String,

        /// Service provider (project area) title
        #[arg(long)]
        provider: String,

        /// OSLC domain: CM, RM or QM
        #[arg(long, default_value = "CM")]
        domain: Domain,

        /// Resource type IRI of the query capability
        #[arg(long)]
        resource_type: String,

        /// oslc.prefix
        #[arg(long)]
        prefix: Option<String>,

        /// oslc.select
        #[arg(long)]
        select: Option<String>,

        /// oslc.where
        #[arg(long = "where")]
        where_clause: Option<String>,

        /// oslc.orderBy
        #[arg(long)]
        order_by: Option<String>,
    },
    /// List a service provider's query capabilities and creation factories
    Capabilities {
        #[arg(long)]
        server: String,

        #[arg(long)]
        provider: String,

        #[arg(long, default_value = "CM")]
        domain: Domain,
    },
    /// Find links pointing at resources through LDM or LQE
    Links {
        /// Target resource URLs
        #[arg(required = true)]
        targets: Vec<String>,

        /// LDM or LQE base URL
        #[arg(long, env = "OSLC_LDM_BASE")]
        ldm_base: String,

        /// Only these link types (repeatable)
        #[arg(long = "link-type")]
        link_types: Vec<String>,

        /// Show each link from its target, with the inverse link type
        #[arg(long)]
        invert: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match build_config(&cli) {
        Ok(config) => {
            oslc_client::logging::init_tracing(config.debug);
            run(&cli, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default(),
    };

    if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        config = config.with_credentials(user.as_str(), password.as_str());
    }
    if let Some(context) = &cli.configuration_context {
        config = config.with_configuration_context(context.as_str());
    }
    if cli.insecure {
        config = config.with_accept_invalid_certs(true);
    }
    if cli.debug {
        config = config.with_debug(true);
    }
    Ok(config)
}

async fn run(cli: &Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Get { url } => run_get(config, url, &cli.format).await,
        Commands::Query {
            server,
            provider,
            domain,
            resource_type,
            prefix,
            select,
            where_clause,
            order_by,
        } => {
            let params = QueryParams {
                prefix: prefix.clone(),
                select: select.clone(),
                where_clause: where_clause.clone(),
                order_by: order_by.clone(),
            };
            run_query(config, server, provider, *domain, resource_type, &params, &cli.format).await
        }
        Commands::Capabilities {
            server,
            provider,
            domain,
        } => run_capabilities(config, server, provider, *domain, &cli.format).await,
        Commands::Links {
            targets,
            ldm_base,
            link_types,
            invert,
        } => run_links(config, targets, ldm_base, link_types, *invert, &cli.format).await,
    }
}

async fn run_get(
    config: ClientConfig,
    url: &str,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = OslcClient::new(config)?;

    match client.get_resource(url).await? {
        Document::Rdf(resource) => print_resources(&[resource], client.namespaces(), format)?,
        Document::Xml { text, .. } | Document::Feed { text, .. } => println!("{}", text),
    }
    Ok(())
}

async fn run_query(
    config: ClientConfig,
    server: &str,
    provider: &str,
    domain: Domain,
    resource_type: &str,
    params: &QueryParams,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = OslcClient::new(config)?;
    client.use_service_provider(server, provider, domain).await?;

    let resources = client.query_resources(resource_type, params).await?;
    print_resources(&resources, client.namespaces(), format)?;
    if matches!(format, OutputFormat::Table) {
        println!("{} resource(s)", resources.len());
    }
    Ok(())
}

async fn run_capabilities(
    config: ClientConfig,
    server: &str,
    provider: &str,
    domain: Domain,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = OslcClient::new(config)?;
    client.use_service_provider(server, provider, domain).await?;

    let Some(sp) = client.service_provider() else {
        return Ok(());
    };
    let capabilities: Vec<_> = sp
        .query_capabilities()
        .into_iter()
        .chain(sp.creation_factories())
        .collect();

    let rows: Vec<Vec<String>> = capabilities
        .iter()
        .map(|c| {
            vec![
                c.kind.describe().to_string(),
                c.title.clone().unwrap_or_default(),
                c.resource_types.join(" "),
                c.usages.join(" "),
                c.url.clone(),
            ]
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&capabilities)?),
        _ => print_rows(&["kind", "title", "resource types", "usages", "url"], &rows, format),
    }
    Ok(())
}

async fn run_links(
    config: ClientConfig,
    targets: &[String],
    ldm_base: &str,
    link_types: &[String],
    invert: bool,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = IncomingLinkResolver::from_config(config, ldm_base)?;
    let links = resolver.get_incoming_links(targets, link_types, None).await?;

    if invert {
        let inverted = resolver.invert(&links)?;
        let rows: Vec<Vec<String>> = inverted
            .iter()
            .map(|l| vec![l.target_url.clone(), l.inverse_link_type.clone(), l.source_url.clone()])
            .collect();
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inverted)?),
            _ => print_rows(&["target", "inverse link type", "source"], &rows, format),
        }
    } else {
        let rows: Vec<Vec<String>> = links
            .iter()
            .map(|l| vec![l.source_url.clone(), l.link_type.clone(), l.target_url.clone()])
            .collect();
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
            _ => print_rows(&["source", "link type", "target"], &rows, format),
        }
    }
    Ok(())
}

fn print_resources(
    resources: &[Resource],
    namespaces: &Namespaces,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        let json: Vec<serde_json::Value> = resources
            .iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri(),
                    "etag": r.etag(),
                    "properties": r.properties(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = resources
        .iter()
        .flat_map(|r| {
            r.properties().into_iter().map(move |(predicate, value)| {
                vec![
                    r.uri().to_string(),
                    namespaces.compact(&predicate).unwrap_or(predicate),
                    format_value(&value),
                ]
            })
        })
        .collect();
    print_rows(&["resource", "property", "value"], &rows, format);
    Ok(())
}

fn print_rows(header: &[&str], rows: &[Vec<String>], format: &OutputFormat) {
    match format {
        OutputFormat::Csv => {
            println!("{}", header.join(","));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|v| format_csv_value(v)).collect();
                println!("{}", cells.join(","));
            }
        }
        _ => {
            if rows.is_empty() {
                println!("(no results)");
                return;
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header.to_vec());
            for row in rows {
                table.add_row(row);
            }
            println!("{}", table);
        }
    }
}

fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Many(values) => values.join("\n"),
        other => other.to_string(),
    }
}

fn format_csv_value(v: &str) -> String {
    if v.contains(',') || v.contains('"') || v.contains('\n') {
        format!("\"{}\"", v.replace('"', "\"\""))
    } else {
        v.to_string()
    }
}
